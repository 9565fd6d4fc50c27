use super::*;
use serde_json::json;

fn body(count: serde_json::Value) -> serde_json::Value {
    json!({
        "kind": "youtube#channelListResponse",
        "items": [{ "id": "UC123", "statistics": { "subscriberCount": count } }]
    })
}

#[test]
fn parses_string_and_number_counts() {
    assert_eq!(parse_subscriber_count(&body(json!("1500"))).unwrap(), 1500);
    assert_eq!(parse_subscriber_count(&body(json!(" 42 "))).unwrap(), 42);
    assert_eq!(parse_subscriber_count(&body(json!(987))).unwrap(), 987);
    assert_eq!(parse_subscriber_count(&body(json!(2000.0))).unwrap(), 2000);
    assert_eq!(parse_subscriber_count(&body(json!("1e3"))).unwrap(), 1000);
}

#[test]
fn empty_string_counts_as_zero() {
    assert_eq!(parse_subscriber_count(&body(json!(""))).unwrap(), 0);
}

#[test]
fn unusable_values_report_the_full_response() {
    for bad in [json!("abc"), json!(-3), json!(1.5), json!(null), json!(true)] {
        let b = body(bad);
        let err = parse_subscriber_count(&b).unwrap_err();
        assert!(matches!(err, CtaError::Metadata(_)));
        let msg = err.to_string();
        assert!(msg.contains("Could not parse subscriber count from YouTube API response: "));
        assert!(msg.contains("youtube#channelListResponse"));
    }
}

#[test]
fn missing_items_fail() {
    let err = parse_subscriber_count(&json!({ "items": [] })).unwrap_err();
    assert!(err.to_string().contains(r#"{"items":[]}"#));

    let api_error = json!({ "error": { "code": 400, "message": "API key not valid." } });
    let err = parse_subscriber_count(&api_error).unwrap_err();
    assert!(err.to_string().contains("API key not valid."));
}

#[test]
fn static_source_returns_its_count() {
    assert_eq!(StaticSubscriberCount(9).subscriber_count().unwrap(), 9);
}

#[test]
fn client_reports_transport_errors_as_metadata_errors() {
    let cfg = YoutubeConfig::from_values(Some("k".to_owned()), Some("c".to_owned()))
        .unwrap()
        .with_endpoint("http://127.0.0.1:1/channels");
    let client = YoutubeClient::new(cfg).unwrap();
    let err = client.subscriber_count().unwrap_err();
    assert!(matches!(err, CtaError::Metadata(_)));
}

/// Serve one HTTP response on a local port; the handle yields the request head.
fn serve_once(status: &'static str, body: String) -> (String, std::thread::JoinHandle<String>) {
    use std::io::{BufRead, BufReader, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = String::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();
        head
    });
    (format!("http://{addr}/youtube/v3/channels"), handle)
}

fn client_for(endpoint: String) -> YoutubeClient {
    let cfg = YoutubeConfig::from_values(Some("test-key".to_owned()), Some("UC123".to_owned()))
        .unwrap()
        .with_endpoint(endpoint);
    YoutubeClient::new(cfg).unwrap()
}

#[test]
fn client_sends_statistics_query_and_parses_the_count() {
    let (endpoint, server) = serve_once("200 OK", body(json!("2345")).to_string());
    let count = client_for(endpoint).subscriber_count().unwrap();
    assert_eq!(count, 2345);

    let head = server.join().unwrap();
    let request_line = head.lines().next().unwrap();
    assert!(request_line.starts_with("GET /youtube/v3/channels?"), "{request_line}");
    assert!(request_line.contains("part=statistics"), "{request_line}");
    assert!(request_line.contains("id=UC123"), "{request_line}");
    assert!(request_line.contains("key=test-key"), "{request_line}");
}

#[test]
fn error_status_bodies_surface_in_the_metadata_error() {
    let error_body = json!({
        "error": {
            "code": 403,
            "message": "The request cannot be completed because you have exceeded your quota.",
            "errors": [{ "reason": "quotaExceeded" }]
        }
    });
    let (endpoint, server) = serve_once("403 Forbidden", error_body.to_string());
    let err = client_for(endpoint).subscriber_count().unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, CtaError::Metadata(_)));
    let msg = err.to_string();
    assert!(
        msg.contains("Could not parse subscriber count from YouTube API response: "),
        "{msg}"
    );
    assert!(msg.contains("quotaExceeded"), "{msg}");
    assert!(msg.contains(&error_body.to_string()), "{msg}");
}
