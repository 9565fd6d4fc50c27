use super::*;
use crate::metadata::youtube::StaticSubscriberCount;

struct Failing;

impl SubscriberSource for Failing {
    fn subscriber_count(&self) -> CtaResult<u64> {
        Err(CtaError::config("YOUTUBE_API_KEY is not set in .env"))
    }
}

#[test]
fn overlay_registration_matches_the_expected_format() {
    let comp = Composition::youtube_cta();
    assert_eq!(comp.id, "YouTubeCTA");
    assert_eq!(comp.canvas.width, 1920);
    assert_eq!(comp.canvas.height, 1080);
    assert_eq!(comp.fps.as_f64(), 30.0);
    assert_eq!(comp.duration, FrameIndex(181));
    assert_eq!(comp.default_props.sub_count, 0);
    comp.validate().unwrap();

    let vc = comp.video_config();
    assert_eq!(vc.duration_in_frames, 181);
    assert_eq!(vc.secs(0.6), 18.0);
    assert_eq!(comp.frame_range().len_frames(), 181);
}

#[test]
fn validate_rejects_bad_structure() {
    let mut comp = Composition::youtube_cta();
    comp.canvas.width = 0;
    assert!(comp.validate().is_err());

    let mut comp = Composition::youtube_cta();
    comp.canvas.height = 1081;
    assert!(comp.validate().is_err());

    let mut comp = Composition::youtube_cta();
    comp.duration = FrameIndex(0);
    assert!(comp.validate().is_err());

    let mut comp = Composition::youtube_cta();
    comp.fps.den = 0;
    assert!(comp.validate().is_err());
}

#[test]
fn calculate_metadata_uses_the_source_count() {
    let comp = Composition::youtube_cta();
    let props = comp
        .calculate_metadata(&StaticSubscriberCount(12_345))
        .unwrap();
    assert_eq!(props.sub_count, 12_345);
    assert_eq!(props.channel_name, CHANNEL_NAME);
}

#[test]
fn calculate_metadata_propagates_source_errors() {
    let comp = Composition::youtube_cta();
    let err = comp.calculate_metadata(&Failing).unwrap_err();
    assert!(matches!(err, CtaError::Config(_)));
}

#[test]
fn props_accept_camel_case_keys() {
    let props: CtaProps = serde_json::from_str(r#"{"subCount": 1500}"#).unwrap();
    assert_eq!(props.sub_count, 1500);
    assert_eq!(props.channel_name, "Build at Scale");

    let props: CtaProps =
        serde_json::from_str(r#"{"sub_count": 7, "channel_name": "Other"}"#).unwrap();
    assert_eq!(props, CtaProps {
        sub_count: 7,
        channel_name: "Other".to_owned(),
    });
}
