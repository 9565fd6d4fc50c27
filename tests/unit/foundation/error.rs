use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CtaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CtaError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(CtaError::config("x").to_string().contains("config error:"));
    assert!(
        CtaError::metadata("x")
            .to_string()
            .contains("metadata error:")
    );
    assert!(
        CtaError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        CtaError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CtaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
