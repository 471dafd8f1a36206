use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FractreeError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        FractreeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FractreeError::capture("x")
            .to_string()
            .contains("capture error:")
    );
    assert!(
        FractreeError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        FractreeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("pipe closed");
    let err = FractreeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("pipe closed"));
}
