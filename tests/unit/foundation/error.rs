use std::error::Error as _;

use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ShotframeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ShotframeError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        ShotframeError::export("capture", anyhow::anyhow!("x"))
            .to_string()
            .contains("export error: capture")
    );
}

#[test]
fn export_keeps_cause_as_source() {
    let err = ShotframeError::export("capture", anyhow::anyhow!("tainted wallpaper"));
    let source = err.source().expect("export error has a source");
    assert!(source.to_string().contains("tainted wallpaper"));
    assert!(err.is_export());
}

#[test]
fn into_export_wraps_non_export_errors_once() {
    let err = ShotframeError::validation("bad size").into_export("capture");
    assert!(err.is_export());
    assert!(err.source().unwrap().to_string().contains("bad size"));

    let again = err.into_export("outer");
    assert!(again.to_string().contains("capture"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ShotframeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
