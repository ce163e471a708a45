use vjal_crypto::CryptoError;

#[test]
fn error_display_invalid_blob() {
    let err = CryptoError::InvalidBlob("blob is 3 bytes".into());
    assert!(format!("{err}").contains("invalid blob"));
    assert!(format!("{err}").contains("3 bytes"));
}

#[test]
fn error_display_authentication() {
    let err = CryptoError::Authentication;
    assert!(format!("{err}").contains("authentication failed"));
}

#[test]
fn error_display_key_derivation() {
    let err = CryptoError::KeyDerivation("bad params".into());
    assert!(format!("{err}").contains("key derivation failed"));
    assert!(format!("{err}").contains("bad params"));
}

#[test]
fn error_display_mismatch() {
    let err = CryptoError::Mismatch {
        expected: "aa".into(),
        actual: "bb".into(),
    };
    let msg = format!("{err}");
    assert!(msg.contains("expected aa"));
    assert!(msg.contains("got bb"));
}

#[test]
fn error_display_io_includes_path() {
    let err = CryptoError::Io {
        path: "/tmp/payload.json".into(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert!(format!("{err}").contains("/tmp/payload.json"));
}
