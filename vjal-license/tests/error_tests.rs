use vjal_crypto::CryptoError;
use vjal_license::LicenseError;

#[test]
fn error_display_expired() {
    let err = LicenseError::Expired("2024-01-01T00:00:00Z".into());
    assert!(format!("{err}").contains("expired on 2024-01-01"));
}

#[test]
fn error_display_invalid_payload() {
    let err = LicenseError::InvalidPayload("missing field".into());
    assert!(format!("{err}").contains("invalid license payload"));
}

#[test]
fn error_display_device_mismatch() {
    let err = LicenseError::DeviceMismatch;
    assert!(format!("{err}").contains("another device"));
}

#[test]
fn error_from_crypto() {
    let err: LicenseError = CryptoError::Authentication.into();
    assert!(matches!(err, LicenseError::Crypto(CryptoError::Authentication)));
    assert!(format!("{err}").contains("authentication failed"));
}

#[test]
fn error_display_io_includes_path() {
    let err = LicenseError::Io {
        path: "/etc/vjal/license.json".into(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert!(format!("{err}").contains("/etc/vjal/license.json"));
}
