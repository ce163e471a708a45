//! Shared test helpers for license tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::io::Write;
use vjal_crypto::{BlobCipher, KdfParams};

/// Writes `content` to a temp file that lives as long as the handle.
pub fn write_license(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("license-")
        .suffix(".json")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Renders a license document expiring at `expires`.
pub fn license_json(key: &str, expires: DateTime<Utc>, features: &[&str]) -> String {
    let features = serde_json::to_string(features).unwrap();
    format!(
        r#"{{"license_key":"{key}","expires":"{}","features":{features}}}"#,
        expires.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

pub fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Cheap cipher so vault tests stay fast.
pub fn fast_cipher() -> BlobCipher {
    BlobCipher::new(KdfParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    })
}
