//! Payloads exchanged with the update service bridge

use serde::{Deserialize, Serialize};

/// Placeholder shown when no version field is usable
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Version information attached to an "update available" signal.
///
/// Every field is best-effort; use [`UpdateInfo::current_display`] and
/// [`UpdateInfo::new_display`] to get printable values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    /// Version currently running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    /// Version being offered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
    /// Generic version field, used when a specific one is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl UpdateInfo {
    /// Info carrying both specific versions
    pub fn new(current: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            current_version: Some(current.into()),
            new_version: Some(new.into()),
            version: None,
        }
    }

    /// Info carrying only the generic version field
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::default()
        }
    }

    /// Current version: `current_version` → `version` → "Unknown"
    pub fn current_display(&self) -> &str {
        first_present(&[&self.current_version, &self.version])
    }

    /// Offered version: `new_version` → `version` → "Unknown"
    pub fn new_display(&self) -> &str {
        first_present(&[&self.new_version, &self.version])
    }
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> &'a str {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_VERSION)
}

/// One raw download progress report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSample {
    /// Completion in percent; missing means 0
    #[serde(default)]
    pub percent: Option<f64>,
    /// Current transfer speed
    #[serde(default)]
    pub bytes_per_second: Option<f64>,
    /// Bytes received so far
    #[serde(default)]
    pub transferred: Option<f64>,
    /// Total bytes expected
    #[serde(default)]
    pub total: Option<f64>,
}

impl ProgressSample {
    /// Sample with only a percentage
    pub fn percent(percent: f64) -> Self {
        Self {
            percent: Some(percent),
            ..Self::default()
        }
    }
}

/// Answer to an on-demand update check.
///
/// When the check itself fails the controller hands back a neutral value with
/// `update_available == false` and the failure message in `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    /// Whether a newer version exists
    pub update_available: bool,
    /// Version currently running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    /// Version being offered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
    /// Generic version field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Failure message when the check was rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResponse {
    /// Neutral "no update" result carrying the failure message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            update_available: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Version details as an [`UpdateInfo`]
    pub fn info(&self) -> UpdateInfo {
        UpdateInfo {
            current_version: self.current_version.clone(),
            new_version: self.new_version.clone(),
            version: self.version.clone(),
        }
    }
}

/// Compare semver versions, returns true if `latest` is newer than `current`
pub fn version_is_newer(latest: &str, current: &str) -> bool {
    let parse = |v: &str| -> Vec<u32> {
        v.trim_start_matches('v')
            .split('.')
            .filter_map(|s| s.parse().ok())
            .collect()
    };

    let latest_parts = parse(latest);
    let current_parts = parse(current);

    for i in 0..3 {
        let l = latest_parts.get(i).copied().unwrap_or(0);
        let c = current_parts.get(i).copied().unwrap_or(0);
        if l > c {
            return true;
        }
        if l < c {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_versions_win() {
        let info = UpdateInfo {
            current_version: Some("1.0.0".into()),
            new_version: Some("1.1.0".into()),
            version: Some("9.9.9".into()),
        };
        assert_eq!(info.current_display(), "1.0.0");
        assert_eq!(info.new_display(), "1.1.0");
    }

    #[test]
    fn test_generic_version_fallback() {
        let info = UpdateInfo::with_version("2.0.0");
        assert_eq!(info.current_display(), "2.0.0");
        assert_eq!(info.new_display(), "2.0.0");
    }

    #[test]
    fn test_unknown_when_nothing_present() {
        let info = UpdateInfo {
            current_version: Some(String::new()),
            ..UpdateInfo::default()
        };
        assert_eq!(info.current_display(), UNKNOWN_VERSION);
        assert_eq!(info.new_display(), UNKNOWN_VERSION);
    }

    #[test]
    fn test_check_response_wire_format() {
        let json = serde_json::to_value(CheckResponse::failed("network down")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "updateAvailable": false, "error": "network down" })
        );

        let parsed: CheckResponse = serde_json::from_str(
            r#"{"updateAvailable":true,"currentVersion":"1.0.0","newVersion":"1.1.0"}"#,
        )
        .unwrap();
        assert!(parsed.update_available);
        assert_eq!(parsed.info(), UpdateInfo::new("1.0.0", "1.1.0"));
    }

    #[test]
    fn test_progress_sample_accepts_partial_payload() {
        let sample: ProgressSample = serde_json::from_str(r#"{"bytesPerSecond":1024}"#).unwrap();
        assert_eq!(sample.percent, None);
        assert_eq!(sample.bytes_per_second, Some(1024.0));
    }

    #[test]
    fn test_version_is_newer() {
        assert!(version_is_newer("1.1.0", "1.0.0"));
        assert!(version_is_newer("v2.0", "1.9.9"));
        assert!(!version_is_newer("1.0.0", "1.0.0"));
        assert!(!version_is_newer("0.9.0", "1.0.0"));
    }
}
