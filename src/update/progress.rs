//! Formatting of download progress for the notice

use super::info::ProgressSample;

/// Bytes per displayed megabyte
const BYTES_PER_MB: f64 = 1_048_576.0;

/// Status shown before the first progress sample arrives
pub const STATUS_STARTING: &str = "Downloading update automatically...";

/// Display values derived from one [`ProgressSample`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressDisplay {
    /// Rounded, clamped percentage in `0..=100`
    pub percent: u8,
    /// `"<n>%"`
    pub percent_label: String,
    /// `"<x.xx> MB/s"`, absent without a speed
    pub speed: Option<String>,
    /// `"<a.aa> MB / <b.bb> MB"`, absent unless both halves are known
    pub size: Option<String>,
    /// Status line for the notice
    pub status: String,
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self {
            percent: 0,
            percent_label: "0%".to_string(),
            speed: None,
            size: None,
            status: STATUS_STARTING.to_string(),
        }
    }
}

/// Format a raw sample into display strings
pub fn report(sample: &ProgressSample) -> ProgressDisplay {
    let percent = display_percent(sample.percent.unwrap_or(0.0));

    let speed = sample
        .bytes_per_second
        .map(|bps| format!("{:.2} MB/s", bps / BYTES_PER_MB));

    let size = match (sample.transferred, sample.total) {
        (Some(transferred), Some(total)) => Some(format!(
            "{:.2} MB / {:.2} MB",
            transferred / BYTES_PER_MB,
            total / BYTES_PER_MB
        )),
        _ => None,
    };

    ProgressDisplay {
        percent,
        percent_label: format!("{percent}%"),
        speed,
        size,
        status: format!("Downloading update... {percent}%"),
    }
}

/// `round(clamp(percent, 0, 100))`, NaN counts as 0
pub fn display_percent(percent: f64) -> u8 {
    if percent.is_nan() {
        return 0;
    }
    percent.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sample() {
        let display = report(&ProgressSample {
            percent: Some(42.7),
            bytes_per_second: Some(2_097_152.0),
            transferred: Some(10_485_760.0),
            total: Some(52_428_800.0),
        });

        assert_eq!(display.percent, 43);
        assert_eq!(display.percent_label, "43%");
        assert_eq!(display.speed.as_deref(), Some("2.00 MB/s"));
        assert_eq!(display.size.as_deref(), Some("10.00 MB / 50.00 MB"));
        assert_eq!(display.status, "Downloading update... 43%");
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let display = report(&ProgressSample {
            percent: None,
            bytes_per_second: None,
            transferred: Some(1024.0),
            total: None,
        });

        assert_eq!(display.percent_label, "0%");
        assert!(display.speed.is_none());
        assert!(display.size.is_none());
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(display_percent(-12.0), 0);
        assert_eq!(display_percent(100.4), 100);
        assert_eq!(display_percent(250.0), 100);
        assert_eq!(display_percent(99.5), 100);
        assert_eq!(display_percent(0.49), 0);
        assert_eq!(display_percent(f64::NAN), 0);
        assert_eq!(display_percent(f64::INFINITY), 100);
    }

    #[test]
    fn test_percent_always_in_range() {
        let mut value = -500.0;
        while value <= 500.0 {
            let shown = display_percent(value);
            assert!(shown <= 100);
            assert_eq!(f64::from(shown), value.clamp(0.0, 100.0).round());
            value += 0.37;
        }
    }

    #[test]
    fn test_default_display_before_first_sample() {
        let display = ProgressDisplay::default();
        assert_eq!(display.percent_label, "0%");
        assert_eq!(display.status, STATUS_STARTING);
    }
}
