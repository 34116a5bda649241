#![forbid(unsafe_code)]

//! Site content and timing configuration.
//!
//! [`SiteConfig`] carries everything the presentation layer hands to the
//! state machines: the rotating phrases, the project records behind the
//! detail overlay, and the timing constants. It can be loaded from TOML or
//! JSON; omitted fields keep their defaults.
//!
//! ```toml
//! phrases = ["Backend Developer", "AI & ML enthusiast"]
//!
//! [timing]
//! type_interval_ms = 80.0
//! delete_interval_ms = 50.0
//! pause_ms = 2500.0
//!
//! [[projects]]
//! title = "Laundry Tracker"
//! summary = "Real-time machine status"
//! ```
//!
//! Configuration is validated when an engine or program is built from it;
//! invalid values are programmer errors and fail fast with [`ConfigError`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::duration_from_millis;

// ---------------------------------------------------------------------------
// Content records
// ---------------------------------------------------------------------------

/// One entry of the project gallery. Its index is its position in
/// [`SiteConfig::projects`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    /// Short description shown on the gallery card.
    pub summary: String,
    /// Long description shown in the detail overlay.
    pub description: String,
    /// Image reference resolved by the presentation layer.
    pub image: String,
    /// External link (repository or live demo).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Timing constants, expressed in milliseconds for readable config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Base interval between typed characters.
    pub type_interval_ms: f64,
    /// Interval between deleted characters.
    pub delete_interval_ms: f64,
    /// Hold time on a fully typed phrase before deleting.
    pub pause_ms: f64,
    /// Cursor blink half-period (time between toggles).
    pub cursor_blink_ms: f64,
    /// Upper bound on processed ticks per second.
    pub frame_rate_cap_hz: f64,
    /// Extra random delay in `[0, jitter)` added to each typed character.
    pub type_jitter_ms: f64,
    /// Seed for the jitter stream.
    pub jitter_seed: u64,
    /// Duration of the overlay close animation.
    pub close_delay_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            type_interval_ms: 80.0,
            delete_interval_ms: 50.0,
            pause_ms: 2500.0,
            cursor_blink_ms: 530.0,
            frame_rate_cap_hz: 120.0,
            type_jitter_ms: 50.0,
            jitter_seed: 0x5EED,
            close_delay_ms: 300.0,
        }
    }
}

/// Validated timing constants as [`Duration`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub type_interval: Duration,
    pub delete_interval: Duration,
    pub pause: Duration,
    pub cursor_blink: Duration,
    pub frame_interval: Duration,
    pub type_jitter: Duration,
    pub jitter_seed: u64,
    pub close_delay: Duration,
}

impl TimingConfig {
    /// Check every field and convert to [`Timing`].
    ///
    /// Reports the first invalid field. Use [`TimingConfig::validate`] to
    /// collect all of them.
    pub fn resolve(&self) -> Result<Timing, ConfigError> {
        if let Some(err) = self.errors().into_iter().next() {
            return Err(err);
        }
        if self.type_interval_ms <= self.delete_interval_ms {
            tracing::warn!(
                type_interval_ms = self.type_interval_ms,
                delete_interval_ms = self.delete_interval_ms,
                "typing interval is not slower than delete interval"
            );
        }
        let Some(frame_interval) = self.frame_interval() else {
            return Err(ConfigError::OutOfRange {
                field: "frame_rate_cap_hz",
                value: self.frame_rate_cap_hz,
            });
        };
        Ok(Timing {
            type_interval: duration_from_millis(self.type_interval_ms),
            delete_interval: duration_from_millis(self.delete_interval_ms),
            pause: duration_from_millis(self.pause_ms),
            cursor_blink: duration_from_millis(self.cursor_blink_ms),
            frame_interval,
            type_jitter: duration_from_millis(self.type_jitter_ms),
            jitter_seed: self.jitter_seed,
            close_delay: duration_from_millis(self.close_delay_ms),
        })
    }

    /// Validate all fields.
    ///
    /// Returns a list of human-readable problems. An empty list means the
    /// timing is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }

    /// Period of the frame cap, if it is representable and non-zero.
    fn frame_interval(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.frame_rate_cap_hz.recip())
            .ok()
            .filter(|d| !d.is_zero())
    }

    fn errors(&self) -> Vec<ConfigError> {
        // Checked after rounding to whole nanoseconds.
        let intervals = [
            ("type_interval_ms", self.type_interval_ms),
            ("delete_interval_ms", self.delete_interval_ms),
            ("cursor_blink_ms", self.cursor_blink_ms),
        ];
        let non_negative = [
            ("pause_ms", self.pause_ms),
            ("type_jitter_ms", self.type_jitter_ms),
            ("close_delay_ms", self.close_delay_ms),
        ];

        let mut errors = Vec::new();
        for (field, value) in intervals {
            if !value.is_finite() || duration_from_millis(value).is_zero() {
                errors.push(ConfigError::NonPositive { field, value });
            }
        }
        let cap = self.frame_rate_cap_hz;
        if !cap.is_finite() || cap <= 0.0 {
            errors.push(ConfigError::NonPositive {
                field: "frame_rate_cap_hz",
                value: cap,
            });
        } else if self.frame_interval().is_none() {
            errors.push(ConfigError::OutOfRange {
                field: "frame_rate_cap_hz",
                value: cap,
            });
        }
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::Negative { field, value });
            }
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// SiteConfig
// ---------------------------------------------------------------------------

/// Everything the presentation layer supplies to the state machines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Rotating typewriter phrases, in display order. Must not be empty.
    pub phrases: Vec<String>,
    /// Project gallery records.
    pub projects: Vec<Project>,
    pub timing: TimingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            phrases: vec![
                "Computer Science Student".to_string(),
                "Software Engineer".to_string(),
                "Backend Developer".to_string(),
                "AI & ML enthusiast".to_string(),
            ],
            projects: Vec::new(),
            timing: TimingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate the phrase list and timing.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.phrases.is_empty() {
            errors.push(ConfigError::EmptyPhraseList.to_string());
        }
        errors.extend(self.timing.validate());
        errors
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The phrase list has no entries.
    EmptyPhraseList,
    /// An interval or rate is not finite, or not positive once rounded to
    /// whole nanoseconds.
    NonPositive { field: &'static str, value: f64 },
    /// A delay is negative or not finite.
    Negative { field: &'static str, value: f64 },
    /// A value whose derived duration does not fit in a [`Duration`].
    OutOfRange { field: &'static str, value: f64 },
    /// Reading a config file failed.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPhraseList => write!(f, "phrase list must not be empty"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive and finite, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must be non-negative and finite, got {value}")
            }
            Self::OutOfRange { field, value } => {
                write!(f, "{field} is out of range, got {value}")
            }
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Toml(e) => write!(f, "config TOML error: {e}"),
            Self::Json(e) => write!(f, "config JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates_clean() {
        assert!(SiteConfig::default().validate().is_empty());
    }

    #[test]
    fn default_timing_resolves() {
        let timing = TimingConfig::default().resolve().expect("defaults are valid");
        assert_eq!(timing.type_interval, Duration::from_millis(80));
        assert_eq!(timing.delete_interval, Duration::from_millis(50));
        assert_eq!(timing.pause, Duration::from_millis(2500));
        assert_eq!(timing.cursor_blink, Duration::from_millis(530));
        assert_eq!(timing.close_delay, Duration::from_millis(300));
        // 1/120 s
        assert_eq!(timing.frame_interval.as_micros(), 8333);
    }

    #[test]
    fn validate_catches_empty_phrases() {
        let config = SiteConfig {
            phrases: Vec::new(),
            ..SiteConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("phrase list"));
    }

    #[test]
    fn validate_catches_zero_interval() {
        let timing = TimingConfig {
            type_interval_ms: 0.0,
            ..TimingConfig::default()
        };
        let errors = timing.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("type_interval_ms"));
        assert!(matches!(
            timing.resolve(),
            Err(ConfigError::NonPositive {
                field: "type_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn sub_nanosecond_intervals_are_rejected() {
        let timing = TimingConfig {
            type_interval_ms: 1e-9,
            delete_interval_ms: 1e-9,
            cursor_blink_ms: 1e-9,
            ..TimingConfig::default()
        };
        let errors = timing.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("cursor_blink_ms")));
        assert!(matches!(
            timing.resolve(),
            Err(ConfigError::NonPositive {
                field: "type_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn tiny_frame_rate_cap_is_out_of_range() {
        let timing = TimingConfig {
            frame_rate_cap_hz: 1e-20,
            ..TimingConfig::default()
        };
        let errors = timing.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("frame_rate_cap_hz is out of range"));
        assert!(matches!(
            timing.resolve(),
            Err(ConfigError::OutOfRange {
                field: "frame_rate_cap_hz",
                ..
            })
        ));
    }

    #[test]
    fn huge_frame_rate_cap_is_out_of_range() {
        let timing = TimingConfig {
            frame_rate_cap_hz: 1e300,
            ..TimingConfig::default()
        };
        assert!(matches!(
            timing.resolve(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn validate_catches_nan_and_negative() {
        let timing = TimingConfig {
            frame_rate_cap_hz: f64::NAN,
            pause_ms: -1.0,
            ..TimingConfig::default()
        };
        let errors = timing.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("frame_rate_cap_hz")));
        assert!(errors.iter().any(|e| e.contains("pause_ms")));
    }

    #[test]
    fn zero_pause_and_jitter_are_allowed() {
        let timing = TimingConfig {
            pause_ms: 0.0,
            type_jitter_ms: 0.0,
            close_delay_ms: 0.0,
            ..TimingConfig::default()
        };
        assert!(timing.validate().is_empty());
        let resolved = timing.resolve().expect("zero delays are valid");
        assert_eq!(resolved.pause, Duration::ZERO);
    }

    #[test]
    fn partial_toml_preserves_defaults() {
        let config = SiteConfig::from_toml_str(
            r#"
phrases = ["ab"]

[timing]
pause_ms = 2000.0
"#,
        )
        .expect("valid toml");
        assert_eq!(config.phrases, vec!["ab".to_string()]);
        assert!((config.timing.pause_ms - 2000.0).abs() < f64::EPSILON);
        assert!((config.timing.type_interval_ms - 80.0).abs() < f64::EPSILON);
        assert!(config.projects.is_empty());
    }

    #[test]
    fn toml_projects_parse() {
        let config = SiteConfig::from_toml_str(
            r#"
[[projects]]
title = "Laundry Tracker"
summary = "Real-time machine status"
link = "https://example.com/laundry"

[[projects]]
title = "Card Game"
"#,
        )
        .expect("valid toml");
        assert_eq!(config.projects.len(), 2);
        assert_eq!(
            config.projects[0].link.as_deref(),
            Some("https://example.com/laundry")
        );
        assert_eq!(config.projects[1].link, None);
        assert_eq!(config.projects[1].summary, "");
    }

    #[test]
    fn json_roundtrip_keeps_fields() {
        let mut config = SiteConfig::default();
        config.projects.push(Project {
            title: "Next-Word Predictor".into(),
            summary: "LSTM text model".into(),
            description: "Predicts the next word from context.".into(),
            image: "/predictor.jpg".into(),
            link: None,
        });
        let json = serde_json::to_string(&config).expect("serialize");
        let back = SiteConfig::from_json_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }

    #[test]
    fn malformed_json_reports_json_error() {
        let err = SiteConfig::from_json_str("{ phrases: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = SiteConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("config I/O error"));
    }
}
