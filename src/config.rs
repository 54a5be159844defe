use crate::error::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};

// --- Constants ---
const CAPTURE_DISPLAY_SECONDS: f32 = 0.35;
const MOVE_DISPLAY_SECONDS: f32 = 0.25;
const CHECK_NOTICE_SECONDS: f32 = 2.0;

/// Display lifetimes, in seconds, for the cues a match hands to the presentation layer.
/// None of them affect rules or outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub capture_display_seconds: f32,
    pub move_display_seconds: f32,
    pub check_notice_seconds: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            capture_display_seconds: CAPTURE_DISPLAY_SECONDS,
            move_display_seconds: MOVE_DISPLAY_SECONDS,
            check_notice_seconds: CHECK_NOTICE_SECONDS,
        }
    }
}

impl MatchConfig {
    /// Parses a JSON object; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.fields() {
            if !valid_duration(value) {
                return Err(ConfigError::InvalidDuration(name));
            }
        }
        Ok(())
    }

    /// Copy with every non-finite or non-positive duration replaced by its default.
    pub fn sanitized(self) -> Self {
        let defaults = MatchConfig::default();
        let pick = |name: &str, value: f32, fallback: f32| {
            if valid_duration(value) {
                value
            } else {
                warn!("{} = {} is not a usable duration, using {}", name, value, fallback);
                fallback
            }
        };
        MatchConfig {
            capture_display_seconds: pick(
                "capture_display_seconds",
                self.capture_display_seconds,
                defaults.capture_display_seconds,
            ),
            move_display_seconds: pick(
                "move_display_seconds",
                self.move_display_seconds,
                defaults.move_display_seconds,
            ),
            check_notice_seconds: pick(
                "check_notice_seconds",
                self.check_notice_seconds,
                defaults.check_notice_seconds,
            ),
        }
    }

    fn fields(&self) -> [(&'static str, f32); 3] {
        [
            ("capture_display_seconds", self.capture_display_seconds),
            ("move_display_seconds", self.move_display_seconds),
            ("check_notice_seconds", self.check_notice_seconds),
        ]
    }
}

fn valid_duration(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
