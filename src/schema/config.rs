//! Configuration types for trace playback.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_render_margin_ms() -> u64 {
    50
}

fn default_highlight_poll_interval_ms() -> u64 {
    100
}

/// Top-level playback configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Animation duration in milliseconds. Also the auto-play tick cadence.
    pub animation_duration_ms: u64,
    /// Slack subtracted from the animation duration when deciding whether a
    /// step arrived late enough to be animated.
    #[serde(default = "default_render_margin_ms")]
    pub render_margin_ms: u64,
    /// Period of the timer that clears a lingering swap highlight.
    #[serde(default = "default_highlight_poll_interval_ms")]
    pub highlight_poll_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: 500,
            render_margin_ms: default_render_margin_ms(),
            highlight_poll_interval_ms: default_highlight_poll_interval_ms(),
        }
    }
}

impl PlaybackConfig {
    #[inline]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Minimum gap between mutations for a render to be animated.
    #[inline]
    pub fn animate_threshold(&self) -> Duration {
        Duration::from_millis(
            self.animation_duration_ms
                .saturating_sub(self.render_margin_ms),
        )
    }

    #[inline]
    pub fn highlight_poll_interval(&self) -> Duration {
        Duration::from_millis(self.highlight_poll_interval_ms)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation_duration_ms == 0 {
            return Err(ConfigError::InvalidAnimationDuration);
        }
        if self.highlight_poll_interval_ms == 0 {
            return Err(ConfigError::InvalidHighlightInterval);
        }
        if self.render_margin_ms > self.animation_duration_ms {
            return Err(ConfigError::RenderMarginTooLarge {
                margin: self.render_margin_ms,
                duration: self.animation_duration_ms,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Animation duration must be non-zero")]
    InvalidAnimationDuration,
    #[error("Highlight poll interval must be non-zero")]
    InvalidHighlightInterval,
    #[error("Render margin {margin}ms exceeds animation duration {duration}ms")]
    RenderMarginTooLarge { margin: u64, duration: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PlaybackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.animation_duration(), Duration::from_millis(500));
        assert_eq!(config.animate_threshold(), Duration::from_millis(450));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"animation_duration_ms": 200}"#).unwrap();
        assert_eq!(config.animation_duration_ms, 200);
        assert_eq!(config.render_margin_ms, 50);
        assert_eq!(config.highlight_poll_interval_ms, 100);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = PlaybackConfig {
            animation_duration_ms: 0,
            render_margin_ms: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::InvalidAnimationDuration));

        let no_poll = PlaybackConfig {
            highlight_poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(
            no_poll.validate(),
            Err(ConfigError::InvalidHighlightInterval)
        );

        let margin = PlaybackConfig {
            animation_duration_ms: 40,
            render_margin_ms: 50,
            ..Default::default()
        };
        assert!(matches!(
            margin.validate(),
            Err(ConfigError::RenderMarginTooLarge { .. })
        ));
    }
}
