//! Spy configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpyError};

/// How the active target is chosen on each check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpyMode {
    /// The top-most visible target wins, `None` when nothing is visible.
    /// Honors thresholds and scroll containers.
    #[default]
    TopMost,
    /// Every visible target is published in registration order and the last
    /// one sticks. Visibility is inclusive, thresholds and containers are
    /// ignored and the active target is never cleared.
    EveryVisible,
}

/// Options passed to [`ScrollSpy::spy`](crate::spy::ScrollSpy::spy)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpyOptions {
    /// Id of the scroll container the targets live in. `None` spies on the
    /// window.
    pub container: Option<String>,
    /// Pixels trimmed from the top of the window band (e.g. a fixed header)
    pub threshold_top: f32,
    /// Pixels trimmed from the bottom of the window band
    pub threshold_bottom: f32,
    pub mode: SpyMode,
}

impl SpyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spy inside a scroll container instead of the window
    pub fn container(mut self, id: impl Into<String>) -> Self {
        self.container = Some(id.into());
        self
    }

    pub fn threshold_top(mut self, px: f32) -> Self {
        self.threshold_top = px;
        self
    }

    pub fn threshold_bottom(mut self, px: f32) -> Self {
        self.threshold_bottom = px;
        self
    }

    pub fn mode(mut self, mode: SpyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check thresholds are usable numbers
    ///
    /// Negative thresholds are allowed and widen the band.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("threshold_top", self.threshold_top),
            ("threshold_bottom", self.threshold_bottom),
        ] {
            if !value.is_finite() {
                return Err(SpyError::InvalidOptions(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }
        if matches!(&self.container, Some(id) if id.is_empty()) {
            return Err(SpyError::InvalidOptions(
                "container id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SpyOptions::default();
        assert_eq!(options.container, None);
        assert_eq!(options.threshold_top, 0.0);
        assert_eq!(options.threshold_bottom, 0.0);
        assert_eq!(options.mode, SpyMode::TopMost);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = SpyOptions::new()
            .container("docs")
            .threshold_top(64.0)
            .threshold_bottom(-10.0)
            .mode(SpyMode::EveryVisible);

        assert_eq!(options.container.as_deref(), Some("docs"));
        assert_eq!(options.threshold_top, 64.0);
        assert_eq!(options.threshold_bottom, -10.0);
        assert_eq!(options.mode, SpyMode::EveryVisible);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let options = SpyOptions::new().threshold_top(f32::NAN);
        assert!(matches!(
            options.validate(),
            Err(SpyError::InvalidOptions(_))
        ));

        let options = SpyOptions::new().threshold_bottom(f32::INFINITY);
        assert!(options.validate().is_err());

        let options = SpyOptions::new().container("");
        assert!(options.validate().is_err());
    }
}
