//! Runtime settings
//!
//! Gameplay tuning lives in [`crate::consts`]. These are the few values the host
//! supplies: the RNG seed, where the grid sits on its canvas, and the debug reveal.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Host-provided settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Pixel offset of tile (0, 0) on the host canvas
    pub origin: Vec2,
    /// Show power-ups still buried under special blocks
    pub reveal_hidden: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_D1A4,
            origin: Vec2::ZERO,
            reveal_hidden: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject origins that would put the grid off-canvas or are not finite
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.origin.is_finite() {
            return Err(SettingsError::Invalid("origin must be finite".into()));
        }
        if self.origin.x < 0.0 || self.origin.y < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "origin must be non-negative, got ({}, {})",
                self.origin.x, self.origin.y
            )));
        }
        Ok(())
    }

    /// Same settings with a different seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
