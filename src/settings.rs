//! Game settings and preferences
//!
//! A flat object persisted in LocalStorage. The simulation only ever reads
//! and updates `high_score`; the display knobs are handed to the
//! presentation layer as-is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings could not be decoded or encoded
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    StorageUnavailable,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === CRT presentation ===
    #[serde(rename = "enableScanlines")]
    pub scanlines: bool,
    #[serde(rename = "enableRGBSeparation")]
    pub rgb_separation: bool,
    /// 0.0 - 1.0
    #[serde(rename = "glowIntensity")]
    pub glow: f32,
    /// 0.0 - 1.0
    #[serde(rename = "vignetteIntensity")]
    pub vignette: f32,
    /// Barrel distortion, 0.0 - 1.0
    #[serde(rename = "fisheyeIntensity")]
    pub fisheye: f32,
    /// 0.0 - 1.0
    #[serde(rename = "tvOpacity")]
    pub tv_opacity: f32,

    // === Progress ===
    #[serde(rename = "highScore")]
    pub high_score: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scanlines: true,
            rgb_separation: true,
            glow: 0.99,
            vignette: 0.72,
            fisheye: 0.60,
            tv_opacity: 1.0,
            high_score: 0,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "gameSettings";

    /// Parse a stored settings blob. Missing fields take their defaults and
    /// float knobs are clamped into range.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.clamp_knobs();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Keep every intensity inside [0, 1]; NaN falls back to 0
    pub fn clamp_knobs(&mut self) {
        for knob in [
            &mut self.glow,
            &mut self.vignette,
            &mut self.fisheye,
            &mut self.tv_opacity,
        ] {
            *knob = if knob.is_nan() { 0.0 } else { knob.clamp(0.0, 1.0) };
        }
    }

    /// Fold a finished run into the stored best. Returns true if it changed.
    pub fn record_high_score(&mut self, score: u32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), SettingsError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(SettingsError::StorageUnavailable)?;

        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| SettingsError::StorageUnavailable)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), SettingsError> {
        log::debug!("Settings not persisted on native ({})", Self::STORAGE_KEY);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"enableRGBSeparation\":true"));
        assert!(json.contains("\"highScore\":0"));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_partial_blob_fills_defaults_and_clamps() {
        let settings = Settings::from_json(r#"{"highScore": 12, "glowIntensity": 3.5}"#).unwrap();
        assert_eq!(settings.high_score, 12);
        assert_eq!(settings.glow, 1.0);
        assert_eq!(settings.vignette, 0.72);
        assert!(settings.scanlines);
    }

    #[test]
    fn test_malformed_blob() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_high_score_is_monotonic() {
        let mut settings = Settings::default();
        assert!(settings.record_high_score(5));
        assert!(!settings.record_high_score(3));
        assert!(!settings.record_high_score(5));
        assert_eq!(settings.high_score, 5);
    }
}
