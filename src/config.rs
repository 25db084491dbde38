use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::Result;

use crate::lighting::DEFAULT_SAMPLE_SIZE;
use crate::smoothing::DEFAULT_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tracking: TrackingConfig,
    pub lighting: LightingConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Soft cap on detection cadence: a new detection is not requested before
    /// this many milliseconds have passed since the previous one (~30/s).
    pub detection_interval_ms: u64,
    /// Smoothing buffer depth. Larger = steadier but laggier overlay.
    pub buffer_capacity: usize,
    /// Rolling window over which the frame rate is recomputed.
    pub frame_rate_window_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub sample_interval_ms: u64,
    pub sample_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub mirror_mode: bool,
    pub show_hud: bool,
    pub overlay_color_hex: String, // e.g. "#00FF88"
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            detection_interval_ms: 33,
            buffer_capacity: DEFAULT_CAPACITY,
            frame_rate_window_ms: 1000,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 500,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mirror_mode: true,
            show_hud: true,
            overlay_color_hex: "#00FF88".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            lighting: LightingConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    const PATH: &'static str = "config.json";

    pub fn load() -> Result<Self> {
        let config = if Path::new(Self::PATH).exists() {
            let content = fs::read_to_string(Self::PATH)?;
            // Missing fields fall back to defaults via #[serde(default)]
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(c) => {
                    tracing::info!("Loaded configuration from {}", Self::PATH);
                    c
                }
                Err(e) => {
                    tracing::warn!("Error parsing config: {}. Loading defaults.", e);
                    Self::default()
                }
            }
        } else {
            tracing::info!("Configuration file not found. Creating default at {}", Self::PATH);
            Self::default()
        };

        // Always save back so new fields show up in the file
        config.save()?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::PATH, content)?;
        Ok(())
    }
}
