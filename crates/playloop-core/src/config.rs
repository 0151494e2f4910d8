use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{LoopError, LoopResult};
use crate::phase::SCRIPT_RUN_FIXED_UPDATE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopConfig {
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub rate_override: RateOverrideConfig,
}

impl LoopConfig {
    pub fn load_toml(path: impl AsRef<Path>) -> LoopResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LoopError::ConfigIo(path.to_path_buf(), e))?;
        Self::from_toml_str(&text).map_err(|e| LoopError::ConfigParse(path.to_path_buf(), e))
    }

    #[inline]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    #[serde(default = "default_fixed_hz")]
    pub fixed_hz: u32,
    #[serde(default = "default_max_fixed_steps")]
    pub max_fixed_steps_per_frame: u32,
    #[serde(default = "default_max_dt_ms")]
    pub max_dt_ms: u32,
    /// Pacing for `PlayerLoop::run`.
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default)]
    pub log_fps: bool,
    #[serde(default = "default_fps_period_ms")]
    pub fps_log_period_ms: u32,
}

fn default_fixed_hz() -> u32 { 60 }
fn default_max_fixed_steps() -> u32 { 8 }
fn default_max_dt_ms() -> u32 { 250 }
fn default_target_fps() -> u32 { 60 }
fn default_fps_period_ms() -> u32 { 1000 }

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fixed_hz: default_fixed_hz(),
            max_fixed_steps_per_frame: default_max_fixed_steps(),
            max_dt_ms: default_max_dt_ms(),
            target_fps: default_target_fps(),
            log_fps: false,
            fps_log_period_ms: default_fps_period_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateOverrideConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Name of the node whose handler gets wrapped.
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_period_sec")]
    pub period_sec: f32,
}

fn default_enabled() -> bool { true }
fn default_target() -> String { SCRIPT_RUN_FIXED_UPDATE.as_str().to_string() }
fn default_period_sec() -> f32 { 1.0 }

impl Default for RateOverrideConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            target: default_target(),
            period_sec: default_period_sec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = LoopConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.frame.fixed_hz, 60);
        assert_eq!(cfg.frame.max_fixed_steps_per_frame, 8);
        assert!(cfg.rate_override.enabled);
        assert_eq!(cfg.rate_override.target, "FixedUpdate.ScriptRunFixedUpdate");
        assert_eq!(cfg.rate_override.period_sec, 1.0);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = LoopConfig::from_toml_str(
            r#"
            [frame]
            fixed_hz = 50

            [rate_override]
            period_sec = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(cfg.frame.fixed_hz, 50);
        assert_eq!(cfg.frame.max_dt_ms, 250);
        assert_eq!(cfg.rate_override.period_sec, 0.5);
        assert!(cfg.rate_override.enabled);
    }

    #[test]
    fn bad_type_is_a_parse_error() {
        assert!(LoopConfig::from_toml_str("[frame]\nfixed_hz = \"fast\"").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LoopConfig::load_toml("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, LoopError::ConfigIo(..)));
    }
}
