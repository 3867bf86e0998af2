//! User configuration: engine policy and frame pacing.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/app-grid/config.toml` (default `~/.config/app-grid/config.toml`).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::engine::EnginePolicy;

pub const MIN_FRAME_MS: u64 = 5;
pub const MAX_FRAME_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: `{key}` expects {expected}, got `{value}`")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
        expected: &'static str,
    },
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Render one more frame after motion stops.
    pub extra_final_frame: bool,
    /// Invisible preload frame at startup.
    pub warm_up_pass: bool,
    /// Only push readback when a value changed.
    pub suppress_duplicate_readback: bool,
    /// Ramp zoom changes instead of jumping.
    pub animate_zoom: bool,
    /// Frame scheduler interval.
    pub frame_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let policy = EnginePolicy::default();
        Self {
            extra_final_frame: policy.extra_final_frame,
            warm_up_pass: policy.warm_up_pass,
            suppress_duplicate_readback: policy.suppress_duplicate_readback,
            animate_zoom: true,
            frame_interval_ms: 16,
        }
    }
}

impl AppConfig {
    pub fn policy(&self) -> EnginePolicy {
        EnginePolicy {
            extra_final_frame: self.extra_final_frame,
            warm_up_pass: self.warm_up_pass,
            suppress_duplicate_readback: self.suppress_duplicate_readback,
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::read(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(%err, "ignoring config file");
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            let invalid = |expected| ConfigError::InvalidValue {
                line: index + 1,
                key: key.to_string(),
                value: value.to_string(),
                expected,
            };

            let flag = match key {
                "extra_final_frame" => &mut config.extra_final_frame,
                "warm_up_pass" => &mut config.warm_up_pass,
                "suppress_duplicate_readback" => &mut config.suppress_duplicate_readback,
                "animate_zoom" => &mut config.animate_zoom,
                "frame_interval_ms" => {
                    let ms: u64 = value.parse().map_err(|_| invalid("a whole number"))?;
                    // Keep this bounded for a usable frame rate.
                    config.frame_interval_ms = ms.clamp(MIN_FRAME_MS, MAX_FRAME_MS);
                    continue;
                }
                _ => continue,
            };
            *flag = match value {
                "true" => true,
                "false" => false,
                _ => return Err(invalid("true or false")),
            };
        }

        Ok(config)
    }

    fn serialise(&self) -> String {
        let lines = [
            "# app-grid configuration".to_string(),
            String::new(),
            "# Rendering workarounds".to_string(),
            format!("extra_final_frame = {}", self.extra_final_frame),
            format!("warm_up_pass = {}", self.warm_up_pass),
            String::new(),
            "# Readback".to_string(),
            format!(
                "suppress_duplicate_readback = {}",
                self.suppress_duplicate_readback
            ),
            String::new(),
            "# Animation".to_string(),
            format!("animate_zoom = {}", self.animate_zoom),
            format!("frame_interval_ms = {}", self.frame_interval_ms),
            String::new(),
        ];
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/app-grid/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("app-grid").join("config.toml")
}
