use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::body::{scale, AnthropometricProfile, AnthropometricRatios};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub body: BodyConfig,
    #[serde(default)]
    pub trajectory: TrajectoryConfig,
    #[serde(default)]
    pub gait: GaitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BodyConfig {
    /// 身長（メートル）
    #[serde(default = "default_height")]
    pub height: f64,
    /// 部位比率テーブル
    #[serde(default)]
    pub ratios: AnthropometricRatios,
}

fn default_height() -> f64 { 1.75 }

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            ratios: AnthropometricRatios::default(),
        }
    }
}

impl BodyConfig {
    pub fn profile(&self) -> crate::error::Result<AnthropometricProfile> {
        scale(self.height, &self.ratios)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrajectoryConfig {
    /// 軌跡の記録レート（フレーム/秒）
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// CSV区切り文字
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// 先頭行がヘッダか
    #[serde(default = "default_has_header")]
    pub has_header: bool,
}

fn default_fps() -> f64 { 10.0 }
fn default_delimiter() -> char { ',' }
fn default_has_header() -> bool { true }

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            delimiter: default_delimiter(),
            has_header: default_has_header(),
        }
    }
}

impl TrajectoryConfig {
    /// ASCII以外の区切り文字は ',' 扱い
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            warn!(delimiter = %self.delimiter, "non-ASCII delimiter, using ','");
            b','
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GaitConfig {
    /// 重力加速度 (m/s²)
    #[serde(default = "default_gravity")]
    pub gravity: f64,
}

fn default_gravity() -> f64 { 9.81 }

impl Default for GaitConfig {
    fn default() -> Self {
        Self { gravity: default_gravity() }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// 読み込めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }
}
