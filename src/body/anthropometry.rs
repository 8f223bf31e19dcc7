use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};

/// 身長に対する各部位の比率テーブル
///
/// 値は標準的な生体力学テーブルから取った固定比率。
/// 別の体型モデルを使う場合は設定ファイルで差し替える。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnthropometricRatios {
    #[serde(default = "default_neck_length")]
    pub neck_length: f64,
    #[serde(default = "default_shoulder_width")]
    pub shoulder_width: f64,
    #[serde(default = "default_trunk_width")]
    pub trunk_width: f64,
    #[serde(default = "default_trunk_height")]
    pub trunk_height: f64,
    #[serde(default = "default_pelvis_width")]
    pub pelvis_width: f64,
    /// 下腿 0.2522 + 大腿 0.2269
    #[serde(default = "default_leg_length")]
    pub leg_length: f64,
    #[serde(default = "default_ankle_length")]
    pub ankle_length: f64,
    /// 足首から爪先方向
    #[serde(default = "default_foot_forward")]
    pub foot_forward: f64,
    /// 足首から踵方向
    #[serde(default = "default_foot_backward")]
    pub foot_backward: f64,
    #[serde(default = "default_foot_width")]
    pub foot_width: f64,
}

/// 足長比率（足の前後方向の比率の基準）
const FOOT_LENGTH: f64 = 0.1470;

fn default_neck_length() -> f64 { 0.1396 }
fn default_shoulder_width() -> f64 { 0.45 / 1.7 }
fn default_trunk_width() -> f64 { FOOT_LENGTH }
fn default_trunk_height() -> f64 { 0.3495 }
fn default_pelvis_width() -> f64 { 0.2 / 1.7 }
fn default_leg_length() -> f64 { 0.4791 }
fn default_ankle_length() -> f64 { 0.0451 }
fn default_foot_forward() -> f64 { FOOT_LENGTH / 2.0 }
fn default_foot_backward() -> f64 { FOOT_LENGTH / 4.0 }
fn default_foot_width() -> f64 { FOOT_LENGTH * 8.0 / 50.0 }

impl Default for AnthropometricRatios {
    fn default() -> Self {
        Self {
            neck_length: default_neck_length(),
            shoulder_width: default_shoulder_width(),
            trunk_width: default_trunk_width(),
            trunk_height: default_trunk_height(),
            pelvis_width: default_pelvis_width(),
            leg_length: default_leg_length(),
            ankle_length: default_ankle_length(),
            foot_forward: default_foot_forward(),
            foot_backward: default_foot_backward(),
            foot_width: default_foot_width(),
        }
    }
}

impl AnthropometricRatios {
    fn entries(&self) -> [(&'static str, f64); 10] {
        [
            ("neck_length", self.neck_length),
            ("shoulder_width", self.shoulder_width),
            ("trunk_width", self.trunk_width),
            ("trunk_height", self.trunk_height),
            ("pelvis_width", self.pelvis_width),
            ("leg_length", self.leg_length),
            ("ankle_length", self.ankle_length),
            ("foot_forward", self.foot_forward),
            ("foot_backward", self.foot_backward),
            ("foot_width", self.foot_width),
        ]
    }

    /// 全比率が正の有限値か検証
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.entries() {
            if !(value.is_finite() && value > 0.0) {
                return Err(PoseError::InvalidRatio { name, value });
            }
        }
        Ok(())
    }
}

/// 身長から導出した部位寸法（メートル）
///
/// 生成後は読み取り専用。全フィールドは身長に比例する。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnthropometricProfile {
    height: f64,
    neck_length: f64,
    shoulder_width: f64,
    trunk_width: f64,
    trunk_height: f64,
    pelvis_width: f64,
    leg_length: f64,
    ankle_length: f64,
    foot_forward: f64,
    foot_backward: f64,
    foot_width: f64,
}

/// 身長を比率テーブルで部位寸法に変換
pub fn scale(height: f64, ratios: &AnthropometricRatios) -> Result<AnthropometricProfile> {
    if !(height.is_finite() && height > 0.0) {
        return Err(PoseError::InvalidHeight(height));
    }
    ratios.validate()?;

    Ok(AnthropometricProfile {
        height,
        neck_length: height * ratios.neck_length,
        shoulder_width: height * ratios.shoulder_width,
        trunk_width: height * ratios.trunk_width,
        trunk_height: height * ratios.trunk_height,
        pelvis_width: height * ratios.pelvis_width,
        leg_length: height * ratios.leg_length,
        ankle_length: height * ratios.ankle_length,
        foot_forward: height * ratios.foot_forward,
        foot_backward: height * ratios.foot_backward,
        foot_width: height * ratios.foot_width,
    })
}

impl AnthropometricProfile {
    /// デフォルト比率で作成
    pub fn new(height: f64) -> Result<Self> {
        scale(height, &AnthropometricRatios::default())
    }

    pub fn height(&self) -> f64 { self.height }
    pub fn neck_length(&self) -> f64 { self.neck_length }
    pub fn shoulder_width(&self) -> f64 { self.shoulder_width }
    pub fn trunk_width(&self) -> f64 { self.trunk_width }
    /// 骨盤からC7までの長さ
    pub fn trunk_height(&self) -> f64 { self.trunk_height }
    pub fn pelvis_width(&self) -> f64 { self.pelvis_width }
    /// 股関節から足首まで
    pub fn leg_length(&self) -> f64 { self.leg_length }
    /// 足首から踵までの高さ
    pub fn ankle_length(&self) -> f64 { self.ankle_length }
    pub fn foot_forward(&self) -> f64 { self.foot_forward }
    pub fn foot_backward(&self) -> f64 { self.foot_backward }
    pub fn foot_width(&self) -> f64 { self.foot_width }
}
