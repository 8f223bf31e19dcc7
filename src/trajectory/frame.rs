use nalgebra::{Vector2, Vector3};
use serde::Serialize;

use crate::error::{PoseError, Result};

/// trajectory_data テーブルの列レイアウト
pub mod column {
    pub const FRAME: usize = 0;
    pub const AGENT_ID: usize = 1;
    pub const POS_X: usize = 2;
    pub const ORI_X: usize = 4;
    pub const ORI_Y: usize = 5;
    pub const HEAD_X: usize = 6;
    pub const PELVIS_X: usize = 9;
    pub const HEEL_RIGHT_X: usize = 12;
    pub const HEEL_LEFT_X: usize = 15;
    pub const TOE_RIGHT_X: usize = 18;
    pub const TOE_LEFT_X: usize = 21;
    pub const PELVIS_ROT_Z: usize = 24;
    pub const SHOULDER_ROT_Z: usize = 25;
    pub const TRUNK_ROT_X: usize = 26;
    pub const TRUNK_ROT_Y: usize = 27;

    /// 列数
    pub const COUNT: usize = 28;
}

/// 向きベクトルを正規化できないとみなすノルム
const ORIENTATION_EPSILON: f64 = 1e-9;

/// 1エージェント・1フレーム分の観測状態
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkeletonFrame {
    pub frame: u64,
    pub agent_id: u64,
    /// 平面位置 (pos_x, pos_y)
    pub position: Vector2<f64>,
    /// 進行方向 (ori_x, ori_y)、正規化されているとは限らない
    pub orientation: Vector2<f64>,
    pub head: Vector3<f64>,
    pub pelvis: Vector3<f64>,
    pub heel_right: Vector3<f64>,
    pub heel_left: Vector3<f64>,
    pub toe_right: Vector3<f64>,
    pub toe_left: Vector3<f64>,
    pub pelvis_rotation_z: f64,
    pub shoulder_rotation_z: f64,
    pub trunk_rotation_x: f64,
    pub trunk_rotation_y: f64,
}

fn malformed(row: usize, reason: impl Into<String>) -> PoseError {
    PoseError::MalformedFrame { row, reason: reason.into() }
}

fn id_value(values: &[f64], index: usize, name: &str, row: usize) -> Result<u64> {
    let v = values[index];
    if v < 0.0 || v.fract() != 0.0 || v >= u64::MAX as f64 {
        return Err(malformed(row, format!("{} must be a non-negative integer, got {}", name, v)));
    }
    Ok(v as u64)
}

impl SkeletonFrame {
    /// 列レイアウト通りの行から作成（行番号なし）
    pub fn from_row(values: &[f64]) -> Result<Self> {
        Self::from_row_at(values, 0)
    }

    /// 列レイアウト通りの行から作成
    ///
    /// `row` はエラー報告用の行番号
    pub fn from_row_at(values: &[f64], row: usize) -> Result<Self> {
        if values.len() != column::COUNT {
            return Err(malformed(
                row,
                format!("expected {} columns, got {}", column::COUNT, values.len()),
            ));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(malformed(row, format!("column {} is not finite", i)));
        }

        let vec2 = |i: usize| Vector2::new(values[i], values[i + 1]);
        let vec3 = |i: usize| Vector3::new(values[i], values[i + 1], values[i + 2]);

        Ok(Self {
            frame: id_value(values, column::FRAME, "frame", row)?,
            agent_id: id_value(values, column::AGENT_ID, "agent_id", row)?,
            position: vec2(column::POS_X),
            orientation: vec2(column::ORI_X),
            head: vec3(column::HEAD_X),
            pelvis: vec3(column::PELVIS_X),
            heel_right: vec3(column::HEEL_RIGHT_X),
            heel_left: vec3(column::HEEL_LEFT_X),
            toe_right: vec3(column::TOE_RIGHT_X),
            toe_left: vec3(column::TOE_LEFT_X),
            pelvis_rotation_z: values[column::PELVIS_ROT_Z],
            shoulder_rotation_z: values[column::SHOULDER_ROT_Z],
            trunk_rotation_x: values[column::TRUNK_ROT_X],
            trunk_rotation_y: values[column::TRUNK_ROT_Y],
        })
    }

    /// 列レイアウトの行に戻す
    pub fn to_row(&self) -> [f64; column::COUNT] {
        let mut row = [0.0; column::COUNT];
        row[column::FRAME] = self.frame as f64;
        row[column::AGENT_ID] = self.agent_id as f64;
        row[column::POS_X..column::POS_X + 2].copy_from_slice(self.position.as_slice());
        row[column::ORI_X..column::ORI_X + 2].copy_from_slice(self.orientation.as_slice());
        for (start, v) in [
            (column::HEAD_X, self.head),
            (column::PELVIS_X, self.pelvis),
            (column::HEEL_RIGHT_X, self.heel_right),
            (column::HEEL_LEFT_X, self.heel_left),
            (column::TOE_RIGHT_X, self.toe_right),
            (column::TOE_LEFT_X, self.toe_left),
        ] {
            row[start..start + 3].copy_from_slice(v.as_slice());
        }
        row[column::PELVIS_ROT_Z] = self.pelvis_rotation_z;
        row[column::SHOULDER_ROT_Z] = self.shoulder_rotation_z;
        row[column::TRUNK_ROT_X] = self.trunk_rotation_x;
        row[column::TRUNK_ROT_Y] = self.trunk_rotation_y;
        row
    }

    /// 正規化した向きベクトル
    pub fn unit_orientation(&self) -> Result<Vector2<f64>> {
        let norm = self.orientation.norm();
        if norm < ORIENTATION_EPSILON {
            return Err(PoseError::DegenerateOrientation {
                frame: self.frame,
                agent_id: self.agent_id,
            });
        }
        Ok(self.orientation / norm)
    }
}
