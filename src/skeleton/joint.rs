use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PoseError, Result};

/// 人体モデルの 11 関節インデックス
///
/// 各関節のフレーム原点が置かれる解剖学的ランドマークで命名する。
/// Ankle は下腿の終端（股関節から leg_length 下）、
/// Heel は足首から ankle_length 下・foot_backward 後方の踵点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum JointIndex {
    RightHeel = 0,
    RightAnkle = 1,
    RightHip = 2,
    LeftHip = 3,
    LeftAnkle = 4,
    LeftHeel = 5,
    Pelvis = 6,
    RightShoulder = 7,
    Neck = 8,
    LeftShoulder = 9,
    Head = 10,
}

impl JointIndex {
    pub const COUNT: usize = 11;

    pub const ALL: [JointIndex; Self::COUNT] = [
        Self::RightHeel,
        Self::RightAnkle,
        Self::RightHip,
        Self::LeftHip,
        Self::LeftAnkle,
        Self::LeftHeel,
        Self::Pelvis,
        Self::RightShoulder,
        Self::Neck,
        Self::LeftShoulder,
        Self::Head,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RightHeel => "right_heel",
            Self::RightAnkle => "right_ankle",
            Self::RightHip => "right_hip",
            Self::LeftHip => "left_hip",
            Self::LeftAnkle => "left_ankle",
            Self::LeftHeel => "left_heel",
            Self::Pelvis => "pelvis",
            Self::RightShoulder => "right_shoulder",
            Self::Neck => "neck",
            Self::LeftShoulder => "left_shoulder",
            Self::Head => "head",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|j| j.name() == name)
    }

    /// 左右反対側の関節（体幹中心の関節はそのまま）
    pub fn mirror(self) -> Self {
        match self {
            Self::RightHeel => Self::LeftHeel,
            Self::RightAnkle => Self::LeftAnkle,
            Self::RightHip => Self::LeftHip,
            Self::LeftHip => Self::RightHip,
            Self::LeftAnkle => Self::RightAnkle,
            Self::LeftHeel => Self::RightHeel,
            Self::RightShoulder => Self::LeftShoulder,
            Self::LeftShoulder => Self::RightShoulder,
            other => other,
        }
    }
}

/// 関節回転 (roll=X, pitch=Y, yaw=Z) ラジアン
///
/// 骨盤座標系: x=前後(矢状), y=左右(前額), z=鉛直上向き
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    #[serde(default)]
    pub roll: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub yaw: f64,
}

impl EulerAngles {
    pub const ZERO: Self = Self { roll: 0.0, pitch: 0.0, yaw: 0.0 };

    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// x-z平面で鏡映した回転 (M·R·M, M=diag(1,-1,1))
    pub fn mirrored(self) -> Self {
        Self {
            roll: -self.roll,
            pitch: self.pitch,
            yaw: -self.yaw,
        }
    }
}

impl From<[f64; 3]> for EulerAngles {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// 全関節の回転
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointAngles {
    angles: [EulerAngles; JointIndex::COUNT],
}

impl JointAngles {
    pub fn zero() -> Self {
        Self::default()
    }

    /// 11行 × (roll, pitch, yaw) から作成
    pub fn from_rows(rows: [[f64; 3]; JointIndex::COUNT]) -> Self {
        Self {
            angles: rows.map(EulerAngles::from),
        }
    }

    pub fn get(&self, joint: JointIndex) -> EulerAngles {
        self.angles[joint as usize]
    }

    pub fn set(&mut self, joint: JointIndex, angles: EulerAngles) {
        self.angles[joint as usize] = angles;
    }

    pub fn with(mut self, joint: JointIndex, angles: EulerAngles) -> Self {
        self.set(joint, angles);
        self
    }

    /// `[joints]` テーブルから作成
    ///
    /// ```toml
    /// [joints]
    /// right_hip = { pitch = -0.395 }
    /// ```
    ///
    /// 記載のない関節・成分は 0。未知の関節名はエラー
    pub fn from_toml(content: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct AnglesFile {
            #[serde(default)]
            joints: BTreeMap<String, EulerAngles>,
        }

        let file: AnglesFile = toml::from_str(content)?;
        let mut angles = Self::zero();
        for (name, rotation) in file.joints {
            let joint = JointIndex::from_name(&name).ok_or(PoseError::UnknownJoint(name))?;
            angles.set(joint, rotation);
        }
        Ok(angles)
    }

    /// 左右を入れ替え、各回転を矢状面で鏡映
    pub fn mirrored(&self) -> Self {
        let mut out = Self::zero();
        for joint in JointIndex::ALL {
            out.set(joint, self.get(joint.mirror()).mirrored());
        }
        out
    }
}

/// 骨盤座標系での関節位置
///
/// フレームごとに新しく計算し、作成後は変更しない
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPositionTable {
    positions: [Vector3<f64>; JointIndex::COUNT],
}

impl JointPositionTable {
    pub(crate) fn new(positions: [Vector3<f64>; JointIndex::COUNT]) -> Self {
        Self { positions }
    }

    pub fn get(&self, joint: JointIndex) -> Vector3<f64> {
        self.positions[joint as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointIndex, Vector3<f64>)> + '_ {
        JointIndex::ALL.iter().map(move |&j| (j, self.positions[j as usize]))
    }
}
