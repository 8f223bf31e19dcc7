use nalgebra::Vector3;

use crate::body::AnthropometricProfile;
use crate::error::{PoseError, Result};
use crate::kinematics::transform::RigidTransform;
use crate::skeleton::{JointAngles, JointIndex, JointPositionTable};

/// 身体の左右
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    /// 骨盤座標系での y 方向の符号（右 = -y）
    pub fn sign(self) -> f64 {
        match self {
            Side::Right => -1.0,
            Side::Left => 1.0,
        }
    }
}

/// 親フレームからの並進（身体寸法で表現）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentOffset {
    /// 並進なし（ルート）
    Origin,
    /// 骨盤中心から股関節: (0, ±pelvis_width/2, 0)
    Lateral(Side),
    /// 股関節から足首: (0, 0, -leg_length)
    Leg,
    /// 足首から踵: (-foot_backward, 0, -ankle_length)
    Heel,
}

impl SegmentOffset {
    pub fn translation(self, profile: &AnthropometricProfile) -> Vector3<f64> {
        match self {
            SegmentOffset::Origin => Vector3::zeros(),
            SegmentOffset::Lateral(side) => {
                Vector3::new(0.0, side.sign() * profile.pelvis_width() / 2.0, 0.0)
            }
            SegmentOffset::Leg => Vector3::new(0.0, 0.0, -profile.leg_length()),
            SegmentOffset::Heel => {
                Vector3::new(-profile.foot_backward(), 0.0, -profile.ankle_length())
            }
        }
    }
}

/// 関節木のノード
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointNode {
    pub joint: JointIndex,
    /// 親ノードのアリーナ内インデックス（ルートは None）
    pub parent: Option<usize>,
    pub offset: SegmentOffset,
}

/// 関節木（アリーナ + 親インデックス）
///
/// ノードは親が子より前に並ぶ。ルートのフレームは固定（単位行列）。
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicTree {
    nodes: Vec<JointNode>,
}

impl KinematicTree {
    /// ルートのみの木
    pub fn with_root(root: JointIndex) -> Self {
        Self {
            nodes: vec![JointNode {
                joint: root,
                parent: None,
                offset: SegmentOffset::Origin,
            }],
        }
    }

    /// 子ノードを追加してそのインデックスを返す
    ///
    /// 親は既存ノードでなければならない（親が子より前に並ぶ不変条件）
    pub fn add_child(
        &mut self,
        parent: usize,
        joint: JointIndex,
        offset: SegmentOffset,
    ) -> Result<usize> {
        if parent >= self.nodes.len() {
            return Err(PoseError::InvalidTree {
                reason: format!("parent {} is not in the tree", parent),
            });
        }
        if self.find(joint).is_some() {
            return Err(PoseError::InvalidTree {
                reason: format!("joint {} is already in the tree", joint.name()),
            });
        }
        Ok(self.push_node(parent, joint, offset))
    }

    fn push_node(&mut self, parent: usize, joint: JointIndex, offset: SegmentOffset) -> usize {
        self.nodes.push(JointNode {
            joint,
            parent: Some(parent),
            offset,
        });
        self.nodes.len() - 1
    }

    /// 骨盤 → 股関節 → 足首 → 踵（左右）
    pub fn lower_body() -> Self {
        let mut tree = Self::with_root(JointIndex::Pelvis);
        for (side, hip, ankle, heel) in [
            (Side::Right, JointIndex::RightHip, JointIndex::RightAnkle, JointIndex::RightHeel),
            (Side::Left, JointIndex::LeftHip, JointIndex::LeftAnkle, JointIndex::LeftHeel),
        ] {
            let hip_node = tree.push_node(0, hip, SegmentOffset::Lateral(side));
            let ankle_node = tree.push_node(hip_node, ankle, SegmentOffset::Leg);
            tree.push_node(ankle_node, heel, SegmentOffset::Heel);
        }
        tree
    }

    pub fn nodes(&self) -> &[JointNode] {
        &self.nodes
    }

    pub fn find(&self, joint: JointIndex) -> Option<usize> {
        self.nodes.iter().position(|n| n.joint == joint)
    }

    /// 根から指定関節までの関節列
    pub fn path_to(&self, joint: JointIndex) -> Vec<JointIndex> {
        let mut path = Vec::new();
        let mut cursor = self.find(joint);
        while let Some(idx) = cursor {
            path.push(self.nodes[idx].joint);
            cursor = self.nodes[idx].parent;
        }
        path.reverse();
        path
    }

    /// 各ノードのルート座標系での変換
    ///
    /// world[i] = world[parent] · T(offset, angles[joint])
    pub fn world_transforms(
        &self,
        profile: &AnthropometricProfile,
        angles: &JointAngles,
    ) -> Vec<RigidTransform> {
        let mut world: Vec<RigidTransform> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let transform = match node.parent {
                None => RigidTransform::identity(),
                Some(parent) => {
                    let local = RigidTransform::build(
                        node.offset.translation(profile),
                        angles.get(node.joint),
                    );
                    world[parent].compose(&local)
                }
            };
            world.push(transform);
        }
        world
    }

    /// 関節位置テーブルを計算
    ///
    /// 木に含まれない関節はルート原点に置く
    pub fn evaluate(
        &self,
        profile: &AnthropometricProfile,
        angles: &JointAngles,
    ) -> JointPositionTable {
        let mut positions = [Vector3::zeros(); JointIndex::COUNT];
        for (node, transform) in self.nodes.iter().zip(self.world_transforms(profile, angles)) {
            positions[node.joint as usize] = transform.origin();
        }
        JointPositionTable::new(positions)
    }
}

/// 下半身の関節木で評価
pub fn evaluate(profile: &AnthropometricProfile, angles: &JointAngles) -> JointPositionTable {
    KinematicTree::lower_body().evaluate(profile, angles)
}
