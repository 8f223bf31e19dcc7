use nalgebra::Vector3;
use serde::Serialize;

use crate::skeleton::{JointIndex, JointPositionTable};

/// 線分ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentLabel {
    /// 右股関節 → 左股関節
    Pelvis,
    /// 右股関節 → 右踵
    RightLeg,
    /// 左股関節 → 左踵
    LeftLeg,
    /// 右踵 → 右爪先
    RightFoot,
    /// 左踵 → 左爪先
    LeftFoot,
    /// 体幹根元 → C7
    Trunk,
    /// 右肩 → 左肩
    Shoulders,
    /// 足首 → 踵（関節テーブル描画用）
    RightAnkle,
    LeftAnkle,
}

impl SegmentLabel {
    /// 線の色 (RGB)
    pub fn color(self) -> u32 {
        match self {
            SegmentLabel::RightFoot | SegmentLabel::RightAnkle => RIGHT_FOOT_COLOR,
            SegmentLabel::LeftFoot | SegmentLabel::LeftAnkle => LEFT_FOOT_COLOR,
            _ => BODY_COLOR,
        }
    }
}

/// 点ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointLabel {
    Head,
}

/// 描画プリミティブ
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Segment {
        label: SegmentLabel,
        start: Vector3<f64>,
        end: Vector3<f64>,
    },
    Point {
        label: PointLabel,
        position: Vector3<f64>,
    },
}

impl Primitive {
    pub fn segment(label: SegmentLabel, start: Vector3<f64>, end: Vector3<f64>) -> Self {
        Primitive::Segment { label, start, end }
    }

    pub fn point(label: PointLabel, position: Vector3<f64>) -> Self {
        Primitive::Point { label, position }
    }

    pub fn segment_label(&self) -> Option<SegmentLabel> {
        match self {
            Primitive::Segment { label, .. } => Some(*label),
            Primitive::Point { .. } => None,
        }
    }
}

/// 関節テーブルの接続定義 (ラベル, 開始関節, 終了関節)
pub const JOINT_CONNECTIONS: [(SegmentLabel, JointIndex, JointIndex); 5] = [
    // 右足
    (SegmentLabel::RightAnkle, JointIndex::RightHeel, JointIndex::RightAnkle),
    (SegmentLabel::RightLeg, JointIndex::RightAnkle, JointIndex::RightHip),
    // 骨盤
    (SegmentLabel::Pelvis, JointIndex::RightHip, JointIndex::LeftHip),
    // 左足
    (SegmentLabel::LeftLeg, JointIndex::LeftHip, JointIndex::LeftAnkle),
    (SegmentLabel::LeftAnkle, JointIndex::LeftAnkle, JointIndex::LeftHeel),
];

/// 関節テーブルを線分列に変換
pub fn project_joints(table: &JointPositionTable) -> Vec<Primitive> {
    JOINT_CONNECTIONS
        .iter()
        .map(|&(label, from, to)| Primitive::segment(label, table.get(from), table.get(to)))
        .collect()
}

/// 体の線の色 (RGB)
pub const BODY_COLOR: u32 = 0x0000FF; // 青

/// 右足の色 (RGB)
pub const RIGHT_FOOT_COLOR: u32 = 0x008000; // 緑

/// 左足の色 (RGB)
pub const LEFT_FOOT_COLOR: u32 = 0xFF0000; // 赤

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::AnthropometricProfile;
    use crate::kinematics::evaluate;
    use crate::skeleton::JointAngles;

    #[test]
    fn test_project_joints() {
        let profile = AnthropometricProfile::new(1.75).unwrap();
        let table = evaluate(&profile, &JointAngles::zero());
        let primitives = project_joints(&table);
        assert_eq!(primitives.len(), 5);

        match primitives[2] {
            Primitive::Segment { label, start, end } => {
                assert_eq!(label, SegmentLabel::Pelvis);
                assert!(((end - start).norm() - profile.pelvis_width()).abs() < 1e-12);
            }
            _ => panic!("expected segment"),
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(SegmentLabel::Pelvis.color(), BODY_COLOR);
        assert_eq!(SegmentLabel::RightFoot.color(), RIGHT_FOOT_COLOR);
        assert_eq!(SegmentLabel::LeftAnkle.color(), LEFT_FOOT_COLOR);
    }

    #[test]
    fn test_serialize_primitive() {
        let p = Primitive::point(PointLabel::Head, Vector3::new(1.0, 2.0, 3.0));
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["kind"], "point");
        assert_eq!(json["label"], "head");
        assert_eq!(json["position"], serde_json::json!([1.0, 2.0, 3.0]));
    }
}
