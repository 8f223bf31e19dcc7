use nalgebra::Vector3;
use serde::Serialize;

use crate::body::AnthropometricProfile;
use crate::error::Result;
use crate::kinematics::RigidTransform;
use crate::render::skeleton::{PointLabel, Primitive, SegmentLabel};
use crate::skeleton::EulerAngles;
use crate::trajectory::SkeletonFrame;

/// 1フレームから復元したワールド座標のランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Landmarks {
    pub right_hip: Vector3<f64>,
    pub left_hip: Vector3<f64>,
    /// 体幹の根元 (pos_x, pos_y, pelvis_z)
    pub trunk_base: Vector3<f64>,
    pub c7: Vector3<f64>,
    pub head: Vector3<f64>,
    pub right_shoulder: Vector3<f64>,
    pub left_shoulder: Vector3<f64>,
    pub heel_right: Vector3<f64>,
    pub heel_left: Vector3<f64>,
    /// 踵の高さに置いた爪先
    pub toe_right: Vector3<f64>,
    pub toe_left: Vector3<f64>,
}

/// 軌跡フレームを描画用の線分・点に変換
///
/// 脚は関節木ではなく、記録済みの骨盤・踵位置と回転角から直接求める
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    profile: AnthropometricProfile,
}

/// z軸回りに回転させた左右の端点
fn lateral_pair(center: Vector3<f64>, angle_z: f64, width: f64) -> (Vector3<f64>, Vector3<f64>) {
    let frame = RigidTransform::build(center, EulerAngles::new(0.0, 0.0, angle_z));
    let half = Vector3::new(width / 2.0, 0.0, 0.0);
    (frame.apply_point(&half), frame.apply_point(&-half))
}

impl Projector {
    pub fn new(profile: AnthropometricProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &AnthropometricProfile {
        &self.profile
    }

    pub fn landmarks(&self, frame: &SkeletonFrame) -> Result<Landmarks> {
        let p = &self.profile;
        let orientation = frame.unit_orientation()?;
        let pelvis = frame.pelvis;

        let (right_hip, left_hip) = lateral_pair(pelvis, frame.pelvis_rotation_z, p.pelvis_width());

        let trunk = p.trunk_height();
        let (tx, ty) = (frame.trunk_rotation_x, frame.trunk_rotation_y);
        let c7 = Vector3::new(
            frame.position.x + orientation.x * ty.sin() * trunk,
            frame.position.y + orientation.y * tx.sin() * trunk,
            pelvis.z + trunk * tx.cos() * ty.cos(),
        );
        let head = c7 + Vector3::new(0.0, 0.0, p.neck_length());

        // 肩は直立時の体幹高さに置く
        let shoulder_center = Vector3::new(c7.x, c7.y, pelvis.z + trunk);
        let (right_shoulder, left_shoulder) =
            lateral_pair(shoulder_center, frame.shoulder_rotation_z, p.shoulder_width());

        let flat_toe = |toe: Vector3<f64>, heel: Vector3<f64>| Vector3::new(toe.x, toe.y, heel.z);

        Ok(Landmarks {
            right_hip,
            left_hip,
            trunk_base: Vector3::new(frame.position.x, frame.position.y, pelvis.z),
            c7,
            head,
            right_shoulder,
            left_shoulder,
            heel_right: frame.heel_right,
            heel_left: frame.heel_left,
            toe_right: flat_toe(frame.toe_right, frame.heel_right),
            toe_left: flat_toe(frame.toe_left, frame.heel_left),
        })
    }

    /// 骨盤、脚、足、体幹、肩、頭の順
    pub fn project(&self, frame: &SkeletonFrame) -> Result<Vec<Primitive>> {
        let l = self.landmarks(frame)?;
        Ok(vec![
            Primitive::segment(SegmentLabel::Pelvis, l.right_hip, l.left_hip),
            Primitive::segment(SegmentLabel::RightLeg, l.right_hip, l.heel_right),
            Primitive::segment(SegmentLabel::LeftLeg, l.left_hip, l.heel_left),
            Primitive::segment(SegmentLabel::RightFoot, l.heel_right, l.toe_right),
            Primitive::segment(SegmentLabel::LeftFoot, l.heel_left, l.toe_left),
            Primitive::segment(SegmentLabel::Trunk, l.trunk_base, l.c7),
            Primitive::segment(SegmentLabel::Shoulders, l.right_shoulder, l.left_shoulder),
            Primitive::point(PointLabel::Head, l.head),
        ])
    }

    /// 複数フレームをまとめて変換。最初の不正フレームで止まる
    pub fn project_all<'a, I>(&self, frames: I) -> Result<Vec<Vec<Primitive>>>
    where
        I: IntoIterator<Item = &'a SkeletonFrame>,
    {
        frames.into_iter().map(|f| self.project(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoseError;
    use crate::trajectory::frame::column;
    use crate::trajectory::frame::tests::sample_row;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn projector() -> Projector {
        Projector::new(AnthropometricProfile::new(1.75).unwrap())
    }

    fn upright_frame() -> SkeletonFrame {
        let mut row = sample_row(1, 1);
        row[column::PELVIS_ROT_Z] = 0.0;
        row[column::SHOULDER_ROT_Z] = 0.0;
        SkeletonFrame::from_row(&row).unwrap()
    }

    #[test]
    fn test_upright_landmarks() {
        let proj = projector();
        let p = *proj.profile();
        let l = proj.landmarks(&upright_frame()).unwrap();

        assert_relative_eq!(l.right_hip, Vector3::new(2.0 + p.pelvis_width() / 2.0, 3.0, 0.95), epsilon = 1e-12);
        assert_relative_eq!(l.left_hip, Vector3::new(2.0 - p.pelvis_width() / 2.0, 3.0, 0.95), epsilon = 1e-12);
        assert_relative_eq!(l.c7, Vector3::new(2.0, 3.0, 0.95 + p.trunk_height()), epsilon = 1e-12);
        assert_relative_eq!(l.head.z - l.c7.z, p.neck_length(), epsilon = 1e-12);
        assert_relative_eq!(l.right_shoulder.z, 0.95 + p.trunk_height(), epsilon = 1e-12);
        assert_relative_eq!((l.right_shoulder - l.left_shoulder).norm(), p.shoulder_width(), epsilon = 1e-12);
    }

    #[test]
    fn test_pelvis_rotation() {
        let proj = projector();
        let mut row = sample_row(1, 1);
        row[column::PELVIS_ROT_Z] = FRAC_PI_2;
        let frame = SkeletonFrame::from_row(&row).unwrap();
        let l = proj.landmarks(&frame).unwrap();
        let half = proj.profile().pelvis_width() / 2.0;
        assert_relative_eq!(l.right_hip, Vector3::new(2.0, 3.0 + half, 0.95), epsilon = 1e-12);
        assert_relative_eq!(l.left_hip, Vector3::new(2.0, 3.0 - half, 0.95), epsilon = 1e-12);
    }

    #[test]
    fn test_trunk_lean() {
        let proj = projector();
        let trunk = proj.profile().trunk_height();
        let mut row = sample_row(1, 1);
        row[column::TRUNK_ROT_Y] = 0.2;
        let frame = SkeletonFrame::from_row(&row).unwrap();
        let l = proj.landmarks(&frame).unwrap();
        // ori = (1, 0): 前傾は x 方向のみ
        assert_relative_eq!(l.c7.x, 2.0 + 0.2f64.sin() * trunk, epsilon = 1e-12);
        assert_relative_eq!(l.c7.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(l.c7.z, 0.95 + trunk * 0.2f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_shoulder_rotation() {
        let proj = projector();
        let p = *proj.profile();
        let mut row = sample_row(1, 1);
        row[column::SHOULDER_ROT_Z] = FRAC_PI_2;
        row[column::TRUNK_ROT_Y] = 0.2;
        let frame = SkeletonFrame::from_row(&row).unwrap();
        let l = proj.landmarks(&frame).unwrap();
        let half = p.shoulder_width() / 2.0;
        let z = 0.95 + p.trunk_height();
        assert_relative_eq!(l.right_shoulder, Vector3::new(l.c7.x, l.c7.y + half, z), epsilon = 1e-12);
        assert_relative_eq!(l.left_shoulder, Vector3::new(l.c7.x, l.c7.y - half, z), epsilon = 1e-12);
        // 骨盤は肩の回転の影響を受けない
        assert_relative_eq!(l.right_hip.y - l.left_hip.y, 2.0 * 0.1f64.sin() * p.pelvis_width() / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trunk_side_lean() {
        let proj = projector();
        let trunk = proj.profile().trunk_height();
        let mut row = sample_row(1, 1);
        row[column::ORI_X] = 0.0;
        row[column::ORI_Y] = 1.0;
        row[column::TRUNK_ROT_X] = 0.15;
        row[column::TRUNK_ROT_Y] = 0.2;
        let frame = SkeletonFrame::from_row(&row).unwrap();
        let l = proj.landmarks(&frame).unwrap();
        // ori = (0, 1): trunk_x の傾きは y 方向、trunk_y は ori_x = 0 で消える
        assert_relative_eq!(l.c7.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(l.c7.y, 3.0 + 0.15f64.sin() * trunk, epsilon = 1e-12);
        assert_relative_eq!(l.c7.z, 0.95 + trunk * 0.15f64.cos() * 0.2f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_orientation_is_normalized() {
        let proj = projector();
        let mut a = sample_row(1, 1);
        a[column::TRUNK_ROT_Y] = 0.3;
        let mut b = a.clone();
        b[column::ORI_X] = 5.0;
        let la = proj.landmarks(&SkeletonFrame::from_row(&a).unwrap()).unwrap();
        let lb = proj.landmarks(&SkeletonFrame::from_row(&b).unwrap()).unwrap();
        assert_relative_eq!(la.c7, lb.c7, epsilon = 1e-12);
    }

    #[test]
    fn test_project_order_and_feet() {
        let primitives = projector().project(&upright_frame()).unwrap();
        let labels: Vec<Option<SegmentLabel>> = primitives.iter().map(|p| p.segment_label()).collect();
        assert_eq!(
            labels,
            vec![
                Some(SegmentLabel::Pelvis),
                Some(SegmentLabel::RightLeg),
                Some(SegmentLabel::LeftLeg),
                Some(SegmentLabel::RightFoot),
                Some(SegmentLabel::LeftFoot),
                Some(SegmentLabel::Trunk),
                Some(SegmentLabel::Shoulders),
                None,
            ]
        );
        match primitives[4] {
            Primitive::Segment { start, end, .. } => {
                assert_eq!(start, Vector3::new(1.9, 3.1, 0.05));
                assert_eq!(end, Vector3::new(2.15, 3.1, 0.05));
            }
            _ => panic!("expected segment"),
        }
    }

    #[test]
    fn test_degenerate_orientation_rejected() {
        let mut row = sample_row(9, 4);
        row[column::ORI_X] = 0.0;
        let frame = SkeletonFrame::from_row(&row).unwrap();
        assert!(matches!(
            projector().project(&frame),
            Err(PoseError::DegenerateOrientation { frame: 9, agent_id: 4 })
        ));
    }

    #[test]
    fn test_project_all_stops_at_error() {
        let good = upright_frame();
        let mut row = sample_row(2, 1);
        row[column::ORI_X] = 0.0;
        let bad = SkeletonFrame::from_row(&row).unwrap();
        let proj = projector();
        assert_eq!(proj.project_all([&good, &good]).unwrap().len(), 2);
        assert!(proj.project_all([&good, &bad]).is_err());
    }
}
