use std::ops::Mul;

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

use crate::skeleton::EulerAngles;

/// 同次変換行列（親フレームから見た子フレームの姿勢）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    matrix: Matrix4<f64>,
}

/// 回転行列 R = Rz(yaw) · Ry(pitch) · Rx(roll)（右手系）
pub fn rotation_matrix(rotation: EulerAngles) -> Matrix3<f64> {
    let (sr, cr) = rotation.roll.sin_cos();
    let (sp, cp) = rotation.pitch.sin_cos();
    let (sy, cy) = rotation.yaw.sin_cos();

    let rot_x = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, cr, -sr,
        0.0, sr, cr,
    );
    let rot_y = Matrix3::new(
        cp, 0.0, sp,
        0.0, 1.0, 0.0,
        -sp, 0.0, cp,
    );
    let rot_z = Matrix3::new(
        cy, -sy, 0.0,
        sy, cy, 0.0,
        0.0, 0.0, 1.0,
    );
    rot_z * rot_y * rot_x
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self { matrix: Matrix4::identity() }
    }

    /// 並進 + (roll, pitch, yaw) から変換行列を構築
    ///
    /// 左上3x3に回転、最終列に並進を入れる
    pub fn build(translation: Vector3<f64>, rotation: EulerAngles) -> Self {
        let r = rotation_matrix(rotation);
        let mut matrix = Matrix4::identity();
        for i in 0..3 {
            for j in 0..3 {
                matrix[(i, j)] = r[(i, j)];
            }
            matrix[(i, 3)] = translation[i];
        }
        Self { matrix }
    }

    /// 純粋な並進
    pub fn translation_only(translation: Vector3<f64>) -> Self {
        Self::build(translation, EulerAngles::ZERO)
    }

    /// self · child（根から葉の順に左から合成）
    pub fn compose(&self, child: &RigidTransform) -> Self {
        Self { matrix: self.matrix * child.matrix }
    }

    /// 点 (x, y, z, 1) を変換
    pub fn apply_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        let p = self.matrix * Vector4::new(point.x, point.y, point.z, 1.0);
        Vector3::new(p[0], p[1], p[2])
    }

    /// 方向ベクトル (x, y, z, 0) を変換（並進なし）
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation() * vector
    }

    /// 子フレーム原点の位置
    pub fn origin(&self) -> Vector3<f64> {
        self.translation()
    }

    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        self.compose(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_zero_rotation_is_translation() {
        let t = RigidTransform::build(Vector3::new(1.0, -2.0, 3.5), EulerAngles::ZERO);
        let p = t.apply_point(&Vector3::zeros());
        assert_eq!(p, Vector3::new(1.0, -2.0, 3.5));
        assert_eq!(t.rotation(), Matrix3::identity());
    }

    #[test]
    fn test_homogeneous_layout() {
        let t = RigidTransform::build(Vector3::new(0.1, 0.2, 0.3), EulerAngles::new(0.3, -0.2, 0.7));
        let m = t.matrix();
        assert_eq!(m[(3, 0)], 0.0);
        assert_eq!(m[(3, 1)], 0.0);
        assert_eq!(m[(3, 2)], 0.0);
        assert_eq!(m[(3, 3)], 1.0);
        assert_eq!(t.origin(), Vector3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_yaw_rotates_x_to_y() {
        let t = RigidTransform::build(Vector3::zeros(), EulerAngles::new(0.0, 0.0, FRAC_PI_2));
        let p = t.apply_point(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_pitch_rotates_z_to_x() {
        // 右手系: Ry(+90°) は z 軸を x 軸へ
        let t = RigidTransform::build(Vector3::zeros(), EulerAngles::new(0.0, FRAC_PI_2, 0.0));
        let p = t.apply_point(&Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(p, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_roll_then_yaw_order() {
        // R = Rz·Ry·Rx: roll が先に適用される
        let r = rotation_matrix(EulerAngles::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        // y --Rx--> z --Rz--> z
        assert_relative_eq!(r * Vector3::y(), Vector3::z(), epsilon = 1e-12);
        // x --Rx--> x --Rz--> y
        assert_relative_eq!(r * Vector3::x(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let r = rotation_matrix(EulerAngles::new(0.4, -1.1, 2.3));
        assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose_matches_mul() {
        let a = RigidTransform::build(Vector3::new(0.0, -0.1, 0.0), EulerAngles::new(0.1, 0.4, 0.0));
        let b = RigidTransform::build(Vector3::new(0.0, 0.0, -0.8), EulerAngles::new(0.0, -0.4, 0.0));
        assert_eq!(a.compose(&b), a * b);
        // 子の原点は親の回転を受ける
        let expected = a.apply_point(&b.origin());
        assert_relative_eq!((a * b).origin(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_vector_ignores_translation() {
        let t = RigidTransform::build(Vector3::new(5.0, 5.0, 5.0), EulerAngles::ZERO);
        assert_eq!(t.apply_vector(&Vector3::x()), Vector3::x());
    }
}
