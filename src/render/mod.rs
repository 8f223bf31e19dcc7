pub mod projector;
pub mod skeleton;

pub use projector::{Landmarks, Projector};
pub use skeleton::{project_joints, PointLabel, Primitive, SegmentLabel, JOINT_CONNECTIONS};
