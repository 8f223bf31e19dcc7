pub mod chain;
pub mod transform;

pub use chain::{evaluate, JointNode, KinematicTree, SegmentOffset, Side};
pub use transform::{rotation_matrix, RigidTransform};
