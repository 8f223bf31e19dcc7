pub mod joint;

pub use joint::{EulerAngles, JointAngles, JointIndex, JointPositionTable};
