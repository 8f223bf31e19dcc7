pub mod frame;
pub mod reader;
pub mod store;

pub use frame::{column, SkeletonFrame};
pub use reader::TrajectoryReader;
pub use store::{Bounds, Trajectory};
