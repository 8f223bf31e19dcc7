pub mod body;
pub mod config;
pub mod error;
pub mod gait;
pub mod kinematics;
pub mod render;
pub mod skeleton;
pub mod trajectory;

pub use error::{PoseError, Result};
