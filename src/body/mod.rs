pub mod anthropometry;

pub use anthropometry::{scale, AnthropometricProfile, AnthropometricRatios};
