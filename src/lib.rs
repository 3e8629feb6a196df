pub mod circle;
pub mod error;
pub mod loss;
pub mod plots;
pub mod render;

pub use error::{Error, Result};
