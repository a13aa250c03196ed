pub mod config;
pub mod error;

pub use config::PictorConfig;
pub use error::{PictorError, Result};
