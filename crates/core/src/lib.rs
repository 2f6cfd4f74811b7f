#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod time;

pub use error::Error;
pub use model::batch::{parse_batch, validate_batch};
pub use time::Clock;
