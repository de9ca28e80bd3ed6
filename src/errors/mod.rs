pub mod error;

pub use error::{AppError, ChainError, FetchError};
