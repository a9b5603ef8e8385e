//! Shared utilities: errors, response envelope, logging, validation.

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_created, ok_with_message};
pub use result::AppResult;

/// Current time as unix epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
