//! One-time password entities.

pub mod model;

pub use model::{Otp, OtpStatus, OtpType};
