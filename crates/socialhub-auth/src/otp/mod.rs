//! One-time passwords.

pub mod service;

pub use service::OtpService;
