//! Account registration, login and profile flows.

pub mod dto;
pub mod service;

pub use dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest,
};
pub use service::AuthService;
