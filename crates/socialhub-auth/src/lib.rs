//! # socialhub-auth
//!
//! Authentication for the SocialHub platform.
//!
//! ## Modules
//!
//! - `jwt`: signed claims encoding and decoding
//! - `token`: token issue, validation, revocation and sweeping against the token store
//! - `validator`: the token validation contract with in-process and HTTP implementations
//! - `otp`: one-time password send, verify and sweep
//! - `oauth`: provider resolution, user-info retrieval and attribute extraction
//! - `password`: Argon2id password hashing
//! - `account`: registration, login, logout and profile flows

pub mod account;
pub mod jwt;
pub mod oauth;
pub mod otp;
pub mod password;
pub mod token;
pub mod validator;

pub use account::AuthService;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use oauth::{OAuthProvider, OAuthUserInfo, OAuthUserInfoClient};
pub use otp::OtpService;
pub use password::PasswordHasher;
pub use token::{IssuedToken, TokenService, ValidationResponse};
pub use validator::{LocalTokenValidator, RemoteTokenValidator, TokenValidator};
