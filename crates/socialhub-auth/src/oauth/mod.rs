//! OAuth2 provider resolution, user-info retrieval and attribute extraction.

pub mod client;
pub mod provider;

pub use client::OAuthUserInfoClient;
pub use provider::{OAuthProvider, OAuthUserInfo};
