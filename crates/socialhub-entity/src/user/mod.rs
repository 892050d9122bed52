//! User domain entities.

pub mod account;
pub mod profile;

pub use account::{NewAccount, UserAccount};
pub use profile::UserProfile;
