//! Repository traits.

pub mod account;
pub mod friendship;
pub mod notification;
pub mod otp;
pub mod profile;
pub mod search;
pub mod token;

pub use account::AccountRepository;
pub use friendship::FriendshipRepository;
pub use notification::NotificationRepository;
pub use otp::OtpRepository;
pub use profile::ProfileRepository;
pub use search::SearchIndex;
pub use token::TokenRepository;
