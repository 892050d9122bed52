//! In-memory store implementations backed by `dashmap`.
//!
//! Conditional mutations run under the shard lock of the affected entry,
//! which makes each of them atomic with respect to concurrent callers.

pub mod account;
pub mod friendship;
pub mod notification;
pub mod otp;
pub mod profile;
pub mod search;
pub mod token;

pub use account::MemoryAccountRepository;
pub use friendship::MemoryFriendshipRepository;
pub use notification::MemoryNotificationRepository;
pub use otp::MemoryOtpRepository;
pub use profile::MemoryProfileRepository;
pub use search::MemorySearchIndex;
pub use token::MemoryTokenRepository;
