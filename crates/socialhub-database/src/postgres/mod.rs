//! PostgreSQL store implementations.

pub mod account;
pub mod notification;
pub mod otp;
pub mod token;

pub use account::PgAccountRepository;
pub use notification::PgNotificationRepository;
pub use otp::PgOtpRepository;
pub use token::PgTokenRepository;
