pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod session;
pub mod user;


pub use error::ChatError;
pub type Result<T> = std::result::Result<T, ChatError>;
