pub mod turn;
pub mod session;
pub mod catalog;
pub mod contact;
pub mod wire;
pub mod event;
pub mod config;
pub mod error;


pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
