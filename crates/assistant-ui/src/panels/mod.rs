pub mod chat;
pub mod shop;
pub mod contact;
pub mod settings;
