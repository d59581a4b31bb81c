pub mod ports;
pub mod event_bus;
pub mod store;
pub mod conversation;
