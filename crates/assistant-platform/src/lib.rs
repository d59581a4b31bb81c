//! Browser adapters for the assistant-core ports.

pub mod storage;
pub mod http;
