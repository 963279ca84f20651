//! Browser front end: one input box, one answer region, backed by the askllm bridge.

pub mod http_server;
pub mod page;
