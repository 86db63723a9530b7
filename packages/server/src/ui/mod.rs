//! HTTP and WebSocket surface of a server node.

mod error;
mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{Node, create_app, run};
pub use signal::shutdown_signal;
