//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    create_room, delete_room, delete_without_room_id, get_messages, get_room_detail,
    health_check, join_room, leave_room, send_message,
};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
