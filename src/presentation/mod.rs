pub mod app_state;
pub mod handlers;
pub mod render;
pub mod router;
