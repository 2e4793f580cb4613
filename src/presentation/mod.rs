// Presentation layer - HTTP surface for the rendered dashboard
pub mod app_state;
pub mod handlers;
