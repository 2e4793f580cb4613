// Application layer - Data conditioning and the render loop
pub mod axis_range;
pub mod feed_fetcher;
pub mod presenter;
pub mod render_orchestrator;
pub mod render_surface;
pub mod series_conditioner;
pub mod trend_detector;
