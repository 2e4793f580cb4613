// Application state for HTTP handlers
use crate::infrastructure::dashboard_view::DashboardView;

#[derive(Clone)]
pub struct AppState {
    pub view: DashboardView,
}
