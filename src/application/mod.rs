pub mod chart_view;
pub mod detail_view;
pub mod list_view;
pub mod navigation;
pub mod queries;
