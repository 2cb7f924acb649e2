pub mod analytics_service;
pub mod assistant_service;
pub mod chart_service;
pub mod history_service;
