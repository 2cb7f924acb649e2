pub mod analytics;
pub mod category;
pub mod chart;
pub mod expense;
pub mod preferences;
