pub mod analyze;
pub mod app;
pub mod models;
