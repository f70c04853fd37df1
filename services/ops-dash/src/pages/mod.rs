pub mod alerts;
pub mod analytics;
pub mod cameras;
pub mod control_center;
pub mod dashboard;
pub mod incidents;
pub mod live_traffic;
pub mod reports;
pub mod routes;
pub mod settings;
