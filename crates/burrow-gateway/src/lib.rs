pub mod app;
pub mod cli;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod shutdown;
pub mod state;
pub mod telemetry;
