pub mod configuration;
pub mod domain;
pub mod mailgun_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
mod utils;

pub mod authentication;
pub mod session_state;

pub use startup::*;
