//! HTTP front door for the Switchyard dispatch gateway.

pub mod api;
pub mod config;
pub mod error;
pub mod telemetry;
