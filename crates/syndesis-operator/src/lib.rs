pub mod config;
pub mod context;
pub mod error;
pub mod legacy;
pub mod metrics;
pub mod registry;
pub mod server;
pub mod telemetry;
pub mod versions;
pub mod writer;
