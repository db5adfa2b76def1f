mod collector;
pub mod config;
mod error;
pub mod reduce;
pub mod render;
pub mod row;
mod service;
mod writer;

pub use collector::Collector;
pub use config::Config;
pub use error::{Error, Result};
pub use reduce::ReductionPolicy;
pub use row::DeploymentRow;
pub use service::{run_update, Report};
pub use writer::{to_json, write_report};
