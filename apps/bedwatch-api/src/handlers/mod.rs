//! Handlers 模块

pub mod alerts;
pub mod config;
pub mod hierarchy;
pub mod metrics;
pub mod status;

pub use alerts::*;
pub use config::*;
pub use hierarchy::*;
pub use metrics::*;
pub use status::*;
