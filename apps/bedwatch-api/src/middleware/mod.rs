//! 中间件
//!
//! - request_context：请求上下文中间件，注入 request_id/trace_id

pub mod context;

pub use context::*;
