//! 内存存储实现模块
//!
//! 用于本地演示和测试。
//!
//! - BedStore: InMemoryBedStore
//! - AlertStore: InMemoryAlertStore

pub mod alert;
pub mod bed;

pub use alert::*;
pub use bed::*;
