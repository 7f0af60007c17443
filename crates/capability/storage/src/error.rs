//! 存储层错误类型
//!
//! 床位读取与告警写入共用的错误，封装：
//! - SQL 执行错误
//! - 连接错误
//! - 锁错误
//!
//! 可附带出错的存储操作名（如 `list_beds`），显示为 `list_beds: <原因>`。

#[derive(Debug)]
pub struct StorageError {
    operation: Option<&'static str>,
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            operation: None,
            message: message.into(),
        }
    }

    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn operation(&self) -> Option<&'static str> {
        self.operation
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.operation {
            Some(operation) => write!(f, "{operation}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}
