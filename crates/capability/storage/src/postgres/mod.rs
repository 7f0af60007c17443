//! # PostgreSQL 存储实现模块
//!
//! 生产环境使用的存储实现。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定
//! 2. **只读联表**：床位查询一次性联表科室、医院、就诊、患者，避免 N+1
//! 3. **连接池管理**：使用连接池复用数据库连接
//!
//! ## 包含的实现
//!
//! - **BedStore** (`bed.rs`)：床位联表查询
//! - **AlertStore** (`alert.rs`)：告警写入与查询
//!
//! ## 数据库模式要求
//!
//! 见 `migrations/0001_bedwatch.sql`：
//! - `hospitals`（hospital_id, name）
//! - `departments`（department_id, hospital_id, name）
//! - `patients`（patient_id, first_name, last_name, medical_record_number）
//! - `visits`（visit_id, patient_id, admitted_at, expected_discharge_at, transfer_requested, priority）
//! - `beds`（bed_id, department_id, room_number, bed_number, status, current_visit_id, updated_at）
//! - `alerts`（alert_id, rule_code, severity, subject_id, subject_label, message, value, threshold, raised_at）

pub mod alert;
pub mod bed;

pub use alert::*;
pub use bed::*;
