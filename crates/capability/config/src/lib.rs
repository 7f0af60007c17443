//! 应用运行配置加载。

use domain::VariationIntensity;
use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 未设置时使用内存演示数据源。
    pub database_url: Option<String>,
    pub organization_id: String,
    pub organization_name: String,
    pub refresh_interval_ms: u64,
    pub enable_variations: bool,
    pub variation_intensity: VariationIntensity,
    pub simulate_errors: bool,
    pub batch_size: usize,
    pub potential_discharge_days: u32,
    pub alerts_enabled: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr =
            env::var("BEDWATCH_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let database_url = read_optional("BEDWATCH_DATABASE_URL");
        let organization_id =
            env::var("BEDWATCH_ORGANIZATION_ID").unwrap_or_else(|_| "org".to_string());
        let organization_name = env::var("BEDWATCH_ORGANIZATION_NAME")
            .unwrap_or_else(|_| "Hospital Network".to_string());
        let refresh_interval_ms = read_u64_with_default("BEDWATCH_REFRESH_INTERVAL_MS", 30_000)?;
        let enable_variations = read_bool_with_default("BEDWATCH_ENABLE_VARIATIONS", false);
        let variation_intensity = read_intensity_with_default(
            "BEDWATCH_VARIATION_INTENSITY",
            VariationIntensity::Medium,
        )?;
        let simulate_errors = read_bool_with_default("BEDWATCH_SIMULATE_ERRORS", false);
        let batch_size = read_u64_with_default("BEDWATCH_BATCH_SIZE", 500)? as usize;
        let potential_discharge_days =
            read_u32_with_default("BEDWATCH_POTENTIAL_DISCHARGE_DAYS", 5)?;
        let alerts_enabled = read_bool_with_default("BEDWATCH_ALERTS", true);

        Ok(Self {
            http_addr,
            database_url,
            organization_id,
            organization_name,
            refresh_interval_ms,
            enable_variations,
            variation_intensity,
            simulate_errors,
            batch_size,
            potential_discharge_days,
            alerts_enabled,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u32_with_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_intensity_with_default(
    key: &str,
    default: VariationIntensity,
) -> Result<VariationIntensity, ConfigError> {
    let value = match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => return Ok(default),
    };
    value
        .parse::<VariationIntensity>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
