use domain::VariationIntensity;
use std::time::Duration;

/// 实时服务运行配置。
#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeConfig {
    pub refresh_interval: Duration,
    pub enable_variations: bool,
    pub variation_intensity: VariationIntensity,
    pub simulate_errors: bool,
    pub batch_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            enable_variations: false,
            variation_intensity: VariationIntensity::Medium,
            simulate_errors: false,
            batch_size: 500,
        }
    }
}

impl RealtimeConfig {
    pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

    /// 合并部分更新，未给出的字段保持原值。
    pub fn merge(mut self, update: RealtimeConfigUpdate) -> Self {
        if let Some(refresh_interval) = update.refresh_interval {
            self.refresh_interval = refresh_interval;
        }
        if let Some(enable_variations) = update.enable_variations {
            self.enable_variations = enable_variations;
        }
        if let Some(variation_intensity) = update.variation_intensity {
            self.variation_intensity = variation_intensity;
        }
        if let Some(simulate_errors) = update.simulate_errors {
            self.simulate_errors = simulate_errors;
        }
        if let Some(batch_size) = update.batch_size {
            self.batch_size = batch_size;
        }
        self.sanitized()
    }

    pub fn sanitized(mut self) -> Self {
        if self.refresh_interval < Self::MIN_REFRESH_INTERVAL {
            self.refresh_interval = Self::MIN_REFRESH_INTERVAL;
        }
        if self.batch_size == 0 {
            self.batch_size = 1;
        }
        self
    }
}

/// 配置的部分更新。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RealtimeConfigUpdate {
    pub refresh_interval: Option<Duration>,
    pub enable_variations: Option<bool>,
    pub variation_intensity: Option<VariationIntensity>,
    pub simulate_errors: Option<bool>,
    pub batch_size: Option<usize>,
}
