use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_READY_PASS_RATE: f64 = 90.0;
pub const DEFAULT_ATTENTION_PASS_RATE: f64 = 80.0;

/// Pass-rate thresholds (percent) for the readiness tiers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub ready_pass_rate: f64,
    pub attention_pass_rate: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            ready_pass_rate: DEFAULT_READY_PASS_RATE,
            attention_pass_rate: DEFAULT_ATTENTION_PASS_RATE,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);

        if !in_range(self.ready_pass_rate) || !in_range(self.attention_pass_rate) {
            return Err(ConfigError::report(format!(
                "report thresholds must be within 0-100, got ready={} attention={}",
                self.ready_pass_rate, self.attention_pass_rate
            )));
        }

        if self.attention_pass_rate > self.ready_pass_rate {
            return Err(ConfigError::report(format!(
                "report.attention_pass_rate ({}) cannot exceed report.ready_pass_rate ({})",
                self.attention_pass_rate, self.ready_pass_rate
            )));
        }

        Ok(())
    }
}
