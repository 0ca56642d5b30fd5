use crate::error::{Result, ScenarioError};
use crate::utils::MONTHS_PER_YEAR;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MONTHLY_REVENUE: f64 = 50_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    #[schemars(
        description = "Monthly revenue assumed when the caller has no revenue history for the business."
    )]
    pub default_monthly_revenue: f64,

    #[schemars(
        description = "0-based calendar month treated as 'now' (0 = January). Used as the start month when a question names no month, and as the anchor for 'next month'."
    )]
    pub reference_month: u32,

    #[schemars(
        description = "How many of the most recent months of revenue history are averaged into the baseline."
    )]
    pub revenue_lookback_months: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_monthly_revenue: DEFAULT_MONTHLY_REVENUE,
            reference_month: 0,
            revenue_lookback_months: 3,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.default_monthly_revenue.is_finite() || self.default_monthly_revenue < 0.0 {
            return Err(ScenarioError::InvalidConfig(format!(
                "default_monthly_revenue must be a non-negative number, got {}",
                self.default_monthly_revenue
            )));
        }
        if self.reference_month as usize >= MONTHS_PER_YEAR {
            return Err(ScenarioError::InvalidMonth(self.reference_month));
        }
        if self.revenue_lookback_months == 0 {
            return Err(ScenarioError::InvalidConfig(
                "revenue_lookback_months must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
