use crate::error::{Result, ScenarioError};
use crate::utils::MONTHS_PER_YEAR;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioType {
    #[schemars(description = "Changing the price charged per sale, job, or service")]
    Pricing,

    #[schemars(description = "Launching or growing a recurring membership or subscription offer")]
    Membership,

    #[schemars(description = "Adding an employee to increase capacity or productivity")]
    Hiring,

    #[schemars(description = "Spending on a campaign to acquire new customers")]
    Marketing,

    #[schemars(description = "Reducing operating costs by a percentage")]
    CostCutting,

    #[schemars(description = "Taking on more jobs or customers at the current price")]
    SalesVolume,

    #[schemars(description = "The question did not match any known scenario")]
    Unknown,
}

impl ScenarioType {
    /// The six scenario types that carry a formula, in classifier priority order.
    pub const KNOWN: [ScenarioType; 6] = [
        ScenarioType::Pricing,
        ScenarioType::Membership,
        ScenarioType::Hiring,
        ScenarioType::Marketing,
        ScenarioType::CostCutting,
        ScenarioType::SalesVolume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::Pricing => "pricing",
            ScenarioType::Membership => "membership",
            ScenarioType::Hiring => "hiring",
            ScenarioType::Marketing => "marketing",
            ScenarioType::CostCutting => "costCutting",
            ScenarioType::SalesVolume => "salesVolume",
            ScenarioType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioType {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "pricing" => Ok(ScenarioType::Pricing),
            "membership" => Ok(ScenarioType::Membership),
            "hiring" => Ok(ScenarioType::Hiring),
            "marketing" => Ok(ScenarioType::Marketing),
            "costcutting" => Ok(ScenarioType::CostCutting),
            "salesvolume" => Ok(ScenarioType::SalesVolume),
            "unknown" => Ok(ScenarioType::Unknown),
            _ => Err(ScenarioError::UnknownScenarioType(s.to_string())),
        }
    }
}

/// Named numeric inputs the engine understands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    CurrentPrice,
    NewPrice,
    AvgMonthlySales,
    CustomerRetention,
    MonthlyFee,
    TargetMembers,
    SetupCost,
    HourlyRate,
    HoursPerWeek,
    ProductivityIncrease,
    TrainingCost,
    CampaignCost,
    ExpectedNewCustomers,
    AvgCustomerValue,
    CurrentCosts,
    CostReduction,
    ImplementationCost,
    AdditionalJobs,
    AvgJobValue,
}

impl InputField {
    pub const ALL: [InputField; 19] = [
        InputField::CurrentPrice,
        InputField::NewPrice,
        InputField::AvgMonthlySales,
        InputField::CustomerRetention,
        InputField::MonthlyFee,
        InputField::TargetMembers,
        InputField::SetupCost,
        InputField::HourlyRate,
        InputField::HoursPerWeek,
        InputField::ProductivityIncrease,
        InputField::TrainingCost,
        InputField::CampaignCost,
        InputField::ExpectedNewCustomers,
        InputField::AvgCustomerValue,
        InputField::CurrentCosts,
        InputField::CostReduction,
        InputField::ImplementationCost,
        InputField::AdditionalJobs,
        InputField::AvgJobValue,
    ];

    /// The wire name used as the key in [`UserProvidedInputs`].
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::CurrentPrice => "currentPrice",
            InputField::NewPrice => "newPrice",
            InputField::AvgMonthlySales => "avgMonthlySales",
            InputField::CustomerRetention => "customerRetention",
            InputField::MonthlyFee => "monthlyFee",
            InputField::TargetMembers => "targetMembers",
            InputField::SetupCost => "setupCost",
            InputField::HourlyRate => "hourlyRate",
            InputField::HoursPerWeek => "hoursPerWeek",
            InputField::ProductivityIncrease => "productivityIncrease",
            InputField::TrainingCost => "trainingCost",
            InputField::CampaignCost => "campaignCost",
            InputField::ExpectedNewCustomers => "expectedNewCustomers",
            InputField::AvgCustomerValue => "avgCustomerValue",
            InputField::CurrentCosts => "currentCosts",
            InputField::CostReduction => "costReduction",
            InputField::ImplementationCost => "implementationCost",
            InputField::AdditionalJobs => "additionalJobs",
            InputField::AvgJobValue => "avgJobValue",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputField {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self> {
        InputField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScenarioError::UnknownInputField(s.to_string()))
    }
}

/// Sparse numeric answers collected from the user, keyed by field wire name.
///
/// The caller owns accumulation across question/answer rounds; the engine
/// only ever reads this map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct UserProvidedInputs(BTreeMap<String, f64>);

impl UserProvidedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: InputField, value: f64) -> Self {
        self.insert(field, value);
        self
    }

    /// Records an answer. A NaN or infinite value clears the field instead,
    /// so it is asked for again.
    pub fn insert(&mut self, field: InputField, value: f64) -> Option<f64> {
        if value.is_finite() {
            self.0.insert(field.as_str().to_string(), value)
        } else {
            self.0.remove(field.as_str())
        }
    }

    /// Returns the value for `field` if present and finite.
    pub fn get(&self, field: InputField) -> Option<f64> {
        self.0
            .get(field.as_str())
            .copied()
            .filter(|v| v.is_finite())
    }

    pub fn value_or(&self, field: InputField, default: f64) -> f64 {
        self.get(field).unwrap_or(default)
    }

    pub fn contains(&self, field: InputField) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns a new map where answers in `later` replace answers in `self`.
    pub fn merged_with(&self, later: &UserProvidedInputs) -> UserProvidedInputs {
        let mut merged = self.0.clone();
        merged.extend(later.0.iter().map(|(k, v)| (k.clone(), *v)));
        UserProvidedInputs(merged)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(UserProvidedInputs);
        serde_json::to_string_pretty(&schema)
    }
}

impl FromIterator<(InputField, f64)> for UserProvidedInputs {
    fn from_iter<I: IntoIterator<Item = (InputField, f64)>>(iter: I) -> Self {
        let mut inputs = UserProvidedInputs::new();
        for (field, value) in iter {
            inputs.insert(field, value);
        }
        inputs
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalPattern {
    #[default]
    #[schemars(description = "No seasonal variation; every month weighs 1.0")]
    Steady,

    #[schemars(description = "Spring peak (April-June), slow December-January")]
    Seasonal,

    #[schemars(description = "Strong November-December peak, quiet January-February")]
    Holiday,

    #[schemars(description = "June-August peak, quiet winter months")]
    Summer,

    #[schemars(description = "December-February peak (heating, snow), quiet summer")]
    Winter,
}

impl SeasonalPattern {
    pub const ALL: [SeasonalPattern; 5] = [
        SeasonalPattern::Steady,
        SeasonalPattern::Seasonal,
        SeasonalPattern::Holiday,
        SeasonalPattern::Summer,
        SeasonalPattern::Winter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalPattern::Steady => "steady",
            SeasonalPattern::Seasonal => "seasonal",
            SeasonalPattern::Holiday => "holiday",
            SeasonalPattern::Summer => "summer",
            SeasonalPattern::Winter => "winter",
        }
    }
}

impl fmt::Display for SeasonalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonalPattern {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self> {
        SeasonalPattern::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScenarioError::UnknownSeasonalPattern(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalityFactors {
    #[schemars(description = "0-based calendar month the change takes effect (0 = January)")]
    pub start_month: u32,

    #[schemars(description = "How many months the change is planned to run (1-12)")]
    pub duration: u32,

    pub seasonal_pattern: SeasonalPattern,

    #[schemars(description = "Months until the change reaches full strength; 0 means immediate")]
    pub ramp_up_months: u32,

    pub peak_months: Vec<u32>,

    pub low_months: Vec<u32>,
}

impl SeasonalityFactors {
    /// Builds validated factors, filling peak and low months from the pattern tables.
    pub fn new(
        start_month: u32,
        duration: u32,
        seasonal_pattern: SeasonalPattern,
        ramp_up_months: u32,
    ) -> Result<Self> {
        let (peak_months, low_months) = crate::seasonality::peak_and_low_months(seasonal_pattern);
        let factors = Self {
            start_month,
            duration,
            seasonal_pattern,
            ramp_up_months,
            peak_months: peak_months.to_vec(),
            low_months: low_months.to_vec(),
        };
        factors.validate()?;
        Ok(factors)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_month as usize >= MONTHS_PER_YEAR {
            return Err(ScenarioError::InvalidMonth(self.start_month));
        }
        if !(1..=MONTHS_PER_YEAR as u32).contains(&self.duration) {
            return Err(ScenarioError::InvalidDuration(self.duration));
        }
        if self.ramp_up_months as usize >= MONTHS_PER_YEAR {
            return Err(ScenarioError::InvalidRampUp(self.ramp_up_months));
        }
        if let Some(bad) = self
            .peak_months
            .iter()
            .chain(self.low_months.iter())
            .find(|m| **m as usize >= MONTHS_PER_YEAR)
        {
            return Err(ScenarioError::InvalidMonth(*bad));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    #[schemars(description = "Exploratory question; answer qualitatively without asking for numbers")]
    QuickRidr,

    #[schemars(description = "Numbers are available or expected; collect inputs and calculate")]
    DetailedCalculation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioClassification {
    pub scenario_type: ScenarioType,
    pub required_inputs: Vec<InputField>,
    pub missing_inputs: Vec<InputField>,
    #[schemars(description = "Prompt for the next missing input; empty when nothing is missing")]
    pub ask_user: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<SeasonalityFactors>,
    pub has_seasonal_context: bool,
    pub response_type: ResponseType,
}

impl ScenarioClassification {
    pub fn is_complete(&self) -> bool {
        self.missing_inputs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalAnalysis {
    pub monthly_impacts: [f64; MONTHS_PER_YEAR],
    pub total_annual_impact: f64,
    #[serde(with = "month_or_minus_one")]
    #[schemars(with = "i32")]
    #[schemars(description = "Index of the first month with positive impact, or -1 when none")]
    pub break_even_month: Option<u32>,
    pub seasonal_recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub old_revenue: f64,
    pub new_revenue: f64,
    #[schemars(description = "Monthly impact as a percentage of current monthly revenue")]
    pub profit_change: f64,
    pub monthly_impact: f64,
    pub annual_impact: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_even_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<f64>,
    pub recommendation: String,
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_analysis: Option<SeasonalAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_breakdown: Option<[f64; MONTHS_PER_YEAR]>,
}

/// Serializes a missing month as `-1`, and reads any negative value back as `None`.
mod month_or_minus_one {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<u32>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(month) => serializer.serialize_i64(i64::from(*month)),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<u32>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(u32::try_from(raw).ok())
    }
}
