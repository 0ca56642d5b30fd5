use crate::analyzer::analyze_seasonal_impact;
use crate::baseline::{estimate_monthly_revenue, BaselineEstimate, RevenueEntry};
use crate::classifier::ScenarioClassifier;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::formulas::{insufficient_information, scenario_formula};
use crate::schema::{
    CalculationResult, ScenarioClassification, ScenarioType, SeasonalAnalysis,
    SeasonalityFactors, UserProvidedInputs,
};
use crate::utils::month_name;
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Computes the baseline projection for a scenario and, when the
/// classification carries seasonal context, folds the seasonal curve into it.
pub fn calculate_scenario(
    scenario: ScenarioType,
    inputs: &UserProvidedInputs,
    current_monthly_revenue: f64,
    classification: Option<&ScenarioClassification>,
) -> CalculationResult {
    let current_monthly_revenue = if current_monthly_revenue.is_finite() {
        current_monthly_revenue
    } else {
        0.0
    };

    let Some(formula) = scenario_formula(scenario) else {
        info!("No formula for {} scenario; returning empty result", scenario);
        return insufficient_information();
    };

    let result = formula(inputs, current_monthly_revenue);
    info!(
        "Calculated {} scenario: {:.2}/month on a {:.2}/month baseline",
        scenario, result.monthly_impact, current_monthly_revenue
    );

    let seasonality = classification
        .filter(|c| c.has_seasonal_context)
        .and_then(|c| c.seasonality.as_ref());

    match seasonality {
        Some(factors) => {
            let analysis =
                analyze_seasonal_impact(scenario, inputs, factors, current_monthly_revenue);
            merge_seasonal_analysis(result, analysis)
        }
        None => result,
    }
}

fn merge_seasonal_analysis(
    mut result: CalculationResult,
    analysis: SeasonalAnalysis,
) -> CalculationResult {
    debug!(
        "Merging seasonal analysis: annual impact {:.2} -> {:.2}",
        result.annual_impact, analysis.total_annual_impact
    );

    result.monthly_breakdown = Some(analysis.monthly_impacts);
    result.annual_impact = analysis.total_annual_impact;
    result.break_even_months = analysis.break_even_month.map(|month| month + 1);

    if let Some(month) = analysis.break_even_month {
        result.recommendation.push_str(&format!(
            " Accounting for seasonality, the change turns positive in {}.",
            month_name(month)
        ));
    }
    if let Some(risk) = analysis.risk_factors.first() {
        result.recommendation.push_str(&format!(" Watch out: {}", risk));
    }
    if let Some(opportunity) = analysis.opportunities.first() {
        result
            .recommendation
            .push_str(&format!(" Opportunity: {}", opportunity));
    }

    result
        .details
        .extend(analysis.seasonal_recommendations.iter().take(2).cloned());
    result.seasonal_analysis = Some(analysis);
    result
}

/// Everything a coaching moment records about one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub classification: ScenarioClassification,
    pub result: CalculationResult,
}

impl ScenarioOutcome {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = schemars::schema_for!(ScenarioOutcome);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

/// The full classify, analyze, calculate pipeline bound to one configuration.
pub struct ScenarioEngine {
    config: EngineConfig,
    classifier: ScenarioClassifier,
}

impl Default for ScenarioEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            classifier: ScenarioClassifier::new(config.reference_month),
            config,
        }
    }
}

impl ScenarioEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: ScenarioClassifier::new(config.reference_month),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn revenue_or_default(&self, current_monthly_revenue: Option<f64>) -> f64 {
        current_monthly_revenue.unwrap_or(self.config.default_monthly_revenue)
    }

    pub fn classify(&self, text: &str, inputs: &UserProvidedInputs) -> ScenarioClassification {
        self.classifier.classify(text, inputs)
    }

    pub fn analyze(
        &self,
        scenario: ScenarioType,
        inputs: &UserProvidedInputs,
        seasonality: &SeasonalityFactors,
        current_monthly_revenue: Option<f64>,
    ) -> SeasonalAnalysis {
        analyze_seasonal_impact(
            scenario,
            inputs,
            seasonality,
            self.revenue_or_default(current_monthly_revenue),
        )
    }

    pub fn calculate(
        &self,
        scenario: ScenarioType,
        inputs: &UserProvidedInputs,
        current_monthly_revenue: Option<f64>,
        classification: Option<&ScenarioClassification>,
    ) -> CalculationResult {
        calculate_scenario(
            scenario,
            inputs,
            self.revenue_or_default(current_monthly_revenue),
            classification,
        )
    }

    /// Derives the revenue baseline from stored entries, falling back to the configured default.
    pub fn baseline(&self, entries: &[RevenueEntry]) -> BaselineEstimate {
        estimate_monthly_revenue(
            entries,
            self.config.revenue_lookback_months,
            self.config.default_monthly_revenue,
        )
    }

    pub fn evaluate(
        &self,
        text: &str,
        inputs: &UserProvidedInputs,
        current_monthly_revenue: Option<f64>,
    ) -> ScenarioOutcome {
        let classification = self.classify(text, inputs);
        let result = self.calculate(
            classification.scenario_type,
            inputs,
            current_monthly_revenue,
            Some(&classification),
        );
        ScenarioOutcome {
            classification,
            result,
        }
    }
}
