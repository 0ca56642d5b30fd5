//! # Scenario Impact Engine
//!
//! A library for answering small-business "what if" questions with numbers.
//! A free-form question plus whatever figures the owner has supplied so far
//! is classified into a scenario, the missing inputs are identified, and the
//! scenario's financial effect is projected across the calendar year.
//!
//! ## Core Concepts
//!
//! - **Scenario type**: pricing, membership, hiring, marketing, cost cutting, or sales volume
//! - **Classification**: keyword rules pick the scenario, the inputs still needed, and the next question to ask
//! - **Seasonality**: a named demand pattern, start month, and ramp-up that shape the monthly impact curve
//! - **Calculation**: a closed-form baseline projection, merged with the seasonal curve when the question has seasonal context
//!
//! Every operation is a pure function of its arguments: no I/O, no shared
//! state, and no failure path. Missing inputs fall back to defaults and
//! unknown scenarios produce a zero-valued result.
//!
//! ## Example
//!
//! ```rust,ignore
//! use scenario_impact_engine::*;
//!
//! let inputs = UserProvidedInputs::new()
//!     .with(InputField::MonthlyFee, 99.0)
//!     .with(InputField::TargetMembers, 100.0);
//!
//! let classification = classify("Should I launch a membership in September?", &inputs);
//! let result = calculate_scenario(
//!     classification.scenario_type,
//!     &inputs,
//!     DEFAULT_MONTHLY_REVENUE,
//!     Some(&classification),
//! );
//!
//! println!("{}", result.recommendation);
//! ```

pub mod analyzer;
pub mod baseline;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod formulas;
pub mod schema;
pub mod seasonality;
pub mod utils;

pub use analyzer::analyze_seasonal_impact;
pub use baseline::{estimate_monthly_revenue, BaselineEstimate, RevenueEntry};
pub use classifier::ScenarioClassifier;
pub use config::{EngineConfig, DEFAULT_MONTHLY_REVENUE};
pub use engine::{calculate_scenario, ScenarioEngine, ScenarioOutcome};
pub use error::{Result, ScenarioError};
pub use schema::*;
pub use seasonality::{get_pattern_multipliers, peak_and_low_months};

/// Classifies a question using January as the reference month.
///
/// Use [`ScenarioEngine`] with an [`EngineConfig`] to classify relative to another month.
pub fn classify(text: &str, inputs: &UserProvidedInputs) -> ScenarioClassification {
    ScenarioClassifier::default().classify(text, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_then_calculate() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::CurrentPrice, 200.0)
            .with(InputField::NewPrice, 220.0)
            .with(InputField::AvgMonthlySales, 50.0);

        let classification = classify("Raise my prices by 10% in March", &inputs);
        assert_eq!(classification.scenario_type, ScenarioType::Pricing);
        assert_eq!(classification.response_type, ResponseType::DetailedCalculation);
        assert!(classification.is_complete());

        let result = calculate_scenario(
            classification.scenario_type,
            &inputs,
            DEFAULT_MONTHLY_REVENUE,
            Some(&classification),
        );
        let breakdown = result.monthly_breakdown.unwrap();
        assert_eq!(breakdown[0], 0.0);
        assert_eq!(breakdown[1], 0.0);
        // (220 - 200) * 50 at half ramp
        assert_eq!(breakdown[2], 500.0);
        assert_eq!(result.break_even_months, Some(3));
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::HourlyRate, 27.5)
            .with(InputField::HoursPerWeek, 32.0)
            .with(InputField::ProductivityIncrease, 18.0);
        let classification = classify("Hire a technician gradually over the summer", &inputs);

        let first = calculate_scenario(ScenarioType::Hiring, &inputs, 61_250.0, Some(&classification));
        let second = calculate_scenario(ScenarioType::Hiring, &inputs, 61_250.0, Some(&classification));
        assert_eq!(first, second);
        assert_eq!(first.annual_impact.to_bits(), second.annual_impact.to_bits());
    }
}
