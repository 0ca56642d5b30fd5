//! Closed-form financial formulas, one per scenario type.
//!
//! Two tables live here: the calculator's baseline projection for each
//! scenario, and the flat monthly impact the seasonality analyzer spreads
//! across the year. Missing inputs fall back to [`default_value`] so a
//! projection can always be produced.

use crate::schema::{CalculationResult, InputField, ScenarioType, UserProvidedInputs};
use crate::utils::{format_currency, ratio_or_zero, MONTHS_PER_YEAR};

pub const INSUFFICIENT_INFORMATION: &str =
    "I need more information about this decision before I can calculate its impact.";

const WEEKS_PER_MONTH: f64 = 52.0 / 12.0;

pub type ScenarioFormula = fn(&UserProvidedInputs, f64) -> CalculationResult;
pub type ImpactFormula = fn(&UserProvidedInputs, f64) -> f64;

struct FormulaEntry {
    scenario: ScenarioType,
    projection: ScenarioFormula,
    monthly_impact: ImpactFormula,
}

const FORMULAS: [FormulaEntry; 6] = [
    FormulaEntry {
        scenario: ScenarioType::Pricing,
        projection: pricing_scenario,
        monthly_impact: pricing_monthly_impact,
    },
    FormulaEntry {
        scenario: ScenarioType::Membership,
        projection: membership_scenario,
        monthly_impact: membership_monthly_impact,
    },
    FormulaEntry {
        scenario: ScenarioType::Hiring,
        projection: hiring_scenario,
        monthly_impact: hiring_monthly_impact,
    },
    FormulaEntry {
        scenario: ScenarioType::Marketing,
        projection: marketing_scenario,
        monthly_impact: marketing_monthly_impact,
    },
    FormulaEntry {
        scenario: ScenarioType::CostCutting,
        projection: cost_cutting_scenario,
        monthly_impact: cost_cutting_monthly_impact,
    },
    FormulaEntry {
        scenario: ScenarioType::SalesVolume,
        projection: sales_volume_scenario,
        monthly_impact: sales_volume_monthly_impact,
    },
];

/// Looks up the baseline projection formula; `None` for [`ScenarioType::Unknown`].
pub fn scenario_formula(scenario: ScenarioType) -> Option<ScenarioFormula> {
    FORMULAS
        .iter()
        .find(|entry| entry.scenario == scenario)
        .map(|entry| entry.projection)
}

/// Flat (pre-seasonality) monthly impact. Unknown scenarios contribute nothing.
pub fn base_monthly_impact(
    scenario: ScenarioType,
    inputs: &UserProvidedInputs,
    current_monthly_revenue: f64,
) -> f64 {
    FORMULAS
        .iter()
        .find(|entry| entry.scenario == scenario)
        .map(|entry| (entry.monthly_impact)(inputs, current_monthly_revenue))
        .unwrap_or(0.0)
}

/// Value substituted when a field was never answered.
pub fn default_value(field: InputField) -> f64 {
    match field {
        InputField::AvgMonthlySales => 10.0,
        InputField::CustomerRetention => 95.0,
        InputField::HourlyRate => 25.0,
        InputField::HoursPerWeek => 40.0,
        InputField::ProductivityIncrease => 15.0,
        InputField::CostReduction => 10.0,
        _ => 0.0,
    }
}

fn input(inputs: &UserProvidedInputs, field: InputField) -> f64 {
    inputs.value_or(field, default_value(field))
}

pub fn insufficient_information() -> CalculationResult {
    CalculationResult {
        old_revenue: 0.0,
        new_revenue: 0.0,
        profit_change: 0.0,
        monthly_impact: 0.0,
        annual_impact: 0.0,
        break_even_months: None,
        roi: None,
        recommendation: INSUFFICIENT_INFORMATION.to_string(),
        details: Vec::new(),
        seasonal_analysis: None,
        monthly_breakdown: None,
    }
}

/// Shared shape of every baseline projection.
struct Projection {
    monthly_impact: f64,
    /// Monthly revenue the profit change is measured against.
    profit_base: f64,
    annual_revenue_change: f64,
    break_even_months: Option<u32>,
    roi: Option<f64>,
    recommendation: &'static str,
    details: Vec<String>,
}

impl Projection {
    fn into_result(self, current_monthly_revenue: f64) -> CalculationResult {
        let old_revenue = current_monthly_revenue * MONTHS_PER_YEAR as f64;
        CalculationResult {
            old_revenue,
            new_revenue: old_revenue + self.annual_revenue_change,
            profit_change: ratio_or_zero(self.monthly_impact, self.profit_base) * 100.0,
            monthly_impact: self.monthly_impact,
            annual_impact: self.monthly_impact * MONTHS_PER_YEAR as f64,
            break_even_months: self.break_even_months,
            roi: self.roi,
            recommendation: self.recommendation.to_string(),
            details: self.details,
            seasonal_analysis: None,
            monthly_breakdown: None,
        }
    }
}

/// Months needed to recover an upfront cost; `None` when there is nothing
/// to recover or the change never pays back.
fn payback_months(upfront_cost: f64, monthly_impact: f64) -> Option<u32> {
    if upfront_cost > 0.0 && monthly_impact > 0.0 {
        Some((upfront_cost / monthly_impact).ceil() as u32)
    } else {
        None
    }
}

// --- pricing ---

fn pricing_monthly_impact(inputs: &UserProvidedInputs, _current: f64) -> f64 {
    let current_price = input(inputs, InputField::CurrentPrice);
    let new_price = inputs.value_or(InputField::NewPrice, current_price);
    (new_price - current_price) * input(inputs, InputField::AvgMonthlySales)
}

fn pricing_scenario(inputs: &UserProvidedInputs, current: f64) -> CalculationResult {
    let current_price = input(inputs, InputField::CurrentPrice);
    let new_price = inputs.value_or(InputField::NewPrice, current_price);
    let sales = input(inputs, InputField::AvgMonthlySales);
    let retention_pct = input(inputs, InputField::CustomerRetention);

    let monthly_impact = new_price * sales * (retention_pct / 100.0) - current_price * sales;
    let price_change_pct = ratio_or_zero(new_price - current_price, current_price) * 100.0;

    let recommendation = if monthly_impact <= 0.0 {
        "At this retention level the new price earns less than today; keep current pricing or add value before raising it."
    } else if price_change_pct > 20.0 {
        "The increase is profitable on paper but steep; test it with new customers first to protect retention."
    } else {
        "This price change looks sound; explain the added value so existing customers stay."
    };

    Projection {
        monthly_impact,
        profit_base: current_price * sales,
        annual_revenue_change: monthly_impact * MONTHS_PER_YEAR as f64,
        break_even_months: None,
        roi: None,
        recommendation,
        details: vec![
            format!(
                "Current price {} across {} sales per month",
                format_currency(current_price),
                sales
            ),
            format!(
                "New price {} with {}% customer retention",
                format_currency(new_price),
                retention_pct
            ),
            format!("Net monthly change: {}", format_currency(monthly_impact)),
        ],
    }
    .into_result(current)
}

// --- membership ---

fn membership_monthly_impact(inputs: &UserProvidedInputs, _current: f64) -> f64 {
    input(inputs, InputField::MonthlyFee) * input(inputs, InputField::TargetMembers)
}

fn membership_scenario(inputs: &UserProvidedInputs, current: f64) -> CalculationResult {
    let fee = input(inputs, InputField::MonthlyFee);
    let members = input(inputs, InputField::TargetMembers);
    let setup_cost = input(inputs, InputField::SetupCost);

    let monthly_impact = membership_monthly_impact(inputs, current);
    let break_even_months = payback_months(setup_cost, monthly_impact);
    let revenue_share = ratio_or_zero(monthly_impact, current);

    let recommendation = if monthly_impact <= 0.0 {
        "Set a membership price and a member target to see the recurring revenue this could add."
    } else if revenue_share >= 0.1 {
        "Recurring membership revenue would add meaningful, predictable income; this is worth launching."
    } else {
        "The membership adds modest recurring revenue; treat it as a loyalty tool rather than a growth engine."
    };

    let payback = match break_even_months {
        Some(months) => format!("recovered in {} months", months),
        None if setup_cost <= 0.0 => "nothing to recover".to_string(),
        None => "not recovered".to_string(),
    };

    Projection {
        monthly_impact,
        profit_base: current,
        annual_revenue_change: monthly_impact * MONTHS_PER_YEAR as f64,
        break_even_months,
        roi: None,
        recommendation,
        details: vec![
            format!("Monthly fee: {}", format_currency(fee)),
            format!("Target members: {}", members),
            format!("Setup cost: {} ({})", format_currency(setup_cost), payback),
        ],
    }
    .into_result(current)
}

// --- hiring ---

fn monthly_labor_cost(inputs: &UserProvidedInputs) -> f64 {
    input(inputs, InputField::HourlyRate) * input(inputs, InputField::HoursPerWeek) * WEEKS_PER_MONTH
}

fn hiring_monthly_impact(inputs: &UserProvidedInputs, current: f64) -> f64 {
    let revenue_gain = current * input(inputs, InputField::ProductivityIncrease) / 100.0;
    revenue_gain - monthly_labor_cost(inputs)
}

fn hiring_scenario(inputs: &UserProvidedInputs, current: f64) -> CalculationResult {
    let hourly_rate = input(inputs, InputField::HourlyRate);
    let hours = input(inputs, InputField::HoursPerWeek);
    let productivity_pct = input(inputs, InputField::ProductivityIncrease);

    let labor_cost = monthly_labor_cost(inputs);
    let revenue_gain = current * productivity_pct / 100.0;
    let monthly_impact = revenue_gain - labor_cost;

    // Onboarding defaults to one month of wages.
    let training_cost = inputs.value_or(InputField::TrainingCost, labor_cost);
    let break_even_months = payback_months(training_cost, monthly_impact);

    let coverage = ratio_or_zero(revenue_gain, labor_cost);
    let recommendation = if coverage >= 1.5 {
        "The added output comfortably covers the wage; this hire should pay for itself."
    } else if coverage >= 1.0 {
        "The hire roughly pays for itself; make sure the role frees you for higher-value work."
    } else {
        "The hire costs more than the revenue it adds right now; consider part-time help or a contractor first."
    };

    Projection {
        monthly_impact,
        profit_base: current,
        annual_revenue_change: revenue_gain * MONTHS_PER_YEAR as f64,
        break_even_months,
        roi: None,
        recommendation,
        details: vec![
            format!(
                "Labor cost: {} per month ({}/hour at {} hours/week)",
                format_currency(labor_cost),
                format_currency(hourly_rate),
                hours
            ),
            format!(
                "Productivity increase: {}% worth {} per month",
                productivity_pct,
                format_currency(revenue_gain)
            ),
            format!("Net monthly impact: {}", format_currency(monthly_impact)),
        ],
    }
    .into_result(current)
}

// --- marketing ---

fn marketing_monthly_impact(inputs: &UserProvidedInputs, _current: f64) -> f64 {
    input(inputs, InputField::ExpectedNewCustomers) * input(inputs, InputField::AvgCustomerValue)
        - input(inputs, InputField::CampaignCost)
}

fn marketing_scenario(inputs: &UserProvidedInputs, current: f64) -> CalculationResult {
    let campaign_cost = input(inputs, InputField::CampaignCost);
    let new_customers = input(inputs, InputField::ExpectedNewCustomers);
    let customer_value = input(inputs, InputField::AvgCustomerValue);

    let new_revenue = new_customers * customer_value;
    let monthly_impact = new_revenue - campaign_cost;
    let roi = if campaign_cost > 0.0 {
        Some((new_revenue - campaign_cost) / campaign_cost * 100.0)
    } else {
        None
    };

    let recommendation = match roi {
        None if new_revenue > 0.0 => {
            "No campaign spend entered, so any new customers are pure upside; confirm the true cost."
        }
        None => "Enter the campaign cost and expected customers to estimate the return.",
        Some(r) if r >= 200.0 => "Excellent return; scale this campaign if early results hold.",
        Some(r) if r >= 50.0 => "Solid return; run it and track cost per new customer closely.",
        Some(r) if r > 0.0 => "Thin margin; test a smaller budget before committing fully.",
        Some(_) => "The campaign loses money at these numbers; rework the targeting or the offer.",
    };

    Projection {
        monthly_impact,
        profit_base: current,
        annual_revenue_change: new_revenue * MONTHS_PER_YEAR as f64,
        break_even_months: None,
        roi,
        recommendation,
        details: vec![
            format!("Campaign cost: {} per month", format_currency(campaign_cost)),
            format!(
                "Expected new customers: {} worth {} each",
                new_customers,
                format_currency(customer_value)
            ),
            format!("Net monthly impact: {}", format_currency(monthly_impact)),
        ],
    }
    .into_result(current)
}

// --- cost cutting ---

fn cost_cutting_monthly_impact(inputs: &UserProvidedInputs, _current: f64) -> f64 {
    input(inputs, InputField::CurrentCosts) * input(inputs, InputField::CostReduction) / 100.0
}

fn cost_cutting_scenario(inputs: &UserProvidedInputs, current: f64) -> CalculationResult {
    let current_costs = input(inputs, InputField::CurrentCosts);
    let reduction_pct = input(inputs, InputField::CostReduction);
    let implementation_cost = input(inputs, InputField::ImplementationCost);

    let monthly_impact = cost_cutting_monthly_impact(inputs, current);
    let break_even_months = payback_months(implementation_cost, monthly_impact);

    let recommendation = if monthly_impact <= 0.0 {
        "Enter your current monthly costs and the planned reduction to size the savings."
    } else if reduction_pct > 30.0 {
        "Cuts this deep can hurt service quality; phase them in and watch customer satisfaction."
    } else {
        "These savings drop straight to profit; lock them in."
    };

    Projection {
        monthly_impact,
        profit_base: current,
        // Revenue is unchanged; the savings show up as profit.
        annual_revenue_change: 0.0,
        break_even_months,
        roi: None,
        recommendation,
        details: vec![
            format!("Current costs: {} per month", format_currency(current_costs)),
            format!(
                "Reduction: {}% saving {} per month",
                reduction_pct,
                format_currency(monthly_impact)
            ),
            format!("Implementation cost: {}", format_currency(implementation_cost)),
        ],
    }
    .into_result(current)
}

// --- sales volume ---

fn sales_volume_monthly_impact(inputs: &UserProvidedInputs, _current: f64) -> f64 {
    input(inputs, InputField::AdditionalJobs) * input(inputs, InputField::AvgJobValue)
}

fn sales_volume_scenario(inputs: &UserProvidedInputs, current: f64) -> CalculationResult {
    let jobs = input(inputs, InputField::AdditionalJobs);
    let job_value = input(inputs, InputField::AvgJobValue);

    let monthly_impact = sales_volume_monthly_impact(inputs, current);
    let growth = ratio_or_zero(monthly_impact, current);

    let recommendation = if monthly_impact <= 0.0 {
        "Enter the additional jobs and average job value to project the growth."
    } else if growth > 0.25 {
        "That is a big jump in volume; confirm you have the capacity and staff before chasing it."
    } else {
        "Extra volume at current prices is a healthy way to grow."
    };

    Projection {
        monthly_impact,
        profit_base: current,
        annual_revenue_change: monthly_impact * MONTHS_PER_YEAR as f64,
        break_even_months: None,
        roi: None,
        recommendation,
        details: vec![
            format!("Additional jobs: {} per month", jobs),
            format!("Average job value: {}", format_currency(job_value)),
            format!("Added monthly revenue: {}", format_currency(monthly_impact)),
        ],
    }
    .into_result(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_every_known_type_has_formula() {
        for scenario in ScenarioType::KNOWN {
            assert!(scenario_formula(scenario).is_some(), "{} has no formula", scenario);
        }
        assert!(scenario_formula(ScenarioType::Unknown).is_none());
    }

    #[test]
    fn test_pricing_with_retention() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::CurrentPrice, 1000.0)
            .with(InputField::NewPrice, 1100.0)
            .with(InputField::AvgMonthlySales, 10.0)
            .with(InputField::CustomerRetention, 95.0);

        let result = pricing_scenario(&inputs, 50_000.0);
        assert!(close(result.monthly_impact, 450.0));
        assert!(close(result.annual_impact, 5400.0));
        assert!(close(result.profit_change, 4.5));
        assert!(close(result.old_revenue, 600_000.0));
        assert!(close(result.new_revenue, 605_400.0));
        assert_eq!(result.details.len(), 3);
        assert!(result.break_even_months.is_none());
    }

    #[test]
    fn test_pricing_uses_default_sales_volume() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::CurrentPrice, 100.0)
            .with(InputField::NewPrice, 110.0)
            .with(InputField::CustomerRetention, 100.0);
        let result = pricing_scenario(&inputs, 50_000.0);
        assert!(close(result.monthly_impact, 100.0));
    }

    #[test]
    fn test_membership_break_even() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::MonthlyFee, 99.0)
            .with(InputField::TargetMembers, 100.0)
            .with(InputField::SetupCost, 20_000.0);

        let result = membership_scenario(&inputs, 50_000.0);
        assert!(close(result.monthly_impact, 9900.0));
        assert_eq!(result.break_even_months, Some(3));
        assert!(result.roi.is_none());
    }

    #[test]
    fn test_no_upfront_cost_has_no_payback_period() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::MonthlyFee, 99.0)
            .with(InputField::TargetMembers, 100.0);
        let result = membership_scenario(&inputs, 50_000.0);
        assert_eq!(result.break_even_months, None);
        assert_eq!(result.details[2], "Setup cost: $0 (nothing to recover)");

        let inputs = UserProvidedInputs::new()
            .with(InputField::CurrentCosts, 20_000.0)
            .with(InputField::CostReduction, 10.0);
        assert_eq!(cost_cutting_scenario(&inputs, 50_000.0).break_even_months, None);

        assert_eq!(payback_months(0.0, 500.0), None);
        assert_eq!(payback_months(-100.0, 500.0), None);
        assert_eq!(payback_months(1200.0, 500.0), Some(3));
    }

    #[test]
    fn test_hiring_labor_cost() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::HourlyRate, 30.0)
            .with(InputField::HoursPerWeek, 40.0)
            .with(InputField::ProductivityIncrease, 20.0);

        let result = hiring_scenario(&inputs, 50_000.0);
        let labor = 30.0 * 40.0 * 52.0 / 12.0;
        assert!(close(result.monthly_impact, 10_000.0 - labor));
        assert!(result.break_even_months.is_some());
        assert!(result.recommendation.contains("pay for itself"));
    }

    #[test]
    fn test_hiring_losing_money_has_no_break_even() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::HourlyRate, 50.0)
            .with(InputField::HoursPerWeek, 40.0)
            .with(InputField::ProductivityIncrease, 5.0);

        let result = hiring_scenario(&inputs, 50_000.0);
        assert!(result.monthly_impact < 0.0);
        assert_eq!(result.break_even_months, None);
    }

    #[test]
    fn test_marketing_roi() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::CampaignCost, 2000.0)
            .with(InputField::ExpectedNewCustomers, 20.0)
            .with(InputField::AvgCustomerValue, 300.0);

        let result = marketing_scenario(&inputs, 50_000.0);
        assert!(close(result.monthly_impact, 4000.0));
        assert!(close(result.roi.unwrap(), 200.0));
        assert!(result.recommendation.starts_with("Excellent"));
    }

    #[test]
    fn test_marketing_without_cost_has_no_roi() {
        let result = marketing_scenario(&UserProvidedInputs::new(), 50_000.0);
        assert!(result.roi.is_none());
        assert!(result.roi.map_or(true, |r| r.is_finite()));
        assert_eq!(result.monthly_impact, 0.0);
    }

    #[test]
    fn test_cost_cutting_keeps_revenue() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::CurrentCosts, 20_000.0)
            .with(InputField::CostReduction, 15.0)
            .with(InputField::ImplementationCost, 6000.0);

        let result = cost_cutting_scenario(&inputs, 50_000.0);
        assert!(close(result.monthly_impact, 3000.0));
        assert_eq!(result.old_revenue, result.new_revenue);
        assert_eq!(result.break_even_months, Some(2));
    }

    #[test]
    fn test_sales_volume_capacity_warning() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::AdditionalJobs, 20.0)
            .with(InputField::AvgJobValue, 1000.0);
        let result = sales_volume_scenario(&inputs, 50_000.0);
        assert!(close(result.profit_change, 40.0));
        assert!(result.recommendation.contains("capacity"));
    }

    #[test]
    fn test_zero_revenue_never_produces_nan() {
        let inputs = UserProvidedInputs::new().with(InputField::ProductivityIncrease, 25.0);
        for scenario in ScenarioType::KNOWN {
            let formula = scenario_formula(scenario).unwrap();
            let result = formula(&inputs, 0.0);
            assert!(result.profit_change.is_finite());
            assert!(result.monthly_impact.is_finite());
            assert!(result.roi.map_or(true, |r| r.is_finite()));
        }
    }

    #[test]
    fn test_base_impact_unknown_is_zero() {
        let inputs = UserProvidedInputs::new().with(InputField::MonthlyFee, 50.0);
        assert_eq!(base_monthly_impact(ScenarioType::Unknown, &inputs, 50_000.0), 0.0);
    }

    #[test]
    fn test_pricing_base_impact_ignores_retention() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::CurrentPrice, 1000.0)
            .with(InputField::NewPrice, 1100.0)
            .with(InputField::AvgMonthlySales, 10.0)
            .with(InputField::CustomerRetention, 95.0);
        assert!(close(base_monthly_impact(ScenarioType::Pricing, &inputs, 50_000.0), 1000.0));
    }
}
