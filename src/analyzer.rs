use crate::formulas::base_monthly_impact;
use crate::schema::{
    ScenarioType, SeasonalAnalysis, SeasonalPattern, SeasonalityFactors, UserProvidedInputs,
};
use crate::seasonality::get_pattern_multipliers;
use crate::utils::{format_currency, join_month_names, month_name, round_half_up, MONTHS_PER_YEAR};
use log::debug;

/// More cumulatively-negative months than this raises a cash-flow warning.
const NEGATIVE_MONTHS_TOLERATED: usize = 3;

const SEASONAL_OPPORTUNITIES: [&str; 2] = [
    "Use the slower months to train staff and prepare operations for the busy season.",
    "Adjust promotions and pricing by season to smooth cash flow across the year.",
];

/// Spreads a scenario's monthly impact across the calendar year.
///
/// Months before `start_month` contribute nothing. From the start month the
/// flat base impact is scaled by a linear ramp-up, the pattern's seasonal
/// multiplier, and any scenario-specific adjustment, then rounded half-up.
pub fn analyze_seasonal_impact(
    scenario: ScenarioType,
    inputs: &UserProvidedInputs,
    seasonality: &SeasonalityFactors,
    current_monthly_revenue: f64,
) -> SeasonalAnalysis {
    let last_month = MONTHS_PER_YEAR as u32 - 1;
    let start_month = seasonality.start_month.min(last_month);
    let ramp_up_months = seasonality.ramp_up_months.min(last_month);
    let pattern = seasonality.seasonal_pattern;
    let multipliers = get_pattern_multipliers(pattern);

    let base = base_monthly_impact(scenario, inputs, current_monthly_revenue);
    let base = if base.is_finite() { base } else { 0.0 };

    let mut monthly_impacts = [0.0; MONTHS_PER_YEAR];
    let mut break_even_month = None;

    for month in start_month..MONTHS_PER_YEAR as u32 {
        let months_active = month - start_month + 1;
        let ramp_factor = if ramp_up_months == 0 {
            1.0
        } else {
            (months_active as f64 / ramp_up_months as f64).min(1.0)
        };
        let multiplier = multipliers[month as usize];

        let impact =
            base * ramp_factor * multiplier * seasonal_exception(scenario, pattern, month, multiplier);
        let impact = round_half_up(impact);

        monthly_impacts[month as usize] = impact;
        if break_even_month.is_none() && impact > 0.0 {
            break_even_month = Some(month);
        }
    }

    let total_annual_impact: f64 = monthly_impacts.iter().sum();

    debug!(
        "Seasonal analysis for {}: base {:.2}/month, {} pattern from {}, total {:.0}",
        scenario,
        base,
        pattern,
        month_name(start_month),
        total_annual_impact
    );

    let seasonal_recommendations =
        build_recommendations(scenario, seasonality, start_month, ramp_up_months, &monthly_impacts);
    let risk_factors = cash_flow_risks(&monthly_impacts);
    let opportunities = if pattern == SeasonalPattern::Steady {
        Vec::new()
    } else {
        SEASONAL_OPPORTUNITIES.iter().map(|s| s.to_string()).collect()
    };

    SeasonalAnalysis {
        monthly_impacts,
        total_annual_impact,
        break_even_month,
        seasonal_recommendations,
        risk_factors,
        opportunities,
    }
}

/// Scenario-specific seasonal adjustment for a month, as a factor on the impact.
fn seasonal_exception(
    scenario: ScenarioType,
    pattern: SeasonalPattern,
    month: u32,
    multiplier: f64,
) -> f64 {
    match scenario {
        // New Year cancellations, back-to-routine sign-ups
        ScenarioType::Membership if month == 0 => 0.7,
        ScenarioType::Membership if month == 8 => 1.3,
        // holiday-season onboarding drag
        ScenarioType::Hiring if month >= 10 => 0.8,
        ScenarioType::Marketing if pattern == SeasonalPattern::Holiday && month >= 10 => 1.5,
        // capacity constraints at the busiest months
        ScenarioType::SalesVolume if multiplier > 1.2 => 0.9,
        _ => 1.0,
    }
}

fn build_recommendations(
    scenario: ScenarioType,
    seasonality: &SeasonalityFactors,
    start_month: u32,
    ramp_up_months: u32,
    monthly_impacts: &[f64; MONTHS_PER_YEAR],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    let (peak_month, peak_value) = monthly_impacts.iter().enumerate().fold(
        (0usize, f64::NEG_INFINITY),
        |best, (idx, &value)| if value > best.1 { (idx, value) } else { best },
    );
    if peak_value > 0.0 {
        recommendations.push(format!(
            "Peak impact expected in {}: {} for the month.",
            month_name(peak_month as u32),
            format_currency(peak_value)
        ));
    } else {
        recommendations.push(format!(
            "No month shows a positive impact; the strongest month is {} at {}.",
            month_name(peak_month as u32),
            format_currency(peak_value)
        ));
    }

    recommendations.push(format!(
        "Starting in {} gives the change {} months to build before year end.",
        month_name(start_month),
        MONTHS_PER_YEAR as u32 - start_month
    ));

    let peaks = &seasonality.peak_months;
    let lows = &seasonality.low_months;
    let pattern = seasonality.seasonal_pattern;

    match scenario {
        ScenarioType::Membership => {
            if start_month == 0 {
                recommendations.push(
                    "January launches run into New Year cancellations; consider a December pre-sale to lock members in early."
                        .to_string(),
                );
            } else if (8..=10).contains(&start_month) {
                recommendations.push(
                    "A September to November launch catches the back-to-routine sign-up wave."
                        .to_string(),
                );
            } else {
                recommendations.push(
                    "Keep sign-up momentum going into September, when membership demand picks up."
                        .to_string(),
                );
            }
        }
        ScenarioType::Hiring => {
            let before = recommendations.len();
            if start_month >= 10 {
                recommendations.push(
                    "Onboarding during the holiday season is slow; a January start gives the new hire a cleaner ramp-up."
                        .to_string(),
                );
            }
            if ramp_up_months > 2 {
                recommendations.push(format!(
                    "Budget for {} months of ramp-up before the hire reaches full productivity.",
                    ramp_up_months
                ));
            }
            if !peaks.is_empty() {
                recommendations.push(format!(
                    "Have the new hire trained before your busy months ({}).",
                    join_month_names(peaks)
                ));
            }
            if recommendations.len() == before {
                recommendations.push(
                    "Demand is even through the year, so the hire can start whenever you are ready to train them."
                        .to_string(),
                );
            }
        }
        ScenarioType::Marketing => {
            if pattern == SeasonalPattern::Holiday {
                if start_month <= 9 {
                    recommendations.push(
                        "Launching before the holidays builds awareness ahead of the November and December peak."
                            .to_string(),
                    );
                } else {
                    recommendations.push(
                        "A late start misses most of the holiday build-up; aim to launch by October."
                            .to_string(),
                    );
                }
            } else if !peaks.is_empty() {
                recommendations.push(format!(
                    "Time the heaviest spend just before {}.",
                    join_month_names(peaks)
                ));
            } else {
                recommendations.push(
                    "With steady demand, spread the budget evenly and review results monthly."
                        .to_string(),
                );
            }
        }
        ScenarioType::Pricing => {
            if lows.contains(&start_month) {
                recommendations.push(
                    "Changing prices in a slow month limits how many customers notice the increase."
                        .to_string(),
                );
            } else if peaks.contains(&start_month) {
                recommendations.push(
                    "Raising prices at peak demand maximises the gain but invites comparison shopping; explain the value clearly."
                        .to_string(),
                );
            } else {
                recommendations.push(
                    "Announce the new price a month ahead so regular customers are not surprised."
                        .to_string(),
                );
            }
        }
        ScenarioType::CostCutting => {
            if peaks.contains(&start_month) {
                recommendations.push(
                    "Avoid cutting during peak months; service problems cost the most when you are busiest."
                        .to_string(),
                );
            } else {
                recommendations.push(
                    "Making the cuts outside peak season keeps disruption low.".to_string(),
                );
            }
        }
        ScenarioType::SalesVolume => {
            if peaks.is_empty() {
                recommendations.push(
                    "Steady demand makes it easier to add volume without overtime.".to_string(),
                );
            } else {
                recommendations.push(format!(
                    "Plan capacity for {}, when extra volume is hardest to absorb.",
                    join_month_names(peaks)
                ));
            }
        }
        ScenarioType::Unknown => {}
    }

    recommendations
}

fn cash_flow_risks(monthly_impacts: &[f64; MONTHS_PER_YEAR]) -> Vec<String> {
    let negative_months = monthly_impacts
        .iter()
        .scan(0.0, |cumulative, impact| {
            *cumulative += impact;
            Some(*cumulative)
        })
        .filter(|cumulative| *cumulative < 0.0)
        .count();

    if negative_months > NEGATIVE_MONTHS_TOLERATED {
        vec![format!(
            "Cumulative impact stays negative for {} months; keep a cash reserve to bridge the gap.",
            negative_months
        )]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::InputField;

    fn factors(start_month: u32, pattern: SeasonalPattern, ramp_up_months: u32) -> SeasonalityFactors {
        SeasonalityFactors::new(start_month, 12, pattern, ramp_up_months).unwrap()
    }

    fn membership_inputs() -> UserProvidedInputs {
        UserProvidedInputs::new()
            .with(InputField::MonthlyFee, 99.0)
            .with(InputField::TargetMembers, 100.0)
    }

    #[test]
    fn test_membership_january_churn() {
        let analysis = analyze_seasonal_impact(
            ScenarioType::Membership,
            &membership_inputs(),
            &factors(0, SeasonalPattern::Steady, 2),
            50_000.0,
        );
        assert_eq!(analysis.monthly_impacts[0], 3465.0);
        assert_eq!(analysis.monthly_impacts[1], 9900.0);
        assert_eq!(analysis.monthly_impacts[8], 12870.0);
        assert_eq!(analysis.break_even_month, Some(0));
    }

    #[test]
    fn test_pre_start_months_are_zero() {
        let analysis = analyze_seasonal_impact(
            ScenarioType::Membership,
            &membership_inputs(),
            &factors(5, SeasonalPattern::Summer, 0),
            50_000.0,
        );
        assert!(analysis.monthly_impacts[..5].iter().all(|m| *m == 0.0));
        assert_eq!(analysis.break_even_month, Some(5));
        // June summer multiplier 1.5, no ramp
        assert_eq!(analysis.monthly_impacts[5], 14850.0);
    }

    #[test]
    fn test_ramp_up_reaches_full_strength() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::AdditionalJobs, 10.0)
            .with(InputField::AvgJobValue, 100.0);
        let analysis = analyze_seasonal_impact(
            ScenarioType::SalesVolume,
            &inputs,
            &factors(2, SeasonalPattern::Steady, 4),
            50_000.0,
        );
        assert_eq!(analysis.monthly_impacts[2], 250.0);
        assert_eq!(analysis.monthly_impacts[3], 500.0);
        assert_eq!(analysis.monthly_impacts[4], 750.0);
        assert_eq!(analysis.monthly_impacts[5], 1000.0);
        assert_eq!(analysis.monthly_impacts[11], 1000.0);
    }

    #[test]
    fn test_hiring_holiday_drag() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::HourlyRate, 0.0)
            .with(InputField::ProductivityIncrease, 10.0);
        let analysis = analyze_seasonal_impact(
            ScenarioType::Hiring,
            &inputs,
            &factors(0, SeasonalPattern::Steady, 0),
            50_000.0,
        );
        assert_eq!(analysis.monthly_impacts[9], 5000.0);
        assert_eq!(analysis.monthly_impacts[10], 4000.0);
        assert_eq!(analysis.monthly_impacts[11], 4000.0);
    }

    #[test]
    fn test_marketing_holiday_boost_only_with_holiday_pattern() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::ExpectedNewCustomers, 10.0)
            .with(InputField::AvgCustomerValue, 100.0);

        let holiday = analyze_seasonal_impact(
            ScenarioType::Marketing,
            &inputs,
            &factors(0, SeasonalPattern::Holiday, 0),
            50_000.0,
        );
        // 1000 * 1.8 * 1.5
        assert_eq!(holiday.monthly_impacts[11], 2700.0);

        let steady = analyze_seasonal_impact(
            ScenarioType::Marketing,
            &inputs,
            &factors(0, SeasonalPattern::Steady, 0),
            50_000.0,
        );
        assert_eq!(steady.monthly_impacts[11], 1000.0);
    }

    #[test]
    fn test_sales_volume_capacity_cap() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::AdditionalJobs, 10.0)
            .with(InputField::AvgJobValue, 100.0);
        let analysis = analyze_seasonal_impact(
            ScenarioType::SalesVolume,
            &inputs,
            &factors(0, SeasonalPattern::Summer, 0),
            50_000.0,
        );
        // July multiplier 1.6 is above 1.2 so capacity trims 10%
        assert_eq!(analysis.monthly_impacts[6], 1440.0);
        // April multiplier 1.1 is untouched
        assert_eq!(analysis.monthly_impacts[3], 1100.0);
    }

    #[test]
    fn test_cash_flow_risk_for_losing_hire() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::HourlyRate, 40.0)
            .with(InputField::HoursPerWeek, 40.0)
            .with(InputField::ProductivityIncrease, 5.0);
        let analysis = analyze_seasonal_impact(
            ScenarioType::Hiring,
            &inputs,
            &factors(0, SeasonalPattern::Steady, 2),
            50_000.0,
        );
        assert_eq!(analysis.break_even_month, None);
        assert_eq!(analysis.risk_factors.len(), 1);
        assert!(analysis.risk_factors[0].contains("12 months"));
    }

    #[test]
    fn test_cash_flow_warning_needs_more_than_three_negative_months() {
        let mut recovers_in_time = [500.0; MONTHS_PER_YEAR];
        recovers_in_time[..3].copy_from_slice(&[-100.0, -100.0, -100.0]);
        assert!(cash_flow_risks(&recovers_in_time).is_empty());

        let mut recovers_late = [500.0; MONTHS_PER_YEAR];
        recovers_late[..4].copy_from_slice(&[-100.0, -100.0, -100.0, -100.0]);
        let risks = cash_flow_risks(&recovers_late);
        assert_eq!(risks.len(), 1);
        assert!(risks[0].contains("4 months"));

        // Cumulative, not per-month: one big loss outweighs later gains.
        let mut slow_payback = [100.0; MONTHS_PER_YEAR];
        slow_payback[0] = -450.0;
        assert_eq!(cash_flow_risks(&slow_payback).len(), 1);
    }

    #[test]
    fn test_late_losing_hire_stays_under_warning_threshold() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::HourlyRate, 50.0)
            .with(InputField::HoursPerWeek, 40.0)
            .with(InputField::ProductivityIncrease, 5.0);

        let october = analyze_seasonal_impact(
            ScenarioType::Hiring,
            &inputs,
            &factors(9, SeasonalPattern::Steady, 0),
            50_000.0,
        );
        assert_eq!(october.monthly_impacts.iter().filter(|m| **m < 0.0).count(), 3);
        assert!(october.risk_factors.is_empty());

        let september = analyze_seasonal_impact(
            ScenarioType::Hiring,
            &inputs,
            &factors(8, SeasonalPattern::Steady, 0),
            50_000.0,
        );
        assert_eq!(september.risk_factors.len(), 1);
        assert!(september.risk_factors[0].contains("4 months"));
    }

    #[test]
    fn test_opportunities_only_for_seasonal_patterns() {
        let steady = analyze_seasonal_impact(
            ScenarioType::Membership,
            &membership_inputs(),
            &factors(3, SeasonalPattern::Steady, 2),
            50_000.0,
        );
        assert!(steady.opportunities.is_empty());

        let winter = analyze_seasonal_impact(
            ScenarioType::Membership,
            &membership_inputs(),
            &factors(3, SeasonalPattern::Winter, 2),
            50_000.0,
        );
        assert_eq!(winter.opportunities.len(), 2);
    }

    #[test]
    fn test_recommendations_name_peak_and_start() {
        let analysis = analyze_seasonal_impact(
            ScenarioType::Membership,
            &membership_inputs(),
            &factors(8, SeasonalPattern::Steady, 0),
            50_000.0,
        );
        assert!(analysis.seasonal_recommendations[0].contains("September"));
        assert!(analysis.seasonal_recommendations[1].starts_with("Starting in September"));
        assert!(analysis.seasonal_recommendations[2].contains("back-to-routine"));
    }

    #[test]
    fn test_unknown_scenario_is_flat_zero() {
        let analysis = analyze_seasonal_impact(
            ScenarioType::Unknown,
            &membership_inputs(),
            &factors(0, SeasonalPattern::Holiday, 0),
            50_000.0,
        );
        assert!(analysis.monthly_impacts.iter().all(|m| *m == 0.0));
        assert_eq!(analysis.total_annual_impact, 0.0);
        assert_eq!(analysis.break_even_month, None);
    }

    #[test]
    fn test_out_of_range_factors_are_clamped() {
        let unchecked = SeasonalityFactors {
            start_month: 15,
            duration: 12,
            seasonal_pattern: SeasonalPattern::Steady,
            ramp_up_months: 40,
            peak_months: vec![],
            low_months: vec![],
        };
        let analysis = analyze_seasonal_impact(
            ScenarioType::Membership,
            &membership_inputs(),
            &unchecked,
            50_000.0,
        );
        assert!(analysis.monthly_impacts[..11].iter().all(|m| *m == 0.0));
        assert_eq!(analysis.break_even_month, Some(11));
    }

    #[test]
    fn test_invariants_across_types_and_patterns() {
        let inputs = UserProvidedInputs::new()
            .with(InputField::CurrentPrice, 80.0)
            .with(InputField::NewPrice, 95.0)
            .with(InputField::MonthlyFee, 49.0)
            .with(InputField::TargetMembers, 60.0)
            .with(InputField::HourlyRate, 28.0)
            .with(InputField::ProductivityIncrease, 12.0)
            .with(InputField::CampaignCost, 1500.0)
            .with(InputField::ExpectedNewCustomers, 8.0)
            .with(InputField::AvgCustomerValue, 250.0)
            .with(InputField::CurrentCosts, 18_000.0)
            .with(InputField::AdditionalJobs, 6.0)
            .with(InputField::AvgJobValue, 450.0);

        let mut scenarios = ScenarioType::KNOWN.to_vec();
        scenarios.push(ScenarioType::Unknown);

        for scenario in scenarios {
            for pattern in SeasonalPattern::ALL {
                for start in [0, 4, 11] {
                    let f = factors(start, pattern, 3);
                    let a = analyze_seasonal_impact(scenario, &inputs, &f, 42_000.0);

                    let sum: f64 = a.monthly_impacts.iter().sum();
                    assert_eq!(a.total_annual_impact, sum);

                    for m in 0..start as usize {
                        assert_eq!(a.monthly_impacts[m], 0.0);
                    }

                    let first_positive = a.monthly_impacts.iter().position(|m| *m > 0.0);
                    assert_eq!(a.break_even_month, first_positive.map(|i| i as u32));
                }
            }
        }
    }
}
