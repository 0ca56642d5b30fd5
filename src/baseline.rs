use crate::utils::{format_currency, month_index_of};
use chrono::{Datelike, NaiveDate};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored revenue figure, as supplied by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEntry {
    #[schemars(description = "Date the revenue was recorded (YYYY-MM-DD).")]
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BaselineEstimate {
    pub monthly_revenue: f64,
    /// Number of calendar months averaged; 0 when the fallback was used.
    pub months_used: usize,
    pub note: String,
}

/// Averages the most recent `lookback_months` calendar months of revenue.
///
/// Entries are bucketed by calendar month first, so several entries in the
/// same month add up. Non-finite amounts are skipped. With no usable history
/// the fallback is returned along with a note for the caller.
pub fn estimate_monthly_revenue(
    entries: &[RevenueEntry],
    lookback_months: usize,
    fallback: f64,
) -> BaselineEstimate {
    let mut monthly_totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.amount.is_finite()) {
        *monthly_totals
            .entry((entry.date.year(), month_index_of(entry.date)))
            .or_insert(0.0) += entry.amount;
    }

    let recent: Vec<f64> = monthly_totals
        .values()
        .rev()
        .take(lookback_months.max(1))
        .copied()
        .collect();

    if recent.is_empty() {
        return BaselineEstimate {
            monthly_revenue: fallback,
            months_used: 0,
            note: format!(
                "No revenue history available; using a default baseline of {} per month.",
                format_currency(fallback)
            ),
        };
    }

    let monthly_revenue = recent.iter().sum::<f64>() / recent.len() as f64;
    debug!(
        "Revenue baseline {:.2} from {} of {} recorded months",
        monthly_revenue,
        recent.len(),
        monthly_totals.len()
    );

    BaselineEstimate {
        monthly_revenue,
        months_used: recent.len(),
        note: format!(
            "Baseline of {} per month averaged over the last {} month(s) of revenue.",
            format_currency(monthly_revenue),
            recent.len()
        ),
    }
}
