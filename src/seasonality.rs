use crate::schema::SeasonalPattern;
use crate::utils::MONTHS_PER_YEAR;

pub type MonthlyCurve = [f64; MONTHS_PER_YEAR];

const STEADY_CURVE: MonthlyCurve = [1.0; MONTHS_PER_YEAR];

const SEASONAL_CURVE: MonthlyCurve = [0.7, 0.8, 1.0, 1.2, 1.4, 1.3, 1.1, 1.0, 1.0, 0.9, 0.8, 0.7];

const HOLIDAY_CURVE: MonthlyCurve = [0.7, 0.7, 0.8, 0.9, 0.9, 0.9, 0.9, 1.0, 1.0, 1.1, 1.5, 1.8];

const SUMMER_CURVE: MonthlyCurve = [0.6, 0.7, 0.9, 1.1, 1.3, 1.5, 1.6, 1.5, 1.1, 0.9, 0.7, 0.6];

const WINTER_CURVE: MonthlyCurve = [1.5, 1.4, 1.2, 0.9, 0.7, 0.6, 0.6, 0.7, 0.9, 1.1, 1.3, 1.5];

/// Monthly demand multipliers for a pattern, indexed January = 0.
pub fn get_pattern_multipliers(pattern: SeasonalPattern) -> &'static MonthlyCurve {
    match pattern {
        SeasonalPattern::Steady => &STEADY_CURVE,
        SeasonalPattern::Seasonal => &SEASONAL_CURVE,
        SeasonalPattern::Holiday => &HOLIDAY_CURVE,
        SeasonalPattern::Summer => &SUMMER_CURVE,
        SeasonalPattern::Winter => &WINTER_CURVE,
    }
}

const NO_MONTHS: &[u32] = &[];
const SPRING_PEAK: &[u32] = &[3, 4, 5];
const HOLIDAY_PEAK: &[u32] = &[10, 11];
const SUMMER_PEAK: &[u32] = &[5, 6, 7];
const WINTER_PEAK: &[u32] = &[11, 0, 1];
const DEEP_WINTER: &[u32] = &[11, 0];
const POST_HOLIDAY: &[u32] = &[0, 1];
const WINTER_LOW: &[u32] = &[0, 1, 11];

/// Returns `(peak_months, low_months)` for a pattern.
pub fn peak_and_low_months(pattern: SeasonalPattern) -> (&'static [u32], &'static [u32]) {
    match pattern {
        SeasonalPattern::Steady => (NO_MONTHS, NO_MONTHS),
        SeasonalPattern::Seasonal => (SPRING_PEAK, DEEP_WINTER),
        SeasonalPattern::Holiday => (HOLIDAY_PEAK, POST_HOLIDAY),
        SeasonalPattern::Summer => (SUMMER_PEAK, WINTER_LOW),
        SeasonalPattern::Winter => (WINTER_PEAK, SUMMER_PEAK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_curve_is_flat() {
        let curve = get_pattern_multipliers(SeasonalPattern::Steady);
        assert_eq!(curve.len(), 12);
        assert!(curve.iter().all(|m| *m == 1.0));
    }

    #[test]
    fn test_seasonal_curve_shape() {
        let curve = get_pattern_multipliers(SeasonalPattern::Seasonal);
        for month in 3..=5 {
            assert!(curve[month] >= 1.2 && curve[month] <= 1.4);
        }
        assert_eq!(curve[0], 0.7);
        assert_eq!(curve[11], 0.7);
    }

    #[test]
    fn test_every_curve_positive() {
        for pattern in SeasonalPattern::ALL {
            let curve = get_pattern_multipliers(pattern);
            assert!(curve.iter().all(|m| *m > 0.0), "{} has a non-positive month", pattern);
        }
    }

    #[test]
    fn test_peak_months_sit_above_low_months() {
        for pattern in SeasonalPattern::ALL {
            let curve = get_pattern_multipliers(pattern);
            let (peaks, lows) = peak_and_low_months(pattern);
            for &peak in peaks {
                for &low in lows {
                    assert!(
                        curve[peak as usize] > curve[low as usize],
                        "{}: peak {} should exceed low {}",
                        pattern,
                        peak,
                        low
                    );
                }
            }
        }
    }

    #[test]
    fn test_steady_has_no_peaks_or_lows() {
        let (peaks, lows) = peak_and_low_months(SeasonalPattern::Steady);
        assert!(peaks.is_empty());
        assert!(lows.is_empty());
    }
}
