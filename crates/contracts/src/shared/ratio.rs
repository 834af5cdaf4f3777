//! Zero-guarded derived ratios.
//!
//! Every percentage and average in the reporting vocabulary divides a summed
//! numerator by a summed denominator; a zero denominator always yields 0,
//! never an error or NaN. Values are deliberately not clamped to 100.

/// numerator / denominator, 0 when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// (numerator / denominator) * 100, zero-guarded.
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// Rounds to one decimal place (percentages).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to two decimal places (money, AOV).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominator_yields_zero() {
        assert_eq!(ratio(100.0, 0.0), 0.0);
        assert_eq!(percent(42.0, 0.0), 0.0);
    }

    #[test]
    fn test_plain_division() {
        assert_eq!(ratio(100.0, 2.0), 50.0);
        assert_eq!(percent(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_not_clamped() {
        // Data drift can make enrolled > can_enroll; the original reports
        // the raw figure, so >100% passes through.
        assert_eq!(percent(12.0, 10.0), 120.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round1(33.3333), 33.3);
        assert_eq!(round1(66.6666), 66.7);
        assert_eq!(round2(49.995), 50.0);
        assert_eq!(round2(12.344), 12.34);
    }
}
