//! Ratios between stages and periods.
//!
//! Two zero-denominator conventions coexist here: ratios used in
//! analytics collapse to `0`, while the growth label shown next to a
//! month-over-month comparison reads `+100%` when there was nothing before.

/// Rounds half up to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// `numerator / denominator × 100`, or `0` for an empty denominator.
pub fn conversion_rate(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// Share of candidates lost between two interview stages, `0` when the
/// earlier stage is empty.
pub fn stage_dropoff(earlier: u32, later: u32) -> f64 {
    if earlier == 0 {
        return 0.0;
    }
    (earlier as f64 - later as f64) / earlier as f64 * 100.0
}

/// Month-over-month change as a display string, e.g. `+12.5%` or `-50.0%`.
pub fn growth_label(current: u32, previous: u32) -> String {
    if previous == 0 {
        return if current > 0 { "+100%" } else { "0%" }.to_string();
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    if change > 0.0 {
        format!("+{change:.1}%")
    } else {
        format!("{change:.1}%")
    }
}

/// Month-over-month change in whole percent; `0` when there is no baseline.
pub fn rounded_growth(current: u32, previous: u32) -> i64 {
    if previous == 0 {
        return 0;
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    (change + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_label_zero_baseline_conventions() {
        assert_eq!(growth_label(5, 0), "+100%");
        assert_eq!(growth_label(0, 0), "0%");
        assert_eq!(growth_label(5, 10), "-50.0%");
        assert_eq!(growth_label(15, 10), "+50.0%");
        assert_eq!(growth_label(10, 10), "0.0%");
    }

    #[test]
    fn rounded_growth_has_no_display_fallback() {
        assert_eq!(rounded_growth(5, 0), 0);
        assert_eq!(rounded_growth(3, 2), 50);
        assert_eq!(rounded_growth(1, 3), -67);
    }

    #[test]
    fn empty_stages_never_produce_nan() {
        assert_eq!(stage_dropoff(0, 0), 0.0);
        assert_eq!(stage_dropoff(0, 4), 0.0);
        assert_eq!(conversion_rate(3, 0), 0.0);
        assert_eq!(stage_dropoff(10, 4), 60.0);
        assert_eq!(conversion_rate(1, 4), 25.0);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_tenths(82.35294), 82.4);
        assert_eq!(round_tenths(-1.25), -1.2);
        assert_eq!(round_tenths(33.333), 33.3);
    }
}
