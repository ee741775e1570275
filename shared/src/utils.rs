// Helpers shared by the engine and any front end.

/// Percentage move from `previous` to `current`. `None` when there is no base to compare against.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}
