//! General time utility functions

/// Number of milliseconds in a second
pub const MILLIS_PER_SECOND: f64 = 1000.0;

/// Convert a number of seconds into whole milliseconds, saturating at zero.
pub fn seconds_to_millis(seconds: f64) -> u64 {
    if seconds <= 0.0 || !seconds.is_finite() {
        0
    }
    else {
        (seconds * MILLIS_PER_SECOND).round() as u64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_seconds_to_millis() {
        assert_eq!(seconds_to_millis(0.3), 300);
        assert_eq!(seconds_to_millis(-1.0), 0);
        assert_eq!(seconds_to_millis(f64::NAN), 0);
    }
}
