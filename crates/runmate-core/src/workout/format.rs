//! Countdown display helpers.
//!
//! Remaining time is always rounded up, so a phase that just started at
//! 10s reads `00:10` rather than `00:09`, and anything still running shows
//! at least `00:01`.

/// Remaining milliseconds rounded up to whole seconds.
pub fn ceil_secs(ms: u64) -> u64 {
    ms.div_ceil(1000)
}

/// Format remaining milliseconds as `MM:SS`.
pub fn format_clock(ms: u64) -> String {
    let secs = ceil_secs(ms);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_partial_seconds() {
        assert_eq!(ceil_secs(0), 0);
        assert_eq!(ceil_secs(1), 1);
        assert_eq!(ceil_secs(999), 1);
        assert_eq!(ceil_secs(1000), 1);
        assert_eq!(ceil_secs(1001), 2);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(10), "00:01");
        assert_eq!(format_clock(9_990), "00:10");
        assert_eq!(format_clock(100_000), "01:40");
        assert_eq!(format_clock(3_600_000), "60:00");
    }
}
