//! Human-readable durations for the countdown and statistics.

/// `HH:MM:SS` for a countdown value. Negative values render as zero.
pub fn format_clock(seconds_left: i64) -> String {
    let secs = seconds_left.max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// `HH:MM:SS` for an accumulated total, dropping fractional seconds.
pub fn format_hms(total_secs: f64) -> String {
    format_clock(total_secs.max(0.0) as i64)
}

/// `MM:SS`, minutes not wrapped at the hour.
pub fn format_min_sec(total_secs: f64) -> String {
    let secs = total_secs.max(0.0) as i64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_each_unit() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(1500), "00:25:00");
        assert_eq!(format_clock(3661), "01:01:01");
        assert_eq!(format_clock(-1), "00:00:00");
    }

    #[test]
    fn hms_truncates_fractions() {
        assert_eq!(format_hms(3300.9), "00:55:00");
        assert_eq!(format_hms(90061.0), "25:01:01");
    }

    #[test]
    fn min_sec_keeps_minutes_past_the_hour() {
        assert_eq!(format_min_sec(1650.0), "27:30");
        assert_eq!(format_min_sec(3900.0), "65:00");
        assert_eq!(format_min_sec(0.0), "00:00");
    }
}
