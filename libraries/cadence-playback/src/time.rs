//! Position formatting for transport displays

use std::time::Duration;

/// Shown while the track duration is not yet known
pub const POSITION_PLACEHOLDER: &str = "00:00/00:00";

/// Format an elapsed/total pair as `MM:SS/MM:SS`, or `H:MM:SS/H:MM:SS` when
/// `total` spans at least one hour.
///
/// Both values are floored to whole seconds. `elapsed` may exceed `total`;
/// whatever is given is rendered. In the short form only the minute and
/// second components of `elapsed` are shown.
pub fn format_position(elapsed: Duration, total: Duration) -> String {
    let (elapsed_h, elapsed_m, elapsed_s) = split(elapsed);
    let (total_h, total_m, total_s) = split(total);

    if total_h > 0 {
        format!(
            "{}:{:02}:{:02}/{}:{:02}:{:02}",
            elapsed_h, elapsed_m, elapsed_s, total_h, total_m, total_s
        )
    } else {
        format!(
            "{:02}:{:02}/{:02}:{:02}",
            elapsed_m, elapsed_s, total_m, total_s
        )
    }
}

fn split(value: Duration) -> (u64, u64, u64) {
    let secs = value.as_secs();
    let hours = secs / 3600;
    let minutes = (secs - hours * 3600) / 60;
    let seconds = secs - hours * 3600 - minutes * 60;
    (hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn short_form_pads_minutes() {
        assert_eq!(format_position(secs(0), secs(45)), "00:00/00:45");
        assert_eq!(format_position(secs(65), secs(130)), "01:05/02:10");
    }

    #[test]
    fn long_form_when_total_has_hours() {
        assert_eq!(format_position(secs(3661), secs(7200)), "1:01:01/2:00:00");
        assert_eq!(format_position(secs(5), secs(3600)), "0:00:05/1:00:00");
    }

    #[test]
    fn fractions_are_floored() {
        let elapsed = Duration::from_millis(59_999);
        let total = Duration::from_millis(120_999);
        assert_eq!(format_position(elapsed, total), "00:59/02:00");
    }

    #[test]
    fn elapsed_past_total_is_rendered_as_given() {
        assert_eq!(format_position(secs(200), secs(130)), "03:20/02:10");
        // Short form drops the elapsed hour component.
        assert_eq!(format_position(secs(3661), secs(130)), "01:01/02:10");
    }

    #[test]
    fn placeholder_matches_zero_render() {
        assert_eq!(format_position(Duration::ZERO, Duration::ZERO), POSITION_PLACEHOLDER);
    }
}
