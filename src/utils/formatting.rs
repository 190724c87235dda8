//! Formatting utilities used for CLI and export outputs.

use crate::core::timer::format_duration;
use crate::utils::colors::{GREEN, GREY, RESET};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// `HH:MM:SS` for a stored (signed) duration; negatives read as zero.
pub fn hms(seconds: i64) -> String {
    format_duration(seconds.max(0) as u64)
}

/// Human form, e.g. `2h 05m` or `45s`.
pub fn readable(seconds: i64) -> String {
    let s = seconds.max(0);
    let (h, m) = (s / 3600, (s % 3600) / 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, m) => format!("{m}m {:02}s", s % 60),
        (h, m) => format!("{h}h {m:02}m"),
    }
}

pub fn productive_label(productive: bool) -> String {
    if productive {
        format!("{GREEN}yes{RESET}")
    } else {
        format!("{GREY}no{RESET}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_picks_the_largest_units() {
        assert_eq!(readable(45), "45s");
        assert_eq!(readable(125), "2m 05s");
        assert_eq!(readable(7500), "2h 05m");
        assert_eq!(readable(-5), "0s");
    }

    #[test]
    fn hms_clamps_negatives() {
        assert_eq!(hms(-1), "00:00:00");
        assert_eq!(hms(3661), "01:01:01");
    }
}
