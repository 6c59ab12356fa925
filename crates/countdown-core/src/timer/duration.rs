//! Duration input handling and `MM:SS` formatting.
//!
//! Input fields are lenient: the leading integer of the text is taken and
//! then clamped into range, so nothing typed into a field is ever rejected.

use serde::{Deserialize, Serialize};

pub const MAX_MINUTES: u32 = 99;
pub const MAX_SECONDS: u32 = 59;

/// Longest duration the inputs can express (`99:59`).
pub const MAX_DURATION_SECS: u32 = MAX_MINUTES * 60 + MAX_SECONDS;

/// The two duration text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationInput {
    pub minutes: String,
    pub seconds: String,
}

impl Default for DurationInput {
    fn default() -> Self {
        Self::from_secs(0)
    }
}

impl DurationInput {
    pub fn new(minutes: impl Into<String>, seconds: impl Into<String>) -> Self {
        Self {
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }

    /// Fields showing `secs`, zero-padded the way the live countdown writes them.
    pub fn from_secs(secs: u32) -> Self {
        Self {
            minutes: format!("{:02}", secs / 60),
            seconds: format!("{:02}", secs % 60),
        }
    }

    pub fn minutes(&self) -> u32 {
        clamp_field(&self.minutes, MAX_MINUTES)
    }

    pub fn seconds(&self) -> u32 {
        clamp_field(&self.seconds, MAX_SECONDS)
    }

    /// Total requested duration in seconds after clamping both fields.
    pub fn total_secs(&self) -> u32 {
        self.minutes() * 60 + self.seconds()
    }
}

/// Leading-integer parse. Empty or non-numeric text yields `None`.
fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long digit runs instead of failing.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

fn clamp_field(text: &str, max: u32) -> u32 {
    leading_int(text).unwrap_or(0).clamp(0, max as i64) as u32
}

/// Parse a preset value. Anything that is not an integer is `None`.
pub fn parse_preset_secs(text: &str) -> Option<u32> {
    let value = leading_int(text)?;
    u32::try_from(value).ok()
}

/// `MM:SS`. Minutes are not capped, so 6000 s renders as `100:00`.
pub fn format_mmss(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_fields_into_range() {
        let input = DurationInput::new("150", "75");
        assert_eq!(input.minutes(), 99);
        assert_eq!(input.seconds(), 59);
        assert_eq!(input.total_secs(), MAX_DURATION_SECS);
    }

    #[test]
    fn non_numeric_fields_are_zero() {
        let input = DurationInput::new("", "abc");
        assert_eq!(input.total_secs(), 0);
    }

    #[test]
    fn negative_fields_clamp_to_zero() {
        let input = DurationInput::new("-3", "-1");
        assert_eq!(input.total_secs(), 0);
    }

    #[test]
    fn leading_integer_is_used() {
        let input = DurationInput::new("1min", " 30s");
        assert_eq!(input.total_secs(), 90);
    }

    #[test]
    fn from_secs_pads_fields() {
        let input = DurationInput::from_secs(65);
        assert_eq!(input.minutes, "01");
        assert_eq!(input.seconds, "05");
    }

    #[test]
    fn format_mmss_pads() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(90), "01:30");
        assert_eq!(format_mmss(5999), "99:59");
    }

    #[test]
    fn preset_parsing() {
        assert_eq!(parse_preset_secs("300"), Some(300));
        assert_eq!(parse_preset_secs("300abc"), Some(300));
        assert_eq!(parse_preset_secs("five"), None);
        assert_eq!(parse_preset_secs(""), None);
        assert_eq!(parse_preset_secs("-5"), None);
    }
}
