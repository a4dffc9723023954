//! Argument validation shared by the strategies
//!
//! Everything here is pure: nothing touches a device, so strategies can run
//! all checks before their first device call.

use std::num::IntErrorKind;
use std::ops::RangeInclusive;

use crate::device::MusicItem;
use crate::error::{ActionError, Result};

/// Fails with an arity error unless `args.len()` is one of `allowed`
///
/// `expected` is the human description used in the message ("no", "1",
/// "0 or 1", ...).
pub fn expect_arity(
    action: &str,
    args: &[String],
    allowed: &[usize],
    expected: &'static str,
) -> Result<()> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(ActionError::wrong_arity(action, expected))
    }
}

/// Parses "on" / "off", ignoring case
pub fn parse_on_off(action: &str, arg: &str) -> Result<bool> {
    match arg.to_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(ActionError::wrong_type(action, "on|off")),
    }
}

/// Formats a boolean the way toggles print it
pub fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Parses a base-10 integer; `expected` describes the accepted input
///
/// Numbers too large for `i64` saturate to its bounds, so range checks see
/// them as out of range rather than non-numeric.
pub fn parse_int(action: &str, arg: &str, expected: &str) -> Result<i64> {
    match arg.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ActionError::wrong_type(action, expected)),
        },
    }
}

/// Parses an integer and checks it against `range`
///
/// Non-numeric input and out-of-range values are both type errors, but carry
/// different descriptions so the caller can tell them apart.
pub fn parse_in_range(
    action: &str,
    arg: &str,
    range: RangeInclusive<i64>,
    not_numeric: &str,
    out_of_range: &str,
) -> Result<i64> {
    let value = parse_int(action, arg, not_numeric)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ActionError::wrong_type(action, out_of_range))
    }
}

/// Finds an item by title
///
/// An exact title match wins. Otherwise the first item whose title contains
/// `name` (ignoring case) is returned, in the order the device listed them.
pub fn find_by_title<'a>(items: &'a [MusicItem], name: &str) -> Option<&'a MusicItem> {
    if let Some(exact) = items.iter().find(|item| item.title == name) {
        return Some(exact);
    }
    let needle = name.to_lowercase();
    items
        .iter()
        .find(|item| item.title.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn items(titles: &[&str]) -> Vec<MusicItem> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| MusicItem::new(*t, format!("FV:2/{i}")))
            .collect()
    }

    #[test]
    fn test_expect_arity() {
        assert!(expect_arity("mute", &args(&[]), &[0, 1], "0 or 1").is_ok());
        assert!(expect_arity("mute", &args(&["on"]), &[0, 1], "0 or 1").is_ok());
        let err = expect_arity("mute", &args(&["on", "off"]), &[0, 1], "0 or 1").unwrap_err();
        assert!(matches!(err, ActionError::WrongArity { .. }));
    }

    #[rstest]
    #[case("on", true)]
    #[case("ON", true)]
    #[case("Off", false)]
    #[case("off", false)]
    fn test_parse_on_off(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_on_off("mute", input).unwrap(), expected);
    }

    #[rstest]
    #[case("yes")]
    #[case("1")]
    #[case("")]
    fn test_parse_on_off_rejects(#[case] input: &str) {
        let err = parse_on_off("mute", input).unwrap_err();
        assert!(matches!(err, ActionError::WrongType { .. }));
    }

    #[test]
    fn test_parse_in_range_distinguishes_messages() {
        let not_numeric = parse_in_range("bass", "loud", -10..=10, "integer", "range").unwrap_err();
        let too_big = parse_in_range("bass", "11", -10..=10, "integer", "range").unwrap_err();
        assert_eq!(not_numeric.to_string(), "Action 'bass' takes parameter(s): integer");
        assert_eq!(too_big.to_string(), "Action 'bass' takes parameter(s): range");
        assert_eq!(parse_in_range("bass", "-10", -10..=10, "integer", "range").unwrap(), -10);
    }

    #[test]
    fn test_parse_int_does_not_trim() {
        assert!(parse_int("volume", " 5", "integer").is_err());
        assert_eq!(parse_int("volume", "+5", "integer").unwrap(), 5);
    }

    #[rstest]
    #[case("99999999999999999999", i64::MAX)]
    #[case("-99999999999999999999", i64::MIN)]
    fn test_parse_int_saturates_huge_numbers(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_int("pfq", input, "integer").unwrap(), expected);
    }

    #[test]
    fn test_huge_number_is_out_of_range_not_non_numeric() {
        let err = parse_in_range("volume", "99999999999999999999", 0..=100, "integer from 0 to 100", "0 to 100")
            .unwrap_err();
        assert_eq!(err.to_string(), "Action 'volume' takes parameter(s): 0 to 100");
    }

    #[test]
    fn test_exact_match_beats_earlier_substring() {
        let list = items(&["Jazz Mix", "Jazz", "Classic Jazz"]);
        assert_eq!(find_by_title(&list, "Jazz").unwrap().title, "Jazz");
    }

    #[test]
    fn test_first_substring_match_wins() {
        let list = items(&["Classic Jazz", "Jazz Mix"]);
        assert_eq!(find_by_title(&list, "jazz").unwrap().title, "Classic Jazz");

        let reversed = items(&["Jazz Mix", "Classic Jazz"]);
        assert_eq!(find_by_title(&reversed, "JAZZ").unwrap().title, "Jazz Mix");
    }

    #[test]
    fn test_no_match() {
        let list = items(&["Rock", "Pop"]);
        assert!(find_by_title(&list, "Jazz").is_none());
    }
}
