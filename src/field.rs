/// Delimiter-based field extraction
///
/// These are the small combinators everything else is built from: locating the
/// Nth delimiter, slicing the field between two delimiters, and pulling a
/// number out of a `Label = value` fragment. Offsets are byte offsets into the
/// input; report text and identifiers are ASCII in practice.
use std::str::FromStr;

use crate::error::MalformedField;

/// Highest field index addressed by delimiter position before switching to
/// "everything after the last delimiter".
pub const DEFAULT_MAX_INDEXED_FIELD: usize = 3;

/// Policy for the trailing-field fallback in [`extract_field`]
///
/// Fields at or below `max_indexed_field` are located by counting delimiters.
/// Any field beyond it is taken as the text after the *last* delimiter, so a
/// variable number of trailing fields never has to be counted exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub max_indexed_field: usize,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        FieldPolicy {
            max_indexed_field: DEFAULT_MAX_INDEXED_FIELD,
        }
    }
}

/// Byte offset of the `n`-th occurrence (1-based) of `delimiter` in `text`
///
/// `n == 0` is the start of the string. Returns `None` when `text` holds fewer
/// than `n` occurrences, or when `delimiter` is empty. The scan resumes one
/// character after each hit, so overlapping occurrences are counted.
pub fn find_nth_occurrence(text: &str, delimiter: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    if delimiter.is_empty() {
        return None;
    }

    let mut from = 0;
    let mut seen = 0;
    while let Some(rel) = text[from..].find(delimiter) {
        let pos = from + rel;
        seen += 1;
        if seen == n {
            return Some(pos);
        }
        // Step over one character, not the whole delimiter
        from = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Slice of `text` between the `start`-th and the `end`-th delimiter
///
/// The slice begins one position after the `start`-th delimiter and stops right
/// before the `end`-th. Occurrence 0 sits at offset 0, so field 0 starts at the
/// second character of the string (`hRSV/B` gives `RSV`). When `start`
/// is past `policy.max_indexed_field`, everything after the last delimiter is
/// returned instead (the whole text if there is no delimiter at all).
pub fn extract_field<'a>(
    text: &'a str,
    delimiter: &str,
    start: usize,
    end: usize,
    policy: FieldPolicy,
) -> Result<&'a str, MalformedField> {
    if start > policy.max_indexed_field {
        return Ok(match text.rfind(delimiter) {
            Some(pos) if !delimiter.is_empty() => &text[pos + delimiter.len()..],
            _ => text,
        });
    }

    let opening = find_nth_occurrence(text, delimiter, start)
        .ok_or_else(|| MalformedField::new(text, "enough delimiters before the field"))?;
    // Occurrence 0 is the string start, not a delimiter: skip exactly one char
    let skip = match start {
        0 => text.chars().next().map_or(0, char::len_utf8),
        _ => delimiter.len(),
    };
    let from = opening + skip;
    let to = find_nth_occurrence(text, delimiter, end)
        .ok_or_else(|| MalformedField::new(text, "a delimiter closing the field"))?;

    if to < from {
        return Err(MalformedField::new(
            text,
            "the closing delimiter after the opening one",
        ));
    }
    Ok(&text[from..to])
}

/// Field `index` (0-based) of a delimited string
pub fn nth_field<'a>(
    text: &'a str,
    delimiter: &str,
    index: usize,
    policy: FieldPolicy,
) -> Result<&'a str, MalformedField> {
    extract_field(text, delimiter, index, index + 1, policy)
}

/// Text after `separator` and before the optional `terminator`, trimmed
///
/// A missing terminator means "to the end of the line".
pub fn labeled_value(
    line: &str,
    separator: char,
    terminator: Option<char>,
) -> Result<&str, MalformedField> {
    let (_, value) = line
        .split_once(separator)
        .ok_or_else(|| MalformedField::new(line, "`<label>=<value>`"))?;

    let value = match terminator {
        Some(t) => value.split_once(t).map_or(value, |(head, _)| head),
        None => value,
    };
    Ok(value.trim())
}

/// Number following a label, e.g. `Length = 100` or `Expect = 2e-5 (...)`
pub fn strip_labeled_number<T: FromStr>(
    line: &str,
    separator: char,
    terminator: Option<char>,
) -> Result<T, MalformedField> {
    labeled_value(line, separator, terminator)?
        .parse::<T>()
        .map_err(|_| MalformedField::new(line, "a number after the label"))
}

/// `numerator/denominator` as a fraction in [0, 1]
///
/// Any trailing parenthetical such as ` (75%)` is ignored.
pub fn parse_ratio(fragment: &str) -> Result<f64, MalformedField> {
    let body = fragment
        .split_once('(')
        .map_or(fragment, |(head, _)| head)
        .trim();

    let (num, den) = body
        .split_once('/')
        .ok_or_else(|| MalformedField::new(fragment, "`<count>/<total>`"))?;

    let num: u64 = num
        .trim()
        .parse()
        .map_err(|_| MalformedField::new(fragment, "an integer count before `/`"))?;
    let den: u64 = den
        .trim()
        .parse()
        .map_err(|_| MalformedField::new(fragment, "an integer total after `/`"))?;

    if den == 0 {
        return Err(MalformedField::new(fragment, "a non-zero total"));
    }
    if num > den {
        return Err(MalformedField::new(fragment, "a count no larger than the total"));
    }

    Ok(num as f64 / den as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_nth_base_case() {
        assert_eq!(find_nth_occurrence("RSV/A/USA", "/", 0), Some(0));
        assert_eq!(find_nth_occurrence("", "/", 0), Some(0));
        assert_eq!(find_nth_occurrence("no delimiters", "", 0), Some(0));
    }

    #[test]
    fn test_find_nth_counts_from_one() {
        let id = "RSV/A/USA/2020";
        assert_eq!(find_nth_occurrence(id, "/", 1), Some(3));
        assert_eq!(find_nth_occurrence(id, "/", 2), Some(5));
        assert_eq!(find_nth_occurrence(id, "/", 3), Some(9));
        assert_eq!(find_nth_occurrence(id, "/", 4), None);
    }

    #[test]
    fn test_find_nth_overlapping() {
        // Resuming one char after each hit finds "aa" at 0, 1 and 2
        assert_eq!(find_nth_occurrence("aaaa", "aa", 2), Some(1));
        assert_eq!(find_nth_occurrence("aaaa", "aa", 3), Some(2));
        assert_eq!(find_nth_occurrence("aaaa", "aa", 4), None);
    }

    #[test]
    fn test_find_nth_empty_delimiter() {
        assert_eq!(find_nth_occurrence("abc", "", 1), None);
    }

    #[test]
    fn test_extract_field_between_delimiters() {
        let policy = FieldPolicy::default();
        let id = "hRSV/B/Australia/VIC-RCH056/2019";
        assert_eq!(extract_field(id, "/", 0, 1, policy).unwrap(), "RSV");
        assert_eq!(extract_field(id, "/", 1, 2, policy).unwrap(), "B");
        assert_eq!(extract_field(id, "/", 2, 3, policy).unwrap(), "Australia");
        assert_eq!(extract_field(id, "/", 3, 4, policy).unwrap(), "VIC-RCH056");
        assert_eq!(extract_field(id, "/", 1, 3, policy).unwrap(), "B/Australia");
    }

    #[test]
    fn test_extract_field_trailing_fallback() {
        let policy = FieldPolicy::default();
        assert_eq!(
            extract_field("hRSV/B/Australia/VIC/2019", "/", 4, 5, policy).unwrap(),
            "2019"
        );
        // Extra trailing fields are not counted, only the last one is returned
        assert_eq!(
            extract_field("hRSV/B/Australia/VIC/x/2019", "/", 4, 5, policy).unwrap(),
            "2019"
        );
        assert_eq!(extract_field("plain", "/", 4, 5, policy).unwrap(), "plain");
    }

    #[test]
    fn test_extract_field_custom_policy() {
        let policy = FieldPolicy {
            max_indexed_field: 0,
        };
        assert_eq!(extract_field("a/b/c", "/", 1, 2, policy).unwrap(), "c");
        assert_eq!(extract_field("ab/c", "/", 0, 1, policy).unwrap(), "b");
    }

    #[test]
    fn test_extract_field_zero_drops_first_char() {
        let policy = FieldPolicy::default();
        assert_eq!(
            extract_field("hRSV/B/Australia/VIC/2019", "/", 0, 1, policy).unwrap(),
            "RSV"
        );
        assert_eq!(nth_field("hRSV/B/Australia/VIC/2019", "/", 0, policy).unwrap(), "RSV");
        assert_eq!(extract_field("h/B", "/", 0, 1, policy).unwrap(), "");
        // A leading delimiter leaves nothing to skip past
        assert!(extract_field("/B", "/", 0, 1, policy).is_err());
    }

    #[test]
    fn test_extract_field_missing_delimiter() {
        let err = extract_field("RSV", "/", 1, 2, FieldPolicy::default()).unwrap_err();
        assert_eq!(err.fragment, "RSV");
        assert!(extract_field("RSV/A", "/", 1, 2, FieldPolicy::default()).is_err());
    }

    #[test]
    fn test_nth_field() {
        let policy = FieldPolicy::default();
        assert_eq!(nth_field("RSV/A/USA/2020", "/", 1, policy).unwrap(), "A");
        assert_eq!(nth_field("a|b|c", "|", 1, policy).unwrap(), "b");
    }

    #[test]
    fn test_strip_labeled_number() {
        assert_eq!(strip_labeled_number::<u64>("Length = 100", '=', None), Ok(100));
        assert_eq!(
            strip_labeled_number::<f64>(" Expect = 1e-10", '=', None),
            Ok(1e-10)
        );
        assert_eq!(
            strip_labeled_number::<u32>("Identities = 90 (90%)", '=', Some('(')),
            Ok(90)
        );
        // Terminator absent means the value runs to the end
        assert_eq!(strip_labeled_number::<u32>("n=7", '=', Some('(')), Ok(7));
    }

    #[test]
    fn test_strip_labeled_number_failures() {
        let err = strip_labeled_number::<u64>("Length 100", '=', None).unwrap_err();
        assert_eq!(err.fragment, "Length 100");
        assert!(strip_labeled_number::<u64>("Length = many", '=', None).is_err());
        assert!(strip_labeled_number::<u64>("Length = -5", '=', None).is_err());
    }

    #[test]
    fn test_parse_ratio() {
        assert_eq!(parse_ratio("3/4 (75%)"), Ok(0.75));
        assert_eq!(parse_ratio(" 3/4 "), Ok(0.75));
        assert_eq!(parse_ratio("0/5"), Ok(0.0));
        assert_eq!(parse_ratio("5/5"), Ok(1.0));
    }

    #[test]
    fn test_parse_ratio_failures() {
        assert!(parse_ratio("1/0").is_err());
        assert!(parse_ratio("3 of 4").is_err());
        assert!(parse_ratio("x/4").is_err());
        assert!(parse_ratio("3/y").is_err());
        assert!(parse_ratio("5/4").is_err());
        assert_eq!(parse_ratio("1/0").unwrap_err().expected, "a non-zero total");
    }
}
