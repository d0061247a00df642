use crate::domain::diagnostic::{Diagnostic, Normalized};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub department: String,
    /// `None` when the course number is not numeric.
    pub course_id: Option<u32>,
}

/// Splits `"CSCI 1010"` into department and course number.
///
/// The department is the first whitespace-separated token, verbatim. The course
/// number is the leading digits of the second token, so `"1010W"` still reads as
/// 1010; anything without leading digits becomes `None` and the result is
/// `Defaulted`. Callers keep such sections rather than dropping them.
pub fn normalize_subject(input: &str) -> Normalized<Subject> {
    let mut tokens = input.split_whitespace();
    let department = tokens.next().unwrap_or_default().to_string();
    let number = tokens.next().unwrap_or_default();

    match leading_int(number) {
        Some(course_id) => Normalized::Clean(Subject {
            department,
            course_id: Some(course_id),
        }),
        None => Normalized::Defaulted {
            value: Subject {
                department,
                course_id: None,
            },
            reason: Diagnostic::NonNumericCourseId {
                raw: input.to_string(),
            },
        },
    }
}

/// Integer value of the digits at the start of `raw` (after leading whitespace).
/// Digit runs too large for `u32` (over ten digits) give `None`; crns and
/// course numbers on the listing are four to five digits.
pub(crate) fn leading_int(raw: &str) -> Option<u32> {
    let raw = raw.trim_start();
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}
