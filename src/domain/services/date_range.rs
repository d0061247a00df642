use crate::domain::diagnostic::{Diagnostic, Normalized};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

/// `"08/24/2020 - 12/11/2020"` into its two dates. Anything that does not split
/// into exactly two parts on `-` defaults to empty dates.
pub fn split_date_range(input: &str) -> Normalized<DateRange> {
    let parts: Vec<&str> = input.split('-').collect();

    match parts.as_slice() {
        [start, end] => Normalized::Clean(DateRange {
            start_date: start.trim().to_string(),
            end_date: end.trim().to_string(),
        }),
        _ => Normalized::Defaulted {
            value: DateRange::default(),
            reason: Diagnostic::MalformedDateRange {
                raw: input.to_string(),
                parts: parts.len(),
            },
        },
    }
}
