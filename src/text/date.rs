use chrono::{Datelike, NaiveDate};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

/// English ordinal suffix for a day of month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// A date split into the parts drawn by the ordinal date renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrdinalDate {
    /// Day of month, no padding.
    pub day: String,
    /// `st`, `nd`, `rd` or `th`.
    pub suffix: &'static str,
    /// Lower-case English month name.
    pub month: String,
    /// Four-digit year.
    pub year: String,
}

impl OrdinalDate {
    /// Parse a date field. Returns `None` for blank or unrecognized input.
    pub fn parse(raw: &str) -> Option<Self> {
        parse_date(raw).map(Self::from_date)
    }

    /// Split an already-parsed date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            day: date.day().to_string(),
            suffix: ordinal_suffix(date.day()),
            month: date.format("%B").to_string().to_lowercase(),
            year: date.year().to_string(),
        }
    }

    /// Text drawn after the suffix: `" december, 2026"`.
    pub fn month_year(&self) -> String {
        format!(" {}, {}", self.month, self.year)
    }

    /// Whole date on one line: `"10th december, 2026"`.
    pub fn full(&self) -> String {
        format!("{}{}{}", self.day, self.suffix, self.month_year())
    }
}

/// Accepts the formats listed in [`DATE_FORMATS`] plus ISO date-times (time part ignored).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    let (date_part, _) = s.split_once(['T', ' '])?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
#[path = "../../tests/unit/text/date.rs"]
mod tests;
