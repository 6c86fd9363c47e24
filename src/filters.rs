//! Template filters registered with the site generator.
//!
//! | Filter | Kind | Behavior |
//! |---|---|---|
//! | `contentDate` | Nunjucks | `2020-11-03` → `November 3, 2020` |
//! | `cssmin` | universal | minified stylesheet, input returned on failure |

use chrono::{DateTime, Datelike, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unrecognized date '{0}' (expected YYYY-MM-DD or RFC 3339)")]
    InvalidDate(String),
    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Format a post date as `Month D, YYYY`.
pub fn content_date(date: &impl Datelike) -> String {
    format!(
        "{} {}, {}",
        MONTHS[date.month0() as usize],
        date.day(),
        date.year()
    )
}

/// Parse a front-matter date. Timestamps keep the calendar date of their own offset.
pub fn parse_date(value: &str) -> Result<NaiveDate, FilterError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| FilterError::InvalidDate(value.to_string()))
}

/// String form of `contentDate`, as templates call it.
pub fn content_date_filter(value: &str) -> Result<String, FilterError> {
    parse_date(value).map(|date| content_date(&date))
}

/// Minify a stylesheet.
///
/// The CSS is minified as the body of a `<style>` element so the same
/// minifier handles inline and standalone stylesheets.
pub fn cssmin(code: &str) -> String {
    let cfg = minify_html::Cfg {
        minify_css: true,
        ..minify_html::Cfg::default()
    };
    let wrapped = format!("<style>{code}</style>");
    let minified = minify_html::minify(wrapped.as_bytes(), &cfg);

    match String::from_utf8(minified) {
        Ok(out) => out
            .strip_prefix("<style>")
            .and_then(|rest| rest.strip_suffix("</style>"))
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string()),
        Err(_) => {
            log::warn!("cssmin produced invalid UTF-8, keeping stylesheet as-is");
            code.to_string()
        }
    }
}

/// String form of `cssmin`. Never fails.
pub fn cssmin_filter(value: &str) -> Result<String, FilterError> {
    Ok(cssmin(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_date_formats_month_day_year() {
        let date = NaiveDate::from_ymd_opt(2020, 11, 3).unwrap();
        assert_eq!(content_date(&date), "November 3, 2020");
    }

    #[test]
    fn content_date_does_not_pad_day() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 9).unwrap();
        assert_eq!(content_date(&date), "January 9, 2021");
    }

    #[test]
    fn content_date_last_month() {
        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(content_date(&date), "December 31, 1999");
    }

    #[test]
    fn parse_plain_date() {
        let date = parse_date("2020-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
    }

    #[test]
    fn parse_rfc3339_keeps_own_calendar_date() {
        let date = parse_date("2020-05-01T23:30:00-02:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 5, 1).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_date("yesterday"),
            Err(FilterError::InvalidDate(_))
        ));
        assert!(parse_date("2020-13-01").is_err());
    }

    #[test]
    fn content_date_filter_end_to_end() {
        assert_eq!(content_date_filter(" 2019-07-04 ").unwrap(), "July 4, 2019");
    }

    #[test]
    fn cssmin_strips_whitespace() {
        let css = "body {\n    color: red;\n    margin: 0;\n}\n\nh1 {\n    font-weight: 500;\n}\n";
        let out = cssmin(css);
        assert!(out.len() < css.len());
        assert!(!out.contains('\n'));
        assert!(out.contains("color:red"));
        assert!(out.contains("h1"));
    }

    #[test]
    fn cssmin_empty_input() {
        assert_eq!(cssmin(""), "");
    }
}
