use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

/// Parse a server timestamp such as `2021-01-03T13:02:03+00:00` or
/// `2021/01/03 13-02-03 UTC`.
///
/// Components are read as UTC wall-clock time; any trailing zone suffix is
/// matched but ignored.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    lazy_static::lazy_static! {
        static ref DATE_RE: Regex = Regex::new(
            r"^(\d{4})[-/\\](\d{2})[-/\\](\d{2})(?:\s+|T)(\d{2})[:-](\d{2})[:-](\d{2})(?:([ +-]\d{2}:\d{2}|\s*\S+|Z?))?$"
        ).unwrap();
    }

    let caps = DATE_RE.captures(input.trim())?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?
        .and_hms_opt(field(4)?, field(5)?, field(6)?)
}

/// Human rendering used in list rows and message metadata, in the local zone.
/// Returns an empty string for missing or unparseable input.
pub fn format_date(input: Option<&str>) -> String {
    format_date_in(input, &Local)
}

pub fn format_date_in<Tz>(input: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(parsed) = input.and_then(parse_date) else {
        return String::new();
    };
    let utc: DateTime<Utc> = Utc.from_utc_datetime(&parsed);
    utc.with_timezone(tz)
        .format("%A, %-d %b %Y %-I:%M:%S %p")
        .to_string()
}
