//! Day-first parsing of combined `"<date> <time>"` strings.
//!
//! Numeric dates that start with a four-digit year are read year-first (the
//! ISO form). Every other numeric date is read day-first, so `02/01/2024` is
//! 2 January 2024. Only when a day-first reading is impossible (`01/13/2024`)
//! is the date read month-first.
//!
//! A column is parsed with a single [`DateTimeLayout`], inferred from its
//! first value; later values must fit the same layout.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_SEPARATORS: [char; 3] = ['-', '/', '.'];

// `%.f` also matches whole seconds, so no separate `%H:%M:%S` entry.
static TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    YearFirst,
    DayFirst,
    MonthFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateShape {
    pub order: DateOrder,
    pub separator: char,
    pub short_year: bool,
}

impl DateShape {
    pub fn detect(token: &str) -> Result<Self, String> {
        let separator = token
            .chars()
            .find(|ch| DATE_SEPARATORS.contains(ch))
            .ok_or_else(|| format!("date '{token}' has no '-', '/' or '.' separator"))?;

        let parts: Vec<&str> = token.split(separator).collect();
        let numeric = parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()));
        if parts.len() != 3 || !numeric {
            return Err(format!(
                "date '{token}' is not three numeric components separated by '{separator}'"
            ));
        }

        if parts[0].len() == 4 {
            return Ok(Self {
                order: DateOrder::YearFirst,
                separator,
                short_year: false,
            });
        }

        let first: u32 = parts[0].parse().unwrap_or(0);
        let second: u32 = parts[1].parse().unwrap_or(0);
        let order = if second > 12 && (1..=12).contains(&first) {
            DateOrder::MonthFirst
        } else {
            DateOrder::DayFirst
        };
        Ok(Self {
            order,
            separator,
            short_year: parts[2].len() <= 2,
        })
    }

    /// Values in one column must share separator, year width and whether the
    /// year leads. Day-first and month-first readings of the same shape mix.
    fn fits(&self, other: &DateShape) -> bool {
        self.separator == other.separator
            && self.short_year == other.short_year
            && (self.order == DateOrder::YearFirst) == (other.order == DateOrder::YearFirst)
    }

    pub fn format(&self) -> String {
        let sep = self.separator;
        let year = if self.short_year { "%y" } else { "%Y" };
        match self.order {
            DateOrder::YearFirst => format!("%Y{sep}%m{sep}%d"),
            DateOrder::DayFirst => format!("%d{sep}%m{sep}{year}"),
            DateOrder::MonthFirst => format!("%m{sep}%d{sep}{year}"),
        }
    }
}

/// Date shape plus time format shared by every value of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeLayout {
    date: DateShape,
    date_format: String,
    time: &'static str,
}

impl DateTimeLayout {
    pub fn infer(text: &str) -> Result<Self, String> {
        let (date_token, time_token) = split_date_time(text);
        let date = DateShape::detect(date_token)?;

        if time_token.is_empty() {
            return Err("missing time component".to_string());
        }
        let time = TIME_FORMATS
            .iter()
            .copied()
            .find(|fmt| NaiveTime::parse_from_str(time_token, fmt).is_ok())
            .ok_or_else(|| format!("unrecognized time '{time_token}'"))?;

        let layout = Self {
            date,
            date_format: date.format(),
            time,
        };
        // Reject a first value whose date fits the shape but not the calendar.
        layout.parse(text)?;
        Ok(layout)
    }

    pub fn date_shape(&self) -> DateShape {
        self.date
    }

    pub fn time_format(&self) -> &'static str {
        self.time
    }

    pub fn parse(&self, text: &str) -> Result<NaiveDateTime, String> {
        let (date_token, time_token) = split_date_time(text);

        if !self.date.fits(&DateShape::detect(date_token)?) {
            return Err(format!(
                "date '{date_token}' does not match the column layout '{}'",
                self.date_format
            ));
        }
        let date = NaiveDate::parse_from_str(date_token, &self.date_format)
            .map_err(|err| format!("invalid date '{date_token}': {err}"))?;

        if time_token.is_empty() {
            return Err("missing time component".to_string());
        }
        let time = NaiveTime::parse_from_str(time_token, self.time).map_err(|err| {
            format!("invalid time '{time_token}' for format '{}': {err}", self.time)
        })?;

        Ok(date.and_time(time))
    }
}

impl fmt::Display for DateTimeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date_format, self.time)
    }
}

/// Parses a single value on its own, inferring the layout from it.
pub fn parse_day_first(text: &str) -> Result<NaiveDateTime, String> {
    DateTimeLayout::infer(text)?.parse(text)
}

fn split_date_time(text: &str) -> (&str, &str) {
    let trimmed = text.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((date, time)) => (date, time.trim()),
        None => (trimmed, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid test datetime")
    }

    #[test]
    fn iso_dates_are_year_first() {
        assert_eq!(
            parse_day_first("2024-01-01 08:00").unwrap(),
            naive(2024, 1, 1, 8, 0)
        );
        assert_eq!(
            parse_day_first("2024-03-02 17:45").unwrap(),
            naive(2024, 3, 2, 17, 45)
        );
    }

    #[test]
    fn ambiguous_dates_are_day_first() {
        assert_eq!(
            parse_day_first("02/01/2024 08:00").unwrap(),
            naive(2024, 1, 2, 8, 0)
        );
        assert_eq!(
            parse_day_first("01/02/2024 08:00").unwrap(),
            naive(2024, 2, 1, 8, 0)
        );
        assert_eq!(
            parse_day_first("13.01.2024 23:59").unwrap(),
            naive(2024, 1, 13, 23, 59)
        );
    }

    #[test]
    fn impossible_day_first_dates_read_month_first() {
        assert_eq!(
            parse_day_first("01/13/2024 08:00").unwrap(),
            naive(2024, 1, 13, 8, 0)
        );

        let layout = DateTimeLayout::infer("01/13/2024 08:00").unwrap();
        assert_eq!(layout.date_shape().order, DateOrder::MonthFirst);
        assert_eq!(layout.to_string(), "%m/%d/%Y %H:%M");
        assert_eq!(
            layout.parse("02/01/2024 09:00").unwrap(),
            naive(2024, 2, 1, 9, 0)
        );
    }

    #[test]
    fn day_first_column_rejects_month_first_value() {
        let layout = DateTimeLayout::infer("02/01/2024 08:00").unwrap();
        let err = layout.parse("01/13/2024 08:00").unwrap_err();
        assert!(err.contains("invalid date"), "unexpected error: {err}");
    }

    #[test]
    fn two_digit_years_use_short_year_format() {
        let layout = DateTimeLayout::infer("02/01/24 08:00").unwrap();
        assert!(layout.date_shape().short_year);
        assert_eq!(layout.parse("02/01/24 08:00").unwrap(), naive(2024, 1, 2, 8, 0));
    }

    #[test]
    fn accepts_seconds_fractions_and_meridiem() {
        let with_fraction = parse_day_first("2024-01-01 08:00:30.250").unwrap();
        assert_eq!(with_fraction.and_utc().timestamp_subsec_millis(), 250);

        assert_eq!(
            parse_day_first("05/06/2024 8:15 PM").unwrap(),
            naive(2024, 6, 5, 20, 15)
        );
    }

    #[test]
    fn whole_and_fractional_seconds_share_a_layout() {
        let layout = DateTimeLayout::infer("2024-01-01 08:00:30").unwrap();
        assert_eq!(layout.time_format(), "%H:%M:%S%.f");
        let parsed = layout.parse("2024-01-01 08:00:30.5").unwrap();
        assert_eq!(parsed.and_utc().timestamp_subsec_millis(), 500);
    }

    #[test]
    fn missing_time_is_an_error() {
        let err = parse_day_first("2024-01-01 ").unwrap_err();
        assert!(err.contains("missing time"), "unexpected error: {err}");

        let layout = DateTimeLayout::infer("2024-01-01 08:00").unwrap();
        assert!(layout.parse("2024-01-02 ").is_err());
    }

    #[test]
    fn layout_is_fixed_by_first_value() {
        let layout = DateTimeLayout::infer("02/01/2024 08:00").unwrap();
        assert_eq!(layout.time_format(), "%H:%M");
        assert_eq!(layout.to_string(), "%d/%m/%Y %H:%M");

        assert!(layout.parse("2024-01-02 08:00").is_err());
        assert!(layout.parse("03/01/2024 09:30:00").is_err());
        assert_eq!(
            layout.parse("28/02/2024 09:30").unwrap(),
            naive(2024, 2, 28, 9, 30)
        );
    }

    #[test]
    fn rejects_non_numeric_dates() {
        assert!(parse_day_first("yesterday 08:00").is_err());
        assert!(parse_day_first("2024-Jan-01 08:00").is_err());
        assert!(parse_day_first("nan nan").is_err());
    }
}
