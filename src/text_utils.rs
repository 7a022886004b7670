use std::ops::Index;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

pub const WORDS_PER_MINUTE: usize = 200;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_TIME_REGEX: Regex = Regex::new(
            r#"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?(\.\d{0,3})?)?$"#
        ).unwrap();
    }

    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = caps.get(4).map_or(Ok(0), |x| to_u32(x.as_str()))?;
    let mn: u32 = caps.get(5).map_or(Ok(0), |x| to_u32(x.as_str()))?;
    let s: u32 = caps.get(6).map_or(Ok(0), |x| to_u32(x.as_str()))?;

    let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
        return Err(format!("Invalid date {}", buf));
    };
    let Some(time) = NaiveTime::from_hms_opt(h, mn, s) else {
        return Err(format!("Invalid time {}", buf));
    };

    Ok(NaiveDateTime::new(date, time))
}

/// Front-matter dates come either as plain dates, RFC 3339 timestamps or the
/// `YYYY-MM-DD HH:MM:SS.mmm` form the post scaffolder writes.
pub fn parse_post_date(buf: &str) -> Result<NaiveDateTime, String> {
    let buf = buf.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(buf) {
        return Ok(dt.naive_utc());
    }
    parse_date_time(buf)
}

pub fn format_date_time(date_time: &NaiveDateTime) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

pub fn format_long_date(date_time: &NaiveDateTime) -> String {
    date_time.format("%B %-d, %Y").to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Minutes are rounded up and never go below one.
pub fn reading_time(text: &str) -> String {
    let minutes = word_count(text).div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let date_time = parse_date_time("2017-09-10 10:42:32.123").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");

        let date_time = parse_date_time("2017-09-10 10:42:32").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");

        let date_time = parse_date_time("2017-09-10").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "00:00:00");
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_date_time("last tuesday").is_err());
        assert!(parse_date_time("2017-13-40").is_err());
    }

    #[test]
    fn test_parse_post_date_rfc3339() {
        let date_time = parse_post_date("2024-03-15T08:30:00Z").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2024-03-15");
        assert_eq!(time, "08:30:00");
    }

    #[test]
    fn test_format_long_date() {
        let date_time = parse_date_time("2024-03-05").unwrap();
        assert_eq!(format_long_date(&date_time), "March 5, 2024");
    }

    #[test]
    fn test_reading_time() {
        let four_hundred = vec!["word"; 400].join(" ");
        assert_eq!(reading_time(&four_hundred), "2 min read");
        assert_eq!(reading_time("word"), "1 min read");
        assert_eq!(reading_time(""), "1 min read");
        assert_eq!(reading_time("  \n\t "), "1 min read");

        let four_hundred_one = vec!["word"; 401].join("\n");
        assert_eq!(reading_time(&four_hundred_one), "3 min read");
    }

    #[test]
    fn test_word_count_whitespace_runs() {
        assert_eq!(word_count("one  two\n\nthree\tfour "), 4);
        assert_eq!(word_count(""), 0);
    }
}
