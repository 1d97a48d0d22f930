use std::ops::Index;

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::i18n::Lang;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part, which is ignored.
pub fn parse_date(buf: &str) -> Result<NaiveDate, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})").unwrap();
    }

    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date {}", buf));
    };

    let y: i32 = to_int(caps.index(1), buf)?;
    let m: u32 = to_int(caps.index(2), buf)?;
    let d: u32 = to_int(caps.index(3), buf)?;

    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("Invalid date {}", buf))
}

/// Splits `2025-11-28-example-post` into its date and the remaining slug.
/// Returns `None` when the name carries no valid date prefix.
pub fn split_date_prefix(file_stem: &str) -> Option<(NaiveDate, &str)> {
    lazy_static! {
        static ref PREFIX_REGEX: Regex = Regex::new(r"^(?P<date>\d{4}-\d{2}-\d{2})-(?P<slug>.+)$").unwrap();
    }

    let caps = PREFIX_REGEX.captures(file_stem)?;
    let date = NaiveDate::parse_from_str(caps.name("date")?.as_str(), "%Y-%m-%d").ok()?;
    let slug = caps.name("slug")?.as_str();
    Some((date, slug))
}

pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

pub fn read_time_minutes(body: &str, words_per_minute: u32) -> u32 {
    let words = word_count(body) as u32;
    let wpm = words_per_minute.max(1);
    words.div_ceil(wpm)
}

/// `snow-like` -> `Snow Like`
pub fn format_category_name(category: &str) -> String {
    category.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_post_date(date: &NaiveDate, lang: Lang) -> String {
    match lang {
        Lang::En => date.format("%b %-d, %Y").to_string(),
        Lang::Zh => date.format("%Y年%-m月%-d日").to_string(),
    }
}

pub fn format_comment_time(date_time: &DateTime<FixedOffset>, lang: Lang) -> String {
    match lang {
        Lang::En => date_time.format("%B %-d, %Y at %I:%M %p").to_string(),
        Lang::Zh => date_time.format("%Y年%-m月%-d日 %H:%M").to_string(),
    }
}
