//! Pattern-based date formatting and parsing.
//!
//! Patterns use moment-style tokens (`YYYY-MM-DD HH:mm:ss`, `MMM D, YYYY`, ...),
//! `[literal]` escapes and a handful of named masks. Dates are naive; a `ZZ`
//! offset or trailing `Z` in parsed input converts the result to UTC.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use thiserror::Error;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
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

/// Longest input `parse` will look at.
pub const MAX_INPUT_LEN: usize = 1000;

/// Named masks usable in place of a pattern.
pub const MASKS: [(&str, &str); 8] = [
    ("default", "ddd MMM DD YYYY HH:mm:ss"),
    ("shortDate", "M/D/YY"),
    ("mediumDate", "MMM D, YYYY"),
    ("longDate", "MMMM D, YYYY"),
    ("fullDate", "dddd, MMMM D, YYYY"),
    ("shortTime", "HH:mm"),
    ("mediumTime", "HH:mm:ss"),
    ("longTime", "HH:mm:ss.SSS"),
];

/// Errors from [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date string")]
    Empty,
    #[error("date string too long ({0} bytes)")]
    TooLong(usize),
    #[error("no match for token {0} in date string")]
    MissingField(&'static str),
    #[error("date components out of range")]
    OutOfRange,
}

fn resolve_mask(pattern: &str) -> &str {
    MASKS
        .iter()
        .find(|(name, _)| *name == pattern)
        .map(|(_, mask)| *mask)
        .unwrap_or(pattern)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Day,
    DayPadded,
    DayOrdinal,
    Weekday,
    WeekdayPadded,
    WeekdayShort,
    WeekdayLong,
    Month,
    MonthPadded,
    MonthShort,
    MonthLong,
    YearShort,
    Year,
    Hour12,
    Hour12Padded,
    Hour24,
    Hour24Padded,
    Minute,
    MinutePadded,
    Second,
    SecondPadded,
    Tenths,
    Hundredths,
    Millis,
    MeridiemLower,
    MeridiemUpper,
    Offset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(Field),
    Literal(String),
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Field::Day => "D",
            Field::DayPadded => "DD",
            Field::DayOrdinal => "Do",
            Field::Weekday => "d",
            Field::WeekdayPadded => "dd",
            Field::WeekdayShort => "ddd",
            Field::WeekdayLong => "dddd",
            Field::Month => "M",
            Field::MonthPadded => "MM",
            Field::MonthShort => "MMM",
            Field::MonthLong => "MMMM",
            Field::YearShort => "YY",
            Field::Year => "YYYY",
            Field::Hour12 => "h",
            Field::Hour12Padded => "hh",
            Field::Hour24 => "H",
            Field::Hour24Padded => "HH",
            Field::Minute => "m",
            Field::MinutePadded => "mm",
            Field::Second => "s",
            Field::SecondPadded => "ss",
            Field::Tenths => "S",
            Field::Hundredths => "SS",
            Field::Millis => "SSS",
            Field::MeridiemLower => "a",
            Field::MeridiemUpper => "A",
            Field::Offset => "ZZ",
        }
    }

    fn pattern(self) -> Pattern {
        match self {
            Field::Day
            | Field::DayPadded
            | Field::Weekday
            | Field::WeekdayPadded
            | Field::Month
            | Field::MonthPadded
            | Field::YearShort
            | Field::Hour12
            | Field::Hour12Padded
            | Field::Hour24
            | Field::Hour24Padded
            | Field::Minute
            | Field::MinutePadded
            | Field::Second
            | Field::SecondPadded => Pattern::Digits { min: 1, max: 2 },
            Field::DayOrdinal => Pattern::DigitsWord,
            Field::Year => Pattern::Digits { min: 4, max: 4 },
            Field::Tenths => Pattern::Digits { min: 1, max: 1 },
            Field::Hundredths => Pattern::Digits { min: 2, max: 2 },
            Field::Millis => Pattern::Digits { min: 3, max: 3 },
            Field::WeekdayShort
            | Field::WeekdayLong
            | Field::MonthShort
            | Field::MonthLong
            | Field::MeridiemLower
            | Field::MeridiemUpper => Pattern::Word,
            Field::Offset => Pattern::Offset,
        }
    }
}

fn run_len(chars: &[char], start: usize, c: char) -> usize {
    chars[start..].iter().take_while(|&&ch| ch == c).count()
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = run_len(&chars, i, c);

        let (field, used) = match c {
            '[' | '"' | '\'' => {
                let close = if c == '[' { ']' } else { c };
                if let Some(end) = chars[i + 1..].iter().position(|&ch| ch == close) {
                    literal.extend(&chars[i + 1..i + 1 + end]);
                    i += end + 2;
                    continue;
                }
                (None, 1)
            }
            'd' => {
                let n = run.min(4);
                let field = match n {
                    1 => Field::Weekday,
                    2 => Field::WeekdayPadded,
                    3 => Field::WeekdayShort,
                    _ => Field::WeekdayLong,
                };
                (Some(field), n)
            }
            'M' => {
                let n = run.min(4);
                let field = match n {
                    1 => Field::Month,
                    2 => Field::MonthPadded,
                    3 => Field::MonthShort,
                    _ => Field::MonthLong,
                };
                (Some(field), n)
            }
            'Y' if run >= 4 => (Some(Field::Year), 4),
            'Y' if run >= 2 => (Some(Field::YearShort), 2),
            'S' => {
                let n = run.min(3);
                let field = match n {
                    1 => Field::Tenths,
                    2 => Field::Hundredths,
                    _ => Field::Millis,
                };
                (Some(field), n)
            }
            'D' if chars.get(i + 1) == Some(&'o') => (Some(Field::DayOrdinal), 2),
            'D' if run >= 2 => (Some(Field::DayPadded), 2),
            'D' => (Some(Field::Day), 1),
            'Z' if run >= 2 => (Some(Field::Offset), 2),
            'H' | 'h' | 'm' | 's' => {
                let padded = run >= 2;
                let field = match (c, padded) {
                    ('H', false) => Field::Hour24,
                    ('H', true) => Field::Hour24Padded,
                    ('h', false) => Field::Hour12,
                    ('h', true) => Field::Hour12Padded,
                    ('m', false) => Field::Minute,
                    ('m', true) => Field::MinutePadded,
                    ('s', false) => Field::Second,
                    _ => Field::SecondPadded,
                };
                (Some(field), if padded { 2 } else { 1 })
            }
            'a' => (Some(Field::MeridiemLower), 1),
            'A' => (Some(Field::MeridiemUpper), 1),
            _ => (None, 1),
        };

        match field {
            Some(field) => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field(field));
            }
            None => literal.extend(&chars[i..i + used]),
        }
        i += used;
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

// ===== Formatting =====

fn ordinal(day: u32) -> String {
    let suffix = match (day % 100, day % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

fn millis(date: &NaiveDateTime) -> u32 {
    (date.nanosecond() / 1_000_000).min(999)
}

/// Format `date` with a pattern or named mask.
pub fn format(date: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    let hour12 = match date.hour() % 12 {
        0 => 12,
        h => h,
    };
    let weekday = date.weekday().num_days_from_sunday();

    for token in tokenize(resolve_mask(pattern)) {
        let field = match token {
            Token::Literal(text) => {
                out.push_str(&text);
                continue;
            }
            Token::Field(field) => field,
        };
        let piece = match field {
            Field::Day => date.day().to_string(),
            Field::DayPadded => format!("{:02}", date.day()),
            Field::DayOrdinal => ordinal(date.day()),
            Field::Weekday => weekday.to_string(),
            Field::WeekdayPadded => format!("{:02}", weekday),
            Field::WeekdayShort => DAY_NAMES[weekday as usize][..3].to_string(),
            Field::WeekdayLong => DAY_NAMES[weekday as usize].to_string(),
            Field::Month => date.month().to_string(),
            Field::MonthPadded => format!("{:02}", date.month()),
            Field::MonthShort => MONTH_NAMES[date.month0() as usize][..3].to_string(),
            Field::MonthLong => MONTH_NAMES[date.month0() as usize].to_string(),
            Field::YearShort => {
                let year = date.year().to_string();
                year.get(2..).unwrap_or_default().to_string()
            }
            Field::Year => date.year().to_string(),
            Field::Hour12 => hour12.to_string(),
            Field::Hour12Padded => format!("{:02}", hour12),
            Field::Hour24 => date.hour().to_string(),
            Field::Hour24Padded => format!("{:02}", date.hour()),
            Field::Minute => date.minute().to_string(),
            Field::MinutePadded => format!("{:02}", date.minute()),
            Field::Second => date.second().to_string(),
            Field::SecondPadded => format!("{:02}", date.second()),
            Field::Tenths => (millis(date) as f64 / 100.0).round().to_string(),
            Field::Hundredths => format!("{:02}", (millis(date) as f64 / 10.0).round()),
            Field::Millis => format!("{:03}", millis(date)),
            Field::MeridiemLower => (if date.hour() < 12 { "am" } else { "pm" }).to_string(),
            Field::MeridiemUpper => (if date.hour() < 12 { "AM" } else { "PM" }).to_string(),
            Field::Offset => "+0000".to_string(),
        };
        out.push_str(&piece);
    }
    out
}

// ===== Parsing =====

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Digits { min: usize, max: usize },
    Word,
    DigitsWord,
    Offset,
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '\''
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

fn match_word(s: &str) -> Option<usize> {
    let digits = leading_digits(s);
    let letters: usize = s[digits..]
        .chars()
        .take_while(|&c| is_word_char(c))
        .map(char::len_utf8)
        .sum();
    (letters > 0).then_some(digits + letters)
}

impl Pattern {
    /// Length in bytes of a match anchored at the start of `s`.
    fn match_at(self, s: &str) -> Option<usize> {
        match self {
            Pattern::Digits { min, max } => {
                let n = leading_digits(s);
                (n >= min).then(|| n.min(max))
            }
            Pattern::Word => match_word(s),
            Pattern::DigitsWord => {
                let n = leading_digits(s).min(2);
                if n == 0 {
                    return None;
                }
                match_word(&s[n..]).map(|len| n + len)
            }
            Pattern::Offset => {
                let bytes = s.as_bytes();
                if !matches!(bytes.first(), Some(b'+') | Some(b'-')) {
                    return None;
                }
                let mut len = 1;
                if leading_digits(&s[len..]) < 2 {
                    return None;
                }
                len += 2;
                if bytes.get(len) == Some(&b':') {
                    len += 1;
                }
                if leading_digits(&s[len..]) < 2 {
                    return None;
                }
                Some(len + 2)
            }
        }
    }

    /// Leftmost match in `s` as (start, len).
    fn find(self, s: &str) -> Option<(usize, usize)> {
        s.char_indices()
            .find_map(|(i, _)| self.match_at(&s[i..]).map(|len| (i, len)))
    }
}

#[derive(Debug, Default)]
struct Parts {
    year: Option<i32>,
    month0: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<i64>,
    second: Option<u32>,
    millis: Option<u32>,
    pm: Option<bool>,
    offset_minutes: Option<i64>,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn number<T: std::str::FromStr>(digits: &str) -> Result<T, DateParseError> {
    digits.parse().map_err(|_| DateParseError::OutOfRange)
}

fn apply(field: Field, matched: &str, parts: &mut Parts) -> Result<(), DateParseError> {
    match field {
        Field::Day | Field::DayPadded => parts.day = Some(number(matched)?),
        Field::DayOrdinal => {
            let n = leading_digits(matched).min(2);
            parts.day = Some(number(&matched[..n])?);
        }
        Field::Month | Field::MonthPadded => {
            let month: u32 = number(matched)?;
            parts.month0 = Some(month.checked_sub(1).ok_or(DateParseError::OutOfRange)?);
        }
        Field::MonthShort | Field::MonthLong => {
            let wanted = capitalize(matched);
            let found = MONTH_NAMES.iter().position(|name| {
                if field == Field::MonthShort {
                    name[..3] == wanted
                } else {
                    *name == wanted
                }
            });
            if let Some(index) = found {
                parts.month0 = Some(index as u32);
            }
        }
        Field::YearShort => {
            let two: i32 = number(matched)?;
            let century = Utc::now().year() / 100;
            let century = if two > 68 { century - 1 } else { century };
            parts.year = Some(century * 100 + two);
        }
        Field::Year => parts.year = Some(number(matched)?),
        Field::Hour12 | Field::Hour12Padded | Field::Hour24 | Field::Hour24Padded => {
            parts.hour = Some(number(matched)?)
        }
        Field::Minute | Field::MinutePadded => parts.minute = Some(number(matched)?),
        Field::Second | Field::SecondPadded => parts.second = Some(number(matched)?),
        Field::Tenths => parts.millis = Some(number::<u32>(matched)? * 100),
        Field::Hundredths => parts.millis = Some(number::<u32>(matched)? * 10),
        Field::Millis => parts.millis = Some(number(matched)?),
        Field::MeridiemLower | Field::MeridiemUpper => match matched.to_lowercase().as_str() {
            "am" => parts.pm = Some(false),
            "pm" => parts.pm = Some(true),
            _ => {}
        },
        Field::Offset => {
            let digits: String = matched.chars().filter(char::is_ascii_digit).collect();
            let hours: i64 = number(&digits[..2])?;
            let minutes: i64 = number(&digits[2..])?;
            let total = hours * 60 + minutes;
            parts.offset_minutes = Some(if matched.starts_with('-') { -total } else { total });
        }
        Field::Weekday | Field::WeekdayPadded | Field::WeekdayShort | Field::WeekdayLong => {}
    }
    Ok(())
}

/// Parse `input` against a pattern or named mask.
///
/// Each token consumes the leftmost match of its pattern in the remaining
/// input, so literal separators need not match exactly. Missing components
/// default to the current year, January 1st, midnight.
pub fn parse(input: &str, pattern: &str) -> Result<NaiveDateTime, DateParseError> {
    if input.is_empty() {
        return Err(DateParseError::Empty);
    }
    if input.len() > MAX_INPUT_LEN {
        return Err(DateParseError::TooLong(input.len()));
    }

    let tokens = tokenize(resolve_mask(pattern));
    let has_offset = tokens.contains(&Token::Field(Field::Offset));

    let mut rest = input;
    if !has_offset {
        if let Some(stripped) = rest.strip_suffix('Z') {
            rest = stripped;
        }
    }

    let mut parts = Parts::default();
    for token in &tokens {
        let Token::Field(field) = token else {
            continue;
        };
        let field = *field;
        let (start, len) = field
            .pattern()
            .find(rest)
            .ok_or(DateParseError::MissingField(field.name()))?;
        apply(field, &rest[start..start + len], &mut parts)?;
        rest = &rest[start + len..];
    }

    let mut hour = parts.hour.unwrap_or(0);
    match parts.pm {
        Some(true) if parts.hour.is_some() && hour != 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        _ => {}
    }

    let year = parts.year.unwrap_or_else(|| Utc::now().year());
    let day = parts.day.filter(|&d| d > 0).unwrap_or(1);
    let date = NaiveDate::from_ymd_opt(year, parts.month0.unwrap_or(0) + 1, day)
        .ok_or(DateParseError::OutOfRange)?;
    let base = date
        .and_hms_milli_opt(hour, 0, parts.second.unwrap_or(0), parts.millis.unwrap_or(0))
        .ok_or(DateParseError::OutOfRange)?;

    let minutes = parts.minute.unwrap_or(0) - parts.offset_minutes.unwrap_or(0);
    base.checked_add_signed(Duration::minutes(minutes))
        .ok_or(DateParseError::OutOfRange)
}

#[cfg(test)]
#[path = "date_tests.rs"]
mod tests;
