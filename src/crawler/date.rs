// src/crawler/date.rs
//! 公開日ラベル ("12 October 2023", "3 days ago" など) のベストエフォートなパーサー。
//! 解釈できない入力は `None` を返し、決してエラーにしない。
//! EBA の表記 (日・月・年) と相対表現はここで処理し、それ以外は `dateparser` に任せる。

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_ORDINAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("Failed to compile ordinal regex")
});

static RE_WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)[a-z]*\.?,?\s+")
        .expect("Failed to compile weekday regex")
});

static RE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(published|posted|updated|date)(\s+on)?\s*:?\s*")
        .expect("Failed to compile prefix regex")
});

static RE_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]+\.? \d{4}$").expect("Failed to compile month-year regex")
});

static RE_RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+|an?)\s+(minute|hour|day|week|month|year)s?\s+ago$")
        .expect("Failed to compile relative date regex")
});

// 日付のみの書式 (日・月・年がそろっているもの)
const DAY_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B, %Y",
    "%Y-%m-%d",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
];

/// 自由形式の日付テキストを UTC のタイムスタンプに変換する。
/// 相対表現 ("yesterday" など) は `now` を基準に解釈する。
pub fn parse_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return None;
    }

    // 相対表現にマッチしたら結果はそこで確定する (桁あふれは None)
    if RE_RELATIVE.is_match(&normalized) || is_relative_word(&normalized) {
        return parse_relative(&normalized, now);
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(&normalized) {
        return Some(date.with_timezone(&Utc));
    }

    if let Some(date) = parse_absolute(&normalized, now.year()) {
        return Some(midnight_utc(date));
    }

    // 時刻付きの表記などは dateparser に任せる (時刻がなければ 0:00 UTC)
    dateparser::parse_with(&normalized, &Utc, NaiveTime::MIN).ok()
}

fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let collapsed = collapsed.trim_matches(|c: char| c == ',' || c == '|' || c == '-' || c == ' ');
    let without_prefix = RE_PREFIX.replace(collapsed, "");
    let without_weekday = RE_WEEKDAY.replace(&without_prefix, "");
    RE_ORDINAL.replace_all(&without_weekday, "$1").trim().to_string()
}

fn is_relative_word(text: &str) -> bool {
    matches!(
        text.to_lowercase().as_str(),
        "now" | "just now" | "today" | "yesterday"
    )
}

fn parse_relative(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match text.to_lowercase().as_str() {
        "now" | "just now" | "today" => return Some(now),
        "yesterday" => return now.checked_sub_signed(Duration::try_days(1)?),
        _ => {}
    }

    let caps = RE_RELATIVE.captures(text)?;
    let amount = match caps.get(1)?.as_str() {
        n if n.eq_ignore_ascii_case("a") || n.eq_ignore_ascii_case("an") => 1,
        n => n.parse::<u32>().ok()?,
    };
    let delta = match caps.get(2)?.as_str().to_lowercase().as_str() {
        "minute" => Duration::try_minutes(amount.into())?,
        "hour" => Duration::try_hours(amount.into())?,
        "day" => Duration::try_days(amount.into())?,
        "week" => Duration::try_weeks(amount.into())?,
        "month" => return now.checked_sub_months(Months::new(amount)),
        "year" => return now.checked_sub_months(Months::new(amount.checked_mul(12)?)),
        _ => return None,
    };
    now.checked_sub_signed(delta)
}

fn parse_absolute(text: &str, current_year: i32) -> Option<NaiveDate> {
    // "October 2023" は月初とみなす
    if RE_MONTH_YEAR.is_match(text) {
        return parse_exact(&format!("1 {}", text.replace('.', "")), "%d %B %Y");
    }

    if let Some(date) = DAY_FORMATS.iter().find_map(|fmt| parse_exact(text, fmt)) {
        return Some(date);
    }

    // "12 October" は現在の年とみなす
    ["%d %B %Y", "%B %d %Y"]
        .iter()
        .find_map(|fmt| parse_exact(&format!("{} {}", text, current_year), fmt))
}

/// chrono は書式中の空白を空文字にもマッチさせるため ("October 2023" が
/// "%B %d %Y" で 23年として通ってしまう)、語の数が書式と一致するときだけ試す
fn parse_exact(text: &str, fmt: &str) -> Option<NaiveDate> {
    if text.split_whitespace().count() != fmt.split_whitespace().count() {
        return None;
    }
    NaiveDate::parse_from_str(text, fmt).ok()
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 10, 30, 0).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn parses_day_month_year_labels() {
        assert_eq!(parse_date("3 January 2024", now()), Some(ymd(2024, 1, 3)));
        assert_eq!(parse_date("12 October 2023", now()), Some(ymd(2023, 10, 12)));
        assert_eq!(parse_date("  12\n   Oct 2023 ", now()), Some(ymd(2023, 10, 12)));
        assert_eq!(parse_date("January 3, 2024", now()), Some(ymd(2024, 1, 3)));
        assert_eq!(parse_date("3rd January 2024", now()), Some(ymd(2024, 1, 3)));
        assert_eq!(parse_date("Wednesday, 3 January 2024", now()), Some(ymd(2024, 1, 3)));
        assert_eq!(parse_date("Published on 3 January 2024", now()), Some(ymd(2024, 1, 3)));
    }

    #[test]
    fn parses_numeric_labels() {
        assert_eq!(parse_date("2024-01-03", now()), Some(ymd(2024, 1, 3)));
        assert_eq!(parse_date("03.01.2024", now()), Some(ymd(2024, 1, 3)));
        assert_eq!(parse_date("03/01/2024", now()), Some(ymd(2024, 1, 3)));
    }

    #[test]
    fn timestamps_keep_their_time() {
        assert_eq!(
            parse_date("2024-01-03T12:00:00+02:00", now()),
            Some(Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn partial_dates_are_completed() {
        assert_eq!(parse_date("October 2023", now()), Some(ymd(2023, 10, 1)));
        assert_eq!(parse_date("January 2024", now()), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_date("October 12", now()), Some(ymd(2024, 10, 12)));
        assert_eq!(parse_date("12 October", now()), Some(ymd(2024, 10, 12)));
    }

    #[test]
    fn relative_phrases_use_the_reference_time() {
        assert_eq!(parse_date("today", now()), Some(now()));
        assert_eq!(parse_date("Yesterday", now()), Some(now() - Duration::days(1)));
        assert_eq!(parse_date("3 days ago", now()), Some(now() - Duration::days(3)));
        assert_eq!(parse_date("a week ago", now()), Some(now() - Duration::weeks(1)));
        assert_eq!(
            parse_date("2 months ago", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn oversized_relative_counts_yield_none() {
        assert_eq!(parse_date("100000000 days ago", now()), None);
        assert_eq!(parse_date("4000000000 weeks ago", now()), None);
        assert_eq!(parse_date("4000000000 hours ago", now()), None);
        assert_eq!(parse_date("4000000000 years ago", now()), None);
        assert_eq!(parse_date("99999999999 days ago", now()), None);
    }

    #[test]
    fn other_timestamp_layouts_go_through_dateparser() {
        assert_eq!(
            parse_date("2024-01-03 12:00:00", now()),
            Some(Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn unparsable_text_yields_none() {
        assert_eq!(parse_date("", now()), None);
        assert_eq!(parse_date("   ", now()), None);
        assert_eq!(parse_date("Newsletter", now()), None);
        assert_eq!(parse_date("31 February 2024", now()), None);
    }
}
