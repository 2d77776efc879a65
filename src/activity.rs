//! Activity calendar input
//!
//! One record per day, oldest first. Records come from a JSON file (plain
//! array or a contribution-calendar GraphQL response) or, when no usable
//! data is available, from a seeded synthetic year.

use std::path::Path;

use chrono::{Datelike, Days, NaiveDate, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::DAYS_PER_WEEK;
use crate::{GameError, Result};

/// Days kept from a calendar response
pub const DAYS_PER_YEAR: usize = 365;

/// Parse a strict zero-padded `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let shaped = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(GameError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| GameError::InvalidDate(s.to_string()))
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).map_err(serde::de::Error::custom)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= 5
}

/// One day of activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub count: u32,
}

impl ActivityRecord {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }
}

/// Parse a plain JSON array of `{date, count}` records
pub fn from_json(json: &str) -> Result<Vec<ActivityRecord>> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: GraphQlData,
}

#[derive(Deserialize)]
struct GraphQlData {
    user: GraphQlUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlUser {
    contributions_collection: ContributionsCollection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

#[derive(Deserialize)]
struct ContributionCalendar {
    weeks: Vec<CalendarWeek>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarWeek {
    contribution_days: Vec<CalendarDay>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDay {
    #[serde(deserialize_with = "deserialize_date")]
    date: NaiveDate,
    contribution_count: u32,
}

/// Extract the last year of records from a contribution-calendar response body
pub fn from_graphql_response(json: &str) -> Result<Vec<ActivityRecord>> {
    let response: GraphQlResponse = serde_json::from_str(json)?;
    let records: Vec<ActivityRecord> = response
        .data
        .user
        .contributions_collection
        .contribution_calendar
        .weeks
        .into_iter()
        .flat_map(|week| week.contribution_days)
        .map(|day| ActivityRecord::new(day.date, day.contribution_count))
        .collect();
    Ok(trailing_year(records))
}

/// Keep at most the last 365 records
pub fn trailing_year(mut records: Vec<ActivityRecord>) -> Vec<ActivityRecord> {
    if records.len() > DAYS_PER_YEAR {
        records.drain(..records.len() - DAYS_PER_YEAR);
    }
    records
}

/// Cumulative percent thresholds for active synthetic days: a roll below
/// entry `i` yields count `i + 1`
const SYNTHETIC_THRESHOLDS: [u32; 9] = [30, 55, 75, 85, 90, 94, 97, 99, 100];

fn synthetic_count(roll: u32) -> u32 {
    SYNTHETIC_THRESHOLDS
        .iter()
        .position(|&threshold| roll < threshold)
        .map_or(9, |i| i as u32 + 1)
}

/// Deterministic synthetic activity ending at `end`, oldest first
///
/// Weekdays are active 70% of the time, weekends 30%. Active days draw
/// 1-9 from a falling distribution, with an occasional 10-20 burst.
pub fn synthetic(seed: u64, end: NaiveDate, days: usize) -> Vec<ActivityRecord> {
    let mut rng = Pcg32::seed_from_u64(seed);

    let start = end
        .checked_sub_days(Days::new(days.saturating_sub(1) as u64))
        .unwrap_or(NaiveDate::MIN);
    start
        .iter_days()
        .take(days)
        .map(|date| {
            let active_chance = if is_weekend(date) { 0.3 } else { 0.7 };
            let count = if rng.random_bool(active_chance) {
                if rng.random_bool(0.05) {
                    rng.random_range(10..=20)
                } else {
                    synthetic_count(rng.random_range(0..100))
                }
            } else {
                0
            };
            ActivityRecord::new(date, count)
        })
        .collect()
}

/// Parse either a plain record array or a GraphQL response body
pub fn parse_any(json: &str) -> Result<Vec<ActivityRecord>> {
    from_json(json).or_else(|_| from_graphql_response(json))
}

/// Load records from a file, substituting a synthetic year when the file is
/// missing, malformed, or shorter than a week
pub fn load_or_synthetic(path: Option<&Path>, seed: u64) -> Vec<ActivityRecord> {
    let fallback = || synthetic(seed, Utc::now().date_naive(), DAYS_PER_YEAR);

    let Some(path) = path else {
        log::info!("No activity file given, using synthetic data (seed {seed})");
        return fallback();
    };

    let loaded = std::fs::read_to_string(path)
        .map_err(GameError::from)
        .and_then(|json| parse_any(&json));

    match loaded {
        Ok(records) if records.len() >= DAYS_PER_WEEK => {
            log::info!("Loaded {} days of activity from {}", records.len(), path.display());
            records
        }
        Ok(records) => {
            log::warn!(
                "{} has only {} records, using synthetic data",
                path.display(),
                records.len()
            );
            fallback()
        }
        Err(e) => {
            log::warn!("Could not load activity from {}: {e}; using synthetic data", path.display());
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    /// Write `body` to a per-test temp file and load it
    fn load_body(name: &str, body: &str) -> Vec<ActivityRecord> {
        let path = std::env::temp_dir().join(format!("contrib-breakout-{name}-{}.json", std::process::id()));
        std::fs::write(&path, body).unwrap();
        let records = load_or_synthetic(Some(&path), 1);
        let _ = std::fs::remove_file(&path);
        records
    }

    fn days_from(start: &str, counts: impl IntoIterator<Item = u32>) -> Vec<ActivityRecord> {
        date(start)
            .iter_days()
            .zip(counts)
            .map(|(d, count)| ActivityRecord::new(d, count))
            .collect()
    }

    #[test]
    fn test_date_parse() {
        let d = date("2024-02-29");
        assert_eq!((d.year(), d.month(), d.day()), (2024, 2, 29));
        assert_eq!(d.to_string(), "2024-02-29");
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_date_parse_rejects_loose_forms() {
        for s in ["2024-1-1", "+2024-01-01", " 2024-01-01 ", "02024-001-0001", "2024/01/01", "2024-01-01T00:00"] {
            assert!(parse_date(s).is_err(), "{s:?} should be rejected");
        }
        assert!(from_json(r#"[{"date":"2024-1-1","count":1}]"#).is_err());
    }

    #[test]
    fn test_weekend() {
        assert!(!is_weekend(date("1970-01-01"))); // Thursday
        assert!(!is_weekend(date("2024-06-10"))); // Monday
        assert!(is_weekend(date("2024-06-15"))); // Saturday
        assert!(is_weekend(date("2024-06-16"))); // Sunday
    }

    #[test]
    fn test_records_json() {
        let json = r#"[{"date":"2024-01-01","count":3},{"date":"2024-01-02","count":0}]"#;
        let records = from_json(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ActivityRecord::new(date("2024-01-01"), 3));
        assert!(from_json(r#"[{"date":"2024-01-01","count":-1}]"#).is_err());
    }

    #[test]
    fn test_graphql_response() {
        let json = r#"{"data":{"user":{"contributionsCollection":{"contributionCalendar":{
            "totalContributions": 5,
            "weeks":[
                {"contributionDays":[{"contributionCount":2,"date":"2024-01-07"},{"contributionCount":0,"date":"2024-01-08"}]},
                {"contributionDays":[{"contributionCount":3,"date":"2024-01-14"}]}
            ]}}}}}"#;
        let records = from_graphql_response(json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], ActivityRecord::new(date("2024-01-14"), 3));
        assert_eq!(parse_any(json).unwrap(), records);
    }

    #[test]
    fn test_trailing_year_keeps_newest() {
        let records = days_from("2023-01-01", 0..400);
        let kept = trailing_year(records);
        assert_eq!(kept.len(), DAYS_PER_YEAR);
        assert_eq!(kept[0].count, 35);
        assert_eq!(kept.last().unwrap().count, 399);
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        let end = date("2024-12-31");
        let a = synthetic(7, end, DAYS_PER_YEAR);
        let b = synthetic(7, end, DAYS_PER_YEAR);
        assert_eq!(a, b);
        assert_eq!(a.len(), DAYS_PER_YEAR);
        assert_eq!(a.last().unwrap().date, end);
        assert_eq!(a[0].date, date("2024-01-02"));
        assert_eq!(synthetic(7, end, 0), vec![]);
        assert!(a.iter().all(|r| r.count <= 20));
        assert!(a.iter().any(|r| r.count > 0));
        assert!(a.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_synthetic_count_buckets() {
        assert_eq!(synthetic_count(0), 1);
        assert_eq!(synthetic_count(29), 1);
        assert_eq!(synthetic_count(30), 2);
        assert_eq!(synthetic_count(89), 5);
        assert_eq!(synthetic_count(99), 9);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/nonexistent/activity.json");
        let records = load_or_synthetic(Some(path), 1);
        assert_eq!(records.len(), DAYS_PER_YEAR);
    }

    #[test]
    fn test_file_records_used_as_is() {
        let records = days_from("2024-03-03", (0..14).map(|i| i % 4));
        let body = serde_json::to_string(&records).unwrap();
        assert_eq!(load_body("array", &body), records);
    }

    #[test]
    fn test_short_file_falls_back() {
        let records = days_from("2024-03-03", [1, 2, 3, 4, 5, 6]);
        let body = serde_json::to_string(&records).unwrap();
        let loaded = load_body("short", &body);
        assert_eq!(loaded.len(), DAYS_PER_YEAR);
        let end = loaded.last().unwrap().date;
        assert_eq!(loaded, synthetic(1, end, DAYS_PER_YEAR));
    }

    #[test]
    fn test_graphql_file_loads() {
        let days: Vec<String> = (0..7)
            .map(|i| format!(r#"{{"contributionCount":{i},"date":"2024-01-{:02}"}}"#, i + 7))
            .collect();
        let body = format!(
            r#"{{"data":{{"user":{{"contributionsCollection":{{"contributionCalendar":{{"weeks":[{{"contributionDays":[{}]}}]}}}}}}}}}}"#,
            days.join(",")
        );
        let loaded = load_body("graphql", &body);
        assert_eq!(loaded, days_from("2024-01-07", 0..7));
    }

    #[test]
    fn test_garbage_file_falls_back() {
        let loaded = load_body("garbage", "not json at all {");
        assert_eq!(loaded.len(), DAYS_PER_YEAR);
        let end = loaded.last().unwrap().date;
        assert_eq!(loaded, synthetic(1, end, DAYS_PER_YEAR));
    }
}
