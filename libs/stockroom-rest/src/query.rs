//! Query parameters shared by the report endpoints

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

/// `?start_date=&end_date=&total=` parameters accepted by the report endpoints.
///
/// A non-empty `total` requests lifetime figures and bypasses the date range.
/// Dates are inclusive calendar days (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total: Option<String>,
}

impl DateRangeQuery {
    /// Resolve into a half-open UTC interval `[start, end)`, or `None` for
    /// lifetime figures. Partial ranges are rejected.
    pub fn resolve(&self) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, String> {
        if self.total.as_deref().is_some_and(|t| !t.is_empty()) {
            return Ok(None);
        }

        match (self.start_date, self.end_date) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => {
                if end < start {
                    return Err("end_date must not precede start_date".to_string());
                }
                let end_exclusive = end
                    .succ_opt()
                    .ok_or_else(|| "end_date is out of range".to_string())?;
                Ok(Some((day_start(start), day_start(end_exclusive))))
            }
            _ => Err("start_date and end_date must be provided together".to_string()),
        }
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_query_means_lifetime() {
        assert_eq!(DateRangeQuery::default().resolve(), Ok(None));
    }

    #[test]
    fn total_bypasses_range() {
        let query = DateRangeQuery {
            start_date: Some(date("2024-01-01")),
            end_date: Some(date("2024-01-31")),
            total: Some("true".to_string()),
        };
        assert_eq!(query.resolve(), Ok(None));
    }

    #[test]
    fn empty_total_does_not_bypass_range() {
        let query = DateRangeQuery {
            start_date: Some(date("2024-01-01")),
            end_date: Some(date("2024-01-31")),
            total: Some(String::new()),
        };
        let (start, end) = query.resolve().unwrap().unwrap();
        assert_eq!(start.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        // End day is included: the bound is the start of the next day.
        assert_eq!(end.to_rfc3339(), "2024-02-01T00:00:00+00:00");
    }

    #[test]
    fn partial_range_is_rejected() {
        let query = DateRangeQuery {
            start_date: Some(date("2024-01-01")),
            end_date: None,
            total: None,
        };
        assert!(query.resolve().is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let query = DateRangeQuery {
            start_date: Some(date("2024-02-01")),
            end_date: Some(date("2024-01-01")),
            total: None,
        };
        assert!(query.resolve().is_err());
    }
}
