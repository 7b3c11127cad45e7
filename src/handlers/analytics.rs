//! Dashboard summary and time-bucketed performance endpoints. The heavy
//! lifting lives in `crate::analytics`; these handlers load the owner's
//! entities and validate the date range.

use axum::{extract::State, Extension};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::analytics::{
    dashboard_summary, performance_buckets, DashboardSummary, PerformanceBucket, Period,
};
use crate::error::ApiError;
use crate::middleware::{ApiQuery, ApiResponse, AuthUser};
use crate::state::AppState;

use super::validate::FieldErrors;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub period: Option<String>,
}

/// GET /api/analytics/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<DashboardSummary>, ApiError> {
    let entities = state.entities.list_all(auth.user_id).await?;
    Ok(ApiResponse::success(dashboard_summary(&entities, Utc::now())))
}

/// GET /api/analytics/performance?startDate=..&endDate=..&period=..
pub async fn performance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiQuery(params): ApiQuery<PerformanceParams>,
) -> Result<ApiResponse<Vec<PerformanceBucket>>, ApiError> {
    let mut errors = FieldErrors::new();

    let start = match params.start_date.as_deref().and_then(|s| parse_range_date(s, false)) {
        Some(start) => start,
        None => {
            errors.add("startDate", "Must be a valid date (YYYY-MM-DD or RFC 3339)");
            Utc::now()
        }
    };
    let end = match params.end_date.as_deref().and_then(|s| parse_range_date(s, true)) {
        Some(end) => end,
        None => {
            errors.add("endDate", "Must be a valid date (YYYY-MM-DD or RFC 3339)");
            Utc::now()
        }
    };
    let period = match params.period.as_deref() {
        None => Period::Daily,
        Some(raw) => match Period::parse(raw) {
            Some(period) => period,
            None => {
                errors.add("period", "Must be one of: daily, weekly, monthly");
                Period::Daily
            }
        },
    };
    errors.into_result()?;

    let entities = state.entities.list_all(auth.user_id).await?;
    Ok(ApiResponse::success(performance_buckets(&entities, start, end, period)))
}

/// Accepts a bare date or a full RFC 3339 timestamp. A bare end date is
/// widened to the end of that day so the range stays inclusive.
fn parse_range_date(raw: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        let time = if end_of_day {
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
        } else {
            NaiveTime::MIN
        };
        return Some(date.and_time(time).and_utc());
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn bare_dates_parse_with_day_bounds() {
        let start = parse_range_date("2025-03-01", false).unwrap();
        assert_eq!(start.hour(), 0);
        let end = parse_range_date("2025-03-31", true).unwrap();
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
    }

    #[test]
    fn rfc3339_timestamps_parse() {
        let dt = parse_range_date("2025-03-01T10:30:00Z", false).unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn garbage_dates_do_not_parse() {
        assert!(parse_range_date("not-a-date", false).is_none());
        assert!(parse_range_date("2025-13-40", false).is_none());
    }
}
