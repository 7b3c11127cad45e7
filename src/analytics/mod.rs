//! Aggregation over a user's entities: the dashboard summary and the
//! time-bucketed performance series.
//!
//! Both functions are pure over an already-loaded entity slice; the
//! handlers load the owner's full collection first (unbounded, an accepted
//! scale limitation).

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{Entity, EntityStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Period::Daily),
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_entities: u64,
    pub active_entities: u64,
    pub total_views: i64,
    /// Mean engagement rounded to one decimal place; 0 when there are no
    /// entities, never NaN.
    pub avg_engagement: f64,
    /// Percent change in entity-creation count, current calendar month vs
    /// the month before, rounded to the nearest integer. Defined as 0 when
    /// the prior month has no entities, which conflates "no baseline" with
    /// "no growth" (see DESIGN.md).
    pub trend: i64,
}

/// One sparse aggregation bucket. Buckets with no matching entities are
/// omitted, not zero-filled.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBucket {
    pub date: String,
    pub entities: u64,
    pub views: i64,
    pub engagement: f64,
}

pub fn dashboard_summary(entities: &[Entity], now: DateTime<Utc>) -> DashboardSummary {
    let total_entities = entities.len() as u64;
    let active_entities =
        entities.iter().filter(|e| e.status == EntityStatus::Active).count() as u64;
    let total_views: i64 = entities.iter().map(|e| e.metrics.views).sum();

    let avg_engagement = if entities.is_empty() {
        0.0
    } else {
        let sum: f64 = entities.iter().map(|e| e.metrics.engagement).sum();
        round1(sum / entities.len() as f64)
    };

    DashboardSummary {
        total_entities,
        active_entities,
        total_views,
        avg_engagement,
        trend: month_over_month_trend(entities, now),
    }
}

fn month_over_month_trend(entities: &[Entity], now: DateTime<Utc>) -> i64 {
    let this_month = (now.year(), now.month());
    let prev_month = if now.month() == 1 { (now.year() - 1, 12) } else { (now.year(), now.month() - 1) };

    let count_in = |ym: (i32, u32)| {
        entities
            .iter()
            .filter(|e| (e.created_at.year(), e.created_at.month()) == ym)
            .count() as i64
    };

    let current = count_in(this_month);
    let previous = count_in(prev_month);
    if previous == 0 {
        return 0;
    }
    (((current - previous) as f64 / previous as f64) * 100.0).round() as i64
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Derive the bucket key for a creation date.
/// daily → the calendar date; weekly → the Sunday-aligned start of that
/// week; monthly → the year-month.
pub fn bucket_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Daily => date.format("%Y-%m-%d").to_string(),
        Period::Weekly => {
            let back = date.weekday().num_days_from_sunday() as i64;
            (date - Duration::days(back)).format("%Y-%m-%d").to_string()
        }
        Period::Monthly => date.format("%Y-%m").to_string(),
    }
}

/// Bucket the entities created within `[start, end]` (inclusive) by the
/// chosen period, accumulating count, views, and engagement per bucket.
/// The result is sorted ascending by date key.
pub fn performance_buckets(
    entities: &[Entity],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period: Period,
) -> Vec<PerformanceBucket> {
    let mut buckets: BTreeMap<String, (u64, i64, f64)> = BTreeMap::new();

    for entity in entities {
        if entity.created_at < start || entity.created_at > end {
            continue;
        }
        let key = bucket_key(entity.created_at.date_naive(), period);
        let slot = buckets.entry(key).or_insert((0, 0, 0.0));
        slot.0 += 1;
        slot.1 += entity.metrics.views;
        slot.2 += entity.metrics.engagement;
    }

    buckets
        .into_iter()
        .map(|(date, (entities, views, engagement))| PerformanceBucket {
            date,
            entities,
            views,
            engagement,
        })
        .collect()
}
