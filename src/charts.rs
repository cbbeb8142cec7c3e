//! Chart-ready series derived from fleet data.
//!
//! Pure transforms only: fetching lives in the API client and rendering
//! lives with the consumer. Bucketed series take an explicit end date so
//! output is deterministic regardless of when the transform runs.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::models::{Driver, FeedbackEntry, RevenuePoint, Ride, RideStatus};

/// A labeled series ready for a bar or line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[allow(dead_code)] // Helper methods - some used, others for future use
impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Day buckets for the `days` days ending at `end`, oldest first.
fn day_window(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..i64::from(days))
        .rev()
        .map(|offset| end - Duration::days(offset))
        .collect()
}

fn day_label(day: NaiveDate) -> String {
    day.format("%b %d").to_string()
}

/// Completed rides per day over the trailing window.
pub fn rides_per_day(rides: &[Ride], end: NaiveDate, days: u32) -> ChartSeries {
    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for ride in rides {
        if ride.status() != RideStatus::Completed {
            continue;
        }
        if let Some(completed_at) = &ride.completed_at {
            *counts.entry(completed_at.date_naive()).or_insert(0) += 1;
        }
    }

    let window = day_window(end, days);
    ChartSeries {
        labels: window.iter().copied().map(day_label).collect(),
        values: window
            .iter()
            .map(|day| f64::from(counts.get(day).copied().unwrap_or(0)))
            .collect(),
    }
}

/// Gross revenue per day over the trailing window. Days the reporting
/// service has no rollup for chart as zero.
pub fn revenue_trend(points: &[RevenuePoint], end: NaiveDate, days: u32) -> ChartSeries {
    let mut gross: HashMap<NaiveDate, f64> = HashMap::new();
    for point in points {
        *gross.entry(point.date).or_insert(0.0) += point.gross;
    }

    let window = day_window(end, days);
    ChartSeries {
        labels: window.iter().copied().map(day_label).collect(),
        values: window
            .iter()
            .map(|day| gross.get(day).copied().unwrap_or(0.0))
            .collect(),
    }
}

/// Drivers per availability status, largest group first.
pub fn driver_status_counts(drivers: &[Driver]) -> ChartSeries {
    let mut counts: Vec<(String, u32)> = Vec::new();
    for driver in drivers {
        let label = driver.status().to_string();
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    // Ties break alphabetically so the series is stable run to run
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ChartSeries {
        labels: counts.iter().map(|(label, _)| label.clone()).collect(),
        values: counts.iter().map(|(_, n)| f64::from(*n)).collect(),
    }
}

/// Feedback counts per star rating, 1 through 5. Out-of-range ratings are
/// clamped into the scale.
pub fn rating_histogram(feedback: &[FeedbackEntry]) -> ChartSeries {
    let mut counts = [0u32; 5];
    for entry in feedback {
        counts[usize::from(entry.stars()) - 1] += 1;
    }

    ChartSeries {
        labels: (1..=5).map(|stars| format!("{}*", stars)).collect(),
        values: counts.iter().map(|n| f64::from(*n)).collect(),
    }
}

/// Mean star rating across feedback, if any exists.
pub fn average_rating(feedback: &[FeedbackEntry]) -> Option<f64> {
    if feedback.is_empty() {
        return None;
    }
    let sum: u32 = feedback.iter().map(|entry| u32::from(entry.stars())).sum();
    Some(f64::from(sum) / feedback.len() as f64)
}
