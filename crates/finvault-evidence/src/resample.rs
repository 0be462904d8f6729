//! Daily-to-weekly price resampling
//!
//! Daily closes are noisy; the analysts work from one close per calendar
//! week. Weeks are anchored to end on Sunday, and the bucket value is the
//! last observed close in that week, not an average.

use crate::api::yahoo::PriceSample;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One week of the resampled series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyClose {
    /// Reported end date of the week (clamped to as-of for the trailing
    /// partial week)
    pub week_end: NaiveDate,
    /// Last observed close in the week, rounded to 2 decimal places
    pub close: f64,
}

/// The Sunday that ends the week containing `date`
///
/// A Sunday sample ends its own week.
pub fn week_end_sunday(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new(days_to_sunday))
        .unwrap_or(date)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Resample a chronologically ordered daily series into weekly closes
///
/// One entry per non-empty week bucket, ordered by week. A trailing bucket
/// whose Sunday lies beyond `as_of` reports `as_of` instead; the series
/// never projects into the future. Input dates must already be
/// timezone-naive calendar dates.
pub fn resample_weekly(samples: &[PriceSample], as_of: NaiveDate) -> Vec<WeeklyClose> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    // Chronological input means later samples overwrite earlier ones,
    // leaving the last observed close per bucket.
    for sample in samples {
        buckets.insert(week_end_sunday(sample.date), sample.close);
    }

    buckets
        .into_iter()
        .map(|(week_end, close)| WeeklyClose {
            week_end: week_end.min(as_of),
            close: round2(close),
        })
        .collect()
}
