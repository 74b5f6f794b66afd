use crate::models::{DailyClimateRecord, GddSummary};
use chrono::{Duration, NaiveDate};

/// Archive data is not published for the most recent days
pub const DEFAULT_ARCHIVE_LAG_DAYS: i64 = 2;

/// Round to one decimal place, halves toward positive infinity
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Growing degree days for a single day's mean temperature
pub fn daily_gdd(avg_c: f64, base_temp_c: f64) -> f64 {
    (avg_c - base_temp_c).max(0.0)
}

/// Inclusive archive range from sowing to `today - lag_days`, or `None` when
/// sowing falls on or after the last available archive day. A lag that
/// cannot be represented as a date yields `None` as well.
pub fn archive_window(
    sowing_date: NaiveDate,
    today: NaiveDate,
    lag_days: i64,
) -> Option<(NaiveDate, NaiveDate)> {
    let end = today.checked_sub_signed(Duration::try_days(lag_days)?)?;
    if sowing_date >= end {
        None
    } else {
        Some((sowing_date, end))
    }
}

/// Reduce a daily series to an accumulated GDD summary.
///
/// Days missing either temperature contribute nothing to the sum but still
/// count toward `day_count`. Averages are taken over the samples actually
/// present in each series so gaps do not drag them toward zero.
pub fn accumulate_gdd(records: &[DailyClimateRecord], base_temp_c: f64) -> GddSummary {
    if records.is_empty() {
        return GddSummary::zero();
    }

    let mut accumulated = 0.0;
    let mut valid_days = 0u32;
    for record in records {
        if let Some(avg) = record.daily_avg_c() {
            accumulated += daily_gdd(avg, base_temp_c);
            valid_days += 1;
        }
    }

    let day_count = records.len() as u32;
    if valid_days < day_count {
        tracing::warn!(
            "{} of {} days are missing temperature data",
            day_count - valid_days,
            day_count
        );
    }

    GddSummary {
        accumulated_gdd: round_one_decimal(accumulated),
        avg_max_temp_c: round_one_decimal(mean(records.iter().filter_map(|r| r.max_temp_c))),
        avg_min_temp_c: round_one_decimal(mean(records.iter().filter_map(|r| r.min_temp_c))),
        day_count,
        valid_days,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
