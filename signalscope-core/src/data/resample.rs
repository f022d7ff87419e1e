//! Daily → weekly / monthly aggregation.
//!
//! Each period bar takes the first open, highest high, lowest low, last close
//! and summed volume of the daily bars in that period, and is dated at the
//! period's last trading day. Input must be sorted ascending by date.

use crate::domain::Bar;
use chrono::{Datelike, NaiveDate};

/// Aggregate into ISO weeks.
pub fn to_weekly(bars: &[Bar]) -> Vec<Bar> {
    resample_by(bars, |d| {
        let w = d.iso_week();
        (w.year(), w.week())
    })
}

/// Aggregate into calendar months.
pub fn to_monthly(bars: &[Bar]) -> Vec<Bar> {
    resample_by(bars, |d| (d.year(), d.month()))
}

fn resample_by<K: PartialEq>(bars: &[Bar], key: impl Fn(NaiveDate) -> K) -> Vec<Bar> {
    let mut out: Vec<Bar> = Vec::new();
    let mut current_key: Option<K> = None;

    for bar in bars {
        let k = key(bar.date);
        if current_key.as_ref() == Some(&k) {
            if let Some(agg) = out.last_mut() {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume += bar.volume;
                agg.date = bar.date;
                continue;
            }
        }
        out.push(bar.clone());
        current_key = Some(k);
    }

    out
}
