//! Hourly aggregation of raw sensor history into chart-ready series.
//!
//! The backend returns room-wide averages sampled every few minutes; the
//! chart wants one point per clock hour. Readings are bucketed by truncating
//! their timestamp down to the hour in UTC, each bucket is reduced to the
//! mean of its non-null values, and the surviving buckets become an indexed
//! series with a parallel label sequence.

use std::collections::BTreeMap;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, Time, UtcOffset};

use smartroom_api::models::{PowerReading, TempReading};

/// Anything carrying an ISO-8601 timestamp as raw text.
pub trait Timestamped {
    fn timestamp(&self) -> &str;
}

impl Timestamped for TempReading {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl Timestamped for PowerReading {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// One aggregated chart point. The x-coordinate is the position in the
/// series, not the timestamp; the matching label carries the bucket time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub index: usize,
    pub value: f64,
}

/// The ordered output of [`aggregate_hourly`]: points and labels are aligned
/// by position, `dropped` counts readings discarded for unparseable
/// timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    pub points: Vec<SeriesPoint>,
    pub labels: Vec<String>,
    pub dropped: usize,
}

impl HourlySeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Buckets `readings` by UTC hour and reduces each bucket to the mean of the
/// non-null projected values.
///
/// Readings whose timestamp fails to parse are dropped and counted, never
/// turned into an error. Null values contribute to neither sum nor count,
/// and an hour whose values are all null yields no point at all. Labels
/// render as `HH:mm`, or `dd/MM HH:mm` once the series spans more than one
/// calendar date.
pub fn aggregate_hourly<R, F>(readings: &[R], value: F) -> HourlySeries
where
    R: Timestamped,
    F: Fn(&R) -> Option<f64>,
{
    let mut buckets: BTreeMap<OffsetDateTime, (f64, usize)> = BTreeMap::new();
    let mut dropped = 0usize;

    for reading in readings {
        let Some(bucket) = parse_hour_bucket(reading.timestamp()) else {
            dropped += 1;
            continue;
        };
        let entry = buckets.entry(bucket).or_insert((0.0, 0));
        if let Some(value) = value(reading) {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "discarded readings with unparseable timestamps");
    }

    // Hours where every value was null would average to NaN; drop them
    // before they reach the chart.
    let averaged: Vec<(OffsetDateTime, f64)> = buckets
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(bucket, (sum, count))| (bucket, sum / count as f64))
        .collect();

    let multi_day = match (averaged.first(), averaged.last()) {
        (Some((first, _)), Some((last, _))) => first.date() != last.date(),
        _ => false,
    };

    let mut points = Vec::with_capacity(averaged.len());
    let mut labels = Vec::with_capacity(averaged.len());
    for (bucket, mean) in averaged {
        points.push(SeriesPoint {
            index: points.len(),
            value: mean,
        });
        labels.push(format_label(bucket, multi_day));
    }

    HourlySeries {
        points,
        labels,
        dropped,
    }
}

/// Parses an RFC 3339 timestamp and truncates it down to the start of its
/// UTC hour. Returns `None` for anything unparseable.
fn parse_hour_bucket(raw: &str) -> Option<OffsetDateTime> {
    let parsed = OffsetDateTime::parse(raw, &Rfc3339).ok()?;
    let utc = parsed.to_offset(UtcOffset::UTC);
    let hour_start = Time::from_hms(utc.hour(), 0, 0).ok()?;

    Some(utc.replace_time(hour_start))
}

fn format_label(bucket: OffsetDateTime, multi_day: bool) -> String {
    let rendered = if multi_day {
        let format = format_description!("[day]/[month] [hour]:[minute]");
        bucket.format(&format)
    } else {
        let format = format_description!("[hour]:[minute]");
        bucket.format(&format)
    };

    rendered.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        ts: &'static str,
        value: Option<f64>,
    }

    impl Timestamped for Sample {
        fn timestamp(&self) -> &str {
            self.ts
        }
    }

    fn sample(ts: &'static str, value: f64) -> Sample {
        Sample {
            ts,
            value: Some(value),
        }
    }

    fn aggregate(samples: &[Sample]) -> HourlySeries {
        aggregate_hourly(samples, |s| s.value)
    }

    #[test]
    fn readings_in_one_hour_merge_to_their_mean() {
        let series = aggregate(&[
            sample("2024-01-01T10:05:00Z", 10.0),
            sample("2024-01-01T10:40:00Z", 20.0),
            sample("2024-01-01T10:59:00Z", 30.0),
        ]);

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].value, 20.0);
        assert_eq!(series.labels, vec!["10:00".to_string()]);
    }

    #[test]
    fn null_values_do_not_count_toward_the_denominator() {
        let series = aggregate(&[
            sample("2024-01-01T10:05:00Z", 5.0),
            Sample {
                ts: "2024-01-01T10:20:00Z",
                value: None,
            },
            sample("2024-01-01T10:45:00Z", 15.0),
        ]);

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].value, 10.0);
    }

    #[test]
    fn hour_with_only_null_values_yields_no_point() {
        let series = aggregate(&[
            Sample {
                ts: "2024-01-01T09:10:00Z",
                value: None,
            },
            sample("2024-01-01T10:30:00Z", 4.0),
        ]);

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.labels, vec!["10:00".to_string()]);
        assert!(series.points.iter().all(|p| p.value.is_finite()));
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = aggregate(&[]);

        assert!(series.is_empty());
        assert!(series.labels.is_empty());
        assert_eq!(series.dropped, 0);
    }

    #[test]
    fn malformed_timestamps_are_dropped_and_counted() {
        let series = aggregate(&[
            Sample {
                ts: "bad-timestamp",
                value: Some(5.0),
            },
            sample("2024-01-01T10:00:00Z", 15.0),
        ]);

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].value, 15.0);
        assert_eq!(series.dropped, 1);
    }

    #[test]
    fn points_are_chronological_with_contiguous_indices() {
        // Deliberately out of order on input.
        let series = aggregate(&[
            sample("2024-01-01T12:00:00Z", 3.0),
            sample("2024-01-01T08:30:00Z", 1.0),
            sample("2024-01-01T10:15:00Z", 2.0),
        ]);

        assert_eq!(series.points.len(), 3);
        assert_eq!(series.labels.len(), 3);
        for (i, point) in series.points.iter().enumerate() {
            assert_eq!(point.index, i);
        }
        assert_eq!(series.labels, vec!["08:00", "10:00", "12:00"]);
        assert_eq!(
            series.points.iter().map(|p| p.value).collect::<Vec<_>>(),
            vec![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn offset_timestamps_truncate_in_utc() {
        // 10:30 at +02:00 is 08:30 UTC, so it lands in the 08:00 bucket.
        let series = aggregate(&[sample("2024-01-01T10:30:00+02:00", 7.0)]);

        assert_eq!(series.labels, vec!["08:00".to_string()]);
    }

    #[test]
    fn labels_switch_to_day_month_once_the_series_spans_dates() {
        let series = aggregate(&[
            sample("2024-01-01T23:10:00Z", 1.0),
            sample("2024-01-02T01:20:00Z", 2.0),
        ]);

        assert_eq!(
            series.labels,
            vec!["01/01 23:00".to_string(), "02/01 01:00".to_string()]
        );
    }

    #[test]
    fn aggregation_is_deterministic() {
        let samples = vec![
            sample("2024-01-01T10:05:00Z", 10.0),
            sample("2024-01-01T11:40:00Z", 20.0),
            Sample {
                ts: "not-a-time",
                value: Some(1.0),
            },
        ];

        assert_eq!(aggregate(&samples), aggregate(&samples));
    }

    #[test]
    fn bucket_count_is_bounded_by_distinct_hours() {
        let series = aggregate(&[
            sample("2024-01-01T10:01:00Z", 1.0),
            sample("2024-01-01T10:02:00Z", 2.0),
            sample("2024-01-01T11:01:00Z", 3.0),
            sample("2024-01-01T11:02:00Z", 4.0),
        ]);

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points.len(), series.labels.len());
    }
}
