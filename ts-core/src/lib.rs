use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Chart time in the unit the host payload uses (seconds from the server).
pub type Timestamp = i64;

/// Values below this are second-resolution timestamps.
pub const SECONDS_THRESHOLD: i64 = 10_000_000_000;
pub const MS: i64 = 1_000;

/// Normalize a payload timestamp to epoch milliseconds.
pub fn to_millis(ts: Timestamp) -> i64 {
    if ts < SECONDS_THRESHOLD {
        ts.saturating_mul(MS)
    } else {
        ts
    }
}

/// Format a payload timestamp as `YYYY-MM-DD HH:MM` in the given offset.
pub fn format_timestamp(ts: Timestamp, offset: FixedOffset) -> String {
    match DateTime::<Utc>::from_timestamp_millis(to_millis(ts)) {
        Some(dt) => dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

/// Payloads carry times as integers or floats depending on the serializer.
fn de_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTs {
        Int(i64),
        Float(f64),
    }
    match RawTs::deserialize(deserializer)? {
        RawTs::Int(v) => Ok(v),
        RawTs::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
        RawTs::Float(v) => Err(serde::de::Error::custom(format!("invalid time {v}"))),
    }
}

pub trait HasTimestamp {
    fn ts(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(deserialize_with = "de_timestamp")]
    pub time: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBar {
    #[serde(deserialize_with = "de_timestamp")]
    pub time: Timestamp,
    pub volume: f64,
}

/// One sample of a pre-computed indicator line (EMA, band, RSI, MACD...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    #[serde(deserialize_with = "de_timestamp")]
    pub time: Timestamp,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[serde(alias = "long", alias = "BUY", alias = "Buy")]
    Buy,
    #[serde(alias = "short", alias = "SELL", alias = "Sell")]
    Sell,
}

impl TradeSide {
    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only trade record as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(deserialize_with = "de_timestamp")]
    pub time: Timestamp,
    pub price: f64,
    pub side: TradeSide,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub pnl: Option<f64>,
    #[serde(default, alias = "closing_price")]
    pub closing_price: Option<f64>,
    #[serde(default)]
    pub leverage: Option<f64>,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl HasTimestamp for Candle {
    fn ts(&self) -> Timestamp {
        self.time
    }
}

impl HasTimestamp for VolumeBar {
    fn ts(&self) -> Timestamp {
        self.time
    }
}

impl HasTimestamp for IndicatorPoint {
    fn ts(&self) -> Timestamp {
        self.time
    }
}

impl HasTimestamp for Trade {
    fn ts(&self) -> Timestamp {
        self.time
    }
}

/// Time-ordered series with unique timestamps and binary-searchable lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries<T> {
    data: Vec<T>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T: HasTimestamp> TimeSeries<T> {
    /// Build from samples in any order. Duplicate timestamps keep the last sample.
    pub fn from_unsorted(mut samples: Vec<T>) -> Self {
        // Stable sort keeps payload order among equal timestamps.
        samples.sort_by_key(|s| s.ts());
        let mut data: Vec<T> = Vec::with_capacity(samples.len());
        for s in samples {
            match data.last_mut() {
                Some(last) if last.ts() == s.ts() => *last = s,
                _ => data.push(s),
            }
        }
        Self { data }
    }

    /// True when timestamps are strictly increasing.
    pub fn is_strictly_ordered(samples: &[T]) -> bool {
        samples.windows(2).all(|w| w[0].ts() < w[1].ts())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Sample with exactly this timestamp.
    pub fn at(&self, ts: Timestamp) -> Option<&T> {
        self.data
            .binary_search_by_key(&ts, |s| s.ts())
            .ok()
            .and_then(|idx| self.data.get(idx))
    }

    /// Median gap between consecutive samples, if there are at least two.
    pub fn median_spacing(&self) -> Option<i64> {
        let mut gaps: Vec<i64> = self
            .data
            .windows(2)
            .map(|w| w[1].ts().saturating_sub(w[0].ts()))
            .filter(|g| *g > 0)
            .collect();
        if gaps.is_empty() {
            return None;
        }
        gaps.sort_unstable();
        Some(gaps[gaps.len() / 2])
    }
}
