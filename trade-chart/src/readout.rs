//! Hovered-bar readout written to the host's readout node.

use chrono::FixedOffset;
use serde::Serialize;
use ts_core::{format_timestamp, Candle, IndicatorPoint, TimeSeries, Timestamp};

use crate::error::ChartError;
use crate::payload::ChartPayload;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverReadout {
    pub time: String,
    pub timestamp: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<f64>,
}

impl HoverReadout {
    pub fn to_json(&self) -> Result<String, ChartError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Time-indexed view over one render's payload.
#[derive(Debug)]
pub struct ReadoutIndex {
    candles: TimeSeries<Candle>,
    volume: Vec<(Timestamp, f64)>,
    ema20: TimeSeries<IndicatorPoint>,
    rsi: TimeSeries<IndicatorPoint>,
    macd: TimeSeries<IndicatorPoint>,
    signal: TimeSeries<IndicatorPoint>,
    histogram: TimeSeries<IndicatorPoint>,
    offset: FixedOffset,
}

impl ReadoutIndex {
    pub fn new(payload: &ChartPayload, offset: FixedOffset) -> Self {
        let series = |points: &[IndicatorPoint]| TimeSeries::from_unsorted(points.to_vec());
        let mut volume: Vec<(Timestamp, f64)> = payload.volume.iter().map(|v| (v.time, v.volume)).collect();
        volume.sort_by_key(|(t, _)| *t);
        Self {
            candles: TimeSeries::from_unsorted(payload.candlestick.clone()),
            volume,
            ema20: series(&payload.ema20),
            rsi: series(&payload.rsi),
            macd: series(&payload.macd),
            signal: series(&payload.signal),
            histogram: series(&payload.histogram),
            offset,
        }
    }

    fn volume_at(&self, ts: Timestamp) -> f64 {
        self.volume
            .binary_search_by_key(&ts, |(t, _)| *t)
            .map(|i| self.volume[i].1)
            .unwrap_or(0.0)
    }

    /// Readout for the bar at `ts`, if the price series has one.
    pub fn readout_at(&self, ts: Timestamp) -> Option<HoverReadout> {
        let candle = self.candles.at(ts)?;
        let value = |s: &TimeSeries<IndicatorPoint>| s.at(ts).map(|p| p.value);
        Some(HoverReadout {
            time: format_timestamp(ts, self.offset),
            timestamp: ts,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: self.volume_at(ts),
            ema20: value(&self.ema20),
            rsi: value(&self.rsi),
            macd: value(&self.macd),
            signal: value(&self.signal),
            histogram: value(&self.histogram),
        })
    }
}

/// Suppresses repeated publishes for the same bar.
#[derive(Debug, Default)]
pub struct ReadoutPublisher {
    last: Option<Timestamp>,
}

impl ReadoutPublisher {
    /// Returns the readout to publish for a crosshair at `time`, or `None` when
    /// the cursor left the pane or is still on the last published bar.
    pub fn on_crosshair(&mut self, index: &ReadoutIndex, time: Option<Timestamp>) -> Option<HoverReadout> {
        let ts = time?;
        if self.last == Some(ts) {
            return None;
        }
        let readout = index.readout_at(ts)?;
        self.last = Some(ts);
        Some(readout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::parse_chart_payload;

    const PAYLOAD: &str = r#"{
        "candlestick": [
            {"time": 1700000000, "open": 10, "high": 12, "low": 9, "close": 11},
            {"time": 1700000060, "open": 11, "high": 11.5, "low": 10, "close": 10.5}
        ],
        "volume": [{"time": 1700000000, "volume": 500}, {"time": 1700000060, "volume": 320}],
        "ema20": [{"time": 1700000060, "value": 10.8}],
        "rsi": [{"time": 1700000000, "value": 55.5}]
    }"#;

    fn index() -> ReadoutIndex {
        let payload = parse_chart_payload(PAYLOAD).unwrap();
        ReadoutIndex::new(&payload, FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn readout_carries_bar_and_present_indicators() {
        let r = index().readout_at(1_700_000_000).unwrap();
        assert_eq!(r.time, "2023-11-14 22:13");
        assert_eq!(r.close, 11.0);
        assert_eq!(r.volume, 500.0);
        assert_eq!(r.rsi, Some(55.5));
        assert_eq!(r.ema20, None);

        let json: serde_json::Value = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000i64);
        assert!(json.get("ema20").is_none());
        assert!(json.get("macd").is_none());
        assert_eq!(json["rsi"], 55.5);
    }

    #[test]
    fn publishes_once_per_bar() {
        let index = index();
        let mut publisher = ReadoutPublisher::default();
        assert!(publisher.on_crosshair(&index, Some(1_700_000_000)).is_some());
        assert!(publisher.on_crosshair(&index, Some(1_700_000_000)).is_none());
        assert!(publisher.on_crosshair(&index, None).is_none());
        let next = publisher.on_crosshair(&index, Some(1_700_000_060)).unwrap();
        assert_eq!(next.ema20, Some(10.8));
        assert!(publisher.on_crosshair(&index, Some(42)).is_none(), "no bar at that time");
        assert!(publisher.on_crosshair(&index, Some(1_700_000_000)).is_some());
    }
}
