use serde::{Deserialize, Serialize};
use ts_core::{Candle, IndicatorPoint, TimeSeries, Trade, VolumeBar};

use crate::error::ChartError;

/// Chart payload produced by the server. Indicator series are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartPayload {
    #[serde(default)]
    pub candlestick: Vec<Candle>,
    #[serde(default)]
    pub volume: Vec<VolumeBar>,
    #[serde(default)]
    pub ema20: Vec<IndicatorPoint>,
    #[serde(default)]
    pub upper_band: Vec<IndicatorPoint>,
    #[serde(default)]
    pub middle_band: Vec<IndicatorPoint>,
    #[serde(default)]
    pub lower_band: Vec<IndicatorPoint>,
    #[serde(default)]
    pub rsi: Vec<IndicatorPoint>,
    #[serde(default)]
    pub macd: Vec<IndicatorPoint>,
    #[serde(default)]
    pub signal: Vec<IndicatorPoint>,
    #[serde(default)]
    pub histogram: Vec<IndicatorPoint>,
}

/// Host toggles passed with each invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderFlags {
    pub show_ema: bool,
    pub show_trades: bool,
    pub show_bollinger: bool,
    pub show_rsi: bool,
    pub show_macd: bool,
}

/// Features that are both requested and backed by data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub ema: bool,
    pub trades: bool,
    pub bollinger: bool,
    pub rsi: bool,
    pub macd: bool,
}

impl ChartPayload {
    pub fn has_candles(&self) -> bool {
        !self.candlestick.is_empty()
    }

    /// Sort every series by time and drop duplicate timestamps.
    pub fn normalize(&mut self) {
        if !TimeSeries::is_strictly_ordered(self.candlestick.as_slice()) {
            log::warn!("candlestick series not strictly ordered, sorting");
            self.candlestick = normalized(std::mem::take(&mut self.candlestick));
        }
        if !TimeSeries::is_strictly_ordered(self.volume.as_slice()) {
            log::warn!("volume series not strictly ordered, sorting");
            self.volume = normalized(std::mem::take(&mut self.volume));
        }
        for series in [
            &mut self.ema20,
            &mut self.upper_band,
            &mut self.middle_band,
            &mut self.lower_band,
            &mut self.rsi,
            &mut self.macd,
            &mut self.signal,
            &mut self.histogram,
        ] {
            if !TimeSeries::is_strictly_ordered(series.as_slice()) {
                *series = normalized(std::mem::take(series));
            }
        }
    }

    /// Resolve requested flags against available data. Missing data disables a feature.
    pub fn features(&self, flags: RenderFlags, trades: &[Trade]) -> Features {
        Features {
            ema: flags.show_ema && !self.ema20.is_empty(),
            trades: flags.show_trades && !trades.is_empty(),
            bollinger: flags.show_bollinger
                && !self.upper_band.is_empty()
                && !self.middle_band.is_empty()
                && !self.lower_band.is_empty(),
            rsi: flags.show_rsi && !self.rsi.is_empty(),
            macd: flags.show_macd
                && !self.macd.is_empty()
                && !self.signal.is_empty()
                && !self.histogram.is_empty(),
        }
    }
}

fn normalized<T: ts_core::HasTimestamp>(samples: Vec<T>) -> Vec<T> {
    TimeSeries::from_unsorted(samples).into_vec()
}

/// Parse the chart payload JSON. `null` yields an empty payload.
pub fn parse_chart_payload(json: &str) -> Result<ChartPayload, ChartError> {
    let payload: Option<ChartPayload> = serde_json::from_str(json)?;
    let mut payload = payload.unwrap_or_default();
    payload.normalize();
    Ok(payload)
}

/// Parse one render request. `None` means there is no chart data at all
/// (absent, blank or `null`), in which case the current view is kept.
pub fn parse_render_input(
    chart: Option<&str>,
    trades: Option<&str>,
) -> Result<Option<(ChartPayload, Vec<Trade>)>, ChartError> {
    let Some(chart) = chart.map(str::trim).filter(|s| !s.is_empty() && *s != "null") else {
        return Ok(None);
    };
    let payload = parse_chart_payload(chart)?;
    let trades = parse_trades(trades)?;
    Ok(Some((payload, trades)))
}

/// Parse the trades JSON. Absent, blank or `null` input means no trades.
pub fn parse_trades(json: Option<&str>) -> Result<Vec<Trade>, ChartError> {
    let Some(json) = json.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };
    let trades: Option<Vec<Trade>> = serde_json::from_str(json)?;
    Ok(trades.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "candlestick": [
            {"time": 60, "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5},
            {"time": 120, "open": 1.5, "high": 2.5, "low": 1.0, "close": 1.2}
        ],
        "volume": [{"time": 60, "volume": 10}, {"time": 120, "volume": 12}],
        "ema20": [{"time": 60, "value": 1.4}, {"time": 120, "value": 1.3}],
        "rsi": [],
        "macd": [{"time": 60, "value": 0.1}],
        "signal": [{"time": 60, "value": 0.05}]
    }"#;

    #[test]
    fn parses_payload_with_missing_series() {
        let payload = parse_chart_payload(PAYLOAD).unwrap();
        assert_eq!(payload.candlestick.len(), 2);
        assert_eq!(payload.volume[1].volume, 12.0);
        assert!(payload.upper_band.is_empty());
        assert!(payload.histogram.is_empty());
    }

    #[test]
    fn features_require_flag_and_data() {
        let payload = parse_chart_payload(PAYLOAD).unwrap();
        let all = RenderFlags {
            show_ema: true,
            show_trades: true,
            show_bollinger: true,
            show_rsi: true,
            show_macd: true,
        };
        let f = payload.features(all, &[]);
        assert!(f.ema);
        assert!(!f.trades);
        assert!(!f.bollinger);
        assert!(!f.rsi, "empty rsi series disables the pane");
        assert!(!f.macd, "macd needs the histogram too");

        let none = payload.features(RenderFlags::default(), &[]);
        assert_eq!(none, Features::default());
    }

    #[test]
    fn unordered_candles_are_sorted_with_volume() {
        let json = r#"{
            "candlestick": [
                {"time": 120, "open": 2, "high": 2, "low": 2, "close": 2},
                {"time": 60, "open": 1, "high": 1, "low": 1, "close": 1}
            ],
            "volume": [{"time": 120, "volume": 20}, {"time": 60, "volume": 10}]
        }"#;
        let payload = parse_chart_payload(json).unwrap();
        assert_eq!(payload.candlestick[0].time, 60);
        assert_eq!(payload.volume[0].volume, 10.0);
    }

    #[test]
    fn volume_is_sorted_even_when_candles_are_ordered() {
        let json = r#"{
            "candlestick": [
                {"time": 60, "open": 1, "high": 1, "low": 1, "close": 1},
                {"time": 120, "open": 2, "high": 2, "low": 2, "close": 2}
            ],
            "volume": [{"time": 120, "volume": 20}, {"time": 60, "volume": 10}, {"time": 60, "volume": 11}]
        }"#;
        let payload = parse_chart_payload(json).unwrap();
        let times: Vec<i64> = payload.volume.iter().map(|v| v.time).collect();
        assert_eq!(times, vec![60, 120]);
        assert_eq!(payload.volume[0].volume, 11.0);
        assert!(TimeSeries::is_strictly_ordered(payload.volume.as_slice()));
    }

    #[test]
    fn render_input_without_chart_data_is_skipped() {
        assert!(parse_render_input(None, Some("[]")).unwrap().is_none());
        assert!(parse_render_input(Some(" null "), None).unwrap().is_none());
        assert!(parse_render_input(Some("{\"candlestick\": 5}"), None).is_err());
        assert!(parse_render_input(Some(PAYLOAD), Some("[{")).is_err());

        let (payload, trades) = parse_render_input(Some(PAYLOAD), None).unwrap().unwrap();
        assert!(payload.has_candles());
        assert!(trades.is_empty());
        let (empty, _) = parse_render_input(Some("{}"), None).unwrap().unwrap();
        assert!(!empty.has_candles(), "empty payload still renders the no-data message");
    }

    #[test]
    fn null_and_garbage_inputs() {
        assert!(!parse_chart_payload("null").unwrap().has_candles());
        assert!(parse_chart_payload("{\"candlestick\": 5}").is_err());
        assert!(parse_trades(None).unwrap().is_empty());
        assert!(parse_trades(Some("  ")).unwrap().is_empty());
        assert!(parse_trades(Some("null")).unwrap().is_empty());
        assert!(parse_trades(Some("[{")).is_err());
        let trades =
            parse_trades(Some(r#"[{"time": 60, "price": 1.5, "side": "buy", "amount": 1, "cost": 1.5}]"#))
                .unwrap();
        assert_eq!(trades.len(), 1);
    }
}
