//! Runtime configuration.
//!
//! Every field has a default so a host can override just the pieces it cares
//! about with a partial JSON object stored in the `TRADE_CHART_CONFIG` global.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Name of the JS global that may hold a JSON config override.
pub const CONFIG_GLOBAL: &str = "TRADE_CHART_CONFIG";

/// Colours shared by every pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: String,
    pub text: String,
    pub grid: String,
    pub crosshair: String,
    pub up: String,
    pub down: String,
    pub ema: String,
    pub band_outer: String,
    pub band_middle: String,
    pub rsi: String,
    pub macd: String,
    pub signal: String,
    pub zero_line: String,
    pub watermark: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#151924".into(),
            text: "#d1d4dc".into(),
            grid: "#2B2B43".into(),
            crosshair: "#758696".into(),
            up: "#26a69a".into(),
            down: "#ef5350".into(),
            ema: "#f48fb1".into(),
            band_outer: "#90caf9".into(),
            band_middle: "#64b5f6".into(),
            rsi: "#7b1fa2".into(),
            macd: "#2196F3".into(),
            signal: "#FF9800".into(),
            zero_line: "#9e9e9e".into(),
            watermark: "rgba(255, 255, 255, 0.1)".into(),
        }
    }
}

/// Trade hit-test tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTolerance {
    /// Exclusive bound on |trade.time - cursor time|, in payload time units.
    pub time: i64,
    /// Exclusive bound on the vertical pixel distance to the marker.
    pub pixels: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self {
            time: 100_000,
            pixels: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub theme: Theme,
    /// Script sources tried in order when the library is missing.
    pub library_urls: Vec<String>,
    /// Delay before re-running the bootstrapper once the library loaded.
    pub retry_delay_ms: u32,
    pub hit_tolerance: HitTolerance,
    pub min_pane_px: f64,
    pub readout_element_id: String,
    pub tooltip_element_id: String,
    /// Host node that shows the selected trade, if present.
    pub position_info_element_id: String,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// Offset applied when formatting readout and tooltip times.
    pub utc_offset_minutes: i32,
    /// Host clientside namespace the bootstrapper is registered under.
    pub host_namespace: String,
    pub watermark: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            library_urls: vec![
                "https://unpkg.com/lightweight-charts@4.1.3/dist/lightweight-charts.standalone.production.js".into(),
                "https://cdn.jsdelivr.net/npm/lightweight-charts@4.1.3/dist/lightweight-charts.standalone.production.js".into(),
            ],
            retry_delay_ms: 500,
            hit_tolerance: HitTolerance::default(),
            min_pane_px: 50.0,
            readout_element_id: "chart-interaction".into(),
            tooltip_element_id: "trade-tooltip".into(),
            position_info_element_id: "position-info".into(),
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            utc_offset_minutes: 0,
            host_namespace: "clientside".into(),
            watermark: None,
        }
    }
}

impl ChartConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Out-of-range offsets fall back to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }

    /// Tooltip node id for `container_id`. The first session takes the
    /// configured id; when another container already owns it, the id is
    /// suffixed with the container id.
    pub fn tooltip_id_for(&self, container_id: &str, base_owned_elsewhere: bool) -> String {
        if base_owned_elsewhere {
            format!("{}-{}", self.tooltip_element_id, container_id)
        } else {
            self.tooltip_element_id.clone()
        }
    }

    /// Read the override from the JS global, falling back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        use wasm_bindgen::JsValue;

        let raw = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(CONFIG_GLOBAL))
            .ok()
            .and_then(|v| v.as_string());
        match raw {
            Some(json) => Self::from_json(&json).unwrap_or_else(|err| {
                log::warn!("ignoring invalid {CONFIG_GLOBAL}: {err}");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = ChartConfig::from_json(
            r##"{"retry_delay_ms": 250, "theme": {"up": "#00ff00"}, "hit_tolerance": {"pixels": 8}}"##,
        )
        .unwrap();
        assert_eq!(cfg.retry_delay_ms, 250);
        assert_eq!(cfg.theme.up, "#00ff00");
        assert_eq!(cfg.theme.down, Theme::default().down);
        assert_eq!(cfg.hit_tolerance.pixels, 8.0);
        assert_eq!(cfg.hit_tolerance.time, 100_000);
        assert_eq!(cfg.library_urls.len(), 2);
    }

    #[test]
    fn invalid_offset_falls_back_to_utc() {
        let cfg = ChartConfig {
            utc_offset_minutes: 48 * 60,
            ..ChartConfig::default()
        };
        assert_eq!(cfg.utc_offset().local_minus_utc(), 0);
        let bj = ChartConfig {
            utc_offset_minutes: 480,
            ..ChartConfig::default()
        };
        assert_eq!(bj.utc_offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn tooltip_ids_are_unique_per_container() {
        let cfg = ChartConfig::default();
        assert_eq!(cfg.tooltip_id_for("chart-a", false), "trade-tooltip");
        assert_eq!(cfg.tooltip_id_for("chart-b", true), "trade-tooltip-chart-b");
        assert_eq!(cfg.position_info_element_id, "position-info");
    }

    #[test]
    fn malformed_override_is_an_error() {
        assert!(ChartConfig::from_json("{not json").is_err());
    }
}
