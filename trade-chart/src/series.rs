//! Series descriptions handed to the charting library, one plan per pane.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use ts_core::{Candle, IndicatorPoint, Timestamp, VolumeBar};

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::layout::{PaneKind, PaneLayout};
use crate::payload::{ChartPayload, Features};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid = 0,
    Dotted = 1,
    Dashed = 2,
}

impl Serialize for LineStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// What a series represents, used by the readout and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesRole {
    Candles,
    Volume,
    Ema,
    UpperBand,
    MiddleBand,
    LowerBand,
    Rsi,
    RsiOverbought,
    RsiOversold,
    Macd,
    Signal,
    Histogram,
    ZeroLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Candlestick,
    Histogram,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub precision: u8,
    pub min_move: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wick_up_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wick_down_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_format: Option<PriceFormat>,
    pub price_line_visible: bool,
    pub last_value_visible: bool,
    pub price_scale_id: &'static str,
}

impl SeriesOptions {
    fn line(title: Option<&str>, color: &str, width: u8, style: LineStyle) -> Self {
        Self {
            title: title.map(str::to_string),
            color: Some(color.to_string()),
            line_width: Some(width),
            line_style: Some(style),
            last_value_visible: title.is_some(),
            price_scale_id: "left",
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub time: Timestamp,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramPoint {
    pub time: Timestamp,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Candles(Vec<Candle>),
    Histogram(Vec<HistogramPoint>),
    Line(Vec<LinePoint>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub role: SeriesRole,
    pub kind: SeriesKind,
    pub options: SeriesOptions,
    pub data: SeriesData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
}

/// Everything needed to build one pane.
#[derive(Debug, Clone, PartialEq)]
pub struct PanePlan {
    pub kind: PaneKind,
    pub series: Vec<SeriesSpec>,
    /// Values used to place a mirrored crosshair on this pane.
    pub anchor: Vec<IndicatorPoint>,
    pub legend: Vec<LegendItem>,
    pub show_time_axis: bool,
}

impl PanePlan {
    pub fn series(&self, role: SeriesRole) -> Option<&SeriesSpec> {
        self.series.iter().find(|s| s.role == role)
    }
}

/// Volume bars coloured by the candle at the same index.
pub fn volume_histogram(volume: &[VolumeBar], candles: &[Candle], up: &str, down: &str) -> Vec<HistogramPoint> {
    volume
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let up_bar = candles.get(i).map(Candle::is_up).unwrap_or(false);
            HistogramPoint {
                time: bar.time,
                value: bar.volume,
                color: (if up_bar { up } else { down }).to_string(),
            }
        })
        .collect()
}

/// MACD histogram coloured by sign.
pub fn signed_histogram(points: &[IndicatorPoint], up: &str, down: &str) -> Vec<HistogramPoint> {
    points
        .iter()
        .map(|p| HistogramPoint {
            time: p.time,
            value: p.value,
            color: (if p.value >= 0.0 { up } else { down }).to_string(),
        })
        .collect()
}

/// Constant line sampled at the given times.
pub fn horizontal_line(times: impl Iterator<Item = Timestamp>, level: f64) -> Vec<LinePoint> {
    times.map(|time| LinePoint { time, value: level }).collect()
}

fn line_points(points: &[IndicatorPoint]) -> Vec<LinePoint> {
    points
        .iter()
        .map(|p| LinePoint {
            time: p.time,
            value: p.value,
        })
        .collect()
}

fn line_spec(role: SeriesRole, options: SeriesOptions, points: Vec<LinePoint>) -> SeriesSpec {
    SeriesSpec {
        role,
        kind: SeriesKind::Line,
        options,
        data: SeriesData::Line(points),
    }
}

fn legend_of(series: &[SeriesSpec]) -> Vec<LegendItem> {
    series
        .iter()
        .filter_map(|s| {
            let label = s.options.title.clone()?;
            let color = s
                .options
                .color
                .clone()
                .or_else(|| s.options.up_color.clone())
                .unwrap_or_default();
            Some(LegendItem { label, color })
        })
        .collect()
}

fn price_pane(payload: &ChartPayload, features: &Features, cfg: &ChartConfig) -> Vec<SeriesSpec> {
    let theme = &cfg.theme;
    let mut series = vec![SeriesSpec {
        role: SeriesRole::Candles,
        kind: SeriesKind::Candlestick,
        options: SeriesOptions {
            title: Some("Price".into()),
            up_color: Some(theme.up.clone()),
            down_color: Some(theme.down.clone()),
            wick_up_color: Some(theme.up.clone()),
            wick_down_color: Some(theme.down.clone()),
            border_visible: Some(false),
            price_line_visible: true,
            last_value_visible: true,
            price_scale_id: "left",
            ..SeriesOptions::default()
        },
        data: SeriesData::Candles(payload.candlestick.clone()),
    }];
    if features.ema {
        series.push(line_spec(
            SeriesRole::Ema,
            SeriesOptions::line(Some("EMA20"), &theme.ema, 2, LineStyle::Solid),
            line_points(&payload.ema20),
        ));
    }
    if features.bollinger {
        for (role, title, color, style, points) in [
            (SeriesRole::UpperBand, "Upper", &theme.band_outer, LineStyle::Dashed, &payload.upper_band),
            (SeriesRole::MiddleBand, "Middle", &theme.band_middle, LineStyle::Solid, &payload.middle_band),
            (SeriesRole::LowerBand, "Lower", &theme.band_outer, LineStyle::Dashed, &payload.lower_band),
        ] {
            series.push(line_spec(
                role,
                SeriesOptions::line(Some(title), color, 1, style),
                line_points(points),
            ));
        }
    }
    series
}

fn volume_pane(payload: &ChartPayload, cfg: &ChartConfig) -> Vec<SeriesSpec> {
    vec![SeriesSpec {
        role: SeriesRole::Volume,
        kind: SeriesKind::Histogram,
        options: SeriesOptions {
            title: Some("Volume".into()),
            color: Some(cfg.theme.up.clone()),
            price_format: Some(PriceFormat {
                kind: "volume",
                precision: 2,
                min_move: 0.01,
            }),
            last_value_visible: true,
            price_scale_id: "left",
            ..SeriesOptions::default()
        },
        data: SeriesData::Histogram(volume_histogram(
            &payload.volume,
            &payload.candlestick,
            &cfg.theme.up,
            &cfg.theme.down,
        )),
    }]
}

fn rsi_pane(payload: &ChartPayload, cfg: &ChartConfig) -> Vec<SeriesSpec> {
    let times = || payload.rsi.iter().map(|p| p.time);
    vec![
        line_spec(
            SeriesRole::Rsi,
            SeriesOptions::line(Some("RSI(14)"), &cfg.theme.rsi, 2, LineStyle::Solid),
            line_points(&payload.rsi),
        ),
        line_spec(
            SeriesRole::RsiOverbought,
            SeriesOptions::line(None, &cfg.theme.down, 1, LineStyle::Dashed),
            horizontal_line(times(), cfg.rsi_overbought),
        ),
        line_spec(
            SeriesRole::RsiOversold,
            SeriesOptions::line(None, &cfg.theme.up, 1, LineStyle::Dashed),
            horizontal_line(times(), cfg.rsi_oversold),
        ),
    ]
}

fn macd_pane(payload: &ChartPayload, cfg: &ChartConfig) -> Vec<SeriesSpec> {
    let theme = &cfg.theme;
    vec![
        line_spec(
            SeriesRole::Macd,
            SeriesOptions::line(Some("MACD"), &theme.macd, 2, LineStyle::Solid),
            line_points(&payload.macd),
        ),
        line_spec(
            SeriesRole::Signal,
            SeriesOptions::line(Some("Signal"), &theme.signal, 2, LineStyle::Solid),
            line_points(&payload.signal),
        ),
        SeriesSpec {
            role: SeriesRole::Histogram,
            kind: SeriesKind::Histogram,
            options: SeriesOptions {
                title: Some("Histogram".into()),
                color: Some(theme.up.clone()),
                price_format: Some(PriceFormat {
                    kind: "price",
                    precision: 6,
                    min_move: 0.000001,
                }),
                price_scale_id: "left",
                ..SeriesOptions::default()
            },
            data: SeriesData::Histogram(signed_histogram(&payload.histogram, &theme.up, &theme.down)),
        },
        line_spec(
            SeriesRole::ZeroLine,
            SeriesOptions::line(None, &theme.zero_line, 1, LineStyle::Dashed),
            horizontal_line(payload.macd.iter().map(|p| p.time), 0.0),
        ),
    ]
}

fn anchor_for(kind: PaneKind, payload: &ChartPayload) -> Vec<IndicatorPoint> {
    match kind {
        PaneKind::Price => payload
            .candlestick
            .iter()
            .map(|c| IndicatorPoint {
                time: c.time,
                value: c.close,
            })
            .collect(),
        PaneKind::Volume => payload
            .volume
            .iter()
            .map(|v| IndicatorPoint {
                time: v.time,
                value: v.volume,
            })
            .collect(),
        PaneKind::Rsi => payload.rsi.clone(),
        PaneKind::Macd => payload.macd.clone(),
    }
}

/// Build the pane plans for a render. A payload without candles yields `NoData`.
pub fn plan_panes(
    payload: &ChartPayload,
    features: &Features,
    cfg: &ChartConfig,
) -> Result<(PaneLayout, Vec<PanePlan>), ChartError> {
    if !payload.has_candles() {
        return Err(ChartError::NoData);
    }
    let layout = PaneLayout::plan(features);
    let last = layout.len().saturating_sub(1);
    let plans = layout
        .kinds()
        .enumerate()
        .map(|(idx, kind)| {
            let series = match kind {
                PaneKind::Price => price_pane(payload, features, cfg),
                PaneKind::Volume => volume_pane(payload, cfg),
                PaneKind::Rsi => rsi_pane(payload, cfg),
                PaneKind::Macd => macd_pane(payload, cfg),
            };
            PanePlan {
                kind,
                legend: legend_of(&series),
                anchor: anchor_for(kind, payload),
                series,
                show_time_axis: idx == last,
            }
        })
        .collect();
    Ok((layout, plans))
}

/// Library options for one pane's chart.
pub fn chart_options(plan: &PanePlan, cfg: &ChartConfig) -> Value {
    let theme = &cfg.theme;
    let margins = match plan.kind {
        PaneKind::Price => json!({"top": 0.1, "bottom": 0.1}),
        _ => json!({"top": 0.2, "bottom": 0.2}),
    };
    let mut options = json!({
        "layout": {
            "background": {"type": "solid", "color": theme.background},
            "textColor": theme.text,
        },
        "grid": {
            "vertLines": {"color": theme.grid},
            "horzLines": {"color": theme.grid},
        },
        "crosshair": {
            "mode": 0,
            "vertLine": {"color": theme.crosshair, "width": 1, "style": LineStyle::Dashed},
            "horzLine": {"color": theme.crosshair, "width": 1, "style": LineStyle::Dashed},
        },
        "timeScale": {
            "visible": plan.show_time_axis,
            "timeVisible": true,
            "secondsVisible": false,
            "borderColor": theme.grid,
            "barSpacing": 6,
            "minBarSpacing": 2,
            "rightOffset": 5,
            "lockVisibleTimeRangeOnResize": true,
            "shiftVisibleRangeOnNewBar": false,
        },
        "leftPriceScale": {
            "visible": true,
            "borderColor": theme.grid,
            "scaleMargins": margins,
        },
        "rightPriceScale": {"visible": false},
        "handleScale": {
            "axisPressedMouseMove": {"time": true, "price": plan.kind == PaneKind::Price},
            "mouseWheel": true,
            "pinch": true,
        },
    });
    if let (PaneKind::Price, Some(text)) = (plan.kind, cfg.watermark.as_deref()) {
        options["watermark"] = json!({
            "visible": true,
            "text": text,
            "color": theme.watermark,
            "fontSize": 24,
            "horzAlign": "center",
            "vertAlign": "center",
        });
    }
    options
}
