//! Trade markers, cursor hit-testing and the trade tooltip.

use chrono::FixedOffset;
use serde::Serialize;
use ts_core::{format_timestamp, Timestamp, Trade, TradeSide};

use crate::config::{HitTolerance, Theme};

pub const TOOLTIP_OFFSET_PX: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeMarker {
    pub time: Timestamp,
    pub position: MarkerPosition,
    pub color: String,
    pub shape: MarkerShape,
    pub text: String,
}

impl TradeMarker {
    pub fn for_trade(trade: &Trade, theme: &Theme) -> Self {
        let (position, shape, color) = match trade.side {
            TradeSide::Buy => (MarkerPosition::BelowBar, MarkerShape::ArrowUp, &theme.up),
            TradeSide::Sell => (MarkerPosition::AboveBar, MarkerShape::ArrowDown, &theme.down),
        };
        Self {
            time: trade.time,
            position,
            color: color.clone(),
            shape,
            text: format!("{} {}", trade.side, trade.amount),
        }
    }
}

/// Markers in time order, as the charting library requires.
pub fn build_markers(trades: &[Trade], theme: &Theme) -> Vec<TradeMarker> {
    let mut markers: Vec<TradeMarker> = trades.iter().map(|t| TradeMarker::for_trade(t, theme)).collect();
    markers.sort_by_key(|m| m.time);
    markers
}

/// Index of the first trade (payload order) under the cursor.
///
/// `price_to_y` maps a price to the pane's vertical coordinate; trades it
/// cannot map are skipped.
pub fn hit_test<F>(
    trades: &[Trade],
    cursor_time: Timestamp,
    cursor_y: f64,
    tolerance: HitTolerance,
    price_to_y: F,
) -> Option<usize>
where
    F: Fn(f64) -> Option<f64>,
{
    trades.iter().position(|trade| {
        if trade.time.abs_diff(cursor_time) >= tolerance.time.unsigned_abs() {
            return false;
        }
        let Some(marker_y) = price_to_y(trade.price) else {
            return false;
        };
        if (marker_y - cursor_y).abs() >= tolerance.pixels {
            return false;
        }
        match trade.side {
            TradeSide::Buy => cursor_y >= marker_y,
            TradeSide::Sell => cursor_y <= marker_y,
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    /// Follows the cursor while it stays over a trade.
    Transient { trade: usize, at: Point },
    /// Fixed in place until unpinned by a click.
    Pinned { trade: usize, at: Point },
}

impl TooltipState {
    pub fn is_pinned(&self) -> bool {
        matches!(self, TooltipState::Pinned { .. })
    }

    pub fn trade(&self) -> Option<usize> {
        match *self {
            TooltipState::Hidden => None,
            TooltipState::Transient { trade, .. } | TooltipState::Pinned { trade, .. } => Some(trade),
        }
    }

    pub fn position(&self) -> Option<Point> {
        match *self {
            TooltipState::Hidden => None,
            TooltipState::Transient { at, .. } | TooltipState::Pinned { at, .. } => Some(at),
        }
    }

    /// Cursor moved; `hit` is the trade under it, if any.
    pub fn on_hover(self, hit: Option<usize>, at: Point) -> Self {
        if self.is_pinned() {
            return self;
        }
        match hit {
            Some(trade) => TooltipState::Transient { trade, at },
            None => TooltipState::Hidden,
        }
    }

    pub fn on_click(self, hit: Option<usize>, at: Point) -> Self {
        match (self, hit) {
            (_, None) => TooltipState::Hidden,
            (TooltipState::Pinned { trade: pinned, .. }, Some(trade)) if pinned == trade => {
                TooltipState::Transient { trade, at }
            }
            (_, Some(trade)) => TooltipState::Pinned { trade, at },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipRow {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub title: String,
    pub rows: Vec<TooltipRow>,
}

fn row(label: &'static str, value: String) -> TooltipRow {
    TooltipRow {
        label,
        value,
        tone: Tone::Neutral,
    }
}

impl TooltipContent {
    pub fn for_trade(trade: &Trade, offset: FixedOffset) -> Self {
        let mut rows = vec![
            row("Time", format_timestamp(trade.time, offset)),
            row("Side", trade.side.to_string()),
            row("Price", format!("{:.2}", trade.price)),
            row("Amount", format!("{}", trade.amount)),
            row("Cost", format!("{:.2}", trade.cost)),
        ];
        if let Some(pnl) = trade.pnl {
            rows.push(TooltipRow {
                label: "PnL",
                value: format!("{:+.2}", pnl),
                tone: if pnl >= 0.0 { Tone::Positive } else { Tone::Negative },
            });
        }
        if let Some(closing) = trade.closing_price {
            rows.push(row("Closing price", format!("{:.2}", closing)));
        }
        if let Some(leverage) = trade.leverage {
            rows.push(row("Leverage", format!("{}x", leverage)));
        }
        let title = match trade.symbol.as_deref() {
            Some(symbol) => format!("{} {}", symbol, trade.side),
            None => format!("{} trade", trade.side),
        };
        Self { title, rows }
    }

    pub fn to_html(&self, theme: &Theme) -> String {
        let mut html = format!("<div style=\"font-weight:bold;margin-bottom:4px\">{}</div>", escape_html(&self.title));
        for r in &self.rows {
            let style = match r.tone {
                Tone::Neutral => String::new(),
                Tone::Positive => format!(" style=\"color:{}\"", theme.up),
                Tone::Negative => format!(" style=\"color:{}\"", theme.down),
            };
            html.push_str(&format!(
                "<div>{}: <span{}>{}</span></div>",
                r.label,
                style,
                escape_html(&r.value)
            ));
        }
        html
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Top-left corner for a tooltip of `size` near `cursor`, flipped to stay inside `container`.
pub fn place_tooltip(cursor: Point, size: (f64, f64), container: (f64, f64)) -> Point {
    let (w, h) = size;
    let (cw, ch) = container;
    let mut x = cursor.x + TOOLTIP_OFFSET_PX;
    if x + w > cw {
        x = cursor.x - TOOLTIP_OFFSET_PX - w;
    }
    let mut y = cursor.y + TOOLTIP_OFFSET_PX;
    if y + h > ch {
        y = cursor.y - TOOLTIP_OFFSET_PX - h;
    }
    Point {
        x: x.max(0.0),
        y: y.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(time: i64, price: f64, side: TradeSide) -> Trade {
        Trade {
            time,
            price,
            side,
            amount: 1.5,
            cost: price * 1.5,
            pnl: None,
            closing_price: None,
            leverage: None,
            symbol: None,
        }
    }

    // price 100 sits at y=200, one pixel per unit of price.
    fn to_y(price: f64) -> Option<f64> {
        (price > 0.0).then(|| 300.0 - price)
    }

    const TOL: HitTolerance = HitTolerance {
        time: 100_000,
        pixels: 20.0,
    };

    #[test]
    fn markers_follow_side_and_are_time_sorted() {
        let theme = Theme::default();
        let trades = vec![trade(200, 10.0, TradeSide::Sell), trade(100, 9.0, TradeSide::Buy)];
        let markers = build_markers(&trades, &theme);
        assert_eq!(markers[0].time, 100);
        assert_eq!(markers[0].position, MarkerPosition::BelowBar);
        assert_eq!(markers[0].shape, MarkerShape::ArrowUp);
        assert_eq!(markers[0].color, theme.up);
        assert_eq!(markers[0].text, "Buy 1.5");
        assert_eq!(markers[1].text, "Sell 1.5");
        let json = serde_json::to_value(&markers[1]).unwrap();
        assert_eq!(json["position"], "aboveBar");
        assert_eq!(json["shape"], "arrowDown");
    }

    #[test]
    fn hit_test_respects_direction() {
        let buy = [trade(1_000, 100.0, TradeSide::Buy)];
        assert_eq!(hit_test(&buy, 1_000, 205.0, TOL, to_y), Some(0));
        assert_eq!(hit_test(&buy, 1_000, 200.0, TOL, to_y), Some(0));
        assert_eq!(hit_test(&buy, 1_000, 195.0, TOL, to_y), None, "buy needs cursor at or below");

        let sell = [trade(1_000, 100.0, TradeSide::Sell)];
        assert_eq!(hit_test(&sell, 1_000, 195.0, TOL, to_y), Some(0));
        assert_eq!(hit_test(&sell, 1_000, 205.0, TOL, to_y), None);
    }

    #[test]
    fn hit_test_bounds_are_exclusive() {
        let buy = [trade(0, 100.0, TradeSide::Buy)];
        assert_eq!(hit_test(&buy, 99_999, 200.0, TOL, to_y), Some(0));
        assert_eq!(hit_test(&buy, 100_000, 200.0, TOL, to_y), None);
        assert_eq!(hit_test(&buy, 0, 219.9, TOL, to_y), Some(0));
        assert_eq!(hit_test(&buy, 0, 220.0, TOL, to_y), None);
    }

    #[test]
    fn hit_test_survives_extreme_times() {
        let trades = vec![trade(i64::MIN, 100.0, TradeSide::Buy), trade(i64::MAX, 100.0, TradeSide::Buy)];
        assert_eq!(hit_test(&trades, i64::MAX, 205.0, TOL, to_y), Some(1));
        assert_eq!(hit_test(&trades, 0, 205.0, TOL, to_y), None);
    }

    #[test]
    fn first_payload_match_wins_and_unmapped_are_skipped() {
        let trades = [
            trade(10, -1.0, TradeSide::Buy),
            trade(20, 100.0, TradeSide::Buy),
            trade(5, 100.0, TradeSide::Buy),
        ];
        assert_eq!(hit_test(&trades, 10, 201.0, TOL, to_y), Some(1));
        assert_eq!(hit_test(&trades, 10, 201.0, TOL, |_| None), None);
    }

    #[test]
    fn pinned_tooltip_survives_hover() {
        let p = Point { x: 1.0, y: 2.0 };
        let q = Point { x: 50.0, y: 60.0 };
        let pinned = TooltipState::Hidden.on_click(Some(3), p);
        assert_eq!(pinned, TooltipState::Pinned { trade: 3, at: p });
        assert_eq!(pinned.on_hover(None, q), pinned);
        assert_eq!(pinned.on_hover(Some(1), q), pinned);

        assert_eq!(pinned.on_click(Some(3), q), TooltipState::Transient { trade: 3, at: q });
        assert_eq!(pinned.on_click(Some(4), q), TooltipState::Pinned { trade: 4, at: q });
        assert_eq!(pinned.on_click(None, q), TooltipState::Hidden);
    }

    #[test]
    fn transient_tooltip_follows_hover() {
        let p = Point { x: 1.0, y: 2.0 };
        let shown = TooltipState::Hidden.on_hover(Some(0), p);
        assert_eq!(shown, TooltipState::Transient { trade: 0, at: p });
        assert_eq!(shown.trade(), Some(0));
        assert_eq!(shown.on_hover(None, p), TooltipState::Hidden);
        assert_eq!(shown.on_click(Some(0), p), TooltipState::Pinned { trade: 0, at: p });
        assert!(TooltipState::Hidden.position().is_none());
    }

    #[test]
    fn tooltip_rows_skip_missing_fields() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut t = trade(0, 12.0, TradeSide::Sell);
        let basic = TooltipContent::for_trade(&t, utc);
        let labels: Vec<_> = basic.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Time", "Side", "Price", "Amount", "Cost"]);
        assert_eq!(basic.rows[0].value, "1970-01-01 00:00");

        t.pnl = Some(-3.25);
        t.leverage = Some(10.0);
        t.symbol = Some("SOL<USDT>".into());
        let full = TooltipContent::for_trade(&t, utc);
        let pnl = full.rows.iter().find(|r| r.label == "PnL").unwrap();
        assert_eq!(pnl.value, "-3.25");
        assert_eq!(pnl.tone, Tone::Negative);
        assert_eq!(full.rows.last().unwrap().value, "10x");
        let html = full.to_html(&Theme::default());
        assert!(html.contains("SOL&lt;USDT&gt; Sell"));
        assert!(html.contains(&Theme::default().down));
    }

    #[test]
    fn tooltip_flips_at_container_edges() {
        let size = (100.0, 50.0);
        let container = (400.0, 300.0);
        let inside = place_tooltip(Point { x: 10.0, y: 10.0 }, size, container);
        assert_eq!(inside, Point { x: 25.0, y: 25.0 });
        let corner = place_tooltip(Point { x: 390.0, y: 290.0 }, size, container);
        assert_eq!(corner, Point { x: 275.0, y: 225.0 });
        let cramped = place_tooltip(Point { x: 50.0, y: 20.0 }, (200.0, 100.0), (120.0, 60.0));
        assert_eq!(cramped, Point { x: 0.0, y: 0.0 });
    }
}
