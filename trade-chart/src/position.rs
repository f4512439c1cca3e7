//! Summary of the selected trade for the host's position panel.

use chrono::FixedOffset;
use serde::Serialize;
use ts_core::{format_timestamp, Trade};

use crate::config::Theme;
use crate::markers::{escape_html, Tone};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionInfo {
    /// 1-based position of the trade in the payload.
    pub number: usize,
    pub label: String,
    pub side: String,
    pub time: String,
    pub price: f64,
    pub closing_price: Option<f64>,
    pub pnl: Option<f64>,
}

impl PositionInfo {
    pub fn for_trade(index: usize, trade: &Trade, offset: FixedOffset) -> Self {
        // Pairs like "SOL/USDT" show only the base asset.
        let label = trade
            .symbol
            .as_deref()
            .and_then(|s| s.split('/').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("Trade")
            .to_string();
        Self {
            number: index + 1,
            label,
            side: trade.side.to_string(),
            time: format_timestamp(trade.time, offset),
            price: trade.price,
            closing_price: trade.closing_price,
            pnl: trade.pnl,
        }
    }

    pub fn is_open(&self) -> bool {
        self.closing_price.is_none()
    }

    pub fn tone(&self) -> Tone {
        match self.pnl {
            Some(p) if p >= 0.0 => Tone::Positive,
            Some(_) => Tone::Negative,
            None => Tone::Neutral,
        }
    }

    pub fn to_html(&self, theme: &Theme) -> String {
        let accent = match self.tone() {
            Tone::Positive => theme.up.as_str(),
            Tone::Negative => theme.down.as_str(),
            Tone::Neutral => theme.text.as_str(),
        };
        let mut html = format!(
            "<div class=\"trade-chart-position\">\
             <div style=\"display:flex;justify-content:space-between;font-weight:bold\">\
             <span>{} #{}</span><span style=\"color:{}\">{}</span></div>\
             <div>{}</div><div>Open: {:.2}</div>",
            escape_html(&self.label),
            self.number,
            accent,
            escape_html(&self.side),
            escape_html(&self.time),
            self.price,
        );
        match self.closing_price {
            Some(close) => {
                html.push_str(&format!("<div>Close: {:.2}</div>", close));
                if let Some(pnl) = self.pnl {
                    html.push_str(&format!("<div style=\"color:{}\">PnL: {:+.2}</div>", accent, pnl));
                }
            }
            None => html.push_str("<div style=\"font-weight:bold\">Position open</div>"),
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_core::TradeSide;

    fn sell() -> Trade {
        Trade {
            time: 0,
            price: 20.5,
            side: TradeSide::Sell,
            amount: 1.0,
            cost: 20.5,
            pnl: None,
            closing_price: None,
            leverage: None,
            symbol: Some("SOL/USDT".into()),
        }
    }

    #[test]
    fn open_position_summary() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let info = PositionInfo::for_trade(2, &sell(), utc);
        assert_eq!(info.number, 3);
        assert_eq!(info.label, "SOL");
        assert!(info.is_open());
        assert_eq!(info.tone(), Tone::Neutral);
        let html = info.to_html(&Theme::default());
        assert!(html.contains("SOL #3"));
        assert!(html.contains("Open: 20.50"));
        assert!(html.contains("Position open"));
        assert!(!html.contains("PnL"));
    }

    #[test]
    fn closed_position_shows_result() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut trade = sell();
        trade.symbol = None;
        trade.closing_price = Some(19.0);
        trade.pnl = Some(1.5);
        let info = PositionInfo::for_trade(0, &trade, utc);
        assert_eq!(info.label, "Trade");
        assert_eq!(info.tone(), Tone::Positive);
        let html = info.to_html(&Theme::default());
        assert!(html.contains("Close: 19.00"));
        assert!(html.contains("PnL: +1.50"));
        assert!(html.contains(&Theme::default().up));
        assert!(!html.contains("Position open"));
    }
}
