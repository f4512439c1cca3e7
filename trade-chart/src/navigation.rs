//! Stepping through trades and keyboard scrolling.

use ts_core::Timestamp;

use crate::surface::{LogicalRange, TimeRange};

pub const MIN_WINDOW_BARS: usize = 20;
pub const MAX_WINDOW_BARS: usize = 100;
pub const DEFAULT_WINDOW_BARS: usize = 50;

/// Cyclic cursor over the trade list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    selected: Option<usize>,
}

impl Navigator {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Move by `direction` (sign only). Returns the new index.
    pub fn step(&mut self, direction: i32, len: usize) -> Option<usize> {
        if len == 0 || direction == 0 {
            return None;
        }
        let forward = direction > 0;
        let next = match self.selected.filter(|i| *i < len) {
            None if forward => 0,
            None => len - 1,
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
        };
        self.selected = Some(next);
        Some(next)
    }

    /// Select trade `number` (1-based), clamped to the list. 0 selects nothing.
    pub fn jump(&mut self, number: i32, len: usize) -> Option<usize> {
        if len == 0 || number == 0 {
            return None;
        }
        let index = (number.max(1) as usize).min(len) - 1;
        self.selected = Some(index);
        Some(index)
    }
}

/// Bars to show around a trade, derived from the current view.
pub fn window_bars(current: Option<LogicalRange>) -> usize {
    match current {
        Some(range) if range.bars().is_finite() && range.bars() > 0.0 => {
            (range.bars().round() as usize).clamp(MIN_WINDOW_BARS, MAX_WINDOW_BARS)
        }
        _ => DEFAULT_WINDOW_BARS,
    }
}

/// Visible range centred on `time`, `bars` bars of `bar_interval` wide.
pub fn window_around(time: Timestamp, bar_interval: i64, bars: usize) -> TimeRange {
    let span = bar_interval.max(1).saturating_mul(bars as i64);
    TimeRange::centered(time, span)
}

/// Bars to scroll for a key press.
pub fn key_shift(key: &str) -> Option<f64> {
    match key {
        "ArrowLeft" => Some(-1.0),
        "ArrowRight" => Some(1.0),
        _ => None,
    }
}

/// Keyboard scrolling is suppressed while the user is typing.
pub fn is_text_entry(tag_name: &str, content_editable: bool) -> bool {
    content_editable
        || tag_name.eq_ignore_ascii_case("input")
        || tag_name.eq_ignore_ascii_case("textarea")
        || tag_name.eq_ignore_ascii_case("select")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_forward_and_backward() {
        let mut nav = Navigator::default();
        assert_eq!(nav.step(1, 3), Some(0));
        assert_eq!(nav.step(1, 3), Some(1));
        assert_eq!(nav.step(1, 3), Some(2));
        assert_eq!(nav.step(1, 3), Some(0));
        assert_eq!(nav.step(-1, 3), Some(2));

        let mut back = Navigator::default();
        assert_eq!(back.step(-1, 4), Some(3));
        assert_eq!(back.step(-5, 4), Some(2));
    }

    #[test]
    fn nothing_to_navigate() {
        let mut nav = Navigator::default();
        assert_eq!(nav.step(1, 0), None);
        assert_eq!(nav.step(0, 5), None);
        assert_eq!(nav.selected(), None);
    }

    #[test]
    fn stale_selection_restarts_after_shrink() {
        let mut nav = Navigator::default();
        nav.step(-1, 10);
        assert_eq!(nav.selected(), Some(9));
        assert_eq!(nav.step(1, 2), Some(0));
    }

    #[test]
    fn jump_clamps_to_the_trade_list() {
        let mut nav = Navigator::default();
        assert_eq!(nav.jump(3, 5), Some(2));
        assert_eq!(nav.step(1, 5), Some(3));
        assert_eq!(nav.jump(99, 5), Some(4));
        assert_eq!(nav.jump(-4, 5), Some(0));
        assert_eq!(nav.jump(0, 5), None);
        assert_eq!(nav.selected(), Some(0));
        assert_eq!(nav.jump(1, 0), None);
    }

    #[test]
    fn window_is_clamped_and_centred() {
        assert_eq!(window_bars(None), 50);
        assert_eq!(window_bars(Some(LogicalRange { from: 0.0, to: 5.0 })), 20);
        assert_eq!(window_bars(Some(LogicalRange { from: 0.0, to: 64.4 })), 64);
        assert_eq!(window_bars(Some(LogicalRange { from: -100.0, to: 400.0 })), 100);
        assert_eq!(window_around(10_000, 60, 50), TimeRange::new(8_500, 11_500));
    }

    #[test]
    fn keys_and_text_entry() {
        assert_eq!(key_shift("ArrowLeft"), Some(-1.0));
        assert_eq!(key_shift("ArrowUp"), None);
        assert!(is_text_entry("INPUT", false));
        assert!(is_text_entry("div", true));
        assert!(!is_text_entry("DIV", false));
    }
}
