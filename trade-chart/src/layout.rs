//! Pane allocation and the price/volume divider.

use serde::Serialize;

use crate::payload::Features;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneKind {
    Price,
    Volume,
    Rsi,
    Macd,
}

impl PaneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaneKind::Price => "price",
            PaneKind::Volume => "volume",
            PaneKind::Rsi => "rsi",
            PaneKind::Macd => "macd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneSlot {
    pub kind: PaneKind,
    /// Share of the container height, in percent.
    pub percent: f64,
}

/// Stacked panes, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneLayout {
    slots: Vec<PaneSlot>,
}

impl PaneLayout {
    /// 70/30 for price+volume, 60/20/20 with one indicator pane, 50/20/15/15 with both.
    pub fn plan(features: &Features) -> Self {
        let mut slots = Vec::with_capacity(4);
        let indicator_panes = [(features.rsi, PaneKind::Rsi), (features.macd, PaneKind::Macd)]
            .into_iter()
            .filter_map(|(on, kind)| on.then_some(kind))
            .collect::<Vec<_>>();
        let (price, volume) = match indicator_panes.len() {
            0 => (70.0, 30.0),
            1 => (60.0, 20.0),
            _ => (50.0, 20.0),
        };
        slots.push(PaneSlot {
            kind: PaneKind::Price,
            percent: price,
        });
        slots.push(PaneSlot {
            kind: PaneKind::Volume,
            percent: volume,
        });
        if !indicator_panes.is_empty() {
            let each = (100.0 - price - volume) / indicator_panes.len() as f64;
            for kind in indicator_panes {
                slots.push(PaneSlot {
                    kind,
                    percent: each,
                });
            }
        }
        Self { slots }
    }

    pub fn slots(&self) -> &[PaneSlot] {
        &self.slots
    }

    pub fn kinds(&self) -> impl Iterator<Item = PaneKind> + '_ {
        self.slots.iter().map(|s| s.kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn percent_of(&self, kind: PaneKind) -> Option<f64> {
        self.slots.iter().find(|s| s.kind == kind).map(|s| s.percent)
    }

    /// Combined share of the price and volume panes.
    pub fn price_volume_share(&self) -> f64 {
        self.percent_of(PaneKind::Price).unwrap_or(0.0) + self.percent_of(PaneKind::Volume).unwrap_or(0.0)
    }

    /// Re-split the price+volume share so price gets `price_fraction` of it.
    pub fn set_price_fraction(&mut self, price_fraction: f64) {
        let share = self.price_volume_share();
        let fraction = price_fraction.clamp(0.0, 1.0);
        for slot in &mut self.slots {
            match slot.kind {
                PaneKind::Price => slot.percent = share * fraction,
                PaneKind::Volume => slot.percent = share * (1.0 - fraction),
                _ => {}
            }
        }
    }

    /// Label such as `70/30` or `60/20/20`.
    pub fn ratio_label(&self) -> String {
        self.slots
            .iter()
            .map(|s| format!("{}", s.percent.round() as i64))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// CSS height for a pane, leaving room for the divider gap.
    pub fn css_height(&self, kind: PaneKind) -> Option<String> {
        self.percent_of(kind)
            .map(|p| format!("calc({:.2}% - 5px)", p))
    }
}

/// Result of one divider move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerUpdate {
    /// Price share of the price+volume area, 0..=1.
    pub price_fraction: f64,
}

/// Drag state for the price/volume divider.
#[derive(Debug, Clone, Default)]
pub struct DividerDrag {
    active: Option<DragOrigin>,
    min_pane_px: f64,
}

#[derive(Debug, Clone, Copy)]
struct DragOrigin {
    start_y: f64,
    initial_price_px: f64,
    available_px: f64,
}

impl DividerDrag {
    pub fn new(min_pane_px: f64) -> Self {
        Self {
            active: None,
            min_pane_px: min_pane_px.max(0.0),
        }
    }

    /// Start a drag. `available_px` is the height shared by price and volume.
    /// Returns false when there is not enough room to honour the minimum height.
    pub fn begin(&mut self, start_y: f64, initial_price_px: f64, available_px: f64) -> bool {
        if available_px < self.min_pane_px * 2.0 {
            log::debug!("divider drag ignored, only {available_px}px available");
            self.active = None;
            return false;
        }
        self.active = Some(DragOrigin {
            start_y,
            initial_price_px,
            available_px,
        });
        true
    }

    pub fn update(&self, current_y: f64) -> Option<DividerUpdate> {
        let origin = self.active?;
        let delta = current_y - origin.start_y;
        let price_px = (origin.initial_price_px + delta)
            .min(origin.available_px - self.min_pane_px)
            .max(self.min_pane_px);
        Some(DividerUpdate {
            price_fraction: price_px / origin.available_px,
        })
    }

    /// Finish the drag; returns whether one was in progress.
    pub fn end(&mut self) -> bool {
        self.active.take().is_some()
    }
}
