//! Mirrors visible range and crosshair across panes.

use std::cell::Cell;

use ts_core::{IndicatorPoint, TimeSeries, Timestamp};

use crate::layout::PaneKind;
use crate::surface::{PaneSurface, TimeRange};

pub struct SyncedPane<P> {
    pub kind: PaneKind,
    pub surface: P,
    anchor: TimeSeries<IndicatorPoint>,
}

impl<P: PaneSurface> SyncedPane<P> {
    pub fn new(kind: PaneKind, surface: P, anchor: Vec<IndicatorPoint>) -> Self {
        Self {
            kind,
            surface,
            anchor: TimeSeries::from_unsorted(anchor),
        }
    }

    pub fn anchor_value(&self, ts: Timestamp) -> Option<f64> {
        self.anchor.at(ts).map(|p| p.value)
    }
}

/// Drops events raised by its own replay; the last event wins.
pub struct PaneSync<P> {
    panes: Vec<SyncedPane<P>>,
    replaying: Cell<bool>,
}

/// Resets the replay flag when the replay ends, including on unwind.
struct ReplayGuard<'a>(&'a Cell<bool>);

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<P: PaneSurface> PaneSync<P> {
    pub fn new(panes: Vec<SyncedPane<P>>) -> Self {
        Self {
            panes,
            replaying: Cell::new(false),
        }
    }

    pub fn panes(&self) -> &[SyncedPane<P>] {
        &self.panes
    }

    pub fn pane(&self, kind: PaneKind) -> Option<&SyncedPane<P>> {
        self.panes.iter().find(|p| p.kind == kind)
    }

    pub fn index_of(&self, kind: PaneKind) -> Option<usize> {
        self.panes.iter().position(|p| p.kind == kind)
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying.get()
    }

    fn enter(&self) -> Option<ReplayGuard<'_>> {
        if self.replaying.replace(true) {
            None
        } else {
            Some(ReplayGuard(&self.replaying))
        }
    }

    fn targets(&self, origin: usize) -> impl Iterator<Item = &SyncedPane<P>> {
        self.panes
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != origin)
            .map(|(_, p)| p)
    }

    /// Replay a visible-range change from pane `origin`. Returns the number of panes updated.
    pub fn on_range_change(&self, origin: usize, range: Option<TimeRange>) -> usize {
        let Some(range) = range else { return 0 };
        let Some(_guard) = self.enter() else {
            return 0;
        };
        let mut updated = 0;
        for pane in self.targets(origin) {
            pane.surface.set_visible_range(range);
            updated += 1;
        }
        updated
    }

    /// Replay a crosshair move. `None` means the cursor left the origin pane.
    pub fn on_crosshair(&self, origin: usize, time: Option<Timestamp>) -> usize {
        let Some(_guard) = self.enter() else {
            return 0;
        };
        let mut updated = 0;
        for pane in self.targets(origin) {
            match time.and_then(|ts| pane.anchor_value(ts).map(|v| (ts, v))) {
                Some((ts, value)) => pane.surface.set_crosshair(ts, value),
                None => pane.surface.clear_crosshair(),
            }
            updated += 1;
        }
        updated
    }

    /// Push pane `origin`'s current range onto every other pane.
    pub fn force_sync(&self, origin: usize) -> usize {
        let range = self.panes.get(origin).and_then(|p| p.surface.visible_range());
        self.on_range_change(origin, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{Call, RecordingSurface};

    fn pt(time: i64, value: f64) -> IndicatorPoint {
        IndicatorPoint { time, value }
    }

    fn three_panes() -> PaneSync<RecordingSurface> {
        PaneSync::new(vec![
            SyncedPane::new(PaneKind::Price, RecordingSurface::with_range(0, 100), vec![pt(10, 1.5), pt(20, 1.7)]),
            SyncedPane::new(PaneKind::Volume, RecordingSurface::default(), vec![pt(10, 300.0), pt(20, 250.0)]),
            SyncedPane::new(PaneKind::Rsi, RecordingSurface::default(), vec![pt(20, 61.0)]),
        ])
    }

    #[test]
    fn range_change_skips_originator() {
        let sync = three_panes();
        let range = TimeRange::new(5, 50);
        assert_eq!(sync.on_range_change(1, Some(range)), 2);
        assert_eq!(sync.panes()[0].surface.take_calls(), vec![Call::SetRange(range)]);
        assert!(sync.panes()[1].surface.take_calls().is_empty());
        assert_eq!(sync.panes()[2].surface.take_calls(), vec![Call::SetRange(range)]);
        assert!(!sync.is_replaying());
        assert_eq!(sync.on_range_change(0, None), 0);
    }

    #[test]
    fn reentrant_events_are_dropped() {
        let sync = three_panes();
        let _outer = sync.enter().unwrap();
        assert_eq!(sync.on_range_change(0, Some(TimeRange::new(1, 2))), 0);
        assert_eq!(sync.on_crosshair(0, Some(10)), 0);
        for pane in sync.panes() {
            assert!(pane.surface.take_calls().is_empty());
        }
    }

    #[test]
    fn crosshair_uses_target_anchor_or_clears() {
        let sync = three_panes();
        sync.on_crosshair(0, Some(10));
        assert_eq!(sync.panes()[1].surface.take_calls(), vec![Call::Crosshair(10, 300.0)]);
        assert_eq!(sync.panes()[2].surface.take_calls(), vec![Call::ClearCrosshair]);
        assert!(sync.panes()[0].surface.take_calls().is_empty());

        sync.on_crosshair(2, Some(20));
        assert_eq!(sync.panes()[0].surface.take_calls(), vec![Call::Crosshair(20, 1.7)]);
        assert_eq!(sync.panes()[1].surface.take_calls(), vec![Call::Crosshair(20, 250.0)]);

        sync.on_crosshair(0, None);
        assert_eq!(sync.panes()[1].surface.take_calls(), vec![Call::ClearCrosshair]);
        assert_eq!(sync.panes()[2].surface.take_calls(), vec![Call::ClearCrosshair]);
    }

    #[test]
    fn force_sync_copies_origin_range() {
        let sync = three_panes();
        assert_eq!(sync.force_sync(0), 2);
        let expected = vec![Call::SetRange(TimeRange::new(0, 100))];
        assert_eq!(sync.panes()[1].surface.take_calls(), expected);
        assert_eq!(sync.panes()[2].surface.take_calls(), expected);
        assert_eq!(three_panes().force_sync(1), 0, "volume pane has no range yet");
        assert_eq!(sync.index_of(PaneKind::Rsi), Some(2));
        assert!(sync.pane(PaneKind::Macd).is_none());
    }
}
