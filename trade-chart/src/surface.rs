use serde::{Deserialize, Serialize};
use ts_core::Timestamp;

/// Visible span of a pane's time axis, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: Timestamp,
    pub to: Timestamp,
}

impl TimeRange {
    pub fn new(from: Timestamp, to: Timestamp) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// Window of `span` centred on `center`.
    pub fn centered(center: Timestamp, span: i64) -> Self {
        let half = span.max(0) / 2;
        Self::new(center.saturating_sub(half), center.saturating_add(half))
    }
}

/// Bar-index span of a pane's time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalRange {
    pub from: f64,
    pub to: f64,
}

impl LogicalRange {
    pub fn bars(&self) -> f64 {
        (self.to - self.from).abs()
    }

    pub fn shifted(&self, bars: f64) -> Self {
        Self {
            from: self.from + bars,
            to: self.to + bars,
        }
    }
}

/// What the synchronizer and navigator need from a rendered pane.
pub trait PaneSurface {
    fn visible_range(&self) -> Option<TimeRange>;
    fn set_visible_range(&self, range: TimeRange);
    fn visible_logical_range(&self) -> Option<LogicalRange>;
    fn set_visible_logical_range(&self, range: LogicalRange);
    fn set_crosshair(&self, time: Timestamp, value: f64);
    fn clear_crosshair(&self);
}

#[cfg(test)]
pub(crate) mod recording {
    use std::cell::RefCell;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        SetRange(TimeRange),
        SetLogical(LogicalRange),
        Crosshair(Timestamp, f64),
        ClearCrosshair,
    }

    /// Surface double that records every call it receives.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub range: RefCell<Option<TimeRange>>,
        pub logical: RefCell<Option<LogicalRange>>,
        pub calls: RefCell<Vec<Call>>,
    }

    impl RecordingSurface {
        pub fn with_range(from: Timestamp, to: Timestamp) -> Self {
            let surface = Self::default();
            *surface.range.borrow_mut() = Some(TimeRange::new(from, to));
            surface
        }

        pub fn take_calls(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }
    }

    impl PaneSurface for RecordingSurface {
        fn visible_range(&self) -> Option<TimeRange> {
            *self.range.borrow()
        }

        fn set_visible_range(&self, range: TimeRange) {
            *self.range.borrow_mut() = Some(range);
            self.calls.borrow_mut().push(Call::SetRange(range));
        }

        fn visible_logical_range(&self) -> Option<LogicalRange> {
            *self.logical.borrow()
        }

        fn set_visible_logical_range(&self, range: LogicalRange) {
            *self.logical.borrow_mut() = Some(range);
            self.calls.borrow_mut().push(Call::SetLogical(range));
        }

        fn set_crosshair(&self, time: Timestamp, value: f64) {
            self.calls.borrow_mut().push(Call::Crosshair(time, value));
        }

        fn clear_crosshair(&self) {
            self.calls.borrow_mut().push(Call::ClearCrosshair);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_normalized() {
        let r = TimeRange::new(10, 2);
        assert_eq!((r.from, r.to), (2, 10));
        assert_eq!(TimeRange::centered(100, 40), TimeRange::new(80, 120));
        let l = LogicalRange { from: 10.0, to: 60.0 }.shifted(-1.0);
        assert_eq!((l.from, l.to, l.bars()), (9.0, 59.0, 50.0));
    }
}
