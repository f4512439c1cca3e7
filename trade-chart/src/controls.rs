//! View controls: double-click reset and the fullscreen toggle.

/// Width of the left price axis, in pixels from the pane's left edge.
pub const PRICE_AXIS_PX: f64 = 50.0;

pub const FULLSCREEN_ENTER_LABEL: &str = "⛶";
pub const FULLSCREEN_EXIT_LABEL: &str = "✕";

/// What a double-click resets, depending on where it landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTarget {
    /// Re-enable price autoscaling on the clicked pane.
    PriceScale,
    /// Fit all data into view and realign the other panes.
    TimeScale,
}

/// `offset_x` is the click position relative to the pane's left edge.
pub fn reset_target(offset_x: f64) -> ResetTarget {
    if offset_x < PRICE_AXIS_PX {
        ResetTarget::PriceScale
    } else {
        ResetTarget::TimeScale
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenAction {
    Enter,
    Exit,
}

impl FullscreenAction {
    /// Toggle based on whether some element is currently fullscreen.
    pub fn toggle(fullscreen_active: bool) -> Self {
        if fullscreen_active {
            FullscreenAction::Exit
        } else {
            FullscreenAction::Enter
        }
    }

    /// Button label once this action has been applied.
    pub fn label_after(self) -> &'static str {
        match self {
            FullscreenAction::Enter => FULLSCREEN_EXIT_LABEL,
            FullscreenAction::Exit => FULLSCREEN_ENTER_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_click_on_axis_resets_price_scale() {
        assert_eq!(reset_target(0.0), ResetTarget::PriceScale);
        assert_eq!(reset_target(49.9), ResetTarget::PriceScale);
        assert_eq!(reset_target(50.0), ResetTarget::TimeScale);
        assert_eq!(reset_target(640.0), ResetTarget::TimeScale);
    }

    #[test]
    fn fullscreen_toggles() {
        let enter = FullscreenAction::toggle(false);
        assert_eq!(enter, FullscreenAction::Enter);
        assert_eq!(enter.label_after(), FULLSCREEN_EXIT_LABEL);
        let exit = FullscreenAction::toggle(true);
        assert_eq!(exit, FullscreenAction::Exit);
        assert_eq!(exit.label_after(), FULLSCREEN_ENTER_LABEL);
    }
}
