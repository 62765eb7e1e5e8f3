//! RGB indicator controller.
//!
//! Remembers the last commanded colour so that a screen wake-from-off can
//! re-apply it — physically powering the display off blanks the side strips
//! with the same primitive, so "off" must not forget what "on" looks like.

use crate::app::ports::IndicatorPort;
use crate::fsm::profile::Rgb;

pub const BLACK: Rgb = (0, 0, 0);

pub struct IndicatorController {
    last: Rgb,
}

impl IndicatorController {
    pub fn new() -> Self {
        Self { last: BLACK }
    }

    /// Store `color` as the last colour and render it as a solid fill.
    pub fn set(&mut self, color: Rgb, hw: &mut impl IndicatorPort) {
        self.last = color;
        hw.fill(color);
    }

    /// Render all-zero without forgetting the last colour.
    pub fn blank(&self, hw: &mut impl IndicatorPort) {
        hw.fill(BLACK);
    }

    /// Re-apply the last colour (used by screen wake-from-off).
    pub fn restore(&self, hw: &mut impl IndicatorPort) {
        hw.fill(self.last);
    }

    pub fn last_color(&self) -> Rgb {
        self.last
    }
}

impl Default for IndicatorController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StripSpy {
        fills: Vec<Rgb>,
    }

    impl IndicatorPort for StripSpy {
        fn fill(&mut self, color: Rgb) {
            self.fills.push(color);
        }
    }

    fn spy() -> StripSpy {
        StripSpy { fills: Vec::new() }
    }

    #[test]
    fn set_renders_and_remembers() {
        let mut hw = spy();
        let mut ind = IndicatorController::new();
        ind.set((255, 0, 0), &mut hw);
        assert_eq!(hw.fills, vec![(255, 0, 0)]);
        assert_eq!(ind.last_color(), (255, 0, 0));
    }

    #[test]
    fn blank_keeps_last_colour() {
        let mut hw = spy();
        let mut ind = IndicatorController::new();
        ind.set((0, 0, 255), &mut hw);
        ind.blank(&mut hw);
        assert_eq!(hw.fills.last(), Some(&BLACK));
        assert_eq!(ind.last_color(), (0, 0, 255));
    }

    #[test]
    fn restore_reapplies_last() {
        let mut hw = spy();
        let mut ind = IndicatorController::new();
        ind.set((0, 255, 0), &mut hw);
        ind.blank(&mut hw);
        ind.restore(&mut hw);
        assert_eq!(hw.fills, vec![(0, 255, 0), BLACK, (0, 255, 0)]);
    }

    #[test]
    fn restore_before_any_set_is_black() {
        let mut hw = spy();
        let ind = IndicatorController::new();
        ind.restore(&mut hw);
        assert_eq!(hw.fills, vec![BLACK]);
    }
}
