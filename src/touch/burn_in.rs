use super::types::DisplayOffset;
use crate::config::{BURN_IN_MAX_OFFSET_PX, BURN_IN_SHIFT_INTERVAL_MS};

/// Alternates the horizontal content offset to spread pixel wear.
///
/// `poll` reports each new offset exactly once; the caller redraws and feeds
/// the offset to [`super::TouchManager::rebuild_touch_areas`].
#[derive(Clone, Copy, Debug)]
pub struct BurnInShifter {
    interval_ms: u64,
    max_offset_px: i16,
    last_shift_ms: u64,
    offset: DisplayOffset,
    enabled: bool,
}

impl Default for BurnInShifter {
    fn default() -> Self {
        Self::new(BURN_IN_SHIFT_INTERVAL_MS, BURN_IN_MAX_OFFSET_PX)
    }
}

impl BurnInShifter {
    pub const fn new(interval_ms: u64, max_offset_px: i16) -> Self {
        Self {
            interval_ms,
            max_offset_px,
            last_shift_ms: 0,
            offset: DisplayOffset::ZERO,
            enabled: true,
        }
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<DisplayOffset> {
        if !self.enabled || now_ms.saturating_sub(self.last_shift_ms) < self.interval_ms {
            return None;
        }

        self.last_shift_ms = now_ms;
        let dx = if self.offset.dx == 0 {
            self.max_offset_px
        } else {
            0
        };
        self.offset = DisplayOffset::new(dx, 0);
        log::debug!("touch: burn-in shift dx={}", dx);
        Some(self.offset)
    }

    /// Disabling snaps back to the unshifted layout, reported as a change
    /// when the content was shifted.
    pub fn set_enabled(&mut self, enabled: bool, now_ms: u64) -> Option<DisplayOffset> {
        self.enabled = enabled;
        self.last_shift_ms = now_ms;
        if !enabled && self.offset != DisplayOffset::ZERO {
            self.offset = DisplayOffset::ZERO;
            return Some(self.offset);
        }
        None
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn offset(&self) -> DisplayOffset {
        self.offset
    }
}
