use crate::FRAME_RESOURCE_COUNT;

/// Number of frame-resource slots that still hold a stale copy of a record.
///
/// Every slot owns its own constant buffer, so a change has to be written
/// once per slot before the record is clean again.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FramesDirty(u32);

impl FramesDirty {
    /// Starts fully dirty: every slot needs the record.
    pub const fn new() -> Self {
        Self(FRAME_RESOURCE_COUNT as u32)
    }

    pub const fn clean() -> Self {
        Self(0)
    }

    /// Re-arms the countdown after the record changed.
    #[inline]
    pub fn mark(&mut self) {
        self.0 = FRAME_RESOURCE_COUNT as u32;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.0
    }

    /// Records one slot write. Returns whether a write was due.
    #[inline]
    pub fn consume(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }
}

impl Default for FramesDirty {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_after_one_write_per_slot() {
        let mut dirty = FramesDirty::new();
        for _ in 0..FRAME_RESOURCE_COUNT {
            assert!(dirty.consume());
        }
        assert!(!dirty.is_dirty());
        assert!(!dirty.consume());
    }

    #[test]
    fn mark_rearms_mid_countdown() {
        let mut dirty = FramesDirty::new();
        dirty.consume();
        dirty.mark();
        assert_eq!(dirty.remaining(), FRAME_RESOURCE_COUNT as u32);
    }
}
