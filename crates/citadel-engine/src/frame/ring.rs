use anyhow::Result;

use citadel_scene::FRAME_RESOURCE_COUNT;

use super::fence::Fence;

/// Lifecycle of one ring slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SlotState {
    /// Never used, or its last frame was abandoned before submission.
    Idle,
    /// Current slot; the CPU is writing its buffers and recording.
    Recording,
    /// Submitted; the device may still read its buffers.
    Submitted { fence: u64 },
    /// The device has passed this slot's fence; safe to reuse.
    Retired { fence: u64 },
}

struct FrameSlot<R> {
    resource: R,
    /// Fence value of the slot's last submission; 0 if never submitted.
    fence: u64,
    recording: bool,
}

/// Fixed ring of `N` per-frame resources guarded by a fence.
///
/// The ring starts on the last slot so the first [`advance`](Self::advance)
/// selects slot 0. A slot is only handed out once the device has reached the
/// fence value of its previous submission.
pub struct FrameRing<R, F: Fence, const N: usize = FRAME_RESOURCE_COUNT> {
    slots: [FrameSlot<R>; N],
    current: usize,
    fence: F,
    last_signaled: u64,
}

impl<R, F: Fence, const N: usize> FrameRing<R, F, N> {
    pub fn new(fence: F, resources: [R; N]) -> Self {
        assert!(N > 0, "frame ring needs at least one slot");
        Self {
            slots: resources.map(|resource| FrameSlot {
                resource,
                fence: 0,
                recording: false,
            }),
            current: N - 1,
            fence,
            last_signaled: 0,
        }
    }

    /// Moves to the next slot, blocking until the device is done with it.
    ///
    /// Returns the new current slot index.
    pub fn advance(&mut self) -> Result<usize> {
        if self.slots[self.current].recording {
            log::warn!("frame slot {} advanced without submit", self.current);
            self.slots[self.current].recording = false;
        }

        self.current = (self.current + 1) % N;
        let pending = self.slots[self.current].fence;

        if pending != 0 && self.fence.completed_value() < pending {
            log::trace!("frame slot {} waiting on fence {pending}", self.current);
            self.fence.wait_for(pending)?;
        }

        self.slots[self.current].recording = true;
        Ok(self.current)
    }

    /// Marks the current slot submitted with the next fence value and signals it.
    pub fn submit(&mut self, submission: F::Submission) -> u64 {
        self.last_signaled += 1;
        let value = self.last_signaled;

        let slot = &mut self.slots[self.current];
        slot.fence = value;
        slot.recording = false;

        self.fence.signal(value, submission);
        value
    }

    /// Gives up the current frame without submitting; the slot keeps its old fence.
    pub fn abandon(&mut self) {
        self.slots[self.current].recording = false;
    }

    /// Blocks until every submitted frame has completed.
    pub fn flush(&mut self) -> Result<()> {
        if self.last_signaled == 0 {
            return Ok(());
        }
        log::debug!("flushing frame ring up to fence {}", self.last_signaled);
        self.fence.wait_for(self.last_signaled)
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn current(&self) -> &R {
        &self.slots[self.current].resource
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut R {
        &mut self.slots[self.current].resource
    }

    pub fn slot_fence(&self, index: usize) -> u64 {
        self.slots[index].fence
    }

    pub fn state(&self, index: usize) -> SlotState {
        let slot = &self.slots[index];
        if slot.recording {
            SlotState::Recording
        } else if slot.fence == 0 {
            SlotState::Idle
        } else if self.fence.completed_value() >= slot.fence {
            SlotState::Retired { fence: slot.fence }
        } else {
            SlotState::Submitted { fence: slot.fence }
        }
    }

    #[inline]
    pub fn last_signaled(&self) -> u64 {
        self.last_signaled
    }

    pub fn fence(&self) -> &F {
        &self.fence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fence whose device progress is driven by the test.
    #[derive(Default)]
    struct ScriptedFence {
        completed: u64,
        signaled: Vec<u64>,
        waits: Vec<u64>,
    }

    impl Fence for ScriptedFence {
        type Submission = ();

        fn completed_value(&self) -> u64 {
            self.completed
        }

        fn signal(&mut self, value: u64, _: ()) {
            self.signaled.push(value);
        }

        fn wait_for(&mut self, value: u64) -> Result<()> {
            self.waits.push(value);
            self.completed = self.completed.max(value);
            Ok(())
        }
    }

    fn ring() -> FrameRing<usize, ScriptedFence> {
        FrameRing::new(ScriptedFence::default(), [0, 1, 2])
    }

    #[test]
    fn slot_sequence_wraps_modulo_ring_depth() {
        let mut ring = ring();
        let sequence: Vec<usize> = (0..7)
            .map(|_| {
                let index = ring.advance().unwrap();
                assert_eq!(*ring.current(), index);
                ring.submit(());
                index
            })
            .collect();
        assert_eq!(sequence, [0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn fence_values_strictly_increase() {
        let mut ring = ring();
        for expected in 1..=5 {
            ring.advance().unwrap();
            assert_eq!(ring.submit(()), expected);
        }
        assert_eq!(ring.fence().signaled, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn first_lap_never_waits() {
        let mut ring = ring();
        for _ in 0..FRAME_RESOURCE_COUNT {
            ring.advance().unwrap();
            ring.submit(());
        }
        assert!(ring.fence().waits.is_empty());
    }

    #[test]
    fn waits_only_when_the_device_is_behind() {
        let mut ring = ring();
        for _ in 0..3 {
            ring.advance().unwrap();
            ring.submit(());
        }

        // Device finished frame 1 already: slot 0 is reusable without waiting.
        ring.fence.completed = 1;
        ring.advance().unwrap();
        assert!(ring.fence().waits.is_empty());
        ring.submit(());

        // Device still on frame 1: slot 1 (fence 2) must wait.
        ring.advance().unwrap();
        assert_eq!(ring.fence().waits, [2]);
    }

    #[test]
    fn current_slot_is_never_ahead_of_the_device() {
        let mut ring = ring();
        for _ in 0..20 {
            let index = ring.advance().unwrap();
            assert!(ring.slot_fence(index) <= ring.fence().completed_value());
            assert_eq!(ring.state(index), SlotState::Recording);
            ring.submit(());
        }
    }

    #[test]
    fn states_follow_the_slot_lifecycle() {
        let mut ring = ring();
        assert_eq!(ring.state(0), SlotState::Idle);

        ring.advance().unwrap();
        assert_eq!(ring.state(0), SlotState::Recording);

        ring.submit(());
        assert_eq!(ring.state(0), SlotState::Submitted { fence: 1 });

        ring.fence.completed = 1;
        assert_eq!(ring.state(0), SlotState::Retired { fence: 1 });
    }

    #[test]
    fn abandoned_frame_keeps_previous_fence() {
        let mut ring = ring();
        ring.advance().unwrap();
        ring.abandon();
        assert_eq!(ring.state(0), SlotState::Idle);
        assert_eq!(ring.last_signaled(), 0);

        assert_eq!(ring.advance().unwrap(), 1);
        assert_eq!(ring.submit(()), 1);
    }

    #[test]
    fn flush_waits_for_the_last_signal() {
        let mut ring = ring();
        ring.flush().unwrap();
        assert!(ring.fence().waits.is_empty());

        for _ in 0..2 {
            ring.advance().unwrap();
            ring.submit(());
        }
        ring.flush().unwrap();
        assert_eq!(ring.fence().waits, [2]);
        assert_eq!(ring.fence().completed_value(), 2);
    }
}
