use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

/// Monotonic CPU/GPU synchronization counter.
///
/// `signal` is called right after a submission with the next value; the
/// completed value reaches it once the device has finished that submission.
pub trait Fence {
    /// Token identifying the work a signal value is attached to.
    type Submission;

    /// Highest value the device has reached.
    fn completed_value(&self) -> u64;

    /// Attaches `value` to `submission`.
    fn signal(&mut self, value: u64, submission: Self::Submission);

    /// Blocks until `completed_value() >= value`.
    fn wait_for(&mut self, value: u64) -> Result<()>;
}

/// [`Fence`] over a wgpu queue.
///
/// Completion is reported by `Queue::on_submitted_work_done` callbacks, which
/// fire while the device is polled. Waiting polls the device bound to the
/// submission that carries the value.
pub struct QueueFence {
    device: wgpu::Device,
    queue: wgpu::Queue,
    completed: Arc<AtomicU64>,
    in_flight: VecDeque<(u64, wgpu::SubmissionIndex)>,
}

impl QueueFence {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            completed: Arc::new(AtomicU64::new(0)),
            in_flight: VecDeque::new(),
        }
    }

    fn retire(&mut self) {
        let completed = self.completed.load(Ordering::Acquire);
        while self
            .in_flight
            .front()
            .is_some_and(|(value, _)| *value <= completed)
        {
            self.in_flight.pop_front();
        }
    }
}

impl Fence for QueueFence {
    type Submission = wgpu::SubmissionIndex;

    fn completed_value(&self) -> u64 {
        // Non-blocking; lets pending completion callbacks run.
        if let Err(err) = self.device.poll(wgpu::PollType::Poll) {
            log::warn!("device poll failed: {err}");
        }
        self.completed.load(Ordering::Acquire)
    }

    fn signal(&mut self, value: u64, submission: wgpu::SubmissionIndex) {
        // Keeps the queue no deeper than the frames still in flight.
        self.retire();

        let completed = Arc::clone(&self.completed);
        self.queue.on_submitted_work_done(move || {
            completed.fetch_max(value, Ordering::AcqRel);
        });
        self.in_flight.push_back((value, submission));
    }

    fn wait_for(&mut self, value: u64) -> Result<()> {
        if self.completed.load(Ordering::Acquire) >= value {
            return Ok(());
        }

        let submission = self
            .in_flight
            .iter()
            .find(|(v, _)| *v >= value)
            .map(|(_, index)| index.clone())
            .with_context(|| format!("fence value {value} was never signaled"))?;

        log::trace!("waiting for fence {value}");
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(submission),
                timeout: None,
            })
            .context("device wait on frame fence failed")?;

        // The submission is done even if its callback has not been dispatched yet.
        self.completed.fetch_max(value, Ordering::AcqRel);
        self.retire();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::noop_device;
    use crate::frame::FrameRing;
    use citadel_scene::FRAME_RESOURCE_COUNT;

    #[test]
    fn wait_reaches_the_signaled_value() {
        let (device, queue) = noop_device();
        let mut fence = QueueFence::new(&device, &queue);

        let submission = queue.submit([]);
        fence.signal(1, submission);
        fence.wait_for(1).unwrap();

        assert!(fence.completed_value() >= 1);
        assert!(fence.in_flight.is_empty());
    }

    #[test]
    fn waiting_on_an_unsignaled_value_fails() {
        let (device, queue) = noop_device();
        let mut fence = QueueFence::new(&device, &queue);

        fence.signal(1, queue.submit([]));
        let err = fence.wait_for(5).unwrap_err();
        assert!(format!("{err:#}").contains("never signaled"));
    }

    #[test]
    fn completion_callbacks_advance_the_counter() {
        let (device, queue) = noop_device();
        let mut fence = QueueFence::new(&device, &queue);

        fence.signal(1, queue.submit([]));
        fence.signal(2, queue.submit([]));
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .unwrap();

        assert_eq!(fence.completed_value(), 2);
    }

    #[test]
    fn in_flight_queue_stays_bounded_when_the_device_keeps_up() {
        let (device, queue) = noop_device();
        let mut ring: FrameRing<(), QueueFence> =
            FrameRing::new(QueueFence::new(&device, &queue), [(), (), ()]);

        for _ in 0..1000 {
            ring.advance().unwrap();
            ring.submit(queue.submit([]));
            device
                .poll(wgpu::PollType::Wait {
                    submission_index: None,
                    timeout: None,
                })
                .unwrap();
        }

        assert_eq!(ring.fence().completed_value(), 1000);
        assert!(ring.fence().in_flight.len() <= FRAME_RESOURCE_COUNT);
    }
}
