//! Frame clock: a wrapping frame counter advanced on a fixed schedule.
//!
//! The controller is owned by one coordinating task, which pulls frames
//! with [`AnimationController::next_frame`]. Anyone else who wants to
//! follow along takes a [`FrameSubscription`] and receives copies of
//! every frame number.
//!
//! ## Rust concepts
//! - `tokio::time::Interval` as a restartable tick schedule
//! - `tokio::sync::broadcast` for fan-out to independent listeners
//! - `Option` fields to model a Running/Stopped state machine

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{Instant, Interval, MissedTickBehavior};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_FRAMES: u32 = 100;

/// Frame notifications buffered per subscriber before it starts lagging.
const SUBSCRIBER_BUFFER: usize = 64;

/// Drives the frame counter.
///
/// Frames count `0, 1, …, max_frames - 1` and wrap back to 0. Stopping
/// keeps the current frame, so a later [`start`](Self::start) resumes
/// where it left off.
#[derive(Debug)]
pub struct AnimationController {
    frame: u32,
    max_frames: u32,
    interval: Duration,
    /// `Some` while running.
    schedule: Option<Interval>,
    notifier: broadcast::Sender<u32>,
}

impl AnimationController {
    pub fn new() -> Self {
        let (notifier, _) = broadcast::channel(SUBSCRIBER_BUFFER);
        Self {
            frame: 0,
            max_frames: DEFAULT_MAX_FRAMES,
            interval: DEFAULT_INTERVAL,
            schedule: None,
            notifier,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    /// Period of the most recent [`start`](Self::start), or the default.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// Begin ticking every `interval`, wrapping at `max_frames`.
    ///
    /// The first tick arrives one full `interval` after this call. Does
    /// nothing if already running. Must be called inside a tokio runtime.
    pub fn start(&mut self, interval: Duration, max_frames: u32) {
        if self.is_running() {
            tracing::debug!("Animation already running; start ignored");
            return;
        }
        self.max_frames = max_frames.max(1);
        // `interval_at` rejects a zero period.
        self.interval = interval.max(Duration::from_millis(1));
        let interval = self.interval;
        let mut schedule = tokio::time::interval_at(Instant::now() + interval, interval);
        schedule.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.schedule = Some(schedule);
        tracing::info!(
            "Animation started: {}ms per frame, {} frames",
            interval.as_millis(),
            self.max_frames
        );
    }

    /// Stop ticking. The current frame is kept. Does nothing if stopped.
    pub fn stop(&mut self) {
        if self.schedule.take().is_some() {
            tracing::info!("Animation stopped at frame {}", self.frame);
        }
    }

    /// Advance one frame, notify subscribers and return the new frame.
    pub fn tick(&mut self) -> u32 {
        self.frame = (self.frame + 1) % self.max_frames;
        self.notify();
        self.frame
    }

    /// Jump back to frame 0 and notify once. Running state is unchanged.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.notify();
    }

    /// Wait for the next scheduled tick and advance to it.
    ///
    /// Returns `None` immediately while stopped.
    pub async fn next_frame(&mut self) -> Option<u32> {
        self.schedule.as_mut()?.tick().await;
        Some(self.tick())
    }

    pub fn subscribe(&self) -> FrameSubscription {
        FrameSubscription {
            receiver: self.notifier.subscribe(),
        }
    }

    fn notify(&self) {
        // No subscribers is fine.
        let _ = self.notifier.send(self.frame);
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new()
    }
}

/// A listener's copy of the frame stream.
///
/// Dropping it (or calling [`unsubscribe`](Self::unsubscribe)) ends the
/// subscription.
#[derive(Debug)]
pub struct FrameSubscription {
    receiver: broadcast::Receiver<u32>,
}

impl FrameSubscription {
    /// Next frame number, or `None` once the controller is gone.
    ///
    /// A subscriber that falls behind skips ahead to the oldest frame
    /// still buffered.
    pub async fn recv(&mut self) -> Option<u32> {
        loop {
            match self.receiver.recv().await {
                Ok(frame) => return Some(frame),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Frame subscriber lagged, skipped {} frames", missed);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// A frame that has already been published, without waiting.
    pub fn try_recv(&mut self) -> Option<u32> {
        loop {
            match self.receiver.try_recv() {
                Ok(frame) => return Some(frame),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}
