//! Shadow-pulse animation driving a live display or an exported sequence
//!
//! Both modes share the domain color clock, so the live display and an
//! exported animation show identical colors at corresponding ticks. The
//! live timer is an explicitly cancellable task: stopping the animator
//! cancels the task handle, so at most one already-scheduled tick can land
//! after the stop is observed and none after that.

use crate::ports::ui_event::UiEvent;
use glyphcast_domain::{AnimationFrame, ArtworkDocument, Rgb, color_at, export_frames};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct LiveAnimation {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Binds the color clock to a display target via the UiEvent channel.
pub struct ArtworkAnimator {
    events: mpsc::UnboundedSender<UiEvent>,
    interval: Duration,
    ticks: Arc<AtomicU64>,
    live: Option<LiveAnimation>,
}

impl ArtworkAnimator {
    pub fn new(events: mpsc::UnboundedSender<UiEvent>, interval: Duration) -> Self {
        Self {
            events,
            interval,
            ticks: Arc::new(AtomicU64::new(0)),
            live: None,
        }
    }

    /// Whether the live timer is running.
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Ticks consumed so far. Monotonic across stop/start; reset only by
    /// [`reset`](Self::reset).
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Start the live pulse against `shadow_base`. Idempotent while running.
    ///
    /// The first tick fires immediately (the base shade), subsequent ticks
    /// at the configured interval. Re-enabling after a stop resumes from
    /// the monotonic tick counter rather than restarting the cycle.
    pub fn start(&mut self, shadow_base: Rgb) {
        if self.live.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let events = self.events.clone();
        let ticks = Arc::clone(&self.ticks);
        let period = self.interval;

        debug!(interval_ms = period.as_millis() as u64, "starting live animation");

        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return,
                    _ = timer.tick() => {
                        let tick = ticks.fetch_add(1, Ordering::Relaxed);
                        if events.send(UiEvent::ShadowTick(color_at(shadow_base, tick))).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        self.live = Some(LiveAnimation { cancel, task });
    }

    /// Stop the live pulse. A no-op when not running. Does not block; the
    /// task observes the cancellation at its next suspension point.
    pub fn stop(&mut self) {
        if let Some(live) = self.live.take() {
            debug!("stopping live animation");
            live.cancel.cancel();
        }
    }

    /// Reset the tick counter. Called when the document itself changes.
    pub fn reset(&mut self) {
        self.ticks.store(0, Ordering::Relaxed);
    }

    /// Export mode: one full cycle of frames for the document, a pure
    /// function of the document's colors.
    pub fn export_frames(&self, document: &ArtworkDocument) -> Vec<AnimationFrame> {
        export_frames(document.shadow())
    }
}

impl Drop for ArtworkAnimator {
    fn drop(&mut self) {
        self.stop();
    }
}
