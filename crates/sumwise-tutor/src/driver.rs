//! Timer plumbing around the synchronous [`Tutor`] core.
//!
//! The [`TutorDriver`] owns the three clocks a lesson needs: the
//! auto-play beat for worked examples, the once-per-second order
//! countdown during the reward game, and the one-shot feedback delay
//! before a pending transition is applied. Every timer callback re-enters
//! the tutor through its lock and carries the epoch it was scheduled
//! against, so a callback that raced a learner event resolves to a no-op
//! inside the core rather than a race here.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use sumwise_pizzeria::{Resolution, Topping};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::warn;

use crate::entry::EntryRow;
use crate::error::Result;
use crate::phase::{PhaseKind, Tutor, TutorSnapshot};
use crate::worksheet::Verdict;

/// Holder for the in-flight feedback-delay task. A std mutex, not a
/// tokio one, so `Drop` can abort the task without awaiting.
type DeferredSlot = Arc<StdMutex<Option<JoinHandle<()>>>>;

/// Runs a [`Tutor`] against real (or test-paused) tokio time.
///
/// Must be created inside a tokio runtime. Auto-play is opt-in: the host
/// starts it with [`start_autoplay`](Self::start_autoplay) and may pause
/// it at any tick, so manual stepping never races a background loop. All
/// spawned tasks are aborted when the driver drops.
#[derive(Debug)]
pub struct TutorDriver {
    tutor: Arc<Mutex<Tutor>>,
    autoplay_period: Duration,
    feedback_delay: Duration,
    autoplay: Option<JoinHandle<()>>,
    countdown: Option<JoinHandle<()>>,
    deferred: DeferredSlot,
}

impl TutorDriver {
    /// Wraps a tutor. No timers run until the host asks for them.
    #[must_use]
    pub fn new(tutor: Tutor) -> Self {
        let autoplay_period = tutor.config().auto_play_period();
        let feedback_delay = tutor.config().feedback_delay();
        Self {
            tutor: Arc::new(Mutex::new(tutor)),
            autoplay_period,
            feedback_delay,
            autoplay: None,
            countdown: None,
            deferred: Arc::new(StdMutex::new(None)),
        }
    }

    /// Shared handle to the underlying tutor.
    #[must_use]
    pub fn tutor(&self) -> Arc<Mutex<Tutor>> {
        Arc::clone(&self.tutor)
    }

    /// Takes a point-in-time render snapshot.
    pub async fn snapshot(&self) -> TutorSnapshot {
        self.tutor.lock().await.snapshot()
    }

    // ------------------------------------------------------------------------
    // Learner events
    // ------------------------------------------------------------------------

    /// Writes one digit of the learner's work on the open worksheet.
    pub async fn submit_digit(&self, row: EntryRow, index: usize, value: &str) -> bool {
        self.tutor.lock().await.submit_digit(row, index, value)
    }

    /// Grades the open worksheet, scheduling any earned transition after
    /// the feedback delay.
    pub async fn check_answer(&self) -> Option<Verdict> {
        let mut guard = self.tutor.lock().await;
        let verdict = guard.check_answer();
        self.arm_if_pending(&mut guard);
        verdict
    }

    /// Starts (or restarts) the example auto-play loop.
    pub fn start_autoplay(&mut self) {
        self.spawn_autoplay();
    }

    /// Pauses auto-play; manual stepping keeps working.
    pub fn pause_autoplay(&mut self) {
        if let Some(handle) = self.autoplay.take() {
            handle.abort();
        }
    }

    /// Reveals the next step of the current example by hand.
    pub async fn advance_example_step(&self) -> bool {
        self.tutor.lock().await.advance_example_step()
    }

    /// Reveals the rest of the current example at once.
    pub async fn skip_example(&self) {
        self.tutor.lock().await.skip_example();
    }

    /// Arms the reward game's first order and starts its countdown.
    pub async fn start_game(&mut self) {
        self.tutor.lock().await.start_game();
        self.spawn_countdown();
    }

    /// Toggles a topping on the pizza being assembled.
    pub async fn toggle_topping(&self, topping: Topping) {
        self.tutor.lock().await.toggle_topping(topping);
    }

    /// Serves the assembled pizza, scheduling the earnings transition if
    /// this serve completed the game.
    ///
    /// A resolving serve restarts the countdown task, so the next order's
    /// first second is a full second regardless of where the old 1 Hz
    /// beat stood.
    ///
    /// # Errors
    ///
    /// Returns an error if the session counter cannot be persisted.
    pub async fn serve(&mut self) -> Result<Option<Resolution>> {
        let mut guard = self.tutor.lock().await;
        let resolution = guard.serve()?;
        let game_over = guard.pending().is_some();
        self.arm_if_pending(&mut guard);
        drop(guard);

        if game_over {
            if let Some(handle) = self.countdown.take() {
                handle.abort();
            }
        } else if resolution.is_some() {
            self.spawn_countdown();
        }
        Ok(resolution)
    }

    // ------------------------------------------------------------------------
    // Timer loops
    // ------------------------------------------------------------------------

    fn spawn_autoplay(&mut self) {
        if let Some(old) = self.autoplay.take() {
            old.abort();
        }
        let tutor = Arc::clone(&self.tutor);
        let period = self.autoplay_period;
        self.autoplay = Some(tokio::spawn(async move {
            loop {
                sleep(period).await;
                let keep_going = match tutor.lock().await.autoplay_tick() {
                    Ok(keep_going) => keep_going,
                    Err(e) => {
                        warn!(error = %e, "Auto-play stopped");
                        false
                    }
                };
                if !keep_going {
                    break;
                }
            }
        }));
    }

    fn spawn_countdown(&mut self) {
        if let Some(old) = self.countdown.take() {
            old.abort();
        }
        let tutor = Arc::clone(&self.tutor);
        let deferred = Arc::clone(&self.deferred);
        let delay = self.feedback_delay;
        self.countdown = Some(tokio::spawn(async move {
            loop {
                sleep(Duration::from_secs(1)).await;
                let mut guard = tutor.lock().await;
                if guard.phase_kind() != PhaseKind::RewardGame || guard.pending().is_some() {
                    break;
                }
                if let Err(e) = guard.countdown_tick() {
                    warn!(error = %e, "Countdown stopped");
                    break;
                }
                if guard.pending().is_some() {
                    // This tick ran the game out; hand off to the
                    // feedback delay and stop ticking.
                    let epoch = guard.epoch();
                    drop(guard);
                    arm_deferred(&tutor, &deferred, delay, epoch);
                    break;
                }
            }
        }));
    }

    /// Schedules the feedback-delay task if the last event left a
    /// transition pending.
    fn arm_if_pending(&self, guard: &mut Tutor) {
        if guard.pending().is_some() {
            arm_deferred(&self.tutor, &self.deferred, self.feedback_delay, guard.epoch());
        }
    }
}

impl Drop for TutorDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.autoplay.take() {
            handle.abort();
        }
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
        let mut slot = self
            .deferred
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

/// Spawns a one-shot task that applies the pending transition after the
/// feedback delay, replacing (and aborting) any earlier one.
fn arm_deferred(tutor: &Arc<Mutex<Tutor>>, slot: &DeferredSlot, delay: Duration, epoch: u64) {
    let tutor = Arc::clone(tutor);
    let handle = tokio::spawn(async move {
        sleep(delay).await;
        if let Err(e) = tutor.lock().await.resolve_pending(epoch) {
            warn!(error = %e, "Deferred transition failed");
        }
    });

    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(old) = guard.replace(handle) {
        old.abort();
    }
}
