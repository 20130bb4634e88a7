//! The lesson's phase state machine.
//!
//! A [`Tutor`] owns one lesson from start to finish: worked examples,
//! then practice, with reward-game and earnings-reconciliation
//! interludes woven in every time the learner's correct-answer streak
//! hits the configured cadence. Every learner event is a synchronous
//! method here; timing lives entirely in the driver, which calls back in
//! with an epoch so a transition scheduled against stale state is
//! silently dropped.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sumwise_pizzeria::{
    multiplier_for, GameStatus, Order, Resolution, RewardGame, Topping,
};
use sumwise_solver::Step;
use tracing::{debug, info};

use crate::config::TutorConfig;
use crate::earnings::EarningsReconciliation;
use crate::entry::EntryRow;
use crate::error::Result;
use crate::example_player::ExamplePlayer;
use crate::plan::LessonPlan;
use crate::practice::PracticeSession;
use crate::store::{CounterStore, COMPLETED_SESSIONS_KEY};
use crate::worksheet::Verdict;

// ============================================================================
// Phases
// ============================================================================

/// Discriminant-only view of the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    /// Worked examples are being played back.
    Examples,
    /// The learner is answering practice questions.
    Practice,
    /// A pizzeria reward-game session is running.
    RewardGame,
    /// The learner is totalling the game's two-day earnings.
    EarningsCalculation,
    /// The lesson is over.
    Complete,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Examples => "examples",
            Self::Practice => "practice",
            Self::RewardGame => "reward-game",
            Self::EarningsCalculation => "earnings-calculation",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// Playback position within the examples phase.
#[derive(Debug, Clone)]
struct ExamplesRound {
    index: usize,
    player: ExamplePlayer,
}

/// Current phase plus the state only that phase owns.
///
/// A suspended [`PracticeSession`] rides along through the reward-game
/// and earnings phases so practice resumes exactly where it paused.
#[derive(Debug, Clone)]
enum Phase {
    Examples(ExamplesRound),
    Practice(PracticeSession),
    RewardGame {
        game: RewardGame,
        suspended: Box<PracticeSession>,
    },
    EarningsCalculation {
        reconciliation: EarningsReconciliation,
        suspended: Box<PracticeSession>,
    },
    Complete,
}

impl Phase {
    const fn kind(&self) -> PhaseKind {
        match self {
            Self::Examples(_) => PhaseKind::Examples,
            Self::Practice(_) => PhaseKind::Practice,
            Self::RewardGame { .. } => PhaseKind::RewardGame,
            Self::EarningsCalculation { .. } => PhaseKind::EarningsCalculation,
            Self::Complete => PhaseKind::Complete,
        }
    }
}

/// A phase change that has been earned but not yet applied.
///
/// Transitions are deferred so success feedback has time to render; the
/// driver applies them via [`Tutor::resolve_pending`] after the
/// configured delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTransition {
    /// Move practice on to its next question, or complete the lesson.
    NextQuestion,
    /// Open a reward-game session.
    StartRewardGame,
    /// Open earnings reconciliation for the completed game.
    StartEarnings,
    /// Return from earnings reconciliation to practice.
    ResumePractice,
}

// ============================================================================
// History
// ============================================================================

/// Timestamped record of one graded worksheet check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAttempt {
    /// Phase the check happened in.
    pub phase: PhaseKind,
    /// Top operand of the graded problem.
    pub top: String,
    /// Bottom operand of the graded problem.
    pub bottom: String,
    /// The verdict the check produced.
    pub verdict: Verdict,
    /// When the check happened.
    pub graded_at: DateTime<Utc>,
}

// ============================================================================
// Snapshots
// ============================================================================

/// Read-only render state for hosts, taken at a point in time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorSnapshot {
    /// Current phase.
    pub phase: PhaseKind,
    /// Correct practice answers so far this lesson.
    pub correct_answers: u32,
    /// Example playback state, present in the examples phase.
    pub example: Option<ExampleView>,
    /// Open worksheet, present in the practice and earnings phases.
    pub worksheet: Option<WorksheetView>,
    /// Game state, present in the reward-game phase.
    pub game: Option<GameView>,
}

/// Render state for the examples phase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleView {
    /// Zero-based index of the example being played.
    pub index: usize,
    /// Total examples in the lesson.
    pub total: usize,
    /// Top operand of the example.
    pub top: String,
    /// Bottom operand of the example.
    pub bottom: String,
    /// Steps revealed so far, in playback order.
    pub revealed: Vec<Step>,
    /// Whether this example is fully revealed.
    pub finished: bool,
}

/// Render state for an open worksheet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetView {
    /// Top operand.
    pub top: String,
    /// Bottom operand.
    pub bottom: String,
    /// The learner's answer row.
    pub answer: Vec<Option<u8>>,
    /// The learner's carry row.
    pub carries: Vec<Option<u8>>,
    /// Verdict from the most recent check.
    pub verdict: Verdict,
    /// `(question index, question count)` during practice, absent during
    /// earnings reconciliation.
    pub progress: Option<(usize, usize)>,
}

impl WorksheetView {
    fn from_sheet(sheet: &crate::worksheet::Worksheet, progress: Option<(usize, usize)>) -> Self {
        Self {
            top: sheet.top().to_string(),
            bottom: sheet.bottom().to_string(),
            answer: sheet.entry().answer().to_vec(),
            carries: sheet.entry().carries().to_vec(),
            verdict: sheet.verdict(),
            progress,
        }
    }
}

/// Render state for the reward-game phase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// Session lifecycle status.
    pub status: GameStatus,
    /// Current day, 1 or 2.
    pub day: u8,
    /// The order being assembled, if one is active.
    pub order: Option<Order>,
    /// The learner's current topping selection.
    pub selection: Vec<Topping>,
    /// Seconds left on the countdown.
    pub time_remaining: u32,
    /// This session's price multiplier.
    pub multiplier: u32,
    /// Earnings accumulated on day 1.
    pub earnings_day_one: u32,
    /// Earnings accumulated on day 2.
    pub earnings_day_two: u32,
}

// ============================================================================
// Tutor
// ============================================================================

/// One lesson, from the first worked example to completion.
pub struct Tutor {
    config: TutorConfig,
    plan: LessonPlan,
    phase: Phase,
    pending: Option<PendingTransition>,
    /// Bumped on every applied transition; stale deferred callbacks
    /// carry an old value and are dropped.
    epoch: u64,
    correct_total: u32,
    history: Vec<GradedAttempt>,
    store: Box<dyn CounterStore>,
    rng: Box<dyn RngCore + Send>,
}

impl fmt::Debug for Tutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tutor")
            .field("phase", &self.phase.kind())
            .field("pending", &self.pending)
            .field("epoch", &self.epoch)
            .field("correct_total", &self.correct_total)
            .finish_non_exhaustive()
    }
}

impl Tutor {
    /// Generates a lesson and opens it on the first worked example.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new<R>(config: TutorConfig, store: Box<dyn CounterStore>, rng: R) -> Result<Self>
    where
        R: RngCore + Send + 'static,
    {
        config.validate()?;
        let mut rng: Box<dyn RngCore + Send> = Box::new(rng);
        let plan = LessonPlan::generate(
            &mut *rng,
            config.tier,
            config.example_count,
            config.practice_questions,
        );

        let phase = match plan.examples.first().cloned() {
            Some(question) => Phase::Examples(ExamplesRound {
                index: 0,
                player: ExamplePlayer::new(question)?,
            }),
            None => Phase::Practice(PracticeSession::new(plan.practice.clone())?),
        };

        info!(
            tier = %config.tier,
            examples = plan.examples.len(),
            practice = plan.practice.len(),
            "Lesson ready"
        );

        Ok(Self {
            config,
            plan,
            phase,
            pending: None,
            epoch: 0,
            correct_total: 0,
            history: Vec::new(),
            store,
            rng,
        })
    }

    /// Generates a lesson with an OS-seeded generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_default_rng(config: TutorConfig, store: Box<dyn CounterStore>) -> Result<Self> {
        Self::new(config, store, rand::rngs::StdRng::from_entropy())
    }

    // ------------------------------------------------------------------------
    // Examples phase
    // ------------------------------------------------------------------------

    /// One auto-play beat: reveal the next step of the current example,
    /// or move on when it is fully revealed.
    ///
    /// Returns `false` once the examples phase is over and auto-play
    /// should stop.
    ///
    /// # Errors
    ///
    /// Returns an error if moving into practice fails.
    pub fn autoplay_tick(&mut self) -> Result<bool> {
        let Phase::Examples(round) = &mut self.phase else {
            return Ok(false);
        };
        if round.player.advance() {
            return Ok(true);
        }
        self.next_example()
    }

    /// Reveals the next step of the current example by hand.
    pub fn advance_example_step(&mut self) -> bool {
        match &mut self.phase {
            Phase::Examples(round) => round.player.advance(),
            _ => false,
        }
    }

    /// Reveals the rest of the current example at once.
    pub fn skip_example(&mut self) {
        if let Phase::Examples(round) = &mut self.phase {
            round.player.jump_to_end();
        }
    }

    /// Moves on to the next example, or into practice after the last one.
    ///
    /// Returns `false` once the examples phase is over.
    ///
    /// # Errors
    ///
    /// Returns an error if moving into practice fails.
    pub fn next_example(&mut self) -> Result<bool> {
        let Phase::Examples(round) = &mut self.phase else {
            return Ok(false);
        };
        let next = round.index + 1;
        if let Some(question) = self.plan.examples.get(next).cloned() {
            round.player = ExamplePlayer::new(question)?;
            round.index = next;
            debug!(example = next, "Example advanced");
            return Ok(true);
        }
        self.begin_practice()?;
        Ok(false)
    }

    fn begin_practice(&mut self) -> Result<()> {
        self.phase = Phase::Practice(PracticeSession::new(self.plan.practice.clone())?);
        self.epoch += 1;
        info!(questions = self.plan.practice.len(), "Practice started");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Worksheet phases (practice and earnings)
    // ------------------------------------------------------------------------

    /// Writes one digit of the learner's work on the open worksheet.
    ///
    /// Routed to whichever worksheet phase is active; invalid input and
    /// out-of-phase writes are silently rejected.
    pub fn submit_digit(&mut self, row: EntryRow, index: usize, value: &str) -> bool {
        match &mut self.phase {
            Phase::Practice(session) => session.submit_digit(row, index, value),
            Phase::EarningsCalculation { reconciliation, .. } => {
                reconciliation.submit_digit(row, index, value)
            }
            _ => false,
        }
    }

    /// Grades the open worksheet and records the attempt.
    ///
    /// A correct practice answer schedules the next question, or a
    /// reward game once the streak cadence is hit; a correct earnings
    /// total schedules the return to practice. Incorrect answers leave
    /// the worksheet open for another try. Returns `None` outside the
    /// worksheet phases.
    pub fn check_answer(&mut self) -> Option<Verdict> {
        let (verdict, top, bottom) = match &mut self.phase {
            Phase::Practice(session) => {
                let verdict = session.check();
                let sheet = session.worksheet();
                (verdict, sheet.top().to_string(), sheet.bottom().to_string())
            }
            Phase::EarningsCalculation { reconciliation, .. } => {
                let verdict = reconciliation.check();
                let sheet = reconciliation.worksheet();
                (verdict, sheet.top().to_string(), sheet.bottom().to_string())
            }
            _ => return None,
        };

        let phase = self.phase.kind();
        self.history.push(GradedAttempt {
            phase,
            top,
            bottom,
            verdict,
            graded_at: Utc::now(),
        });

        if verdict == Verdict::Correct {
            let transition = match phase {
                PhaseKind::Practice => {
                    self.correct_total += 1;
                    if self.correct_total % self.config.reward_streak == 0 {
                        PendingTransition::StartRewardGame
                    } else {
                        PendingTransition::NextQuestion
                    }
                }
                _ => PendingTransition::ResumePractice,
            };
            self.pending = Some(transition);
        }
        info!(%phase, ?verdict, correct_total = self.correct_total, "Answer checked");

        Some(verdict)
    }

    // ------------------------------------------------------------------------
    // Reward-game phase
    // ------------------------------------------------------------------------

    /// Arms the first order of the reward game.
    pub fn start_game(&mut self) {
        if let Phase::RewardGame { game, .. } = &mut self.phase {
            game.start();
        }
    }

    /// Toggles a topping on the pizza being assembled.
    pub fn toggle_topping(&mut self, topping: Topping) {
        if let Phase::RewardGame { game, .. } = &mut self.phase {
            game.toggle_topping(topping);
        }
    }

    /// Serves the assembled pizza against the active order.
    ///
    /// # Errors
    ///
    /// Returns an error if the session counter cannot be persisted when
    /// this serve completes the game.
    pub fn serve(&mut self) -> Result<Option<Resolution>> {
        let Phase::RewardGame { game, .. } = &mut self.phase else {
            return Ok(None);
        };
        let resolution = game.serve();
        // Only the resolving call may fire the completion hook; later
        // calls against a finished game are no-ops.
        if resolution.is_some() && game.is_complete() {
            self.on_game_complete()?;
        }
        Ok(resolution)
    }

    /// Advances the order countdown by one second.
    ///
    /// # Errors
    ///
    /// Returns an error if the session counter cannot be persisted when
    /// this tick completes the game.
    pub fn countdown_tick(&mut self) -> Result<Option<Resolution>> {
        let Phase::RewardGame { game, .. } = &mut self.phase else {
            return Ok(None);
        };
        let resolution = game.tick();
        if resolution.is_some() && game.is_complete() {
            self.on_game_complete()?;
        }
        Ok(resolution)
    }

    /// Persists the completed session and schedules earnings
    /// reconciliation. The bumped counter changes the multiplier of the
    /// next session, never this one.
    fn on_game_complete(&mut self) -> Result<()> {
        let sessions = self.store.increment(COMPLETED_SESSIONS_KEY)?;
        self.pending = Some(PendingTransition::StartEarnings);
        info!(
            sessions,
            next_multiplier = multiplier_for(sessions),
            "Reward game complete"
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Deferred transitions
    // ------------------------------------------------------------------------

    /// Applies the pending transition, if the caller's epoch is current.
    ///
    /// Returns `true` if a transition was applied. A stale epoch or an
    /// empty pending slot is a no-op, which is how timer callbacks that
    /// raced a state change get dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition's setup fails, such as loading
    /// the persisted session counter.
    pub fn resolve_pending(&mut self, epoch: u64) -> Result<bool> {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "Stale transition dropped");
            return Ok(false);
        }
        let Some(transition) = self.pending.take() else {
            return Ok(false);
        };

        match transition {
            PendingTransition::NextQuestion => {
                let advanced = match &mut self.phase {
                    Phase::Practice(session) => session.advance()?,
                    _ => return Ok(false),
                };
                if !advanced {
                    self.complete();
                }
            }
            PendingTransition::StartRewardGame => {
                let phase = std::mem::replace(&mut self.phase, Phase::Complete);
                if let Phase::Practice(session) = phase {
                    let sessions = self.store.load(COMPLETED_SESSIONS_KEY)?;
                    let multiplier = multiplier_for(sessions);
                    let game = RewardGame::new(
                        &mut *self.rng,
                        multiplier,
                        self.config.order_timer_seconds,
                    );
                    info!(sessions, multiplier, "Reward game opened");
                    self.phase = Phase::RewardGame {
                        game,
                        suspended: Box::new(session),
                    };
                } else {
                    self.phase = phase;
                }
            }
            PendingTransition::StartEarnings => {
                let phase = std::mem::replace(&mut self.phase, Phase::Complete);
                if let Phase::RewardGame { game, suspended } = phase {
                    match game.final_earnings() {
                        Some((day_one, day_two)) => {
                            info!(day_one, day_two, "Earnings reconciliation opened");
                            self.phase = Phase::EarningsCalculation {
                                reconciliation: EarningsReconciliation::new(day_one, day_two)?,
                                suspended,
                            };
                        }
                        None => {
                            self.phase = Phase::RewardGame { game, suspended };
                        }
                    }
                } else {
                    self.phase = phase;
                }
            }
            PendingTransition::ResumePractice => {
                let phase = std::mem::replace(&mut self.phase, Phase::Complete);
                if let Phase::EarningsCalculation { suspended, .. } = phase {
                    let mut session = *suspended;
                    if session.advance()? {
                        info!(question = session.question_index(), "Practice resumed");
                        self.phase = Phase::Practice(session);
                    } else {
                        self.complete();
                    }
                } else {
                    self.phase = phase;
                }
            }
        }

        self.epoch += 1;
        Ok(true)
    }

    fn complete(&mut self) {
        self.phase = Phase::Complete;
        info!(
            correct_total = self.correct_total,
            attempts = self.history.len(),
            "Lesson complete"
        );
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// Current phase discriminant.
    #[must_use]
    pub const fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// The transition waiting to be applied, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    /// Current epoch, for scheduling deferred transitions.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Correct practice answers so far this lesson.
    #[must_use]
    pub const fn correct_answers(&self) -> u32 {
        self.correct_total
    }

    /// Completed reward-game sessions across all runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted counter cannot be read.
    pub fn completed_sessions(&self) -> Result<u64> {
        self.store.load(COMPLETED_SESSIONS_KEY)
    }

    /// Every graded worksheet check this lesson, in order.
    #[must_use]
    pub fn history(&self) -> &[GradedAttempt] {
        &self.history
    }

    /// The lesson configuration.
    #[must_use]
    pub const fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Takes a point-in-time render snapshot of the lesson.
    #[must_use]
    pub fn snapshot(&self) -> TutorSnapshot {
        let mut snapshot = TutorSnapshot {
            phase: self.phase.kind(),
            correct_answers: self.correct_total,
            example: None,
            worksheet: None,
            game: None,
        };

        match &self.phase {
            Phase::Examples(round) => {
                snapshot.example = Some(ExampleView {
                    index: round.index,
                    total: self.plan.examples.len(),
                    top: round.player.question().top.clone(),
                    bottom: round.player.question().bottom.clone(),
                    revealed: round.player.revealed_steps().to_vec(),
                    finished: round.player.is_finished(),
                });
            }
            Phase::Practice(session) => {
                snapshot.worksheet = Some(WorksheetView::from_sheet(
                    session.worksheet(),
                    Some((session.question_index(), session.question_count())),
                ));
            }
            Phase::RewardGame { game, .. } => {
                snapshot.game = Some(GameView {
                    status: game.status(),
                    day: game.day(),
                    order: game.current_order().cloned(),
                    selection: game.selection().iter().copied().collect(),
                    time_remaining: game.time_remaining(),
                    multiplier: game.multiplier(),
                    earnings_day_one: game.earnings_for_day(1),
                    earnings_day_two: game.earnings_for_day(2),
                });
            }
            Phase::EarningsCalculation { reconciliation, .. } => {
                snapshot.worksheet =
                    Some(WorksheetView::from_sheet(reconciliation.worksheet(), None));
            }
            Phase::Complete => {}
        }

        snapshot
    }
}

// ============================================================================
// Tests
// ============================================================================
