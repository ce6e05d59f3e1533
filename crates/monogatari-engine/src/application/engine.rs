//! The playback state machine.
//!
//! The engine owns the cursor and the game state for one session. Every
//! entry point (`new_game`, `advance`, `choose`, `resume_timer`,
//! `jump_to_chapter`, `restore`) moves the cursor and then runs the dispatch
//! loop until the story reaches a suspension point: a line waiting for the
//! player, a choice, a timed pause, or the ending.
//!
//! Silent lines (effects, jumps, unknown kinds, skipped text) are handled
//! inside the loop, so a long run of them costs iterations, not stack.

use std::sync::Arc;

use monogatari_core::error::EngineError;
use monogatari_core::report::ErrorReporter;
use monogatari_scenario::application::store::ScenarioStore;
use monogatari_scenario::domain::chapters::{chapter_index, chapter_name};
use monogatari_scenario::domain::model::{Chapter, Line, Scene};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dispatcher::{Transition, classify};
use crate::application::ports::{EffectsSink, PresentationSink, PresentedOption};
use crate::domain::backlog::{Backlog, BacklogEntry};
use crate::domain::cursor::{LineCoordinate, PlaybackCursor};
use crate::domain::ending::{EndingId, resolve};
use crate::domain::state::{ChoiceRecord, GameState};

/// Upper bound on lines handled by one run of the dispatch loop without
/// reaching a suspension point.
pub const MAX_SILENT_STEPS: usize = 10_000;

/// Identifies one scheduled pause. A token from before the last new game,
/// load or chapter jump no longer matches and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    generation: u64,
    coordinate: LineCoordinate,
}

impl TimerToken {
    /// Generation the timer was issued in.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The `wait` line that issued the timer.
    #[must_use]
    pub const fn coordinate(&self) -> LineCoordinate {
        self.coordinate
    }
}

/// Where playback is suspended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// No game started.
    Idle,
    /// A line is on screen; waiting for `advance`.
    AwaitingAdvance,
    /// Options are on screen; waiting for `choose`.
    AwaitingChoice {
        /// The visible options.
        options: Vec<PresentedOption>,
    },
    /// A `wait` line is running; waiting for `resume_timer`.
    AwaitingTimer {
        /// Token the host hands back when the pause ends.
        token: TimerToken,
        /// Pause length.
        duration_ms: u64,
    },
    /// The chapter sequence is exhausted.
    Done {
        /// The ending reached.
        ending: EndingId,
    },
}

impl PlaybackPhase {
    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingAdvance => "awaiting_advance",
            Self::AwaitingChoice { .. } => "awaiting_choice",
            Self::AwaitingTimer { .. } => "awaiting_timer",
            Self::Done { .. } => "done",
        }
    }
}

/// Everything needed to resume a session later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Playback position.
    pub cursor: PlaybackCursor,
    /// Persistent game state.
    pub state: GameState,
    /// Display history, oldest first.
    pub backlog: Vec<BacklogEntry>,
}

/// One playback session over a scenario store.
pub struct Engine {
    store: ScenarioStore,
    presentation: Arc<dyn PresentationSink>,
    effects: Arc<dyn EffectsSink>,
    reporter: Arc<dyn ErrorReporter>,
    session_id: Uuid,
    generation: u64,
    cursor: PlaybackCursor,
    state: GameState,
    backlog: Backlog,
    chapter: Option<(usize, Arc<Chapter>)>,
    entered_scene: Option<(usize, usize)>,
    phase: PlaybackPhase,
    skip_mode: bool,
    auto_mode: bool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("session_id", &self.session_id)
            .field("generation", &self.generation)
            .field("cursor", &self.cursor)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an idle engine. Nothing is loaded until `new_game` or
    /// `restore`.
    #[must_use]
    pub fn new(
        store: ScenarioStore,
        presentation: Arc<dyn PresentationSink>,
        effects: Arc<dyn EffectsSink>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            store,
            presentation,
            effects,
            reporter,
            session_id: Uuid::new_v4(),
            generation: 0,
            cursor: PlaybackCursor::default(),
            state: GameState::new(),
            backlog: Backlog::new(),
            chapter: None,
            entered_scene: None,
            phase: PlaybackPhase::Idle,
            skip_mode: false,
            auto_mode: false,
        }
    }

    /// Identifier of the current session, fresh on every new game or load.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Counter bumped whenever pending timers become stale.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current playback position.
    #[must_use]
    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current suspension point.
    #[must_use]
    pub fn phase(&self) -> &PlaybackPhase {
        &self.phase
    }

    /// Display history.
    #[must_use]
    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    /// Whether read text is skipped.
    #[must_use]
    pub fn skip_mode(&self) -> bool {
        self.skip_mode
    }

    /// Whether the host auto-advances text.
    #[must_use]
    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    /// The chapter playback is in, once loaded.
    #[must_use]
    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.chapter.as_ref().map(|(_, chapter)| chapter.as_ref())
    }

    /// Toggles skip mode. Switching it on while a line waits for the player
    /// advances past that line at once, then keeps skipping read lines.
    pub async fn set_skip_mode(&mut self, enabled: bool) -> PlaybackPhase {
        let switched_on = enabled && !self.skip_mode;
        debug!(enabled, "skip mode toggled");
        self.skip_mode = enabled;
        if switched_on && self.phase == PlaybackPhase::AwaitingAdvance {
            self.cursor.next_line();
            return self.run().await;
        }
        self.phase.clone()
    }

    /// Toggles auto mode. The engine only records it; pacing belongs to the
    /// host.
    pub fn set_auto_mode(&mut self, enabled: bool) {
        debug!(enabled, "auto mode toggled");
        self.auto_mode = enabled;
    }

    /// Starts a new game from the first line of the prologue.
    pub async fn new_game(&mut self) -> PlaybackPhase {
        self.begin_session();
        self.state = GameState::new();
        self.backlog = Backlog::new();
        self.cursor = PlaybackCursor::default();
        info!(session_id = %self.session_id, "new game started");
        self.run().await
    }

    /// Handles the player's advance signal.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidSignal` unless a line is waiting for it.
    pub async fn advance(&mut self) -> Result<PlaybackPhase, EngineError> {
        if self.phase != PlaybackPhase::AwaitingAdvance {
            return Err(self.invalid_signal("advance"));
        }
        self.cursor.next_line();
        Ok(self.run().await)
    }

    /// Handles the player picking the option at `display_index` among the
    /// visible options.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidSignal` if no choice is pending or the
    /// index is out of range.
    pub async fn choose(&mut self, display_index: usize) -> Result<PlaybackPhase, EngineError> {
        let presented = match &self.phase {
            PlaybackPhase::AwaitingChoice { options } => {
                options.get(display_index).cloned().ok_or_else(|| {
                    EngineError::InvalidSignal(format!(
                        "option {display_index} out of range ({} shown)",
                        options.len()
                    ))
                })?
            }
            _ => return Err(self.invalid_signal("choose")),
        };

        let chapter = self
            .chapter
            .as_ref()
            .map(|(_, chapter)| Arc::clone(chapter))
            .ok_or_else(|| EngineError::InvalidSignal("no chapter loaded".to_owned()))?;
        let Some(Line::Choice { options, .. }) = chapter.line(self.cursor.scene(), self.cursor.line())
        else {
            return Err(EngineError::InvalidSignal(format!(
                "no choice at {}",
                self.cursor
            )));
        };
        let Some(option) = options.get(presented.original_index) else {
            return Err(EngineError::InvalidSignal(format!(
                "option {} missing at {}",
                presented.original_index, self.cursor
            )));
        };

        info!(
            chapter = self.cursor.chapter(),
            scene = self.cursor.scene(),
            line = self.cursor.line(),
            selected = presented.original_index,
            "choice made"
        );
        let record = ChoiceRecord {
            chapter: self.cursor.chapter(),
            scene: self.cursor.scene(),
            line: self.cursor.line(),
            selected: presented.original_index,
            text: option.text.clone(),
        };
        self.state.apply_choice(record, &option.effects);

        match &option.next {
            Some(target) => self.jump_to_target(target, &chapter),
            None => self.cursor.next_line(),
        }
        Ok(self.run().await)
    }

    /// Ends the pause identified by `token`. Returns `None` and changes
    /// nothing if the token is stale or no pause is pending.
    pub async fn resume_timer(&mut self, token: TimerToken) -> Option<PlaybackPhase> {
        match &self.phase {
            PlaybackPhase::AwaitingTimer { token: pending, .. } if *pending == token => {
                self.cursor.next_line();
                Some(self.run().await)
            }
            _ => {
                debug!(
                    generation = token.generation,
                    current = self.generation,
                    "stale timer ignored"
                );
                None
            }
        }
    }

    /// Jumps to the first line of chapter `index` from any phase.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidSignal` if `index` is outside the
    /// chapter table.
    pub async fn jump_to_chapter(&mut self, index: usize) -> Result<PlaybackPhase, EngineError> {
        let Some(name) = chapter_name(index) else {
            return Err(EngineError::InvalidSignal(format!(
                "no chapter at index {index}"
            )));
        };
        self.generation += 1;
        self.cursor.jump_to_chapter(index);
        self.entered_scene = None;
        info!(chapter = name, "jumped to chapter");
        Ok(self.run().await)
    }

    /// Captures the resumable part of the session.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            cursor: self.cursor,
            state: self.state.clone(),
            backlog: self.backlog.iter().cloned().collect(),
        }
    }

    /// Replaces the session with `snapshot` and re-dispatches the line under
    /// its cursor.
    pub async fn restore(&mut self, snapshot: EngineSnapshot) -> PlaybackPhase {
        self.begin_session();
        self.cursor = snapshot.cursor;
        self.state = snapshot.state;
        self.backlog = snapshot.backlog.into_iter().collect();
        info!(
            session_id = %self.session_id,
            cursor = %self.cursor,
            "session restored"
        );
        self.run().await
    }

    fn begin_session(&mut self) {
        self.session_id = Uuid::new_v4();
        self.generation += 1;
        self.entered_scene = None;
    }

    fn invalid_signal(&self, signal: &str) -> EngineError {
        EngineError::InvalidSignal(format!("{signal} while {}", self.phase.name()))
    }

    /// Runs the dispatch loop until a suspension point.
    async fn run(&mut self) -> PlaybackPhase {
        for _ in 0..MAX_SILENT_STEPS {
            if let Some(phase) = self.step().await {
                self.phase = phase.clone();
                return phase;
            }
        }

        // Most likely a scene that jumps to itself without showing anything.
        // Parking here lets the player advance past the line the loop
        // stopped on.
        warn!(
            cursor = %self.cursor,
            steps = MAX_SILENT_STEPS,
            "no suspension point reached, pausing playback"
        );
        self.phase = PlaybackPhase::AwaitingAdvance;
        PlaybackPhase::AwaitingAdvance
    }

    /// Handles the line under the cursor. Returns the suspension point, or
    /// `None` once the cursor has moved and the loop should continue.
    async fn step(&mut self) -> Option<PlaybackPhase> {
        let chapter_index = self.cursor.chapter();
        let Some(name) = chapter_name(chapter_index) else {
            return Some(self.finish());
        };
        let chapter = self.ensure_chapter(chapter_index, name).await;

        let Some(scene) = chapter.scene(self.cursor.scene()) else {
            self.cursor.next_chapter();
            return None;
        };
        self.enter_scene(scene);

        let Some(line) = scene.lines.get(self.cursor.line()) else {
            self.cursor.next_scene();
            return None;
        };

        let coordinate = self.cursor.coordinate();
        let previously_read = !self.state.mark_read(coordinate);
        debug!(
            chapter = coordinate.chapter,
            scene = coordinate.scene,
            line = coordinate.line,
            kind = line.kind(),
            previously_read,
            "dispatching line"
        );

        match classify(line, &self.state) {
            Transition::Present {
                speaker,
                text,
                character,
            } => {
                match speaker {
                    Some(speaker) => self.presentation.show_dialogue(speaker, text, character),
                    None => self.presentation.show_narration(text),
                }
                self.backlog.push(speaker.unwrap_or_default(), text);
                if self.skip_mode && previously_read {
                    self.cursor.next_line();
                    return None;
                }
                Some(PlaybackPhase::AwaitingAdvance)
            }
            Transition::Choose { prompt, options } => {
                self.presentation.show_choices(prompt, &options);
                Some(PlaybackPhase::AwaitingChoice { options })
            }
            Transition::EmptyChoice => {
                warn!(
                    chapter = coordinate.chapter,
                    scene = coordinate.scene,
                    line = coordinate.line,
                    "every option hidden, continuing past choice"
                );
                self.cursor.next_line();
                None
            }
            Transition::Effect(effect) => {
                self.effects.play_effect(effect);
                self.cursor.next_line();
                None
            }
            Transition::Wait { duration_ms } => Some(PlaybackPhase::AwaitingTimer {
                token: TimerToken {
                    generation: self.generation,
                    coordinate,
                },
                duration_ms,
            }),
            Transition::Jump { target } => {
                self.jump_to_target(target, &chapter);
                None
            }
            Transition::Skip => {
                self.cursor.next_line();
                None
            }
        }
    }

    /// Returns the chapter at `index`, loading it if playback just moved
    /// there.
    async fn ensure_chapter(&mut self, index: usize, name: &str) -> Arc<Chapter> {
        if let Some((loaded, chapter)) = &self.chapter {
            if *loaded == index {
                return Arc::clone(chapter);
            }
        }
        let chapter = self.store.load_chapter(name).await;
        self.chapter = Some((index, Arc::clone(&chapter)));
        chapter
    }

    /// Sends a scene's backdrop the first time playback reaches it.
    fn enter_scene(&mut self, scene: &Scene) {
        let key = (self.cursor.chapter(), self.cursor.scene());
        if self.entered_scene == Some(key) {
            return;
        }
        self.entered_scene = Some(key);
        debug!(chapter = key.0, scene = %scene.id, "entered scene");
        if let Some(background) = &scene.background {
            self.presentation.set_background(background);
        }
        if let Some(bgm) = &scene.bgm {
            self.effects.play_bgm(bgm);
        }
    }

    /// Moves the cursor to a named chapter or scene. Chapter names win over
    /// scene ids; an unknown name moves on to the next scene.
    fn jump_to_target(&mut self, target: &str, chapter: &Chapter) {
        if let Some(index) = chapter_index(target) {
            debug!(jump_target = target, chapter = index, "jump to chapter");
            self.cursor.jump_to_chapter(index);
        } else if let Some(scene) = chapter.find_scene_index(target) {
            debug!(jump_target = target, scene, "jump to scene");
            self.cursor.jump_to_scene(scene);
        } else {
            let error = EngineError::UnresolvedSceneTarget {
                target: target.to_owned(),
                chapter: chapter.name.clone(),
            };
            warn!(
                jump_target = target,
                chapter = %chapter.name,
                "unresolved jump target, moving to next scene"
            );
            self.reporter.report(&error);
            self.cursor.next_scene();
            return;
        }
        self.entered_scene = None;
    }

    fn finish(&mut self) -> PlaybackPhase {
        let ending = resolve(&self.state);
        info!(
            ending = %ending,
            affection = self.state.affection(),
            "ending reached"
        );
        self.presentation.show_ending(ending);
        PlaybackPhase::Done { ending }
    }
}
