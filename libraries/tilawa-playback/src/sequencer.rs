//! Playback sequencer - core state machine
//!
//! Decides the next verse each time the current one finishes, and exposes
//! manual navigation. The sequencer performs no I/O: every decision that needs
//! a verse loaded is returned as a [`Cue`] for the driver to act on.

use crate::{
    events::SequencerEvent,
    types::{Cue, PlaybackStatus, RepeatState, SequencerConfig},
};
use tilawa_core::{PlaybackRange, Position};
use tracing::debug;

/// Verse sequencer
///
/// States are the combinations of the playing flag and range presence:
/// - Idle: not playing
/// - Sequential: playing, no range; each completion advances one verse
/// - Range: playing inside a range, honouring ayah and range repeat counts
pub struct Sequencer {
    position: Position,
    range: Option<PlaybackRange>,
    repeat: RepeatState,
    playing: bool,
    stalled: bool,

    // Incremented on every cue
    generation: u64,

    // Event queue for UI synchronization
    pending_events: Vec<SequencerEvent>,
}

impl Sequencer {
    /// Create new sequencer
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            position: config.start,
            range: None,
            repeat: RepeatState::initial(),
            playing: false,
            stalled: false,
            generation: 0,
            pending_events: Vec::new(),
        }
    }

    // ===== State =====

    /// Current verse
    pub fn position(&self) -> Position {
        self.position
    }

    /// Active range, if any
    pub fn range(&self) -> Option<&PlaybackRange> {
        self.range.as_ref()
    }

    /// Repeat progress
    pub fn repeat_state(&self) -> RepeatState {
        self.repeat
    }

    /// Whether the sequencer-driven loop is running
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Generation of the latest cue
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current state of the machine
    pub fn status(&self) -> PlaybackStatus {
        if self.stalled {
            PlaybackStatus::Stalled
        } else if !self.playing {
            PlaybackStatus::Idle
        } else if self.range.is_some() {
            PlaybackStatus::Range
        } else {
            PlaybackStatus::Sequential
        }
    }

    /// Cue describing the current verse, without issuing a new generation
    pub fn current_cue(&self) -> Cue {
        Cue {
            position: self.position,
            generation: self.generation,
            play_audio: self.playing,
        }
    }

    // ===== Playback Control =====

    /// Install a range and start playing it from its first ayah
    ///
    /// Always issues a cue, even if the current verse is already the range
    /// start, so the verse is reloaded and played.
    pub fn start_range(&mut self, range: PlaybackRange) -> Cue {
        self.range = Some(range);
        self.repeat = RepeatState::initial();
        self.pending_events
            .push(SequencerEvent::RangeStarted { range });
        self.set_playing(true);
        self.move_to(range.start())
    }

    /// Flip the playing flag
    ///
    /// Position and repeat progress are kept either way. Returns the new flag.
    pub fn toggle_play(&mut self) -> bool {
        let playing = !self.playing;
        self.set_playing(playing);
        playing
    }

    /// Set the playing flag; returns whether it changed
    pub fn play(&mut self) -> bool {
        let changed = !self.playing;
        self.set_playing(true);
        changed
    }

    /// Clear the playing flag; returns whether it changed
    pub fn pause(&mut self) -> bool {
        let changed = self.playing;
        self.set_playing(false);
        changed
    }

    /// Stop playback, keeping position and range
    pub fn stop(&mut self) {
        self.set_playing(false);
    }

    /// Re-evaluate the current verse
    pub fn retrigger(&mut self) -> Cue {
        self.issue_cue()
    }

    // ===== Navigation =====

    /// Manually step to the next verse, leaving any range
    pub fn step_next(&mut self) -> Cue {
        self.clear_range();
        self.move_to(self.position.next())
    }

    /// Manually step to the previous verse, leaving any range
    pub fn step_previous(&mut self) -> Cue {
        self.clear_range();
        self.move_to(self.position.previous())
    }

    /// Jump to a verse, leaving any range
    pub fn seek(&mut self, position: Position) -> Cue {
        self.clear_range();
        self.move_to(position)
    }

    // ===== Completion =====

    /// Decide what follows the audio of cue `generation`
    ///
    /// Completions from superseded cues, or arriving while not playing, are
    /// ignored and return `None`.
    pub fn handle_completion(&mut self, generation: u64) -> Option<Cue> {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "Ignoring completion of superseded cue"
            );
            return None;
        }
        if !self.playing {
            return None;
        }

        let Some(range) = self.range else {
            return Some(self.move_to(self.position.next()));
        };

        if self.repeat.ayah_repeats_done < range.repeat_ayah_count() {
            self.repeat.ayah_repeats_done += 1;
            self.pending_events.push(SequencerEvent::AyahRepeated {
                position: self.position,
                repeat: self.repeat.ayah_repeats_done,
            });
            return Some(self.issue_cue());
        }

        if self.position.ayah() == range.end_ayah() {
            if self.repeat.range_repeats_done < range.repeat_range_count() {
                self.repeat.ayah_repeats_done = 1;
                self.repeat.range_repeats_done += 1;
                self.pending_events.push(SequencerEvent::RangePassStarted {
                    pass: self.repeat.range_repeats_done,
                });
                return Some(self.move_to(range.start()));
            }

            // Final pass done: idle at the range start, range stays installed
            self.repeat = RepeatState::initial();
            self.pending_events
                .push(SequencerEvent::RangeCompleted { range });
            self.set_playing(false);
            return Some(self.move_to(range.start()));
        }

        self.repeat.ayah_repeats_done = 1;
        Some(self.move_to(self.position.next()))
    }

    /// Record that audio for cue `generation` could not be started
    ///
    /// Moves to the stalled state if the cue is still current; returns whether
    /// it was.
    pub fn mark_stalled(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.playing {
            return false;
        }
        self.stalled = true;
        self.playing = false;
        self.pending_events.push(SequencerEvent::Stalled {
            position: self.position,
            generation,
        });
        self.emit_state_changed();
        true
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internal =====

    fn move_to(&mut self, position: Position) -> Cue {
        self.position = position;
        self.issue_cue()
    }

    fn issue_cue(&mut self) -> Cue {
        // A stall belongs to the superseded cue
        self.stalled = false;
        self.generation += 1;
        let cue = self.current_cue();
        debug!(
            position = %cue.position,
            generation = cue.generation,
            play_audio = cue.play_audio,
            "Cue issued"
        );
        self.pending_events.push(SequencerEvent::PositionChanged {
            position: cue.position,
            generation: cue.generation,
            play_audio: cue.play_audio,
        });
        cue
    }

    fn clear_range(&mut self) {
        if self.range.take().is_some() {
            self.repeat = RepeatState::initial();
            self.pending_events.push(SequencerEvent::RangeCleared);
        }
    }

    fn set_playing(&mut self, playing: bool) {
        self.stalled = false;
        if self.playing != playing {
            self.playing = playing;
            self.emit_state_changed();
        }
    }

    fn emit_state_changed(&mut self) {
        self.pending_events.push(SequencerEvent::StateChanged {
            playing: self.playing,
        });
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(SequencerConfig::default())
    }
}
