//! Player - async driver around the sequencer
//!
//! A single task owns the [`Sequencer`] and processes commands and collaborator
//! reports strictly in arrival order. Verse fetches and audio starts run as
//! spawned tasks tagged with the generation of the cue that issued them; a new
//! cue aborts the previous tasks, and any report carrying an older generation
//! is dropped.

use crate::{
    error::{PlaybackError, Result},
    events::SequencerEvent,
    sequencer::Sequencer,
    types::{Cue, PlayerConfig, PlayerSnapshot, RetryPolicy},
};
use std::sync::Arc;
use tilawa_core::{
    AudioSource, AudioTransport, CompletionSignal, PlaybackRange, Position, TilawaError,
    VerseContent, VerseTextProvider,
};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Event channel capacity per subscriber
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// User-facing commands
#[derive(Debug)]
enum Command {
    StartRange(PlaybackRange),
    TogglePlay,
    Next,
    Previous,
    Seek(Position),
    Stop,
}

/// Results reported back by spawned tasks and the audio transport
#[derive(Debug)]
enum Report {
    VerseLoaded {
        generation: u64,
        position: Position,
        result: std::result::Result<VerseContent, TilawaError>,
    },
    AudioStarted {
        generation: u64,
    },
    AudioFinished {
        generation: u64,
    },
    AudioFailed {
        generation: u64,
        error: TilawaError,
    },
}

/// Handle to a running player
///
/// Cheap to clone. The player task exits once every handle is dropped.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<PlayerSnapshot>,
    events: broadcast::Sender<SequencerEvent>,
}

impl PlayerHandle {
    /// Install a range and play it from its first ayah
    pub fn start_range(&self, range: PlaybackRange) -> Result<()> {
        self.send(Command::StartRange(range))
    }

    /// Flip between playing and paused
    pub fn toggle_play(&self) -> Result<()> {
        self.send(Command::TogglePlay)
    }

    /// Step to the next verse, leaving any range
    pub fn next(&self) -> Result<()> {
        self.send(Command::Next)
    }

    /// Step to the previous verse, leaving any range
    pub fn previous(&self) -> Result<()> {
        self.send(Command::Previous)
    }

    /// Jump to a verse, leaving any range
    pub fn seek(&self, position: Position) -> Result<()> {
        self.send(Command::Seek(position))
    }

    /// Stop playback and unload audio
    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    /// Latest published state
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch published state
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot.clone()
    }

    /// Receive sequencer events emitted from now on
    pub fn events(&self) -> broadcast::Receiver<SequencerEvent> {
        self.events.subscribe()
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::PlayerClosed)
    }
}

/// Verse player
pub struct Player;

impl Player {
    /// Spawn the player task on the current tokio runtime
    ///
    /// The text of the starting verse is fetched immediately; nothing plays
    /// until a range is started or play is toggled on.
    pub fn spawn(
        config: PlayerConfig,
        provider: Arc<dyn VerseTextProvider>,
        transport: Arc<dyn AudioTransport>,
    ) -> PlayerHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let sequencer = Sequencer::new(config.sequencer);
        let initial = snapshot_of(&sequencer, &VerseContent::default(), None, None);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let actor = PlayerActor {
            sequencer,
            provider,
            transport,
            audio: config.audio,
            retry: config.retry,
            reports: reports_tx,
            snapshot: snapshot_tx,
            events: events_tx.clone(),
            fetch_task: None,
            audio_task: None,
            audio_generation: None,
            paused_generation: None,
            verse: VerseContent::default(),
            verse_position: None,
            last_error: None,
        };
        tokio::spawn(actor.run(commands_rx, reports_rx));

        PlayerHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
            events: events_tx,
        }
    }
}

struct PlayerActor {
    sequencer: Sequencer,
    provider: Arc<dyn VerseTextProvider>,
    transport: Arc<dyn AudioTransport>,
    audio: AudioSource,
    retry: RetryPolicy,

    reports: mpsc::UnboundedSender<Report>,
    snapshot: watch::Sender<PlayerSnapshot>,
    events: broadcast::Sender<SequencerEvent>,

    fetch_task: Option<JoinHandle<()>>,
    audio_task: Option<JoinHandle<()>>,

    // Generation whose audio the transport has loaded
    audio_generation: Option<u64>,
    // Generation whose audio was paused mid-verse
    paused_generation: Option<u64>,

    verse: VerseContent,
    verse_position: Option<Position>,
    last_error: Option<String>,
}

impl PlayerActor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut reports: mpsc::UnboundedReceiver<Report>,
    ) {
        info!(position = %self.sequencer.position(), "Player started");
        let cue = self.sequencer.retrigger();
        self.apply_cue(cue);
        self.publish();

        loop {
            tokio::select! {
                biased;
                Some(report) = reports.recv() => self.handle_report(report),
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
            }
            self.publish();
        }

        self.abort_tasks();
        if let Err(e) = self.transport.stop().await {
            warn!("Failed to stop audio on shutdown: {}", e);
        }
        info!("Player stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        debug!(?command, "Player command");
        match command {
            Command::StartRange(range) => {
                let cue = self.sequencer.start_range(range);
                self.apply_cue(cue);
            }
            Command::TogglePlay => self.toggle_play().await,
            Command::Next => {
                let cue = self.sequencer.step_next();
                self.apply_cue(cue);
            }
            Command::Previous => {
                let cue = self.sequencer.step_previous();
                self.apply_cue(cue);
            }
            Command::Seek(position) => {
                let cue = self.sequencer.seek(position);
                self.apply_cue(cue);
            }
            Command::Stop => {
                self.sequencer.stop();
                self.abort_audio();
                self.audio_generation = None;
                self.paused_generation = None;
                if let Err(e) = self.transport.stop().await {
                    warn!("Failed to stop audio: {}", e);
                }
            }
        }
    }

    async fn toggle_play(&mut self) {
        if !self.sequencer.toggle_play() {
            self.abort_audio();
            self.paused_generation = self.audio_generation;
            if let Err(e) = self.transport.pause().await {
                warn!("Failed to pause audio: {}", e);
            }
            return;
        }

        // Resume mid-verse only if the paused audio still belongs to the current cue
        if self.paused_generation.take() == Some(self.sequencer.generation()) {
            match self.transport.resume().await {
                Ok(()) => return,
                Err(e) => warn!("Failed to resume audio, restarting verse: {}", e),
            }
        }
        let cue = self.sequencer.retrigger();
        self.apply_cue(cue);
    }

    fn handle_report(&mut self, report: Report) {
        match report {
            Report::VerseLoaded {
                generation,
                position,
                result,
            } => {
                if generation != self.sequencer.generation() {
                    debug!(generation, %position, "Discarding verse for superseded cue");
                    return;
                }
                match result {
                    Ok(verse) => {
                        self.verse = verse;
                        self.verse_position = Some(position);
                        self.last_error = None;
                    }
                    Err(e) => {
                        // Keep the last known text; audio is attempted independently
                        warn!(%position, "Failed to fetch verse text: {}", e);
                        self.last_error = Some(e.to_string());
                    }
                }
            }
            Report::AudioStarted { generation } => {
                if generation == self.sequencer.generation() {
                    self.audio_generation = Some(generation);
                }
            }
            Report::AudioFinished { generation } => {
                if let Some(cue) = self.sequencer.handle_completion(generation) {
                    self.apply_cue(cue);
                }
            }
            Report::AudioFailed { generation, error } => {
                if self.sequencer.mark_stalled(generation) {
                    warn!(
                        position = %self.sequencer.position(),
                        "Audio stalled: {}", error
                    );
                    self.last_error = Some(error.to_string());
                }
            }
        }
    }

    /// Load the verse of `cue` and, if requested, start its audio
    fn apply_cue(&mut self, cue: Cue) {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        let provider = Arc::clone(&self.provider);
        let reports = self.reports.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            let result = provider.fetch_verse(cue.position).await;
            let _ = reports.send(Report::VerseLoaded {
                generation: cue.generation,
                position: cue.position,
                result,
            });
        }));

        if !cue.play_audio {
            return;
        }

        self.abort_audio();
        self.paused_generation = None;
        let url = self.audio.url_for(cue.position);
        let transport = Arc::clone(&self.transport);
        let reports = self.reports.clone();
        let retry = self.retry.clone();
        self.audio_task = Some(tokio::spawn(start_audio(
            transport,
            url,
            cue.generation,
            retry,
            reports,
        )));
    }

    fn abort_audio(&mut self) {
        if let Some(task) = self.audio_task.take() {
            task.abort();
        }
    }

    fn abort_tasks(&mut self) {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        self.abort_audio();
    }

    fn publish(&mut self) {
        for event in self.sequencer.drain_events() {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
        let snapshot = snapshot_of(
            &self.sequencer,
            &self.verse,
            self.verse_position,
            self.last_error.clone(),
        );
        self.snapshot.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

/// Start audio for one cue, retrying with backoff
async fn start_audio(
    transport: Arc<dyn AudioTransport>,
    url: String,
    generation: u64,
    retry: RetryPolicy,
    reports: mpsc::UnboundedSender<Report>,
) {
    let attempts = retry.max_attempts.max(1);
    let mut last_error = TilawaError::audio("no attempt made");

    for attempt in 1..=attempts {
        let finished = reports.clone();
        let signal = CompletionSignal::new(generation, move |generation| {
            let _ = finished.send(Report::AudioFinished { generation });
        });

        match transport.play(&url, signal).await {
            Ok(()) => {
                debug!(url = %url, generation, attempt, "Audio started");
                let _ = reports.send(Report::AudioStarted { generation });
                return;
            }
            Err(e) => {
                warn!(url = %url, attempt, attempts, "Audio failed to start: {}", e);
                last_error = e;
                if attempt < attempts {
                    tokio::time::sleep(retry.backoff_for(attempt)).await;
                }
            }
        }
    }

    let _ = reports.send(Report::AudioFailed {
        generation,
        error: last_error,
    });
}

fn snapshot_of(
    sequencer: &Sequencer,
    verse: &VerseContent,
    verse_position: Option<Position>,
    last_error: Option<String>,
) -> PlayerSnapshot {
    PlayerSnapshot {
        position: sequencer.position(),
        range: sequencer.range().copied(),
        repeat: sequencer.repeat_state(),
        playing: sequencer.is_playing(),
        status: sequencer.status(),
        generation: sequencer.generation(),
        verse: verse.clone(),
        verse_position,
        last_error,
    }
}
