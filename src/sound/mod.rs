pub mod ambient;
pub mod clack;
pub mod output;

pub use ambient::AmbientPlayer;
pub use clack::{clack_buffer, synthesize};
pub use output::{ClackOutput, RodioOutput};

use std::time::{Duration, Instant};

use crate::log_debug;

pub const FIRST_ACTIVATION_HINT: &str = "Premi un tasto per attivare l'audio";
pub const RESUME_HINT: &str = "Audio sospeso: premi un tasto per riprendere";

const CLACK_GAIN: f32 = 1.0;
/// Minimum gap between two attempts to open a missing device.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    /// Nothing attempted yet.
    Uninitialized,
    Running,
    /// Was running, the output went away.
    Suspended,
    /// Never managed to open.
    Unavailable,
}

/// Clack audio for the session: output lifecycle, mute toggle and the hint shown to the user.
pub struct AudioSession {
    output: Box<dyn ClackOutput>,
    state: AudioState,
    enabled: bool,
    ever_running: bool,
    hint_dismissed: bool,
    retry_backoff: Duration,
    last_failure: Option<Instant>,
}

impl std::fmt::Debug for AudioSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSession")
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .field("ever_running", &self.ever_running)
            .finish_non_exhaustive()
    }
}

impl AudioSession {
    pub fn new(output: Box<dyn ClackOutput>, enabled: bool) -> Self {
        Self {
            output,
            state: AudioState::Uninitialized,
            enabled,
            ever_running: false,
            hint_dismissed: false,
            retry_backoff: RETRY_BACKOFF,
            last_failure: None,
        }
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ever_running(&self) -> bool {
        self.ever_running
    }

    /// Open or reopen the output. Without `resume` only the first attempt is made.
    /// Failures are logged and otherwise ignored.
    pub fn try_init(&mut self, resume: bool) {
        if self.output.is_open() {
            self.state = AudioState::Running;
            self.ever_running = true;
            return;
        }

        if self.state == AudioState::Running {
            self.state = AudioState::Suspended;
        }
        if self.state != AudioState::Uninitialized && !resume {
            return;
        }
        if let Some(failed_at) = self.last_failure {
            if failed_at.elapsed() < self.retry_backoff {
                return;
            }
        }

        match self.output.open() {
            Ok(()) => {
                self.state = AudioState::Running;
                self.ever_running = true;
                self.last_failure = None;
            }
            Err(e) => {
                log_debug!("audio init failed: {}", e);
                self.last_failure = Some(Instant::now());
                if self.state == AudioState::Uninitialized {
                    self.state = AudioState::Unavailable;
                }
            }
        }
    }

    /// Play one clack, if enabled and the output is up.
    pub fn clack(&mut self) {
        if !self.enabled || self.state != AudioState::Running {
            return;
        }
        if !self.output.is_open() {
            self.state = AudioState::Suspended;
            return;
        }
        if let Err(e) = self.output.play(clack_buffer(CLACK_GAIN)) {
            log_debug!("clack dropped: {}", e);
            self.state = AudioState::Suspended;
        }
    }

    /// Flip the mute toggle; the output stays open either way.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.try_init(true);
        self.enabled
    }

    /// Key press or focus regained: a chance to start or resume audio.
    pub fn on_user_interaction(&mut self) {
        self.hint_dismissed = true;
        self.try_init(true);
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self.state {
            AudioState::Running => None,
            _ if self.ever_running => Some(RESUME_HINT),
            _ if !self.hint_dismissed => Some(FIRST_ACTIVATION_HINT),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.enabled { "Audio CLACK ON" } else { "Audio CLACK OFF" }
    }
}
