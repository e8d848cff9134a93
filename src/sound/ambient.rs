use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::error::{FlapboardError, Result};
use crate::log_debug;

const OPEN_TIMEOUT: Duration = Duration::from_millis(750);

/// Sink of the current playback thread. A thread only installs its sink
/// while `generation` still matches the one it was started with.
#[derive(Default)]
struct SinkSlot {
    generation: u64,
    sink: Option<Arc<Sink>>,
}

/// Looped background track, independent of the clack output.
pub struct AmbientPlayer {
    path: Option<PathBuf>,
    volume: f32,
    active_sink: Arc<Mutex<SinkSlot>>,
    playing: bool,
}

impl std::fmt::Debug for AmbientPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientPlayer")
            .field("path", &self.path)
            .field("volume", &self.volume)
            .field("playing", &self.playing)
            .finish_non_exhaustive()
    }
}

impl AmbientPlayer {
    pub fn new(path: Option<PathBuf>, volume: f32) -> Self {
        Self {
            path,
            volume: volume.clamp(0.0, 1.0),
            active_sink: Arc::new(Mutex::new(SinkSlot::default())),
            playing: false,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.path.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start the loop. Only reports success once the track decoded and the
    /// output accepted it.
    pub fn play(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Err("no ambient track configured".into());
        };

        // Kill prior play
        self.stop();

        let source = open_track(&path)?;
        let generation = self.current_generation();
        let volume = self.volume;
        let slot = Arc::clone(&self.active_sink);
        let (ready_tx, ready_rx) = mpsc::sync_channel::<std::result::Result<(), String>>(1);

        thread::spawn(move || {
            // Create OutputStream inside the thread to avoid Send issues on macOS
            let (_stream, handle) = match OutputStream::try_default() {
                Ok(v) => v,
                Err(e) => {
                    let _ = ready_tx.send(Err(format!("no ambient output: {}", e)));
                    return;
                }
            };

            let sink = match Sink::try_new(&handle) {
                Ok(s) => Arc::new(s),
                Err(e) => {
                    let _ = ready_tx.send(Err(format!("ambient sink failed: {}", e)));
                    return;
                }
            };
            sink.set_volume(volume);
            sink.append(source.repeat_infinite());

            match slot.lock() {
                Ok(mut slot) if slot.generation == generation => {
                    slot.sink = Some(Arc::clone(&sink));
                }
                _ => {
                    log_debug!("ambient start abandoned");
                    return;
                }
            }
            let _ = ready_tx.send(Ok(()));

            sink.sleep_until_end();
        });

        match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(())) => {
                self.playing = true;
                Ok(())
            }
            Ok(Err(e)) => Err(FlapboardError::AudioError(e)),
            Err(_) => {
                // A late thread sees the bumped generation and gives up.
                self.stop();
                Err("ambient output did not answer".into())
            }
        }
    }

    pub fn stop(&mut self) {
        if let Ok(mut slot) = self.active_sink.lock() {
            slot.generation += 1;
            if let Some(sink) = slot.sink.take() {
                sink.stop();
            }
        }
        self.playing = false;
    }

    pub fn toggle(&mut self) -> Result<bool> {
        if self.playing {
            self.stop();
        } else {
            self.play()?;
        }
        Ok(self.playing)
    }

    pub fn label(&self) -> &'static str {
        match (self.is_configured(), self.playing) {
            (false, _) => "Ambient n/d",
            (true, true) => "Ambient ON",
            (true, false) => "Ambient OFF",
        }
    }

    fn current_generation(&self) -> u64 {
        self.active_sink.lock().map(|slot| slot.generation).unwrap_or_default()
    }
}

fn open_track(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)
        .map_err(|e| FlapboardError::AudioError(format!("ambient track {}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| FlapboardError::AudioError(format!("Failed to decode {}: {}", path.display(), e)))
}
