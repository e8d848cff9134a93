use rodio::buffer::SamplesBuffer;
use rodio::OutputStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::{FlapboardError, Result};
use crate::log_warn;

const OPEN_TIMEOUT: Duration = Duration::from_millis(750);

/// Where clacks are played. Every clack is mixed into one shared bus.
pub trait ClackOutput: Send {
    fn open(&mut self) -> Result<()>;
    fn is_open(&self) -> bool;
    fn play(&mut self, clack: SamplesBuffer<f32>) -> Result<()>;
}

/// Default output device through rodio.
///
/// The stream lives on its own thread; clacks are handed over on a channel
/// and mixed by the stream.
#[derive(Debug, Default)]
pub struct RodioOutput {
    sender: Option<mpsc::Sender<SamplesBuffer<f32>>>,
    alive: Arc<AtomicBool>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClackOutput for RodioOutput {
    fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }

        let (sender, receiver) = mpsc::channel::<SamplesBuffer<f32>>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<std::result::Result<(), String>>(1);
        let alive = Arc::new(AtomicBool::new(false));
        let thread_alive = Arc::clone(&alive);

        thread::spawn(move || {
            // Create OutputStream inside the thread to avoid Send issues on macOS
            let (_stream, handle) = match OutputStream::try_default() {
                Ok(v) => v,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };

            thread_alive.store(true, Ordering::SeqCst);
            let _ = ready_tx.send(Ok(()));

            while let Ok(clack) = receiver.recv() {
                if let Err(e) = handle.play_raw(clack) {
                    log_warn!("clack playback failed: {}", e);
                    break;
                }
            }

            thread_alive.store(false, Ordering::SeqCst);
        });

        match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(())) => {
                self.sender = Some(sender);
                self.alive = alive;
                Ok(())
            }
            Ok(Err(e)) => Err(FlapboardError::AudioError(e)),
            Err(_) => Err("audio device did not answer".into()),
        }
    }

    fn is_open(&self) -> bool {
        self.sender.is_some() && self.alive.load(Ordering::SeqCst)
    }

    fn play(&mut self, clack: SamplesBuffer<f32>) -> Result<()> {
        let Some(sender) = &self.sender else {
            return Err("audio output not open".into());
        };
        if sender.send(clack).is_err() {
            self.sender = None;
            return Err("audio output thread stopped".into());
        }
        Ok(())
    }
}
