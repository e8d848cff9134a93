use color_eyre::eyre::OptionExt;
use futures::{FutureExt, StreamExt};
use ratatui::crossterm::event::Event as CrosstermEvent;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::feed::FeedItem;

/// The frequency at which frame ticks are emitted.
pub const TICK_FPS: f64 = 60.0;

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// Animation frame.
    Tick,
    /// Crossterm events.
    Crossterm(CrosstermEvent),
    /// Application events.
    App(AppEvent),
}

/// Application events.
#[derive(Debug, Clone)]
pub enum AppEvent {
    // Timers
    PollDue,
    IdleFlapDue,
    AudioProbeDue,

    // Feed
    FeedLoaded(Result<Vec<FeedItem>, String>),

    // Controls
    ToggleClack,
    ToggleAmbient,
    DismissError,
    RefreshNow,

    // System
    Quit,
}

/// Intervals for the periodic app events.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub refresh: Duration,
    pub idle_flap: Duration,
    pub audio_probe: Duration,
}

/// Terminal event handler.
#[derive(Debug)]
pub struct EventHandler {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
    /// Event receiver channel.
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Constructs a new instance of [`EventHandler`] and spawns the event task.
    pub fn new(schedule: Schedule) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = EventTask::new(sender.clone(), schedule);
        tokio::spawn(async { actor.run().await });
        Self { sender, receiver }
    }

    /// Channel only: no input reader and no timers. The owner sends every event.
    pub fn detached() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Next queued event, if one is waiting.
    pub fn try_next(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    /// Receives an event from the sender.
    pub async fn next(&mut self) -> color_eyre::Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_eyre("Failed to receive event")
    }

    /// Queue an app event to be sent to the event receiver.
    pub fn send(&mut self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(app_event));
    }

    /// Sender for background tasks that report back into the loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

/// A task that reads crossterm events and emits frame and timer events.
struct EventTask {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
    schedule: Schedule,
}

impl EventTask {
    /// Constructs a new instance of [`EventTask`].
    fn new(sender: mpsc::UnboundedSender<Event>, schedule: Schedule) -> Self {
        Self { sender, schedule }
    }

    /// Runs the event loop. Every interval fires once immediately.
    async fn run(self) -> color_eyre::Result<()> {
        let tick_rate = Duration::from_secs_f64(1.0 / TICK_FPS);

        let mut reader = crossterm::event::EventStream::new();
        let mut tick = tokio::time::interval(tick_rate);
        let mut poll = tokio::time::interval(self.schedule.refresh);
        let mut flap = tokio::time::interval(self.schedule.idle_flap);
        let mut probe = tokio::time::interval(self.schedule.audio_probe);
        for interval in [&mut tick, &mut poll, &mut flap, &mut probe] {
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        }

        loop {
            let crossterm_event = reader.next().fuse();
            tokio::select! {
              _ = self.sender.closed() => {
                break;
              }
              _ = tick.tick() => {
                self.send(Event::Tick);
              }
              _ = poll.tick() => {
                self.send(Event::App(AppEvent::PollDue));
              }
              _ = flap.tick() => {
                self.send(Event::App(AppEvent::IdleFlapDue));
              }
              _ = probe.tick() => {
                self.send(Event::App(AppEvent::AudioProbeDue));
              }
              Some(Ok(evt)) = crossterm_event => {
                self.send(Event::Crossterm(evt));
              }
            };
        }
        Ok(())
    }

    /// Sends an event to the receiver.
    fn send(&self, event: Event) {
        let _ = self.sender.send(event);
    }
}
