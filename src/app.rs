use crate::board::{Board, SystemClock};
use crate::config::Config;
use crate::event::{AppEvent, Event, EventHandler, Schedule};
use crate::feed::{FeedClient, PollDecision, Poller};
use crate::sound::{AmbientPlayer, AudioSession, RodioOutput};
use crate::{log_debug, log_info, log_warn};
use ratatui::{
    DefaultTerminal,
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use color_eyre::Result;
use std::sync::Arc;

/// Application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Board session: cards, busy guard, display state, error banner.
    pub board: Board,
    /// Clack audio.
    pub audio: AudioSession,
    /// Optional ambient loop.
    pub ambient: AmbientPlayer,
    /// Feed poller.
    pub poller: Poller,
    /// Event handler.
    pub events: EventHandler,
    /// Set once the first key press has been seen.
    interacted: bool,
}

impl App {
    /// Constructs a new instance of [`App`].
    pub fn new(config: &Config) -> Result<Self> {
        let events = EventHandler::new(Schedule {
            refresh: config.refresh_interval(),
            idle_flap: config.idle_flap_interval(),
            audio_probe: config.audio_probe_interval(),
        });

        let client = FeedClient::new(&config.feed_url, config.request_timeout())?;
        let poller = Poller::new(client, events.sender());
        let board = Board::new(config.roll_timing(), Arc::new(SystemClock));

        let mut audio = AudioSession::new(Box::new(RodioOutput::new()), config.clack_on);
        audio.try_init(false);

        let mut ambient = AmbientPlayer::new(config.ambient_path.clone(), config.ambient_volume);
        if ambient.is_configured() {
            if let Err(e) = ambient.play() {
                log_warn!("ambient track not started: {}", e);
            }
        }

        log_info!("flapboard polling {} every {:?}", config.feed_url, config.refresh_interval());

        Ok(Self::with_parts(board, audio, ambient, poller, events))
    }

    /// Assemble an app from already built parts.
    pub fn with_parts(
        board: Board,
        audio: AudioSession,
        ambient: AmbientPlayer,
        poller: Poller,
        events: EventHandler,
    ) -> Self {
        Self {
            running: true,
            board,
            audio,
            ambient,
            poller,
            events,
            interacted: false,
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut needs_redraw = true;

        while self.running {
            if needs_redraw {
                terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
                // save power
                needs_redraw = false;
            }

            match self.events.next().await? {
                Event::Tick => {
                    needs_redraw = self.tick();
                }
                Event::Crossterm(event) => match event {
                    crossterm::event::Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        self.handle_key_events(key_event)?;
                        needs_redraw = true;
                    }
                    crossterm::event::Event::FocusGained => {
                        self.audio.try_init(true);
                        needs_redraw = true;
                    }
                    crossterm::event::Event::Resize(_, _) => needs_redraw = true,
                    _ => {}
                },
                Event::App(app_event) => {
                    self.handle_app_event(app_event);
                    needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    /// Advance the animation one frame. Returns true when the screen changed.
    pub fn tick(&mut self) -> bool {
        let report = self.board.advance_frame();
        if report.should_clack() {
            self.audio.clack();
        }
        report.changed || report.released
    }

    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::PollDue | AppEvent::RefreshNow => self.poll(),
            AppEvent::IdleFlapDue => {
                if self.board.idle_flap() {
                    log_debug!("idle flap started");
                }
            }
            AppEvent::AudioProbeDue => self.audio.try_init(true),
            AppEvent::FeedLoaded(outcome) => {
                self.poller.finish();
                self.board.apply_poll_result(outcome);
            }
            AppEvent::ToggleClack => {
                let on = self.audio.toggle();
                log_info!("clack audio {}", if on { "on" } else { "off" });
            }
            AppEvent::ToggleAmbient => {
                if let Err(e) = self.ambient.toggle() {
                    log_warn!("ambient toggle failed: {}", e);
                }
            }
            AppEvent::DismissError => self.board.dismiss_error(),
            AppEvent::Quit => self.quit(),
        }
    }

    fn poll(&mut self) {
        if let PollDecision::Skipped(reason) = self.poller.poll(self.board.is_busy()) {
            log_debug!("poll tick dropped: {:?}", reason);
        }
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) -> Result<()> {
        self.on_user_interaction();

        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') => self.events.send(AppEvent::Quit),
            KeyCode::Char('c' | 'C') if key_event.modifiers == KeyModifiers::CONTROL => {
                self.events.send(AppEvent::Quit)
            }
            KeyCode::Char('m') => self.events.send(AppEvent::ToggleClack),
            KeyCode::Char('a') => self.events.send(AppEvent::ToggleAmbient),
            KeyCode::Char('r') => self.events.send(AppEvent::RefreshNow),
            KeyCode::Char('d') => self.events.send(AppEvent::DismissError),
            _ => {}
        }
        Ok(())
    }

    /// Any key press may unlock audio; the first one also starts a configured ambient track.
    fn on_user_interaction(&mut self) {
        self.audio.on_user_interaction();
        if !self.interacted {
            self.interacted = true;
            if self.ambient.is_configured() && !self.ambient.is_playing() {
                if let Err(e) = self.ambient.play() {
                    log_warn!("ambient track not started: {}", e);
                }
            }
        }
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
        self.ambient.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ManualClock, RollTiming};
    use crate::error::Result as FlapResult;
    use crate::feed::FeedItem;
    use crate::sound::ClackOutput;
    use rodio::buffer::SamplesBuffer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default, Clone)]
    struct CountingOutput {
        played: Arc<AtomicUsize>,
    }

    impl ClackOutput for CountingOutput {
        fn open(&mut self) -> FlapResult<()> {
            Ok(())
        }

        fn is_open(&self) -> bool {
            true
        }

        fn play(&mut self, _clack: SamplesBuffer<f32>) -> FlapResult<()> {
            self.played.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn app() -> (App, Arc<ManualClock>, CountingOutput) {
        let clock = Arc::new(ManualClock::new());
        let board = Board::new(RollTiming::default(), clock.clone());

        let output = CountingOutput::default();
        let mut audio = AudioSession::new(Box::new(output.clone()), true);
        audio.try_init(false);

        let events = EventHandler::detached();
        let client = FeedClient::new("http://127.0.0.1:9/prices.json", Duration::from_millis(200)).unwrap();
        let poller = Poller::new(client, events.sender());

        let app = App::with_parts(board, audio, AmbientPlayer::new(None, 0.0), poller, events);
        (app, clock, output)
    }

    fn items() -> Vec<FeedItem> {
        vec![
            FeedItem::new("ACME", 1234.5, 2.3),
            FeedItem::new("GLOBEX", 98.75, -1.0),
            FeedItem::new("INITECH", 7.0, 0.0),
        ]
    }

    #[tokio::test]
    async fn test_tick_plays_one_clack_per_frame() {
        let (mut app, clock, output) = app();
        app.handle_app_event(AppEvent::FeedLoaded(Ok(items())));

        // Several tiles start rolling on the first frame.
        clock.advance_ms(16);
        assert!(app.tick());
        assert_eq!(output.played.load(Ordering::SeqCst), 1);

        let mut frames = 1;
        while app.board.is_busy() {
            let before = output.played.load(Ordering::SeqCst);
            clock.advance_ms(16);
            app.tick();
            assert!(output.played.load(Ordering::SeqCst) - before <= 1);
            frames += 1;
            assert!(frames < 500, "board never went idle");
        }
        assert!(output.played.load(Ordering::SeqCst) <= frames);
    }

    #[tokio::test]
    async fn test_muted_tick_is_silent() {
        let (mut app, clock, output) = app();
        app.handle_app_event(AppEvent::ToggleClack);
        app.handle_app_event(AppEvent::FeedLoaded(Ok(items())));

        for _ in 0..20 {
            clock.advance_ms(16);
            app.tick();
        }
        assert_eq!(output.played.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_feed_loaded_clears_in_flight_and_renders() {
        let (mut app, _clock, _output) = app();
        assert_eq!(app.poller.poll(false), PollDecision::Started);
        assert!(app.poller.is_in_flight());

        app.handle_app_event(AppEvent::FeedLoaded(Ok(items())));
        assert!(!app.poller.is_in_flight());
        assert_eq!(app.board.cards().len(), 3);
        assert!(app.board.is_busy());
    }

    #[tokio::test]
    async fn test_poll_due_while_busy_keeps_poller_idle() {
        let (mut app, _clock, _output) = app();
        app.handle_app_event(AppEvent::FeedLoaded(Ok(items())));

        app.handle_app_event(AppEvent::PollDue);
        assert!(!app.poller.is_in_flight());
    }

    #[tokio::test]
    async fn test_feed_error_sets_banner_and_dismiss_clears_it() {
        let (mut app, _clock, _output) = app();
        app.handle_app_event(AppEvent::FeedLoaded(Err("HTTP 500".into())));
        assert_eq!(app.board.error_banner(), Some("ERRORE DATI: HTTP 500"));

        app.handle_app_event(AppEvent::DismissError);
        assert_eq!(app.board.error_banner(), None);
    }

    #[tokio::test]
    async fn test_quit_key_queues_quit() {
        let (mut app, _clock, _output) = app();
        app.handle_key_events(KeyEvent::from(KeyCode::Char('q'))).unwrap();

        match app.events.try_next() {
            Some(Event::App(event)) => app.handle_app_event(event),
            other => panic!("expected a queued app event, got {:?}", other),
        }
        assert!(!app.running);
    }
}
