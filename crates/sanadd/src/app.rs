//! Page runtime - one handler loop over one event channel.
//!
//! Every collaborator (stdin surfaces, safety timers, the position watch,
//! the navigation listener, deferred simulated responses) is a task that
//! sends [`AppEvent`]s. The loop owns all state and handles one event at a
//! time, so nothing here needs a lock.

use crate::input::{ListenTarget, PageEvent, ProfileSection};
use crate::platform::{AlertOutputs, Capabilities, OutputSink, SimulatedPosition};
use crate::speech::{self, Recognition};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sanad_common::assistance::{self, DisplayPreferences};
use sanad_common::config::Config;
use sanad_common::navigation::{self, Page};
use sanad_common::profiles::{ProfileStore, ProfileUpdate, UserProfile};
use sanad_common::safety::{Feature, SafetyMonitor, ToggleOutcome, WatchToken};
use sanad_common::{
    Assistant, DeviceCommandRouter, DeviceRegistry, GestureResolver, Platform, Position,
    PositionSource, SanadError, WatchOptions,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum AppEvent {
    /// Parsed input surface line
    Input(PageEvent),
    /// Input line that failed to parse
    Rejected(SanadError),
    /// Transcript from the continuous navigation listener
    Navigate(String),
    /// Safety timer fired
    Tick(WatchToken),
    /// Location watch report
    Position {
        token: WatchToken,
        result: Result<Position, SanadError>,
    },
    /// Delayed message from a simulated service
    Deferred(&'static str),
    Shutdown,
}

pub struct App {
    config: Config,
    caps: Capabilities,
    assistant: Assistant,
    gestures: GestureResolver,
    router: DeviceCommandRouter,
    registry: DeviceRegistry,
    safety: SafetyMonitor,
    alerts: AlertOutputs,
    positions: SimulatedPosition,
    profiles: ProfileStore,
    display: DisplayPreferences,
    page: Page,
    rng: StdRng,
    sink: Box<dyn OutputSink>,
    events: mpsc::UnboundedSender<AppEvent>,
    watches: HashMap<Feature, JoinHandle<()>>,
    listener: Option<(mpsc::UnboundedSender<Recognition>, JoinHandle<()>)>,
    log_seen: u64,
}

impl App {
    /// Build the page and its event channel. Must run inside a tokio
    /// runtime: the navigation listener is spawned here.
    pub fn new(config: Config, sink: Box<dyn OutputSink>) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let caps = Capabilities::detect(&config.platform);

        let rng = match config.safety.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let listener = if caps.speech_recognition {
            let (utter_tx, utter_rx) = mpsc::unbounded_channel();
            let handle = speech::spawn_continuous(utter_rx, events.clone());
            Some((utter_tx, handle))
        } else {
            None
        };

        let app = Self {
            safety: SafetyMonitor::new(config.safety_settings()),
            alerts: AlertOutputs::new(caps.audio),
            positions: SimulatedPosition::from_config(&config),
            config,
            caps,
            assistant: Assistant::new(),
            gestures: GestureResolver::new(),
            router: DeviceCommandRouter::new(),
            registry: DeviceRegistry::new(),
            profiles: ProfileStore::new(),
            display: DisplayPreferences::default(),
            page: Page::Home,
            rng,
            sink,
            events,
            watches: HashMap::new(),
            listener,
            log_seen: 0,
        };
        (app, rx)
    }

    /// Sender for collaborators outside the app (stdin reader, signals)
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.events.clone()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn safety(&self) -> &SafetyMonitor {
        &self.safety
    }

    pub fn alerts(&self) -> &AlertOutputs {
        &self.alerts
    }

    pub fn display(&self) -> DisplayPreferences {
        self.display
    }

    /// Timers and subscriptions currently scheduled
    pub fn scheduled_watches(&self) -> usize {
        self.watches.len()
    }

    /// Drain the channel until shutdown
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<AppEvent>) {
        info!("Sanad page ready at {}", self.page);
        while let Some(event) = events.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        self.shutdown();
    }

    /// Handle one event. Returns false when the page should close.
    pub fn handle(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Input(PageEvent::Quit) | AppEvent::Shutdown => return false,
            AppEvent::Input(input) => {
                if let Err(e) = self.on_input(input) {
                    self.reject(e);
                }
            }
            AppEvent::Rejected(e) => self.reject(e),
            AppEvent::Navigate(transcript) => self.navigate(&transcript),
            AppEvent::Tick(token) => {
                self.safety.tick(token, &mut self.rng, &mut self.alerts);
            }
            AppEvent::Position { token, result } => match result {
                Ok(position) => {
                    self.safety.on_position(token, position);
                }
                Err(e) => {
                    self.safety.on_position_error(token, &e.to_string());
                }
            },
            AppEvent::Deferred(message) => self.sink.show(message),
        }
        self.flush_log();
        true
    }

    /// Cancel every timer and stop listening
    pub fn shutdown(&mut self) {
        for (feature, handle) in self.watches.drain() {
            debug!("Aborting {} watch", feature);
            handle.abort();
        }
        if let Some((utterances, handle)) = self.listener.take() {
            drop(utterances);
            handle.abort();
        }
        info!("Sanad page closed");
    }

    fn on_input(&mut self, input: PageEvent) -> Result<(), SanadError> {
        match input {
            PageEvent::Say(text) => self.hear(&text)?,
            PageEvent::Listen { target, text } => self.listen(target, &text)?,
            PageEvent::Gesture(text) => self.show_gesture(&text),
            PageEvent::Device(command) => {
                let message = self.router.process(&mut self.registry, &command);
                self.sink.show(&message);
            }
            PageEvent::Register { id, kind } => {
                self.registry.register(&id, kind)?;
                self.show_devices();
            }
            PageEvent::Unregister(index) => {
                self.registry.remove(index)?;
                self.show_devices();
            }
            PageEvent::Safety(on) => {
                for feature in self.safety.set_enabled(on) {
                    self.cancel_watch(feature);
                }
            }
            PageEvent::Watch { feature, on } => self.toggle_watch(feature, on),
            PageEvent::AddContact { name, phone } => {
                self.safety.add_contact(&name, &phone)?;
            }
            PageEvent::RemoveContact(index) => {
                self.safety.remove_contact(index)?;
            }
            PageEvent::Ask { text, glyph } => {
                let reply = self.assistant.interact(&text, glyph.as_deref());
                self.sink.show(&reply.text);
            }
            PageEvent::Read(text) => {
                let request = assistance::read_text(
                    &text,
                    &self.config.speech.language,
                    self.caps.speech_synthesis,
                )?;
                self.sink.speak(&request);
            }
            PageEvent::Sign(text) => {
                let message = assistance::text_to_sign(&text)?;
                self.sink.show(&message);
            }
            PageEvent::Translate => self.simulate(
                assistance::SIGN_TRANSLATION_PENDING,
                assistance::SIGN_TRANSLATION_DONE,
            ),
            PageEvent::Describe => self.simulate(
                assistance::ENVIRONMENT_PENDING,
                assistance::ENVIRONMENT_DONE,
            ),
            PageEvent::Emergency => {
                warn!("Emergency call requested");
                self.sink.show(assistance::EMERGENCY_CALL);
            }
            PageEvent::ShareLocation => {
                let result = self.positions.current_position(&self.config.watch_options());
                if let Err(e) = &result {
                    warn!("Location sharing failed: {}", e);
                }
                self.sink.show(&assistance::share_location_message(&result));
            }
            PageEvent::Contrast(on) => {
                self.display.high_contrast = on;
                self.show_display();
            }
            PageEvent::LargeText(on) => {
                self.display.large_text = on;
                self.show_display();
            }
            PageEvent::Help(context) => {
                let context = context.unwrap_or_else(|| page_context(self.page).to_string());
                self.sink.show(assistance::help_for(&context));
            }
            PageEvent::Back => self.go_to(Page::Home),
            PageEvent::ProfileCreate(user_id) => {
                let line = profile_line(&user_id, self.profiles.create(&user_id));
                self.sink.show(&line);
            }
            PageEvent::ProfileSet {
                user_id,
                section,
                key,
                value,
            } => {
                let mut update = ProfileUpdate::default();
                let target = match section {
                    ProfileSection::Preferences => &mut update.preferences,
                    ProfileSection::Needs => &mut update.accessibility_needs,
                    ProfileSection::Progress => &mut update.learning_progress,
                };
                target.insert(key, value);
                let line = profile_line(&user_id, self.profiles.update(&user_id, update)?);
                self.sink.show(&line);
            }
            PageEvent::Status => self.show_status(),
            PageEvent::Quit => {}
        }
        Ok(())
    }

    fn reject(&mut self, error: SanadError) {
        warn!("{} (code {})", error, error.code());
        self.sink.show(&error.user_message());
    }

    /// Print alert log entries recorded since the last flush
    fn flush_log(&mut self) {
        let log = self.safety.log();
        for entry in log.since(self.log_seen) {
            self.sink.show(&entry.to_string());
        }
        self.log_seen = log.recorded();
    }

    fn hear(&mut self, utterance: &str) -> Result<(), SanadError> {
        let (utterances, _) = self
            .listener
            .as_ref()
            .ok_or(SanadError::PlatformUnavailable(Platform::SpeechRecognition))?;
        if utterances.send(Recognition::from_utterance(utterance)).is_err() {
            warn!("Navigation listener is gone");
        }
        Ok(())
    }

    fn navigate(&mut self, transcript: &str) {
        match navigation::route_navigation(transcript) {
            Some(page) => self.go_to(page),
            None => debug!("No navigation phrase in {:?}", transcript),
        }
    }

    fn go_to(&mut self, page: Page) {
        info!("Navigating to {}", page);
        self.page = page;
        self.sink.show(&format!("الانتقال إلى {}", page.path()));
    }

    fn listen(&mut self, target: ListenTarget, utterance: &str) -> Result<(), SanadError> {
        if !self.caps.speech_recognition {
            if target == ListenTarget::VoiceControl {
                self.sink.show(assistance::VOICE_CONTROL_UNAVAILABLE);
                return Ok(());
            }
            return Err(SanadError::PlatformUnavailable(Platform::SpeechRecognition));
        }

        match target {
            ListenTarget::Gesture => self.sink.show(assistance::LISTENING_PROMPT),
            ListenTarget::Device => self.sink.show(assistance::DEVICE_LISTENING_PROMPT),
            ListenTarget::VoiceControl => {}
        }

        let command = match speech::single_shot(Recognition::from_utterance(utterance)) {
            Ok(command) => command,
            Err(e) => {
                warn!("Recognition failed: {}", e);
                self.sink.show(assistance::RECOGNITION_ERROR);
                return Ok(());
            }
        };

        match target {
            ListenTarget::VoiceControl => self.sink.show(&assistance::voice_control_echo(&command)),
            ListenTarget::Gesture => self.show_gesture(&command),
            ListenTarget::Device => {
                let message = self.router.process(&mut self.registry, &command);
                self.sink.show(&message);
            }
        }
        Ok(())
    }

    fn show_gesture(&mut self, command: &str) {
        let response = self.gestures.translate(command);
        debug!("Gesture {} for {:?}", response.label, command);
        self.sink.show(&response.message);
        for directive in &response.directives {
            self.sink.show(&format!("  {}", directive));
        }
    }

    fn toggle_watch(&mut self, feature: Feature, on: bool) {
        match self.safety.toggle(feature, on) {
            ToggleOutcome::Started(token) => {
                let handle = self.spawn_watch(token);
                if let Some(previous) = self.watches.insert(feature, handle) {
                    previous.abort();
                }
            }
            ToggleOutcome::Stopped(feature) => self.cancel_watch(feature),
            ToggleOutcome::Unchanged => debug!("{} watch already {}", feature, on),
            ToggleOutcome::Ignored => debug!("Safety disabled, {} toggle ignored", feature),
            ToggleOutcome::Unavailable => {}
        }
    }

    fn spawn_watch(&self, token: WatchToken) -> JoinHandle<()> {
        let events = self.events.clone();
        let safety = &self.config.safety;
        match token.feature {
            Feature::Obstacle => spawn_ticker(events, token, millis(safety.obstacle_period_ms)),
            Feature::Fall => spawn_ticker(events, token, millis(safety.fall_period_ms)),
            Feature::Location => spawn_position_watch(
                events,
                token,
                self.positions,
                self.config.watch_options(),
                millis(self.config.geolocation.poll_interval_ms),
            ),
        }
    }

    fn cancel_watch(&mut self, feature: Feature) {
        if let Some(handle) = self.watches.remove(&feature) {
            debug!("Cancelling {} watch", feature);
            handle.abort();
        }
    }

    /// Show `pending` now and `done` after the simulated delay
    fn simulate(&mut self, pending: &'static str, done: &'static str) {
        self.sink.show(pending);
        let events = self.events.clone();
        let delay = millis(self.config.simulation.response_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(AppEvent::Deferred(done));
        });
    }

    fn show_devices(&mut self) {
        if self.registry.is_empty() {
            self.sink.show("لا توجد أجهزة مسجلة");
            return;
        }
        let lines: Vec<String> = self
            .registry
            .devices()
            .iter()
            .enumerate()
            .map(|(i, d)| format!("{}. {} ({})", i + 1, d.id, d.kind))
            .collect();
        for line in lines {
            self.sink.show(&line);
        }
    }

    fn show_display(&mut self) {
        let classes = self.display.classes();
        if classes.is_empty() {
            self.sink.show("display: default");
        } else {
            self.sink.show(&format!("display: {}", classes.join(" ")));
        }
    }

    fn show_status(&mut self) {
        let status = self.safety.status();
        let active: Vec<String> = status.active.iter().map(|f| f.to_string()).collect();
        let states = self.registry.states();

        let mut lines = vec![
            format!("page: {}", self.page),
            format!(
                "safety: {} [{}] contacts={} log={}",
                on_off(status.enabled),
                active.join(", "),
                status.contacts,
                status.log_entries
            ),
            format!("devices: {}", self.registry.len()),
        ];
        for (i, device) in self.registry.devices().iter().enumerate() {
            lines.push(format!("  {}. {} ({})", i + 1, device.id, device.kind));
        }
        lines.push(format!(
            "tv: power={} volume={} channel={}",
            on_off(states.tv.power),
            states.tv.volume,
            states.tv.channel
        ));
        lines.push(format!(
            "ac: power={} temperature={} mode={}",
            on_off(states.ac.power),
            states.ac.temperature,
            states.ac.mode
        ));
        lines.push(format!(
            "washing-machine: power={} running={} program={}",
            on_off(states.washing_machine.power),
            states.washing_machine.running,
            states.washing_machine.program
        ));
        for line in lines {
            self.sink.show(&line);
        }
        self.show_display();
    }
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn page_context(page: Page) -> &'static str {
    match page {
        Page::Hearing => "hearing",
        Page::Visual => "visual",
        Page::Motor => "motor",
        Page::Home => "",
    }
}

fn profile_line(user_id: &str, profile: &UserProfile) -> String {
    match serde_json::to_string(profile) {
        Ok(json) => format!("{}: {}", user_id, json),
        Err(e) => {
            warn!("Failed to serialize profile {}: {}", user_id, e);
            user_id.to_string()
        }
    }
}

/// Periodic Bernoulli trial timer. First tick after one full period.
fn spawn_ticker(
    events: mpsc::UnboundedSender<AppEvent>,
    token: WatchToken,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        loop {
            interval.tick().await;
            if events.send(AppEvent::Tick(token)).is_err() {
                break;
            }
        }
    })
}

/// Position subscription. Reports immediately, then every `period`.
fn spawn_position_watch<P: PositionSource + 'static>(
    events: mpsc::UnboundedSender<AppEvent>,
    token: WatchToken,
    mut source: P,
    options: WatchOptions,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let result = source.current_position(&options);
            if events.send(AppEvent::Position { token, result }).is_err() {
                break;
            }
        }
    })
}
