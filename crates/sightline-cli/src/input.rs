//! Interactive control surface: feature toggles, target rate entry, exit.
//!
//! Runs on its own thread and only touches the shared atomic settings, so
//! the frame loop never waits on the keyboard.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sightline_core::{Feature, OverlaySettings};
use tracing::{debug, info, warn};

use crate::menu::MenuScreen;
use crate::shutdown::ShutdownSignal;

/// Longest accepted rate entry.
const FPS_ENTRY_MAX_DIGITS: usize = 3;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Consecutive poll failures before the monitor gives up (no console).
const MAX_POLL_ERRORS: u32 = 10;

/// Outcome of a single key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    Ignored,
    Toggled(Feature, bool),
    FpsEntryStarted,
    FpsEntryEdited,
    FpsApplied(u32),
    FpsRejected(String),
    FpsEntryCancelled,
    Exit,
}

/// Key state machine for the control menu.
#[derive(Debug, Default)]
pub struct ControlInput {
    fps_entry: Option<String>,
}

impl ControlInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digits typed so far while a rate entry is open.
    pub fn fps_entry(&self) -> Option<&str> {
        self.fps_entry.as_deref()
    }

    pub fn handle(&mut self, key: &KeyEvent, settings: &OverlaySettings) -> ControlAction {
        if key.kind != KeyEventKind::Press {
            return ControlAction::Ignored;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return ControlAction::Exit;
        }

        if let Some(entry) = self.fps_entry.as_mut() {
            return match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    if entry.len() < FPS_ENTRY_MAX_DIGITS {
                        entry.push(c);
                        ControlAction::FpsEntryEdited
                    } else {
                        ControlAction::Ignored
                    }
                }
                KeyCode::Backspace => {
                    entry.pop();
                    ControlAction::FpsEntryEdited
                }
                KeyCode::Enter => {
                    let entry = self.fps_entry.take().unwrap_or_default();
                    match entry.parse::<u32>() {
                        Ok(fps) if settings.set_target_fps(fps) => ControlAction::FpsApplied(fps),
                        _ => ControlAction::FpsRejected(entry),
                    }
                }
                KeyCode::Esc => {
                    self.fps_entry = None;
                    ControlAction::FpsEntryCancelled
                }
                _ => ControlAction::Ignored,
            };
        }

        match key.code {
            KeyCode::Char('8') => {
                self.fps_entry = Some(String::new());
                ControlAction::FpsEntryStarted
            }
            KeyCode::Char('9') | KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                ControlAction::Exit
            }
            KeyCode::Char(c) => match Feature::from_menu_key(c) {
                Some(feature) => ControlAction::Toggled(feature, settings.toggle(feature)),
                None => ControlAction::Ignored,
            },
            _ => ControlAction::Ignored,
        }
    }
}

/// Counts consecutive poll failures, e.g. when no console is attached.
#[derive(Debug, Default)]
struct PollErrors {
    consecutive: u32,
}

impl PollErrors {
    /// Record a failure; returns `true` once the monitor should give up.
    fn record(&mut self) -> bool {
        self.consecutive += 1;
        self.consecutive >= MAX_POLL_ERRORS
    }

    fn reset(&mut self) {
        self.consecutive = 0;
    }
}

/// Wait for the control monitor to finish. Returns `false` if it panicked.
pub fn join_control_monitor(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            warn!("Control monitor thread panicked");
            false
        }
    }
}

/// Spawn the thread that reads control keys and redraws the menu.
pub fn spawn_control_monitor(
    settings: Arc<OverlaySettings>,
    shutdown: Arc<ShutdownSignal>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Control monitor started");

        let mut screen = match MenuScreen::open() {
            Ok(screen) => Some(screen),
            Err(e) => {
                warn!("Menu unavailable, keys still active: {}", e);
                None
            }
        };
        let mut input = ControlInput::new();
        let mut status = String::new();
        let mut poll_errors = PollErrors::default();

        while !shutdown.is_shutdown() {
            if let Some(screen) = screen.as_mut()
                && let Err(e) = screen.draw(&settings.snapshot(), input.fps_entry(), &status)
            {
                debug!("Menu redraw failed: {}", e);
            }

            let ready = match event::poll(POLL_INTERVAL) {
                Ok(ready) => {
                    poll_errors.reset();
                    ready
                }
                Err(e) => {
                    if poll_errors.record() {
                        warn!("Control input unavailable, stopping monitor: {}", e);
                        break;
                    }
                    shutdown.wait(POLL_INTERVAL);
                    continue;
                }
            };
            if !ready {
                continue;
            }
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };

            match input.handle(&key, &settings) {
                ControlAction::Ignored => {}
                ControlAction::Toggled(feature, enabled) => {
                    info!("{} {}", feature, if enabled { "enabled" } else { "disabled" });
                    status.clear();
                }
                ControlAction::FpsEntryStarted | ControlAction::FpsEntryEdited => {}
                ControlAction::FpsApplied(fps) => {
                    info!("Target FPS set to {}", fps);
                    status = format!("Target FPS set to {}", fps);
                }
                ControlAction::FpsRejected(entry) => {
                    let range = settings.fps_range();
                    status = format!(
                        "Rejected FPS '{}' (allowed {}-{})",
                        entry,
                        range.start(),
                        range.end()
                    );
                }
                ControlAction::FpsEntryCancelled => status.clear(),
                ControlAction::Exit => {
                    debug!("Exit key pressed: {:?}", key.code);
                    shutdown.trigger();
                }
            }
        }

        drop(screen);
        debug!("Control monitor stopped");
    })
}
