use std::io::{self, Stdout, Write};

use crossterm::style::{Print, Stylize};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use sightline_core::{Feature, SettingsSnapshot};
use strum::IntoEnumIterator;

/// One menu row per toggle, followed by the rate entry and exit rows.
pub fn menu_lines(
    settings: &SettingsSnapshot,
    fps_entry: Option<&str>,
    status: &str,
) -> Vec<(String, Option<bool>)> {
    let mut lines = vec![("Sightline controls".to_string(), None)];

    for feature in Feature::iter() {
        let enabled = settings.is_enabled(feature);
        let state = if enabled { "ON" } else { "OFF" };
        lines.push((
            format!("[{}] {:<12} [{}]", feature.menu_key(), feature.to_string(), state),
            Some(enabled),
        ));
    }

    let fps_line = match fps_entry {
        Some(entry) => format!("[8] Target FPS: {}_ (Enter to apply, Esc to cancel)", entry),
        None => format!("[8] Target FPS: {}", settings.target_fps),
    };
    lines.push((fps_line, None));
    lines.push(("[9] Exit".to_string(), None));

    if !status.is_empty() {
        lines.push((String::new(), None));
        lines.push((status.to_string(), None));
    }
    lines
}

/// Terminal menu drawn on the alternate screen.
///
/// Raw mode and the alternate screen are restored on drop.
pub struct MenuScreen {
    stdout: Stdout,
}

impl MenuScreen {
    pub fn open() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { stdout })
    }

    pub fn draw(
        &mut self,
        settings: &SettingsSnapshot,
        fps_entry: Option<&str>,
        status: &str,
    ) -> io::Result<()> {
        queue!(self.stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for (text, enabled) in menu_lines(settings, fps_entry, status) {
            match enabled {
                Some(true) => queue!(self.stdout, Print(text.green()))?,
                Some(false) => queue!(self.stdout, Print(text.dark_grey()))?,
                None => queue!(self.stdout, Print(text.bold()))?,
            }
            queue!(self.stdout, cursor::MoveToNextLine(1))?;
        }
        self.stdout.flush()
    }
}

impl Drop for MenuScreen {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
