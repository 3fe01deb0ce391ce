use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::GlobalFlags;

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    /// ANSI colour for informational lines on stderr.
    pub color: bool,
    /// Spinners while waiting on Gate.
    pub progress: bool,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let is_tty = std::io::stderr().is_terminal();
    let color = is_tty && !flags.no_color && std::env::var_os("NO_COLOR").is_none();
    let progress = is_tty && !flags.quiet;

    let _ = UI_PREFS.set(UiPrefs { color, progress });
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        color: false,
        progress: false,
    })
}
