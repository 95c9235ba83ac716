//! The mode state machine.

use std::{mem, str::FromStr};

use qs_config::{Mode, ModeSet, Settings, UnknownVariant};
use serde::Serialize;
use tracing::debug;

use crate::{ParsedInput, input::trigger_for};

/// Options for opening the switcher in a mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOpts {
    /// Input text to start with instead of the mode's trigger.
    pub open_mode_string: Option<String>,
    /// Build symbol and related listings for the active editor.
    pub use_active_editor_as_source: bool,
}

/// Outcome of feeding parsed input to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Transition {
    /// The active modes did not change.
    Unchanged,
    /// The active modes changed.
    Changed {
        /// Modes before.
        from: ModeSet,
        /// Modes after.
        to: ModeSet,
    },
}

impl Transition {
    /// Returns true for [`Transition::Changed`].
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Tracks the active mode set of a session.
#[derive(Debug, Clone)]
pub struct ModeController {
    /// Modes contributing to the results.
    modes: ModeSet,
    /// Mode whose results are shown.
    mode: Mode,
    /// Session-wide request to use the active editor as the source.
    use_active_editor: bool,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeController {
    /// Creates a controller in standard mode.
    pub fn new() -> Self {
        Self {
            modes: ModeSet::single(Mode::Standard),
            mode: Mode::Standard,
            use_active_editor: false,
        }
    }

    /// Mode whose results are shown.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Modes contributing to the results.
    pub fn modes(&self) -> &ModeSet {
        &self.modes
    }

    /// Returns true if listings should be built for the active editor.
    pub fn use_active_editor(&self) -> bool {
        self.use_active_editor
    }

    /// Starts a session in `mode` and returns the input text to prefill.
    ///
    /// The mode itself is entered when the returned text is parsed.
    pub fn open(&mut self, mode: Mode, opts: &SessionOpts, settings: &Settings) -> String {
        self.use_active_editor = opts.use_active_editor_as_source;
        opts.open_mode_string
            .clone()
            .unwrap_or_else(|| trigger_for(mode, opts.use_active_editor_as_source, settings))
    }

    /// Applies parsed input.
    pub fn apply(&mut self, parsed: &ParsedInput) -> Transition {
        if parsed.modes == self.modes && parsed.mode == self.mode {
            return Transition::Unchanged;
        }
        let from = mem::replace(&mut self.modes, parsed.modes.clone());
        self.mode = parsed.mode;
        debug!(from = ?from, to = ?self.modes, "mode transition");
        Transition::Changed {
            from,
            to: self.modes.clone(),
        }
    }

    /// Returns true if the current listing should use the active editor as its source.
    pub fn wants_active_editor(&self, parsed: &ParsedInput) -> bool {
        parsed.prefix.is_none() && (parsed.use_active_editor || self.use_active_editor)
    }
}

/// Parses a mode from a command or ribbon name.
pub fn parse_mode(name: &str) -> Result<Mode, UnknownVariant> {
    Mode::from_str(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_input;

    #[test]
    fn transitions_are_reported_once() {
        let settings = Settings::default();
        let mut c = ModeController::new();
        assert_eq!(c.apply(&parse_input("foo", &settings)), Transition::Unchanged);

        let t = c.apply(&parse_input("#foo", &settings));
        assert_eq!(
            t,
            Transition::Changed {
                from: ModeSet::single(Mode::Standard),
                to: ModeSet::single(Mode::HeadingsList),
            }
        );
        assert!(!c.apply(&parse_input("#foob", &settings)).is_changed());
        assert_eq!(c.mode(), Mode::HeadingsList);
    }

    #[test]
    fn combined_modes() {
        let settings = Settings::default();
        let mut c = ModeController::new();
        assert!(c.apply(&parse_input("plan@", &settings)).is_changed());
        assert_eq!(c.mode(), Mode::SymbolList);
        assert_eq!(c.modes().len(), 2);
    }

    #[test]
    fn open_prefills_trigger() {
        let settings = Settings::default();
        let mut c = ModeController::new();
        let text = c.open(Mode::CommandList, &SessionOpts::default(), &settings);
        assert_eq!(text, ">");

        let opts = SessionOpts {
            use_active_editor_as_source: true,
            ..SessionOpts::default()
        };
        assert_eq!(c.open(Mode::SymbolList, &opts, &settings), "$ ");
        assert!(c.use_active_editor());

        let opts = SessionOpts {
            open_mode_string: Some("@intro".to_string()),
            ..SessionOpts::default()
        };
        assert_eq!(c.open(Mode::SymbolList, &opts, &settings), "@intro");
    }

    #[test]
    fn mode_names_parse() {
        assert_eq!(parse_mode("HeadingsList"), Ok(Mode::HeadingsList));
        assert_eq!(parse_mode("symbol-list"), Ok(Mode::SymbolList));
        assert!(parse_mode("nope").is_err());
    }
}
