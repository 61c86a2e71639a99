use std::fmt;

use rollsync_engine::Speed;

/// Actions raised by menus, shortcuts and the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlayback,
    Stop,
    SetSpeed(Speed),
    SetContinuousScroll(bool),
    CenterCursor,
    ToggleFullscreen,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::TogglePlayback => write!(f, "TogglePlayback"),
            Command::Stop => write!(f, "Stop"),
            Command::SetSpeed(speed) => write!(f, "SetSpeed({})", speed.get()),
            Command::SetContinuousScroll(value) => write!(f, "SetContinuousScroll({value})"),
            Command::CenterCursor => write!(f, "CenterCursor"),
            Command::ToggleFullscreen => write!(f, "ToggleFullscreen"),
        }
    }
}

impl Command {
    /// Keyboard shortcut shown next to the menu entry.
    pub fn shortcut(&self) -> Option<&'static str> {
        match self {
            Command::TogglePlayback => Some("Space"),
            Command::Stop => Some("Esc"),
            Command::SetContinuousScroll(_) => Some("\\"),
            Command::CenterCursor => Some("Home"),
            Command::ToggleFullscreen => Some("F11"),
            Command::SetSpeed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_carry_arguments() {
        let speed = Speed::new(7).unwrap();
        assert_eq!(Command::SetSpeed(speed).to_string(), "SetSpeed(7)");
        assert_eq!(
            Command::SetContinuousScroll(false).to_string(),
            "SetContinuousScroll(false)"
        );
        assert_eq!(Command::SetSpeed(speed).shortcut(), None);
        assert_eq!(Command::Stop.shortcut(), Some("Esc"));
    }

    #[test]
    fn continuous_scroll_is_bound_to_backslash() {
        assert_eq!(Command::SetContinuousScroll(true).shortcut(), Some("\\"));
        assert_eq!(Command::SetContinuousScroll(false).shortcut(), Some("\\"));
        assert_eq!(Command::CenterCursor.shortcut(), Some("Home"));
    }
}
