//! Clipboard swap primitives and synthetic keystrokes.
//!
//! There is no portable API for reading the current selection, so highlight
//! capture works by swap-and-compare: snapshot the clipboard, send a
//! synthetic copy, wait a short settle interval for the OS clipboard to
//! propagate, and read it again. An unchanged clipboard means no selection.
//! The settle delay is a heuristic, not a guarantee; a copy that lands late
//! is indistinguishable from "no selection", and callers must treat the
//! result as best-effort.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings as EnigoSettings};

/// How long to wait after a synthetic copy before re-reading the clipboard.
pub const CLIPBOARD_SETTLE: Duration = Duration::from_millis(100);

/// Seam between the controller and the OS clipboard/keystroke machinery.
/// `ClipboardBridge` is the real implementation; tests substitute a fake.
pub trait TextInjector: Send {
    /// Best-effort read of the currently highlighted text. Empty string
    /// means either "no selection" or a copy that did not settle in time.
    /// On a hit, the clipboard is left holding the copied text.
    fn capture_highlight(&mut self) -> Result<String>;

    /// Remove the current selection from the focused application.
    fn delete_selection(&mut self) -> Result<()>;

    /// Put `text` on the clipboard and issue a paste keystroke.
    fn paste(&mut self, text: &str) -> Result<()>;

    /// Press enter, for auto-submit after a paste.
    fn press_enter(&mut self) -> Result<()>;
}

pub struct ClipboardBridge {
    clipboard: Clipboard,
    enigo: Enigo,
}

impl ClipboardBridge {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("failed to access clipboard")?;
        let enigo = Enigo::new(&EnigoSettings::default())
            .map_err(|e| anyhow!("failed to initialize keystroke injection: {e}"))?;
        Ok(Self { clipboard, enigo })
    }

    fn command_key() -> Key {
        if cfg!(target_os = "macos") {
            Key::Meta
        } else {
            Key::Control
        }
    }

    fn key(&mut self, key: Key, direction: Direction) -> Result<()> {
        self.enigo
            .key(key, direction)
            .map_err(|e| anyhow!("keystroke injection failed: {e}"))
    }

    /// Send Cmd/Ctrl + `c` depending on platform.
    fn send_shortcut(&mut self, c: char) -> Result<()> {
        let modifier = Self::command_key();
        self.key(modifier, Direction::Press)?;
        self.key(Key::Unicode(c), Direction::Click)?;
        self.key(modifier, Direction::Release)?;
        Ok(())
    }
}

impl TextInjector for ClipboardBridge {
    fn capture_highlight(&mut self) -> Result<String> {
        let before = self.clipboard.get_text().unwrap_or_default();
        self.send_shortcut('c')?;
        thread::sleep(CLIPBOARD_SETTLE);
        let after = self.clipboard.get_text().unwrap_or_default();
        Ok(detect_highlight(&before, &after))
    }

    fn delete_selection(&mut self) -> Result<()> {
        self.key(Key::Backspace, Direction::Click)
    }

    fn paste(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text)
            .context("failed to write text to clipboard")?;
        self.send_shortcut('v')
    }

    fn press_enter(&mut self) -> Result<()> {
        self.key(Key::Return, Direction::Click)
    }
}

/// An unchanged clipboard after the copy keystroke means there was no active
/// selection. A changed clipboard is the freshly copied selection, returned
/// trimmed.
fn detect_highlight(before: &str, after: &str) -> String {
    if after == before {
        String::new()
    } else {
        after.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_clipboard_means_no_selection() {
        assert_eq!(detect_highlight("old contents", "old contents"), "");
        assert_eq!(detect_highlight("", ""), "");
    }

    #[test]
    fn changed_clipboard_is_returned_trimmed() {
        assert_eq!(
            detect_highlight("old contents", "  def f(): pass\n"),
            "def f(): pass"
        );
        assert_eq!(detect_highlight("", "selected"), "selected");
    }

    #[test]
    fn detection_is_idempotent_without_a_new_selection() {
        // After a hit, the clipboard holds the copied text; a repeat capture
        // with no intervening selection change sees before == after.
        let first = detect_highlight("old", "selected");
        assert_eq!(first, "selected");
        assert_eq!(detect_highlight("selected", "selected"), "");
    }
}
