//! Global hotkey listening via rdev.
//!
//! The listener runs on its own thread; press/release events for the two
//! configured hotkeys are forwarded over a channel, so the main loop is the
//! only place controller state is touched.

use crossbeam_channel::Sender;
use murm_core::{ConfigError, RecordingMode, Settings};
use rdev::{Event, EventType, Key, listen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    Pressed(RecordingMode),
    Released(RecordingMode),
}

/// The two configured hotkeys, resolved to concrete keys at startup.
#[derive(Debug, Clone, Copy)]
pub struct HotkeyMap {
    dictation: Key,
    edit: Key,
}

impl HotkeyMap {
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            dictation: parse_key(&settings.dictation_hotkey)?,
            edit: parse_key(&settings.edit_hotkey)?,
        })
    }

    fn mode_for(&self, key: Key) -> Option<RecordingMode> {
        if key == self.dictation {
            Some(RecordingMode::Dictation)
        } else if key == self.edit {
            Some(RecordingMode::Edit)
        } else {
            None
        }
    }
}

/// Spawn the rdev listener thread. Events for unrelated keys are dropped at
/// the source; a failed grab is fatal since the whole program is
/// hotkey-driven.
pub fn spawn_listener(map: HotkeyMap, tx: Sender<HotkeyEvent>) {
    std::thread::spawn(move || {
        let result = listen(move |event: Event| {
            let hotkey_event = match event.event_type {
                EventType::KeyPress(key) => map.mode_for(key).map(HotkeyEvent::Pressed),
                EventType::KeyRelease(key) => map.mode_for(key).map(HotkeyEvent::Released),
                _ => None,
            };
            if let Some(hotkey_event) = hotkey_event {
                let _ = tx.send(hotkey_event);
            }
        });
        if let Err(e) = result {
            eprintln!("Failed to listen for global hotkeys: {e:?}");
            std::process::exit(1);
        }
    });
}

/// Map a configured key name to an rdev key. rdev only exposes F1 through
/// F12, so higher function keys are rejected rather than silently ignored.
pub fn parse_key(name: &str) -> Result<Key, ConfigError> {
    let key = match name.to_lowercase().as_str() {
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        "leftctrl" | "ctrlleft" => Key::ControlLeft,
        "rightctrl" | "ctrlright" => Key::ControlRight,
        "leftalt" | "altleft" | "alt" => Key::Alt,
        "rightalt" | "altright" | "altgr" => Key::AltGr,
        "leftshift" | "shiftleft" => Key::ShiftLeft,
        "rightshift" | "shiftright" => Key::ShiftRight,
        "leftmeta" | "metaleft" => Key::MetaLeft,
        "rightmeta" | "metaright" => Key::MetaRight,
        "capslock" => Key::CapsLock,
        "scrolllock" => Key::ScrollLock,
        "pause" => Key::Pause,
        "insert" => Key::Insert,
        "home" => Key::Home,
        "end" => Key::End,
        other => return Err(ConfigError::UnknownHotkey(other.to_string())),
    };
    Ok(key)
}
