mod controller;
mod hotkey;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::unbounded;
use murm_core::{
    ClipboardBridge, Recorder, ResponseService, Settings, TranscriptionService, select_backend,
};

use controller::DictationController;
use hotkey::{HotkeyEvent, HotkeyMap, spawn_listener};

/// Push-to-talk dictation: hold a hotkey, speak, release, and the
/// transcript (optionally rewritten by an LLM) is pasted into whatever has
/// focus.
#[derive(Parser)]
#[command(name = "murm", version, about)]
struct Cli {
    /// Path to the settings file (default: ~/.config/murm/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print debug detail
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    murm_core::set_verbose(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    let backend = match select_backend(&settings) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    println!("{} client initialized.", backend.name());

    let hotkeys = match HotkeyMap::from_settings(&settings) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let injector = ClipboardBridge::new()?;
    let transcriber = TranscriptionService::new(backend.clone(), settings.clean_transcription);
    let responder = ResponseService::new(backend);
    let mut controller = DictationController::new(
        Recorder::new(),
        Box::new(injector),
        transcriber,
        responder,
        settings.auto_submit,
    );

    let (tx, rx) = unbounded();
    spawn_listener(hotkeys, tx);

    println!(
        "Press and hold {} for dictation, {} for LLM-assisted editing.",
        settings.dictation_hotkey, settings.edit_hotkey
    );

    for event in rx {
        match event {
            HotkeyEvent::Pressed(mode) => controller.on_key_down(mode),
            HotkeyEvent::Released(mode) => controller.on_key_up(mode),
        }
    }

    Ok(())
}
