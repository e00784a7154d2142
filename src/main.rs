// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn, Level};

use modal_composer::config::{ConfigEvent, ConfigWatcher};
use modal_composer::music::scale::DEGREES;
use modal_composer::music::chord::numeral;
use modal_composer::{ui, Composition, CompositionFile, Mode};

fn print_usage() {
    println!("MODAL - Modal Chord Progression Composer");
    println!();
    println!("Usage: modal [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --generate <FILE> [OUT]  Write the composition in FILE as a MIDI file");
    println!("  --analyze <FILE>         Print the modal analysis of FILE");
    println!("  --view <FILE>            Show FILE as an interactive piano roll");
    println!("  --watch <FILE> [OUT]     Regenerate the MIDI file whenever FILE is saved");
    println!("  --modes                  List modes with their diatonic chords");
    println!("  --template [MODE]        Print a starter composition (default: ionian)");
    println!("  --verbose                Enable debug logging");
    println!("  --help                   Show this help message");
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_composition(path: &Path) -> Result<Composition> {
    let file = CompositionFile::load(path)?;
    file.to_composition()
        .with_context(|| format!("Invalid composition in {:?}", path))
}

fn write_midi(path: &Path, out: Option<&Path>) -> Result<PathBuf> {
    let composition = load_composition(path)?;
    let generated = composition.generate();
    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&generated.file_name));

    fs::write(&out, &generated.midi)
        .with_context(|| format!("Failed to write MIDI file: {:?}", out))?;
    info!(
        path = ?out,
        notes = generated.sequence.len(),
        beats = generated.sequence.total_beats,
        "wrote MIDI file"
    );
    Ok(out)
}

fn analyze(path: &Path) -> Result<()> {
    let composition = load_composition(path)?;
    let generated = composition.generate();

    println!("Key: {}  Mode: {}", composition.key, composition.mode);
    println!();
    print!("{}", composition.analysis());
    println!();
    println!(
        "{} notes over {} beats",
        generated.sequence.len(),
        generated.sequence.total_beats
    );
    if let Some((low, high)) = generated.sequence.pitch_range() {
        println!(
            "Range: {} - {}",
            modal_composer::music::note_name(low),
            modal_composer::music::note_name(high)
        );
    }
    Ok(())
}

fn watch(path: &Path, out: Option<&Path>) -> Result<()> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Cannot watch {:?}", path))?;
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("{:?} has no parent directory", path))?;

    if let Err(e) = write_midi(&path, out) {
        warn!("{:#}", e);
    }

    let watcher = ConfigWatcher::new(dir, None)?;
    info!(path = ?path, "watching for changes (Ctrl+C to stop)");

    while let Some(event) = watcher.recv() {
        match event {
            ConfigEvent::Reloaded(changed, _) if changed.file_name() == path.file_name() => {
                if let Err(e) = write_midi(&path, out) {
                    warn!("{:#}", e);
                }
            }
            ConfigEvent::Error(message) => warn!("{}", message),
            _ => {}
        }
    }
    Ok(())
}

fn print_modes() {
    for mode in Mode::ALL {
        let chords: Vec<String> = (0..DEGREES)
            .map(|d| format!("{}:{}", numeral(d), mode.quality_at(d)))
            .collect();
        println!("{:<11} {}", mode.name(), chords.join(" "));
        println!("{:<11} typical: {}", "", mode.characteristic_progression());
    }
}

fn print_template(mode: Option<&str>) -> Result<()> {
    let mode: Mode = match mode {
        Some(name) => name.parse()?,
        None => Mode::Ionian,
    };
    print!("{}", CompositionFile::template(mode).to_yaml()?);
    Ok(())
}

fn require_file(args: &[String], option: &str) -> Result<PathBuf> {
    args.get(2)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{} requires a composition file", option))
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    args.retain(|a| a != "--verbose" && a != "-v");
    init_logging(verbose);

    if args.len() < 2 {
        println!("MODAL - Modal Chord Progression Composer");
        println!("Run with --help for usage information");
        return Ok(());
    }

    let out = args.get(3).map(PathBuf::from);

    match args[1].as_str() {
        "--generate" => {
            let file = require_file(&args, "--generate")?;
            let written = write_midi(&file, out.as_deref())?;
            println!("{}", written.display());
        }
        "--analyze" => {
            let file = require_file(&args, "--analyze")?;
            analyze(&file)?;
        }
        "--view" => {
            let file = require_file(&args, "--view")?;
            let composition = load_composition(&file)?;
            ui::run_viewer(&composition)?;
        }
        "--watch" => {
            let file = require_file(&args, "--watch")?;
            watch(&file, out.as_deref())?;
        }
        "--modes" => {
            print_modes();
        }
        "--template" => {
            print_template(args.get(2).map(String::as_str))?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
