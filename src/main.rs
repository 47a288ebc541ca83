// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing::{debug, Level};

use fretwise::api::{self, RequestDefaults};
use fretwise::config::AppConfig;
use fretwise::fretboard::{fretboard_notes, TuningPreset, TUNING_PRESETS};
use fretwise::generators::{generate_arpeggio, ArpeggioResult};
use fretwise::music::chord::{
    chord_progression, diatonic_triads, progression_numerals, ChordSymbol, PROGRESSION_TEMPLATES,
};
use fretwise::music::note::{spell, Note, SpellingPolicy};
use fretwise::music::scale::{scale_info, scales_in_category, Scale, ScaleCategory, ScaleType};

#[derive(Parser)]
#[command(name = "fretwise", about = "Chord and scale arpeggios on the guitar fretboard")]
#[command(version)]
struct Cli {
    /// YAML or TOML file with request defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an arpeggio and print its tab
    Generate {
        /// Key tonic (e.g. G, Bb, F#)
        #[arg(long)]
        key: String,

        /// Chord symbol (e.g. Gmaj7, Am7b5)
        #[arg(long)]
        chord: String,

        /// ascending, descending, updown or sweep
        #[arg(long)]
        pattern: Option<String>,

        /// open, low, mid, high or multi
        #[arg(long)]
        position: Option<String>,

        /// Number of notes (1-128)
        #[arg(long)]
        length: Option<u32>,

        /// Tempo in BPM (30-300)
        #[arg(long)]
        tempo: Option<f64>,

        /// Notes per beat (1-8)
        #[arg(long)]
        subdivision: Option<u32>,

        /// Arpeggiate a scale on the key instead of the chord
        #[arg(long)]
        scale: Option<String>,

        /// Tuning preset id (see `tunings`)
        #[arg(long)]
        tuning: Option<String>,

        /// auto, sharps or flats
        #[arg(long)]
        spelling: Option<String>,

        /// Print the full JSON result
        #[arg(long)]
        json: bool,
    },

    /// Show the notes of a scale
    Scale {
        /// Root note
        #[arg(required_unless_present = "list")]
        root: Option<String>,

        /// Scale name (e.g. dorian, "minor pentatonic")
        #[arg(required_unless_present = "list")]
        name: Option<String>,

        /// Also list the triad on each degree
        #[arg(long)]
        triads: bool,

        /// Chords for a progression: a template id (pop, jazz, ...) or numerals like I-bVII-IV
        #[arg(long)]
        progression: Option<String>,

        /// List the available scales and progressions
        #[arg(long)]
        list: bool,
    },

    /// Show the intervals and tones of a chord symbol
    Chord {
        /// Chord symbol (e.g. Cmaj9, F#m7b5)
        symbol: String,

        /// Root to use when the symbol has none
        #[arg(long, default_value = "C")]
        key: String,
    },

    /// Print the scale tones across the neck
    Fretboard {
        /// Root note
        root: String,

        /// Scale name
        scale: String,

        /// Tuning preset id
        #[arg(long)]
        tuning: Option<String>,

        /// Highest fret shown
        #[arg(long, default_value_t = 12)]
        frets: u8,
    },

    /// List the tuning presets
    Tunings,

    /// Answer a JSON generate request read from a file or stdin
    Request {
        /// JSON file; stdin when omitted
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    let defaults = config.request_defaults()?;

    match cli.command {
        Command::Generate {
            key,
            chord,
            pattern,
            position,
            length,
            tempo,
            subdivision,
            scale,
            tuning,
            spelling,
            json,
        } => {
            let mut request = Map::new();
            request.insert("key".into(), json!(key));
            request.insert("chord".into(), json!(chord));
            let optional = [
                ("pattern", pattern.map(Value::from)),
                ("position", position.map(Value::from)),
                ("length", length.map(Value::from)),
                ("tempo", tempo.map(Value::from)),
                ("subdivision", subdivision.map(Value::from)),
                ("scale", scale.map(Value::from)),
                ("tuning", tuning.map(Value::from)),
                ("spelling", spelling.map(Value::from)),
            ];
            for (name, value) in optional {
                if let Some(value) = value {
                    request.insert(name.into(), value);
                }
            }

            let input = api::parse_request_value(&Value::Object(request), &defaults)?;
            let result = generate_arpeggio(&input);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_arpeggio(&result);
            }
        }
        Command::Scale {
            root,
            name,
            triads,
            progression,
            list,
        } => {
            if list {
                print_scale_list();
            } else if let (Some(root), Some(name)) = (root, name) {
                print_scale(&root, &name, triads, progression.as_deref(), config.spelling)?;
            }
        }
        Command::Chord { symbol, key } => {
            print_chord(&symbol, &key, config.spelling)?;
        }
        Command::Fretboard {
            root,
            scale,
            tuning,
            frets,
        } => {
            let preset_id = tuning.unwrap_or_else(|| config.tuning.clone());
            print_fretboard(&root, &scale, &preset_id, frets, config.spelling)?;
        }
        Command::Tunings => {
            for preset in TUNING_PRESETS.iter() {
                println!(
                    "{:<12} {:<20} {}",
                    preset.id,
                    preset.name,
                    preset.notes.join(" ")
                );
            }
        }
        Command::Request { file } => {
            let body = match file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read request file: {:?}", path))?,
                None => {
                    let mut body = String::new();
                    io::stdin()
                        .read_to_string(&mut body)
                        .context("Failed to read request from stdin")?;
                    body
                }
            };

            let response = api::handle_generate_with(&body, &defaults);
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            if !response.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<AppConfig> {
    debug!(path = %path.display(), "loading config");
    let config = fretwise::config::validate_config(path)?;
    Ok(config)
}

fn parse_note(input: &str) -> Result<Note> {
    match Note::parse(input) {
        Some(note) => Ok(note),
        None => bail!("Invalid note name: {}", input),
    }
}

fn parse_scale(input: &str) -> Result<ScaleType> {
    match ScaleType::from_str(input) {
        Some(scale) => Ok(scale),
        None => bail!("Unknown scale: {} (try `fretwise scale --list`)", input),
    }
}

fn print_arpeggio(result: &ArpeggioResult) {
    let meta = &result.meta;
    println!(
        "{} over {}: {} in {} position, {} BPM, {} per beat",
        meta.chord, meta.key, meta.pattern, meta.position, meta.tempo, meta.subdivision
    );
    println!();
    println!("{}", result.ascii);
    println!();
    println!("  time    note  string  fret  finger");
    for event in &result.events {
        println!(
            "{:>6.3}  {:>5}  {:>6}  {:>4}  {:>6}",
            event.time, event.note, event.string, event.fret, event.finger
        );
    }
    if result.dropped > 0 {
        println!();
        println!("{} note(s) had no playable fret and were skipped", result.dropped);
    }
}

fn print_scale_list() {
    for category in [ScaleCategory::Modes, ScaleCategory::Pentatonic, ScaleCategory::Other] {
        println!("{}:", category);
        for def in scales_in_category(category) {
            println!("  {:<18} {:<28} {}", def.id, def.name, def.pattern);
        }
    }
    println!("Progressions:");
    for template in PROGRESSION_TEMPLATES {
        println!("  {:<18} {:<28} {}", template.id, template.name, template.numerals.join("-"));
    }
}

fn print_scale(
    root: &str,
    name: &str,
    triads: bool,
    progression: Option<&str>,
    spelling: SpellingPolicy,
) -> Result<()> {
    let tonic = parse_note(root)?;
    let scale_type = parse_scale(name)?;
    let info = scale_info(&tonic, name, spelling)
        .with_context(|| format!("Unknown scale: {}", name))?;

    println!("{}", info.name);
    println!("Notes:   {}", info.notes.join(" "));
    println!("Pattern: {}", info.pattern);

    if triads {
        let scale = Scale::new(tonic.pitch_class(), scale_type);
        println!();
        for chord in diatonic_triads(&scale, spelling, Some(&tonic)) {
            println!("{:>2}  {:<6} {:<6} {}", chord.degree, chord.roman, chord.symbol, chord.quality);
        }
    }

    if let Some(progression) = progression {
        let numerals = progression_numerals(progression);
        let scale = Scale::new(tonic.pitch_class(), scale_type);
        let chords = chord_progression(&scale, &numerals, spelling, Some(&tonic));
        if chords.len() < numerals.len() {
            debug!(
                progression,
                skipped = numerals.len() - chords.len(),
                "unrecognized numerals skipped"
            );
        }
        if chords.is_empty() {
            bail!("No chords in progression: {}", progression);
        }

        println!();
        let romans: Vec<&str> = chords.iter().map(|c| c.roman.as_str()).collect();
        let symbols: Vec<&str> = chords.iter().map(|c| c.symbol.as_str()).collect();
        println!("Progression: {}", romans.join(" - "));
        println!("Chords:      {}", symbols.join(" - "));
    }
    Ok(())
}

fn print_chord(symbol: &str, key: &str, spelling: SpellingPolicy) -> Result<()> {
    let fallback = parse_note(key)?;
    let chord = ChordSymbol::parse(symbol);
    let root = chord.root().copied().unwrap_or(fallback);
    let tones: Vec<&str> = chord
        .pitch_classes(root.pitch_class())
        .into_iter()
        .map(|pc| spell(pc, spelling, Some(&root)))
        .collect();
    let intervals: Vec<String> = chord.intervals().iter().map(u8::to_string).collect();

    println!("{} ({})", symbol, chord.quality());
    println!("Intervals: {}", intervals.join(" "));
    println!("Tones:     {}", tones.join(" "));
    Ok(())
}

fn print_fretboard(root: &str, scale: &str, preset_id: &str, frets: u8, spelling: SpellingPolicy) -> Result<()> {
    let tonic = parse_note(root)?;
    let scale_type = parse_scale(scale)?;
    let preset = TuningPreset::find(preset_id)
        .with_context(|| format!("Unknown tuning preset: {}", preset_id))?;
    let tuning = preset.tuning();
    let scale = Scale::new(tonic.pitch_class(), scale_type);
    let rows = fretboard_notes(&tuning, &scale, frets, spelling, Some(&tonic));

    let header: Vec<String> = (0..=frets).map(|f| format!("{:^4}", f)).collect();
    println!("{} {} on {}", tonic, scale_type, preset.name);
    println!("     {}", header.join(""));

    // Highest string on top, like tab
    for (row, label) in rows.iter().rev().zip(tuning.labels()) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| {
                if cell.is_root {
                    format!("[{:^2}]", cell.note)
                } else if cell.is_in_scale {
                    format!(" {:<2} ", cell.note)
                } else {
                    " -- ".to_string()
                }
            })
            .collect();
        println!("{:<3}| {}", label, cells.join(""));
    }
    Ok(())
}
