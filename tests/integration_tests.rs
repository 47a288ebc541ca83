// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for fretwise
//!
//! These tests drive the public API end to end: request in, events and
//! tab out.

use std::collections::{BTreeSet, HashSet};

use fretwise::fretboard::{HandPosition, OpenStringTuning, PositionWindow, FALLBACK_EXPANSION};
use fretwise::generators::{generate_arpeggio, ArpPattern, ArpeggioInput, ArpeggioResult};
use fretwise::music::note::name_to_midi;
use fretwise::music::scale::{ScaleType, SCALES};
use fretwise::music::{normalize, parse_chord_intervals, scale_notes, Note};
use fretwise::{handle_generate, render_tab};

fn generate(key: &str, chord: &str, pattern: ArpPattern, position: HandPosition, length: usize) -> ArpeggioResult {
    let input = ArpeggioInput::new(Note::parse(key).unwrap(), chord)
        .with_pattern(pattern)
        .with_position(position)
        .with_length(length);
    generate_arpeggio(&input)
}

fn pitch_class_of(note: &str) -> u8 {
    name_to_midi(note).unwrap() % 12
}

/// The reference case: G / Gmaj7, ascending, low position, 8 notes
#[test]
fn test_gmaj7_low_end_to_end() {
    let result = generate("G", "Gmaj7", ArpPattern::Ascending, HandPosition::Low, 8);

    assert_eq!(result.events.len(), 8);
    assert_eq!(result.dropped, 0);

    let expected = [7, 11, 2, 6];
    for (i, event) in result.events.iter().enumerate() {
        assert_eq!(pitch_class_of(&event.note), expected[i % 4]);
        assert!((1..=5).contains(&event.fret), "fret {} outside low window", event.fret);
    }

    for pair in result.events.windows(2) {
        assert!(pair[0].time < pair[1].time);
    }

    let lines: Vec<&str> = result.ascii.lines().collect();
    assert_eq!(lines.len(), 6);
    let labels: Vec<&str> = lines.iter().map(|l| &l[..1]).collect();
    assert_eq!(labels, vec!["e", "B", "G", "D", "A", "E"]);

    // One event per (string, column)
    let sps = 60.0 / 120.0 / 2.0;
    let cells: HashSet<(u8, i64)> = result
        .events
        .iter()
        .map(|e| (e.string, (e.time / sps).round() as i64))
        .collect();
    assert_eq!(cells.len(), result.events.len());
}

#[test]
fn test_chord_interval_sets() {
    assert_eq!(parse_chord_intervals("Gmaj7"), vec![0, 4, 7, 11]);
    assert_eq!(parse_chord_intervals("Am7b5"), vec![0, 3, 6, 10]);
    assert_eq!(parse_chord_intervals("Cdim7"), vec![0, 3, 6, 9]);

    for symbol in ["C", "Cm", "C7", "Cmaj9", "C13", "Caug", "Bø", "xyz", ""] {
        let intervals = parse_chord_intervals(symbol);
        assert_eq!(intervals.first(), Some(&0), "{}", symbol);
        assert!(intervals.windows(2).all(|w| w[0] < w[1]), "{}", symbol);
        assert!(intervals.iter().all(|&i| i < 12), "{}", symbol);
    }
}

#[test]
fn test_note_normalization() {
    for input in ["C", "c", "B#", "Dbb"] {
        if let Some(pc) = normalize(input) {
            assert_eq!(normalize(pc.name()), Some(pc));
        }
    }
    assert_eq!(normalize("Db"), normalize("C#"));
    assert_eq!(normalize("Cb").map(|pc| pc.value()), Some(11));
    assert_eq!(normalize("H"), None);
}

#[test]
fn test_scale_table_well_formed() {
    for def in SCALES.iter() {
        assert_eq!(def.intervals[0], 0, "{}", def.id);
        assert!(def.intervals.windows(2).all(|w| w[0] < w[1]), "{}", def.id);
        assert!(def.intervals.iter().all(|&i| i < 12), "{}", def.id);
    }

    let g = normalize("G").unwrap();
    assert_eq!(scale_notes(g, "major").len(), 7);
    assert_eq!(scale_notes(g, "minor-pentatonic").len(), 5);
    assert!(scale_notes(g, "no-such-scale").is_empty());
}

/// Every emitted event sounds the pitch class of the step it came from
#[test]
fn test_events_match_sequence_across_patterns() {
    let tuning = OpenStringTuning::standard();

    for pattern in ArpPattern::ALL {
        for position in HandPosition::ALL {
            for chord in ["Gmaj7", "Am7b5", "Cdim7", "E", "F#m9"] {
                let input = ArpeggioInput::new(Note::parse("C").unwrap(), chord)
                    .with_pattern(pattern)
                    .with_position(position)
                    .with_length(24);
                let result = generate_arpeggio(&input);
                let tones: BTreeSet<u8> = input.source_tones().iter().map(|pc| pc.value()).collect();

                assert_eq!(result.events.len() + result.dropped, 24);
                for event in &result.events {
                    let midi = name_to_midi(&event.note).unwrap();
                    assert!(tones.contains(&(midi % 12)), "{} {} {}", chord, pattern, position);

                    let index = tuning.string_count() - event.string as usize;
                    assert_eq!(tuning.midi_at(index, event.fret), midi);
                }
            }
        }
    }
}

#[test]
fn test_frets_stay_near_window() {
    for position in HandPosition::ALL {
        let window = position.window();
        let relaxed = PositionWindow::new(
            window.min.saturating_sub(FALLBACK_EXPANSION),
            window.max + FALLBACK_EXPANSION,
        );
        for pattern in ArpPattern::ALL {
            let result = generate("D", "Dm7", pattern, position, 32);
            for event in &result.events {
                assert!(relaxed.contains(event.fret), "{} {}: fret {}", position, pattern, event.fret);
            }
        }
    }
}

#[test]
fn test_timing_evenly_spaced() {
    for (tempo, subdivision) in [(60.0, 1), (120.0, 2), (97.5, 3), (300.0, 8)] {
        let input = ArpeggioInput::new(Note::parse("A").unwrap(), "Am")
            .with_length(12)
            .with_timing(tempo, subdivision);
        let result = generate_arpeggio(&input);
        let sps = 60.0 / tempo / subdivision as f64;

        for (i, event) in result.events.iter().enumerate() {
            assert!((event.time - i as f64 * sps).abs() < 1e-9);
            assert!((event.duration - 0.9 * sps).abs() < 1e-9);
        }
        for pair in result.events.windows(2) {
            assert!(pair[0].end() < pair[1].time);
        }
    }
}

#[test]
fn test_updown_never_repeats_adjacent_pitch_classes() {
    let result = generate("E", "E7", ArpPattern::UpDown, HandPosition::Mid, 20);
    let classes: Vec<u8> = result.events.iter().map(|e| pitch_class_of(&e.note)).collect();
    assert!(classes.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn test_generation_is_deterministic() {
    let a = generate("F", "Fmaj7", ArpPattern::Sweep, HandPosition::High, 16);
    let b = generate("F", "Fmaj7", ArpPattern::Sweep, HandPosition::High, 16);
    assert_eq!(a, b);
}

#[test]
fn test_scale_source_and_extended_tuning() {
    let tuning = OpenStringTuning::from_note_names(&["B", "E", "A", "D", "G", "B", "E"]).unwrap();
    let input = ArpeggioInput::new(Note::parse("E").unwrap(), "Em")
        .with_scale(Some(ScaleType::MinorPentatonic))
        .with_tuning(tuning)
        .with_length(10);
    let result = generate_arpeggio(&input);

    assert_eq!(result.events.len(), 10);
    assert!(result.events.iter().all(|e| (1..=7).contains(&e.string)));
    assert_eq!(result.ascii.lines().count(), 7);
}

#[test]
fn test_render_tab_standalone() {
    let result = generate("G", "G", ArpPattern::Ascending, HandPosition::Open, 6);
    let tab = render_tab(&result.events, 0.25, 6);
    let lengths: HashSet<usize> = tab.lines().map(str::len).collect();
    assert_eq!(tab.lines().count(), 6);
    assert_eq!(lengths.len(), 1);
}

#[test]
fn test_api_contract() {
    let response = handle_generate(
        r#"{"key":"G","chord":"Gmaj7","pattern":"ascending","position":"low","length":8,"tempo":120,"subdivision":2}"#,
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.body["meta"]["key"], "G");
    assert_eq!(response.body["meta"]["chord"], "Gmaj7");
    assert_eq!(response.body["events"].as_array().map(Vec::len), Some(8));

    let event = &response.body["events"][0];
    for field in ["time", "duration", "note", "string", "fret", "finger"] {
        assert!(!event[field].is_null(), "missing {}", field);
    }
}

#[test]
fn test_api_boundary_rejections() {
    for body in [
        r#"{"key":"G","chord":"Gmaj7","length":0}"#,
        r#"{"key":"G","chord":"Gmaj7","tempo":20}"#,
        r#"{"key":"G","chord":"Gmaj7","subdivision":9}"#,
        r#"{"chord":"Gmaj7"}"#,
        r#"{"key":"G"}"#,
    ] {
        let response = handle_generate(body);
        assert_eq!(response.status, 400, "{}", body);
        assert!(response.body["error"].is_string());
    }
}
