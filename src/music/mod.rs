// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities.
//!
//! This module provides pitch-class arithmetic, the scale table, and
//! chord-symbol parsing used to derive the notes of an arpeggio.

pub mod chord;
pub mod note;
pub mod scale;

pub use chord::{
    chord_progression, parse_chord_intervals, ChordQuality, ChordSymbol, DiatonicChord, ProgressionTemplate,
};
pub use note::{normalize, MidiNote, Note, PitchClass, SpellingPolicy};
pub use scale::{interval_name, scale_notes, Scale, ScaleCategory, ScaleInfo, ScaleType};
