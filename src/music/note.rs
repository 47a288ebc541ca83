// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes, note spellings and enharmonic display.
//!
//! Pitch classes are stored as integers so that equality never depends
//! on how a note was written. Spelling (sharps or flats) is only applied
//! when a pitch class is turned back into text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Canonical sharp spelling for each pitch class
pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat spelling for each pitch class
pub const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// A note identity independent of octave, always in `0..12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Build a pitch class from any integer, wrapping into `0..12`
    pub fn new(value: i32) -> Self {
        PitchClass(value.rem_euclid(12) as u8)
    }

    /// Pitch class of a MIDI note
    pub fn from_midi(midi: MidiNote) -> Self {
        PitchClass(midi % 12)
    }

    /// Numeric value (0-11)
    pub fn value(self) -> u8 {
        self.0
    }

    /// Sharp spelling of this pitch class
    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }

    /// Flat spelling of this pitch class
    pub fn flat_name(self) -> &'static str {
        FLAT_NAMES[self.0 as usize]
    }

    /// Transpose by semitones (either direction)
    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::new(self.0 as i32 + semitones)
    }

    /// Ascending interval in semitones from this pitch class to `other`
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 as i32 - self.0 as i32).rem_euclid(12) as u8
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accidental attached to a note letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    /// Semitone offset applied to the letter
    pub fn offset(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '#' | '♯' => Some(Accidental::Sharp),
            'b' | '♭' => Some(Accidental::Flat),
            _ => None,
        }
    }
}

/// A written note: letter plus optional accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    letter: char,
    accidental: Accidental,
}

impl Note {
    /// Parse a note spelling such as `G`, `f#`, `Bb`, `E♭`.
    ///
    /// The letter is case-insensitive, the accidental is not (`AB` is
    /// rejected). Anything other than a letter and at most one accidental
    /// returns `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let letter = chars.next()?.to_ascii_uppercase();
        if !('A'..='G').contains(&letter) {
            return None;
        }

        let accidental = match chars.next() {
            None => Accidental::Natural,
            Some(c) => Accidental::from_char(c)?,
        };

        if chars.next().is_some() {
            return None;
        }

        Some(Self { letter, accidental })
    }

    /// Uppercase letter A-G
    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    /// Pitch class, folding theoretical spellings (Cb, Fb, E#, B#)
    pub fn pitch_class(&self) -> PitchClass {
        let natural = match self.letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            _ => 11,
        };
        PitchClass::new(natural + self.accidental.offset())
    }

    /// Whether a key on this tonic is conventionally written with flats
    pub fn prefers_flats(&self) -> bool {
        match self.accidental {
            Accidental::Flat => true,
            Accidental::Sharp => false,
            Accidental::Natural => self.letter == 'F',
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accidental {
            Accidental::Natural => write!(f, "{}", self.letter),
            Accidental::Sharp => write!(f, "{}#", self.letter),
            Accidental::Flat => write!(f, "{}b", self.letter),
        }
    }
}

/// Normalize a note spelling to its pitch class; `None` for invalid input.
pub fn normalize(input: &str) -> Option<PitchClass> {
    Note::parse(input).map(|note| note.pitch_class())
}

/// How pitch classes are spelled when displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellingPolicy {
    /// Flats for flat keys, sharps otherwise
    Auto,
    #[default]
    Sharps,
    Flats,
}

impl SpellingPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Some(SpellingPolicy::Auto),
            "sharps" | "sharp" => Some(SpellingPolicy::Sharps),
            "flats" | "flat" => Some(SpellingPolicy::Flats),
            _ => None,
        }
    }

    /// Whether this policy spells with flats for the given tonic
    pub fn uses_flats(self, tonic: Option<&Note>) -> bool {
        match self {
            SpellingPolicy::Sharps => false,
            SpellingPolicy::Flats => true,
            SpellingPolicy::Auto => tonic.map_or(false, Note::prefers_flats),
        }
    }
}

/// Display name of a pitch class under a spelling policy
pub fn spell(pc: PitchClass, policy: SpellingPolicy, tonic: Option<&Note>) -> &'static str {
    if policy.uses_flats(tonic) {
        pc.flat_name()
    } else {
        pc.name()
    }
}

/// Scientific pitch name of a MIDI note (60 = `C4`)
pub fn midi_to_name(midi: MidiNote, policy: SpellingPolicy, tonic: Option<&Note>) -> String {
    let octave = (midi / 12) as i32 - 1;
    format!("{}{}", spell(PitchClass::from_midi(midi), policy, tonic), octave)
}

/// Parse a scientific pitch name (`G3`, `Bb-1`) into a MIDI note
pub fn name_to_midi(name: &str) -> Option<MidiNote> {
    let name = name.trim();
    let split = name.find(|c: char| c.is_ascii_digit() || c == '-')?;
    let (note, octave) = name.split_at(split);
    let pc = normalize(note)?;
    let octave: i32 = octave.parse().ok()?;
    let midi = (octave + 1) * 12 + pc.value() as i32;
    if (0..=127).contains(&midi) {
        Some(midi as MidiNote)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_naturals_and_accidentals() {
        assert_eq!(normalize("C"), Some(PitchClass::new(0)));
        assert_eq!(normalize("G"), Some(PitchClass::new(7)));
        assert_eq!(normalize("F#"), Some(PitchClass::new(6)));
        assert_eq!(normalize("Gb"), Some(PitchClass::new(6)));
        assert_eq!(normalize("A♯"), Some(PitchClass::new(10)));
        assert_eq!(normalize("E♭"), Some(PitchClass::new(3)));
        assert_eq!(normalize("g"), Some(PitchClass::new(7)));
        assert_eq!(normalize("bb"), Some(PitchClass::new(10)));
    }

    #[test]
    fn test_normalize_theoretical_spellings() {
        assert_eq!(normalize("Cb"), Some(PitchClass::new(11)));
        assert_eq!(normalize("Fb"), Some(PitchClass::new(4)));
        assert_eq!(normalize("E#"), Some(PitchClass::new(5)));
        assert_eq!(normalize("B#"), Some(PitchClass::new(0)));
    }

    #[test]
    fn test_normalize_rejects_invalid() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("H"), None);
        assert_eq!(normalize("AB"), None);
        assert_eq!(normalize("C##"), None);
        assert_eq!(normalize("Cmaj"), None);
        assert_eq!(normalize("#"), None);
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in ["C", "Db", "d#", "E♭", "Fb", "B#", "Gb", "a", "Cb", "E#"] {
            let once = normalize(input).unwrap();
            let twice = normalize(once.name()).unwrap();
            assert_eq!(once, twice, "normalize not idempotent for {}", input);
            assert!(once.value() < 12);
        }
    }

    #[test]
    fn test_pitch_class_arithmetic() {
        assert_eq!(PitchClass::new(-1).value(), 11);
        assert_eq!(PitchClass::new(25).value(), 1);
        assert_eq!(PitchClass::new(7).transpose(7).value(), 2);
        assert_eq!(PitchClass::new(2).transpose(-5).value(), 9);
        assert_eq!(PitchClass::new(7).interval_to(PitchClass::new(2)), 7);
        assert_eq!(PitchClass::from_midi(64).name(), "E");
    }

    #[test]
    fn test_spelling_policy() {
        let bb = Note::parse("Bb").unwrap();
        let f = Note::parse("F").unwrap();
        let g = Note::parse("G").unwrap();
        let pc = PitchClass::new(3);

        assert_eq!(spell(pc, SpellingPolicy::Sharps, Some(&bb)), "D#");
        assert_eq!(spell(pc, SpellingPolicy::Flats, Some(&g)), "Eb");
        assert_eq!(spell(pc, SpellingPolicy::Auto, Some(&bb)), "Eb");
        assert_eq!(spell(pc, SpellingPolicy::Auto, Some(&f)), "Eb");
        assert_eq!(spell(pc, SpellingPolicy::Auto, Some(&g)), "D#");
        assert_eq!(spell(pc, SpellingPolicy::Auto, None), "D#");
    }

    #[test]
    fn test_midi_names() {
        assert_eq!(midi_to_name(60, SpellingPolicy::Sharps, None), "C4");
        assert_eq!(midi_to_name(40, SpellingPolicy::Sharps, None), "E2");
        assert_eq!(midi_to_name(54, SpellingPolicy::Flats, None), "Gb3");
        assert_eq!(name_to_midi("G3"), Some(55));
        assert_eq!(name_to_midi("Bb-1"), Some(10));
        assert_eq!(name_to_midi("C4"), Some(60));
        assert_eq!(name_to_midi("X4"), None);
        assert_eq!(name_to_midi("G"), None);
        assert_eq!(name_to_midi("G10"), None);
    }
}
