// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Open-string tunings for 6, 7 and 8 string guitars.

use std::fmt;

use serde::Serialize;

use crate::music::note::{midi_to_name, normalize, MidiNote, SpellingPolicy};

const SIX_STRING_OCTAVES: [i32; 6] = [2, 2, 3, 3, 3, 4];
const SEVEN_STRING_OCTAVES: [i32; 7] = [1, 2, 2, 3, 3, 3, 4];
const EIGHT_STRING_OCTAVES: [i32; 8] = [1, 1, 2, 2, 3, 3, 3, 4];

/// Octave of each open string, lowest first, by string count
fn string_octaves(strings: usize) -> Option<&'static [i32]> {
    match strings {
        6 => Some(&SIX_STRING_OCTAVES[..]),
        7 => Some(&SEVEN_STRING_OCTAVES[..]),
        8 => Some(&EIGHT_STRING_OCTAVES[..]),
        _ => None,
    }
}

/// Fewest strings a tuning may have
pub const MIN_STRINGS: usize = 6;
/// Most strings a tuning may have
pub const MAX_STRINGS: usize = 8;

/// MIDI pitches of the open strings, ordered from lowest to highest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenStringTuning {
    open_midi: Vec<MidiNote>,
}

impl OpenStringTuning {
    /// Build from explicit MIDI pitches (lowest string first); `None`
    /// unless there are 6 to 8 strings
    pub fn new(open_midi: Vec<MidiNote>) -> Option<Self> {
        if !(MIN_STRINGS..=MAX_STRINGS).contains(&open_midi.len()) {
            return None;
        }
        Some(Self { open_midi })
    }

    /// Standard six-string tuning, E2 A2 D3 G3 B3 E4
    pub fn standard() -> Self {
        Self {
            open_midi: vec![40, 45, 50, 55, 59, 64],
        }
    }

    /// Build from note names (lowest string first) using the octave
    /// layout for that string count. `None` if any name is invalid or the
    /// string count has no layout.
    pub fn from_note_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        let octaves = string_octaves(names.len())?;
        let open_midi = names
            .iter()
            .zip(octaves)
            .map(|(name, &octave)| {
                let pc = normalize(name.as_ref())?;
                Some(((octave + 1) * 12 + pc.value() as i32) as MidiNote)
            })
            .collect::<Option<Vec<_>>>()?;
        Self::new(open_midi)
    }

    pub fn string_count(&self) -> usize {
        self.open_midi.len()
    }

    /// Open MIDI pitches, lowest string first
    pub fn open_midi(&self) -> &[MidiNote] {
        &self.open_midi
    }

    /// Pitch at a fret; `string_index` 0 is the lowest string
    pub fn midi_at(&self, string_index: usize, fret: u8) -> MidiNote {
        self.open_midi[string_index].saturating_add(fret)
    }

    /// Index of the highest-pitched string
    pub fn top_index(&self) -> usize {
        self.open_midi.len() - 1
    }

    /// Player-facing string number, 1 = highest-pitched string
    pub fn string_number(&self, string_index: usize) -> u8 {
        (self.open_midi.len() - string_index) as u8
    }

    /// Tab labels from the highest string down; the top string is lowercase
    pub fn labels(&self) -> Vec<String> {
        self.open_midi
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &midi)| {
                let name = midi_to_name(midi, SpellingPolicy::Sharps, None);
                let name = name.trim_end_matches(|c: char| c.is_ascii_digit() || c == '-');
                if i == 0 {
                    name.to_lowercase()
                } else {
                    name.to_string()
                }
            })
            .collect()
    }
}

impl Default for OpenStringTuning {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for OpenStringTuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .open_midi
            .iter()
            .map(|&m| midi_to_name(m, SpellingPolicy::Sharps, None))
            .collect();
        write!(f, "{}", names.join(" "))
    }
}

/// A named tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningPreset {
    pub id: &'static str,
    pub name: &'static str,
    /// Open-string note names, lowest first
    pub notes: &'static [&'static str],
}

impl TuningPreset {
    pub fn strings(&self) -> usize {
        self.notes.len()
    }

    pub fn tuning(&self) -> OpenStringTuning {
        // Preset names are all valid spellings with a known octave layout
        OpenStringTuning::from_note_names(self.notes).unwrap_or_default()
    }

    /// Look up a preset by id (case-insensitive)
    pub fn find(id: &str) -> Option<&'static TuningPreset> {
        let id = id.trim().to_lowercase();
        TUNING_PRESETS.iter().find(|p| p.id == id)
    }

    /// Standard tuning for a string count, falling back to six strings
    pub fn default_for_strings(strings: usize) -> &'static TuningPreset {
        let id = match strings {
            7 => "standard-7",
            8 => "standard-8",
            _ => "standard-6",
        };
        TUNING_PRESETS
            .iter()
            .find(|p| p.id == id)
            .unwrap_or(&TUNING_PRESETS[0])
    }
}

pub static TUNING_PRESETS: [TuningPreset; 10] = [
    TuningPreset {
        id: "standard-6",
        name: "Standard",
        notes: &["E", "A", "D", "G", "B", "E"],
    },
    TuningPreset {
        id: "drop-d",
        name: "Drop D",
        notes: &["D", "A", "D", "G", "B", "E"],
    },
    TuningPreset {
        id: "drop-c",
        name: "Drop C",
        notes: &["C", "G", "C", "F", "A", "D"],
    },
    TuningPreset {
        id: "dadgad",
        name: "DADGAD",
        notes: &["D", "A", "D", "G", "A", "D"],
    },
    TuningPreset {
        id: "open-d",
        name: "Open D",
        notes: &["D", "A", "D", "F#", "A", "D"],
    },
    TuningPreset {
        id: "open-g",
        name: "Open G",
        notes: &["D", "G", "D", "G", "B", "D"],
    },
    TuningPreset {
        id: "standard-7",
        name: "Standard 7-String",
        notes: &["B", "E", "A", "D", "G", "B", "E"],
    },
    TuningPreset {
        id: "drop-a",
        name: "Drop A (7-String)",
        notes: &["A", "E", "A", "D", "G", "B", "E"],
    },
    TuningPreset {
        id: "standard-8",
        name: "Standard 8-String",
        notes: &["F#", "B", "E", "A", "D", "G", "B", "E"],
    },
    TuningPreset {
        id: "drop-e",
        name: "Drop E (8-String)",
        notes: &["E", "B", "E", "A", "D", "G", "B", "E"],
    },
];
