// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale table and scale engine.
//!
//! Provides the static scale definitions, scale-note derivation,
//! interval-degree naming and display information for a scale on a root.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::note::{spell, Note, PitchClass, SpellingPolicy};

/// Degree labels indexed by semitones above the root
pub const INTERVAL_NAMES: [&str; 12] = [
    "R", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7",
];

/// Grouping used when listing scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleCategory {
    Modes,
    Pentatonic,
    Other,
}

impl fmt::Display for ScaleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleCategory::Modes => write!(f, "modes"),
            ScaleCategory::Pentatonic => write!(f, "pentatonic"),
            ScaleCategory::Other => write!(f, "other"),
        }
    }
}

/// Scale types supported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleType {
    // Major scale and modes
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,

    // Pentatonic scales
    MajorPentatonic,
    MinorPentatonic,

    // Other scales
    HarmonicMinor,
    MelodicMinor,
    Blues,
    WholeTone,
}

/// A static scale definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleDef {
    pub scale_type: ScaleType,
    /// Lookup key (e.g. `major-pentatonic`)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Semitones from the root, strictly increasing, starting at 0
    pub intervals: &'static [u8],
    /// Whole/half step pattern for display
    pub pattern: &'static str,
    pub category: ScaleCategory,
}

/// All scale definitions, in `ScaleType` declaration order
pub static SCALES: [ScaleDef; 13] = [
    ScaleDef {
        scale_type: ScaleType::Ionian,
        id: "ionian",
        name: "Ionian (Major)",
        intervals: &[0, 2, 4, 5, 7, 9, 11],
        pattern: "W-W-H-W-W-W-H",
        category: ScaleCategory::Modes,
    },
    ScaleDef {
        scale_type: ScaleType::Dorian,
        id: "dorian",
        name: "Dorian",
        intervals: &[0, 2, 3, 5, 7, 9, 10],
        pattern: "W-H-W-W-W-H-W",
        category: ScaleCategory::Modes,
    },
    ScaleDef {
        scale_type: ScaleType::Phrygian,
        id: "phrygian",
        name: "Phrygian",
        intervals: &[0, 1, 3, 5, 7, 8, 10],
        pattern: "H-W-W-W-H-W-W",
        category: ScaleCategory::Modes,
    },
    ScaleDef {
        scale_type: ScaleType::Lydian,
        id: "lydian",
        name: "Lydian",
        intervals: &[0, 2, 4, 6, 7, 9, 11],
        pattern: "W-W-W-H-W-W-H",
        category: ScaleCategory::Modes,
    },
    ScaleDef {
        scale_type: ScaleType::Mixolydian,
        id: "mixolydian",
        name: "Mixolydian",
        intervals: &[0, 2, 4, 5, 7, 9, 10],
        pattern: "W-W-H-W-W-H-W",
        category: ScaleCategory::Modes,
    },
    ScaleDef {
        scale_type: ScaleType::Aeolian,
        id: "aeolian",
        name: "Aeolian (Natural Minor)",
        intervals: &[0, 2, 3, 5, 7, 8, 10],
        pattern: "W-H-W-W-H-W-W",
        category: ScaleCategory::Modes,
    },
    ScaleDef {
        scale_type: ScaleType::Locrian,
        id: "locrian",
        name: "Locrian",
        intervals: &[0, 1, 3, 5, 6, 8, 10],
        pattern: "H-W-W-H-W-W-W",
        category: ScaleCategory::Modes,
    },
    ScaleDef {
        scale_type: ScaleType::MajorPentatonic,
        id: "major-pentatonic",
        name: "Major Pentatonic",
        intervals: &[0, 2, 4, 7, 9],
        pattern: "W-W-WH-W-WH",
        category: ScaleCategory::Pentatonic,
    },
    ScaleDef {
        scale_type: ScaleType::MinorPentatonic,
        id: "minor-pentatonic",
        name: "Minor Pentatonic",
        intervals: &[0, 3, 5, 7, 10],
        pattern: "WH-W-W-WH-W",
        category: ScaleCategory::Pentatonic,
    },
    ScaleDef {
        scale_type: ScaleType::HarmonicMinor,
        id: "harmonic-minor",
        name: "Harmonic Minor",
        intervals: &[0, 2, 3, 5, 7, 8, 11],
        pattern: "W-H-W-W-H-WH-H",
        category: ScaleCategory::Other,
    },
    ScaleDef {
        scale_type: ScaleType::MelodicMinor,
        id: "melodic-minor",
        name: "Melodic Minor",
        intervals: &[0, 2, 3, 5, 7, 9, 11],
        pattern: "W-H-W-W-W-W-H",
        category: ScaleCategory::Other,
    },
    ScaleDef {
        scale_type: ScaleType::Blues,
        id: "blues",
        name: "Blues Scale",
        intervals: &[0, 3, 5, 6, 7, 10],
        pattern: "WH-W-H-H-WH-W",
        category: ScaleCategory::Other,
    },
    ScaleDef {
        scale_type: ScaleType::WholeTone,
        id: "whole-tone",
        name: "Whole Tone",
        intervals: &[0, 2, 4, 6, 8, 10],
        pattern: "W-W-W-W-W-W",
        category: ScaleCategory::Other,
    },
];

impl ScaleType {
    /// All scale types in table order
    pub const ALL: [ScaleType; 13] = [
        ScaleType::Ionian,
        ScaleType::Dorian,
        ScaleType::Phrygian,
        ScaleType::Lydian,
        ScaleType::Mixolydian,
        ScaleType::Aeolian,
        ScaleType::Locrian,
        ScaleType::MajorPentatonic,
        ScaleType::MinorPentatonic,
        ScaleType::HarmonicMinor,
        ScaleType::MelodicMinor,
        ScaleType::Blues,
        ScaleType::WholeTone,
    ];

    /// Static definition for this scale type
    pub fn def(self) -> &'static ScaleDef {
        &SCALES[self as usize]
    }

    /// Get the intervals (semitones from root) for this scale type
    pub fn intervals(self) -> &'static [u8] {
        self.def().intervals
    }

    /// Parse scale type from string, accepting common aliases
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '_'], "-");
        match s.as_str() {
            "ionian" | "major" => Some(ScaleType::Ionian),
            "dorian" => Some(ScaleType::Dorian),
            "phrygian" => Some(ScaleType::Phrygian),
            "lydian" => Some(ScaleType::Lydian),
            "mixolydian" => Some(ScaleType::Mixolydian),
            "aeolian" | "minor" | "natural-minor" => Some(ScaleType::Aeolian),
            "locrian" => Some(ScaleType::Locrian),
            "major-pentatonic" | "pentatonic-major" => Some(ScaleType::MajorPentatonic),
            "minor-pentatonic" | "pentatonic-minor" | "pentatonic" => {
                Some(ScaleType::MinorPentatonic)
            }
            "harmonic-minor" => Some(ScaleType::HarmonicMinor),
            "melodic-minor" => Some(ScaleType::MelodicMinor),
            "blues" | "minor-blues" => Some(ScaleType::Blues),
            "whole-tone" | "wholetone" => Some(ScaleType::WholeTone),
            _ => None,
        }
    }

    /// Get a human-readable name for this scale type
    pub fn name(self) -> &'static str {
        self.def().name
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A scale realised on a root
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    root: PitchClass,
    scale_type: ScaleType,
    notes: Vec<PitchClass>,
}

impl Scale {
    /// Create a new scale from root and type
    pub fn new(root: PitchClass, scale_type: ScaleType) -> Self {
        let notes = scale_type
            .intervals()
            .iter()
            .map(|&i| root.transpose(i as i32))
            .collect();

        Self {
            root,
            scale_type,
            notes,
        }
    }

    /// Parse a scale from strings (e.g., "C", "major")
    pub fn parse(root_str: &str, scale_str: &str) -> Option<Self> {
        let root = Note::parse(root_str)?.pitch_class();
        let scale_type = ScaleType::from_str(scale_str)?;
        Some(Scale::new(root, scale_type))
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// Get the notes in this scale, root first
    pub fn notes(&self) -> &[PitchClass] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Check if a pitch class is in this scale
    pub fn contains(&self, pc: PitchClass) -> bool {
        self.notes.contains(&pc)
    }

    /// Get the scale degree (1-based) for a pitch class, if it's in the scale
    pub fn degree_of(&self, pc: PitchClass) -> Option<usize> {
        self.notes.iter().position(|&n| n == pc).map(|i| i + 1)
    }

    /// Get the pitch class at a given scale degree (1-based)
    pub fn note_at_degree(&self, degree: usize) -> Option<PitchClass> {
        if degree == 0 || degree > self.len() {
            return None;
        }
        Some(self.notes[degree - 1])
    }
}

/// Notes of the named scale on `root`; empty for an unknown scale name.
pub fn scale_notes(root: PitchClass, scale_name: &str) -> Vec<PitchClass> {
    ScaleType::from_str(scale_name)
        .map(|st| Scale::new(root, st).notes)
        .unwrap_or_default()
}

/// Degree label of `target` relative to `root` (R, b2, 2, ... 7)
pub fn interval_name(root: PitchClass, target: PitchClass) -> &'static str {
    INTERVAL_NAMES[root.interval_to(target) as usize]
}

/// Display information for a scale on a written root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleInfo {
    /// e.g. "G Ionian (Major)"
    pub name: String,
    pub notes: Vec<String>,
    pub pattern: String,
}

/// Display information for a scale; `None` for an unknown scale name
pub fn scale_info(root: &Note, scale_name: &str, policy: SpellingPolicy) -> Option<ScaleInfo> {
    let scale_type = ScaleType::from_str(scale_name)?;
    let def = scale_type.def();
    let notes = Scale::new(root.pitch_class(), scale_type)
        .notes()
        .iter()
        .map(|&pc| spell(pc, policy, Some(root)).to_string())
        .collect();

    Some(ScaleInfo {
        name: format!("{} {}", root, def.name),
        notes,
        pattern: def.pattern.to_string(),
    })
}

/// Scale definitions belonging to a category
pub fn scales_in_category(category: ScaleCategory) -> impl Iterator<Item = &'static ScaleDef> {
    SCALES.iter().filter(move |def| def.category == category)
}
