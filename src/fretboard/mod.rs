// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fretboard geometry: positions, hand-position windows and the note map.
//!
//! Strings are indexed from the lowest-pitched string (index 0). Player
//! facing string numbers (1 = highest) are produced by
//! [`OpenStringTuning::string_number`].

pub mod mapper;
pub mod tuning;

pub use mapper::{estimate_finger, map_sequence, FretboardMapper, MappedNote, Mapping};
pub use tuning::{OpenStringTuning, TuningPreset, TUNING_PRESETS};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::music::note::{spell, MidiNote, Note, PitchClass, SpellingPolicy};
use crate::music::scale::{interval_name, Scale};

/// Highest fret the fallback search may reach
pub const MAX_FALLBACK_FRET: u8 = 18;

/// How far the fallback search widens the window on each side
pub const FALLBACK_EXPANSION: u8 = 2;

/// A concrete place on the neck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FretPosition {
    /// 0 = lowest-pitched string
    pub string_index: usize,
    pub fret: u8,
    /// Always `open_midi[string_index] + fret`
    pub midi: MidiNote,
}

impl FretPosition {
    pub fn pitch_class(&self) -> PitchClass {
        PitchClass::from_midi(self.midi)
    }

    /// MIDI octave number as used by the mapper cost (`midi / 12`)
    pub fn octave(&self) -> i32 {
        (self.midi / 12) as i32
    }
}

/// Inclusive fret bounds for a hand position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionWindow {
    pub min: u8,
    pub max: u8,
}

impl PositionWindow {
    pub fn new(min: u8, max: u8) -> Self {
        debug_assert!(min <= max, "window min {} > max {}", min, max);
        Self { min, max }
    }

    pub fn contains(&self, fret: u8) -> bool {
        (self.min..=self.max).contains(&fret)
    }

    /// Center fret, the mapper's starting point
    pub fn midpoint(&self) -> f64 {
        (self.min as f64 + self.max as f64) / 2.0
    }

    /// Window widened by `by` frets on each side, clamped to `[0, MAX_FALLBACK_FRET]`
    pub fn widened(&self, by: u8) -> Self {
        let min = self.min.saturating_sub(by);
        let max = self.max.saturating_add(by).min(MAX_FALLBACK_FRET).max(min);
        Self { min, max }
    }

    pub fn span(&self) -> u8 {
        self.max - self.min
    }
}

/// Named hand position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandPosition {
    Open,
    #[default]
    Low,
    Mid,
    High,
    /// Relaxed window spanning most of the neck
    Multi,
}

impl HandPosition {
    pub const ALL: [HandPosition; 5] = [
        HandPosition::Open,
        HandPosition::Low,
        HandPosition::Mid,
        HandPosition::High,
        HandPosition::Multi,
    ];

    /// Fret window for this position
    pub fn window(self) -> PositionWindow {
        match self {
            HandPosition::Open => PositionWindow::new(0, 3),
            HandPosition::Low => PositionWindow::new(1, 5),
            HandPosition::Mid => PositionWindow::new(5, 9),
            HandPosition::High => PositionWindow::new(9, 14),
            HandPosition::Multi => PositionWindow::new(0, 15),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(HandPosition::Open),
            "low" => Some(HandPosition::Low),
            "mid" | "middle" => Some(HandPosition::Mid),
            "high" => Some(HandPosition::High),
            "multi" => Some(HandPosition::Multi),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandPosition::Open => "open",
            HandPosition::Low => "low",
            HandPosition::Mid => "mid",
            HandPosition::High => "high",
            HandPosition::Multi => "multi",
        }
    }
}

impl fmt::Display for HandPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One cell of the fretboard note map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FretboardNote {
    pub note: String,
    /// Degree label relative to the scale root
    pub interval: &'static str,
    pub is_root: bool,
    pub is_in_scale: bool,
    pub pitch_class: PitchClass,
}

/// Note map of the neck: one row per string (lowest first), frets `0..=max_frets`
pub fn fretboard_notes(
    tuning: &OpenStringTuning,
    scale: &Scale,
    max_frets: u8,
    policy: SpellingPolicy,
    tonic: Option<&Note>,
) -> Vec<Vec<FretboardNote>> {
    let root = scale.root();

    (0..tuning.string_count())
        .map(|string_index| {
            (0..=max_frets)
                .map(|fret| {
                    let pc = PitchClass::from_midi(tuning.midi_at(string_index, fret));
                    FretboardNote {
                        note: spell(pc, policy, tonic).to_string(),
                        interval: interval_name(root, pc),
                        is_root: pc == root,
                        is_in_scale: scale.contains(pc),
                        pitch_class: pc,
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::scale::ScaleType;

    #[test]
    fn test_position_windows() {
        for position in HandPosition::ALL {
            let window = position.window();
            assert!(window.min <= window.max);
            if position != HandPosition::Multi {
                assert!((3..=6).contains(&window.span()), "{} span", position);
            }
        }
        assert_eq!(HandPosition::Low.window(), PositionWindow::new(1, 5));
        assert_eq!(HandPosition::default(), HandPosition::Low);
    }

    #[test]
    fn test_window_widening() {
        assert_eq!(PositionWindow::new(1, 5).widened(2), PositionWindow::new(0, 7));
        assert_eq!(PositionWindow::new(9, 14).widened(2), PositionWindow::new(7, 16));
        assert_eq!(PositionWindow::new(0, 17).widened(2), PositionWindow::new(0, 18));
        assert_eq!(PositionWindow::new(1, 5).midpoint(), 3.0);
    }

    #[test]
    fn test_hand_position_from_str() {
        assert_eq!(HandPosition::from_str("MID"), Some(HandPosition::Mid));
        assert_eq!(HandPosition::from_str("multi"), Some(HandPosition::Multi));
        assert_eq!(HandPosition::from_str("nowhere"), None);
    }

    #[test]
    fn test_fret_position_helpers() {
        let pos = FretPosition {
            string_index: 0,
            fret: 3,
            midi: 43,
        };
        assert_eq!(pos.pitch_class(), PitchClass::new(7));
        assert_eq!(pos.octave(), 3);
    }

    #[test]
    fn test_fretboard_notes() {
        let tuning = OpenStringTuning::standard();
        let scale = Scale::new(PitchClass::C, ScaleType::Ionian);
        let grid = fretboard_notes(&tuning, &scale, 12, SpellingPolicy::Sharps, None);

        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|row| row.len() == 13));

        // Low E string
        assert_eq!(grid[0][0].note, "E");
        assert_eq!(grid[0][0].interval, "3");
        assert!(grid[0][0].is_in_scale);
        assert_eq!(grid[0][1].note, "F");
        assert!(!grid[0][2].is_in_scale); // F#

        // A string, 3rd fret is the root
        assert!(grid[1][3].is_root);
        assert_eq!(grid[1][3].interval, "R");

        // 12th fret repeats the open string
        assert_eq!(grid[4][12].pitch_class, grid[4][0].pitch_class);
    }
}
