// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Arpeggio sequencer.
//!
//! Expands a chord (or scale) and a pattern into a pitch-class sequence
//! of the requested length, places it on the neck with the position
//! mapper, and assigns timing, fingers and an ASCII tab.
//!
//! Input is assumed to be validated already (see [`crate::api`]).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ArpeggioEvent, StepTiming};
use crate::fretboard::{estimate_finger, map_sequence, HandPosition, OpenStringTuning};
use crate::music::chord::ChordSymbol;
use crate::music::note::{midi_to_name, Note, PitchClass, SpellingPolicy};
use crate::music::scale::{Scale, ScaleType};
use crate::tab::render_tab_for_tuning;

/// Arpeggio pattern types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArpPattern {
    /// Chord tones root to top, cycled
    #[default]
    Ascending,
    /// Chord tones top to root, cycled
    Descending,
    /// Up then back down without repeating the turnaround notes
    UpDown,
    /// Ascending tones on a forced low-high-low string traversal
    Sweep,
}

impl ArpPattern {
    pub const ALL: [ArpPattern; 4] = [
        ArpPattern::Ascending,
        ArpPattern::Descending,
        ArpPattern::UpDown,
        ArpPattern::Sweep,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ascending" | "up" => Some(ArpPattern::Ascending),
            "descending" | "down" => Some(ArpPattern::Descending),
            "updown" | "up-down" => Some(ArpPattern::UpDown),
            "sweep" => Some(ArpPattern::Sweep),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArpPattern::Ascending => "ascending",
            ArpPattern::Descending => "descending",
            ArpPattern::UpDown => "updown",
            ArpPattern::Sweep => "sweep",
        }
    }

    /// Whether the mapper is steered along a string traversal
    pub fn uses_string_traversal(self) -> bool {
        matches!(self, ArpPattern::UpDown | ArpPattern::Sweep)
    }
}

impl fmt::Display for ArpPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to generate one arpeggio
#[derive(Debug, Clone, PartialEq)]
pub struct ArpeggioInput {
    /// Tonic of the key; root when the chord symbol has none
    pub key: Note,
    /// Chord symbol, e.g. "Gmaj7"
    pub chord: String,
    /// Play the scale on `key` instead of the chord tones
    pub scale: Option<ScaleType>,
    pub pattern: ArpPattern,
    pub position: HandPosition,
    /// Number of notes
    pub length: usize,
    pub timing: StepTiming,
    pub tuning: OpenStringTuning,
    /// Spelling of event note names
    pub spelling: SpellingPolicy,
}

impl ArpeggioInput {
    /// Input with the default pattern, position, length and timing
    pub fn new(key: Note, chord: impl Into<String>) -> Self {
        Self {
            key,
            chord: chord.into(),
            scale: None,
            pattern: ArpPattern::default(),
            position: HandPosition::default(),
            length: 16,
            timing: StepTiming::default(),
            tuning: OpenStringTuning::standard(),
            spelling: SpellingPolicy::default(),
        }
    }

    pub fn with_pattern(mut self, pattern: ArpPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_position(mut self, position: HandPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_timing(mut self, tempo: f64, subdivision: u32) -> Self {
        self.timing = StepTiming::new(tempo, subdivision);
        self
    }

    pub fn with_scale(mut self, scale: Option<ScaleType>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_tuning(mut self, tuning: OpenStringTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_spelling(mut self, spelling: SpellingPolicy) -> Self {
        self.spelling = spelling;
        self
    }

    /// One octave of source pitch classes, root first
    pub fn source_tones(&self) -> Vec<PitchClass> {
        match self.scale {
            Some(scale_type) => Scale::new(self.key.pitch_class(), scale_type).notes().to_vec(),
            None => {
                let chord = ChordSymbol::parse(&self.chord);
                let root = chord
                    .root()
                    .map(Note::pitch_class)
                    .unwrap_or_else(|| self.key.pitch_class());
                chord.pitch_classes(root)
            }
        }
    }
}

/// Echo of the request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArpeggioMeta {
    pub key: String,
    pub chord: String,
    pub pattern: ArpPattern,
    pub position: HandPosition,
    pub tempo: f64,
    pub subdivision: u32,
}

/// Generated arpeggio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArpeggioResult {
    pub meta: ArpeggioMeta,
    pub events: Vec<ArpeggioEvent>,
    pub ascii: String,
    /// Sequence steps that had no playable fret
    pub dropped: usize,
}

/// Order `tones` by pattern and cycle them out to `length` pitch classes
pub fn build_pitch_classes(tones: &[PitchClass], length: usize, pattern: ArpPattern) -> Vec<PitchClass> {
    if tones.is_empty() {
        return Vec::new();
    }

    let cycle: Vec<PitchClass> = match pattern {
        ArpPattern::Ascending | ArpPattern::Sweep => tones.to_vec(),
        ArpPattern::Descending => tones.iter().rev().copied().collect(),
        ArpPattern::UpDown => {
            let inner = if tones.len() > 2 { &tones[1..tones.len() - 1] } else { &[][..] };
            tones.iter().chain(inner.iter().rev()).copied().collect()
        }
    };

    cycle.iter().copied().cycle().take(length).collect()
}

/// Per-step string preference: lowest string to highest and back,
/// without repeating the turnaround strings
pub fn string_traversal(string_count: usize, length: usize) -> Vec<usize> {
    if string_count == 0 {
        return Vec::new();
    }

    let inner = if string_count > 2 { 1..string_count - 1 } else { 0..0 };
    let cycle: Vec<usize> = (0..string_count).chain(inner.rev()).collect();
    cycle.iter().copied().cycle().take(length).collect()
}

/// Generate the arpeggio described by `input`
pub fn generate_arpeggio(input: &ArpeggioInput) -> ArpeggioResult {
    let window = input.position.window();
    let tones = input.source_tones();
    let sequence = build_pitch_classes(&tones, input.length, input.pattern);

    debug!(
        key = %input.key,
        chord = %input.chord,
        pattern = %input.pattern,
        position = %input.position,
        tones = tones.len(),
        "generating arpeggio"
    );

    let traversal = input
        .pattern
        .uses_string_traversal()
        .then(|| string_traversal(input.tuning.string_count(), input.length));
    let mapping = map_sequence(&input.tuning, window, &sequence, traversal.as_deref());

    let seconds_per_step = input.timing.seconds_per_step();
    let duration = input.timing.note_duration();
    let events: Vec<ArpeggioEvent> = mapping
        .notes
        .iter()
        .enumerate()
        .map(|(i, mapped)| {
            let position = mapped.position;
            ArpeggioEvent {
                time: input.timing.time_at(i),
                duration,
                note: midi_to_name(position.midi, input.spelling, Some(&input.key)),
                string: input.tuning.string_number(position.string_index),
                fret: position.fret,
                finger: estimate_finger(position.fret, window),
            }
        })
        .collect();

    let ascii = render_tab_for_tuning(&events, seconds_per_step, input.length, &input.tuning);

    ArpeggioResult {
        meta: ArpeggioMeta {
            key: input.key.to_string(),
            chord: input.chord.clone(),
            pattern: input.pattern,
            position: input.position,
            tempo: input.timing.tempo,
            subdivision: input.timing.subdivision,
        },
        events,
        ascii,
        dropped: mapping.dropped,
    }
}
