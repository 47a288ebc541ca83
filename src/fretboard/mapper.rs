// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Greedy fretboard position mapper.
//!
//! Places one pitch class at a time at the cheapest matching fret inside
//! a hand-position window. Cost is measured against the previously placed
//! note only, which keeps motion local instead of globally optimal:
//!
//! ```text
//! cost = |fret - prev_fret|
//!      + (top_string - string_index) * 0.1
//!      + |midi / 12 - (octave_bias + 1)| * 0.2
//! ```
//!
//! Ties keep the first candidate in scan order (strings in the order
//! given, frets ascending). When nothing fits, the search is repeated once
//! over all strings with the window widened by two frets; if that fails
//! too the note is dropped and counted.

use tracing::{debug, warn};

use super::tuning::OpenStringTuning;
use super::{FretPosition, PositionWindow, FALLBACK_EXPANSION};
use crate::music::note::PitchClass;

const STRING_WEIGHT: f64 = 0.1;
const OCTAVE_WEIGHT: f64 = 0.2;

/// Starting register bias (favors the lower-middle of the neck)
const INITIAL_OCTAVE_BIAS: i32 = 3;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    position: FretPosition,
    cost: f64,
}

/// Stateful mapper for one sequence
#[derive(Debug, Clone)]
pub struct FretboardMapper<'a> {
    tuning: &'a OpenStringTuning,
    window: PositionWindow,
    prev_fret: f64,
    octave_bias: i32,
}

impl<'a> FretboardMapper<'a> {
    pub fn new(tuning: &'a OpenStringTuning, window: PositionWindow) -> Self {
        Self {
            tuning,
            window,
            prev_fret: window.midpoint(),
            octave_bias: INITIAL_OCTAVE_BIAS,
        }
    }

    pub fn window(&self) -> PositionWindow {
        self.window
    }

    /// Place `target`, restricted to `preferred_string` when given.
    ///
    /// Returns `None` when neither the window nor the widened fallback
    /// window has a matching fret. State only advances on success.
    pub fn place(&mut self, target: PitchClass, preferred_string: Option<usize>) -> Option<FretPosition> {
        let all_strings = 0..self.tuning.string_count();

        let in_window = match preferred_string.filter(|&s| s < self.tuning.string_count()) {
            Some(string_index) => self.best_candidate(target, string_index..string_index + 1, self.window),
            None => self.best_candidate(target, all_strings.clone(), self.window),
        };

        let chosen = in_window.or_else(|| {
            let widened = self.window.widened(FALLBACK_EXPANSION);
            debug!(
                pitch = %target,
                min = widened.min,
                max = widened.max,
                "no fret in window, searching widened window"
            );
            self.best_candidate(target, all_strings, widened)
        })?;

        self.prev_fret = chosen.position.fret as f64;
        self.octave_bias = chosen.position.octave() - 1;
        Some(chosen.position)
    }

    fn best_candidate(
        &self,
        target: PitchClass,
        strings: impl Iterator<Item = usize>,
        window: PositionWindow,
    ) -> Option<Candidate> {
        cheapest(self.candidates(target, strings, window))
    }

    /// Matching positions in scan order: strings as given, frets ascending
    fn candidates(
        &self,
        target: PitchClass,
        strings: impl Iterator<Item = usize>,
        window: PositionWindow,
    ) -> Vec<Candidate> {
        strings
            .flat_map(|string_index| (window.min..=window.max).map(move |fret| (string_index, fret)))
            .filter_map(|(string_index, fret)| {
                let midi = self.tuning.midi_at(string_index, fret);
                if PitchClass::from_midi(midi) != target {
                    return None;
                }

                let position = FretPosition {
                    string_index,
                    fret,
                    midi,
                };
                Some(Candidate {
                    position,
                    cost: self.cost(&position),
                })
            })
            .collect()
    }

    fn cost(&self, position: &FretPosition) -> f64 {
        let movement = (position.fret as f64 - self.prev_fret).abs();
        let string = (self.tuning.top_index() - position.string_index) as f64 * STRING_WEIGHT;
        let register = (position.octave() - (self.octave_bias + 1)).abs() as f64 * OCTAVE_WEIGHT;
        movement + string + register
    }
}

/// Lowest-cost candidate; on equal cost the earlier one wins
fn cheapest(candidates: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(b) if b.cost <= candidate.cost => Some(b),
        _ => Some(candidate),
    })
}

/// A placed note and the sequence step it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedNote {
    /// Index into the pitch-class sequence
    pub step: usize,
    pub position: FretPosition,
}

/// Result of mapping a whole sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    pub notes: Vec<MappedNote>,
    /// Steps that could not be placed
    pub dropped: usize,
}

/// Map a pitch-class sequence onto the neck.
///
/// `string_order`, when given, supplies the preferred string for each
/// step (cycled if shorter than the sequence).
pub fn map_sequence(
    tuning: &OpenStringTuning,
    window: PositionWindow,
    sequence: &[PitchClass],
    string_order: Option<&[usize]>,
) -> Mapping {
    let mut mapper = FretboardMapper::new(tuning, window);
    let mut mapping = Mapping::default();

    for (step, &target) in sequence.iter().enumerate() {
        let preferred = string_order
            .filter(|order| !order.is_empty())
            .map(|order| order[step % order.len()]);

        match mapper.place(target, preferred) {
            Some(position) => mapping.notes.push(MappedNote { step, position }),
            None => {
                warn!(step, pitch = %target, "no playable fret, dropping note");
                mapping.dropped += 1;
            }
        }
    }

    mapping
}

/// One-finger-per-fret estimate: open strings are 0, otherwise 1-4
/// counted from the window's lowest fret.
pub fn estimate_finger(fret: u8, window: PositionWindow) -> u8 {
    if fret == 0 {
        return 0;
    }
    (fret as i32 - window.min as i32 + 1).clamp(1, 4) as u8
}
