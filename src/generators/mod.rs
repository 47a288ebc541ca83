// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequence generators that turn music-theory input into timed fretboard events.
//!
//! This module holds the event type and step timing shared by the
//! generators; the arpeggio sequencer lives in [`arpeggio`].

pub mod arpeggio;

pub use arpeggio::{
    build_pitch_classes, generate_arpeggio, string_traversal, ArpPattern, ArpeggioInput,
    ArpeggioMeta, ArpeggioResult,
};

use serde::{Deserialize, Serialize};

/// Portion of each step a note sounds for; the rest is a gap
pub const GATE: f64 = 0.9;

/// A single timed note on the neck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArpeggioEvent {
    /// Start time in seconds
    pub time: f64,
    /// Sounding length in seconds
    pub duration: f64,
    /// Scientific pitch name (e.g. "G3")
    pub note: String,
    /// String number, 1 = highest-pitched string
    pub string: u8,
    pub fret: u8,
    /// 0 = open string, 1-4 fretting fingers
    pub finger: u8,
}

impl ArpeggioEvent {
    /// End of the sounding note
    pub fn end(&self) -> f64 {
        self.time + self.duration
    }
}

/// Tempo and subdivision of an evenly spaced line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTiming {
    /// Tempo in BPM
    pub tempo: f64,
    /// Notes per beat
    pub subdivision: u32,
}

impl Default for StepTiming {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            subdivision: 2,
        }
    }
}

impl StepTiming {
    pub fn new(tempo: f64, subdivision: u32) -> Self {
        Self { tempo, subdivision }
    }

    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.tempo
    }

    pub fn seconds_per_step(&self) -> f64 {
        self.seconds_per_beat() / self.subdivision as f64
    }

    /// Start time of step `index`
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.seconds_per_step()
    }

    /// Sounding length of every step
    pub fn note_duration(&self) -> f64 {
        self.seconds_per_step() * GATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_timing_defaults() {
        let timing = StepTiming::default();
        assert_eq!(timing.tempo, 120.0);
        assert_eq!(timing.subdivision, 2);
        assert!((timing.seconds_per_beat() - 0.5).abs() < 1e-12);
        assert!((timing.seconds_per_step() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_step_timing_positions() {
        let timing = StepTiming::new(90.0, 4);
        let sps = 60.0 / 90.0 / 4.0;
        assert_eq!(timing.time_at(0), 0.0);
        assert!((timing.time_at(3) - 3.0 * sps).abs() < 1e-12);
        assert!((timing.note_duration() - sps * 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_event_end() {
        let event = ArpeggioEvent {
            time: 0.5,
            duration: 0.225,
            note: "G3".to_string(),
            string: 4,
            fret: 0,
            finger: 0,
        };
        assert!((event.end() - 0.725).abs() < 1e-12);
    }
}
