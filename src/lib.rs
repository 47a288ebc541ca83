// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! fretwise: chord and scale arpeggios mapped onto guitar fretboard positions.
//!
//! The core is pure and synchronous. A request names a key, a chord (or
//! scale), a pattern and a hand position; the result is a timed list of
//! string/fret events plus an ASCII tab.
//!
//! ```
//! use fretwise::generators::{generate_arpeggio, ArpeggioInput};
//! use fretwise::music::Note;
//!
//! let input = ArpeggioInput::new(Note::parse("G").unwrap(), "Gmaj7").with_length(8);
//! let result = generate_arpeggio(&input);
//! assert_eq!(result.events.len(), 8);
//! ```

pub mod api;
pub mod config;
pub mod fretboard;
pub mod generators;
pub mod music;
pub mod tab;

pub use api::{handle_generate, ApiError, ApiResponse, RequestError};
pub use generators::{generate_arpeggio, ArpeggioEvent, ArpeggioInput, ArpeggioResult};
pub use music::{parse_chord_intervals, scale_notes};
pub use tab::render_tab;
