// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! JSON request boundary for arpeggio generation.
//!
//! Implements the `POST /api/arpeggio/generate` contract without owning a
//! socket: a JSON body goes in, a status code and JSON body come out.
//! Any HTTP server can forward to [`handle_generate`].
//!
//! Request fields (all but `key` and `chord` optional):
//!
//! | field | type | default | range |
//! |---|---|---|---|
//! | key | note name | required | |
//! | chord | chord symbol | required | |
//! | pattern | ascending, descending, updown, sweep | ascending | |
//! | position | open, low, mid, high, multi | low | |
//! | length | integer | 16 | 1-128 |
//! | tempo | number | 120 | 30-300 |
//! | subdivision | integer | 2 | 1-8 |
//! | scale | scale name | none | |
//! | tuning | preset id or list of note names | standard-6 | |
//! | spelling | auto, sharps, flats | sharps | |
//!
//! Numeric fields also accept numeric strings. A `null` field takes its
//! default.

use std::panic::{self, AssertUnwindSafe};

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::fretboard::{HandPosition, OpenStringTuning, TuningPreset};
use crate::generators::{generate_arpeggio, ArpPattern, ArpeggioInput, StepTiming};
use crate::music::note::{Note, SpellingPolicy};
use crate::music::scale::ScaleType;

pub const MIN_LENGTH: usize = 1;
pub const MAX_LENGTH: usize = 128;
pub const MIN_TEMPO: f64 = 30.0;
pub const MAX_TEMPO: f64 = 300.0;
pub const MIN_SUBDIVISION: u32 = 1;
pub const MAX_SUBDIVISION: u32 = 8;

/// A request the caller must fix (HTTP 400)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("invalid JSON body")]
    InvalidJson,

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid {0}")]
    Invalid(&'static str),
}

/// Failure of a generate call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("internal_error")]
    Internal,
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Request(_) => 400,
            ApiError::Internal => 500,
        }
    }
}

/// Status code and JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn from_error(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            body: json!({ "error": err.to_string() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Values used for fields a request leaves out
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDefaults {
    pub pattern: ArpPattern,
    pub position: HandPosition,
    pub length: usize,
    pub tempo: f64,
    pub subdivision: u32,
    pub tuning: OpenStringTuning,
    pub spelling: SpellingPolicy,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        let timing = StepTiming::default();
        Self {
            pattern: ArpPattern::default(),
            position: HandPosition::default(),
            length: 16,
            tempo: timing.tempo,
            subdivision: timing.subdivision,
            tuning: OpenStringTuning::standard(),
            spelling: SpellingPolicy::default(),
        }
    }
}

/// Handle a generate request with the built-in defaults
pub fn handle_generate(body: &str) -> ApiResponse {
    handle_generate_with(body, &RequestDefaults::default())
}

/// Handle a generate request, filling omitted fields from `defaults`
pub fn handle_generate_with(body: &str, defaults: &RequestDefaults) -> ApiResponse {
    match generate(body, defaults) {
        Ok(value) => ApiResponse::ok(value),
        Err(err) => {
            if let ApiError::Request(ref reason) = err {
                debug!(%reason, "rejected generate request");
            }
            ApiResponse::from_error(&err)
        }
    }
}

fn generate(body: &str, defaults: &RequestDefaults) -> Result<Value, ApiError> {
    let input = parse_request(body, defaults)?;

    let result = panic::catch_unwind(AssertUnwindSafe(|| generate_arpeggio(&input))).map_err(|_| {
        error!(key = %input.key, chord = %input.chord, "arpeggio generation failed");
        ApiError::Internal
    })?;

    serde_json::to_value(&result).map_err(|e| {
        error!(error = %e, "failed to serialize arpeggio");
        ApiError::Internal
    })
}

/// Parse and validate a JSON request body
pub fn parse_request(body: &str, defaults: &RequestDefaults) -> Result<ArpeggioInput, RequestError> {
    let value: Value = serde_json::from_str(body).map_err(|_| RequestError::InvalidJson)?;
    parse_request_value(&value, defaults)
}

/// Validate an already-decoded request. A non-object body is treated as
/// an empty one.
pub fn parse_request_value(value: &Value, defaults: &RequestDefaults) -> Result<ArpeggioInput, RequestError> {
    let empty = Map::new();
    let fields = value.as_object().unwrap_or(&empty);
    let field = |name: &str| fields.get(name).filter(|v| !v.is_null());

    let key = required_str(field("key"), "key")?;
    let chord = required_str(field("chord"), "chord")?;

    let length = match field("length") {
        Some(v) => integer(v).ok_or(RequestError::Invalid("length"))?,
        None => defaults.length as f64,
    };
    if !(MIN_LENGTH as f64..=MAX_LENGTH as f64).contains(&length) {
        return Err(RequestError::Invalid("length"));
    }

    let tempo = match field("tempo") {
        Some(v) => number(v).ok_or(RequestError::Invalid("tempo"))?,
        None => defaults.tempo,
    };
    if !(MIN_TEMPO..=MAX_TEMPO).contains(&tempo) {
        return Err(RequestError::Invalid("tempo"));
    }

    let subdivision = match field("subdivision") {
        Some(v) => integer(v).ok_or(RequestError::Invalid("subdivision"))?,
        None => defaults.subdivision as f64,
    };
    if !(MIN_SUBDIVISION as f64..=MAX_SUBDIVISION as f64).contains(&subdivision) {
        return Err(RequestError::Invalid("subdivision"));
    }

    let key = Note::parse(key).ok_or(RequestError::Invalid("key"))?;

    let pattern = optional(field("pattern"), "pattern", ArpPattern::from_str)?.unwrap_or(defaults.pattern);
    let position = optional(field("position"), "position", HandPosition::from_str)?.unwrap_or(defaults.position);
    let spelling = optional(field("spelling"), "spelling", SpellingPolicy::from_str)?.unwrap_or(defaults.spelling);
    let scale = optional(field("scale"), "scale", ScaleType::from_str)?;
    let tuning = match field("tuning") {
        Some(v) => parse_tuning(v).ok_or(RequestError::Invalid("tuning"))?,
        None => defaults.tuning.clone(),
    };

    Ok(ArpeggioInput::new(key, chord)
        .with_pattern(pattern)
        .with_position(position)
        .with_length(length as usize)
        .with_timing(tempo, subdivision as u32)
        .with_scale(scale)
        .with_tuning(tuning)
        .with_spelling(spelling))
}

fn required_str<'a>(value: Option<&'a Value>, name: &'static str) -> Result<&'a str, RequestError> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(RequestError::Missing(name))
}

fn optional<T>(
    value: Option<&Value>,
    name: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, RequestError> {
    value
        .map(|v| v.as_str().and_then(&parse).ok_or(RequestError::Invalid(name)))
        .transpose()
}

/// Finite number from a JSON number or numeric string
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn integer(value: &Value) -> Option<f64> {
    number(value).filter(|n| n.fract() == 0.0)
}

/// A preset id or a list of open-string note names, lowest first
fn parse_tuning(value: &Value) -> Option<OpenStringTuning> {
    match value {
        Value::String(id) => TuningPreset::find(id).map(TuningPreset::tuning),
        Value::Array(names) => {
            let names = names.iter().map(Value::as_str).collect::<Option<Vec<_>>>()?;
            OpenStringTuning::from_note_names(&names[..])
        }
        _ => None,
    }
}
