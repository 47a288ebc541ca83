// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord symbol parsing and diatonic harmony.
//!
//! A chord symbol is split into an optional root and a suffix. The suffix
//! is classified by three ordered rule tables (triad, seventh, extensions);
//! the first matching triad and seventh rule wins and every matching
//! extension is added. Unrecognized text is ignored, so an unknown symbol
//! degrades to a major triad.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::note::{spell, Note, PitchClass, SpellingPolicy};
use super::scale::Scale;

/// Base triad of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriadQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
}

impl TriadQuality {
    /// Third and fifth above the root
    pub fn intervals(self) -> [u8; 2] {
        match self {
            TriadQuality::Major => [4, 7],
            TriadQuality::Minor => [3, 7],
            TriadQuality::Diminished => [3, 6],
            TriadQuality::Augmented => [4, 8],
        }
    }
}

/// Seventh layered on top of the triad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeventhQuality {
    Major7,
    HalfDiminished,
    Diminished7,
    Minor7,
    Dominant7,
}

impl SeventhQuality {
    pub fn intervals(self) -> &'static [u8] {
        match self {
            SeventhQuality::Major7 => &[11],
            SeventhQuality::HalfDiminished => &[6, 10],
            SeventhQuality::Diminished7 => &[6, 9],
            SeventhQuality::Minor7 | SeventhQuality::Dominant7 => &[10],
        }
    }
}

/// Upper extension, reduced into the octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Extension {
    Ninth,
    Eleventh,
    Thirteenth,
}

impl Extension {
    pub fn interval(self) -> u8 {
        match self {
            Extension::Ninth => 14 % 12,
            Extension::Eleventh => 17 % 12,
            Extension::Thirteenth => 21 % 12,
        }
    }
}

/// Overall chord classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant,
    Diminished,
    HalfDiminished,
    Augmented,
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Dominant => "dominant",
            ChordQuality::Diminished => "diminished",
            ChordQuality::HalfDiminished => "half-diminished",
            ChordQuality::Augmented => "augmented",
        };
        f.write_str(name)
    }
}

/// How a rule inspects the normalized suffix
#[derive(Debug, Clone, Copy)]
enum Matcher {
    Contains(&'static str),
    /// An `m` that is neither part of `maj` nor of `dim`
    MinorM,
    /// A `7` that is not part of a longer number
    StandaloneSeven,
}

impl Matcher {
    fn matches(self, suffix: &str) -> bool {
        match self {
            Matcher::Contains(token) => suffix.contains(token),
            Matcher::MinorM => suffix.match_indices('m').any(|(i, _)| {
                !suffix[i + 1..].starts_with("aj") && !suffix[..i].ends_with("di")
            }),
            Matcher::StandaloneSeven => {
                let chars: Vec<char> = suffix.chars().collect();
                chars.iter().enumerate().any(|(i, &c)| {
                    c == '7'
                        && !(i > 0 && chars[i - 1].is_ascii_digit())
                        && !chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule<T> {
    matcher: Matcher,
    value: T,
}

const fn rule<T>(matcher: Matcher, value: T) -> Rule<T> {
    Rule { matcher, value }
}

const TRIAD_RULES: &[Rule<TriadQuality>] = &[
    rule(Matcher::Contains("m7b5"), TriadQuality::Diminished),
    rule(Matcher::Contains("ø"), TriadQuality::Diminished),
    rule(Matcher::Contains("dim"), TriadQuality::Diminished),
    rule(Matcher::Contains("°"), TriadQuality::Diminished),
    rule(Matcher::Contains("aug"), TriadQuality::Augmented),
    rule(Matcher::Contains("+"), TriadQuality::Augmented),
    rule(Matcher::MinorM, TriadQuality::Minor),
];

const SEVENTH_RULES: &[Rule<SeventhQuality>] = &[
    rule(Matcher::Contains("maj7"), SeventhQuality::Major7),
    rule(Matcher::Contains("m7b5"), SeventhQuality::HalfDiminished),
    rule(Matcher::Contains("ø"), SeventhQuality::HalfDiminished),
    rule(Matcher::Contains("dim7"), SeventhQuality::Diminished7),
    rule(Matcher::Contains("°7"), SeventhQuality::Diminished7),
    rule(Matcher::Contains("min7"), SeventhQuality::Minor7),
    rule(Matcher::Contains("m7"), SeventhQuality::Minor7),
    rule(Matcher::StandaloneSeven, SeventhQuality::Dominant7),
];

const EXTENSION_RULES: &[Rule<Extension>] = &[
    rule(Matcher::Contains("9"), Extension::Ninth),
    rule(Matcher::Contains("11"), Extension::Eleventh),
    rule(Matcher::Contains("13"), Extension::Thirteenth),
];

fn first_match<T: Copy>(rules: &[Rule<T>], suffix: &str) -> Option<T> {
    rules
        .iter()
        .find(|r| r.matcher.matches(suffix))
        .map(|r| r.value)
}

/// Fold case variants onto the lowercase tokens the rules look for.
/// An uppercase `M` on its own means major (`CM7`).
fn normalize_suffix(raw: &str) -> String {
    raw.replace("MAJ", "maj")
        .replace("Maj", "maj")
        .replace("MIN", "min")
        .replace("Min", "min")
        .replace('M', "maj")
        .to_lowercase()
}

/// Suffixes that start with a note letter and never carry a root
const ROOTLESS_PREFIXES: [&str; 3] = ["add", "aug", "dim"];

/// Split a leading root (letter plus optional accidental). A lowercase
/// letter counts as a root unless it starts one of `ROOTLESS_PREFIXES`.
fn split_root(symbol: &str) -> (Option<Note>, &str) {
    let mut chars = symbol.char_indices();
    let Some((_, first)) = chars.next() else {
        return (None, symbol);
    };
    let is_root = match first {
        'A'..='G' => true,
        'a'..='g' => !ROOTLESS_PREFIXES.iter().any(|p| symbol.starts_with(p)),
        _ => false,
    };
    if !is_root {
        return (None, symbol);
    }

    let mut end = first.len_utf8();
    if let Some((i, c)) = chars.next() {
        if matches!(c, '#' | '♯' | 'b' | '♭') {
            end = i + c.len_utf8();
        }
    }

    let (root, rest) = symbol.split_at(end);
    (Note::parse(root), rest)
}

/// A parsed chord symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordSymbol {
    #[serde(skip)]
    root: Option<Note>,
    suffix: String,
    triad: TriadQuality,
    seventh: Option<SeventhQuality>,
    extensions: Vec<Extension>,
}

impl ChordSymbol {
    /// Parse a chord symbol. Never fails; unknown text is ignored.
    pub fn parse(symbol: &str) -> Self {
        let symbol = symbol.trim();
        // Slash bass notes do not change the chord's interval set
        let symbol = symbol.split('/').next().unwrap_or(symbol);
        let (root, rest) = split_root(symbol);
        let suffix = normalize_suffix(rest);

        let triad = first_match(TRIAD_RULES, &suffix).unwrap_or(TriadQuality::Major);
        let seventh = first_match(SEVENTH_RULES, &suffix);
        let extensions = EXTENSION_RULES
            .iter()
            .filter(|r| r.matcher.matches(&suffix))
            .map(|r| r.value)
            .collect();

        Self {
            root,
            suffix,
            triad,
            seventh,
            extensions,
        }
    }

    /// Written root, if the symbol started with one
    pub fn root(&self) -> Option<&Note> {
        self.root.as_ref()
    }

    /// Normalized suffix the rules were evaluated against
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn triad(&self) -> TriadQuality {
        self.triad
    }

    pub fn seventh(&self) -> Option<SeventhQuality> {
        self.seventh
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Sorted unique semitone offsets from the root, always containing 0
    pub fn intervals(&self) -> Vec<u8> {
        let mut set = BTreeSet::from([0u8]);
        set.extend(self.triad.intervals());
        if let Some(seventh) = self.seventh {
            set.extend(seventh.intervals());
        }
        set.extend(self.extensions.iter().map(|e| e.interval()));
        set.into_iter().collect()
    }

    /// Overall quality used for labelling
    pub fn quality(&self) -> ChordQuality {
        match (self.triad, self.seventh) {
            (_, Some(SeventhQuality::HalfDiminished)) => ChordQuality::HalfDiminished,
            (TriadQuality::Diminished, _) => ChordQuality::Diminished,
            (TriadQuality::Augmented, _) => ChordQuality::Augmented,
            (TriadQuality::Minor, _) => ChordQuality::Minor,
            (TriadQuality::Major, Some(SeventhQuality::Dominant7 | SeventhQuality::Minor7)) => {
                ChordQuality::Dominant
            }
            (TriadQuality::Major, _) => ChordQuality::Major,
        }
    }

    /// Chord tones as pitch classes in root-to-top order
    pub fn pitch_classes(&self, root: PitchClass) -> Vec<PitchClass> {
        self.intervals()
            .into_iter()
            .map(|i| root.transpose(i as i32))
            .collect()
    }
}

/// Sorted unique semitone offsets for a chord symbol (`Gmaj7` -> 0,4,7,11)
pub fn parse_chord_intervals(symbol: &str) -> Vec<u8> {
    ChordSymbol::parse(symbol).intervals()
}

const ROMAN_NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Triad built on one degree of a scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiatonicChord {
    /// 1-based scale degree
    pub degree: usize,
    /// Roman numeral (`ii`, `vii°`), empty past the seventh degree
    pub roman: String,
    /// Chord symbol (`Am`, `F#°`)
    pub symbol: String,
    #[serde(skip)]
    pub root: PitchClass,
    pub intervals: [u8; 3],
    pub quality: ChordQuality,
}

/// Stack thirds from the scale on every degree
pub fn diatonic_triads(
    scale: &Scale,
    policy: SpellingPolicy,
    tonic: Option<&Note>,
) -> Vec<DiatonicChord> {
    let notes = scale.notes();
    let len = notes.len();

    notes
        .iter()
        .enumerate()
        .map(|(degree, &root)| {
            let third = root.interval_to(notes[(degree + 2) % len]);
            let fifth = root.interval_to(notes[(degree + 4) % len]);

            let (quality, mark) = match (third, fifth) {
                (3, 6) => (ChordQuality::Diminished, "°"),
                (4, 8) => (ChordQuality::Augmented, "+"),
                (3, _) => (ChordQuality::Minor, "m"),
                _ => (ChordQuality::Major, ""),
            };

            let roman = ROMAN_NUMERALS
                .get(degree)
                .map(|numeral| match quality {
                    ChordQuality::Minor => numeral.to_lowercase(),
                    ChordQuality::Diminished => format!("{}°", numeral.to_lowercase()),
                    ChordQuality::Augmented => format!("{}+", numeral),
                    _ => numeral.to_string(),
                })
                .unwrap_or_default();

            DiatonicChord {
                degree: degree + 1,
                roman,
                symbol: format!("{}{}", spell(root, policy, tonic), mark),
                root,
                intervals: [0, third, fifth],
                quality,
            }
        })
        .collect()
}

/// Major-scale offsets that borrowed numerals (`bVII`) are measured from
const MAJOR_DEGREES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// A roman numeral split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Numeral {
    /// 0-based degree
    degree: usize,
    /// Semitones from a leading `b` or `#`
    shift: i32,
    triad: TriadQuality,
}

fn parse_numeral(text: &str) -> Option<Numeral> {
    let (shift, body) = match text.chars().next()? {
        c @ ('b' | '♭') => (-1, &text[c.len_utf8()..]),
        c @ ('#' | '♯') => (1, &text[c.len_utf8()..]),
        _ => (0, text),
    };

    let split = body
        .find(|c: char| !matches!(c, 'I' | 'V' | 'i' | 'v'))
        .unwrap_or(body.len());
    let (letters, mark) = body.split_at(split);
    let upper = letters.to_uppercase();
    let degree = ROMAN_NUMERALS.iter().position(|&n| n == upper)?;

    let minor = if letters == upper {
        false
    } else if letters == letters.to_lowercase() {
        true
    } else {
        return None;
    };

    let triad = match (mark, minor) {
        ("°" | "o" | "dim", _) => TriadQuality::Diminished,
        ("+" | "aug", _) => TriadQuality::Augmented,
        ("", true) if degree == 6 => TriadQuality::Diminished,
        ("", true) => TriadQuality::Minor,
        ("", false) => TriadQuality::Major,
        _ => return None,
    };

    Some(Numeral { degree, shift, triad })
}

/// Triads for a list of roman numerals (`I V vi IV`).
///
/// Case gives the quality, `°`/`o` marks diminished and `+` augmented; a
/// bare lowercase `vii` is diminished. Plain numerals take their root from
/// the scale. Numerals with a `b` or `#` prefix are measured from the major
/// scale on the same tonic, so `bVII` in C is Bb whatever the mode.
/// Unrecognized numerals and degrees the scale does not have are skipped.
pub fn chord_progression(
    scale: &Scale,
    numerals: &[&str],
    policy: SpellingPolicy,
    tonic: Option<&Note>,
) -> Vec<DiatonicChord> {
    numerals
        .iter()
        .filter_map(|text| {
            let text = text.trim();
            let numeral = parse_numeral(text)?;
            let root = if numeral.shift == 0 {
                scale.note_at_degree(numeral.degree + 1)?
            } else {
                scale.root().transpose(MAJOR_DEGREES[numeral.degree] + numeral.shift)
            };

            let (quality, mark) = match numeral.triad {
                TriadQuality::Major => (ChordQuality::Major, ""),
                TriadQuality::Minor => (ChordQuality::Minor, "m"),
                TriadQuality::Diminished => (ChordQuality::Diminished, "°"),
                TriadQuality::Augmented => (ChordQuality::Augmented, "+"),
            };
            let [third, fifth] = numeral.triad.intervals();

            Some(DiatonicChord {
                degree: numeral.degree + 1,
                roman: text.to_string(),
                symbol: format!("{}{}", spell(root, policy, tonic), mark),
                root,
                intervals: [0, third, fifth],
                quality,
            })
        })
        .collect()
}

/// A named progression
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressionTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub numerals: &'static [&'static str],
}

pub static PROGRESSION_TEMPLATES: &[ProgressionTemplate] = &[
    ProgressionTemplate { id: "pop", name: "Pop Progression", numerals: &["I", "V", "vi", "IV"] },
    ProgressionTemplate { id: "pop-variation", name: "Pop Variation", numerals: &["vi", "IV", "I", "V"] },
    ProgressionTemplate { id: "fifties", name: "50s Progression", numerals: &["I", "vi", "IV", "V"] },
    ProgressionTemplate { id: "jazz", name: "Jazz Standard", numerals: &["ii", "V", "I"] },
    ProgressionTemplate { id: "rock", name: "Rock Progression", numerals: &["I", "bVII", "IV", "I"] },
    ProgressionTemplate { id: "emo", name: "Emo/Pop-Punk", numerals: &["vi", "V", "IV", "V"] },
    ProgressionTemplate {
        id: "canon",
        name: "Canon Progression",
        numerals: &["I", "V", "vi", "iii", "IV", "I", "IV", "V"],
    },
    ProgressionTemplate { id: "andalusian", name: "Andalusian", numerals: &["i", "VI", "III", "VII"] },
    ProgressionTemplate { id: "minor-blues", name: "Minor Blues", numerals: &["i", "v", "iv", "i"] },
];

impl ProgressionTemplate {
    pub fn find(id: &str) -> Option<&'static ProgressionTemplate> {
        let id = id.trim().to_lowercase();
        PROGRESSION_TEMPLATES.iter().find(|t| t.id == id)
    }
}

/// Numerals of a template id, or the input split on `-`, `,` and spaces
pub fn progression_numerals(input: &str) -> Vec<&str> {
    match ProgressionTemplate::find(input) {
        Some(template) => template.numerals.to_vec(),
        None => input
            .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}
