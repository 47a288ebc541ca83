// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! ASCII tablature rendering.
//!
//! One line per string, highest string on top. Each step owns two
//! columns; fret numbers start at column `round(time / step) * 2` and a
//! later event on the same cell overwrites an earlier one.

use crate::fretboard::OpenStringTuning;
use crate::generators::ArpeggioEvent;

/// Labels of a standard six-string, top line first
pub const STANDARD_LABELS: [&str; 6] = ["e", "B", "G", "D", "A", "E"];

const EMPTY_CELL: char = '-';

/// Render events as a six-line tab (e B G D A E)
pub fn render_tab(events: &[ArpeggioEvent], seconds_per_step: f64, steps: usize) -> String {
    render_rows(events, seconds_per_step, steps, &STANDARD_LABELS)
}

/// Render events as a tab with one line per string of `tuning`
pub fn render_tab_for_tuning(
    events: &[ArpeggioEvent],
    seconds_per_step: f64,
    steps: usize,
    tuning: &OpenStringTuning,
) -> String {
    let labels = tuning.labels();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(1);
    let padded: Vec<String> = labels.iter().map(|l| format!("{:<width$}", l, width = width)).collect();
    render_rows(events, seconds_per_step, steps, &padded)
}

fn render_rows<L: AsRef<str>>(
    events: &[ArpeggioEvent],
    seconds_per_step: f64,
    steps: usize,
    labels: &[L],
) -> String {
    let width = steps * 2 + 1;
    let mut rows = vec![vec![EMPTY_CELL; width]; labels.len()];

    if seconds_per_step > 0.0 {
        for event in events {
            // String 1 is the top line
            let Some(row) = (event.string as usize).checked_sub(1).and_then(|r| rows.get_mut(r)) else {
                continue;
            };
            let column = (event.time / seconds_per_step).round();
            if !column.is_finite() || column < 0.0 || column * 2.0 >= width as f64 {
                continue;
            }
            let column = column as usize * 2;

            for (offset, digit) in event.fret.to_string().chars().enumerate() {
                if let Some(cell) = row.get_mut(column + offset) {
                    *cell = digit;
                }
            }
        }
    }

    labels
        .iter()
        .zip(rows)
        .map(|(label, cells)| format!("{}|{}|", label.as_ref(), cells.into_iter().collect::<String>()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(time: f64, string: u8, fret: u8) -> ArpeggioEvent {
        ArpeggioEvent {
            time,
            duration: 0.2,
            note: String::new(),
            string,
            fret,
            finger: 1,
        }
    }

    #[test]
    fn test_empty_tab_shape() {
        let tab = render_tab(&[], 0.25, 4);
        let lines: Vec<&str> = tab.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "e|---------|");
        assert_eq!(lines[5], "E|---------|");
    }

    #[test]
    fn test_places_frets_by_time() {
        let events = vec![event(0.0, 6, 3), event(0.25, 1, 2), event(0.5, 3, 12)];
        let tab = render_tab(&events, 0.25, 4);
        let lines: Vec<&str> = tab.lines().collect();

        assert_eq!(lines[5], "E|3--------|");
        assert_eq!(lines[0], "e|--2------|");
        assert_eq!(lines[2], "G|----12---|");
    }

    #[test]
    fn test_all_lines_equal_length() {
        let events: Vec<ArpeggioEvent> = (0..8).map(|i| event(i as f64 * 0.25, (i % 6 + 1) as u8, 10)).collect();
        let tab = render_tab(&events, 0.25, 8);
        let lengths: Vec<usize> = tab.lines().map(str::len).collect();
        assert_eq!(lengths.len(), 6);
        assert!(lengths.iter().all(|&l| l == 2 + 8 * 2 + 1 + 1));
    }

    #[test]
    fn test_out_of_range_events_ignored() {
        let events = vec![event(0.0, 0, 5), event(0.0, 7, 5), event(10.0, 1, 5)];
        assert_eq!(render_tab(&events, 0.25, 2), render_tab(&[], 0.25, 2));
    }

    #[test]
    fn test_far_future_event_ignored() {
        let events = vec![
            event(1e300, 1, 5),
            event(f64::MAX, 2, 5),
            event(f64::INFINITY, 3, 5),
            event(f64::NAN, 4, 5),
            event(-1e300, 5, 5),
        ];
        assert_eq!(render_tab(&events, 0.25, 4), render_tab(&[], 0.25, 4));

        // Tiny step pushes an ordinary time far past the last column
        assert_eq!(render_tab(&[event(1.0, 1, 5)], 1e-300, 4), render_tab(&[], 1e-300, 4));
    }

    #[test]
    fn test_two_digit_fret_clipped_at_edge() {
        let tab = render_tab(&[event(0.25, 1, 15)], 0.25, 1);
        assert_eq!(tab.lines().next().unwrap(), "e|--1|");
    }

    #[test]
    fn test_zero_step_renders_blank() {
        let tab = render_tab(&[event(0.0, 1, 5)], 0.0, 2);
        assert!(tab.lines().all(|l| !l.contains('5')));
    }

    #[test]
    fn test_tuning_labels_padded() {
        let tuning = OpenStringTuning::from_note_names(&["B", "E", "A", "D", "G", "B", "E"]).unwrap();
        let tab = render_tab_for_tuning(&[event(0.0, 7, 2)], 0.5, 2, &tuning);
        let lines: Vec<&str> = tab.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("e|"));
        assert_eq!(lines[6], "B|2----|");
    }
}
