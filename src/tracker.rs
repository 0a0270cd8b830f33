/*
 * Tracker Bridge Module
 *
 * This module feeds an external pointer tracker into a PointerSlot. The
 * tracker (for example a hand-tracking process following an index
 * fingertip) writes one sample per line:
 *
 *   0.42 0.61     normalized x and y
 *   none          no detection
 *
 * Samples arrive on their own thread at the tracker's cadence; each one
 * simply overwrites the slot.
 */

use std::io::BufRead;
use std::thread::{self, JoinHandle};

use crate::pointer::{PointerSignal, PointerSlot};

// Parse one line; None for lines that are not samples
pub fn parse_sample(line: &str) -> Option<PointerSignal> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if line.eq_ignore_ascii_case("none") || line.eq_ignore_ascii_case("absent") {
        return Some(PointerSignal::Absent);
    }

    let mut fields = line.split(|c: char| c.is_whitespace() || c == ',').filter(|f| !f.is_empty());
    let x = fields.next()?.parse::<f32>().ok()?;
    let y = fields.next()?.parse::<f32>().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(PointerSignal::normalized(x, y))
}

// Publish every sample from `reader`; returns the number of samples applied
pub fn pump<R: BufRead>(reader: R, slot: &PointerSlot) -> usize {
    let mut applied = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "tracker stream failed");
                break;
            }
        };
        match parse_sample(&line) {
            Some(signal) => {
                slot.publish(signal);
                applied += 1;
            }
            None => tracing::debug!(line = %line, "ignoring tracker line"),
        }
    }
    // Tracker gone: stop repelling
    slot.clear();
    applied
}

// Run `pump` on a background thread
pub fn spawn<R: BufRead + Send + 'static>(reader: R, slot: PointerSlot) -> JoinHandle<usize> {
    thread::spawn(move || {
        tracing::info!("tracker bridge started");
        let applied = pump(reader, &slot);
        tracing::info!(samples = applied, "tracker bridge finished");
        applied
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_pairs_and_absence() {
        assert_eq!(parse_sample("0.25 0.75"), Some(PointerSignal::Normalized { x: 0.25, y: 0.75 }));
        assert_eq!(parse_sample(" 0.5,0.5 "), Some(PointerSignal::Normalized { x: 0.5, y: 0.5 }));
        assert_eq!(parse_sample("NONE"), Some(PointerSignal::Absent));
        assert_eq!(parse_sample("nan 0.5"), Some(PointerSignal::Absent));
    }

    #[test]
    fn rejects_noise() {
        assert_eq!(parse_sample(""), None);
        assert_eq!(parse_sample("# comment"), None);
        assert_eq!(parse_sample("0.5"), None);
        assert_eq!(parse_sample("0.1 0.2 0.3"), None);
        assert_eq!(parse_sample("left right"), None);
    }

    #[test]
    fn background_thread_publishes_then_clears() {
        let slot = PointerSlot::new();
        let input = Cursor::new("0.1 0.1\ngarbage\n0.9 0.2\n");
        let applied = spawn(input, slot.clone()).join().unwrap();
        assert_eq!(applied, 2);
        assert_eq!(slot.latest(), PointerSignal::Absent);
    }

    #[test]
    fn last_sample_wins_while_streaming() {
        let slot = PointerSlot::new();
        let reader = Cursor::new("0.1 0.1\n0.9 0.2\n");
        for line in reader.lines() {
            if let Some(signal) = parse_sample(&line.unwrap()) {
                slot.publish(signal);
            }
        }
        assert_eq!(slot.latest(), PointerSignal::Normalized { x: 0.9, y: 0.2 });
    }
}
