//! Timed line-by-line reveal of bot text

use std::collections::VecDeque;
use std::time::Duration;

use super::transcript::MessageHandle;

/// A piece of text being written into a message one line per tick
///
/// `T` is whatever should happen once the text is fully shown. It is handed
/// back exactly once, from the tick that reveals the last non-blank line.
#[derive(Debug, Clone)]
pub struct Reveal<T> {
    /// Message being written
    target: MessageHandle,
    /// Lines not yet shown
    lines: VecDeque<String>,
    /// Time between ticks
    interval: Duration,
    /// Whether any line has been written yet
    emitted: bool,
    /// Continuation, taken on completion
    on_complete: Option<T>,
}

impl<T> Reveal<T> {
    pub fn new(target: MessageHandle, text: &str, interval: Duration, on_complete: T) -> Self {
        Self {
            target,
            lines: text.split('\n').map(str::to_string).collect(),
            interval,
            emitted: false,
            on_complete: Some(on_complete),
        }
    }

    pub fn target(&self) -> &MessageHandle {
        &self.target
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether only blank lines remain
    pub fn is_exhausted(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Next piece of text to append, if any remains
    ///
    /// A chunk is the blank lines still pending plus the next non-blank line,
    /// joined with newlines, so the appended chunks rebuild the source text
    /// apart from trailing blank lines.
    pub fn next_chunk(&mut self) -> Option<String> {
        if self.is_exhausted() {
            return None;
        }

        let mut chunk = String::new();
        while let Some(line) = self.lines.pop_front() {
            if self.emitted {
                chunk.push('\n');
            }
            let blank = line.trim().is_empty();
            chunk.push_str(&line);
            self.emitted = true;
            if !blank {
                break;
            }
        }
        Some(chunk)
    }

    /// Advance one tick
    ///
    /// Returns the chunk to append and, on the tick that finishes the text,
    /// the continuation.
    pub fn tick(&mut self) -> (Option<String>, Option<T>) {
        let chunk = self.next_chunk();
        let done = if self.is_exhausted() { self.on_complete.take() } else { None };
        (chunk, done)
    }
}
