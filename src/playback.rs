//! Key sequence playback.
//!
//! Drives a [`KeyEventSink`] through the steps of a compiled sequence.
//! Keys pressed since the last flush form the current combo batch; a flush
//! synchronizes the sink, then releases the batch in press order and
//! synchronizes again. Sequences that do not end in an explicit flush get
//! one appended at playback time, so a trailing combo releases together
//! and no key stays down past the end.

use std::io;
use std::time::Duration;

use evdev::Key;

use crate::profile::{KeySequence, Step};

/// Where injected key events go. The production implementation is the
/// uinput virtual keyboard; tests substitute a recorder so playback stays
/// deterministic and sleep-free.
pub trait KeyEventSink {
    fn key_down(&mut self, key: Key) -> io::Result<()>;
    fn key_up(&mut self, key: Key) -> io::Result<()>;
    /// Deliver everything buffered since the previous synchronization.
    fn synchronize(&mut self) -> io::Result<()>;
    /// Block playback for the given duration.
    fn pause(&mut self, duration: Duration);
}

fn flush(sink: &mut dyn KeyEventSink, batch: &mut Vec<Key>) -> io::Result<()> {
    sink.synchronize()?;
    if batch.is_empty() {
        return Ok(());
    }
    for key in batch.drain(..) {
        sink.key_up(key)?;
    }
    sink.synchronize()
}

/// Play one compiled sequence. An empty sequence is a no-op.
pub fn play(sequence: &KeySequence, sink: &mut dyn KeyEventSink) -> io::Result<()> {
    if sequence.is_empty() {
        return Ok(());
    }
    let mut batch: Vec<Key> = Vec::new();
    for step in sequence.steps() {
        match *step {
            Step::Key(key) => {
                sink.key_down(key)?;
                batch.push(key);
            }
            Step::Flush => flush(sink, &mut batch)?,
            Step::Pause(duration) => sink.pause(duration),
        }
    }
    if !sequence.ends_with_flush() {
        flush(sink, &mut batch)?;
    }
    Ok(())
}
