//! Uinput virtual keyboard sink.
//!
//! Injected events are buffered and delivered as one atomic batch per
//! synchronization, so a combo like ctrl+z reaches applications as a
//! single report instead of a dribble of individual key events.

use std::io;
use std::thread;
use std::time::Duration;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use thiserror::Error;

use crate::keycodes::KEY_NAMES;
use crate::playback::KeyEventSink;

pub const DEVICE_NAME: &str = "TourBox Elite virtual keyboard";

const KEY_DOWN: i32 = 1;
const KEY_UP: i32 = 0;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("failed to create uinput virtual keyboard (is /dev/uinput accessible?)")]
    Create(#[source] io::Error),
}

/// A uinput-backed [`KeyEventSink`]. Registers every key the settings
/// compiler can name, so any compiled sequence is injectable.
pub struct VirtualKeyboard {
    device: VirtualDevice,
    pending: Vec<InputEvent>,
}

impl VirtualKeyboard {
    pub fn new(name: &str) -> Result<Self, InjectError> {
        let mut keys = AttributeSet::<Key>::new();
        for &(_, key) in KEY_NAMES {
            keys.insert(key);
        }
        let device = VirtualDeviceBuilder::new()
            .map_err(InjectError::Create)?
            .name(name)
            .with_keys(&keys)
            .map_err(InjectError::Create)?
            .build()
            .map_err(InjectError::Create)?;
        tracing::info!(name, "virtual keyboard created");
        Ok(Self {
            device,
            pending: Vec::new(),
        })
    }
}

impl KeyEventSink for VirtualKeyboard {
    fn key_down(&mut self, key: Key) -> io::Result<()> {
        self.pending
            .push(InputEvent::new(EventType::KEY, key.code(), KEY_DOWN));
        Ok(())
    }

    fn key_up(&mut self, key: Key) -> io::Result<()> {
        self.pending
            .push(InputEvent::new(EventType::KEY, key.code(), KEY_UP));
        Ok(())
    }

    fn synchronize(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        // emit appends the SYN_REPORT closing the batch
        self.device.emit(&self.pending)?;
        self.pending.clear();
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}
