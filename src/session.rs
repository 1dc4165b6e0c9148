//! Session controller.
//!
//! Single-threaded driver loop: block on the device read with a 500 ms
//! timeout, feed every received byte through the decoder and play matching
//! bindings, and use the timeout gaps to re-poll window focus. A setup
//! frame goes to the device only when the active profile actually changes,
//! so focus bouncing between windows of the same application costs nothing.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::decoder::{Decoded, InputDecoder};
use crate::focus::FocusProbe;
use crate::playback::{play, KeyEventSink};
use crate::profile::{ProfileId, ProfileStore};
use crate::setup_frame::encode_setup_frame;
use crate::transport::{DeviceTransport, READ_TIMEOUT};

#[derive(Debug, Error)]
pub enum SessionError {
    /// Device communication failed. Fatal: once a setup frame write fails
    /// the hardware's haptic state can no longer be trusted.
    #[error(transparent)]
    Transport(#[from] crate::transport::TransportError),
    #[error("key injection failed")]
    Inject(#[from] io::Error),
}

pub struct Session<T, S, F> {
    transport: T,
    sink: S,
    focus: F,
    store: ProfileStore,
    decoder: InputDecoder,
    active: Option<ProfileId>,
    stop: Arc<AtomicBool>,
}

impl<T, S, F> Session<T, S, F>
where
    T: DeviceTransport,
    S: KeyEventSink,
    F: FocusProbe,
{
    pub fn new(transport: T, sink: S, focus: F, store: ProfileStore, stop: Arc<AtomicBool>) -> Self {
        Self {
            transport,
            sink,
            focus,
            store,
            decoder: InputDecoder::new(),
            active: None,
            stop,
        }
    }

    /// Run until the stop flag is raised or the transport fails. In-flight
    /// playback (including pauses) finishes before the flag is honored.
    pub fn run(&mut self) -> Result<(), SessionError> {
        // Quiescent frame first: haptics off until a profile takes over.
        self.transport.write(&encode_setup_frame(None))?;

        let mut buf = [0u8; 64];
        while !self.stop.load(Ordering::Relaxed) {
            let n = self.transport.read_timeout(&mut buf, READ_TIMEOUT)?;
            if n == 0 {
                self.check_focus()?;
                continue;
            }
            for &byte in &buf[..n] {
                self.handle_byte(byte)?;
            }
        }
        tracing::info!("session stopped");
        Ok(())
    }

    fn handle_byte(&mut self, byte: u8) -> Result<(), SessionError> {
        match self.decoder.process(byte) {
            Decoded::Trigger(trigger) => {
                let Some(profile) = self.active.and_then(|id| self.store.get(id)) else {
                    return Ok(());
                };
                if let Some(sequence) = profile.sequence_for(trigger.control, trigger.modifier) {
                    tracing::debug!(control = %trigger.control, "playing binding");
                    play(sequence, &mut self.sink)?;
                }
                Ok(())
            }
            // releases only update modifier state; unknown bytes are
            // already logged by the decoder
            Decoded::StateOnly | Decoded::Unknown(_) => Ok(()),
        }
    }

    fn check_focus(&mut self) -> Result<(), SessionError> {
        // a failed query keeps the current profile; a transient xprop
        // hiccup must not drop the active haptics and bindings
        let Some(name) = self.focus.focused_window_name() else {
            return Ok(());
        };
        let hit = self.store.lookup(&name);
        let new_active = hit.map(|(id, _)| id);
        if new_active == self.active {
            return Ok(());
        }
        self.transport
            .write(&encode_setup_frame(hit.map(|(_, p)| p)))?;
        match hit {
            Some((_, profile)) => tracing::info!(pattern = profile.pattern(), "profile activated"),
            None => tracing::info!("no profile matches the focused window"),
        }
        self.active = new_active;
        Ok(())
    }
}
