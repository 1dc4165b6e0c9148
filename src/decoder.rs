//! Input event decoder.
//!
//! Turns the device's raw byte stream into bindable triggers while
//! tracking which momentary control, if any, is currently held as a combo
//! modifier. The decoder owns all of its state and keeps tracking even
//! while no profile is active, so held-button context is correct the
//! moment focus lands on a mapped window.

use crate::controls::{decode_byte, Control, MomentaryControl, RawEvent};
use crate::profile::ModifierContext;

/// A control activation to look up in the active profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub control: Control,
    /// The modifier held when the trigger fired, captured before the
    /// trigger itself could be adopted as a modifier.
    pub modifier: ModifierContext,
}

/// Outcome of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A press or turn the caller should play back.
    Trigger(Trigger),
    /// A release; modifier state may have changed, nothing to play.
    StateOnly,
    /// Byte matched no known control. Logged, otherwise ignored.
    Unknown(u8),
}

/// Per-device decode state machine.
///
/// At most one modifier is held at a time: the earliest-pressed unreleased
/// momentary control. Presses arriving while one is held still fire (under
/// the already-held modifier) but are not adopted, and only the release of
/// the held control itself clears the slot.
#[derive(Debug, Default)]
pub struct InputDecoder {
    held: Option<MomentaryControl>,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently held modifier, if any.
    pub fn held(&self) -> ModifierContext {
        self.held
    }

    pub fn process(&mut self, byte: u8) -> Decoded {
        match decode_byte(byte) {
            Some(RawEvent::Press(control)) => {
                let trigger = Trigger {
                    control: Control::Momentary(control),
                    modifier: self.held,
                };
                if self.held.is_none() {
                    self.held = Some(control);
                }
                Decoded::Trigger(trigger)
            }
            Some(RawEvent::Release(control)) => {
                if self.held == Some(control) {
                    self.held = None;
                }
                Decoded::StateOnly
            }
            Some(RawEvent::Turn(widget, direction)) => Decoded::Trigger(Trigger {
                control: Control::Rotary(widget, direction),
                modifier: self.held,
            }),
            None => {
                tracing::warn!(byte, "unrecognized input byte");
                Decoded::Unknown(byte)
            }
        }
    }
}
