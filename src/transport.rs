//! HID transport to the TourBox Elite.
//!
//! One trait seam so the session controller can run against a scripted
//! transport in tests, and one hidapi implementation for the real device.

use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use thiserror::Error;

pub const TOURBOX_VID: u16 = 0xC251;
pub const TOURBOX_PID: u16 = 0x2005;

/// Wakes the device and switches it into its input-reporting mode.
pub const INIT_MESSAGE: [u8; 8] = [0x55, 0x00, 0x07, 0x88, 0x94, 0x00, 0x1a, 0xfe];
/// Length of the identification blob answering the init message.
pub const INIT_RESPONSE_LEN: usize = 26;

/// Poll interval of the session loop.
pub const READ_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open TourBox Elite ({TOURBOX_VID:04x}:{TOURBOX_PID:04x})")]
    Open(#[source] hidapi::HidError),
    #[error("device write failed")]
    Write(#[source] hidapi::HidError),
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
    #[error("device read failed")]
    Read(#[source] hidapi::HidError),
    #[error("handshake failed: expected a {INIT_RESPONSE_LEN}-byte response, got {got} bytes")]
    Handshake { got: usize },
}

/// Byte-level device access. `read_timeout` returns `Ok(0)` when the
/// timeout elapses without data.
pub trait DeviceTransport {
    fn write(&mut self, data: &[u8]) -> Result<(), TransportError>;
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, TransportError>;
}

/// hidapi-backed transport for the real device.
pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    /// Open the first attached TourBox Elite.
    pub fn open() -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(TransportError::Open)?;
        let device = api
            .open(TOURBOX_VID, TOURBOX_PID)
            .map_err(TransportError::Open)?;
        Ok(Self { device })
    }

    /// Send the init message and consume the identification response.
    /// The device does not report input until this completes.
    pub fn handshake(&mut self) -> Result<(), TransportError> {
        self.write(&INIT_MESSAGE)?;
        let mut response = [0u8; INIT_RESPONSE_LEN];
        let got = self.read_timeout(&mut response, READ_TIMEOUT)?;
        if got != INIT_RESPONSE_LEN {
            return Err(TransportError::Handshake { got });
        }
        tracing::debug!(?response, "handshake response");
        Ok(())
    }
}

impl DeviceTransport for HidTransport {
    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let written = self.device.write(data).map_err(TransportError::Write)?;
        if written != data.len() {
            return Err(TransportError::ShortWrite {
                written,
                expected: data.len(),
            });
        }
        Ok(())
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, TransportError> {
        self.device
            .read_timeout(buf, timeout.as_millis() as i32)
            .map_err(TransportError::Read)
    }
}
