//! Focused-window query.
//!
//! The session controller only needs the title of whichever window has
//! input focus. On X11 that is two `xprop` hops: the root window's
//! `_NET_ACTIVE_WINDOW` id, then that window's `_NET_WM_NAME`.

use std::process::Command;

/// Seam for the focus query so session tests can script focus changes.
pub trait FocusProbe {
    /// Title of the focused window, or `None` when it cannot be determined
    /// (no X session, no focused window, tooling missing).
    fn focused_window_name(&mut self) -> Option<String>;
}

const XPROP_PIPELINE: &str =
    r"xprop -id $(xprop -root 32x '\t$0' _NET_ACTIVE_WINDOW | cut -f 2) _NET_WM_NAME";

/// X11 implementation shelling out to `xprop`.
#[derive(Debug, Default)]
pub struct XpropFocus;

impl FocusProbe for XpropFocus {
    fn focused_window_name(&mut self) -> Option<String> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(XPROP_PIPELINE)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        // stdout looks like: _NET_WM_NAME(UTF8_STRING) = "window title"
        let text = String::from_utf8_lossy(&output.stdout);
        let start = text.find('"')? + 1;
        let end = text.rfind('"')?;
        if end <= start {
            return None;
        }
        Some(text[start..end].to_string())
    }
}
