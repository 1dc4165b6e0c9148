// TourBox Elite control registry
// Wire codes and names for the 20 bindable physical controls

use std::fmt;

/// Low 6 bits of an input byte identify the control.
pub const CONTROL_CODE_MASK: u8 = 0x3F;
/// High 2 bits carry press/release or turn direction.
pub const ACTION_MASK: u8 = 0xC0;

pub const ACTION_PRESS: u8 = 0x00;
pub const ACTION_RELEASE: u8 = 0x80;
pub const ACTION_CCW_DOWN: u8 = 0x00;
pub const ACTION_CW_UP: u8 = 0x40;

/// A control that supports discrete press and release, and may therefore
/// be held down as a combo modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MomentaryControl {
    Tall,
    Side,
    Top,
    Short,
    ScrollPress,
    Up,
    Down,
    Left,
    Right,
    C1,
    C2,
    Tour,
    KnobPress,
    DialPress,
}

impl MomentaryControl {
    pub const ALL: [Self; 14] = [
        Self::Tall,
        Self::Side,
        Self::Top,
        Self::Short,
        Self::ScrollPress,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::C1,
        Self::C2,
        Self::Tour,
        Self::KnobPress,
        Self::DialPress,
    ];

    /// Wire code carried in the low 6 bits of an input byte.
    pub fn code(self) -> u8 {
        match self {
            Self::Tall => 0x00,
            Self::Side => 0x01,
            Self::Top => 0x02,
            Self::Short => 0x03,
            Self::ScrollPress => 0x0A,
            Self::Up => 0x10,
            Self::Down => 0x11,
            Self::Left => 0x12,
            Self::Right => 0x13,
            Self::C1 => 0x22,
            Self::C2 => 0x23,
            Self::Tour => 0x2A,
            Self::KnobPress => 0x37,
            Self::DialPress => 0x38,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Tall => "TALL",
            Self::Side => "SIDE",
            Self::Top => "TOP",
            Self::Short => "SHORT",
            Self::ScrollPress => "SCROLL_PRESS",
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::Tour => "TOUR",
            Self::KnobPress => "KNOB_PRESS",
            Self::DialPress => "DIAL_PRESS",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

/// One of the three rotating widgets. Rotaries only report continuous
/// turn(direction) events; there is no discrete release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotaryWidget {
    Knob,
    Scroll,
    Dial,
}

impl RotaryWidget {
    pub const ALL: [Self; 3] = [Self::Knob, Self::Scroll, Self::Dial];

    pub fn code(self) -> u8 {
        match self {
            Self::Knob => 0x04,
            Self::Scroll => 0x09,
            Self::Dial => 0x0F,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Knob => "KNOB_TURN",
            Self::Scroll => "SCROLL_TURN",
            Self::Dial => "DIAL_TURN",
        }
    }
}

/// Turn direction of a rotary widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnDirection {
    /// Counter-clockwise, or scroll-down.
    CcwDown,
    /// Clockwise, or scroll-up.
    CwUp,
}

impl TurnDirection {
    pub fn action_bits(self) -> u8 {
        match self {
            Self::CcwDown => ACTION_CCW_DOWN,
            Self::CwUp => ACTION_CW_UP,
        }
    }

    /// Direction suffix used in control names (KNOB_TURN_CCW, SCROLL_TURN_UP, ...).
    fn suffix(self, widget: RotaryWidget) -> &'static str {
        match (widget, self) {
            (RotaryWidget::Scroll, Self::CcwDown) => "DOWN",
            (RotaryWidget::Scroll, Self::CwUp) => "UP",
            (_, Self::CcwDown) => "CCW",
            (_, Self::CwUp) => "CW",
        }
    }
}

/// Any bindable control: a momentary button, or one direction of a rotary
/// widget. Settings-file binding lines name controls at this granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Momentary(MomentaryControl),
    Rotary(RotaryWidget, TurnDirection),
}

impl Control {
    /// All 20 bindable controls, in registry order.
    pub fn all() -> impl Iterator<Item = Self> {
        let momentary = MomentaryControl::ALL.into_iter().map(Self::Momentary);
        let rotary = RotaryWidget::ALL.into_iter().flat_map(|w| {
            [TurnDirection::CcwDown, TurnDirection::CwUp]
                .into_iter()
                .map(move |d| Self::Rotary(w, d))
        });
        momentary.chain(rotary)
    }

    /// Parse a control name as written in the settings file.
    pub fn from_name(name: &str) -> Option<Self> {
        for c in Self::all() {
            if c.to_string() == name {
                return Some(c);
            }
        }
        None
    }

    /// The momentary control, if this is one.
    pub fn as_momentary(self) -> Option<MomentaryControl> {
        match self {
            Self::Momentary(m) => Some(m),
            Self::Rotary(..) => None,
        }
    }

    /// The rotary widget, if this is a turn control.
    pub fn as_rotary(self) -> Option<RotaryWidget> {
        match self {
            Self::Momentary(_) => None,
            Self::Rotary(w, _) => Some(w),
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Momentary(m) => f.write_str(m.name()),
            Self::Rotary(w, d) => write!(f, "{}_{}", w.name(), d.suffix(w)),
        }
    }
}

/// A classified input byte from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    Press(MomentaryControl),
    Release(MomentaryControl),
    Turn(RotaryWidget, TurnDirection),
}

/// Classify one raw input byte.
///
/// Rotary turn events match against the full byte (the direction bits are
/// part of their identity); momentary press/release events match only the
/// low 6-bit control code, with the high bits selecting press vs release.
/// Returns `None` for bytes that match neither scheme.
pub fn decode_byte(byte: u8) -> Option<RawEvent> {
    // Full-byte match first: turn events
    for widget in RotaryWidget::ALL {
        for dir in [TurnDirection::CcwDown, TurnDirection::CwUp] {
            if widget.code() | dir.action_bits() == byte {
                return Some(RawEvent::Turn(widget, dir));
            }
        }
    }

    // Low-bits match: momentary press/release
    let control = MomentaryControl::from_code(byte & CONTROL_CODE_MASK)?;
    match byte & ACTION_MASK {
        ACTION_PRESS => Some(RawEvent::Press(control)),
        ACTION_RELEASE => Some(RawEvent::Release(control)),
        _ => None,
    }
}
