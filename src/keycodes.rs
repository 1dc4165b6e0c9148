// Keyboard symbol registry
// KEY_* names as written in settings files, mapped to evdev key codes,
// plus the printable-character table used by quoted string literals.

use evdev::Key;

/// Name table for every key code a settings file may reference. Also the
/// capability set registered on the virtual keyboard, so anything parseable
/// is also injectable.
pub const KEY_NAMES: &[(&str, Key)] = &[
    ("KEY_ESC", Key::KEY_ESC),
    ("KEY_1", Key::KEY_1),
    ("KEY_2", Key::KEY_2),
    ("KEY_3", Key::KEY_3),
    ("KEY_4", Key::KEY_4),
    ("KEY_5", Key::KEY_5),
    ("KEY_6", Key::KEY_6),
    ("KEY_7", Key::KEY_7),
    ("KEY_8", Key::KEY_8),
    ("KEY_9", Key::KEY_9),
    ("KEY_0", Key::KEY_0),
    ("KEY_MINUS", Key::KEY_MINUS),
    ("KEY_EQUAL", Key::KEY_EQUAL),
    ("KEY_BACKSPACE", Key::KEY_BACKSPACE),
    ("KEY_TAB", Key::KEY_TAB),
    ("KEY_Q", Key::KEY_Q),
    ("KEY_W", Key::KEY_W),
    ("KEY_E", Key::KEY_E),
    ("KEY_R", Key::KEY_R),
    ("KEY_T", Key::KEY_T),
    ("KEY_Y", Key::KEY_Y),
    ("KEY_U", Key::KEY_U),
    ("KEY_I", Key::KEY_I),
    ("KEY_O", Key::KEY_O),
    ("KEY_P", Key::KEY_P),
    ("KEY_LEFTBRACE", Key::KEY_LEFTBRACE),
    ("KEY_RIGHTBRACE", Key::KEY_RIGHTBRACE),
    ("KEY_ENTER", Key::KEY_ENTER),
    ("KEY_LEFTCTRL", Key::KEY_LEFTCTRL),
    ("KEY_A", Key::KEY_A),
    ("KEY_S", Key::KEY_S),
    ("KEY_D", Key::KEY_D),
    ("KEY_F", Key::KEY_F),
    ("KEY_G", Key::KEY_G),
    ("KEY_H", Key::KEY_H),
    ("KEY_J", Key::KEY_J),
    ("KEY_K", Key::KEY_K),
    ("KEY_L", Key::KEY_L),
    ("KEY_SEMICOLON", Key::KEY_SEMICOLON),
    ("KEY_APOSTROPHE", Key::KEY_APOSTROPHE),
    ("KEY_GRAVE", Key::KEY_GRAVE),
    ("KEY_LEFTSHIFT", Key::KEY_LEFTSHIFT),
    ("KEY_BACKSLASH", Key::KEY_BACKSLASH),
    ("KEY_Z", Key::KEY_Z),
    ("KEY_X", Key::KEY_X),
    ("KEY_C", Key::KEY_C),
    ("KEY_V", Key::KEY_V),
    ("KEY_B", Key::KEY_B),
    ("KEY_N", Key::KEY_N),
    ("KEY_M", Key::KEY_M),
    ("KEY_COMMA", Key::KEY_COMMA),
    ("KEY_DOT", Key::KEY_DOT),
    ("KEY_SLASH", Key::KEY_SLASH),
    ("KEY_RIGHTSHIFT", Key::KEY_RIGHTSHIFT),
    ("KEY_KPASTERISK", Key::KEY_KPASTERISK),
    ("KEY_LEFTALT", Key::KEY_LEFTALT),
    ("KEY_SPACE", Key::KEY_SPACE),
    ("KEY_CAPSLOCK", Key::KEY_CAPSLOCK),
    ("KEY_F1", Key::KEY_F1),
    ("KEY_F2", Key::KEY_F2),
    ("KEY_F3", Key::KEY_F3),
    ("KEY_F4", Key::KEY_F4),
    ("KEY_F5", Key::KEY_F5),
    ("KEY_F6", Key::KEY_F6),
    ("KEY_F7", Key::KEY_F7),
    ("KEY_F8", Key::KEY_F8),
    ("KEY_F9", Key::KEY_F9),
    ("KEY_F10", Key::KEY_F10),
    ("KEY_F11", Key::KEY_F11),
    ("KEY_F12", Key::KEY_F12),
    ("KEY_F13", Key::KEY_F13),
    ("KEY_F14", Key::KEY_F14),
    ("KEY_F15", Key::KEY_F15),
    ("KEY_F16", Key::KEY_F16),
    ("KEY_F17", Key::KEY_F17),
    ("KEY_F18", Key::KEY_F18),
    ("KEY_F19", Key::KEY_F19),
    ("KEY_F20", Key::KEY_F20),
    ("KEY_F21", Key::KEY_F21),
    ("KEY_F22", Key::KEY_F22),
    ("KEY_F23", Key::KEY_F23),
    ("KEY_F24", Key::KEY_F24),
    ("KEY_NUMLOCK", Key::KEY_NUMLOCK),
    ("KEY_SCROLLLOCK", Key::KEY_SCROLLLOCK),
    ("KEY_KP0", Key::KEY_KP0),
    ("KEY_KP1", Key::KEY_KP1),
    ("KEY_KP2", Key::KEY_KP2),
    ("KEY_KP3", Key::KEY_KP3),
    ("KEY_KP4", Key::KEY_KP4),
    ("KEY_KP5", Key::KEY_KP5),
    ("KEY_KP6", Key::KEY_KP6),
    ("KEY_KP7", Key::KEY_KP7),
    ("KEY_KP8", Key::KEY_KP8),
    ("KEY_KP9", Key::KEY_KP9),
    ("KEY_KPMINUS", Key::KEY_KPMINUS),
    ("KEY_KPPLUS", Key::KEY_KPPLUS),
    ("KEY_KPDOT", Key::KEY_KPDOT),
    ("KEY_KPENTER", Key::KEY_KPENTER),
    ("KEY_KPSLASH", Key::KEY_KPSLASH),
    ("KEY_KPEQUAL", Key::KEY_KPEQUAL),
    ("KEY_RIGHTCTRL", Key::KEY_RIGHTCTRL),
    ("KEY_RIGHTALT", Key::KEY_RIGHTALT),
    ("KEY_LEFTMETA", Key::KEY_LEFTMETA),
    ("KEY_RIGHTMETA", Key::KEY_RIGHTMETA),
    ("KEY_COMPOSE", Key::KEY_COMPOSE),
    ("KEY_SYSRQ", Key::KEY_SYSRQ),
    ("KEY_HOME", Key::KEY_HOME),
    ("KEY_UP", Key::KEY_UP),
    ("KEY_PAGEUP", Key::KEY_PAGEUP),
    ("KEY_LEFT", Key::KEY_LEFT),
    ("KEY_RIGHT", Key::KEY_RIGHT),
    ("KEY_END", Key::KEY_END),
    ("KEY_DOWN", Key::KEY_DOWN),
    ("KEY_PAGEDOWN", Key::KEY_PAGEDOWN),
    ("KEY_INSERT", Key::KEY_INSERT),
    ("KEY_DELETE", Key::KEY_DELETE),
    ("KEY_MUTE", Key::KEY_MUTE),
    ("KEY_VOLUMEDOWN", Key::KEY_VOLUMEDOWN),
    ("KEY_VOLUMEUP", Key::KEY_VOLUMEUP),
    ("KEY_PAUSE", Key::KEY_PAUSE),
    ("KEY_STOP", Key::KEY_STOP),
    ("KEY_AGAIN", Key::KEY_AGAIN),
    ("KEY_UNDO", Key::KEY_UNDO),
    ("KEY_COPY", Key::KEY_COPY),
    ("KEY_OPEN", Key::KEY_OPEN),
    ("KEY_PASTE", Key::KEY_PASTE),
    ("KEY_FIND", Key::KEY_FIND),
    ("KEY_CUT", Key::KEY_CUT),
    ("KEY_HELP", Key::KEY_HELP),
    ("KEY_MENU", Key::KEY_MENU),
    ("KEY_CALC", Key::KEY_CALC),
    ("KEY_SLEEP", Key::KEY_SLEEP),
    ("KEY_WAKEUP", Key::KEY_WAKEUP),
    ("KEY_NEXTSONG", Key::KEY_NEXTSONG),
    ("KEY_PLAYPAUSE", Key::KEY_PLAYPAUSE),
    ("KEY_PREVIOUSSONG", Key::KEY_PREVIOUSSONG),
    ("KEY_STOPCD", Key::KEY_STOPCD),
    ("KEY_REFRESH", Key::KEY_REFRESH),
    ("KEY_BACK", Key::KEY_BACK),
    ("KEY_FORWARD", Key::KEY_FORWARD),
    ("KEY_SCROLLUP", Key::KEY_SCROLLUP),
    ("KEY_SCROLLDOWN", Key::KEY_SCROLLDOWN),
    ("KEY_ZOOMIN", Key::KEY_ZOOMIN),
    ("KEY_ZOOMOUT", Key::KEY_ZOOMOUT),
    ("KEY_ZOOMRESET", Key::KEY_ZOOMRESET),
    ("KEY_BRIGHTNESSDOWN", Key::KEY_BRIGHTNESSDOWN),
    ("KEY_BRIGHTNESSUP", Key::KEY_BRIGHTNESSUP),
    ("KEY_MICMUTE", Key::KEY_MICMUTE),
];

/// Look up a key by its settings-file name (e.g. `KEY_A`).
pub fn key_from_name(name: &str) -> Option<Key> {
    KEY_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, key)| key)
}

/// Reverse lookup, for diagnostics and listings.
pub fn key_name(key: Key) -> Option<&'static str> {
    KEY_NAMES.iter().find(|&&(_, k)| k == key).map(|&(n, _)| n)
}

/// The keystroke needed to type one printable character: a key, optionally
/// combined with left shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharKeys {
    pub shift: bool,
    pub key: Key,
}

impl CharKeys {
    fn plain(key: Key) -> Self {
        Self { shift: false, key }
    }

    fn shifted(key: Key) -> Self {
        Self { shift: true, key }
    }

    /// Number of sequence steps this character contributes when expanded
    /// from a quoted literal: one combo-flush plus one or two key-downs.
    pub fn step_count(self) -> usize {
        if self.shift {
            3
        } else {
            2
        }
    }
}

/// Map a printable character to the keystroke that types it on a US layout.
/// Returns `None` for characters we cannot type (treated as non-printable
/// by the settings compiler).
pub fn keys_for_char(c: char) -> Option<CharKeys> {
    if c.is_ascii_lowercase() {
        let name = format!("KEY_{}", c.to_ascii_uppercase());
        return key_from_name(&name).map(CharKeys::plain);
    }
    if c.is_ascii_uppercase() {
        let name = format!("KEY_{c}");
        return key_from_name(&name).map(CharKeys::shifted);
    }
    if c.is_ascii_digit() {
        let name = format!("KEY_{c}");
        return key_from_name(&name).map(CharKeys::plain);
    }

    let keys = match c {
        ' ' => CharKeys::plain(Key::KEY_SPACE),
        '.' => CharKeys::plain(Key::KEY_DOT),
        ',' => CharKeys::plain(Key::KEY_COMMA),
        '/' => CharKeys::plain(Key::KEY_SLASH),
        ';' => CharKeys::plain(Key::KEY_SEMICOLON),
        '\'' => CharKeys::plain(Key::KEY_APOSTROPHE),
        '-' => CharKeys::plain(Key::KEY_MINUS),
        '=' => CharKeys::plain(Key::KEY_EQUAL),
        '`' => CharKeys::plain(Key::KEY_GRAVE),
        '[' => CharKeys::plain(Key::KEY_LEFTBRACE),
        ']' => CharKeys::plain(Key::KEY_RIGHTBRACE),
        '\\' => CharKeys::plain(Key::KEY_BACKSLASH),
        '!' => CharKeys::shifted(Key::KEY_1),
        '@' => CharKeys::shifted(Key::KEY_2),
        '#' => CharKeys::shifted(Key::KEY_3),
        '$' => CharKeys::shifted(Key::KEY_4),
        '%' => CharKeys::shifted(Key::KEY_5),
        '^' => CharKeys::shifted(Key::KEY_6),
        '&' => CharKeys::shifted(Key::KEY_7),
        '*' => CharKeys::shifted(Key::KEY_8),
        '(' => CharKeys::shifted(Key::KEY_9),
        ')' => CharKeys::shifted(Key::KEY_0),
        '_' => CharKeys::shifted(Key::KEY_MINUS),
        '+' => CharKeys::shifted(Key::KEY_EQUAL),
        '{' => CharKeys::shifted(Key::KEY_LEFTBRACE),
        '}' => CharKeys::shifted(Key::KEY_RIGHTBRACE),
        '|' => CharKeys::shifted(Key::KEY_BACKSLASH),
        ':' => CharKeys::shifted(Key::KEY_SEMICOLON),
        '"' => CharKeys::shifted(Key::KEY_APOSTROPHE),
        '<' => CharKeys::shifted(Key::KEY_COMMA),
        '>' => CharKeys::shifted(Key::KEY_DOT),
        '?' => CharKeys::shifted(Key::KEY_SLASH),
        '~' => CharKeys::shifted(Key::KEY_GRAVE),
        _ => return None,
    };
    Some(keys)
}
