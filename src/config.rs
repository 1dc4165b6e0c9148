//! Settings-file compiler.
//!
//! The settings format is line oriented:
//!
//! ```text
//! # GIMP: dial zooms, C1 types a greeting
//! "GIMP"
//! DIAL_TURN_CW H2 R2 KEY_EQUAL
//! DIAL_TURN_CCW H2 R2 KEY_MINUS
//! TALL DIAL_TURN_CW KEY_LEFTCTRL KEY_Z
//! C1 "Hello!" > SLEEP_250 KEY_ENTER
//! ```
//!
//! A line whose first character is `"` opens a new profile; its quoted text
//! is matched as a substring of the focused-window name. Every other
//! non-comment line is a binding for the most recently opened profile:
//! an optional held modifier, the triggering control, optional `H0..H2`
//! haptic and `R0..R2` rotation-speed flags (rotary triggers only), then
//! the key-sequence steps. Steps are `KEY_*` names, `>` (release everything
//! pressed since the last `>`), `SLEEP_<ms>`, or a double-quoted literal
//! typed character by character.
//!
//! Compilation never fails: bad lines are skipped with a line-numbered
//! [`Diagnostic`] and everything else still loads.

use std::fmt;
use std::time::Duration;

use evdev::Key;

use crate::controls::Control;
use crate::keycodes::{key_from_name, keys_for_char};
use crate::profile::{
    Haptic, KeySequence, ModifierContext, Profile, ProfileStore, RotarySettings, RotationSpeed,
    Step, MAX_PATTERN_LEN, MAX_PROFILES,
};

const SLEEP_PREFIX: &str = "SLEEP_";
const MAX_SLEEP_DIGITS: usize = 9;

/// A non-fatal compilation problem, tied to its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of compiling one settings file.
#[derive(Debug, Default)]
pub struct CompileOutput {
    pub store: ProfileStore,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Flush,
    Word(&'a str),
    Quoted { text: &'a str, terminated: bool },
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut it = line.char_indices().peekable();
    while let Some(&(i, c)) = it.peek() {
        if c.is_whitespace() {
            it.next();
            continue;
        }
        if c == '>' {
            it.next();
            tokens.push(Token::Flush);
            continue;
        }
        if c == '"' {
            it.next();
            let start = i + 1;
            let mut end = line.len();
            let mut terminated = false;
            for (j, d) in it.by_ref() {
                if d == '"' {
                    end = j;
                    terminated = true;
                    break;
                }
            }
            tokens.push(Token::Quoted {
                text: &line[start..end],
                terminated,
            });
            continue;
        }
        let start = i;
        let mut end = line.len();
        while let Some(&(j, d)) = it.peek() {
            if d.is_whitespace() || d == '>' || d == '"' {
                end = j;
                break;
            }
            it.next();
        }
        tokens.push(Token::Word(&line[start..end]));
    }
    tokens
}

struct ParsedBinding {
    primary: Control,
    modifier: ModifierContext,
    haptic: Option<Haptic>,
    speed: Option<RotationSpeed>,
    saw_flags: bool,
    sequence: KeySequence,
}

struct BindingError {
    /// Slot to wipe so a bad rewrite cannot leave an earlier binding live.
    slot: Option<(Control, ModifierContext)>,
    message: String,
}

impl BindingError {
    fn new(slot: Option<(Control, ModifierContext)>, message: impl Into<String>) -> Self {
        Self {
            slot,
            message: message.into(),
        }
    }
}

fn haptic_flag(word: &str) -> Option<Haptic> {
    match word {
        "H0" => Some(Haptic::Off),
        "H1" => Some(Haptic::Weak),
        "H2" => Some(Haptic::Strong),
        _ => None,
    }
}

fn speed_flag(word: &str) -> Option<RotationSpeed> {
    match word {
        "R0" => Some(RotationSpeed::Slow),
        "R1" => Some(RotationSpeed::Medium),
        "R2" => Some(RotationSpeed::Fast),
        _ => None,
    }
}

fn parse_sleep(word: &str) -> Option<Duration> {
    let digits = word.strip_prefix(SLEEP_PREFIX)?;
    if digits.is_empty()
        || digits.len() > MAX_SLEEP_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let ms: u64 = digits.parse().ok()?;
    Some(Duration::from_millis(ms))
}

/// Expand one quoted literal into flush + key-down steps. Each character
/// gets a flush separating it from whatever came before (skipped when the
/// sequence is empty or already ends in a flush), a LEFTSHIFT key-down when
/// shifted, and the character's own key-down.
fn expand_literal(
    sequence: &mut KeySequence,
    text: &str,
    terminated: bool,
    slot: (Control, ModifierContext),
) -> Result<(), BindingError> {
    if !terminated {
        return Err(BindingError::new(Some(slot), "unterminated quoted literal"));
    }
    if text.chars().count() > MAX_PATTERN_LEN {
        return Err(BindingError::new(
            Some(slot),
            format!("quoted literal longer than {MAX_PATTERN_LEN} characters"),
        ));
    }

    let mut pairs = Vec::with_capacity(text.len());
    for c in text.chars() {
        let keys = keys_for_char(c).ok_or_else(|| {
            BindingError::new(
                Some(slot),
                format!("character {c:?} in quoted literal cannot be typed"),
            )
        })?;
        pairs.push(keys);
    }

    // Conservative bound check: every character is charged for its flush,
    // even the first one of a sequence which does not materialize.
    let needed: usize = pairs.iter().map(|k| k.step_count()).sum();
    if sequence.len() + needed > crate::profile::MAX_SEQUENCE_STEPS {
        return Err(BindingError::new(
            Some(slot),
            format!(
                "quoted literal would exceed {} sequence steps",
                crate::profile::MAX_SEQUENCE_STEPS
            ),
        ));
    }

    let push = |seq: &mut KeySequence, step| {
        seq.push(step)
            .map_err(|e| BindingError::new(Some(slot), e.to_string()))
    };
    for keys in pairs {
        if !(sequence.is_empty() || sequence.ends_with_flush()) {
            push(sequence, Step::Flush)?;
        }
        if keys.shift {
            push(sequence, Step::Key(Key::KEY_LEFTSHIFT))?;
        }
        push(sequence, Step::Key(keys.key))?;
    }
    Ok(())
}

fn parse_binding(tokens: &[Token<'_>]) -> Result<ParsedBinding, BindingError> {
    let first = match tokens.first() {
        Some(Token::Word(w)) => *w,
        _ => return Err(BindingError::new(None, "expected a control name")),
    };
    let ctrl1 = Control::from_name(first)
        .ok_or_else(|| BindingError::new(None, format!("unknown control `{first}`")))?;

    let mut cursor = 1;
    let (primary, modifier) = match tokens.get(1) {
        Some(Token::Word(second)) if Control::from_name(second).is_some() => {
            let ctrl2 = Control::from_name(second).unwrap_or(ctrl1);
            let Some(held) = ctrl1.as_momentary() else {
                return Err(BindingError::new(
                    None,
                    format!("`{ctrl1}` cannot be held as a modifier"),
                ));
            };
            cursor = 2;
            if let Some(Token::Word(third)) = tokens.get(2) {
                if Control::from_name(third).is_some() {
                    return Err(BindingError::new(
                        Some((ctrl2, Some(held))),
                        format!("`{third}`: at most one modifier and one trigger per line"),
                    ));
                }
            }
            (ctrl2, Some(held))
        }
        _ => (ctrl1, None),
    };
    let slot = (primary, modifier);

    let mut haptic = None;
    let mut speed = None;
    let mut saw_flags = false;
    while let Some(Token::Word(word)) = tokens.get(cursor) {
        if let Some(h) = haptic_flag(word) {
            haptic = Some(h);
        } else if let Some(r) = speed_flag(word) {
            speed = Some(r);
        } else {
            break;
        }
        saw_flags = true;
        cursor += 1;
    }

    let mut sequence = KeySequence::new();
    for token in &tokens[cursor..] {
        match token {
            Token::Flush => sequence
                .push(Step::Flush)
                .map_err(|e| BindingError::new(Some(slot), e.to_string()))?,
            Token::Word(word) if word.starts_with(SLEEP_PREFIX) => {
                let pause = parse_sleep(word).ok_or_else(|| {
                    BindingError::new(Some(slot), format!("malformed pause token `{word}`"))
                })?;
                sequence
                    .push(Step::Pause(pause))
                    .map_err(|e| BindingError::new(Some(slot), e.to_string()))?;
            }
            Token::Word(word) => {
                let key = key_from_name(word).ok_or_else(|| {
                    BindingError::new(Some(slot), format!("unknown key code `{word}`"))
                })?;
                sequence
                    .push(Step::Key(key))
                    .map_err(|e| BindingError::new(Some(slot), e.to_string()))?;
            }
            Token::Quoted { text, terminated } => {
                expand_literal(&mut sequence, text, *terminated, slot)?;
            }
        }
    }

    Ok(ParsedBinding {
        primary,
        modifier,
        haptic,
        speed,
        saw_flags,
        sequence,
    })
}

fn push_diag(diagnostics: &mut Vec<Diagnostic>, line: usize, message: String) {
    tracing::warn!(line, "{message}");
    diagnostics.push(Diagnostic { line, message });
}

/// Compile a settings file. Never fails; problems surface as diagnostics.
pub fn compile(text: &str) -> CompileOutput {
    let mut store = ProfileStore::new();
    let mut diagnostics = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('"') {
            let tokens = tokenize(line);
            let Some(Token::Quoted { text, terminated }) = tokens.first().copied() else {
                continue;
            };
            if !terminated {
                push_diag(
                    &mut diagnostics,
                    line_no,
                    "unterminated profile pattern".into(),
                );
            }
            if text.chars().count() > MAX_PATTERN_LEN {
                push_diag(
                    &mut diagnostics,
                    line_no,
                    format!("profile pattern truncated to {MAX_PATTERN_LEN} characters"),
                );
            }
            if store.push(Profile::new(text)).is_err() {
                push_diag(
                    &mut diagnostics,
                    line_no,
                    format!("profile limit of {MAX_PROFILES} reached; ignoring the rest of the file"),
                );
                break;
            }
            continue;
        }

        let Some(profile) = store.last_mut() else {
            push_diag(
                &mut diagnostics,
                line_no,
                "binding appears before any profile".into(),
            );
            continue;
        };

        match parse_binding(&tokenize(line)) {
            Ok(parsed) => {
                match parsed.primary.as_rotary() {
                    Some(widget) => {
                        // Binding a rotary trigger configures the widget;
                        // unset flags fall back to strong haptics at full rate.
                        profile.set_rotary(
                            widget,
                            parsed.modifier,
                            RotarySettings {
                                haptic: parsed.haptic.unwrap_or(Haptic::Strong),
                                speed: parsed.speed.unwrap_or(RotationSpeed::Fast),
                            },
                        );
                    }
                    None => {
                        if parsed.saw_flags {
                            push_diag(
                                &mut diagnostics,
                                line_no,
                                format!(
                                    "H/R flags only apply to rotary controls; ignored for `{}`",
                                    parsed.primary
                                ),
                            );
                        }
                    }
                }
                if !parsed.sequence.is_empty() {
                    profile.set_binding(parsed.primary, parsed.modifier, parsed.sequence);
                }
            }
            Err(err) => {
                if let Some((primary, modifier)) = err.slot {
                    profile.clear_binding(primary, modifier);
                }
                push_diag(&mut diagnostics, line_no, err.message);
            }
        }
    }

    CompileOutput { store, diagnostics }
}

/// Generate a settings file where every control, alone and under every
/// momentary modifier, types its own name. Useful for verifying a device
/// end to end from any text editor.
pub fn test_settings() -> String {
    use crate::controls::MomentaryControl;

    let mut text = String::from(
        "# Generated test settings: each binding types the name of the\n\
         # combination that triggered it.\n\
         \"tourbox-test\"\n",
    );
    for control in Control::all() {
        text.push_str(&format!("{control} \"{control} \"\n"));
    }
    for modifier in MomentaryControl::ALL {
        for control in Control::all() {
            if control == Control::Momentary(modifier) {
                continue;
            }
            text.push_str(&format!(
                "{} {control} \"{} {control} \"\n",
                modifier.name(),
                modifier.name()
            ));
        }
    }
    text
}
