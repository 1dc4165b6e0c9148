//! Application profile data model.
//!
//! A [`Profile`] holds everything compiled from one quoted section of a
//! settings file: the window-name match pattern, the (control, modifier)
//! binding table, and per-rotary haptic/rotation settings. Profiles are
//! immutable once compilation finishes; the [`ProfileStore`] is append-only
//! during load and read-only afterwards.

use std::collections::HashMap;
use std::time::Duration;

use evdev::Key;
use thiserror::Error;

use crate::controls::{Control, MomentaryControl, RotaryWidget};

/// Maximum number of profiles per run.
pub const MAX_PROFILES: usize = 64;
/// Maximum steps in one key sequence, quoted-literal expansion included.
pub const MAX_SEQUENCE_STEPS: usize = 100;
/// Maximum pause steps in one key sequence.
pub const MAX_SEQUENCE_PAUSES: usize = 10;
/// Match patterns longer than this are truncated.
pub const MAX_PATTERN_LEN: usize = 80;

/// Haptic feedback strength for a rotary widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Haptic {
    #[default]
    Off,
    Weak,
    Strong,
}

/// Rotation event rate for a rotary widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationSpeed {
    #[default]
    Slow,
    Medium,
    Fast,
}

/// Haptic and speed settings for one (rotary widget, modifier) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotarySettings {
    pub haptic: Haptic,
    pub speed: RotationSpeed,
}

/// One step of a key sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Press a key; it stays down until the next flush.
    Key(Key),
    /// Synchronize, then release everything pressed since the last flush.
    Flush,
    /// Block playback for the given duration.
    Pause(Duration),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapacityExceeded {
    #[error("sequence exceeds {MAX_SEQUENCE_STEPS} steps")]
    Steps,
    #[error("sequence exceeds {MAX_SEQUENCE_PAUSES} pauses")]
    Pauses,
}

/// An ordered, bounded key sequence. Push enforces the step and pause
/// limits; a sequence that would exceed them is discarded whole by the
/// settings compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySequence {
    steps: Vec<Step>,
}

impl KeySequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) -> Result<(), CapacityExceeded> {
        if self.steps.len() >= MAX_SEQUENCE_STEPS {
            return Err(CapacityExceeded::Steps);
        }
        if matches!(step, Step::Pause(_)) && self.pause_count() >= MAX_SEQUENCE_PAUSES {
            return Err(CapacityExceeded::Pauses);
        }
        self.steps.push(step);
        Ok(())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn ends_with_flush(&self) -> bool {
        matches!(self.steps.last(), Some(Step::Flush))
    }

    fn pause_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Pause(_)))
            .count()
    }
}

/// The held momentary control a trigger arrived under, if any.
pub type ModifierContext = Option<MomentaryControl>;

/// One application's compiled mapping.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pattern: String,
    bindings: HashMap<(Control, ModifierContext), KeySequence>,
    rotary: HashMap<(RotaryWidget, ModifierContext), RotarySettings>,
}

impl Profile {
    pub fn new(pattern: impl Into<String>) -> Self {
        let mut pattern = pattern.into();
        // the limit counts characters; truncate must land on a char boundary
        if let Some((i, _)) = pattern.char_indices().nth(MAX_PATTERN_LEN) {
            pattern.truncate(i);
        }
        Self {
            pattern,
            ..Self::default()
        }
    }

    /// The substring this profile matches against focused-window names.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn sequence_for(&self, control: Control, modifier: ModifierContext) -> Option<&KeySequence> {
        self.bindings.get(&(control, modifier))
    }

    /// Settings for a rotary slot, falling back to the quiescent defaults
    /// (haptics off, slow rotation).
    pub fn rotary_settings(&self, widget: RotaryWidget, modifier: ModifierContext) -> RotarySettings {
        self.rotary
            .get(&(widget, modifier))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_binding(&mut self, control: Control, modifier: ModifierContext, seq: KeySequence) {
        self.bindings.insert((control, modifier), seq);
    }

    /// Remove any binding for this slot. Used when a binding line fails
    /// partway through parsing, so an earlier good binding cannot survive a
    /// later bad rewrite of the same slot.
    pub fn clear_binding(&mut self, control: Control, modifier: ModifierContext) {
        self.bindings.remove(&(control, modifier));
    }

    pub fn set_rotary(
        &mut self,
        widget: RotaryWidget,
        modifier: ModifierContext,
        settings: RotarySettings,
    ) {
        self.rotary.insert((widget, modifier), settings);
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// All bindings, in no particular order. Used by listings.
    pub fn bindings(&self) -> impl Iterator<Item = ((Control, ModifierContext), &KeySequence)> {
        self.bindings.iter().map(|(&slot, seq)| (slot, seq))
    }
}

/// Stable identity of a profile within one run: its definition index.
/// Cheap to compare, used by the session controller to skip redundant
/// setup-frame writes when focus moves between windows of the same app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileId(pub usize);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("profile limit of {MAX_PROFILES} reached")]
pub struct ProfileLimitReached;

/// All profiles from one settings file, in definition order.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, profile: Profile) -> Result<ProfileId, ProfileLimitReached> {
        if self.profiles.len() >= MAX_PROFILES {
            return Err(ProfileLimitReached);
        }
        self.profiles.push(profile);
        Ok(ProfileId(self.profiles.len() - 1))
    }

    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.get(id.0)
    }

    pub fn last_mut(&mut self) -> Option<&mut Profile> {
        self.profiles.last_mut()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileId, &Profile)> {
        self.profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (ProfileId(i), p))
    }

    /// First profile (in definition order) whose pattern is a substring of
    /// the focused-window name.
    pub fn lookup(&self, window_name: &str) -> Option<(ProfileId, &Profile)> {
        self.iter().find(|(_, p)| window_name.contains(p.pattern()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::TurnDirection;

    #[test]
    fn sequence_enforces_step_bound() {
        let mut seq = KeySequence::new();
        for _ in 0..MAX_SEQUENCE_STEPS {
            seq.push(Step::Key(Key::KEY_A)).unwrap();
        }
        assert_eq!(seq.push(Step::Flush), Err(CapacityExceeded::Steps));
        assert_eq!(seq.len(), MAX_SEQUENCE_STEPS);
    }

    #[test]
    fn sequence_enforces_pause_bound() {
        let mut seq = KeySequence::new();
        for _ in 0..MAX_SEQUENCE_PAUSES {
            seq.push(Step::Pause(Duration::from_millis(1))).unwrap();
        }
        assert_eq!(
            seq.push(Step::Pause(Duration::from_millis(1))),
            Err(CapacityExceeded::Pauses)
        );
        // non-pause steps still fit
        seq.push(Step::Key(Key::KEY_A)).unwrap();
    }

    #[test]
    fn pattern_is_truncated() {
        let profile = Profile::new("x".repeat(MAX_PATTERN_LEN + 20));
        assert_eq!(profile.pattern().len(), MAX_PATTERN_LEN);
    }

    #[test]
    fn pattern_truncation_counts_characters_not_bytes() {
        // 27 three-byte characters are 81 bytes but well under the
        // 80-character limit; nothing is cut
        let short = "€".repeat(27);
        let profile = Profile::new(short.clone());
        assert_eq!(profile.pattern(), short);

        // over the limit, the cut lands on a character boundary
        let long = "€".repeat(MAX_PATTERN_LEN + 5);
        let profile = Profile::new(long);
        assert_eq!(profile.pattern().chars().count(), MAX_PATTERN_LEN);
        assert_eq!(profile.pattern(), "€".repeat(MAX_PATTERN_LEN));
    }

    #[test]
    fn rotary_settings_default_to_off_slow() {
        let profile = Profile::new("gimp");
        let settings = profile.rotary_settings(RotaryWidget::Knob, None);
        assert_eq!(settings.haptic, Haptic::Off);
        assert_eq!(settings.speed, RotationSpeed::Slow);
    }

    #[test]
    fn bindings_are_keyed_by_modifier_context() {
        let mut profile = Profile::new("krita");
        let control = Control::Rotary(RotaryWidget::Dial, TurnDirection::CwUp);
        let mut seq = KeySequence::new();
        seq.push(Step::Key(Key::KEY_E)).unwrap();
        profile.set_binding(control, Some(MomentaryControl::Tall), seq.clone());

        assert_eq!(
            profile.sequence_for(control, Some(MomentaryControl::Tall)),
            Some(&seq)
        );
        assert_eq!(profile.sequence_for(control, None), None);

        profile.clear_binding(control, Some(MomentaryControl::Tall));
        assert_eq!(
            profile.sequence_for(control, Some(MomentaryControl::Tall)),
            None
        );
    }

    #[test]
    fn bindings_iterator_yields_every_slot() {
        let mut profile = Profile::new("app");
        let mut seq = KeySequence::new();
        seq.push(Step::Key(Key::KEY_A)).unwrap();
        profile.set_binding(Control::Momentary(MomentaryControl::C1), None, seq.clone());
        profile.set_binding(
            Control::Momentary(MomentaryControl::C2),
            Some(MomentaryControl::Tall),
            seq.clone(),
        );

        let mut slots: Vec<_> = profile.bindings().map(|(slot, _)| slot).collect();
        slots.sort_by_key(|(control, _)| control.to_string());
        assert_eq!(
            slots,
            vec![
                (Control::Momentary(MomentaryControl::C1), None),
                (
                    Control::Momentary(MomentaryControl::C2),
                    Some(MomentaryControl::Tall)
                ),
            ]
        );
        for (_, s) in profile.bindings() {
            assert_eq!(s, &seq);
        }
    }

    #[test]
    fn lookup_is_substring_first_match() {
        let mut store = ProfileStore::new();
        store.push(Profile::new("GIMP")).unwrap();
        store.push(Profile::new("Mozilla Firefox")).unwrap();
        store.push(Profile::new("Firefox")).unwrap();

        let (id, profile) = store.lookup("photo.xcf - GIMP 2.10").unwrap();
        assert_eq!(id, ProfileId(0));
        assert_eq!(profile.pattern(), "GIMP");

        // first match in definition order wins, even with a later
        // shorter pattern that also matches
        let (id, _) = store.lookup("rust - Mozilla Firefox").unwrap();
        assert_eq!(id, ProfileId(1));

        assert!(store.lookup("konsole").is_none());
    }

    #[test]
    fn store_enforces_profile_limit() {
        let mut store = ProfileStore::new();
        for i in 0..MAX_PROFILES {
            store.push(Profile::new(format!("app{i}"))).unwrap();
        }
        assert_eq!(store.push(Profile::new("overflow")), Err(ProfileLimitReached));
        assert_eq!(store.len(), MAX_PROFILES);
    }
}
