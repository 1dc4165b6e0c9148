//! Setup message codec.
//!
//! Before the device streams input it is sent one 94-byte setup frame
//! describing, for every (rotary widget, held modifier) slot, the haptic
//! detent strength and the rotation event rate. The frame layout is fixed:
//! a `b5 00 5d` header, 45 two-byte slots (slot id, settings byte), and a
//! `fe` terminator. Only the settings bytes vary between profiles.

use crate::controls::{MomentaryControl, RotaryWidget};
use crate::profile::{Haptic, ModifierContext, Profile, RotationSpeed};

pub const SETUP_FRAME_LEN: usize = 94;

const FRAME_TEMPLATE: [u8; SETUP_FRAME_LEN] = [
    0xb5, 0x00, 0x5d, 0x04, 0x00, 0x05, 0x00, 0x06, 0x00, 0x07, 0x00, 0x08, 0x00, 0x09, 0x00,
    0x0b, 0x00, 0x0c, 0x00, 0x0d, 0x00, 0x0e, 0x00, 0x0f, 0x00, 0x26, 0x00, 0x27, 0x00, 0x28,
    0x00, 0x29, 0x00, 0x3b, 0x00, 0x3c, 0x00, 0x3d, 0x00, 0x3e, 0x00, 0x3f, 0x00, 0x40, 0x00,
    0x41, 0x00, 0x42, 0x00, 0x43, 0x00, 0x44, 0x00, 0x45, 0x00, 0x46, 0x00, 0x47, 0x00, 0x48,
    0x00, 0x49, 0x00, 0x4a, 0x00, 0x4b, 0x00, 0x4c, 0x00, 0x4d, 0x00, 0x4e, 0x00, 0x4f, 0x00,
    0x50, 0x00, 0x51, 0x00, 0x52, 0x00, 0x53, 0x00, 0x54, 0x00, 0xa8, 0x00, 0xa9, 0x00, 0xaa,
    0x00, 0xab, 0x00, 0xfe,
];

const HAPTIC_MASK: u8 = 0x0C;
const SPEED_MASK: u8 = 0x03;

/// Byte offset of the settings byte for each (widget, modifier) slot.
/// Offsets come straight from the device's frame layout; there is no
/// arithmetic pattern worth deriving.
const SETUP_OFFSETS: [(RotaryWidget, ModifierContext, usize); 45] = {
    use MomentaryControl::*;
    use RotaryWidget::*;
    [
        (Knob, None, 4),
        (Knob, Some(Tall), 6),
        (Knob, Some(Short), 8),
        (Knob, Some(Top), 10),
        (Knob, Some(Side), 12),
        (Scroll, None, 14),
        (Scroll, Some(Tall), 16),
        (Scroll, Some(Short), 18),
        (Scroll, Some(Top), 20),
        (Scroll, Some(Side), 22),
        (Dial, None, 24),
        (Scroll, Some(Up), 26),
        (Scroll, Some(Down), 28),
        (Scroll, Some(Left), 30),
        (Scroll, Some(Right), 32),
        (Knob, Some(KnobPress), 34),
        (Knob, Some(ScrollPress), 36),
        (Knob, Some(DialPress), 38),
        (Knob, Some(Tour), 40),
        (Knob, Some(Up), 42),
        (Knob, Some(Down), 44),
        (Knob, Some(Left), 46),
        (Knob, Some(Right), 48),
        (Knob, Some(C1), 50),
        (Knob, Some(C2), 52),
        (Scroll, Some(ScrollPress), 54),
        (Scroll, Some(KnobPress), 56),
        (Scroll, Some(DialPress), 58),
        (Scroll, Some(Tour), 60),
        (Scroll, Some(C1), 62),
        (Scroll, Some(C2), 64),
        (Dial, Some(DialPress), 66),
        (Dial, Some(KnobPress), 68),
        (Dial, Some(ScrollPress), 70),
        (Dial, Some(Tour), 72),
        (Dial, Some(Up), 74),
        (Dial, Some(Down), 76),
        (Dial, Some(Left), 78),
        (Dial, Some(Right), 80),
        (Dial, Some(C1), 82),
        (Dial, Some(C2), 84),
        (Dial, Some(Tall), 86),
        (Dial, Some(Short), 88),
        (Dial, Some(Top), 90),
        (Dial, Some(Side), 92),
    ]
};

fn haptic_bits(haptic: Haptic) -> u8 {
    match haptic {
        Haptic::Off => 0x00,
        Haptic::Weak => 0x04,
        Haptic::Strong => 0x08,
    }
}

fn speed_bits(speed: RotationSpeed) -> u8 {
    match speed {
        RotationSpeed::Slow => 0x02,
        RotationSpeed::Medium => 0x01,
        RotationSpeed::Fast => 0x00,
    }
}

/// Encode the setup frame for a profile. `None` produces the quiescent
/// frame: every slot zeroed (haptics off, full rate), sent at startup and
/// whenever focus moves to an unmapped window.
pub fn encode_setup_frame(profile: Option<&Profile>) -> [u8; SETUP_FRAME_LEN] {
    let mut frame = FRAME_TEMPLATE;
    for &(widget, modifier, offset) in &SETUP_OFFSETS {
        frame[offset] = match profile {
            Some(p) => {
                let settings = p.rotary_settings(widget, modifier);
                haptic_bits(settings.haptic) | speed_bits(settings.speed)
            }
            None => 0x00,
        };
    }
    frame
}

/// Read one slot back out of an encoded frame. Diagnostic counterpart of
/// [`encode_setup_frame`]; returns `None` for an unmapped slot or a
/// settings byte with bits outside the two defined groups.
pub fn decode_slot(
    frame: &[u8; SETUP_FRAME_LEN],
    widget: RotaryWidget,
    modifier: ModifierContext,
) -> Option<(Haptic, RotationSpeed)> {
    let &(_, _, offset) = SETUP_OFFSETS
        .iter()
        .find(|&&(w, m, _)| w == widget && m == modifier)?;
    let byte = frame[offset];
    if byte & !(HAPTIC_MASK | SPEED_MASK) != 0 {
        return None;
    }
    let haptic = match byte & HAPTIC_MASK {
        0x00 => Haptic::Off,
        0x04 => Haptic::Weak,
        0x08 => Haptic::Strong,
        _ => return None,
    };
    let speed = match byte & SPEED_MASK {
        0x02 => RotationSpeed::Slow,
        0x01 => RotationSpeed::Medium,
        0x00 => RotationSpeed::Fast,
        _ => return None,
    };
    Some((haptic, speed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RotarySettings;

    #[test]
    fn offset_table_covers_every_slot_once() {
        let mut offsets: Vec<usize> = SETUP_OFFSETS.iter().map(|&(_, _, o)| o).collect();
        offsets.sort_unstable();
        offsets.dedup();
        assert_eq!(offsets.len(), 45);
        // settings byte follows each slot id, landing on even offsets
        assert_eq!(offsets.first(), Some(&4));
        assert_eq!(offsets.last(), Some(&92));
        for o in offsets {
            assert_eq!(o % 2, 0);
        }
    }

    #[test]
    fn quiescent_frame_matches_template() {
        let frame = encode_setup_frame(None);
        assert_eq!(frame, FRAME_TEMPLATE);
        assert_eq!(frame[0], 0xb5);
        assert_eq!(frame[2], 0x5d);
        assert_eq!(frame[SETUP_FRAME_LEN - 1], 0xfe);
    }

    #[test]
    fn unmapped_profile_slots_encode_as_defaults() {
        let profile = Profile::new("app");
        let frame = encode_setup_frame(Some(&profile));
        // Off | Slow = 0x02 in every slot
        for &(_, _, offset) in &SETUP_OFFSETS {
            assert_eq!(frame[offset], 0x02);
        }
    }

    #[test]
    fn every_setting_pair_round_trips() {
        use MomentaryControl::*;
        let mut profile = Profile::new("app");
        let combos = [
            (Haptic::Off, RotationSpeed::Slow),
            (Haptic::Off, RotationSpeed::Medium),
            (Haptic::Off, RotationSpeed::Fast),
            (Haptic::Weak, RotationSpeed::Slow),
            (Haptic::Weak, RotationSpeed::Medium),
            (Haptic::Weak, RotationSpeed::Fast),
            (Haptic::Strong, RotationSpeed::Slow),
            (Haptic::Strong, RotationSpeed::Medium),
            (Haptic::Strong, RotationSpeed::Fast),
        ];
        let slots = [
            (RotaryWidget::Knob, None),
            (RotaryWidget::Knob, Some(Tall)),
            (RotaryWidget::Scroll, Some(C2)),
            (RotaryWidget::Dial, Some(Side)),
        ];
        for &(haptic, speed) in &combos {
            for &(widget, modifier) in &slots {
                profile.set_rotary(widget, modifier, RotarySettings { haptic, speed });
            }
            let frame = encode_setup_frame(Some(&profile));
            for &(widget, modifier) in &slots {
                assert_eq!(decode_slot(&frame, widget, modifier), Some((haptic, speed)));
            }
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut profile = Profile::new("app");
        profile.set_rotary(
            RotaryWidget::Dial,
            None,
            RotarySettings {
                haptic: Haptic::Strong,
                speed: RotationSpeed::Fast,
            },
        );
        assert_eq!(encode_setup_frame(Some(&profile)), encode_setup_frame(Some(&profile)));
    }

    #[test]
    fn modifier_slots_are_independent() {
        let mut profile = Profile::new("app");
        profile.set_rotary(
            RotaryWidget::Knob,
            Some(MomentaryControl::Tall),
            RotarySettings {
                haptic: Haptic::Strong,
                speed: RotationSpeed::Medium,
            },
        );
        let frame = encode_setup_frame(Some(&profile));
        assert_eq!(
            decode_slot(&frame, RotaryWidget::Knob, Some(MomentaryControl::Tall)),
            Some((Haptic::Strong, RotationSpeed::Medium))
        );
        assert_eq!(
            decode_slot(&frame, RotaryWidget::Knob, None),
            Some((Haptic::Off, RotationSpeed::Slow))
        );
    }
}
