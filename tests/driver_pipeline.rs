//! Integration tests for the driver pipeline.
//!
//! These test the full public API: compiling a settings file, decoding raw
//! device bytes, and playing the resulting triggers — exercising the
//! boundary between `config`, `decoder`, `playback`, and `setup_frame`.

use std::io;
use std::time::Duration;

use evdev::Key;
use tourbox_driver::config::compile;
use tourbox_driver::controls::{Control, MomentaryControl, RotaryWidget};
use tourbox_driver::decoder::{Decoded, InputDecoder, Trigger};
use tourbox_driver::playback::{play, KeyEventSink};
use tourbox_driver::profile::{Haptic, Profile, ProfileStore, RotationSpeed};
use tourbox_driver::setup_frame::{decode_slot, encode_setup_frame};

// raw device bytes
const TALL_DOWN: u8 = 0x00;
const TALL_UP: u8 = 0x80;
const SHORT_DOWN: u8 = 0x03;
const C1_DOWN: u8 = 0x22;
const C1_UP: u8 = 0xA2;
const DIAL_CW: u8 = 0x4F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkEvent {
    Down(Key),
    Up(Key),
    Sync,
    Pause(Duration),
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl KeyEventSink for RecordingSink {
    fn key_down(&mut self, key: Key) -> io::Result<()> {
        self.events.push(SinkEvent::Down(key));
        Ok(())
    }

    fn key_up(&mut self, key: Key) -> io::Result<()> {
        self.events.push(SinkEvent::Up(key));
        Ok(())
    }

    fn synchronize(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::Sync);
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        self.events.push(SinkEvent::Pause(duration));
    }
}

/// Feed bytes to a decoder and play every trigger against the profile.
fn drive(profile: &Profile, decoder: &mut InputDecoder, bytes: &[u8]) -> Vec<SinkEvent> {
    let mut sink = RecordingSink::default();
    for &byte in bytes {
        if let Decoded::Trigger(Trigger { control, modifier }) = decoder.process(byte) {
            if let Some(seq) = profile.sequence_for(control, modifier) {
                play(seq, &mut sink).unwrap();
            }
        }
    }
    sink.events
}

// ── Full pipeline: compile → decode → play ──

#[test]
fn pipeline_single_key_binding() {
    let out = compile("\"GIMP\"\nC1 KEY_A\n");
    assert!(out.diagnostics.is_empty());
    let (_, profile) = out.store.lookup("photo.xcf - GIMP").unwrap();

    let mut decoder = InputDecoder::new();
    let events = drive(profile, &mut decoder, &[C1_DOWN, C1_UP]);
    // press: tap A; release: nothing
    assert_eq!(
        events,
        vec![
            SinkEvent::Down(Key::KEY_A),
            SinkEvent::Sync,
            SinkEvent::Up(Key::KEY_A),
            SinkEvent::Sync,
        ]
    );
}

#[test]
fn pipeline_modified_binding_types_literal() {
    // first token is the held modifier, second the trigger
    let out = compile("\"editor\"\nTALL SHORT \"ab\"\n");
    assert!(out.diagnostics.is_empty());
    let (_, profile) = out.store.lookup("editor").unwrap();

    let mut decoder = InputDecoder::new();
    let events = drive(profile, &mut decoder, &[TALL_DOWN, SHORT_DOWN, TALL_UP]);
    assert_eq!(
        events,
        vec![
            SinkEvent::Down(Key::KEY_A),
            SinkEvent::Sync,
            SinkEvent::Up(Key::KEY_A),
            SinkEvent::Sync,
            SinkEvent::Down(Key::KEY_B),
            SinkEvent::Sync,
            SinkEvent::Up(Key::KEY_B),
            SinkEvent::Sync,
        ]
    );

    // without the modifier held, the binding does not fire
    let events = drive(profile, &mut decoder, &[SHORT_DOWN]);
    assert!(events.is_empty());
}

#[test]
fn pipeline_rotary_trigger_under_modifier() {
    let out = compile("\"video\"\nDIAL_TURN_CW KEY_RIGHT\nTALL DIAL_TURN_CW KEY_END\n");
    assert!(out.diagnostics.is_empty());
    let (_, profile) = out.store.lookup("video").unwrap();

    let mut decoder = InputDecoder::new();
    let plain = drive(profile, &mut decoder, &[DIAL_CW]);
    assert_eq!(plain[0], SinkEvent::Down(Key::KEY_RIGHT));

    let modified = drive(profile, &mut decoder, &[TALL_DOWN, DIAL_CW, TALL_UP]);
    assert_eq!(modified[0], SinkEvent::Down(Key::KEY_END));
    assert_eq!(modified.len(), 4);
}

#[test]
fn pipeline_combo_flush_and_pause() {
    let out = compile("\"ide\"\nC1 KEY_LEFTCTRL KEY_S > SLEEP_100 KEY_ENTER\n");
    assert!(out.diagnostics.is_empty());
    let (_, profile) = out.store.lookup("ide").unwrap();

    let mut decoder = InputDecoder::new();
    let events = drive(profile, &mut decoder, &[C1_DOWN]);
    assert_eq!(
        events,
        vec![
            SinkEvent::Down(Key::KEY_LEFTCTRL),
            SinkEvent::Down(Key::KEY_S),
            SinkEvent::Sync,
            SinkEvent::Up(Key::KEY_LEFTCTRL),
            SinkEvent::Up(Key::KEY_S),
            SinkEvent::Sync,
            SinkEvent::Pause(Duration::from_millis(100)),
            SinkEvent::Down(Key::KEY_ENTER),
            SinkEvent::Sync,
            SinkEvent::Up(Key::KEY_ENTER),
            SinkEvent::Sync,
        ]
    );
}

// ── Capacity limits ──

#[test]
fn over_bound_binding_is_discarded_with_one_diagnostic() {
    // 34 shifted characters cost 3 steps each: 102 > 100
    let literal = "A".repeat(34);
    let text = format!("\"app\"\nC1 \"{literal}\"\nC2 KEY_B\n");
    let out = compile(&text);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].line, 2);

    let (_, profile) = out.store.lookup("app").unwrap();
    assert!(profile
        .sequence_for(Control::Momentary(MomentaryControl::C1), None)
        .is_none());
    // the rest of the file still compiles
    assert!(profile
        .sequence_for(Control::Momentary(MomentaryControl::C2), None)
        .is_some());
}

#[test]
fn expansion_count_is_conservative() {
    // 33 shifted characters cost 99 steps and fit, even though the first
    // character's flush never materializes
    let literal = "A".repeat(33);
    let out = compile(&format!("\"app\"\nC1 \"{literal}\"\n"));
    assert!(out.diagnostics.is_empty());
    let (_, profile) = out.store.lookup("app").unwrap();
    let seq = profile
        .sequence_for(Control::Momentary(MomentaryControl::C1), None)
        .unwrap();
    // actual steps: 33 × (shift + key) + 32 separating flushes
    assert_eq!(seq.len(), 98);
}

// ── Setup frames ──

#[test]
fn compiled_rotary_settings_reach_the_frame() {
    let out = compile("\"daw\"\nKNOB_TURN_CW H1 R1 KEY_VOLUMEUP\nTALL SCROLL_TURN_UP H2 R0 KEY_UP\n");
    assert!(out.diagnostics.is_empty());
    let (_, profile) = out.store.lookup("daw").unwrap();

    let frame = encode_setup_frame(Some(profile));
    assert_eq!(
        decode_slot(&frame, RotaryWidget::Knob, None),
        Some((Haptic::Weak, RotationSpeed::Medium))
    );
    assert_eq!(
        decode_slot(&frame, RotaryWidget::Scroll, Some(MomentaryControl::Tall)),
        Some((Haptic::Strong, RotationSpeed::Slow))
    );
    // untouched slot keeps the quiescent defaults
    assert_eq!(
        decode_slot(&frame, RotaryWidget::Dial, None),
        Some((Haptic::Off, RotationSpeed::Slow))
    );
}

#[test]
fn same_profile_encodes_identically() {
    let out = compile("\"app\"\nDIAL_TURN_CCW H2 R2 KEY_MINUS\n");
    let (_, profile) = out.store.lookup("app").unwrap();
    assert_eq!(
        encode_setup_frame(Some(profile)),
        encode_setup_frame(Some(profile))
    );
    assert_ne!(
        encode_setup_frame(Some(profile)),
        encode_setup_frame(None)
    );
}

// ── Store lookup ──

#[test]
fn first_matching_profile_wins() {
    let out = compile("\"Firefox\"\nC1 KEY_A\n\"Mozilla Firefox\"\nC1 KEY_B\n");
    let store: &ProfileStore = &out.store;
    let (id, profile) = store.lookup("bugs - Mozilla Firefox").unwrap();
    assert_eq!(id.0, 0);
    assert_eq!(profile.pattern(), "Firefox");
}
