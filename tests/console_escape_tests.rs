//! Escape sequence decoder tests

use rp2350_eval::console::escape::{EscapeDecoder, InputEvent};

fn feed_all(dec: &mut EscapeDecoder, bytes: &[u8]) -> Vec<InputEvent> {
    bytes.iter().filter_map(|&b| dec.feed(b)).collect()
}

#[test]
fn test_printable_characters() {
    let mut dec = EscapeDecoder::new();
    assert_eq!(dec.feed(b'a'), Some(InputEvent::Char(b'a')));
    assert_eq!(dec.feed(b' '), Some(InputEvent::Char(b' ')));
    assert_eq!(dec.feed(b'~'), Some(InputEvent::Char(b'~')));
}

#[test]
fn test_enter_on_cr_and_lf() {
    let mut dec = EscapeDecoder::new();
    assert_eq!(dec.feed(b'\r'), Some(InputEvent::Enter));
    assert_eq!(dec.feed(b'\n'), Some(InputEvent::Enter));
}

#[test]
fn test_backspace_and_delete_are_distinct() {
    let mut dec = EscapeDecoder::new();
    assert_eq!(dec.feed(0x08), Some(InputEvent::Backspace));
    assert_eq!(dec.feed(0x7F), Some(InputEvent::Delete));
}

#[test]
fn test_arrow_keys() {
    let mut dec = EscapeDecoder::new();
    assert_eq!(feed_all(&mut dec, b"\x1b[A"), vec![InputEvent::Up]);
    assert_eq!(feed_all(&mut dec, b"\x1b[B"), vec![InputEvent::Down]);
    assert_eq!(feed_all(&mut dec, b"\x1b[C"), vec![InputEvent::Right]);
    assert_eq!(feed_all(&mut dec, b"\x1b[D"), vec![InputEvent::Left]);
}

#[test]
fn test_lone_escape_aborts_silently() {
    let mut dec = EscapeDecoder::new();
    // ESC followed by something other than '[' drops both bytes.
    assert_eq!(feed_all(&mut dec, b"\x1bx"), vec![]);
    // Decoder is back to normal afterwards.
    assert_eq!(dec.feed(b'a'), Some(InputEvent::Char(b'a')));
}

#[test]
fn test_unknown_final_byte_dropped() {
    let mut dec = EscapeDecoder::new();
    assert_eq!(feed_all(&mut dec, b"\x1b[Z"), vec![]);
    assert_eq!(dec.feed(b'a'), Some(InputEvent::Char(b'a')));
}

#[test]
fn test_control_bytes_ignored() {
    let mut dec = EscapeDecoder::new();
    assert_eq!(dec.feed(0x01), None);
    assert_eq!(dec.feed(0x1F), None);
}

#[test]
fn test_sequence_embedded_in_text() {
    let mut dec = EscapeDecoder::new();
    let events = feed_all(&mut dec, b"a\x1b[Db");
    assert_eq!(
        events,
        vec![
            InputEvent::Char(b'a'),
            InputEvent::Left,
            InputEvent::Char(b'b')
        ]
    );
}
