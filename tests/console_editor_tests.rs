//! End-to-end monitor tests: bytes in, echo and dispatch out

mod common;

use common::Fixture;
use rp2350_eval::console::{Console, ConsoleConfig, ConsoleError};

fn console() -> Console {
    Console::new(ConsoleConfig::default())
}

/// Feed a byte string, collecting echo output and the last dispatch result.
fn feed(
    console: &mut Console,
    fixture: &mut Fixture,
    bytes: &[u8],
) -> (Option<Result<(), ConsoleError>>, String) {
    let mut out = String::new();
    let mut last = None;
    for &b in bytes {
        let mut ctx = fixture.ctx();
        if let Some(result) = console.process_byte(b, &mut ctx, &mut out) {
            last = Some(result);
        }
    }
    (last, out)
}

#[test]
fn test_typing_echoes_characters() {
    let mut con = console();
    let mut f = Fixture::new();
    let (result, out) = feed(&mut con, &mut f, b"sys");
    assert_eq!(result, None);
    assert_eq!(out, "sys");
    assert_eq!(con.line(), "sys");
}

#[test]
fn test_enter_dispatches_and_reprompts() {
    let mut con = console();
    let mut f = Fixture::new();
    let (result, out) = feed(&mut con, &mut f, b"cls\r");
    assert_eq!(result, Some(Ok(())));
    assert!(out.ends_with("> "));
    assert_eq!(con.line(), "");
}

#[test]
fn test_unknown_command_result() {
    let mut con = console();
    let mut f = Fixture::new();
    let (result, out) = feed(&mut con, &mut f, b"bogus\r");
    assert_eq!(result, Some(Err(ConsoleError::UnknownCommand)));
    assert!(out.contains("[ERROR] Unknown command"));
}

#[test]
fn test_blank_line_dispatches_nothing() {
    let mut con = console();
    let mut f = Fixture::new();
    let (result, out) = feed(&mut con, &mut f, b"\r");
    assert_eq!(result, None);
    assert!(out.ends_with("> "));
}

#[test]
fn test_command_with_args_runs() {
    let mut con = console();
    let mut f = Fixture::new();
    let (result, _) = feed(&mut con, &mut f, b"gpio 3 1\r");
    assert_eq!(result, Some(Ok(())));
    assert_eq!(f.board.gpio_log, vec![(3, true)]);
}

#[test]
fn test_backspace_edits_and_erases() {
    let mut con = console();
    let mut f = Fixture::new();
    let (_, out) = feed(&mut con, &mut f, b"ab\x08");
    assert_eq!(con.line(), "a");
    // Echo: both chars, then backspace, tail repaint (empty tail + blank),
    // and the cursor pulled back.
    assert_eq!(out, "ab\x08 \x08");
}

#[test]
fn test_backspace_on_empty_line_echoes_nothing() {
    let mut con = console();
    let mut f = Fixture::new();
    let (_, out) = feed(&mut con, &mut f, b"\x08");
    assert_eq!(out, "");
}

#[test]
fn test_left_arrow_then_type_overwrites() {
    let mut con = console();
    let mut f = Fixture::new();
    feed(&mut con, &mut f, b"ab\x1b[DX");
    assert_eq!(con.line(), "aX");
    assert_eq!(con.cursor(), 2);
}

#[test]
fn test_mid_line_delete_repaints_tail() {
    let mut con = console();
    let mut f = Fixture::new();
    // "abcd", move left twice, delete 'c'
    let (_, out) = feed(&mut con, &mut f, b"abcd\x1b[D\x1b[D\x7f");
    assert_eq!(con.line(), "abd");
    assert_eq!(con.cursor(), 2);
    // Tail "d" repainted, vacated cell blanked, cursor restored.
    assert!(out.ends_with("d \x08\x08"));
}

#[test]
fn test_right_arrow_re_echoes_character() {
    let mut con = console();
    let mut f = Fixture::new();
    let (_, out) = feed(&mut con, &mut f, b"ab\x1b[D\x1b[C");
    assert_eq!(con.cursor(), 2);
    assert!(out.ends_with("\x08b"));
}

#[test]
fn test_history_recall_up_and_down() {
    let mut con = console();
    let mut f = Fixture::new();
    feed(&mut con, &mut f, b"sys\rcls\r");

    feed(&mut con, &mut f, b"\x1b[A");
    assert_eq!(con.line(), "cls");
    feed(&mut con, &mut f, b"\x1b[A");
    assert_eq!(con.line(), "sys");
    // Nothing older: line keeps the oldest entry.
    feed(&mut con, &mut f, b"\x1b[A");
    assert_eq!(con.line(), "sys");

    feed(&mut con, &mut f, b"\x1b[B");
    assert_eq!(con.line(), "cls");
    // Past the newest entry: back to an empty line.
    feed(&mut con, &mut f, b"\x1b[B");
    assert_eq!(con.line(), "");
}

#[test]
fn test_history_down_without_browsing() {
    let mut con = console();
    let mut f = Fixture::new();
    feed(&mut con, &mut f, b"sys\rab");
    feed(&mut con, &mut f, b"\x1b[B");
    // Not browsing: the line under edit is untouched.
    assert_eq!(con.line(), "ab");
}

#[test]
fn test_history_recall_erases_current_line() {
    let mut con = console();
    let mut f = Fixture::new();
    feed(&mut con, &mut f, b"cls\r");
    let (_, out) = feed(&mut con, &mut f, b"xy\x1b[A");
    assert_eq!(con.line(), "cls");
    // Two chars wiped, then the recalled entry painted.
    assert_eq!(out, "xy\x08 \x08\x08 \x08cls");
}

#[test]
fn test_recalled_line_dispatches() {
    let mut con = console();
    let mut f = Fixture::new();
    feed(&mut con, &mut f, b"gpio 4 1\r");
    f.board.gpio_log.clear();

    let (result, _) = feed(&mut con, &mut f, b"\x1b[A\r");
    assert_eq!(result, Some(Ok(())));
    assert_eq!(f.board.gpio_log, vec![(4, true)]);
}

#[test]
fn test_blank_line_not_committed_to_history() {
    let mut con = console();
    let mut f = Fixture::new();
    feed(&mut con, &mut f, b"sys\r\r\r");
    feed(&mut con, &mut f, b"\x1b[A");
    assert_eq!(con.line(), "sys");
}

#[test]
fn test_lf_accepts_like_cr() {
    let mut con = console();
    let mut f = Fixture::new();
    let (result, _) = feed(&mut con, &mut f, b"cls\n");
    assert_eq!(result, Some(Ok(())));
}

#[test]
fn test_line_full_stops_echo() {
    let mut con = console();
    let mut f = Fixture::new();
    let long = [b'x'; 40];
    let (_, out) = feed(&mut con, &mut f, &long);
    // CMD_MAX_LEN is 32 with one reserved cell.
    assert_eq!(con.line().len(), 31);
    assert_eq!(out.len(), 31);
}

#[test]
fn test_redraw_repaints_prompt_and_line() {
    let mut con = console();
    let mut f = Fixture::new();
    // Partial line with the cursor pulled back two cells.
    feed(&mut con, &mut f, b"gpio 2\x1b[D\x1b[D");

    let mut out = String::new();
    con.redraw(&mut out);
    assert_eq!(out, "> gpio 2\x08\x08");
    // Editing state survives the repaint.
    assert_eq!(con.line(), "gpio 2");
    assert_eq!(con.cursor(), 4);
}

#[test]
fn test_redraw_on_empty_line_is_just_prompt() {
    let con = console();
    let mut out = String::new();
    con.redraw(&mut out);
    assert_eq!(out, "> ");
}

#[test]
fn test_redraw_restores_typing_after_interruption() {
    let mut con = console();
    let mut f = Fixture::new();
    feed(&mut con, &mut f, b"gpio 2");

    // An alarm notification clobbers the display; the repaint lets the
    // operator finish the command.
    let mut out = String::new();
    con.redraw(&mut out);
    let (result, _) = feed(&mut con, &mut f, b" 1\r");
    assert_eq!(result, Some(Ok(())));
    assert_eq!(f.board.gpio_log, vec![(2, true)]);
}

#[test]
fn test_timer_command_end_to_end() {
    let mut con = console();
    let mut f = Fixture::new();
    let (result, out) = feed(&mut con, &mut f, b"tm 5\r");
    assert_eq!(result, Some(Ok(())));
    assert!(out.contains("Timer #1 Alarm Set 5 s"));

    // The alarm fires: the pool frees the slot and reports it.
    let fired = f.pool.on_fire(0).unwrap();
    assert_eq!(fired.slot_no, 1);
    assert_eq!(fired.requested_s, 5);

    let (_, out) = feed(&mut con, &mut f, b"tm\r");
    assert!(out.contains("No timers are running."));
}
