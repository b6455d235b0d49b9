//! Tokenizer and numeric argument parsing tests

use rp2350_eval::console::parser::{parse_dec, parse_hex, parse_hex_color, split_args};

#[test]
fn test_split_simple_command() {
    let args = split_args("help");
    assert_eq!(args.argc, 1);
    assert_eq!(args.cmd(), "help");
    assert_eq!(args.arg(1), None);
}

#[test]
fn test_split_command_with_args() {
    let args = split_args("gpio 2 1");
    assert_eq!(args.argc, 3);
    assert_eq!(args.cmd(), "gpio");
    assert_eq!(args.arg(1), Some("2"));
    assert_eq!(args.arg(2), Some("1"));
}

#[test]
fn test_split_collapses_repeated_spaces() {
    let args = split_args("a  b   c");
    assert_eq!(args.argc, 3);
    assert_eq!(args.arg(1), Some("b"));
    assert_eq!(args.arg(2), Some("c"));
}

#[test]
fn test_split_empty_line() {
    let args = split_args("");
    assert_eq!(args.argc, 0);
    assert_eq!(args.cmd(), "");
}

#[test]
fn test_split_spaces_only() {
    let args = split_args("   ");
    assert_eq!(args.argc, 0);
}

#[test]
fn test_split_keeps_command_plus_max_args() {
    // Command plus MAX_ARGS (4) arguments fit.
    let args = split_args("reg #F0000000 w 32 #FFDC008F");
    assert_eq!(args.argc, 5);
    assert_eq!(args.arg(4), Some("#FFDC008F"));
}

#[test]
fn test_split_drops_excess_tokens() {
    let args = split_args("reg #F0000000 w 32 #FFDC008F extra");
    assert_eq!(args.argc, 5);
    assert_eq!(args.arg(4), Some("#FFDC008F"));
    assert_eq!(args.arg(5), None);
}

#[test]
fn test_parse_dec_plain() {
    assert_eq!(parse_dec("42"), 42);
    assert_eq!(parse_dec("-7"), -7);
    assert_eq!(parse_dec("+3"), 3);
}

#[test]
fn test_parse_dec_atoi_semantics() {
    // Non-numeric input is 0, not an error.
    assert_eq!(parse_dec("abc"), 0);
    assert_eq!(parse_dec(""), 0);
    // Digits up to the first non-digit.
    assert_eq!(parse_dec("12abc"), 12);
    assert_eq!(parse_dec("  9"), 9);
}

#[test]
fn test_parse_dec_saturates() {
    assert_eq!(parse_dec("99999999999999"), i32::MAX);
    assert_eq!(parse_dec("-99999999999999"), i32::MIN);
}

#[test]
fn test_parse_hex_requires_prefix() {
    assert_eq!(parse_hex("0010"), None);
    assert_eq!(parse_hex("#0010"), Some(16));
}

#[test]
fn test_parse_hex_stops_at_non_hex() {
    // sscanf("%x") behavior: take the leading hex run.
    assert_eq!(parse_hex("#1AZZ"), Some(0x1A));
}

#[test]
fn test_parse_hex_empty_digits() {
    assert_eq!(parse_hex("#"), None);
    assert_eq!(parse_hex("#zz"), None);
}

#[test]
fn test_parse_hex_full_word() {
    assert_eq!(parse_hex("#FFDC008F"), Some(0xFFDC008F));
    assert_eq!(parse_hex("#f000ff00"), Some(0xF000FF00));
}

#[test]
fn test_parse_hex_color() {
    assert_eq!(parse_hex_color("#FF8000"), Some((0xFF, 0x80, 0x00)));
    assert_eq!(parse_hex_color("#000000"), Some((0, 0, 0)));
}

#[test]
fn test_parse_hex_color_rejects_bad_length() {
    assert_eq!(parse_hex_color("#FFF"), None);
    assert_eq!(parse_hex_color("#FF80001"), None);
    assert_eq!(parse_hex_color("FF8000"), None);
    assert_eq!(parse_hex_color("#GG0000"), None);
}
