#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("rent", 10), "rent");
    assert_eq!(truncate("rent", 4), "rent");
}

#[test]
fn test_truncate_long_title() {
    assert_eq!(truncate("Weekly groceries", 8), "Weekly …");
}

#[test]
fn test_truncate_zero_and_one() {
    assert_eq!(truncate("taxi", 0), "");
    assert_eq!(truncate("taxi", 1), "…");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("café résumé", 5), "café…");
    assert_eq!(truncate("₦₦₦₦", 3), "₦₦…");
}

// ── format_amount ──────────────────────────────────────────

#[test]
fn test_format_amount_with_symbol() {
    assert_eq!(format_amount(dec!(1234.56), "₦"), "₦1,234.56");
    assert_eq!(format_amount(dec!(1234.56), "$"), "$1,234.56");
}

#[test]
fn test_format_amount_zero_and_small() {
    assert_eq!(format_amount(dec!(0), "$"), "$0.00");
    assert_eq!(format_amount(dec!(5), "$"), "$5.00");
    assert_eq!(format_amount(dec!(999.99), "$"), "$999.99");
}

#[test]
fn test_format_amount_negative_remaining() {
    assert_eq!(format_amount(dec!(-50), "₦"), "-₦50.00");
    assert_eq!(format_amount(dec!(-99999.01), "$"), "-$99,999.01");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(10000000), "$"), "$10,000,000.00");
}

#[test]
fn test_format_amount_rounds_half_away_from_zero() {
    assert_eq!(format_amount(dec!(1.005), "$"), "$1.01");
    assert_eq!(format_amount(dec!(-0.004), "$"), "$0.00");
}

// ── format_percent ─────────────────────────────────────────

#[test]
fn test_format_percent() {
    assert_eq!(format_percent(dec!(125.00)), "125%");
    assert_eq!(format_percent(dec!(33.333333)), "33%");
    assert_eq!(format_percent(dec!(79.5)), "80%");
    assert_eq!(format_percent(dec!(0)), "0%");
}

// ── cursor helpers ─────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (4, 4);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (3, 3));
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_bottom_and_top() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_clamp_cursor_after_shrink() {
    let (mut index, mut scroll) = (9, 7);
    clamp_cursor(&mut index, &mut scroll, 4);
    assert_eq!((index, scroll), (3, 3));
    clamp_cursor(&mut index, &mut scroll, 0);
    assert_eq!((index, scroll), (0, 0));
}
