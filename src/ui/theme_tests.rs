use ratatui::style::Color;

use super::theme::*;
use crate::config::Theme;
use crate::view::BudgetStatus;

#[test]
fn test_category_color_known_and_fallback() {
    assert_eq!(category_color("Shopping"), Color::Rgb(0x8B, 0x5C, 0xF6));
    assert_eq!(category_color("shopping"), Color::Rgb(0x8B, 0x5C, 0xF6));
    assert_eq!(category_color("Yachts"), Color::Rgb(0x6B, 0x72, 0x80));
}

#[test]
fn test_budget_color_by_status() {
    let p = Palette::for_theme(Theme::Dark);
    assert_eq!(p.budget_color(BudgetStatus::OnTrack), p.green);
    assert_eq!(p.budget_color(BudgetStatus::Warning), p.orange);
    assert_eq!(p.budget_color(BudgetStatus::Over), p.red);
}

#[test]
fn test_palettes_differ() {
    let dark = Palette::for_theme(Theme::Dark);
    let light = Palette::for_theme(Theme::Light);
    assert_ne!(dark.header_bg, light.header_bg);
    assert_ne!(dark.text, light.text);
}
