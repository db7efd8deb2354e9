use ratatui::{
    style::Style,
    text::Span,
    widgets::{Block, Borders},
};

use super::theme::Palette;

pub(crate) mod categories;
pub(crate) mod dashboard;
pub(crate) mod expenses;

/// Bordered panel with the standard dim bold title.
pub(crate) fn panel<'a>(p: &Palette, title: impl Into<String>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.overlay))
        .title(Span::styled(
            format!(" {} ", title.into()),
            p.block_title_style(),
        ))
}
