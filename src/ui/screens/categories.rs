use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use super::panel;
use crate::models::{Category, CategoryFilter};
use crate::ui::app::App;
use crate::ui::theme::category_color;
use crate::ui::util::{format_amount, format_percent};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let p = &app.palette;
    let summary = &app.view.summary;

    let header_cells = ["Category", "Color", "Spent", "Share"]
        .iter()
        .map(|h| Cell::from(*h).style(p.header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = Category::all()
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let spent = summary
                .category_totals
                .iter()
                .find(|ct| ct.name == cat.name)
                .map(|ct| ct.total)
                .unwrap_or(Decimal::ZERO);
            let share = if summary.total > Decimal::ZERO {
                format_percent(spent / summary.total * Decimal::ONE_HUNDRED)
            } else {
                String::new()
            };
            let is_active = app.filter.category == CategoryFilter::Only(cat.name.to_string());

            let style = if i == app.category_index {
                p.selected_style()
            } else if is_active {
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
            } else {
                p.normal_style()
            };

            Row::new(vec![
                Cell::from(Line::from(vec![
                    Span::styled("● ", Style::default().fg(category_color(cat.name))),
                    Span::raw(cat.name),
                ])),
                Cell::from(cat.color),
                Cell::from(if spent > Decimal::ZERO {
                    format_amount(spent, app.currency())
                } else {
                    "-".into()
                }),
                Cell::from(share),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(22),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(8),
    ];

    let title = format!(
        "Categories ({}) | {} | Enter to filter",
        Category::all().len(),
        app.filter.date_range.label()
    );
    let table = Table::new(rows, widths).header(header).block(panel(p, title));
    f.render_widget(table, area);
}
