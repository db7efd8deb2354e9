use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::panel;
use crate::models::DATE_FORMAT;
use crate::ui::app::App;
use crate::ui::theme::category_color;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_filter_bar(f, chunks[0], app);
    render_table(f, chunks[1], app);
}

fn render_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let p = &app.palette;
    let key = |k: &'static str| Span::styled(k, Style::default().fg(p.yellow));
    let value = |v: String| {
        Span::styled(
            v,
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )
    };
    let line = Line::from(vec![
        key(" c "),
        value(app.filter.category.to_string()),
        Span::styled("   ", p.dim_style()),
        key("r "),
        value(app.filter.date_range.label()),
        Span::styled("   ", p.dim_style()),
        key("s "),
        value(app.filter.sort.label().to_string()),
    ]);
    f.render_widget(Paragraph::new(line).block(panel(p, "Filters")), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let p = &app.palette;
    let expenses = &app.view.expenses;

    if expenses.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No expenses match these filters", p.dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with a, or widen the range with r / :range all",
                p.dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(panel(p, "Expenses (0)")),
            area,
        );
        return;
    }

    let header_cells = ["Date", "Title", "Category", "Amount", ""]
        .iter()
        .map(|h| Cell::from(*h).style(p.header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            let style = if i == app.expense_index {
                p.selected_style()
            } else if i % 2 == 1 {
                p.alt_row_style()
            } else {
                p.normal_style()
            };

            let amount = match expense.amount {
                Some(amount) => {
                    Span::styled(format_amount(amount, app.currency()), p.expense_style())
                }
                None => Span::styled("invalid", Style::default().fg(p.yellow)),
            };
            let recurring = if expense.is_recurring { "↻" } else { "" };

            Row::new(vec![
                Cell::from(expense.date.format(DATE_FORMAT).to_string()),
                Cell::from(truncate(&expense.title, 40)),
                Cell::from(Line::from(vec![
                    Span::styled(
                        "● ",
                        Style::default().fg(category_color(&expense.category)),
                    ),
                    Span::raw(truncate(&expense.category, 17)),
                ])),
                Cell::from(amount),
                Cell::from(recurring),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Length(2),
    ];

    let title = format!(
        "Expenses ({}) | {}",
        expenses.len(),
        format_amount(app.view.summary.total, app.currency())
    );
    let table = Table::new(rows, widths).header(header).block(panel(p, title));

    f.render_widget(table, area);
}
