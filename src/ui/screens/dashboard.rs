use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Gauge, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::panel;
use crate::models::format_month_year;
use crate::ui::app::App;
use crate::ui::theme::category_color;
use crate::ui::util::{format_amount, format_percent, truncate};
use crate::view::DayTotal;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filter line
            Constraint::Length(7), // Summary cards
            Constraint::Min(8),    // Charts
        ])
        .split(area);

    render_filter_line(f, chunks[0], app);
    render_summary_cards(f, chunks[1], app);

    if !app.view.summary.has_data() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No expense data available",
                app.palette.dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add an expense, or r to widen the date range",
                app.palette.dim_style(),
            )),
        ])
        .centered()
        .block(panel(&app.palette, "Spending"));
        f.render_widget(msg, chunks[2]);
        return;
    }

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_category_chart(f, charts[0], app);
    render_daily_chart(f, charts[1], app);
}

fn render_filter_line(f: &mut Frame, area: Rect, app: &App) {
    let p = &app.palette;
    let line = Line::from(vec![
        Span::styled(" Filter: ", p.dim_style()),
        Span::styled(app.filter.to_string(), Style::default().fg(p.accent)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let p = &app.palette;
    let summary = &app.view.summary;
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let invalid = match summary.invalid_amounts {
        0 => String::new(),
        1 => "1 amount unreadable".into(),
        n => format!("{n} amounts unreadable"),
    };
    render_card(
        f,
        cards[0],
        app,
        "Total Expenses",
        format_amount(summary.total, app.currency()),
        p.red,
        invalid,
    );

    let (top_name, top_total, top_color) = match &summary.top_category {
        Some(top) => (
            top.name.clone(),
            format_amount(top.total, app.currency()),
            category_color(&top.name),
        ),
        None => ("None".into(), String::new(), p.text_dim),
    };
    render_card(f, cards[1], app, "Top Category", top_name, top_color, top_total);

    render_card(
        f,
        cards[2],
        app,
        "Transactions",
        summary.transaction_count.to_string(),
        p.accent,
        app.filter.date_range.label(),
    );

    render_budget_card(f, cards[3], app);
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    value: String,
    color: Color,
    subtitle: String,
) {
    let p = &app.palette;
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, p.dim_style())),
    ])
    .centered()
    .block(panel(p, title));

    f.render_widget(text, area);
}

fn render_budget_card(f: &mut Frame, area: Rect, app: &App) {
    let p = &app.palette;
    let title = format!("Budget {}", format_month_year(app.today));

    let Some(progress) = &app.view.summary.budget else {
        render_card(
            f,
            area,
            app,
            &title,
            "Not set".into(),
            p.text_dim,
            ":budget <amount>".into(),
        );
        return;
    };

    let block = panel(p, title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let color = p.budget_color(progress.status);
    let remaining = if progress.remaining < Decimal::ZERO {
        format!(
            "{} over",
            format_amount(progress.remaining.abs(), app.currency())
        )
    } else {
        format!("{} left", format_amount(progress.remaining, app.currency()))
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            remaining,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("of {}", format_amount(progress.budget, app.currency())),
            p.dim_style(),
        ))
        .centered(),
        rows[1],
    );

    let ratio = progress.clamped_percentage().to_u16().unwrap_or(0).min(100);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(p.surface))
        .percent(ratio)
        .label(format_percent(progress.percentage));
    f.render_widget(gauge, rows[2]);
}

fn amount_bar<'a>(label: String, total: Decimal, color: Color, app: &App) -> Bar<'a> {
    Bar::default()
        .value(total.round().to_u64().unwrap_or(0))
        .text_value(format_amount(total, app.currency()))
        .label(Line::from(label))
        .style(Style::default().fg(color))
        .value_style(
            Style::default()
                .fg(app.palette.header_bg)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let bars: Vec<Bar> = app
        .view
        .summary
        .category_totals
        .iter()
        .take(10)
        .map(|ct| amount_bar(truncate(&ct.name, 12), ct.total, category_color(&ct.name), app))
        .collect();

    let chart = BarChart::default()
        .block(panel(&app.palette, "Spending by Category"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(1);

    f.render_widget(chart, area);
}

/// Most recent days that fit the panel width, still in chronological order.
fn visible_days(days: &[DayTotal], width: u16, bar_width: u16) -> &[DayTotal] {
    let fit = (width.saturating_sub(2) / (bar_width + 1)).max(1) as usize;
    &days[days.len().saturating_sub(fit)..]
}

fn render_daily_chart(f: &mut Frame, area: Rect, app: &App) {
    const BAR_WIDTH: u16 = 8;
    let days = visible_days(&app.view.summary.daily_totals, area.width, BAR_WIDTH);
    let bars: Vec<Bar> = days
        .iter()
        .map(|d| amount_bar(d.label(), d.total, app.palette.yellow, app))
        .collect();

    let chart = BarChart::default()
        .block(panel(&app.palette, "Daily Spending"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(1);

    f.render_widget(chart, area);
}
