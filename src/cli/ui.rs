use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        BarChart, Block, Borders, Cell, List, ListItem, Paragraph, Row, Sparkline, Table, Tabs,
        Wrap,
    },
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::analytics::{forecast, ForecastOutcome, Trend};
use crate::cli::state::{App, Dashboard, EditField, Tab};
use crate::cli::util::fmt_money;

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // top tabs | main content | bottom status bar
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(1)])
        .split(size);

    let titles = Tab::ALL
        .iter()
        .map(|t| Line::from(Span::raw(t.title())))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::default().borders(Borders::ALL).title("Expense Tracker"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(tabs, root[0]);

    match app.tab {
        Tab::Expenses => draw_expenses(f, root[1], app),
        Tab::AddExpense => draw_add_expense(f, root[1], app),
        Tab::Dashboard => draw_dashboard(f, root[1], app),
        Tab::Help => draw_help(f, root[1]),
    }

    f.render_widget(Paragraph::new(app.status.as_str()), root[2]);
}

// Expenses Page

fn draw_expenses(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(vec!["Date", "Title", "Category", "Amount"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(1);

    let body: Vec<Row> = app.expenses.list.iter().map(|e| {
        Row::new(vec![
            Cell::from(e.date.clone().unwrap_or_else(|| "-".into())),
            Cell::from(e.title.clone().unwrap_or_default()),
            Cell::from(e.category_label().to_string()),
            Cell::from(fmt_money(&e.amount_or_zero())),
        ])
    }).collect();

    let widths = [
        Constraint::Length(20),
        Constraint::Percentage(45),
        Constraint::Length(16),
        Constraint::Length(14),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Expenses ({})  Up/Down, a=add, x=delete, r=refresh",
            app.expenses.list.len()
        )))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut app.expenses.tsel);
}

// Add Expense Page

fn draw_add_expense(f: &mut Frame, area: Rect, app: &mut App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(cols[0]);

    let line = |label: &str, field: EditField| {
        let editing = app.add.editing == Some(field);
        let marker = if editing { "  <editing>" } else { "" };
        format!("{label:<12}: {}{marker}", app.add.field(field).rendered(editing))
    };
    let category = app
        .add
        .selected_category()
        .map(|c| format!("{} {}", c.icon, c.name))
        .unwrap_or_else(|| "Other".into());

    let form_lines = [
        line("Title", EditField::Title),
        line("Amount", EditField::Amount),
        line("Date", EditField::Date),
        line("Description", EditField::Description),
        format!("{:<12}: {category}", "Category"),
    ]
    .join("\n");

    f.render_widget(
        Paragraph::new(form_lines)
            .block(Block::default().borders(Borders::ALL).title("Add Expense")),
        left[0],
    );

    let status = if let Some(err) = &app.add.error {
        Line::styled(format!("Error: {err}"), Style::default().fg(Color::Red))
    } else if let Some(ok) = &app.add.success {
        Line::styled(ok.clone(), Style::default().fg(Color::Green))
    } else {
        Line::raw("")
    };
    let help = vec![
        Line::raw("t/a/d/n: edit Title/Amount/Date/Description"),
        Line::raw("Tab/Shift+Tab while editing: next/prev field"),
        Line::raw("Enter/Esc: stop editing | Up/Down: category"),
        Line::raw("s: save | Esc: back to list"),
        status,
    ];
    f.render_widget(
        Paragraph::new(help)
            .block(Block::default().borders(Borders::ALL).title("Help & Status"))
            .wrap(Wrap { trim: true }),
        left[1],
    );

    let items: Vec<ListItem> = app
        .add
        .categories
        .iter()
        .map(|c| ListItem::new(Line::from(format!("{}  {}", c.icon, c.name))))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Categories"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, cols[1], &mut app.add.cat_sel);
}

// Dashboard Page

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let Some(dashboard) = app.dashboard.as_ref() else {
        f.render_widget(
            Paragraph::new("No analytics loaded. Press r to compute.")
                .block(Block::default().borders(Borders::ALL).title("Dashboard")),
            area,
        );
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8), Constraint::Length(6)])
        .split(cols[0]);

    draw_totals(f, left[0], dashboard);
    draw_categories(f, left[1], dashboard);
    draw_monthly(f, left[2], dashboard);
    draw_forecast(f, cols[1], &dashboard.forecast);
}

fn draw_totals(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let s = &dashboard.summary;
    let text = format!(
        "Total spent: {}\nExpenses: {}   Categories: {}   Months: {}",
        fmt_money(&s.total_amount),
        s.expense_count,
        s.category_breakdown.len(),
        s.monthly_trend.len(),
    );
    f.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Summary")),
        area,
    );
}

fn draw_categories(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let mut rows: Vec<(String, u64)> = dashboard
        .summary
        .category_breakdown
        .iter()
        .map(|(name, total)| (name.clone(), total.round().to_u64().unwrap_or(0)))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let data: Vec<(&str, u64)> = rows.iter().map(|(n, v)| (n.as_str(), *v)).collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("By Category"))
        .data(data.as_slice())
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(chart, area);
}

fn draw_monthly(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let trend = &dashboard.summary.monthly_trend;
    let values: Vec<u64> = trend
        .values()
        .map(|v| v.round().to_u64().unwrap_or(0))
        .collect();
    let title = match (trend.keys().next(), trend.keys().last()) {
        (Some(first), Some(last)) => format!("Monthly Trend {first} .. {last}"),
        _ => "Monthly Trend".to_string(),
    };

    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&values)
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(spark, area);
}

fn draw_forecast(f: &mut Frame, area: Rect, outcome: &ForecastOutcome) {
    let lines: Vec<Line> = match outcome {
        ForecastOutcome::InsufficientData { months } => vec![
            Line::raw(forecast::INSUFFICIENT_DATA_MESSAGE),
            Line::raw(""),
            Line::raw(format!("Months with dated expenses: {months}")),
            Line::raw("Confidence: low"),
        ],
        ForecastOutcome::Projected(fc) => {
            let trend_color = match fc.trend {
                Trend::Increasing => Color::Red,
                Trend::Decreasing => Color::Green,
                Trend::Stable => Color::Gray,
            };
            let mut lines = vec![
                Line::styled(
                    format!("Next month: {:.2}", fc.prediction),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    format!("Trend: {} ({:+.2}/month)", fc.trend.as_str(), fc.slope),
                    Style::default().fg(trend_color),
                ),
                Line::raw(format!(
                    "Confidence: {} ({} months)",
                    fc.confidence.as_str(),
                    fc.data_points
                )),
                Line::raw(format!("Average monthly: {}", fmt_money(&fc.average_monthly))),
                Line::raw(format!("Last month: {}", fmt_money(&fc.last_month))),
                Line::raw(""),
                Line::raw("Recent months:"),
            ];
            lines.extend(
                fc.history
                    .iter()
                    .map(|(month, total)| Line::raw(format!("  {month}  {}", fmt_money(total)))),
            );
            lines
        }
    };

    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Forecast"))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = [
        "Global Keys:",
        "  q        : Quit App",
        "  ?        : Show this Help tab",
        "  Tab      : Switch tabs (Expenses -> Add -> Dashboard -> Help)",
        "",
        "Expenses Tab:",
        "  Up/Down  : Navigate list",
        "  a        : Add new expense",
        "  x/Del    : Delete selected expense",
        "  r        : Refresh list",
        "",
        "Add Expense Tab:",
        "  t/a/d/n  : Edit Title/Amount/Date/Description",
        "  Enter    : Stop editing",
        "  Up/Down  : Select Category",
        "  s        : Save expense",
        "  Esc      : Back to list",
        "",
        "Dashboard Tab:",
        "  r        : Recompute summary and forecast",
    ].join("\n");

    let p = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help & Keybindings"));

    f.render_widget(p, area);
}
