//! Terminal User Interface rendering module
//!
//! This module handles all UI rendering for cloudcate using the ratatui
//! framework: a search form on top, the results table below, and a status
//! line at the bottom.
//!
//! # Architecture
//!
//! - `header` - Header bar with endpoint and location
//! - [`results`] - Results table derived from the first row's fields
//! - `type_picker` - Resource type selector popup
//! - `help` - Help overlay showing keybindings

mod header;
mod help;
pub mod results;
mod type_picker;

use crate::app::{App, Focus, Mode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header (multi-line)
            Constraint::Length(3), // Search form
            Constraint::Min(1),    // Results or details
            Constraint::Length(1), // Footer/crumb
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);
    render_search_form(f, app, chunks[1]);

    match app.mode {
        Mode::Details => render_details_view(f, app, chunks[2]),
        _ => results::render(f, app, chunks[2]),
    }

    render_crumb(f, app, chunks[3]);

    // Overlays
    let area = f.area();
    match app.mode {
        Mode::Help => help::render(f, app),
        Mode::TypePicker => type_picker::render(f, app, area),
        _ => {},
    }
}

fn render_search_form(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.focus == Focus::Term && app.mode == Mode::Normal;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing {
            Color::Cyan
        } else {
            Color::DarkGray
        }))
        .title(Span::styled(
            " Resource Name (may be partial) ",
            Style::default().fg(Color::DarkGray),
        ));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),    // Term input
            Constraint::Length(40), // Type filter
            Constraint::Length(12), // Trigger
        ])
        .split(inner);

    let cursor = if editing { "_" } else { "" };
    let input = Line::from(vec![
        Span::styled(" > ", Style::default().fg(Color::Yellow)),
        Span::styled(&app.query.term, Style::default().fg(Color::White)),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(Paragraph::new(input), cols[0]);

    let type_line = Line::from(vec![
        Span::styled("Type: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.selector_label(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(type_line), cols[1]);

    // Trigger is inert while the term is blank; spinner while loading
    let trigger = if app.controller.is_loading() {
        Span::styled(
            format!(" {} Loading", app.spinner_frame()),
            Style::default().fg(Color::Yellow),
        )
    } else if app.can_search() {
        Span::styled(
            " [Search]",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" [Search]", Style::default().fg(Color::DarkGray))
    };
    f.render_widget(
        Paragraph::new(Line::from(trigger)).alignment(Alignment::Right),
        cols[2],
    );
}

fn render_details_view(f: &mut Frame, app: &App, area: Rect) {
    let Some(row) = app.selected_result() else {
        f.render_widget(Paragraph::new("No item selected"), area);
        return;
    };

    let title = app
        .selected_record()
        .map(|record| format!(" {} ", record.title()))
        .unwrap_or_else(|| " Details ".to_string());

    let key_width = row.field_names().map(|k| k.chars().count()).max().unwrap_or(0);
    let lines: Vec<Line> = row
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<width$}", key, width = key_width),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled("  ", Style::default()),
                Span::styled(value.to_string(), Style::default().fg(Color::Green)),
            ])
        })
        .collect();
    let total_lines = lines.len();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let visible_lines = inner_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.details_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    f.render_widget(paragraph, inner_area);

    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll + visible_lines).position(scroll);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let crumb = match app.mode {
        Mode::Details => "search > details",
        Mode::TypePicker => "search > type",
        Mode::Help => "search > help",
        Mode::Normal => "search",
    };

    let error = app.error_message();

    let status_text = if let Some(ref err) = error {
        format!("Error: {}", err)
    } else if app.controller.is_loading() {
        format!("{} Loading...", app.spinner_frame())
    } else if app.mode == Mode::Details {
        "j/k: scroll | q/d/Esc: back".to_string()
    } else if let Some(at) = app.controller.completed_at() {
        format!(
            "{} rows at {} | Alt+←/→: history",
            app.result_count(),
            at.format("%H:%M:%S")
        )
    } else {
        "Enter: search | Tab: type | F1: help".to_string()
    };

    let style = if error.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if app.controller.is_loading() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let line = Line::from(vec![
        Span::styled(
            format!("<{}>", crumb),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
