//! Type Picker
//!
//! Resource type selection overlay. Identity types are listed once per
//! subtype; the first entry removes the type filter.

use super::help::centered_rect;
use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Label of the entry that clears the filter
const ANY_TYPE_LABEL: &str = "Any type";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(50, 50, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Select a type ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Help text
            Constraint::Length(1), // Separator
            Constraint::Min(1),    // Choices
        ])
        .split(inner);

    let help = Line::from(vec![
        Span::styled(" ↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(":nav ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(":select ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(":cancel", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(help), chunks[0]);

    let sep = "─".repeat(chunks[1].width as usize);
    f.render_widget(
        Paragraph::new(sep).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );

    let current = app.query.selector();
    let entries = std::iter::once(("", ANY_TYPE_LABEL)).chain(
        app.picker_choices
            .iter()
            .map(|c| (c.value.as_str(), c.label)),
    );

    let items: Vec<ListItem> = entries
        .map(|(value, label)| {
            let is_current = value == current;
            let style = if is_current {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            // Mark current filter with a checkmark
            let prefix = if is_current { "✓ " } else { "  " };
            ListItem::new(Span::styled(format!("{}{}", prefix, label), style))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(app.picker_selected));

    f.render_stateful_widget(list, chunks[2], &mut state);
}
