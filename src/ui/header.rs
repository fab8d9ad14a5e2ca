//! Header Component
//!
//! Displays the backend endpoint and the shareable location.

use crate::app::App;
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" cloudcate v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Row 1: Endpoint
    let endpoint = Line::from(vec![
        Span::styled(" Endpoint: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.client.endpoint().as_str(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(endpoint), rows[0]);

    // Row 2: Location with history position
    let history = match (app.location.can_go_back(), app.location.can_go_forward()) {
        (true, true) => " [←→]",
        (true, false) => " [←]",
        (false, true) => " [→]",
        (false, false) => "",
    };
    let location = Line::from(vec![
        Span::styled(" Location: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.location.href(), Style::default().fg(Color::Green)),
        Span::styled(history, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(location), rows[1]);

    // Row 3: Help hint
    let help_line = Line::from(vec![Span::styled(
        " Enter:search  Tab:type  ↓:results  Alt+←/→:back/forward  F1:help  Ctrl+c:quit",
        Style::default().fg(Color::DarkGray),
    )]);
    f.render_widget(Paragraph::new(help_line), rows[2]);
}
