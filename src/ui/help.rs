//! Help Overlay
//!
//! Shows keyboard shortcuts and help information.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn section(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )])
}

fn binding(keys: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(description),
    ])
}

pub fn render(f: &mut Frame, _app: &App) {
    let area = f.area();
    let popup_area = centered_rect(70, 80, area);

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Search"),
        binding("type", "Edit the resource name"),
        binding("Ctrl+u", "Clear the resource name"),
        binding("Enter", "Search (needs a non-blank name)"),
        binding("Tab", "Choose resource type"),
        binding("Alt+←/→", "Back/forward through past searches"),
        Line::from(""),
        section("Results"),
        binding("↓/Esc", "Move from the search box to results"),
        binding("j/k, ↑/↓", "Move up/down"),
        binding("gg / G", "Go to top/bottom"),
        binding("Ctrl+d/u", "Page down/up"),
        binding("Enter/d", "View row details"),
        binding("r", "Run the search again"),
        binding("[ / ]", "Back/forward through past searches"),
        binding("/ or i", "Back to the search box"),
        Line::from(""),
        binding("?/F1/Esc", "Close help"),
        binding("q", "Quit (from results)"),
        binding("Ctrl+c", "Quit"),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
