//! Results Table
//!
//! Columns are not known until the first row arrives: the header is the
//! first row's field names, and every row is read by field name in that
//! column order.

use crate::app::{App, Focus};
use crate::resource::{ResultSet, SearchResult};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table, TableState,
    },
    Frame,
};

/// Maximum characters shown per cell
const MAX_CELL_WIDTH: usize = 40;

/// Text shown when the backend reported no matches
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Header and cells derived from a result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableModel {
    /// Build the table for a non-empty slice of rows
    pub fn from_rows(results: &[SearchResult]) -> Option<Self> {
        let first = results.first()?;
        let headers: Vec<String> = first.field_names().map(str::to_string).collect();

        let rows = results
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|h| row.get(h).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Some(Self { headers, rows })
    }

    /// Widest cell per column, header included
    pub fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .map(|r| r.get(i).map(|c| c.chars().count()).unwrap_or(0))
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

/// What the results area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    /// Not searched yet, or an empty result set
    Nothing,
    NoMatches,
    Table(TableModel),
}

pub fn results_view(results: &ResultSet) -> ResultsView {
    match results {
        ResultSet::NotSearched => ResultsView::Nothing,
        ResultSet::NoMatches => ResultsView::NoMatches,
        ResultSet::Rows(rows) => match TableModel::from_rows(rows) {
            Some(model) => ResultsView::Table(model),
            None => ResultsView::Nothing,
        },
    }
}

/// Plain-text rendering used by `--print`
pub fn format_plain(view: &ResultsView) -> String {
    let model = match view {
        ResultsView::Nothing => return String::new(),
        ResultsView::NoMatches => return format!("{}\n", NO_RESULTS_MESSAGE),
        ResultsView::Table(model) => model,
    };

    let widths = model.column_widths();
    let format_line = |cells: &[String]| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut out = format_line(&model.headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_line(&rule));
    for row in &model.rows {
        out.push_str(&format_line(row));
    }
    out
}

/// Truncate string for display (Unicode-safe)
fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Render the results area
/// Uses virtual scrolling for large result sets
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let view = results_view(app.controller.results());

    let title = match &view {
        ResultsView::Table(model) => format!(" Results[{}] ", model.rows.len()),
        _ => " Results ".to_string(),
    };

    let border_color = if app.focus == Focus::Results {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let model = match view {
        ResultsView::Table(model) => model,
        ResultsView::NoMatches => {
            let msg = Paragraph::new(NO_RESULTS_MESSAGE)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::White));
            f.render_widget(msg, inner_area);
            return;
        },
        ResultsView::Nothing => {
            if app.controller.is_loading() {
                let msg = Paragraph::new(format!("{} Searching...", app.spinner_frame()))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                f.render_widget(msg, inner_area);
            }
            return;
        },
    };

    // Account for header row
    let visible_height = (inner_area.height as usize).saturating_sub(1);
    app.update_viewport(visible_height);
    app.ensure_visible();

    let total_items = model.rows.len();
    let needs_scrollbar = total_items > visible_height;

    let table_area = if needs_scrollbar {
        Rect {
            width: inner_area.width.saturating_sub(1),
            ..inner_area
        }
    } else {
        inner_area
    };

    let range = app.visible_range();

    let header_cells: Vec<Cell> = model
        .headers
        .iter()
        .map(|h| {
            Cell::from(format!(" {}", h)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = model.rows[range.clone()]
        .iter()
        .map(|cells| {
            Row::new(
                cells
                    .iter()
                    .map(|c| Cell::from(format!(" {}", truncate_string(c, MAX_CELL_WIDTH)))),
            )
        })
        .collect();

    let widths: Vec<Constraint> = model
        .column_widths()
        .into_iter()
        .map(|w| Constraint::Min((w.min(MAX_CELL_WIDTH) + 2) as u16))
        .collect();

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if app.focus == Focus::Results && app.selected >= range.start && app.selected < range.end {
        state.select(Some(app.selected - range.start));
    }

    f.render_stateful_widget(table, table_area, &mut state);

    if needs_scrollbar {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(symbols::scrollbar::VERTICAL)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::new(total_items.saturating_sub(visible_height))
            .position(app.scroll_offset);

        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}
