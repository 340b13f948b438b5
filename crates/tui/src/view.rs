//! Rendering of the picker dialog and its row cursor.

use chooser_engine::Picker;
use chooser_util::{primary_key, truncate_to_width};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};
use serde_json::Value;

use crate::search::TextInputState;
use crate::theme::{self, Theme};

const DIALOG_MAX_WIDTH: u16 = 110;
const DIALOG_MAX_HEIGHT: u16 = 30;
const HIGHLIGHT_SYMBOL: &str = "› ";

/// View-side state: the table cursor and which scroll reset it has seen.
#[derive(Debug, Default)]
pub struct PickerView {
    table_state: TableState,
    seen_scroll_epoch: u64,
    initial_value_placed: bool,
}

impl PickerView {
    /// Reconciles the cursor with the picker after messages were applied.
    pub fn sync(&mut self, picker: &Picker) {
        let rows = picker.suggestions().len();
        let epoch = picker.state().scroll_epoch;
        if epoch != self.seen_scroll_epoch {
            self.seen_scroll_epoch = epoch;
            *self.table_state.offset_mut() = 0;
            let initial = if self.initial_value_placed {
                None
            } else {
                picker.initial_value().and_then(|value| picker.position_of(value))
            };
            if rows > 0 {
                self.initial_value_placed = true;
            }
            self.table_state.select(if rows == 0 { None } else { Some(initial.unwrap_or(0)) });
            return;
        }

        match self.table_state.selected() {
            Some(_) if rows == 0 => self.table_state.select(None),
            Some(index) if index >= rows => self.table_state.select(Some(rows - 1)),
            None if rows > 0 => self.table_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Moves the cursor by `delta` rows, clamped to the table.
    pub fn move_cursor(&mut self, delta: isize, rows: usize) {
        if rows == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(rows - 1);
        self.table_state.select(Some(next));
    }

    /// Primary key of the highlighted suggestion.
    pub fn selected_pk(&self, picker: &Picker) -> Option<Value> {
        let item = picker.suggestions().get(self.table_state.selected()?)?;
        primary_key(item, &picker.config().pk_name).cloned()
    }

    pub fn render(&mut self, frame: &mut Frame, picker: &Picker, search: &TextInputState, theme: &dyn Theme) {
        let area = dialog_area(frame.area());
        let state = picker.state();

        let mut title = picker.heading();
        if picker.config().required {
            title.push_str(" *");
        }
        let block = theme::block(theme, Some(title), !state.exiting);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Search
                Constraint::Length(1), // Counts and pagination
                Constraint::Length(1), // Spacer
                Constraint::Min(1),    // Table
                Constraint::Length(1), // Hints
            ])
            .split(inner);

        self.render_search(frame, chunks[0], picker, search, theme);
        render_status(frame, chunks[1], picker, theme);
        self.render_table(frame, chunks[3], picker, theme);
        render_hints(frame, chunks[4], picker, theme);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect, picker: &Picker, search: &TextInputState, theme: &dyn Theme) {
        let translations = &picker.config().translations;
        let label = format!("{}: ", chooser_util::tr(translations, "search"));
        let label_width = label.chars().count() as u16;
        let mut spans = vec![
            Span::styled(label, theme.text_muted_style()),
            Span::styled(search.input().to_string(), theme.text_primary_style()),
        ];
        let state = picker.state();
        if state.loading || state.search_loading {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{}…", chooser_util::tr(translations, "loading")),
                theme.status_warning(),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        if !state.exiting {
            let before_cursor = &search.input()[..search.cursor()];
            let offset = unicode_width::UnicodeWidthStr::width(before_cursor) as u16;
            let x = area.x.saturating_add(label_width).saturating_add(offset);
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, picker: &Picker, theme: &dyn Theme) {
        if let Some(placeholder) = picker.placeholder() {
            let text = Paragraph::new(Span::styled(placeholder, theme.text_muted_style()));
            frame.render_widget(text, area);
            return;
        }

        let columns = picker.config().list_display.len().max(1);
        let available = area.width.saturating_sub(HIGHLIGHT_SYMBOL.chars().count() as u16);
        let column_width = usize::from(available) / columns;
        let cell_width = column_width.saturating_sub(1);

        let header = Row::new(
            picker
                .config()
                .list_display
                .iter()
                .map(|field| Cell::from(truncate_to_width(&field.label, cell_width))),
        )
        .style(theme::table_header_row_style(theme));

        let rows = picker.rows().into_iter().enumerate().map(|(index, cells)| {
            Row::new(cells.iter().map(|cell| Cell::from(truncate_to_width(cell, cell_width))))
                .style(theme::table_row_style(theme, index))
        });
        let widths = vec![Constraint::Ratio(1, columns as u32); columns];

        let mut row_highlight = theme::table_selected_style(theme);
        if picker.state().exiting {
            row_highlight = row_highlight.add_modifier(Modifier::DIM);
        }
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(row_highlight)
            .highlight_symbol(HIGHLIGHT_SYMBOL)
            .style(theme::panel_style(theme));
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

fn render_status(frame: &mut Frame, area: Rect, picker: &Picker, theme: &dyn Theme) {
    let translations = &picker.config().translations;
    let mut spans = vec![
        Span::styled(picker.count_label(), theme.text_secondary_style()),
        Span::raw("   "),
        Span::styled(
            format!("‹ {}", chooser_util::tr(translations, "previous")),
            theme::control_style(theme, picker.can_go_previous()),
        ),
        Span::raw("  "),
        Span::styled(picker.page_label(), theme.text_primary_style()),
        Span::raw("  "),
        Span::styled(
            format!("{} ›", chooser_util::tr(translations, "next")),
            theme::control_style(theme, picker.can_go_next()),
        ),
    ];
    if picker.config().create_endpoint.is_some() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("+ {}", chooser_util::tr(translations, "create_new")),
            theme.accent_emphasis_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_hints(frame: &mut Frame, area: Rect, picker: &Picker, theme: &dyn Theme) {
    let mut hints = vec![("↑/↓", "move"), ("Enter", "select"), ("←/→", "page"), ("Ctrl+U", "clear search")];
    if picker.config().create_endpoint.is_some() {
        hints.push(("Ctrl+N", "create"));
    }
    hints.push(("Esc", "close"));

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (key, action) in hints {
        spans.push(Span::styled(key, theme.accent_primary_style()));
        spans.push(Span::styled(format!(" {action}"), theme.text_muted_style()));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A centered rectangle no larger than the dialog maximum.
fn dialog_area(area: Rect) -> Rect {
    let width = area.width.min(DIALOG_MAX_WIDTH);
    let height = area.height.min(DIALOG_MAX_HEIGHT);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
