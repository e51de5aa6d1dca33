// Table rendering split in two: a pure model built from AppState, and the
// ratatui drawing of that model. Only the drawing knows about terminals.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::config::config::IconConfig;
use crate::data::data_view::SortOrder;
use crate::state::AppState;
use crate::ui::cell_renderer::{CellRenderer, RenderedCell};
use crate::ui::column_utils::{capitalize, column_width};

const COLUMN_SPACING: u16 = 1;
const SEPARATOR: &str = "│";

/// One header cell of the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column: String,
    pub label: String,
    pub pinned: bool,
    pub sort: Option<SortOrder>,
}

impl HeaderCell {
    pub fn display_text(&self, icons: &IconConfig) -> String {
        let pin = if self.pinned {
            format!("{} ", icons.pin)
        } else {
            String::new()
        };
        let sort = match self.sort {
            Some(SortOrder::Ascending) => format!(" {}", icons.sort_ascending),
            Some(SortOrder::Descending) => format!(" {}", icons.sort_descending),
            None => String::new(),
        };
        format!("{}{}{}", pin, self.label, sort)
    }
}

/// Everything needed to draw a loaded table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<RenderedCell>>,
    /// Pinned headers always form a prefix of `headers`
    pub pinned_count: usize,
}

impl TableModel {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.column == column)
    }

    pub fn column_widths(&self, icons: &IconConfig, max_width: u16) -> Vec<u16> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let texts: Vec<String> = self
                    .rows
                    .iter()
                    .map(|row| row[idx].display_text(icons))
                    .collect();
                column_width(
                    &header.display_text(icons),
                    texts.iter().map(String::as_str),
                    max_width,
                )
            })
            .collect()
    }
}

/// What the screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    Loading,
    Error(String),
    Table(TableModel),
}

/// Build the render model. Loading wins over error, error over data.
pub fn build_render_state(state: &AppState, cells: &CellRenderer) -> RenderState {
    if state.is_loading() {
        return RenderState::Loading;
    }
    if let Some(message) = state.error() {
        return RenderState::Error(message.to_string());
    }

    let view = state.view();
    // No indicator while rows are still in fetch order
    let sort = view.is_sort_applied().then(|| view.sort_state());
    let headers: Vec<HeaderCell> = view
        .column_names()
        .iter()
        .map(|column| HeaderCell {
            column: column.clone(),
            label: capitalize(column),
            pinned: view.is_pinned(column),
            sort: sort
                .filter(|s| s.column == *column)
                .map(|s| s.order),
        })
        .collect();

    let rows = view
        .rows()
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| cells.render(row.get(&h.column)))
                .collect()
        })
        .collect();

    RenderState::Table(TableModel {
        pinned_count: view.get_pinned_columns().len(),
        headers,
        rows,
    })
}

/// Horizontal placement of one rendered column; `column` is None for the
/// pinned/unpinned separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    pub column: Option<usize>,
    pub x: u16,
    pub width: u16,
}

/// Lay out pinned columns at the left, a separator, then unpinned columns from
/// `column_offset` on, for as long as they fit in `width`. The last column that
/// only partly fits is truncated.
pub fn layout_columns(
    widths: &[u16],
    pinned_count: usize,
    column_offset: usize,
    x: u16,
    width: u16,
) -> Vec<ColumnSlot> {
    let mut slots = Vec::new();
    let mut cursor = x;
    let mut remaining = width;

    let mut place = |column: Option<usize>, w: u16, slots: &mut Vec<ColumnSlot>| -> bool {
        if remaining == 0 {
            return false;
        }
        let w = w.min(remaining);
        slots.push(ColumnSlot {
            column,
            x: cursor,
            width: w,
        });
        let used = (w + COLUMN_SPACING).min(remaining);
        cursor += used;
        remaining -= used;
        true
    };

    let pinned_count = pinned_count.min(widths.len());
    for (idx, &w) in widths.iter().enumerate().take(pinned_count) {
        if !place(Some(idx), w, &mut slots) {
            return slots;
        }
    }

    let first_unpinned = pinned_count + column_offset;
    if pinned_count > 0 && first_unpinned < widths.len() && !place(None, 1, &mut slots) {
        return slots;
    }

    for (idx, &w) in widths.iter().enumerate().skip(first_unpinned) {
        if !place(Some(idx), w, &mut slots) {
            break;
        }
    }

    slots
}

/// Scroll/focus state of the table plus the header geometry of the last draw
#[derive(Debug, Default)]
pub struct TableViewport {
    pub focused_column: usize,
    /// Number of unpinned columns scrolled off to the left
    pub column_offset: usize,
    pub table_state: TableState,
    header_slots: Vec<ColumnSlot>,
    header_y: Option<u16>,
}

impl TableViewport {
    /// Column under a click, if the click landed on a header cell
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        if self.header_y != Some(y) {
            return None;
        }
        self.header_slots
            .iter()
            .find(|s| x >= s.x && x < s.x + s.width)
            .and_then(|s| s.column)
    }

    /// Keep focus and offsets inside the current table
    pub fn clamp(&mut self, column_count: usize, pinned_count: usize, row_count: usize) {
        self.focused_column = self.focused_column.min(column_count.saturating_sub(1));
        let unpinned = column_count.saturating_sub(pinned_count);
        self.column_offset = self.column_offset.min(unpinned.saturating_sub(1));

        match self.table_state.selected() {
            _ if row_count == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(row) if row >= row_count => self.table_state.select(Some(row_count - 1)),
            Some(_) => {}
        }
    }

    /// Scroll unpinned columns so the focused column is on screen
    pub fn ensure_focus_visible(&mut self, widths: &[u16], pinned_count: usize, inner_width: u16) {
        if self.focused_column < pinned_count || self.focused_column >= widths.len() {
            return;
        }
        let relative = self.focused_column - pinned_count;
        if relative < self.column_offset {
            self.column_offset = relative;
            return;
        }
        while self.column_offset < relative {
            let slots = layout_columns(widths, pinned_count, self.column_offset, 0, inner_width);
            let fully_visible = slots
                .iter()
                .any(|s| s.column == Some(self.focused_column) && s.width == widths[self.focused_column]);
            if fully_visible {
                break;
            }
            self.column_offset += 1;
        }
    }

    pub fn move_focus(&mut self, delta: isize, column_count: usize) {
        if column_count == 0 {
            return;
        }
        let target = self.focused_column as isize + delta;
        self.focused_column = target.clamp(0, column_count as isize - 1) as usize;
    }

    pub fn scroll_rows(&mut self, delta: isize, row_count: usize) {
        if row_count == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let target = (current + delta).clamp(0, row_count as isize - 1);
        self.table_state.select(Some(target as usize));
    }

    fn forget_geometry(&mut self) {
        self.header_slots.clear();
        self.header_y = None;
    }
}

/// Draw the current render state into `area`
pub fn render_table(
    f: &mut Frame,
    area: Rect,
    render_state: &RenderState,
    icons: &IconConfig,
    max_column_width: u16,
    viewport: &mut TableViewport,
) {
    match render_state {
        RenderState::Loading => {
            viewport.forget_geometry();
            let loading = Paragraph::new(format!("{} Loading...", icons.loading))
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::Yellow));
            f.render_widget(loading, area);
        }
        RenderState::Error(message) => {
            viewport.forget_geometry();
            let error = Paragraph::new(format!("{} {}", icons.error, message))
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            f.render_widget(error, area);
        }
        RenderState::Table(model) if model.headers.is_empty() => {
            viewport.forget_geometry();
            let empty = Paragraph::new("No data")
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::Yellow));
            f.render_widget(empty, area);
        }
        RenderState::Table(model) => render_model(f, area, model, icons, max_column_width, viewport),
    }
}

fn render_model(
    f: &mut Frame,
    area: Rect,
    model: &TableModel,
    icons: &IconConfig,
    max_column_width: u16,
    viewport: &mut TableViewport,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Data ({} rows)", model.rows.len()));
    let inner = block.inner(area);

    let widths = model.column_widths(icons, max_column_width);
    viewport.clamp(model.headers.len(), model.pinned_count, model.rows.len());
    viewport.ensure_focus_visible(&widths, model.pinned_count, inner.width);

    let slots = layout_columns(
        &widths,
        model.pinned_count,
        viewport.column_offset,
        inner.x,
        inner.width,
    );

    let header = build_header_row(model, &slots, icons, viewport.focused_column);
    let rows = build_data_rows(model, &slots, icons);
    let constraints: Vec<Constraint> = slots.iter().map(|s| Constraint::Length(s.width)).collect();

    let table = Table::new(rows, constraints)
        .header(header)
        .block(block)
        .column_spacing(COLUMN_SPACING)
        .row_highlight_style(Style::default().bg(Color::DarkGray));

    f.render_stateful_widget(table, area, &mut viewport.table_state);

    viewport.header_slots = slots;
    viewport.header_y = (inner.height > 0).then_some(inner.y);
}

fn build_header_row(
    model: &TableModel,
    slots: &[ColumnSlot],
    icons: &IconConfig,
    focused: usize,
) -> Row<'static> {
    let cells: Vec<Cell> = slots
        .iter()
        .map(|slot| match slot.column {
            None => Cell::from(SEPARATOR).style(Style::default().fg(Color::DarkGray)),
            Some(idx) => {
                let header = &model.headers[idx];
                let mut style = if header.pinned {
                    Style::default()
                        .bg(Color::Rgb(40, 40, 80))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                };
                if idx == focused {
                    style = style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
                }
                Cell::from(header.display_text(icons)).style(style)
            }
        })
        .collect();

    Row::new(cells)
}

fn build_data_rows(model: &TableModel, slots: &[ColumnSlot], icons: &IconConfig) -> Vec<Row<'static>> {
    model
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<Cell> = slots
                .iter()
                .map(|slot| match slot.column {
                    None => Cell::from(SEPARATOR).style(Style::default().fg(Color::DarkGray)),
                    Some(idx) => {
                        let value = &row[idx];
                        let text = value.display_text(icons);
                        let mut cell = match value {
                            RenderedCell::Number(_) => {
                                Cell::from(Line::from(text).alignment(Alignment::Right))
                            }
                            RenderedCell::Image(_) => {
                                Cell::from(text).style(Style::default().fg(Color::Magenta))
                            }
                            _ => Cell::from(text),
                        };
                        if model.headers[idx].pinned {
                            cell = cell.style(Style::default().bg(Color::Rgb(20, 30, 50)));
                        }
                        cell
                    }
                })
                .collect();
            Row::new(cells)
        })
        .collect()
}
