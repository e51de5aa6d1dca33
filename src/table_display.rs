use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::config::config::IconConfig;
use crate::ui::cell_renderer::RenderedCell;
use crate::ui::table_renderer::{RenderState, TableModel};

/// Build a comfy-table from the render model
pub fn build_table(model: &TableModel, icons: &IconConfig) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = model
        .headers
        .iter()
        .map(|h| Cell::new(h.display_text(icons)).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(headers);

    for row in &model.rows {
        let cells: Vec<Cell> = row
            .iter()
            .map(|value| {
                let cell = Cell::new(value.display_text(icons));
                match value {
                    RenderedCell::Number(_) => cell.set_alignment(CellAlignment::Right),
                    _ => cell,
                }
            })
            .collect();
        table.add_row(cells);
    }

    table
}

/// Text printed by `--print`
pub fn render_to_string(render_state: &RenderState, icons: &IconConfig) -> String {
    match render_state {
        RenderState::Loading => format!("{} Loading...", icons.loading),
        RenderState::Error(message) => message.clone(),
        RenderState::Table(model) if model.headers.is_empty() => "No data".to_string(),
        RenderState::Table(model) => {
            format!("{}\n{} rows", build_table(model, icons), model.rows.len())
        }
    }
}
