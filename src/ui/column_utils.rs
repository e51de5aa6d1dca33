//! Header labels and column width calculations
use ratatui::text::Span;

/// Header label: the column name with its first character upper-cased
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Terminal display width of a string
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Natural width of a column: its widest header or cell text, clamped to
/// `1..=max_width`
pub fn column_width<'a>(
    header: &str,
    cells: impl Iterator<Item = &'a str>,
    max_width: u16,
) -> u16 {
    let widest = cells
        .map(display_width)
        .chain(std::iter::once(display_width(header)))
        .max()
        .unwrap_or(0);
    widest.clamp(1, usize::from(max_width.max(1))) as u16
}
