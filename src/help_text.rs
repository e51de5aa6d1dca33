use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Key and mouse bindings shown in the F1 overlay
pub fn help_lines(pin_modifier: &str) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Green);

    let entry = |k: String, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<18}", k), key),
            Span::raw(desc),
        ])
    };

    vec![
        Line::from(Span::styled("Mouse", heading)),
        entry("Click header".to_string(), "Sort: ascending, descending, reset"),
        entry(format!("{}+Click header", pin_modifier), "Pin / unpin column"),
        Line::from(""),
        Line::from(Span::styled("Columns", heading)),
        entry("← → / h l".to_string(), "Move column focus"),
        entry("Enter / s".to_string(), "Sort focused column"),
        entry("Space / p".to_string(), "Pin / unpin focused column"),
        Line::from(""),
        Line::from(Span::styled("Rows", heading)),
        entry("↑ ↓ / k j".to_string(), "Move selection"),
        entry("PgUp PgDn".to_string(), "Page up / down"),
        entry("Home End / g G".to_string(), "First / last row"),
        Line::from(""),
        Line::from(Span::styled("General", heading)),
        entry("F1 / ?".to_string(), "Toggle this help"),
        entry("F5".to_string(), "Toggle debug log"),
        entry("q / Esc / Ctrl+C".to_string(), "Close overlay or quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_names_pin_modifier() {
        let text: Vec<String> = help_lines("Alt").iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l.contains("Alt+Click header")));
        assert!(text.iter().any(|l| l.contains("Sort: ascending, descending, reset")));
    }
}
