use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::config::config::Config;
use crate::data::data_view::{DataView, SortOrder};
use crate::help_text::help_lines;
use crate::services::{DataLoaderService, DataSource, LoadMessage};
use crate::state::{Action, AppState};
use crate::ui::cell_renderer::CellRenderer;
use crate::ui::column_utils::capitalize;
use crate::ui::table_renderer::{build_render_state, render_table, RenderState, TableViewport};
use crate::utils::logging::get_log_buffer;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const PAGE_SIZE: isize = 10;
const LOG_OVERLAY_ENTRIES: usize = 200;

pub struct TuiApp {
    state: AppState,
    config: Config,
    cells: CellRenderer,
    viewport: TableViewport,
    source: DataSource,
    loader: Option<Receiver<LoadMessage>>,
    pin_modifiers: KeyModifiers,
    show_help: bool,
    show_logs: bool,
    drawn_generation: Option<u64>,
    needs_redraw: bool,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(config: Config, source: DataSource) -> Result<Self> {
        let cells = CellRenderer::new(&config.display)?;
        let view = DataView::with_default_sort_column(config.behavior.default_sort_column.clone());
        let state = AppState::new(view).with_sort_on_load(config.behavior.sort_on_load);

        Ok(Self {
            state,
            cells,
            viewport: TableViewport::default(),
            source,
            loader: None,
            pin_modifiers: config.behavior.pin_modifiers(),
            config,
            show_help: false,
            show_logs: false,
            drawn_generation: None,
            needs_redraw: true,
            should_quit: false,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn focused_column(&self) -> usize {
        self.viewport.focused_column
    }

    /// Kick off the one load of this session on a worker thread
    pub fn start_load(&mut self) {
        if self.loader.is_some() {
            warn!(target: "TuiApp", "Load already in flight, ignoring");
            return;
        }
        self.state.begin_load(&self.source.describe());
        let service = DataLoaderService::new(self.source.clone(), self.config.api.timeout());
        self.loader = Some(service.spawn());
    }

    /// Apply a finished load if one has arrived. Returns true when state changed.
    pub fn poll_loader(&mut self) -> bool {
        let Some(rx) = &self.loader else {
            return false;
        };

        let message = match rx.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                // Worker died without reporting
                self.loader = None;
                self.state
                    .finish_load(Err(anyhow::anyhow!("Loader thread exited without a result")));
                return true;
            }
        };

        self.loader = None;
        info!(target: "TuiApp", "Load finished in {:?}", message.elapsed);
        self.state.finish_load(message.result);
        true
    }

    /// Apply a user action, keeping column focus on the same column name
    pub fn apply(&mut self, action: Action) {
        if self.state.is_loading() || self.state.error().is_some() {
            return;
        }
        let event = self.state.apply(&action);
        debug!(target: "TuiApp", "{:?} -> {:?}", action, event);

        if let Action::TogglePin(column) = &action {
            if let Some(idx) = self
                .state
                .view()
                .column_names()
                .iter()
                .position(|c| c == column)
            {
                self.viewport.focused_column = idx;
            }
        }
    }

    fn focused_column_name(&self) -> Option<String> {
        self.state
            .view()
            .column_names()
            .get(self.viewport.focused_column)
            .cloned()
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) => self.needs_redraw = true,
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        trace!(target: "input", "Key: {:?}", key);
        self.needs_redraw = true;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let column_count = self.state.view().column_names().len();
        let row_count = self.state.view().row_count();

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                if self.show_help || self.show_logs {
                    self.show_help = false;
                    self.show_logs = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::F(5) => self.show_logs = !self.show_logs,
            KeyCode::Left | KeyCode::Char('h') => self.viewport.move_focus(-1, column_count),
            KeyCode::Right | KeyCode::Char('l') => self.viewport.move_focus(1, column_count),
            KeyCode::Enter | KeyCode::Char('s') => {
                if let Some(column) = self.focused_column_name() {
                    self.apply(Action::Sort(column));
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                if let Some(column) = self.focused_column_name() {
                    self.apply(Action::TogglePin(column));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.viewport.scroll_rows(-1, row_count),
            KeyCode::Down | KeyCode::Char('j') => self.viewport.scroll_rows(1, row_count),
            KeyCode::PageUp => self.viewport.scroll_rows(-PAGE_SIZE, row_count),
            KeyCode::PageDown => self.viewport.scroll_rows(PAGE_SIZE, row_count),
            KeyCode::Home | KeyCode::Char('g') => self.viewport.scroll_rows(isize::MIN / 2, row_count),
            KeyCode::End | KeyCode::Char('G') => self.viewport.scroll_rows(isize::MAX / 2, row_count),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        // Overlays cover the header
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.show_help || self.show_logs {
            return;
        }
        let Some(idx) = self.viewport.hit_test(mouse.column, mouse.row) else {
            return;
        };
        let Some(column) = self.state.view().column_names().get(idx).cloned() else {
            return;
        };

        let modified = mouse.modifiers.intersects(self.pin_modifiers);
        debug!(target: "input", "Header click on {} (modified={})", column, modified);
        self.viewport.focused_column = idx;
        self.needs_redraw = true;
        self.apply(Action::from_header_click(&column, modified));
    }

    fn is_dirty(&self) -> bool {
        self.needs_redraw || self.drawn_generation != Some(self.state.generation())
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let render_state = build_render_state(&self.state, &self.cells);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(f.area());

        render_table(
            f,
            chunks[0],
            &render_state,
            self.cells.icons(),
            self.config.display.max_column_width,
            &mut self.viewport,
        );

        if matches!(render_state, RenderState::Table(_)) {
            self.render_status(f, chunks[1]);
        }
        if self.show_help {
            self.render_help(f);
        }
        if self.show_logs {
            self.render_logs(f);
        }

        self.drawn_generation = Some(self.state.generation());
        self.needs_redraw = false;
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let view = self.state.view();
        let sort = view.sort_state();
        let sort_text = match (view.is_sort_applied(), sort.order) {
            (false, _) => "fetch order".to_string(),
            (true, SortOrder::Ascending) => format!("{} asc", sort.column),
            (true, SortOrder::Descending) => format!("{} desc", sort.column),
        };
        let pins = if view.get_pinned_columns().is_empty() {
            "none".to_string()
        } else {
            view.get_pinned_columns().join(", ")
        };

        let status = Line::from(vec![
            Span::styled(
                format!(" {} ", self.source.describe()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(format!(
                " {} rows | sort: {} | pinned: {} | F1 help",
                view.row_count(),
                sort_text,
                pins
            )),
        ]);
        f.render_widget(Paragraph::new(status), area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = centered_rect(60, 70, f.area());
        let help = Paragraph::new(help_lines(&capitalize(&self.config.behavior.pin_modifier)))
            .block(Block::default().borders(Borders::ALL).title("Help (F1)"));
        f.render_widget(Clear, area);
        f.render_widget(help, area);
    }

    fn render_logs(&self, f: &mut Frame) {
        let area = centered_rect(90, 80, f.area());
        let lines: Vec<Line> = get_log_buffer()
            .map(|buffer| buffer.get_recent(LOG_OVERLAY_ENTRIES))
            .unwrap_or_default()
            .into_iter()
            .map(|entry| Line::from(entry.format_for_display()))
            .collect();

        // Show the tail that fits
        let visible = usize::from(area.height.saturating_sub(2));
        let skip = lines.len().saturating_sub(visible);
        let logs = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>())
            .block(Block::default().borders(Borders::ALL).title("Debug log (F5)"));
        f.render_widget(Clear, area);
        f.render_widget(logs, area);
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.poll_loader();

            if self.is_dirty() {
                terminal.draw(|f| self.draw(f))?;
            }

            if self.should_quit {
                break;
            }

            if event::poll(POLL_INTERVAL)? {
                let event = event::read()?;
                self.handle_event(event);
            }
        }
        Ok(())
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

/// Set up the terminal, run the app, and restore the terminal on every exit path
pub fn run_tui(config: Config, source: DataSource) -> Result<()> {
    let mut app = TuiApp::new(config, source)?;

    enable_raw_mode()
        .map_err(|e| anyhow::anyhow!("Failed to enable raw mode: {}. Try --print instead.", e))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
        }
    };

    app.start_load();
    let res = app.run(&mut terminal);

    // Always restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();

    res.map_err(|e| anyhow::anyhow!("TUI error: {}", e))
}
