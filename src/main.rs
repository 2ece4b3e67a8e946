use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use hoops_terminal::config::{load_dotenv, snapshot_path_from_env, snapshot_poll_interval};
use hoops_terminal::dashboard::{console_text, game_body_text, game_header_text, sidebar_text};
use hoops_terminal::export::export_snapshot;
use hoops_terminal::snapshot;
use hoops_terminal::state::AppState;

const PAGE: u16 = 10;

struct App {
    state: AppState,
    should_quit: bool,
    snapshot_path: PathBuf,
    poll_interval: Duration,
    last_poll: Instant,
}

impl App {
    fn new(snapshot_path: PathBuf, poll_interval: Duration) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            snapshot_path,
            poll_interval,
            last_poll: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_game(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev_game(),
            KeyCode::Char('l') | KeyCode::Right => self.state.select_next_date(),
            KeyCode::Char('h') | KeyCode::Left => self.state.select_prev_date(),
            KeyCode::PageDown => self.state.scroll_down(PAGE),
            KeyCode::PageUp => self.state.scroll_up(PAGE),
            KeyCode::Char('r') => self.reload(true),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }

    fn reload(&mut self, manual: bool) {
        let mtime = snapshot::modified_at(&self.snapshot_path);
        match snapshot::load(&self.snapshot_path) {
            Ok(snap) => {
                let games = snap.games.len();
                self.state.set_snapshot(snap, mtime);
                let how = if manual { "Reloaded" } else { "Loaded" };
                self.state.push_log(format!(
                    "[INFO] {how} {} ({games} games)",
                    self.snapshot_path.display()
                ));
            }
            Err(err) => {
                self.state.snapshot_mtime = mtime;
                self.state.set_load_error(format!("{err:#}"));
            }
        }
    }

    fn maybe_reload(&mut self) {
        if self.last_poll.elapsed() < self.poll_interval {
            return;
        }
        self.last_poll = Instant::now();
        let mtime = snapshot::modified_at(&self.snapshot_path);
        if mtime.is_some() && mtime != self.state.snapshot_mtime {
            self.reload(false);
        }
    }

    fn export(&mut self) {
        let Some(snap) = self.state.snapshot.as_ref() else {
            self.state.push_log("[WARN] Nothing to export");
            return;
        };
        let path = export_path(&snap.last_updated);
        match export_snapshot(&path, snap) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} games, {} logs to {}",
                report.games,
                report.log_rows,
                path.display()
            )),
            Err(err) => self
                .state
                .push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn export_path(last_updated: &str) -> PathBuf {
    let stamp: String = last_updated
        .chars()
        .take(16)
        .map(|c| if c.is_ascii_digit() { c } else { '_' })
        .collect();
    PathBuf::from(format!("hoops_export_{stamp}.xlsx"))
}

fn main() -> io::Result<()> {
    load_dotenv();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(snapshot_path_from_env(), snapshot_poll_interval());
    app.reload(false);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.maybe_reload();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(40)])
        .split(chunks[1]);

    let sidebar = Paragraph::new(sidebar_text(&app.state))
        .block(Block::default().title("Games").borders(Borders::ALL));
    frame.render_widget(sidebar, columns[0]);

    render_game(frame, columns[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "j/k Game | h/l Date | PgUp/PgDn Scroll | r Reload | e Export | ? Help | q Quit",
    );
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.selected_game() {
        Some(game) => format!("HOOPS TERMINAL | {}", game_header_text(game).replace('\n', " | ")),
        None => "HOOPS TERMINAL".to_string(),
    };
    format!("  ()   {title}\n (__)")
}

fn render_game(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Matchup").borders(Borders::ALL);

    if state.snapshot.is_none() {
        let msg = match &state.load_error {
            Some(err) => format!("Snapshot not available: {err}\n\nRun `prefetch` to collect data."),
            None => "No snapshot yet. Run `prefetch` to collect data.".to_string(),
        };
        let paragraph = Paragraph::new(msg)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let text = match state.selected_game() {
        Some(game) => game_body_text(game),
        None => "No games on this date".to_string(),
    };
    let paragraph = Paragraph::new(text)
        .block(block)
        .scroll((state.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Hoops Terminal - Help",
        "",
        "  j/k or ↓/↑   Next / previous game",
        "  h/l or ←/→   Previous / next date",
        "  PgUp/PgDn    Scroll the matchup",
        "  r            Reload snapshot",
        "  e            Export snapshot to xlsx",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "The snapshot reloads by itself when prefetch rewrites it.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
