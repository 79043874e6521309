//! Dashboard application state and event loop.
//!
//! The app holds one built dataset at a time; `r` re-runs the whole
//! fetch→decode→build pipeline against the live sheet (no caching), and
//! `o` toggles the overdue-only view via `filter_overdue`.

use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use tokio::runtime::Runtime;
use url::Url;

use docboard_dataset::{build_dataset, filter_overdue};
use docboard_fetch::Fetcher;
use docboard_shared::{AppConfig, Dataset, DocboardError, JobDoc, load_config};

use crate::widgets::{centered_rect, metric, status_bar};

/// Application state.
pub(crate) struct App {
    /// The most recently built dataset.
    pub dataset: Dataset,
    /// Whether the table shows only overdue records.
    pub only_overdue: bool,
    /// Table cursor.
    pub table_state: TableState,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Status message shown in bottom bar.
    pub status: String,
    /// Whether help overlay is visible.
    pub show_help: bool,
}

impl App {
    fn new(dataset: Dataset) -> Self {
        let mut table_state = TableState::default();
        if !dataset.docs.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            dataset,
            only_overdue: false,
            table_state,
            should_quit: false,
            status: "Готово — ? для справки".to_string(),
            show_help: false,
        }
    }

    /// The records the table currently shows (a new view, never a
    /// destructive update of the dataset).
    fn visible_docs(&self) -> Vec<JobDoc> {
        if self.only_overdue {
            filter_overdue(&self.dataset.docs)
        } else {
            self.dataset.docs.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline invocation
// ---------------------------------------------------------------------------

/// Run the full pipeline once: fetch, decode, build.
async fn load_dataset(config: &AppConfig) -> docboard_shared::Result<Dataset> {
    config.source.validate()?;

    let csv_url = config.source.csv_url();
    let url = Url::parse(&csv_url)
        .map_err(|e| DocboardError::config(format!("invalid source URL '{csv_url}': {e}")))?;

    let fetcher = Fetcher::new(Duration::from_secs(config.fetch.timeout_secs))?;
    let text = fetcher.fetch_csv(&url).await?;

    build_dataset(&text, &config.source.edit_url(), Local::now().naive_local())
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Entry point — loads the dataset, sets up the terminal, runs the event
/// loop, restores the terminal.
pub(crate) fn run(runtime: &Runtime) -> Result<()> {
    let config = load_config()?;

    // First load happens before the alternate screen so a fatal pipeline
    // error is reported as a normal error message.
    let dataset = runtime.block_on(load_dataset(&config))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, runtime, &config, dataset);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &Runtime,
    config: &AppConfig,
    dataset: Dataset,
) -> Result<()> {
    let mut app = App::new(dataset);

    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, runtime, config, key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    runtime: &Runtime,
    config: &AppConfig,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    match code {
        KeyCode::Char('o') => {
            app.only_overdue = !app.only_overdue;
            app.table_state.select(if app.visible_docs().is_empty() {
                None
            } else {
                Some(0)
            });
            app.status = if app.only_overdue {
                "Только просроченные".to_string()
            } else {
                "Все записи".to_string()
            };
        }
        KeyCode::Char('r') => {
            // Per-view rebuild: the dataset is reconstructed from scratch.
            match runtime.block_on(load_dataset(config)) {
                Ok(dataset) => {
                    let selected = app.table_state.selected();
                    app.dataset = dataset;
                    let len = app.visible_docs().len();
                    app.table_state.select(match selected {
                        Some(i) if len > 0 => Some(i.min(len - 1)),
                        _ if len > 0 => Some(0),
                        _ => None,
                    });
                    app.status = format!(
                        "Обновлено в {}",
                        app.dataset.evaluated_at.format("%H:%M:%S")
                    );
                }
                Err(e) => {
                    app.status = format!("Ошибка обновления: {e}");
                }
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let len = app.visible_docs().len();
            if let Some(i) = app.table_state.selected() {
                if i > 0 && len > 0 {
                    app.table_state.select(Some(i - 1));
                }
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let len = app.visible_docs().len();
            if let Some(i) = app.table_state.selected() {
                if i + 1 < len {
                    app.table_state.select(Some(i + 1));
                }
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Metrics
            Constraint::Min(1),    // Table
            Constraint::Length(1), // Source link
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_metrics(f, app, chunks[0]);
    draw_table(f, app, chunks[1]);

    let link = Paragraph::new(format!(
        " Редактировать данные: {}",
        app.dataset.source_url
    ))
    .style(Style::default().fg(Color::Blue));
    f.render_widget(link, chunks[2]);

    let filter_mark = if app.only_overdue { "[x]" } else { "[ ]" };
    let status_line = format!(
        "{}  │  {filter_mark} только просроченные (o)  r: обновить  ?: справка  q: выход",
        app.status
    );
    let bar = status_bar(&status_line);
    f.render_widget(bar, chunks[3]);

    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_metrics(f: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let summary = app.dataset.summary;
    f.render_widget(metric("Всего инструкций", summary.total, false), cols[0]);
    f.render_widget(metric("Требуют обновления", summary.expired, true), cols[1]);
    f.render_widget(metric("Нет PDF", summary.missing_pdf, true), cols[2]);
}

fn draw_table(f: &mut Frame, app: &mut App, area: Rect) {
    let docs = app.visible_docs();

    let header = Row::new(vec![
        "Должность",
        "Отдел",
        "Обновлено",
        "Актуально до",
        "PDF",
        "Просрочено",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = docs
        .iter()
        .map(|doc| {
            // Overdue rows get the highlight of the original dashboard.
            let style = if doc.overdue {
                Style::default().fg(Color::White).bg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(doc.position.clone()),
                Cell::from(doc.department.clone()),
                Cell::from(fmt_date(doc.updated_at)),
                Cell::from(fmt_datetime(doc.valid_until)),
                Cell::from(if doc.has_pdf { "да" } else { "—" }),
                Cell::from(if doc.overdue { "ДА" } else { "" }),
            ])
            .style(style)
        })
        .collect();

    let title = if app.only_overdue {
        format!(" Должностные инструкции — просроченные ({}) ", docs.len())
    } else {
        format!(" Должностные инструкции ({}) ", docs.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(26),
            Constraint::Percentage(20),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(5),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("▸ ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 50, f.area());

    let help_text = vec![
        Line::from("Клавиши").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  o            Только просроченные вкл/выкл"),
        Line::from("  r            Перечитать таблицу"),
        Line::from("  ↑/↓ j/k      Навигация по списку"),
        Line::from("  ?            Показать/скрыть справку"),
        Line::from("  q / Ctrl-C   Выход"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Справка — любая клавиша закрывает ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn fmt_datetime(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}
