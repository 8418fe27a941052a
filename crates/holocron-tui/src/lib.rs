// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use holocron_app::{
    AppCommand, AppState, Collection, CollectionView, DetailLine, FetchTicket, PageEnvelope,
    Screen, Theme, TransportKind, ViewStatus, detail_lines, detail_title,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const CARD_COLUMNS: usize = 2;
const CARD_WIDTH: usize = 30;

/// Everything the event loop needs from the outside world. Implementations
/// wrap the HTTP client or an offline fixture catalog; the loop itself never
/// touches the network.
pub trait CatalogRuntime {
    fn fetch_page(&mut self, collection: Collection, page: u32) -> Result<PageEnvelope>;

    /// Runs the fetch and reports the outcome through the internal channel.
    /// The default runs inline, which suits fixture-backed runtimes and
    /// tests; network-backed runtimes override this to move the round trip
    /// off the render thread.
    fn spawn_fetch(&mut self, ticket: FetchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let outcome = self
            .fetch_page(ticket.collection, ticket.page)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::PageLoaded { ticket, outcome })
            .map_err(|_| anyhow::anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    PageLoaded {
        ticket: FetchTicket,
        outcome: Result<PageEnvelope, String>,
    },
}

/// One browsable collection plus its grid cursor. The cursor is a display
/// concern, so it lives here rather than in the view itself.
#[derive(Debug, Clone, PartialEq)]
struct CollectionUi {
    view: CollectionView,
    cursor: usize,
}

impl CollectionUi {
    fn new(collection: Collection) -> Self {
        Self {
            view: CollectionView::new(collection),
            cursor: 0,
        }
    }

    fn clamp_cursor(&mut self) {
        let last = self.view.records.len().saturating_sub(1);
        self.cursor = self.cursor.min(last);
    }

    fn move_cursor(&mut self, columns: isize, rows: isize) {
        if self.view.records.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.view.records.len() as isize - 1;
        let delta = columns + rows * CARD_COLUMNS as isize;
        let next = (self.cursor as isize + delta).clamp(0, last);
        self.cursor = next as usize;
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DetailOverlay {
    collection: Collection,
    title: String,
    lines: Vec<DetailLine>,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    characters: CollectionUi,
    planets: CollectionUi,
    vehicles: CollectionUi,
    starships: CollectionUi,
    detail: Option<DetailOverlay>,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new() -> Self {
        Self {
            characters: CollectionUi::new(Collection::People),
            planets: CollectionUi::new(Collection::Planets),
            vehicles: CollectionUi::new(Collection::Vehicles),
            starships: CollectionUi::new(Collection::Starships),
            detail: None,
            help_visible: false,
            status_token: 0,
        }
    }

    /// The collection browsed by the active screen; Home browses nothing.
    /// The transport screen resolves through its sub-collection toggle, each
    /// side keeping its own page and cursor.
    fn active_ui_mut(&mut self, state: &AppState) -> Option<&mut CollectionUi> {
        match state.screen {
            Screen::Home => None,
            Screen::Characters => Some(&mut self.characters),
            Screen::Planets => Some(&mut self.planets),
            Screen::Transport => Some(self.ui_for_mut(state.transport_kind.collection())),
        }
    }

    fn active_ui(&self, state: &AppState) -> Option<&CollectionUi> {
        match state.screen {
            Screen::Home => None,
            Screen::Characters => Some(&self.characters),
            Screen::Planets => Some(&self.planets),
            Screen::Transport => match state.transport_kind {
                TransportKind::Vehicles => Some(&self.vehicles),
                TransportKind::Starships => Some(&self.starships),
            },
        }
    }

    fn ui_for_mut(&mut self, collection: Collection) -> &mut CollectionUi {
        match collection {
            Collection::People => &mut self.characters,
            Collection::Planets => &mut self.planets,
            Collection::Vehicles => &mut self.vehicles,
            Collection::Starships => &mut self.starships,
        }
    }
}

pub fn run_app<R: CatalogRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        ensure_active_loaded(state, runtime, &mut view_data, &internal_tx);
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Kicks off the first fetch for a screen the user just landed on. Only an
/// Idle view qualifies; Loading, Ready, and Failed views are left alone so
/// the loop never re-issues a fetch on its own.
fn ensure_active_loaded<R: CatalogRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let ticket = {
        let Some(ui) = view_data.active_ui_mut(state) else {
            return;
        };
        if ui.view.status != ViewStatus::Idle {
            return;
        }
        let page = ui.view.current_page;
        match ui.view.request_page(page) {
            Some(ticket) => ticket,
            None => return,
        }
    };
    start_fetch(runtime, view_data, internal_tx, ticket);
}

fn start_fetch<R: CatalogRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    ticket: FetchTicket,
) {
    if let Err(error) = runtime.spawn_fetch(ticket, internal_tx.clone()) {
        view_data
            .ui_for_mut(ticket.collection)
            .view
            .resolve(ticket.seq, Err(format!("{error:#}")));
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::PageLoaded { ticket, outcome } => {
                let failed = outcome.is_err();
                let ui = view_data.ui_for_mut(ticket.collection);
                let accepted = ui.view.resolve(ticket.seq, outcome);
                if accepted {
                    ui.clamp_cursor();
                }
                if accepted && failed {
                    let message = format!(
                        "{} page {} failed; n/p to retry",
                        ticket.collection.label(),
                        ticket.page
                    );
                    emit_status(state, view_data, tx, message);
                }
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

/// Arms the auto-clear for whatever message is currently in the status line.
fn touch_status(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    touch_status(view_data, internal_tx);
}

fn handle_key_event<R: CatalogRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if let Some(overlay) = &view_data.detail {
        if key.code == KeyCode::Esc {
            let collection = overlay.collection;
            view_data.detail = None;
            view_data.ui_for_mut(collection).view.clear_selection();
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Char('t') => {
            state.dispatch(AppCommand::ToggleTheme);
            touch_status(view_data, internal_tx);
        }
        KeyCode::Char('f') | KeyCode::Tab => {
            state.dispatch(AppCommand::NextScreen);
            retry_failed_view(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('b') | KeyCode::BackTab => {
            state.dispatch(AppCommand::PrevScreen);
            retry_failed_view(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('v') if state.screen == Screen::Transport => {
            state.dispatch(AppCommand::SetTransportKind(TransportKind::Vehicles));
            touch_status(view_data, internal_tx);
            retry_failed_view(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('s') if state.screen == Screen::Transport => {
            state.dispatch(AppCommand::SetTransportKind(TransportKind::Starships));
            touch_status(view_data, internal_tx);
            retry_failed_view(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('n') => change_page(state, runtime, view_data, internal_tx, 1),
        KeyCode::Char('p') => change_page(state, runtime, view_data, internal_tx, -1),
        KeyCode::Char('g') => goto_page(state, runtime, view_data, internal_tx, PageTarget::First),
        KeyCode::Char('G') => goto_page(state, runtime, view_data, internal_tx, PageTarget::Last),
        KeyCode::Char('h') | KeyCode::Left => move_cursor(state, view_data, -1, 0),
        KeyCode::Char('l') | KeyCode::Right => move_cursor(state, view_data, 1, 0),
        KeyCode::Char('j') | KeyCode::Down => move_cursor(state, view_data, 0, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(state, view_data, 0, -1),
        KeyCode::Enter => open_detail(state, view_data),
        KeyCode::Esc => {
            if state.status_line.is_some() {
                state.dispatch(AppCommand::ClearStatus);
            }
        }
        _ => {}
    }
    false
}

/// Re-entering a failed view retries its current page. Recovery stays
/// user-driven: the loop itself never retries a Failed view.
fn retry_failed_view<R: CatalogRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let ticket = {
        let Some(ui) = view_data.active_ui_mut(state) else {
            return;
        };
        if ui.view.status != ViewStatus::Failed {
            return;
        }
        ui.view.refresh()
    };
    start_fetch(runtime, view_data, internal_tx, ticket);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageTarget {
    First,
    Last,
}

fn change_page<R: CatalogRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    delta: i64,
) {
    let ticket = {
        let Some(ui) = view_data.active_ui_mut(state) else {
            return;
        };
        let target = (i64::from(ui.view.current_page) + delta).max(1) as u32;
        match ui.view.request_page(target) {
            Some(ticket) => {
                ui.cursor = 0;
                ticket
            }
            None => return,
        }
    };
    start_fetch(runtime, view_data, internal_tx, ticket);
}

fn goto_page<R: CatalogRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    target: PageTarget,
) {
    let ticket = {
        let Some(ui) = view_data.active_ui_mut(state) else {
            return;
        };
        let page = match target {
            PageTarget::First => 1,
            // Without a known page count there is no "last" to jump to.
            PageTarget::Last if ui.view.total_pages == 0 => return,
            PageTarget::Last => ui.view.total_pages,
        };
        match ui.view.request_page(page) {
            Some(ticket) => {
                ui.cursor = 0;
                ticket
            }
            None => return,
        }
    };
    start_fetch(runtime, view_data, internal_tx, ticket);
}

fn move_cursor(state: &AppState, view_data: &mut ViewData, columns: isize, rows: isize) {
    if let Some(ui) = view_data.active_ui_mut(state) {
        ui.move_cursor(columns, rows);
    }
}

fn open_detail(state: &AppState, view_data: &mut ViewData) {
    let overlay = {
        let Some(ui) = view_data.active_ui_mut(state) else {
            return;
        };
        let cursor = ui.cursor;
        let collection = ui.view.collection();
        let Some(record) = ui.view.select(cursor) else {
            return;
        };
        DetailOverlay {
            collection,
            title: detail_title(record, collection.detail_title()),
            lines: detail_lines(collection, record, &[]),
        }
    };
    view_data.detail = Some(overlay);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    text: Color,
    accent: Color,
    chrome: Color,
    error: Color,
}

const fn palette_for(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Color::White,
            accent: Color::Cyan,
            chrome: Color::DarkGray,
            error: Color::Red,
        },
        Theme::Light => Palette {
            text: Color::Black,
            accent: Color::Blue,
            chrome: Color::Gray,
            error: Color::LightRed,
        },
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let palette = palette_for(state.theme);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = Screen::ALL
        .iter()
        .position(|screen| *screen == state.screen)
        .unwrap_or(0);
    let tab_titles = Screen::ALL
        .iter()
        .map(|screen| screen.label().to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("holocron").borders(Borders::ALL))
        .style(Style::default().fg(palette.text))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match view_data.active_ui(state) {
        None => {
            let body = Paragraph::new(home_text())
                .style(Style::default().fg(palette.text))
                .block(Block::default().borders(Borders::ALL).title("welcome"));
            frame.render_widget(body, layout[1]);
        }
        Some(ui) => {
            let style = if ui.view.last_error.is_some() {
                Style::default().fg(palette.error)
            } else {
                Style::default().fg(palette.text)
            };
            let body = Paragraph::new(collection_body_text(ui)).style(style).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(body_title(state, ui)),
            );
            frame.render_widget(body, layout[1]);
        }
    }

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(palette.chrome))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(overlay) = &view_data.detail {
        let area = centered_rect(62, 66, frame.area());
        frame.render_widget(Clear, area);
        let detail = Paragraph::new(detail_overlay_text(overlay)).block(
            Block::default()
                .title(overlay.title.clone())
                .borders(Borders::ALL)
                .style(Style::default().fg(palette.accent)),
        );
        frame.render_widget(detail, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 72, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn body_title(state: &AppState, ui: &CollectionUi) -> String {
    let base = match state.screen {
        Screen::Transport => format!(
            "transport / {} (v: vehicles, s: starships)",
            state.transport_kind.label()
        ),
        screen => screen.label().to_owned(),
    };
    if ui.view.total_pages > 0 {
        format!(
            "{base} | page {}/{}",
            ui.view.current_page, ui.view.total_pages
        )
    } else {
        base
    }
}

/// Body text for a collection screen. Pure so the states are testable: a
/// fresh load shows the indicator, a re-fetch keeps the stale cards, and a
/// failure prepends the error while the cards stay on screen.
fn collection_body_text(ui: &CollectionUi) -> String {
    let mut lines = Vec::new();

    if let Some(error) = &ui.view.last_error {
        lines.push(format!("error: {error}"));
        lines.push(String::new());
    }

    if ui.view.status == ViewStatus::Loading && !ui.view.has_loaded() {
        lines.push(format!("loading {}...", ui.view.collection().label()));
        return lines.join("\n");
    }

    if ui.view.records.is_empty() {
        lines.push("no records".to_owned());
        return lines.join("\n");
    }

    for (row_index, row) in ui.view.records.chunks(CARD_COLUMNS).enumerate() {
        let mut cells = Vec::new();
        for (column_index, record) in row.iter().enumerate() {
            let index = row_index * CARD_COLUMNS + column_index;
            let marker = if index == ui.cursor { '>' } else { ' ' };
            let name = record.name().unwrap_or("(unnamed)");
            cells.push(format!("{marker} {name:<width$}", width = CARD_WIDTH));
        }
        lines.push(cells.join("  ").trim_end().to_owned());
    }

    if ui.view.shows_navigator() {
        lines.push(String::new());
        lines.push(format!(
            "page {}/{}  n/p page  g/G first/last",
            ui.view.current_page, ui.view.total_pages
        ));
    }

    lines.join("\n")
}

fn detail_overlay_text(overlay: &DetailOverlay) -> String {
    if overlay.lines.is_empty() {
        return "no displayable fields".to_owned();
    }
    overlay
        .lines
        .iter()
        .map(|line| format!("{}: {}", line.label, line.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn home_text() -> String {
    [
        "Welcome to the holocron catalog browser.",
        "",
        "Browse characters, planets, and transport craft from the",
        "galactic reference catalog. Records load ten to a page;",
        "open any card for its full details.",
        "",
        "f/b to change screens, ? for all key bindings.",
    ]
    .join("\n")
}

fn status_text(state: &AppState) -> String {
    match &state.status_line {
        Some(message) => message.clone(),
        None => "f/b screens  enter detail  t theme  ? help  q quit".to_owned(),
    }
}

fn help_overlay_text() -> String {
    [
        "f / b        next / previous screen",
        "h j k l      move the card cursor (arrows work too)",
        "n / p        next / previous page",
        "g / G        first / last page",
        "v / s        transport: vehicles / starships",
        "enter        open detail for the selected card",
        "esc          dismiss overlay or status",
        "t            toggle light/dark theme",
        "?            toggle this help",
        "q / ctrl-q   quit",
    ]
    .join("\n")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
