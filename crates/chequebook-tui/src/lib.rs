// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use chequebook_app::validation::{DateDisplay, format_rupees};
use chequebook_app::{
    AppCommand, AppEvent, AppMode, AppState, BadgeVariant, Cheque, ChequeDraft, ChequeId,
    ChequeType, FetchTicket, FormField, FormKind, FormPayload, Notice, NoticeKind, TabKind, UserId,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use log::{debug, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

pub const SIGN_IN_REQUIRED: &str = "sign in required";
const EMPTY_PLACEHOLDER: &str = "No cheques found";
const LOADING_TEXT: &str = "Loading...";
const CONFIRM_TITLE: &str = "Delete Cheque";
const CONFIRM_BODY: &str =
    "Are you sure you want to delete this cheque? This action cannot be undone.";
const COLUMN_COUNT: usize = 7;

pub trait AppRuntime {
    /// The signed-in user, if any. Nothing is fetched without one.
    fn current_user(&self) -> Option<UserId>;
    fn load_cheques(&mut self) -> Result<Vec<Cheque>>;
    fn submit_form(&mut self, payload: &FormPayload) -> Result<()>;
    fn delete_cheque(&mut self, id: &ChequeId) -> Result<()>;
    fn spawn_fetch(&mut self, ticket: FetchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self.load_cheques().map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::FetchCompleted { ticket, result })
            .map_err(|_| anyhow::anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    FetchCompleted {
        ticket: FetchTicket,
        result: Result<Vec<Cheque>, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    selected_rows: [usize; 2],
    status_token: u64,
    date_display: DateDisplay,
}

impl ViewData {
    fn new(date_display: DateDisplay) -> Self {
        Self {
            date_display,
            ..Self::default()
        }
    }

    fn selected_row(&self, tab: TabKind) -> usize {
        self.selected_rows[tab_slot(tab)]
    }

    fn set_selected_row(&mut self, tab: TabKind, row: usize) {
        self.selected_rows[tab_slot(tab)] = row;
    }
}

fn tab_slot(tab: TabKind) -> usize {
    TabKind::ALL
        .iter()
        .position(|candidate| *candidate == tab)
        .unwrap_or(0)
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    date_display: &DateDisplay,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(date_display.clone());
    let (internal_tx, internal_rx) = mpsc::channel();

    request_fetch(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match next_key(Duration::from_millis(120)) {
            Ok(Some(key)) => {
                if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn next_key(timeout: Duration) -> Result<Option<KeyEvent>> {
    if !event::poll(timeout).context("poll event")? {
        return Ok(None);
    }
    match event::read().context("read event")? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
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
            InternalEvent::FetchCompleted { ticket, result } => {
                if let Ok(rows) = &result {
                    debug!("fetch {} returned {} rows", ticket.generation(), rows.len());
                }
                let events = state.dispatch(AppCommand::FinishFetch { ticket, result });
                note_events(state, view_data, tx, &events);
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

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    notice: Notice,
) {
    let events = state.dispatch(AppCommand::Notify(notice));
    note_events(state, view_data, internal_tx, &events);
}

/// Follows up on state events that need view bookkeeping but no backend.
fn note_events(
    state: &AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: &[AppEvent],
) {
    for event in events {
        match event {
            AppEvent::StatusUpdated(notice) => {
                if notice.kind == NoticeKind::Error {
                    warn!("{}", notice.message);
                }
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(internal_tx, view_data.status_token);
            }
            AppEvent::LedgerUpdated { received, issued } => {
                debug!("ledger now holds {received} received and {issued} issued cheques");
                clamp_selected_rows(state, view_data);
            }
            AppEvent::StaleFetchDropped(ticket) => {
                debug!("dropped stale fetch {}", ticket.generation());
            }
            _ => {}
        }
    }
}

fn dispatch_and_follow<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    note_events(state, view_data, internal_tx, &events);
    if events.contains(&AppEvent::RefetchRequested) {
        request_fetch(state, runtime, view_data, internal_tx);
    }
}

fn request_fetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if runtime.current_user().is_none() {
        emit_status(state, view_data, internal_tx, Notice::error(SIGN_IN_REQUIRED));
        return;
    }

    for event in state.dispatch(AppCommand::BeginFetch) {
        let AppEvent::FetchIssued(ticket) = event else {
            continue;
        };
        debug!("fetch {} issued", ticket.generation());
        if let Err(error) = runtime.spawn_fetch(ticket, internal_tx.clone()) {
            let events = state.dispatch(AppCommand::FinishFetch {
                ticket,
                result: Err(format!("{error:#}")),
            });
            note_events(state, view_data, internal_tx, &events);
        }
    }
}

fn clamp_selected_rows(state: &AppState, view_data: &mut ViewData) {
    for tab in TabKind::ALL {
        let len = state.ledger.rows(tab.cheque_type()).len();
        let row = view_data.selected_row(tab).min(len.saturating_sub(1));
        view_data.set_selected_row(tab, row);
    }
}

fn selected_cheque<'a>(state: &'a AppState, view_data: &ViewData) -> Option<&'a Cheque> {
    let tab = state.active_tab;
    state
        .ledger
        .rows(tab.cheque_type())
        .get(view_data.selected_row(tab))
}

fn move_selected_row(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let tab = state.active_tab;
    let len = state.ledger.rows(tab.cheque_type()).len();
    if len == 0 {
        view_data.set_selected_row(tab, 0);
        return;
    }
    let next = view_data
        .selected_row(tab)
        .saturating_add_signed(delta)
        .min(len - 1);
    view_data.set_selected_row(tab, next);
}

fn today() -> time::Date {
    OffsetDateTime::now_utc().date()
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.mode {
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
        AppMode::Form(_) => handle_form_key(state, runtime, view_data, internal_tx, key),
        AppMode::ConfirmDelete => handle_confirm_key(state, runtime, view_data, internal_tx, key),
    }

    false
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Tab, _) | (KeyCode::Char('f'), KeyModifiers::NONE) => {
            dispatch_and_follow(state, runtime, view_data, internal_tx, AppCommand::NextTab);
        }
        (KeyCode::BackTab, _) | (KeyCode::Char('b'), KeyModifiers::NONE) => {
            dispatch_and_follow(state, runtime, view_data, internal_tx, AppCommand::PrevTab);
        }
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            move_selected_row(state, view_data, 1);
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            move_selected_row(state, view_data, -1);
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => {
            view_data.set_selected_row(state.active_tab, 0);
        }
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
            move_selected_row(state, view_data, isize::MAX);
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            dispatch_and_follow(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::OpenAdd { today: today() },
            );
        }
        (KeyCode::Char('e'), KeyModifiers::NONE) => {
            let Some(cheque) = selected_cheque(state, view_data).cloned() else {
                emit_status(state, view_data, internal_tx, Notice::error("no cheque selected"));
                return;
            };
            dispatch_and_follow(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::OpenEdit(cheque),
            );
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            let Some(cheque) = selected_cheque(state, view_data).cloned() else {
                emit_status(state, view_data, internal_tx, Notice::error("no cheque selected"));
                return;
            };
            dispatch_and_follow(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::OpenDelete(cheque),
            );
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            request_fetch(state, runtime, view_data, internal_tx);
        }
        _ => {}
    }
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            dispatch_and_follow(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::CancelDialog,
            );
        }
        (KeyCode::Enter, _) | (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
            let payload = match state.form.as_ref().map(ChequeDraft::to_payload) {
                Some(Ok(payload)) => payload,
                Some(Err(error)) => {
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        Notice::error(format!("form invalid: {error}")),
                    );
                    return;
                }
                None => return,
            };
            if let Err(error) = runtime.submit_form(&payload) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    Notice::error(format!("save failed: {error:#}")),
                );
                return;
            }

            dispatch_and_follow(state, runtime, view_data, internal_tx, AppCommand::FormSaved);
        }
        (KeyCode::Tab, _) => {
            if let Some(draft) = state.draft_mut() {
                draft.move_focus(1);
            }
        }
        (KeyCode::BackTab, _) => {
            if let Some(draft) = state.draft_mut() {
                draft.move_focus(-1);
            }
        }
        (KeyCode::Backspace, _) => {
            if let Some(draft) = state.draft_mut() {
                draft.pop_char();
            }
        }
        (KeyCode::Char(ch), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            let Some(draft) = state.draft_mut() else {
                return;
            };
            if draft.focus.is_choice() {
                let picked = ch
                    .to_digit(10)
                    .and_then(|digit| usize::try_from(digit).ok())
                    .and_then(|digit| digit.checked_sub(1))
                    .and_then(|index| draft.choose_status(index));
                if picked.is_none() {
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        Notice::error("status: press 1-4"),
                    );
                }
                return;
            }
            draft.push_char(ch);
        }
        _ => {}
    }
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('y'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
            let Some(id) = state.selected.as_ref().map(|cheque| cheque.id.clone()) else {
                return;
            };
            let command = match runtime.delete_cheque(&id) {
                Ok(()) => {
                    debug!("deleted cheque {id}");
                    AppCommand::DeleteSucceeded
                }
                Err(error) => AppCommand::DeleteFailed(format!("{error:#}")),
            };
            dispatch_and_follow(state, runtime, view_data, internal_tx, command);
        }
        (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::Esc, _) => {
            dispatch_and_follow(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::CancelDialog,
            );
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab_title(*tab, state))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("chequebook").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(tab_slot(state.active_tab));
    frame.render_widget(tabs, layout[0]);

    if state.ledger.is_loading() && !state.ledger.has_loaded() {
        let loading = Paragraph::new(LOADING_TEXT)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(state.active_tab.label()),
            );
        frame.render_widget(loading, layout[1]);
    } else {
        render_table(frame, layout[1], state, view_data);
    }

    let status = Paragraph::new(status_text(state))
        .style(status_style(state))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    match state.mode {
        AppMode::Nav => {}
        AppMode::Form(kind) => {
            if let Some(draft) = &state.form {
                let area = centered_rect(70, 80, frame.area());
                frame.render_widget(Clear, area);
                let form = Paragraph::new(render_form_text(draft))
                    .block(
                        Block::default()
                            .title(form_title(kind))
                            .borders(Borders::ALL),
                    )
                    .style(Style::default().fg(Color::White));
                frame.render_widget(form, area);
            }
        }
        AppMode::ConfirmDelete => {
            let area = centered_rect(56, 36, frame.area());
            frame.render_widget(Clear, area);
            let prompt = Paragraph::new(render_confirm_text(state))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .title(CONFIRM_TITLE)
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                );
            frame.render_widget(prompt, area);
        }
    }
}

fn tab_title(tab: TabKind, state: &AppState) -> String {
    if !state.ledger.has_loaded() {
        return tab.label().to_owned();
    }
    format!(
        "{} ({})",
        tab.label(),
        state.ledger.rows(tab.cheque_type()).len()
    )
}

fn table_title(state: &AppState) -> String {
    if state.ledger.is_loading() {
        format!("{} (refreshing)", state.active_tab.label())
    } else {
        state.active_tab.label().to_owned()
    }
}

fn column_labels(cheque_type: ChequeType) -> [&'static str; COLUMN_COUNT] {
    [
        "Cheque No.",
        "Date",
        "Amount",
        "Bank",
        cheque_type.party_column_label(),
        "Status",
        "Actions",
    ]
}

fn cheque_cells(cheque: &Cheque, date_display: &DateDisplay) -> [String; COLUMN_COUNT] {
    [
        cheque.cheque_number.clone(),
        date_display.format(cheque.cheque_date),
        format_rupees(cheque.amount_paise),
        cheque.bank_name.clone(),
        cheque
            .party_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("-")
            .to_owned(),
        cheque.status.badge_label().to_owned(),
        actions_label(cheque).to_owned(),
    ]
}

fn actions_label(cheque: &Cheque) -> &'static str {
    if cheque.can_delete() {
        "edit  delete"
    } else {
        "edit"
    }
}

fn badge_style(variant: BadgeVariant) -> Style {
    match variant {
        BadgeVariant::Default => Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
        BadgeVariant::Secondary => Style::default().fg(Color::Black).bg(Color::Gray),
        BadgeVariant::Destructive => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        BadgeVariant::Outline => Style::default().fg(Color::Yellow),
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let cheque_type = state.active_tab.cheque_type();
    let cheques = state.ledger.rows(cheque_type);
    let selected_row = view_data.selected_row(state.active_tab);

    let header = Row::new(column_labels(cheque_type).map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let widths = [
        Constraint::Min(10),
        Constraint::Length(12),
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Length(11),
        Constraint::Length(12),
    ];

    let rows = cheques.iter().enumerate().map(|(row_index, cheque)| {
        let row_style = if row_index == selected_row {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let badge = badge_style(cheque.status.badge());
        let cells = cheque_cells(cheque, &view_data.date_display)
            .into_iter()
            .enumerate()
            .map(|(column, text)| {
                let cell = Cell::from(text);
                if column == 5 {
                    cell.style(badge)
                } else {
                    cell
                }
            })
            .collect::<Vec<_>>();
        Row::new(cells).style(row_style)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(state))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);

    if cheques.is_empty() {
        // Below the border and the header row.
        let placeholder_area = Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(2),
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(3).min(1),
        };
        let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, placeholder_area);
    }
}

fn form_title(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Add(ChequeType::Received) => "Add Received Cheque",
        FormKind::Add(ChequeType::Issued) => "Add Issued Cheque",
        FormKind::Edit => "Edit Cheque",
    }
}

fn render_form_text(draft: &ChequeDraft) -> String {
    let mut lines = Vec::with_capacity(FormField::ALL.len() + 3);
    for field in FormField::ALL {
        let focused = field == draft.focus;
        let marker = if focused { ">" } else { " " };
        let required = if field.is_required() { "*" } else { "" };
        let cursor = if focused && !field.is_choice() {
            "_"
        } else {
            ""
        };
        lines.push(format!(
            "{marker} {}{required}: {}{cursor}",
            field.label(),
            draft.value(field)
        ));
    }
    lines.push(String::new());
    if let Some(hint) = draft.focus.hint() {
        lines.push(format!("hint: {hint}"));
    }
    lines.push("tab/shift+tab field  enter save  esc cancel".to_owned());
    lines.join("\n")
}

fn render_confirm_text(state: &AppState) -> String {
    let mut text = CONFIRM_BODY.to_owned();
    if let Some(cheque) = &state.selected {
        text.push_str(&format!(
            "\n\ncheque {} from {} for {}",
            cheque.cheque_number,
            cheque.bank_name,
            format_rupees(cheque.amount_paise)
        ));
    }
    text.push_str("\n\ny/enter delete  n/esc cancel");
    text
}

fn status_text(state: &AppState) -> String {
    if let Some(notice) = &state.notice {
        return notice.message.clone();
    }
    match state.mode {
        AppMode::Nav => {
            "a add  e edit  d delete  r refresh  j/k move  tab switch  ctrl+q quit".to_owned()
        }
        AppMode::Form(_) => "enter save  esc cancel".to_owned(),
        AppMode::ConfirmDelete => "y delete  n cancel".to_owned(),
    }
}

fn status_style(state: &AppState) -> Style {
    match state.notice.as_ref().map(|notice| notice.kind) {
        Some(NoticeKind::Success) => Style::default().fg(Color::Green),
        Some(NoticeKind::Error) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::Yellow),
    }
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
