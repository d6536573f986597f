// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::{
    AppMode, Cheque, ChequeDraft, ChequeId, ChequeLedger, FetchOutcome, FetchTicket, FormKind,
    Notice, TabKind,
};

pub const DELETE_SUCCESS_MESSAGE: &str = "Cheque deleted successfully";
pub const DELETE_ERROR_PREFIX: &str = "Error deleting cheque: ";
pub const CLEARED_DELETE_REFUSED: &str = "cleared cheques cannot be deleted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_tab: TabKind,
    pub ledger: ChequeLedger,
    /// Row targeted by the open edit dialog or delete prompt.
    pub selected: Option<Cheque>,
    pub form: Option<ChequeDraft>,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_tab: TabKind::Received,
            ledger: ChequeLedger::default(),
            selected: None,
            form: None,
            notice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextTab,
    PrevTab,
    BeginFetch,
    FinishFetch {
        ticket: FetchTicket,
        result: Result<Vec<Cheque>, String>,
    },
    OpenAdd { today: Date },
    OpenEdit(Cheque),
    OpenDelete(Cheque),
    CancelDialog,
    FormSaved,
    DeleteSucceeded,
    DeleteFailed(String),
    Notify(Notice),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    TabChanged(TabKind),
    SelectionChanged(Option<ChequeId>),
    FetchIssued(FetchTicket),
    LedgerUpdated { received: usize, issued: usize },
    StaleFetchDropped(FetchTicket),
    RefetchRequested,
    StatusUpdated(Notice),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::BeginFetch => vec![AppEvent::FetchIssued(self.ledger.begin_fetch())],
            AppCommand::FinishFetch { ticket, result } => {
                match self.ledger.finish_fetch(ticket, result) {
                    FetchOutcome::Applied { received, issued } => {
                        vec![AppEvent::LedgerUpdated { received, issued }]
                    }
                    FetchOutcome::Failed(notice) => vec![self.set_status(notice)],
                    FetchOutcome::Stale => vec![AppEvent::StaleFetchDropped(ticket)],
                }
            }
            AppCommand::OpenAdd { today } => {
                let cheque_type = self.active_tab.cheque_type();
                self.selected = None;
                self.form = Some(ChequeDraft::blank_for(cheque_type, today));
                self.mode = AppMode::Form(FormKind::Add(cheque_type));
                vec![
                    AppEvent::SelectionChanged(None),
                    AppEvent::ModeChanged(self.mode),
                ]
            }
            AppCommand::OpenEdit(cheque) => {
                let id = cheque.id.clone();
                self.form = Some(ChequeDraft::from_cheque(&cheque));
                self.selected = Some(cheque);
                self.mode = AppMode::Form(FormKind::Edit);
                vec![
                    AppEvent::SelectionChanged(Some(id)),
                    AppEvent::ModeChanged(self.mode),
                ]
            }
            AppCommand::OpenDelete(cheque) => {
                if !cheque.can_delete() {
                    return vec![self.set_status(Notice::error(CLEARED_DELETE_REFUSED))];
                }
                let id = cheque.id.clone();
                self.selected = Some(cheque);
                self.mode = AppMode::ConfirmDelete;
                vec![
                    AppEvent::SelectionChanged(Some(id)),
                    AppEvent::ModeChanged(self.mode),
                ]
            }
            AppCommand::CancelDialog => {
                if self.mode == AppMode::Nav {
                    return Vec::new();
                }
                self.close_dialog()
            }
            AppCommand::FormSaved => {
                let message = match self.mode {
                    AppMode::Form(FormKind::Edit) => "cheque updated",
                    _ => "cheque added",
                };
                let mut events = self.close_dialog();
                events.push(self.set_status(Notice::success(message)));
                events.push(AppEvent::RefetchRequested);
                events
            }
            AppCommand::DeleteSucceeded => {
                let mut events = self.close_dialog();
                events.push(self.set_status(Notice::success(DELETE_SUCCESS_MESSAGE)));
                events.push(AppEvent::RefetchRequested);
                events
            }
            AppCommand::DeleteFailed(message) => {
                vec![self.set_status(Notice::error(format!("{DELETE_ERROR_PREFIX}{message}")))]
            }
            AppCommand::Notify(notice) => vec![self.set_status(notice)],
            AppCommand::ClearStatus => {
                self.notice = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut ChequeDraft> {
        self.form.as_mut()
    }

    fn close_dialog(&mut self) -> Vec<AppEvent> {
        self.mode = AppMode::Nav;
        self.form = None;
        self.selected = None;
        vec![
            AppEvent::ModeChanged(self.mode),
            AppEvent::SelectionChanged(None),
        ]
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        vec![AppEvent::TabChanged(self.active_tab)]
    }

    fn set_status(&mut self, notice: Notice) -> AppEvent {
        self.notice = Some(notice.clone());
        AppEvent::StatusUpdated(notice)
    }
}
