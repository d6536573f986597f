// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Cheque, ChequeId, ChequeType};

pub const FETCH_ERROR_PREFIX: &str = "Error fetching cheques: ";

/// Identifies one issued fetch. Only the most recent ticket may update the
/// ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { received: usize, issued: usize },
    Failed(Notice),
    Stale,
}

/// In-memory copy of the current user's cheques, split by partition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChequeLedger {
    received: Vec<Cheque>,
    issued: Vec<Cheque>,
    loading: bool,
    loaded_once: bool,
    latest_generation: u64,
}

impl ChequeLedger {
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_generation = self.latest_generation.saturating_add(1);
        self.loading = true;
        FetchTicket {
            generation: self.latest_generation,
        }
    }

    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Cheque>, String>,
    ) -> FetchOutcome {
        if ticket.generation != self.latest_generation {
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(rows) => {
                let (received, issued) = partition(rows);
                self.received = received;
                self.issued = issued;
                self.loaded_once = true;
                FetchOutcome::Applied {
                    received: self.received.len(),
                    issued: self.issued.len(),
                }
            }
            Err(message) => FetchOutcome::Failed(Notice::error(format!(
                "{FETCH_ERROR_PREFIX}{message}"
            ))),
        }
    }

    pub fn rows(&self, cheque_type: ChequeType) -> &[Cheque] {
        match cheque_type {
            ChequeType::Received => &self.received,
            ChequeType::Issued => &self.issued,
        }
    }

    pub fn find(&self, id: &ChequeId) -> Option<&Cheque> {
        self.received
            .iter()
            .chain(self.issued.iter())
            .find(|cheque| &cheque.id == id)
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn has_loaded(&self) -> bool {
        self.loaded_once
    }
}

/// Splits rows by `type`, keeping their relative order.
pub fn partition(rows: Vec<Cheque>) -> (Vec<Cheque>, Vec<Cheque>) {
    rows.into_iter()
        .partition(|cheque| cheque.cheque_type == ChequeType::Received)
}
