// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use chequebook_app::{Cheque, ChequeBackend, ChequeId, FormPayload, UserId};
use log::{debug, info};

/// Bridges the TUI to whichever backend the config selected, scoped to one user.
pub struct LedgerRuntime {
    backend: Box<dyn ChequeBackend>,
    user: Option<UserId>,
}

impl LedgerRuntime {
    pub fn new(backend: Box<dyn ChequeBackend>, user: Option<UserId>) -> Self {
        Self { backend, user }
    }

    fn require_user(&self) -> Result<&UserId> {
        self.user.as_ref().ok_or_else(|| {
            anyhow!("sign in required -- set [session].user_id or CHEQUEBOOK_USER_ID")
        })
    }
}

impl chequebook_tui::AppRuntime for LedgerRuntime {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }

    fn load_cheques(&mut self) -> Result<Vec<Cheque>> {
        let user = self.require_user()?;
        let rows = self.backend.list_cheques(user)?;
        debug!("loaded {} cheques for {user}", rows.len());
        Ok(rows)
    }

    fn submit_form(&mut self, payload: &FormPayload) -> Result<()> {
        payload.validate()?;
        let user = self.require_user()?;

        match payload {
            FormPayload::Create(input) => {
                let id = self
                    .backend
                    .insert_cheque(user, &input.clone().into_new_cheque())?;
                info!("inserted {} cheque {id}", input.cheque_type.as_str());
            }
            FormPayload::Update { id, input } => {
                self.backend.update_cheque(user, id, &input.details)?;
                info!("updated cheque {id}");
            }
        }
        Ok(())
    }

    fn delete_cheque(&mut self, id: &ChequeId) -> Result<()> {
        let user = self.require_user()?;
        self.backend.delete_cheque(user, id)?;
        info!("deleted cheque {id}");
        Ok(())
    }
}
