// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{Cheque, ChequeDetails, ChequeId, NewCheque, UserId};

/// Storage for one user's cheques. Every call is scoped by `user`; a row
/// owned by someone else behaves as if it does not exist.
pub trait ChequeBackend {
    /// Rows ordered by `cheque_date` descending, ties broken by id.
    fn list_cheques(&self, user: &UserId) -> Result<Vec<Cheque>>;

    fn insert_cheque(&self, user: &UserId, cheque: &NewCheque) -> Result<ChequeId>;

    /// Replaces the editable columns. The `type` partition never changes.
    fn update_cheque(&self, user: &UserId, id: &ChequeId, details: &ChequeDetails) -> Result<()>;

    /// Fails when the row is missing or its stored status is cleared.
    fn delete_cheque(&self, user: &UserId, id: &ChequeId) -> Result<()>;
}

impl<B: ChequeBackend + ?Sized> ChequeBackend for Box<B> {
    fn list_cheques(&self, user: &UserId) -> Result<Vec<Cheque>> {
        (**self).list_cheques(user)
    }

    fn insert_cheque(&self, user: &UserId, cheque: &NewCheque) -> Result<ChequeId> {
        (**self).insert_cheque(user, cheque)
    }

    fn update_cheque(&self, user: &UserId, id: &ChequeId, details: &ChequeDetails) -> Result<()> {
        (**self).update_cheque(user, id, details)
    }

    fn delete_cheque(&self, user: &UserId, id: &ChequeId) -> Result<()> {
        (**self).delete_cheque(user, id)
    }
}
