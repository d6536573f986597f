// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use time::Date;

use crate::validation::{
    format_iso_date, format_paise_plain, parse_optional_date, parse_optional_paise,
    parse_required_date, parse_required_paise,
};
use crate::{Cheque, ChequeDetails, ChequeId, ChequeStatus, ChequeType, NewCheque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChequeFormInput {
    pub cheque_type: ChequeType,
    pub details: ChequeDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    Create(ChequeFormInput),
    Update { id: ChequeId, input: ChequeFormInput },
}

impl FormPayload {
    pub fn input(&self) -> &ChequeFormInput {
        match self {
            Self::Create(input) | Self::Update { input, .. } => input,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Self::Update { id, .. } = self
            && id.is_blank()
        {
            bail!("cheque id is required to save an edit");
        }
        self.input().validate()
    }
}

impl ChequeFormInput {
    pub fn validate(&self) -> Result<()> {
        let details = &self.details;
        if details.cheque_number.trim().is_empty() {
            bail!("cheque number is required -- enter a cheque number and retry");
        }
        if details.bank_name.trim().is_empty() {
            bail!("bank name is required -- enter a bank name and retry");
        }
        if details.amount_paise < 0 {
            bail!("cheque amount cannot be negative");
        }
        if details.bounce_charges_paise < 0 {
            bail!("bounce charges cannot be negative");
        }
        Ok(())
    }

    pub fn into_new_cheque(self) -> NewCheque {
        NewCheque {
            cheque_type: self.cheque_type,
            details: self.details,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    ChequeNumber,
    ChequeDate,
    Amount,
    BankName,
    PartyName,
    MahajanId,
    FirmAccountId,
    Status,
    BankTransactionId,
    ClearedDate,
    BounceCharges,
    Notes,
}

impl FormField {
    pub const ALL: [Self; 12] = [
        Self::ChequeNumber,
        Self::ChequeDate,
        Self::Amount,
        Self::BankName,
        Self::PartyName,
        Self::MahajanId,
        Self::FirmAccountId,
        Self::Status,
        Self::BankTransactionId,
        Self::ClearedDate,
        Self::BounceCharges,
        Self::Notes,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ChequeNumber => "cheque no.",
            Self::ChequeDate => "cheque date",
            Self::Amount => "amount",
            Self::BankName => "bank",
            Self::PartyName => "party",
            Self::MahajanId => "mahajan id",
            Self::FirmAccountId => "firm account",
            Self::Status => "status",
            Self::BankTransactionId => "bank txn id",
            Self::ClearedDate => "cleared date",
            Self::BounceCharges => "bounce charges",
            Self::Notes => "notes",
        }
    }

    pub const fn is_required(self) -> bool {
        matches!(
            self,
            Self::ChequeNumber | Self::ChequeDate | Self::Amount | Self::BankName
        )
    }

    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Status)
    }

    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ChequeDate | Self::ClearedDate => Some("YYYY-MM-DD"),
            Self::Amount | Self::BounceCharges => Some("rupees, e.g. 12500.50"),
            Self::Status => Some("1 pending, 2 processing, 3 cleared, 4 bounced"),
            _ => None,
        }
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

/// Text being edited in the add or edit dialog. Values stay raw until
/// [`ChequeDraft::to_payload`] parses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChequeDraft {
    pub cheque_type: ChequeType,
    pub target: Option<ChequeId>,
    pub focus: FormField,
    pub status: ChequeStatus,
    /// Dates as loaded for an edit; an ordering the row already had is kept.
    loaded_dates: Option<(Date, Option<Date>)>,
    cheque_number: String,
    cheque_date: String,
    amount: String,
    bank_name: String,
    party_name: String,
    mahajan_id: String,
    firm_account_id: String,
    bank_transaction_id: String,
    cleared_date: String,
    bounce_charges: String,
    notes: String,
}

impl ChequeDraft {
    pub fn blank_for(cheque_type: ChequeType, today: Date) -> Self {
        Self {
            cheque_type,
            target: None,
            focus: FormField::ChequeNumber,
            status: ChequeStatus::Pending,
            loaded_dates: None,
            cheque_number: String::new(),
            cheque_date: format_iso_date(today),
            amount: String::new(),
            bank_name: String::new(),
            party_name: String::new(),
            mahajan_id: String::new(),
            firm_account_id: String::new(),
            bank_transaction_id: String::new(),
            cleared_date: String::new(),
            bounce_charges: String::new(),
            notes: String::new(),
        }
    }

    pub fn from_cheque(cheque: &Cheque) -> Self {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            cheque_type: cheque.cheque_type,
            target: Some(cheque.id.clone()),
            focus: FormField::ChequeNumber,
            status: cheque.status,
            loaded_dates: Some((cheque.cheque_date, cheque.cleared_date)),
            cheque_number: cheque.cheque_number.clone(),
            cheque_date: format_iso_date(cheque.cheque_date),
            amount: format_paise_plain(cheque.amount_paise),
            bank_name: cheque.bank_name.clone(),
            party_name: optional(&cheque.party_name),
            mahajan_id: optional(&cheque.mahajan_id),
            firm_account_id: optional(&cheque.firm_account_id),
            bank_transaction_id: optional(&cheque.bank_transaction_id),
            cleared_date: cheque.cleared_date.map(format_iso_date).unwrap_or_default(),
            bounce_charges: if cheque.bounce_charges_paise == 0 {
                String::new()
            } else {
                format_paise_plain(cheque.bounce_charges_paise)
            },
            notes: optional(&cheque.notes),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::ChequeNumber => &self.cheque_number,
            FormField::ChequeDate => &self.cheque_date,
            FormField::Amount => &self.amount,
            FormField::BankName => &self.bank_name,
            FormField::PartyName => &self.party_name,
            FormField::MahajanId => &self.mahajan_id,
            FormField::FirmAccountId => &self.firm_account_id,
            FormField::Status => self.status.as_str(),
            FormField::BankTransactionId => &self.bank_transaction_id,
            FormField::ClearedDate => &self.cleared_date,
            FormField::BounceCharges => &self.bounce_charges,
            FormField::Notes => &self.notes,
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::ChequeNumber => Some(&mut self.cheque_number),
            FormField::ChequeDate => Some(&mut self.cheque_date),
            FormField::Amount => Some(&mut self.amount),
            FormField::BankName => Some(&mut self.bank_name),
            FormField::PartyName => Some(&mut self.party_name),
            FormField::MahajanId => Some(&mut self.mahajan_id),
            FormField::FirmAccountId => Some(&mut self.firm_account_id),
            FormField::Status => None,
            FormField::BankTransactionId => Some(&mut self.bank_transaction_id),
            FormField::ClearedDate => Some(&mut self.cleared_date),
            FormField::BounceCharges => Some(&mut self.bounce_charges),
            FormField::Notes => Some(&mut self.notes),
        }
    }

    pub fn set_text(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match self.text_mut(field) {
            Some(text) => {
                *text = value.into();
                true
            }
            None => false,
        }
    }

    pub fn move_focus(&mut self, delta: isize) -> FormField {
        let len = FormField::ALL.len() as isize;
        let next = (self.focus.position() as isize + delta).rem_euclid(len) as usize;
        self.focus = FormField::ALL[next];
        self.focus
    }

    /// Returns false when the focused field does not take free text.
    pub fn push_char(&mut self, ch: char) -> bool {
        let focus = self.focus;
        match self.text_mut(focus) {
            Some(text) => {
                text.push(ch);
                true
            }
            None => false,
        }
    }

    pub fn pop_char(&mut self) -> bool {
        let focus = self.focus;
        match self.text_mut(focus) {
            Some(text) => text.pop().is_some(),
            None => false,
        }
    }

    /// Picks a status by its zero-based position in [`ChequeStatus::ALL`].
    pub fn choose_status(&mut self, index: usize) -> Option<ChequeStatus> {
        let status = ChequeStatus::ALL.get(index).copied()?;
        self.status = status;
        Some(status)
    }

    pub fn to_payload(&self) -> Result<FormPayload> {
        let details = ChequeDetails {
            cheque_number: self.cheque_number.trim().to_owned(),
            cheque_date: parse_required_date(&self.cheque_date)
                .map_err(|error| anyhow!("cheque date: {error} (use YYYY-MM-DD)"))?,
            amount_paise: parse_required_paise(&self.amount)
                .map_err(|error| anyhow!("amount: {error}"))?,
            bank_name: self.bank_name.trim().to_owned(),
            status: self.status,
            bank_transaction_id: optional_text(&self.bank_transaction_id),
            bounce_charges_paise: parse_optional_paise(&self.bounce_charges)
                .map_err(|error| anyhow!("bounce charges: {error}"))?,
            mahajan_id: optional_text(&self.mahajan_id),
            firm_account_id: optional_text(&self.firm_account_id),
            party_name: optional_text(&self.party_name),
            notes: optional_text(&self.notes),
            cleared_date: parse_optional_date(&self.cleared_date)
                .map_err(|error| anyhow!("cleared date: {error} (use YYYY-MM-DD)"))?,
        };
        if let Some(cleared_date) = details.cleared_date
            && cleared_date < details.cheque_date
            && self.loaded_dates != Some((details.cheque_date, details.cleared_date))
        {
            bail!("cleared date must be on/after cheque date");
        }
        let input = ChequeFormInput {
            cheque_type: self.cheque_type,
            details,
        };
        let payload = match &self.target {
            Some(id) => FormPayload::Update {
                id: id.clone(),
                input,
            },
            None => FormPayload::Create(input),
        };
        payload.validate()?;
        Ok(payload)
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
