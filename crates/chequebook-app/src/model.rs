// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeType {
    Received,
    Issued,
}

impl ChequeType {
    pub const ALL: [Self; 2] = [Self::Received, Self::Issued];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Issued => "issued",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "received" => Some(Self::Received),
            "issued" => Some(Self::Issued),
            _ => None,
        }
    }

    /// Header of the counterparty column in this partition's table.
    pub const fn party_column_label(self) -> &'static str {
        match self {
            Self::Received => "Party",
            Self::Issued => "Mahajan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    Pending,
    Processing,
    Cleared,
    Bounced,
}

impl ChequeStatus {
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Cleared,
        Self::Bounced,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Cleared => "cleared",
            Self::Bounced => "bounced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "cleared" => Some(Self::Cleared),
            "bounced" => Some(Self::Bounced),
            _ => None,
        }
    }

    pub const fn badge_label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Cleared => "CLEARED",
            Self::Bounced => "BOUNCED",
        }
    }

    pub const fn badge(self) -> BadgeVariant {
        match self {
            Self::Pending => BadgeVariant::Outline,
            Self::Processing => BadgeVariant::Secondary,
            Self::Cleared => BadgeVariant::Default,
            Self::Bounced => BadgeVariant::Destructive,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cleared)
    }
}

/// Visual weight of a status badge. Carries no behavior of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeVariant {
    Default,
    Secondary,
    Destructive,
    Outline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cheque {
    pub id: ChequeId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub cheque_type: ChequeType,
    pub cheque_number: String,
    pub cheque_date: Date,
    pub amount_paise: i64,
    pub bank_name: String,
    pub status: ChequeStatus,
    pub bank_transaction_id: Option<String>,
    pub bounce_charges_paise: i64,
    pub mahajan_id: Option<String>,
    pub firm_account_id: Option<String>,
    pub party_name: Option<String>,
    pub notes: Option<String>,
    pub cleared_date: Option<Date>,
}

impl Cheque {
    pub const fn can_delete(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn details(&self) -> ChequeDetails {
        ChequeDetails {
            cheque_number: self.cheque_number.clone(),
            cheque_date: self.cheque_date,
            amount_paise: self.amount_paise,
            bank_name: self.bank_name.clone(),
            status: self.status,
            bank_transaction_id: self.bank_transaction_id.clone(),
            bounce_charges_paise: self.bounce_charges_paise,
            mahajan_id: self.mahajan_id.clone(),
            firm_account_id: self.firm_account_id.clone(),
            party_name: self.party_name.clone(),
            notes: self.notes.clone(),
            cleared_date: self.cleared_date,
        }
    }
}

/// Every column of a cheque a user may change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChequeDetails {
    pub cheque_number: String,
    pub cheque_date: Date,
    pub amount_paise: i64,
    pub bank_name: String,
    pub status: ChequeStatus,
    pub bank_transaction_id: Option<String>,
    pub bounce_charges_paise: i64,
    pub mahajan_id: Option<String>,
    pub firm_account_id: Option<String>,
    pub party_name: Option<String>,
    pub notes: Option<String>,
    pub cleared_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCheque {
    pub cheque_type: ChequeType,
    pub details: ChequeDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Received,
    Issued,
}

impl TabKind {
    pub const ALL: [Self; 2] = [Self::Received, Self::Issued];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Received => "Received Cheques",
            Self::Issued => "Issued Cheques",
        }
    }

    pub const fn cheque_type(self) -> ChequeType {
        match self {
            Self::Received => ChequeType::Received,
            Self::Issued => ChequeType::Issued,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "received" => Some(Self::Received),
            "issued" => Some(Self::Issued),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    Add(ChequeType),
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Form(FormKind),
    ConfirmDelete,
}
