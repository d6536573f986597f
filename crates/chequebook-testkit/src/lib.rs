// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use chequebook_app::{
    Cheque, ChequeDetails, ChequeId, ChequeStatus, ChequeType, NewCheque, UserId,
};
use std::path::PathBuf;
use time::{Date, Duration, Month};

const REFERENCE_YEAR: i32 = 2026;

const BANKS: [&str; 12] = [
    "State Bank of India",
    "HDFC Bank",
    "ICICI Bank",
    "Axis Bank",
    "Punjab National Bank",
    "Bank of Baroda",
    "Canara Bank",
    "Kotak Mahindra Bank",
    "Union Bank of India",
    "IndusInd Bank",
    "Yes Bank",
    "Federal Bank",
];

const PARTY_SURNAMES: [&str; 14] = [
    "Sharma", "Gupta", "Agarwal", "Patel", "Mehta", "Jain", "Shah", "Verma", "Bansal", "Goyal",
    "Khanna", "Malhotra", "Reddy", "Iyer",
];
const PARTY_SUFFIXES: [&str; 6] = [
    "Traders",
    "& Sons",
    "Enterprises",
    "Textiles",
    "Agencies",
    "Industries",
];

const MAHAJAN_PREFIXES: [&str; 5] = ["mj", "lender", "supplier", "mahajan", "creditor"];

const NOTE_WORDS: [&str; 20] = [
    "deposit",
    "counter",
    "branch",
    "advance",
    "balance",
    "invoice",
    "settlement",
    "post-dated",
    "collected",
    "courier",
    "partial",
    "payment",
    "stock",
    "order",
    "season",
    "rent",
    "return",
    "follow",
    "up",
    "confirmed",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for plausible cheque records.
#[derive(Debug, Clone)]
pub struct ChequeFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl ChequeFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn cheque(&mut self, cheque_type: ChequeType) -> NewCheque {
        let status = ChequeStatus::ALL[self.rng.int_n(ChequeStatus::ALL.len())];
        self.cheque_with_status(cheque_type, status)
    }

    pub fn cheque_with_status(&mut self, cheque_type: ChequeType, status: ChequeStatus) -> NewCheque {
        let cheque_date = self.date_in_year(REFERENCE_YEAR);
        let cleared_date = match status {
            ChequeStatus::Cleared => {
                Some(cheque_date + Duration::days(self.int_range_i64(1, 6)))
            }
            _ => None,
        };
        let bounce_charges_paise = match status {
            ChequeStatus::Bounced => self.int_range_i64(1, 12) * 5_000,
            _ => 0,
        };
        let bank_transaction_id = match status {
            ChequeStatus::Processing | ChequeStatus::Cleared => Some(format!(
                "TXN{:010}",
                self.rng.next_u64() % 10_000_000_000
            )),
            _ => None,
        };
        let mahajan_id = match cheque_type {
            ChequeType::Issued => Some(format!(
                "{}-{}",
                self.pick(&MAHAJAN_PREFIXES),
                self.int_range_i64(1, 99)
            )),
            ChequeType::Received => None,
        };

        NewCheque {
            cheque_type,
            details: ChequeDetails {
                cheque_number: format!("{:06}", self.int_range_i64(100_000, 999_999)),
                cheque_date,
                amount_paise: self.amount_paise(),
                bank_name: self.pick(&BANKS).to_owned(),
                status,
                bank_transaction_id,
                bounce_charges_paise,
                mahajan_id,
                firm_account_id: self
                    .rng
                    .bool()
                    .then(|| format!("firm-{}", self.int_range_i64(1, 4))),
                party_name: Some(self.party_name()),
                notes: self.rng.bool().then(|| self.sentence(2, 6)),
                cleared_date,
            },
        }
    }

    /// Alternates partitions, starting with received.
    pub fn batch(&mut self, count: usize) -> Vec<NewCheque> {
        (0..count)
            .map(|index| {
                let cheque_type = if index % 2 == 0 {
                    ChequeType::Received
                } else {
                    ChequeType::Issued
                };
                self.cheque(cheque_type)
            })
            .collect()
    }

    pub fn party_name(&mut self) -> String {
        format!(
            "{} {}",
            self.pick(&PARTY_SURNAMES),
            self.pick(&PARTY_SUFFIXES)
        )
    }

    pub fn date_in_year(&mut self, year: i32) -> Date {
        let start = calendar_date(year, Month::January, 1);
        let offset = self.int_range_i64(0, 364);
        start + Duration::days(offset)
    }

    fn amount_paise(&mut self) -> i64 {
        let rupees = self.int_range_i64(5, 500) * 100;
        let paise = if self.rng.int_n(4) == 0 {
            self.int_range_i64(1, 99)
        } else {
            0
        };
        rupees * 100 + paise
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = self.int_range_i64(min_words as i64, max_words as i64) as usize;
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&NOTE_WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

/// Builds the stored form of `cheque`, as a backend would return it.
pub fn stored_cheque(id: &str, user: &str, cheque: NewCheque) -> Cheque {
    let details = cheque.details;
    Cheque {
        id: ChequeId::new(id),
        user_id: UserId::new(user),
        cheque_type: cheque.cheque_type,
        cheque_number: details.cheque_number,
        cheque_date: details.cheque_date,
        amount_paise: details.amount_paise,
        bank_name: details.bank_name,
        status: details.status,
        bank_transaction_id: details.bank_transaction_id,
        bounce_charges_paise: details.bounce_charges_paise,
        mahajan_id: details.mahajan_id,
        firm_account_id: details.firm_account_id,
        party_name: details.party_name,
        notes: details.notes,
        cleared_date: details.cleared_date,
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("chequebook.db");
    Ok((dir, db_path))
}

fn calendar_date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
}
