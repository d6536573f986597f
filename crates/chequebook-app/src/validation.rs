// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use time::format_description::OwnedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use time::macros::format_description;

pub const CURRENCY_GLYPH: &str = "₹";
pub const DEFAULT_DATE_FORMAT: &str = "[day]/[month]/[year]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidMoney,
    NegativeMoney,
    InvalidDate,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMoney => f.write_str("invalid money value"),
            Self::NegativeMoney => f.write_str("negative money value"),
            Self::InvalidDate => f.write_str("invalid date value"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

pub fn parse_required_paise(input: &str) -> ValidationResult<i64> {
    parse_paise(input.trim())
}

/// Blank input means zero, which is how bounce charges default.
pub fn parse_optional_paise(input: &str) -> ValidationResult<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    parse_paise(trimmed)
}

pub fn parse_required_date(input: &str) -> ValidationResult<Date> {
    parse_date(input.trim())
}

pub fn parse_optional_date(input: &str) -> ValidationResult<Option<Date>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_date(trimmed).map(Some)
}

/// Reads a date column written by either backend. Hosted exports sometimes
/// carry a full timestamp in date columns; only its calendar date is kept.
pub fn parse_stored_date(input: &str) -> ValidationResult<Date> {
    let trimmed = input.trim();
    if let Ok(value) = parse_date(trimmed) {
        return Ok(value);
    }
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map(OffsetDateTime::date)
        .map_err(|_| ValidationError::InvalidDate)
}

pub fn parse_stored_optional_date(input: Option<&str>) -> ValidationResult<Option<Date>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => parse_stored_date(trimmed).map(Some),
    }
}

pub fn format_iso_date(value: Date) -> String {
    value
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "1970-01-01".to_owned())
}

/// Plain editable form of an amount: `12500` or `12500.50`.
pub fn format_paise_plain(paise: i64) -> String {
    let (sign, paise) = normalize_sign(paise);
    let rupees = paise / 100;
    let remainder = paise % 100;
    if remainder == 0 {
        format!("{sign}{rupees}")
    } else {
        format!("{sign}{rupees}.{remainder:02}")
    }
}

/// Display form of an amount with the currency glyph and digit grouping.
pub fn format_rupees(paise: i64) -> String {
    let (sign, paise) = normalize_sign(paise);
    let rupees = paise / 100;
    let remainder = paise % 100;
    if remainder == 0 {
        format!("{sign}{CURRENCY_GLYPH}{}", comma_format(rupees))
    } else {
        format!(
            "{sign}{CURRENCY_GLYPH}{}.{remainder:02}",
            comma_format(rupees)
        )
    }
}

pub fn paise_from_rupees(rupees: f64) -> ValidationResult<i64> {
    if !rupees.is_finite() {
        return Err(ValidationError::InvalidMoney);
    }
    if rupees < 0.0 {
        return Err(ValidationError::NegativeMoney);
    }
    let paise = (rupees * 100.0).round();
    if paise > i64::MAX as f64 {
        return Err(ValidationError::InvalidMoney);
    }
    Ok(paise as i64)
}

pub fn rupees_from_paise(paise: i64) -> f64 {
    (paise as f64) / 100.0
}

/// Display format for cheque dates, parsed from a `time` format description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateDisplay {
    format: OwnedFormatItem,
}

impl DateDisplay {
    pub fn parse(pattern: &str) -> Result<Self> {
        let format = time::format_description::parse_owned::<1>(pattern)
            .with_context(|| format!("invalid date format {pattern:?}"))?;
        let display = Self { format };
        Date::MIN
            .format(&display.format)
            .with_context(|| format!("date format {pattern:?} cannot render a calendar date"))?;
        Ok(display)
    }

    pub fn format(&self, value: Date) -> String {
        value
            .format(&self.format)
            .unwrap_or_else(|_| format_iso_date(value))
    }
}

impl Default for DateDisplay {
    fn default() -> Self {
        let format = time::format_description::parse_owned::<1>(DEFAULT_DATE_FORMAT)
            .unwrap_or_else(|_| OwnedFormatItem::Compound(Box::new([])));
        Self { format }
    }
}

fn parse_paise(input: &str) -> ValidationResult<i64> {
    let clean = input.replace(',', "");
    if clean.starts_with('-') {
        return Err(ValidationError::NegativeMoney);
    }

    let clean = clean.strip_prefix(CURRENCY_GLYPH).unwrap_or(&clean);
    if clean.is_empty() {
        return Err(ValidationError::InvalidMoney);
    }

    let parts = clean.split('.').collect::<Vec<_>>();
    if parts.len() > 2 {
        return Err(ValidationError::InvalidMoney);
    }

    let whole = parse_digits(parts[0], true)?;
    if whole > i64::MAX / 100 {
        return Err(ValidationError::InvalidMoney);
    }

    let mut frac = 0i64;
    if parts.len() == 2 {
        if parts[1].len() > 2 {
            return Err(ValidationError::InvalidMoney);
        }
        frac = parse_digits(parts[1], false)?;
        if parts[1].len() == 1 {
            frac = frac.checked_mul(10).ok_or(ValidationError::InvalidMoney)?;
        }
    }

    whole
        .checked_mul(100)
        .and_then(|value| value.checked_add(frac))
        .ok_or(ValidationError::InvalidMoney)
}

fn parse_digits(input: &str, allow_empty: bool) -> ValidationResult<i64> {
    if input.is_empty() {
        if allow_empty {
            return Ok(0);
        }
        return Err(ValidationError::InvalidMoney);
    }
    if !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValidationError::InvalidMoney);
    }
    input
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidMoney)
}

fn parse_date(input: &str) -> ValidationResult<Date> {
    Date::parse(input, &format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::InvalidDate)
}

fn comma_format(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let mut chars = digits.chars().collect::<Vec<_>>();
    let mut count = 0usize;
    while let Some(ch) = chars.pop() {
        if count == 3 {
            out.push(',');
            count = 0;
        }
        out.push(ch);
        count += 1;
    }
    out.chars().rev().collect()
}

fn normalize_sign(paise: i64) -> (&'static str, i64) {
    if paise >= 0 {
        return ("", paise);
    }
    if paise == i64::MIN {
        ("-", i64::MAX)
    } else {
        ("-", -paise)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DateDisplay, ValidationError, format_paise_plain, format_rupees, paise_from_rupees,
        parse_optional_date, parse_optional_paise, parse_required_date, parse_required_paise,
        parse_stored_date, parse_stored_optional_date,
    };
    use time::{Date, Month};

    #[test]
    fn parses_rupee_amounts_with_glyph_and_grouping() {
        assert_eq!(parse_required_paise("₹12,500"), Ok(1_250_000));
        assert_eq!(parse_required_paise("99.5"), Ok(9_950));
        assert_eq!(parse_required_paise(" 0.05 "), Ok(5));
    }

    #[test]
    fn rejects_negative_and_malformed_amounts() {
        assert_eq!(
            parse_required_paise("-10"),
            Err(ValidationError::NegativeMoney)
        );
        assert_eq!(
            parse_required_paise("1.234"),
            Err(ValidationError::InvalidMoney)
        );
        assert_eq!(
            parse_required_paise("12a"),
            Err(ValidationError::InvalidMoney)
        );
        assert_eq!(parse_required_paise(""), Err(ValidationError::InvalidMoney));
    }

    #[test]
    fn blank_optional_amount_is_zero() {
        assert_eq!(parse_optional_paise("   "), Ok(0));
        assert_eq!(parse_optional_paise("250"), Ok(25_000));
    }

    #[test]
    fn formats_rupees_with_grouping() {
        assert_eq!(format_rupees(0), "₹0");
        assert_eq!(format_rupees(1_250_000), "₹12,500");
        assert_eq!(format_rupees(123_456_750), "₹1,234,567.50");
        assert_eq!(format_rupees(-5_000), "-₹50");
    }

    #[test]
    fn plain_amount_round_trips_through_parser() {
        for paise in [0, 5, 9_950, 1_250_000] {
            let text = format_paise_plain(paise);
            assert_eq!(parse_required_paise(&text), Ok(paise), "text {text}");
        }
    }

    #[test]
    fn converts_float_rupees_to_paise() {
        assert_eq!(paise_from_rupees(12_500.0), Ok(1_250_000));
        assert_eq!(paise_from_rupees(0.1 + 0.2), Ok(30));
        assert_eq!(paise_from_rupees(-1.0), Err(ValidationError::NegativeMoney));
        assert_eq!(
            paise_from_rupees(f64::NAN),
            Err(ValidationError::InvalidMoney)
        );
    }

    #[test]
    fn dates_use_iso_layout() {
        assert_eq!(
            parse_required_date("2026-03-09"),
            Ok(Date::from_calendar_date(2026, Month::March, 9).expect("valid date"))
        );
        assert_eq!(
            parse_required_date("09/03/2026"),
            Err(ValidationError::InvalidDate)
        );
        assert_eq!(parse_optional_date(""), Ok(None));
    }

    #[test]
    fn stored_dates_accept_plain_and_timestamp_forms() {
        let expected = Date::from_calendar_date(2026, Month::April, 2).expect("valid date");
        assert_eq!(parse_stored_date("2026-04-02"), Ok(expected));
        assert_eq!(parse_stored_date("2026-04-02T10:30:00Z"), Ok(expected));
        assert_eq!(parse_stored_date("2026-04-02T23:30:00+05:30"), Ok(expected));
        assert_eq!(
            parse_stored_date("02/04/2026"),
            Err(ValidationError::InvalidDate)
        );
        assert_eq!(parse_stored_optional_date(None), Ok(None));
        assert_eq!(parse_stored_optional_date(Some(" ")), Ok(None));
        assert_eq!(
            parse_stored_optional_date(Some("2026-04-02T00:00:00+00:00")),
            Ok(Some(expected))
        );
    }

    #[test]
    fn date_display_uses_configured_pattern() {
        let date = Date::from_calendar_date(2026, Month::March, 9).expect("valid date");
        assert_eq!(DateDisplay::default().format(date), "09/03/2026");

        let us = DateDisplay::parse("[month]/[day]/[year]").expect("valid pattern");
        assert_eq!(us.format(date), "03/09/2026");
    }

    #[test]
    fn date_display_rejects_bad_patterns() {
        assert!(DateDisplay::parse("[nope]").is_err());
        assert!(DateDisplay::parse("[hour]:[minute]").is_err());
    }
}
