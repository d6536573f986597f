// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use chequebook_app::validation::{
    format_iso_date, paise_from_rupees, parse_stored_date, parse_stored_optional_date,
    rupees_from_paise,
};
use chequebook_app::{
    Cheque, ChequeBackend, ChequeDetails, ChequeId, ChequeStatus, ChequeType, NewCheque, UserId,
};
use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const TABLE_PATH: [&str; 3] = ["rest", "v1", "cheques"];
const RETURN_REPRESENTATION: &str = "return=representation";

/// PostgREST client for the hosted `cheques` table.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    api_key: String,
    bearer: String,
    http: HttpClient,
}

impl Client {
    pub fn new(
        base_url: &str,
        api_key: &str,
        access_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("backend.url must not be empty");
        }
        let base_url =
            Url::parse(trimmed).with_context(|| format!("backend.url {trimmed:?} is not a URL"))?;
        if base_url.cannot_be_a_base() {
            bail!("backend.url {trimmed:?} must be an http(s) URL");
        }
        if api_key.trim().is_empty() {
            bail!("backend.api_key must not be empty");
        }

        let bearer = access_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .unwrap_or(api_key)
            .to_owned();

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            api_key: api_key.to_owned(),
            bearer,
            http,
        })
    }

    /// Cheap authenticated request that proves the table is reachable.
    pub fn ping(&self) -> Result<()> {
        let url = self.table_url(&[("select", "id".to_owned()), ("limit", "1".to_owned())])?;
        let response = self
            .authorized(self.http.get(url.clone()))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        debug!("ping {url} ok");
        Ok(())
    }

    pub fn list_cheques(&self, user: &UserId) -> Result<Vec<Cheque>> {
        let url = self.table_url(&[
            ("select", "*".to_owned()),
            ("user_id", format!("eq.{user}")),
            ("order", "cheque_date.desc,id.desc".to_owned()),
        ])?;
        debug!("GET {url}");
        let rows = self.fetch_rows(self.http.get(url))?;
        let cheques = rows
            .into_iter()
            .map(ChequeRow::into_cheque)
            .collect::<Result<Vec<_>>>()?;
        debug!("fetched {} cheques for user {user}", cheques.len());
        Ok(cheques)
    }

    pub fn insert_cheque(&self, user: &UserId, cheque: &NewCheque) -> Result<ChequeId> {
        if user.is_blank() {
            bail!("user id is required -- set [session].user_id and retry");
        }
        let url = self.table_url(&[])?;
        let body = ChequeWrite::new(
            Some(user.as_str()),
            Some(cheque.cheque_type),
            &cheque.details,
        );
        debug!("POST {url}");
        let rows = self.fetch_rows(
            self.http
                .post(url)
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&body),
        )?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("insert returned no rows; check row-level security policies"))?;
        info!("inserted {} cheque {} for user {user}", cheque.cheque_type.as_str(), row.id);
        Ok(ChequeId::new(row.id))
    }

    pub fn update_cheque(
        &self,
        user: &UserId,
        id: &ChequeId,
        details: &ChequeDetails,
    ) -> Result<()> {
        let url = self.table_url(&[
            ("id", format!("eq.{id}")),
            ("user_id", format!("eq.{user}")),
        ])?;
        let body = ChequeWrite::new(None, None, details);
        debug!("PATCH {url}");
        let rows = self.fetch_rows(
            self.http
                .patch(url)
                .header("Prefer", RETURN_REPRESENTATION)
                .json(&body),
        )?;
        if rows.is_empty() {
            bail!("cheque {id} not found -- refresh the list and retry");
        }
        info!("updated cheque {id} for user {user}");
        Ok(())
    }

    /// The cleared-status guard travels with the request, so a row cleared
    /// since the last fetch is left alone.
    pub fn delete_cheque(&self, user: &UserId, id: &ChequeId) -> Result<()> {
        let url = self.table_url(&[
            ("id", format!("eq.{id}")),
            ("user_id", format!("eq.{user}")),
            ("status", format!("neq.{}", ChequeStatus::Cleared.as_str())),
        ])?;
        debug!("DELETE {url}");
        let rows = self.fetch_rows(
            self.http
                .delete(url)
                .header("Prefer", RETURN_REPRESENTATION),
        )?;
        match rows.len() {
            0 => {
                warn!("delete of cheque {id} matched no rows");
                bail!("cheque {id} is cleared or no longer exists")
            }
            _ => {
                info!("deleted cheque {id} for user {user}");
                Ok(())
            }
        }
    }

    fn table_url(&self, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("backend.url {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(TABLE_PATH);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer)
            .header("Accept", "application/json")
    }

    fn fetch_rows(&self, request: RequestBuilder) -> Result<Vec<ChequeRow>> {
        let response = self
            .authorized(request)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        response.json().context("decode cheque rows")
    }
}

impl ChequeBackend for Client {
    fn list_cheques(&self, user: &UserId) -> Result<Vec<Cheque>> {
        Client::list_cheques(self, user)
    }

    fn insert_cheque(&self, user: &UserId, cheque: &NewCheque) -> Result<ChequeId> {
        Client::insert_cheque(self, user, cheque)
    }

    fn update_cheque(&self, user: &UserId, id: &ChequeId, details: &ChequeDetails) -> Result<()> {
        Client::update_cheque(self, user, id, details)
    }

    fn delete_cheque(&self, user: &UserId, id: &ChequeId) -> Result<()> {
        Client::delete_cheque(self, user, id)
    }
}

fn connection_error(base_url: &Url, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("request to {base_url} timed out -- raise [backend].timeout or retry");
    }
    anyhow!("cannot reach {base_url} -- check [backend].url and your network ({error})")
}

/// PostgREST reports failures as `{"message": ...}`; that message is the
/// whole user-facing error.
fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<PostgrestError>(body)
        && let Some(message) = parsed.message.filter(|message| !message.is_empty())
    {
        return anyhow!("{message}");
    }

    if let Ok(parsed) = serde_json::from_str::<AuthError>(body)
        && let Some(message) = parsed
            .error_description
            .or(parsed.error)
            .filter(|message| !message.is_empty())
    {
        return anyhow!("{message}");
    }

    if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthError {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChequeRow {
    id: String,
    user_id: String,
    #[serde(rename = "type")]
    cheque_type: ChequeType,
    cheque_number: String,
    cheque_date: String,
    amount: f64,
    bank_name: String,
    status: ChequeStatus,
    #[serde(default)]
    bank_transaction_id: Option<String>,
    #[serde(default)]
    bounce_charges: Option<f64>,
    #[serde(default)]
    mahajan_id: Option<String>,
    #[serde(default)]
    firm_account_id: Option<String>,
    #[serde(default)]
    party_name: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    cleared_date: Option<String>,
}

impl ChequeRow {
    fn into_cheque(self) -> Result<Cheque> {
        let id = self.id;
        let cheque_date = parse_stored_date(&self.cheque_date)
            .map_err(|error| anyhow!("cheque {id}: cheque_date {:?}: {error}", self.cheque_date))?;
        let cleared_date = parse_stored_optional_date(self.cleared_date.as_deref()).map_err(
            |error| anyhow!("cheque {id}: cleared_date {:?}: {error}", self.cleared_date),
        )?;
        let amount_paise = paise_from_rupees(self.amount)
            .map_err(|error| anyhow!("cheque {id}: amount: {error}"))?;
        let bounce_charges_paise = paise_from_rupees(self.bounce_charges.unwrap_or(0.0))
            .map_err(|error| anyhow!("cheque {id}: bounce_charges: {error}"))?;

        Ok(Cheque {
            id: ChequeId::new(id),
            user_id: UserId::new(self.user_id),
            cheque_type: self.cheque_type,
            cheque_number: self.cheque_number,
            cheque_date,
            amount_paise,
            bank_name: self.bank_name,
            status: self.status,
            bank_transaction_id: self.bank_transaction_id,
            bounce_charges_paise,
            mahajan_id: self.mahajan_id,
            firm_account_id: self.firm_account_id,
            party_name: self.party_name,
            notes: self.notes,
            cleared_date,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChequeWrite<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    cheque_type: Option<ChequeType>,
    cheque_number: &'a str,
    cheque_date: String,
    amount: f64,
    bank_name: &'a str,
    status: ChequeStatus,
    bank_transaction_id: Option<&'a str>,
    bounce_charges: f64,
    mahajan_id: Option<&'a str>,
    firm_account_id: Option<&'a str>,
    party_name: Option<&'a str>,
    notes: Option<&'a str>,
    cleared_date: Option<String>,
}

impl<'a> ChequeWrite<'a> {
    fn new(
        user_id: Option<&'a str>,
        cheque_type: Option<ChequeType>,
        details: &'a ChequeDetails,
    ) -> Self {
        Self {
            user_id,
            cheque_type,
            cheque_number: &details.cheque_number,
            cheque_date: format_iso_date(details.cheque_date),
            amount: rupees_from_paise(details.amount_paise),
            bank_name: &details.bank_name,
            status: details.status,
            bank_transaction_id: details.bank_transaction_id.as_deref(),
            bounce_charges: rupees_from_paise(details.bounce_charges_paise),
            mahajan_id: details.mahajan_id.as_deref(),
            firm_account_id: details.firm_account_id.as_deref(),
            party_name: details.party_name.as_deref(),
            notes: details.notes.as_deref(),
            cleared_date: details.cleared_date.map(format_iso_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChequeRow, Client, clean_error_response};
    use chequebook_app::ChequeStatus;
    use reqwest::StatusCode;
    use std::time::Duration;
    use time::{Date, Month};

    #[test]
    fn clean_error_prefers_postgrest_message() {
        let error = clean_error_response(
            StatusCode::FORBIDDEN,
            r#"{"code":"42501","message":"permission denied for table cheques","details":null}"#,
        );
        assert_eq!(error.to_string(), "permission denied for table cheques");
    }

    #[test]
    fn clean_error_reads_auth_errors() {
        let error = clean_error_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"invalid_grant","error_description":"JWT expired"}"#,
        );
        assert_eq!(error.to_string(), "JWT expired");
    }

    #[test]
    fn clean_error_falls_back_to_status() {
        assert_eq!(
            clean_error_response(StatusCode::BAD_GATEWAY, "upstream down").to_string(),
            "server error (502): upstream down"
        );
        assert_eq!(
            clean_error_response(StatusCode::BAD_GATEWAY, "{not json").to_string(),
            "server returned 502"
        );
    }

    #[test]
    fn table_url_keeps_base_path_and_encodes_filters() {
        let client = Client::new(
            "https://db.example.co/",
            "anon",
            None,
            Duration::from_secs(1),
        )
        .expect("client");
        let url = client
            .table_url(&[("user_id", "eq.a b".to_owned())])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://db.example.co/rest/v1/cheques?user_id=eq.a+b"
        );
    }

    #[test]
    fn new_rejects_missing_settings() {
        assert!(Client::new("", "anon", None, Duration::from_secs(1)).is_err());
        assert!(Client::new("https://db.example.co", " ", None, Duration::from_secs(1)).is_err());
        assert!(Client::new("not a url", "anon", None, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn row_converts_rupees_and_dates() {
        let row: ChequeRow = serde_json::from_str(
            r#"{
              "id": "9f1c",
              "user_id": "u1",
              "type": "issued",
              "cheque_number": "000451",
              "cheque_date": "2026-01-15",
              "amount": 12500.5,
              "bank_name": "HDFC Bank",
              "status": "bounced",
              "bounce_charges": 350,
              "cleared_date": null,
              "created_at": "2026-01-15T09:00:00Z"
            }"#,
        )
        .expect("row json");
        let cheque = row.into_cheque().expect("convert");
        assert_eq!(cheque.amount_paise, 1_250_050);
        assert_eq!(cheque.bounce_charges_paise, 35_000);
        assert_eq!(cheque.party_name, None);
        assert!(cheque.can_delete());
    }

    #[test]
    fn row_with_timestamp_dates_keeps_calendar_day() {
        let row: ChequeRow = serde_json::from_str(
            r#"{
              "id": "a",
              "user_id": "u1",
              "type": "received",
              "cheque_number": "000452",
              "cheque_date": "2026-01-15T00:00:00+00:00",
              "amount": 800,
              "bank_name": "SBI",
              "status": "cleared",
              "bounce_charges": 0,
              "cleared_date": "2026-01-20T10:00:00+00:00"
            }"#,
        )
        .expect("row json");
        let cheque = row.into_cheque().expect("convert");
        assert_eq!(cheque.status, ChequeStatus::Cleared);
        assert_eq!(
            cheque.cheque_date,
            Date::from_calendar_date(2026, Month::January, 15).expect("valid date")
        );
        assert_eq!(
            cheque.cleared_date,
            Some(Date::from_calendar_date(2026, Month::January, 20).expect("valid date"))
        );
    }

    #[test]
    fn row_with_unreadable_date_names_the_cheque() {
        let row: ChequeRow = serde_json::from_str(
            r#"{
              "id": "b",
              "user_id": "u1",
              "type": "issued",
              "cheque_number": "000453",
              "cheque_date": "15/01/2026",
              "amount": 800,
              "bank_name": "SBI",
              "status": "pending"
            }"#,
        )
        .expect("row json");
        let error = row.into_cheque().expect_err("bad date");
        assert!(error.to_string().contains("cheque b: cheque_date"));
    }
}
