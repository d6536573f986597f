// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use chequebook_app::{
    ChequeBackend, ChequeDetails, ChequeId, ChequeStatus, ChequeType, NewCheque, UserId,
};
use chequebook_remote::Client;
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Request, Response, Server};
use time::{Date, Month};

fn mock_server() -> Result<(Server, String)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());
    Ok((server, addr))
}

fn json_response(status: u16, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str().to_owned())
}

fn details() -> ChequeDetails {
    ChequeDetails {
        cheque_number: "000777".to_owned(),
        cheque_date: Date::from_calendar_date(2026, Month::March, 1).expect("valid date"),
        amount_paise: 1_250_000,
        bank_name: "Axis Bank".to_owned(),
        status: ChequeStatus::Pending,
        bank_transaction_id: None,
        bounce_charges_paise: 0,
        mahajan_id: None,
        firm_account_id: None,
        party_name: Some("Mehta Agencies".to_owned()),
        notes: None,
        cleared_date: None,
    }
}

const TWO_ROWS: &str = r#"[
  {"id":"1","user_id":"u1","type":"received","cheque_number":"100001","cheque_date":"2026-03-02",
   "amount":12500,"bank_name":"SBI","status":"pending","party_name":"Jain Traders"},
  {"id":"2","user_id":"u1","type":"issued","cheque_number":"200002","cheque_date":"2026-03-01",
   "amount":99.5,"bank_name":"HDFC Bank","status":"cleared","cleared_date":"2026-03-04"}
]"#;

#[test]
fn unreachable_server_error_names_the_setting() {
    let client = Client::new(
        "http://127.0.0.1:1",
        "anon",
        None,
        Duration::from_millis(50),
    )
    .expect("client should initialize");

    let error = client
        .list_cheques(&UserId::new("u1"))
        .expect_err("list should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("[backend]"), "got {message}");
}

#[test]
fn list_filters_by_user_and_sends_credentials() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(
            request.url(),
            "/rest/v1/cheques?select=*&user_id=eq.u1&order=cheque_date.desc%2Cid.desc"
        );
        assert_eq!(header_value(&request, "apikey").as_deref(), Some("anon"));
        assert_eq!(
            header_value(&request, "Authorization").as_deref(),
            Some("Bearer user-jwt")
        );
        request
            .respond(json_response(200, TWO_ROWS))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, "anon", Some("user-jwt"), Duration::from_secs(1))?;
    let rows = client.list_cheques(&UserId::new("u1"))?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].cheque_type, ChequeType::Received);
    assert_eq!(rows[0].amount_paise, 1_250_000);
    assert_eq!(rows[1].amount_paise, 9_950);
    assert!(!rows[1].can_delete());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_accepts_timestamp_dates() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                200,
                r#"[{"id":"a","user_id":"u1","type":"received","cheque_number":"300003",
                     "cheque_date":"2026-01-12","amount":4000,"bank_name":"SBI",
                     "status":"cleared","cleared_date":"2026-01-20T10:00:00+00:00"}]"#,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, "anon", None, Duration::from_secs(1))?;
    let rows = client.list_cheques(&UserId::new("u1"))?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, ChequeStatus::Cleared);
    assert_eq!(
        rows[0].cleared_date,
        Some(Date::from_calendar_date(2026, Month::January, 20)?)
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn bearer_falls_back_to_api_key() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            header_value(&request, "Authorization").as_deref(),
            Some("Bearer anon")
        );
        request
            .respond(json_response(200, "[]"))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, "anon", Some("  "), Duration::from_secs(1))?;
    assert!(client.list_cheques(&UserId::new("u1"))?.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_error_surfaces_postgrest_message() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                401,
                r#"{"code":"PGRST301","message":"JWT expired","hint":null}"#,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, "anon", None, Duration::from_secs(1))?;
    let error = client
        .list_cheques(&UserId::new("u1"))
        .expect_err("401 should fail");
    assert_eq!(error.to_string(), "JWT expired");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn delete_guards_cleared_status_on_the_server() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Delete);
        assert_eq!(
            request.url(),
            "/rest/v1/cheques?id=eq.1&user_id=eq.u1&status=neq.cleared"
        );
        assert_eq!(
            header_value(&request, "Prefer").as_deref(),
            Some("return=representation")
        );
        request
            .respond(json_response(
                200,
                r#"[{"id":"1","user_id":"u1","type":"received","cheque_number":"100001",
                    "cheque_date":"2026-03-02","amount":12500,"bank_name":"SBI","status":"pending"}]"#,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, "anon", None, Duration::from_secs(1))?;
    client.delete_cheque(&UserId::new("u1"), &ChequeId::new("1"))?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn delete_matching_no_rows_is_an_error() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(200, "[]"))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, "anon", None, Duration::from_secs(1))?;
    let error = client
        .delete_cheque(&UserId::new("u1"), &ChequeId::new("2"))
        .expect_err("empty representation should fail");
    assert_eq!(error.to_string(), "cheque 2 is cleared or no longer exists");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn insert_posts_rupees_and_returns_new_id() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/rest/v1/cheques");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read body");
        let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["type"], "issued");
        assert_eq!(json["amount"], 12500.0);
        assert_eq!(json["cheque_date"], "2026-03-01");
        assert_eq!(json["status"], "pending");
        assert!(json["cleared_date"].is_null());

        request
            .respond(json_response(
                201,
                r#"[{"id":"new-1","user_id":"u1","type":"issued","cheque_number":"000777",
                    "cheque_date":"2026-03-01","amount":12500,"bank_name":"Axis Bank","status":"pending"}]"#,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, "anon", None, Duration::from_secs(1))?;
    let backend: &dyn ChequeBackend = &client;
    let id = backend.insert_cheque(
        &UserId::new("u1"),
        &NewCheque {
            cheque_type: ChequeType::Issued,
            details: details(),
        },
    )?;
    assert_eq!(id.as_str(), "new-1");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn update_patches_without_type_or_owner() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Patch);
        assert_eq!(request.url(), "/rest/v1/cheques?id=eq.7&user_id=eq.u1");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read body");
        let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert!(json.get("type").is_none());
        assert!(json.get("user_id").is_none());
        assert_eq!(json["party_name"], "Mehta Agencies");

        request
            .respond(json_response(200, "[]"))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, "anon", None, Duration::from_secs(1))?;
    let error = client
        .update_cheque(&UserId::new("u1"), &ChequeId::new("7"), &details())
        .expect_err("no rows updated");
    assert!(error.to_string().contains("not found"));

    handle.join().expect("server thread should join");
    Ok(())
}
