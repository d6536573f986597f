// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use chequebook_app::{ChequeBackend, ChequeStatus, ChequeType, UserId, partition};
use chequebook_db::{Store, validate_db_path};
use chequebook_testkit::{ChequeFaker, temp_db_path};
use time::{Date, Month};

fn store() -> Result<Store> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    Ok(store)
}

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("file:test.db").is_err());
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("db.sqlite?mode=ro").is_err());
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path("/tmp/chequebook.db").is_ok());
}

#[test]
fn bootstrap_rejects_schema_missing_required_column() -> Result<()> {
    let store = store()?;
    store.raw_connection().execute_batch(
        "
        ALTER TABLE cheques RENAME TO cheques_old;
        CREATE TABLE cheques (
          id TEXT PRIMARY KEY,
          user_id TEXT NOT NULL,
          type TEXT NOT NULL,
          cheque_number TEXT NOT NULL,
          cheque_date TEXT NOT NULL,
          amount_paise INTEGER NOT NULL,
          bank_name TEXT NOT NULL,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );
        DROP TABLE cheques_old;
        ",
    )?;

    let err = store
        .bootstrap()
        .expect_err("schema validation should fail");
    let message = err.to_string();
    assert!(message.contains("table `cheques` is missing required columns"));
    assert!(message.contains("status"));
    Ok(())
}

#[test]
fn file_backed_store_persists_between_opens() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    let user = UserId::new("owner");
    let mut faker = ChequeFaker::new(9);

    let id = {
        let store = Store::open(&path)?;
        store.bootstrap()?;
        store.insert_cheque(&user, &faker.cheque(ChequeType::Received))?
    };

    let store = Store::open(&path)?;
    store.bootstrap()?;
    let rows = store.list_cheques(&user)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    Ok(())
}

#[test]
fn insert_assigns_hex_ids_and_round_trips_fields() -> Result<()> {
    let store = store()?;
    let user = UserId::new("u1");
    let mut faker = ChequeFaker::new(21);
    let new = faker.cheque_with_status(ChequeType::Issued, ChequeStatus::Bounced);

    let id = store.insert_cheque(&user, &new)?;
    assert_eq!(id.as_str().len(), 32);
    assert!(id.as_str().bytes().all(|b| b.is_ascii_hexdigit()));

    let stored = store.get_cheque(&user, &id)?.expect("inserted row");
    assert_eq!(stored.user_id, user);
    assert_eq!(stored.cheque_type, ChequeType::Issued);
    assert_eq!(stored.details(), new.details);
    Ok(())
}

#[test]
fn list_is_scoped_to_user_and_ordered_by_date_desc() -> Result<()> {
    let store = store()?;
    let owner = UserId::new("owner");
    let other = UserId::new("other");
    let mut faker = ChequeFaker::new(4);

    for cheque in faker.batch(12) {
        store.insert_cheque(&owner, &cheque)?;
    }
    store.insert_cheque(&other, &faker.cheque(ChequeType::Received))?;

    let rows = store.list_cheques(&owner)?;
    assert_eq!(rows.len(), 12);
    assert!(rows.iter().all(|row| row.user_id == owner));
    for pair in rows.windows(2) {
        assert!(
            (pair[0].cheque_date, &pair[0].id) >= (pair[1].cheque_date, &pair[1].id),
            "rows out of order: {:?} before {:?}",
            pair[0].cheque_date,
            pair[1].cheque_date
        );
    }

    let (received, issued) = partition(rows);
    assert_eq!(received.len(), 6);
    assert_eq!(issued.len(), 6);
    Ok(())
}

#[test]
fn update_changes_details_but_not_type() -> Result<()> {
    let store = store()?;
    let user = UserId::new("u1");
    let mut faker = ChequeFaker::new(8);
    let new = faker.cheque_with_status(ChequeType::Received, ChequeStatus::Pending);
    let id = store.insert_cheque(&user, &new)?;

    let mut details = new.details.clone();
    details.status = ChequeStatus::Cleared;
    details.cleared_date = Some(Date::from_calendar_date(2026, Month::December, 31)?);
    details.bank_transaction_id = Some("TXN42".to_owned());
    store.update_cheque(&user, &id, &details)?;

    let stored = store.get_cheque(&user, &id)?.expect("row");
    assert_eq!(stored.cheque_type, ChequeType::Received);
    assert_eq!(stored.status, ChequeStatus::Cleared);
    assert_eq!(stored.details(), details);
    Ok(())
}

#[test]
fn update_of_foreign_row_reports_not_found() -> Result<()> {
    let store = store()?;
    let mut faker = ChequeFaker::new(8);
    let new = faker.cheque(ChequeType::Received);
    let id = store.insert_cheque(&UserId::new("owner"), &new)?;

    let err = store
        .update_cheque(&UserId::new("intruder"), &id, &new.details)
        .expect_err("foreign update should fail");
    assert!(err.to_string().contains("not found"));
    Ok(())
}

#[test]
fn delete_removes_exactly_one_row() -> Result<()> {
    let store = store()?;
    let user = UserId::new("u1");
    let mut faker = ChequeFaker::new(15);
    let keep = store.insert_cheque(
        &user,
        &faker.cheque_with_status(ChequeType::Received, ChequeStatus::Pending),
    )?;
    let target = store.insert_cheque(
        &user,
        &faker.cheque_with_status(ChequeType::Received, ChequeStatus::Bounced),
    )?;
    let before = store.get_cheque(&user, &keep)?;

    store.delete_cheque(&user, &target)?;

    let rows = store.list_cheques(&user)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, keep);
    assert_eq!(store.get_cheque(&user, &keep)?, before);
    Ok(())
}

#[test]
fn delete_refuses_cleared_cheques() -> Result<()> {
    let store = store()?;
    let user = UserId::new("u1");
    let mut faker = ChequeFaker::new(16);
    let id = store.insert_cheque(
        &user,
        &faker.cheque_with_status(ChequeType::Issued, ChequeStatus::Cleared),
    )?;

    let err = store
        .delete_cheque(&user, &id)
        .expect_err("cleared delete should fail");
    assert!(err.to_string().contains("cleared and cannot be deleted"));
    assert_eq!(store.list_cheques(&user)?.len(), 1);
    Ok(())
}

#[test]
fn delete_of_missing_row_is_an_error() -> Result<()> {
    let store = store()?;
    let user = UserId::new("u1");
    let mut faker = ChequeFaker::new(17);
    let id = store.insert_cheque(&user, &faker.cheque(ChequeType::Received))?;

    store.delete_cheque(&user, &id)?;
    let err = store
        .delete_cheque(&user, &id)
        .expect_err("second delete should fail");
    assert!(err.to_string().contains("not found"));
    Ok(())
}

#[test]
fn store_works_through_backend_trait_object() -> Result<()> {
    let backend: Box<dyn ChequeBackend> = Box::new(store()?);
    let user = UserId::new("u1");
    let mut faker = ChequeFaker::new(30);
    backend.insert_cheque(&user, &faker.cheque(ChequeType::Issued))?;
    assert_eq!(backend.list_cheques(&user)?.len(), 1);
    Ok(())
}

#[test]
fn insert_rejects_blank_user() -> Result<()> {
    let store = store()?;
    let mut faker = ChequeFaker::new(1);
    let err = store
        .insert_cheque(&UserId::new("  "), &faker.cheque(ChequeType::Received))
        .expect_err("blank user");
    assert!(err.to_string().contains("user id is required"));
    Ok(())
}
