#![cfg(feature = "sqlite")]

use tietokanta::prelude::*;

fn ledger() -> Result<Database, DatabaseError> {
    let mut db = Database::from_dsn("sqlite::memory:")?;
    db.connect()?.exec(
        "CREATE TABLE ledger (id INTEGER PRIMARY KEY, amount INTEGER NOT NULL);
         INSERT INTO ledger (amount) VALUES (100);",
    )?;
    Ok(db)
}

fn total(db: &mut Database) -> Result<i64, DatabaseError> {
    let row = db
        .query("SELECT COALESCE(SUM(amount), 0) FROM ledger")?
        .fetch_numeric_row()?;
    Ok(row.and_then(|r| r[0].as_int()).unwrap_or_default())
}

#[test]
fn rollback_discards_changes() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ledger()?;
    db.begin()?
        .query_parameters("INSERT INTO ledger (amount) VALUES (?)", vec![SqlValue::Int(50)])?
        .query("DELETE FROM ledger WHERE amount = 100")?;
    assert!(db.in_transaction());
    assert_eq!(total(&mut db)?, 50);

    db.rollback()?;
    assert!(!db.in_transaction());
    assert_eq!(total(&mut db)?, 100);
    Ok(())
}

#[test]
fn commit_persists_and_keeps_chaining() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ledger()?;
    let row = db
        .begin()?
        .query_parameters("INSERT INTO ledger (amount) VALUES (?)", vec![SqlValue::Int(25)])?
        .commit()?
        .query("SELECT COUNT(*) FROM ledger")?
        .fetch_numeric_row()?;
    assert_eq!(row, Some(vec![SqlValue::Int(2)]));
    assert_eq!(total(&mut db)?, 125);
    Ok(())
}

#[test]
fn committed_rows_are_visible_to_other_connections() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ledger.db").to_string_lossy().into_owned();

    let mut writer = SqliteOptions::builder(path.clone()).connect()?;
    writer
        .exec("CREATE TABLE ledger (id INTEGER PRIMARY KEY, amount INTEGER NOT NULL)")?
        .begin()?
        .query("INSERT INTO ledger (amount) VALUES (7)")?
        .rollback()?
        .begin()?
        .query("INSERT INTO ledger (amount) VALUES (9)")?
        .commit()?;

    let mut reader = SqliteOptions::builder(path).connect()?;
    let amounts = reader.query("SELECT amount FROM ledger")?.fetch_numeric_rows()?;
    assert_eq!(amounts, vec![vec![SqlValue::Int(9)]]);
    Ok(())
}

#[test]
fn transaction_misuse_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ledger()?;
    assert!(matches!(db.commit().unwrap_err(), DatabaseError::Transaction(_)));
    assert!(matches!(db.rollback().unwrap_err(), DatabaseError::Transaction(_)));

    db.begin()?;
    assert!(matches!(db.begin().unwrap_err(), DatabaseError::Transaction(_)));
    db.rollback()?;
    Ok(())
}

#[test]
fn failed_statement_inside_transaction_can_be_rolled_back()
-> Result<(), Box<dyn std::error::Error>> {
    let mut db = ledger()?;
    db.begin()?.query("INSERT INTO ledger (amount) VALUES (1)")?;
    let err = db.query("INSERT INTO ledger (amount) VALUES (NULL)").unwrap_err();
    assert!(matches!(err, DatabaseError::Sqlite(_)));
    assert!(db.in_transaction());
    db.rollback()?;
    assert_eq!(total(&mut db)?, 100);
    Ok(())
}

#[test]
fn transactions_started_through_statements_are_tracked() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ledger()?;
    db.query("BEGIN")?;
    assert!(db.in_transaction());
    db.rollback()?;
    assert!(!db.in_transaction());
    Ok(())
}
