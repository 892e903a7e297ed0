#![cfg(feature = "sqlite")]

use tietokanta::prelude::*;

fn people() -> Result<Database, DatabaseError> {
    let mut db = Database::from_dsn("sqlite::memory:")?;
    db.connect()?.exec(
        "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER);
         INSERT INTO people (id, name, age)
             VALUES (1, 'Aino', 34), (2, 'Eino', 51), (3, 'Lea', 27);",
    )?;
    Ok(db)
}

#[test]
fn binds_positionally() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    let rows = db
        .query_parameters(
            "SELECT name FROM people WHERE age > ? AND age < ? ORDER BY id",
            vec![SqlValue::Int(30), SqlValue::Int(60)],
        )?
        .fetch_numeric_rows()?;
    assert_eq!(
        rows,
        vec![vec![SqlValue::from("Aino")], vec![SqlValue::from("Eino")]]
    );
    Ok(())
}

#[test]
fn binds_numbered_placeholders() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    let row = db
        .query_parameters(
            "SELECT ?2 || '-' || name FROM people WHERE id = ?1",
            [SqlValue::Int(3), SqlValue::from("hi")],
        )?
        .fetch_numeric_row()?;
    assert_eq!(row, Some(vec![SqlValue::from("hi-Lea")]));
    Ok(())
}

#[test]
fn binds_by_name_with_or_without_sigil() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    db.prepare("SELECT id FROM people WHERE name = :name OR age = :age ORDER BY id")?;

    let rows = db
        .execute(Params::named().with("name", "Eino").with(":age", 27))?
        .fetch_numeric_rows()?;
    assert_eq!(rows, vec![vec![SqlValue::Int(2)], vec![SqlValue::Int(3)]]);

    let pairs = vec![("name", SqlValue::from("Aino")), ("age", SqlValue::Null)];
    let rows = db.execute(pairs)?.fetch_numeric_rows()?;
    assert_eq!(rows, vec![vec![SqlValue::Int(1)]]);
    Ok(())
}

#[test]
fn repeated_name_binds_once() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    let sql = "SELECT id FROM people WHERE age > :n AND id < :n ORDER BY id";
    let rows = db
        .query_parameters(sql, Params::named().with("n", 2))?
        .fetch_numeric_rows()?;
    assert_eq!(rows, vec![vec![SqlValue::Int(1)]]);

    let rows = db
        .query_parameters(sql, Params::named().with("n", 30))?
        .fetch_numeric_rows()?;
    assert_eq!(rows, vec![vec![SqlValue::Int(1)], vec![SqlValue::Int(2)]]);
    Ok(())
}

#[test]
fn re_execution_does_not_leak_rows() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    db.prepare("SELECT name FROM people WHERE age >= ? ORDER BY id")?
        .execute(vec![SqlValue::Int(0)])?;
    // Take one row of three, leaving two behind.
    assert_eq!(db.fetch_numeric_row()?, Some(vec![SqlValue::from("Aino")]));

    let rows = db.execute(vec![SqlValue::Int(50)])?.fetch_numeric_rows()?;
    assert_eq!(rows, vec![vec![SqlValue::from("Eino")]]);
    assert_eq!(db.fetch_numeric_row()?, None);
    Ok(())
}

#[test]
fn wrong_parameter_count_is_a_driver_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    db.prepare("SELECT * FROM people WHERE id = ? AND age = ?")?;
    let err = db.execute(vec![SqlValue::Int(1)]).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Sqlite(rusqlite::Error::InvalidParameterCount(1, 2))
    ));

    let err = db.execute(Params::None).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Sqlite(rusqlite::Error::InvalidParameterCount(0, 2))
    ));
    Ok(())
}

#[test]
fn unknown_or_missing_names_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    db.prepare("SELECT * FROM people WHERE id = :id")?;

    let err = db
        .execute(Params::named().with("id", 1).with("bogus", 2))
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Sqlite(rusqlite::Error::InvalidParameterName(ref n)) if n == ":bogus"
    ));

    db.prepare("SELECT * FROM people WHERE id = :id AND age = :age")?;
    let err = db.execute(Params::named().with("id", 1)).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Sqlite(rusqlite::Error::InvalidParameterName(ref n)) if n == ":age"
    ));
    Ok(())
}

#[test]
fn names_for_anonymous_placeholders_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    db.prepare("SELECT * FROM people WHERE id = ?")?;
    let err = db.execute(Params::named().with("id", 1)).unwrap_err();
    assert!(matches!(err, DatabaseError::Parameter(_)));
    Ok(())
}

#[test]
fn mixing_positional_and_keyed_values_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    let mixed = Params::from(vec![SqlValue::Int(1)]).with("id", 2);

    db.prepare("SELECT name FROM people WHERE id = :id")?;
    let err = db.execute(mixed.clone()).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Sqlite(rusqlite::Error::InvalidParameterName(ref n)) if n == ":1"
    ));

    db.prepare("SELECT name FROM people WHERE id = ?")?;
    let err = db.execute(mixed).unwrap_err();
    assert!(matches!(err, DatabaseError::Parameter(_)));
    assert_eq!(db.fetch_numeric_row()?, None);
    Ok(())
}

#[test]
fn failed_execution_clears_previous_rows() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = people()?;
    db.prepare("SELECT id FROM people WHERE id = ?")?
        .execute(vec![SqlValue::Int(1)])?;
    assert!(db.execute(vec![SqlValue::Int(1), SqlValue::Int(2)]).is_err());
    assert_eq!(db.fetch_numeric_row()?, None);
    Ok(())
}
