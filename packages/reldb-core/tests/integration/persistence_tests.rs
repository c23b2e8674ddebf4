//! Persistence round-trips through real files.

use ntest::timeout;
use tempfile::tempdir;

use reldb_core::error::DbError;
use reldb_core::executor::ExecuteResult;
use reldb_core::table::Row;
use reldb_core::{Database, Value};

fn sample_db() -> Database {
    let mut db = Database::new();
    db.execute("CREATE TABLE users (id int, name str, email str UNIQUE) PRIMARY KEY(id);")
        .unwrap();
    db.execute("CREATE TABLE orders (id int, user_id int, total float) PRIMARY KEY(id);")
        .unwrap();
    db.execute("INSERT INTO users (id, name, email) VALUES (1, 'alice', 'a@x');")
        .unwrap();
    db.execute("INSERT INTO users (id, name, email) VALUES (2, 'bob', 'b@x');")
        .unwrap();
    db.execute("INSERT INTO orders (id, user_id, total) VALUES (1, 2, 12.5);")
        .unwrap();
    db
}

fn all_rows(db: &Database, table: &str) -> Vec<Row> {
    db.get_table(table)
        .unwrap()
        .rows()
        .map(|(_, row)| row.clone())
        .collect()
}

#[timeout(5000)]
#[test]
fn test_file_round_trip_preserves_tables_and_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");

    let db = sample_db();
    db.save(&path).unwrap();
    let loaded = Database::load(&path).unwrap();

    assert_eq!(loaded.table_names(), db.table_names());
    for table in ["users", "orders"] {
        assert_eq!(all_rows(&loaded, table), all_rows(&db, table));
    }
}

#[timeout(5000)]
#[test]
fn test_constraints_and_indexes_survive_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");
    sample_db().save(&path).unwrap();

    let mut loaded = Database::load(&path).unwrap();

    // Index lookups answer as before the save.
    let hits = loaded
        .get_table("users")
        .unwrap()
        .scan_by_index("email", &Value::Str("b@x".into()))
        .unwrap();
    assert_eq!(hits.len(), 1);

    // Uniqueness is still enforced against reloaded rows.
    let err = loaded
        .execute("INSERT INTO users (id, name, email) VALUES (3, 'eve', 'a@x');")
        .unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));

    // The row-id counter resumes past the loaded rows.
    let result = loaded
        .execute("INSERT INTO users (id, name, email) VALUES (3, 'eve', 'e@x');")
        .unwrap();
    assert_eq!(result, ExecuteResult::Inserted(3));
}

#[timeout(5000)]
#[test]
fn test_save_load_save_is_stable() {
    let dir = tempdir().unwrap();
    let first_path = dir.path().join("first.json");
    let second_path = dir.path().join("second.json");

    let db = sample_db();
    db.save(&first_path).unwrap();
    Database::load(&first_path).unwrap().save(&second_path).unwrap();

    let first = std::fs::read_to_string(&first_path).unwrap();
    let second = std::fs::read_to_string(&second_path).unwrap();
    assert_eq!(first, second);
}

#[timeout(5000)]
#[test]
fn test_missing_file_is_a_persistence_error() {
    let dir = tempdir().unwrap();
    let err = Database::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DbError::PersistenceError(_)));
}

#[timeout(5000)]
#[test]
fn test_malformed_file_is_a_persistence_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = Database::load(&path).unwrap_err();
    assert!(matches!(err, DbError::PersistenceError(_)));
}

#[timeout(5000)]
#[test]
fn test_no_stray_temp_file_left_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db.json");
    sample_db().save(&path).unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["db.json"]);
}
