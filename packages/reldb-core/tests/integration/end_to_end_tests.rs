//! End-to-end statement scenarios through the adapter-facing text API.

use ntest::timeout;

use reldb_core::error::DbError;
use reldb_core::executor::ExecuteResult;
use reldb_core::table::Row;
use reldb_core::{Database, Value};

fn rows(result: ExecuteResult) -> Vec<Row> {
    match result {
        ExecuteResult::Rows(rows) => rows,
        other => panic!("expected rows, got {:?}", other),
    }
}

fn affected(result: ExecuteResult) -> usize {
    match result {
        ExecuteResult::Affected(count) => count,
        other => panic!("expected affected count, got {:?}", other),
    }
}

fn users_db() -> Database {
    let mut db = Database::new();
    db.execute("CREATE TABLE users (id int, full_name str, email str) PRIMARY KEY(id);")
        .unwrap();
    db
}

#[timeout(5000)]
#[test]
fn test_insert_then_select_star() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id, full_name, email) VALUES (1, 'Alice', 'alice@example.com');")
        .unwrap();

    let rows = rows(db.execute("SELECT * FROM users;").unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(rows[0].get("full_name"), Some(&Value::Str("Alice".into())));
    assert_eq!(
        rows[0].get("email"),
        Some(&Value::Str("alice@example.com".into()))
    );
}

#[timeout(5000)]
#[test]
fn test_duplicate_primary_key_insert_rejected() {
    let mut db = users_db();
    let insert = "INSERT INTO users (id, full_name, email) VALUES (1, 'Alice', 'alice@example.com');";
    db.execute(insert).unwrap();

    let err = db.execute(insert).unwrap_err();
    assert!(matches!(err, DbError::PrimaryKeyViolation { .. }));
    assert_eq!(rows(db.execute("SELECT * FROM users;").unwrap()).len(), 1);
}

#[timeout(5000)]
#[test]
fn test_update_changes_only_assigned_columns() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id, full_name, email) VALUES (1, 'Alice', 'alice@example.com');")
        .unwrap();

    let count = affected(
        db.execute("UPDATE users SET full_name = 'Alice B' WHERE id = 1;")
            .unwrap(),
    );
    assert_eq!(count, 1);

    let rows = rows(db.execute("SELECT * FROM users;").unwrap());
    assert_eq!(rows[0].get("full_name"), Some(&Value::Str("Alice B".into())));
    assert_eq!(rows[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(
        rows[0].get("email"),
        Some(&Value::Str("alice@example.com".into()))
    );
}

#[timeout(5000)]
#[test]
fn test_delete_then_redelete_affects_zero() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id, full_name, email) VALUES (1, 'Alice', 'alice@example.com');")
        .unwrap();

    assert_eq!(affected(db.execute("DELETE FROM users WHERE id = 1;").unwrap()), 1);
    assert!(rows(db.execute("SELECT * FROM users;").unwrap()).is_empty());
    assert_eq!(affected(db.execute("DELETE FROM users WHERE id = 1;").unwrap()), 0);
}

#[timeout(5000)]
#[test]
fn test_projection_and_comparison_operators() {
    let mut db = users_db();
    for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
        db.execute(&format!(
            "INSERT INTO users (id, full_name, email) VALUES ({}, '{}', '{}@x');",
            id, name, name
        ))
        .unwrap();
    }

    let rows = rows(
        db.execute("SELECT full_name FROM users WHERE id > 1 AND id <= 3;")
            .unwrap(),
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 1);
    assert_eq!(rows[0].get("full_name"), Some(&Value::Str("b".into())));
    assert_eq!(rows[1].get("full_name"), Some(&Value::Str("c".into())));
}

#[timeout(5000)]
#[test]
fn test_where_type_mismatch_is_an_error() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id, full_name, email) VALUES (1, 'a', 'a@x');")
        .unwrap();
    let err = db.execute("SELECT * FROM users WHERE id = 'one';").unwrap_err();
    assert!(matches!(err, DbError::TypeMismatch { .. }));
}

#[timeout(5000)]
#[test]
fn test_failed_insert_leaves_table_unchanged() {
    let mut db = users_db();
    db.execute("INSERT INTO users (id, full_name, email) VALUES (1, 'a', 'a@x');")
        .unwrap();

    // Type mismatch on one column; nothing else may change.
    let err = db
        .execute("INSERT INTO users (id, full_name, email) VALUES (2, 3.5, 'b@x');")
        .unwrap_err();
    assert!(matches!(err, DbError::TypeMismatch { .. }));

    let all = rows(db.execute("SELECT * FROM users;").unwrap());
    assert_eq!(all.len(), 1);
    assert!(rows(db.execute("SELECT * FROM users WHERE id = 2;").unwrap()).is_empty());
}

#[timeout(5000)]
#[test]
fn test_join_matches_brute_force_cartesian_filter() {
    let mut db = Database::new();
    db.execute("CREATE TABLE users (id int, name str) PRIMARY KEY(id);")
        .unwrap();
    db.execute("CREATE TABLE orders (id int, user_id int, item str) PRIMARY KEY(id);")
        .unwrap();

    for (id, name) in [(1, "alice"), (2, "bob"), (3, "carol")] {
        db.execute(&format!(
            "INSERT INTO users (id, name) VALUES ({}, '{}');",
            id, name
        ))
        .unwrap();
    }
    for (id, user_id, item) in [(1, 1, "book"), (2, 1, "pen"), (3, 2, "mug"), (4, 9, "ghost")] {
        db.execute(&format!(
            "INSERT INTO orders (id, user_id, item) VALUES ({}, {}, '{}');",
            id, user_id, item
        ))
        .unwrap();
    }

    let joined = rows(
        db.execute("SELECT * FROM users JOIN orders ON users.id = orders.user_id;")
            .unwrap(),
    );

    // Brute force: every (user, order) pair with equal join values.
    let users: Vec<Row> = db
        .get_table("users")
        .unwrap()
        .rows()
        .map(|(_, r)| r.clone())
        .collect();
    let orders: Vec<Row> = db
        .get_table("orders")
        .unwrap()
        .rows()
        .map(|(_, r)| r.clone())
        .collect();
    let mut expected = Vec::new();
    for user in &users {
        for order in &orders {
            if user.get("id") == order.get("user_id") {
                let mut combined = order.clone();
                combined.extend(user.clone());
                expected.push(combined);
            }
        }
    }

    assert_eq!(joined.len(), 3);
    assert_eq!(joined, expected);
    // Left column names win the `id` collision.
    assert_eq!(joined[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(joined[0].get("item"), Some(&Value::Str("book".into())));
}

#[timeout(5000)]
#[test]
fn test_join_with_where_and_projection() {
    let mut db = Database::new();
    db.execute("CREATE TABLE users (id int, name str) PRIMARY KEY(id);")
        .unwrap();
    // No index on user_id: the join probes by linear scan instead.
    db.execute("CREATE TABLE orders (id int, user_id int, item str) PRIMARY KEY(id);")
        .unwrap();
    db.execute("INSERT INTO users (id, name) VALUES (1, 'alice');")
        .unwrap();
    db.execute("INSERT INTO orders (id, user_id, item) VALUES (1, 1, 'book');")
        .unwrap();
    db.execute("INSERT INTO orders (id, user_id, item) VALUES (2, 1, 'pen');")
        .unwrap();

    let joined = rows(
        db.execute(
            "SELECT name, item FROM users JOIN orders ON users.id = orders.user_id WHERE item = 'pen';",
        )
        .unwrap(),
    );
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].get("name"), Some(&Value::Str("alice".into())));
    assert_eq!(joined[0].get("item"), Some(&Value::Str("pen".into())));
}

#[timeout(5000)]
#[test]
fn test_indexed_where_path_equals_full_scan() {
    let mut db = Database::new();
    db.execute("CREATE TABLE items (id int, category str) PRIMARY KEY(id);")
        .unwrap();
    for i in 0..20 {
        db.execute(&format!(
            "INSERT INTO items (id, category) VALUES ({}, 'c{}');",
            i,
            i % 3
        ))
        .unwrap();
    }

    // First term equality on the indexed pk column takes the index path;
    // the same predicate on the unindexed column takes the scan path.
    let by_index = rows(db.execute("SELECT * FROM items WHERE id = 7;").unwrap());
    let by_scan = rows(
        db.execute("SELECT * FROM items WHERE category = 'c1' AND id = 7;")
            .unwrap(),
    );
    assert_eq!(by_index, by_scan);
}

#[timeout(5000)]
#[test]
fn test_unique_column_constraint_via_statements() {
    let mut db = Database::new();
    db.execute("CREATE TABLE accounts (id int, email str UNIQUE) PRIMARY KEY(id);")
        .unwrap();
    db.execute("INSERT INTO accounts (id, email) VALUES (1, 'a@x');")
        .unwrap();

    let err = db
        .execute("INSERT INTO accounts (id, email) VALUES (2, 'a@x');")
        .unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));

    // Updating row 2's email to a free value works; to a taken value fails.
    db.execute("INSERT INTO accounts (id, email) VALUES (2, 'b@x');")
        .unwrap();
    let err = db
        .execute("UPDATE accounts SET email = 'a@x' WHERE id = 2;")
        .unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
    let unchanged = rows(db.execute("SELECT * FROM accounts WHERE id = 2;").unwrap());
    assert_eq!(unchanged[0].get("email"), Some(&Value::Str("b@x".into())));
}

#[timeout(5000)]
#[test]
fn test_not_null_column_must_be_supplied() {
    let mut db = Database::new();
    db.execute("CREATE TABLE notes (id int PRIMARY KEY, body str NOT NULL, tag str);")
        .unwrap();

    let err = db.execute("INSERT INTO notes (id) VALUES (1);").unwrap_err();
    assert!(matches!(err, DbError::NotNullViolation { .. }));

    // The nullable column may stay unset.
    db.execute("INSERT INTO notes (id, body) VALUES (1, 'hi');")
        .unwrap();
    let all = rows(db.execute("SELECT * FROM notes;").unwrap());
    assert_eq!(all[0].get("tag"), None);
}

#[timeout(5000)]
#[test]
fn test_int_literal_fills_float_column() {
    let mut db = Database::new();
    db.execute("CREATE TABLE m (id int PRIMARY KEY, ratio float);")
        .unwrap();
    db.execute("INSERT INTO m (id, ratio) VALUES (1, 2);").unwrap();

    let all = rows(db.execute("SELECT * FROM m;").unwrap());
    assert_eq!(all[0].get("ratio"), Some(&Value::Float(2.0)));
    // Numeric comparison works across int/float tags.
    let hit = rows(db.execute("SELECT * FROM m WHERE ratio = 2;").unwrap());
    assert_eq!(hit.len(), 1);
}

#[timeout(5000)]
#[test]
fn test_syntax_errors_surface_with_position() {
    let mut db = Database::new();
    let err = db.execute("SELECT * users;").unwrap_err();
    let DbError::SyntaxError { position, expected } = err else {
        panic!("expected SyntaxError");
    };
    assert_eq!(position, 9);
    assert_eq!(expected, "FROM");
}
