use polysql::cache::MemoryCache;
use polysql::prelude::*;
use std::sync::Arc;

fn sqlite() -> Sql {
    let mut sql = Sql::new(SqlConfig::new(EngineMode::Sqlite, "sqlite::memory:"))
        .expect("sqlite engine");
    sql.query(
        "CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, field1 TEXT, field2 TEXT)",
        (),
    )
    .expect("create table");
    sql
}

fn insert_rows(sql: &mut Sql, rows: &[(&str, &str)]) {
    for (a, b) in rows {
        sql.insert("t", [("field1", *a), ("field2", *b)]).unwrap();
    }
}

#[test]
fn test_round_trip_fetch() {
    let mut sql = sqlite();
    sql.insert("t", [("field1", "row1   ")]).unwrap();

    let mut result = sql.query("SELECT FIELD1 FROM {t}", ()).unwrap();
    let row = result.fetch_assoc().unwrap().expect("one row");
    assert_eq!(row.len(), 1);
    assert_eq!(row.get("field1"), Some(&Value::from("row1")));
    assert!(result.fetch_assoc().unwrap().is_none());
}

#[test]
fn test_named_parameters() {
    let mut sql = sqlite();
    insert_rows(&mut sql, &[("one", "two"), ("one", "three")]);

    let rewritten = sql
        .rewrite(
            "SELECT id FROM t WHERE field1=?a AND field2=?b",
            Params::new().named("a", "one").named("b", "two"),
        )
        .unwrap();
    assert_eq!(rewritten.query, "SELECT id FROM t WHERE field1=? AND field2=?");
    assert_eq!(rewritten.params, vec![Value::from("one"), Value::from("two")]);

    let mut result = sql
        .query(
            "SELECT id FROM t WHERE field1=?a AND field2=?b",
            Params::new().named("a", "one").named("b", "two"),
        )
        .unwrap();
    assert_eq!(result.row_count().unwrap(), 1);
}

#[test]
fn test_list_expansion_and_literals() {
    let mut sql = sqlite();
    insert_rows(&mut sql, &[("a", "x"), ("b", "x"), ("c", "y?")]);

    let mut result = sql
        .query(
            "SELECT field1 FROM {t} WHERE field1 IN ? ORDER BY field1",
            vec![vec!["a", "c"]],
        )
        .unwrap();
    let values: Vec<Value> = std::iter::from_fn(|| result.fetch_indexed().unwrap())
        .map(|row| row[0].clone())
        .collect();
    assert_eq!(values, vec![Value::from("a"), Value::from("c")]);

    // A `?` inside a literal is not a placeholder.
    let mut result = sql
        .query("SELECT field1 FROM t WHERE field2 = 'y?'", ())
        .unwrap();
    assert_eq!(result.fetch_raw().unwrap(), Some(vec![Value::from("c")]));
}

#[test]
fn test_cursor_seek_and_row_count() {
    let mut sql = sqlite();
    insert_rows(&mut sql, &[("a", "1"), ("b", "2"), ("c", "3")]);

    let mut result = sql
        .query("SELECT field1, field2 FROM t ORDER BY id", ())
        .unwrap();
    assert_eq!(result.fetch_raw().unwrap().unwrap()[0], Value::from("a"));

    // Counting does not move the cursor.
    assert_eq!(result.row_count().unwrap(), 3);
    assert_eq!(result.position(), 1);
    assert_eq!(result.fetch_raw().unwrap().unwrap()[0], Value::from("b"));

    assert_eq!(result.value_at(0, "FIELD2").unwrap(), Some(Value::from("1")));
    result.seek(3).unwrap();
    assert!(result.fetch_raw().unwrap().is_none());
    assert!(result.seek(4).is_err());

    result.free();
    result.free();
    assert!(result.is_freed());
    assert!(result.fetch_raw().unwrap().is_none());
}

#[test]
fn test_key_values() {
    let mut sql = sqlite();
    insert_rows(&mut sql, &[("a", "1"), ("b", "2")]);

    let mut result = sql
        .query("SELECT field1, field2 FROM t ORDER BY id", ())
        .unwrap();
    let pairs: Vec<KeyValue> = result.key_values().unwrap().map(Result::unwrap).collect();
    assert_eq!(
        pairs,
        vec![
            KeyValue::Pair(Value::from("a"), Value::from("1")),
            KeyValue::Pair(Value::from("b"), Value::from("2")),
        ]
    );

    let mut wide = sql.query("SELECT id, field1, field2 FROM t", ()).unwrap();
    assert!(wide.key_values().is_err());
}

#[test]
fn test_builders() {
    let mut sql = sqlite();
    insert_rows(&mut sql, &[("a", "1"), ("b", "2"), ("c", "2")]);

    let by_field2 = Where::new().and("field2", "2");
    assert_eq!(sql.count("t", &by_field2).unwrap(), 2);
    assert!(sql.exists("t", &Where::new().and("field1", "a")).unwrap());
    assert!(!sql.exists("t", &Where::new().and("field1", "zzz")).unwrap());

    let row = sql
        .select("t", &Where::new().and("field1", "b"), &["field2"])
        .unwrap()
        .unwrap();
    assert_eq!(row.get("field2"), Some(&Value::from("2")));

    let names = sql
        .field_select_all("t", "field1", &by_field2, &["field1 DESC"])
        .unwrap();
    assert_eq!(names, vec![Value::from("c"), Value::from("b")]);

    let updated = sql
        .update("t", [("field2", "9")], &Where::new().and("field1", vec!["a", "b"]))
        .unwrap();
    assert_eq!(updated.affected_rows(), 2);
    assert_eq!(
        sql.field_select("t", "field2", &Where::new().and("field1", "a"))
            .unwrap(),
        Some(Value::from("9"))
    );

    let deleted = sql
        .delete("t", &Where::new().and("field2", Condition::NotEqualTo("9".into())))
        .unwrap();
    assert_eq!(deleted.affected_rows(), 1);
    assert_eq!(sql.count("t", &Where::new()).unwrap(), 2);
}

#[test]
fn test_search() {
    let mut sql = sqlite();
    insert_rows(&mut sql, &[("apple", "red"), ("banana", "yellow"), ("cherry", "red")]);

    let mut result = sql
        .search("t", &["field1", "field2"], "an", &Where::new(), &["field1"])
        .unwrap();
    assert_eq!(result.row_count().unwrap(), 1);
    assert_eq!(
        result.fetch_assoc().unwrap().unwrap().get("field1"),
        Some(&Value::from("banana"))
    );

    let mut result = sql
        .search("t", &["field1"], "e", &Where::new().and("field2", "red"), &["field1 DESC"])
        .unwrap();
    let names: Vec<Value> = std::iter::from_fn(|| result.fetch_indexed().unwrap())
        .map(|row| row[1].clone())
        .collect();
    assert_eq!(names, vec![Value::from("cherry"), Value::from("apple")]);
}

#[test]
fn test_insert_or_update() {
    let mut sql = sqlite();
    let key = Where::new().and("field1", "k");

    sql.insert_or_update("t", [("field2", "first")], &key).unwrap();
    sql.insert_or_update("t", [("field2", "second")], &key).unwrap();

    assert_eq!(sql.count("t", &key).unwrap(), 1);
    assert_eq!(
        sql.field_select("t", "field2", &key).unwrap(),
        Some(Value::from("second"))
    );
}

#[test]
fn test_get_id() {
    let mut sql = sqlite();
    sql.insert("t", [("field1", "a")]).unwrap();
    let result = sql.insert("t", [("field1", "b")]).unwrap();
    assert_eq!(sql.get_id(&result).unwrap(), 2);
}

#[test]
fn test_bulk_insert_falls_back_to_rows() {
    let mut sql = sqlite();
    {
        let mut bulk = sql.bulk("t");
        bulk.add([("field1", "a")]).unwrap();
        bulk.add([("field2", "b")]).unwrap();
        assert_eq!(bulk.fields(), ["field1".to_string(), "field2".to_string()]);
        assert_eq!(bulk.pending(), 2);
        assert_eq!(bulk.finish().unwrap(), 2);
    }

    let mut result = sql
        .query("SELECT field1, field2 FROM t ORDER BY id", ())
        .unwrap();
    // Missing fields are NULL, coerced to '' by the default policy.
    assert_eq!(
        result.fetch_raw().unwrap(),
        Some(vec![Value::from("a"), Value::from("")])
    );
    assert_eq!(
        result.fetch_raw().unwrap(),
        Some(vec![Value::from(""), Value::from("b")])
    );
}

fn count_where(sql: &mut Sql, predicate: &str) -> i64 {
    let row = sql
        .query(&format!("SELECT COUNT(*) FROM t WHERE {predicate}"), ())
        .unwrap()
        .fetch_raw()
        .unwrap()
        .unwrap();
    row[0].as_i64().unwrap()
}

fn bulk_with_gaps(allow_nulls: bool) -> Sql {
    let mut sql = Sql::new(
        SqlConfig::new(EngineMode::Sqlite, "sqlite::memory:")
            .allow_nulls(allow_nulls)
            .bulk_limit(2),
    )
    .unwrap();
    sql.query("CREATE TABLE t (field1 TEXT, field2 TEXT)", ())
        .unwrap();
    {
        let mut bulk = sql.bulk("t");
        bulk.add([("field1", "a"), ("field2", "x")]).unwrap();
        bulk.add([("field1", "b")]).unwrap();
        // The limit flushed the first two rows.
        assert_eq!(bulk.pending(), 0);
        bulk.add([("field1", "c")]).unwrap();
        assert_eq!(bulk.pending(), 1);
    }
    sql
}

#[test]
fn test_bulk_flushes_on_drop_with_nulls() {
    let mut sql = bulk_with_gaps(true);
    assert_eq!(sql.count("t", &Where::new()).unwrap(), 3);
    assert_eq!(count_where(&mut sql, "field2 IS NULL"), 2);
    assert_eq!(count_where(&mut sql, "field2 = ''"), 0);
}

#[test]
fn test_bulk_flushes_on_drop_coerces_nulls() {
    let mut sql = bulk_with_gaps(false);
    assert_eq!(sql.count("t", &Where::new()).unwrap(), 3);
    assert_eq!(count_where(&mut sql, "field2 IS NULL"), 0);
    assert_eq!(count_where(&mut sql, "field2 = ''"), 2);
}

#[test]
fn test_bulk_keeps_rows_when_flush_fails() {
    let mut sql = sqlite();
    let mut bulk = sql.bulk("missing");
    bulk.add([("field1", "a")]).unwrap();
    bulk.add([("field1", "b")]).unwrap();

    assert!(bulk.flush().is_err());
    assert_eq!(bulk.pending(), 2);
    // Still buffered, so a later flush retries the same rows.
    assert!(bulk.flush().is_err());
    assert_eq!(bulk.pending(), 2);
}

#[test]
fn test_transactions() {
    let mut sql = sqlite();

    sql.start_transaction().unwrap();
    assert!(sql.in_transaction());
    sql.insert("t", [("field1", "rolled back")]).unwrap();
    sql.rollback().unwrap();
    assert!(!sql.in_transaction());
    assert_eq!(sql.count("t", &Where::new()).unwrap(), 0);

    sql.start_transaction().unwrap();
    sql.insert("t", [("field1", "kept")]).unwrap();
    sql.end_transaction().unwrap();
    assert_eq!(sql.count("t", &Where::new()).unwrap(), 1);
}

#[test]
fn test_query_cached() {
    let cache = Arc::new(MemoryCache::default());
    let mut sql = sqlite().with_cache(cache.clone());
    insert_rows(&mut sql, &[("a", "1")]);

    let query = "SELECT field1 FROM t WHERE field2 = ?";
    let first = sql.query_cached(query, vec!["1"]).unwrap().fetch_all_assoc().unwrap();
    insert_rows(&mut sql, &[("b", "1")]);
    let second = sql.query_cached(query, vec!["1"]).unwrap().fetch_all_assoc().unwrap();

    // The second call is served from the cache and misses the new row.
    assert_eq!(first, second);
    assert_eq!(second.len(), 1);
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));

    let live = sql.query(query, vec!["1"]).unwrap().row_count().unwrap();
    assert_eq!(live, 2);
}

#[test]
fn test_introspection() {
    let mut sql = sqlite();
    sql.query("CREATE VIEW v AS SELECT field1 FROM t", ()).unwrap();

    assert_eq!(sql.list_databases().unwrap(), vec!["main"]);
    assert_eq!(sql.list_tables(None).unwrap(), vec!["t"]);
    assert_eq!(sql.list_views(None).unwrap(), vec!["v"]);
    assert!(sql.lock_tables(&["t"]).unwrap_err().is_not_implemented());
}

#[test]
fn test_failed_query_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let mut sql = Sql::new(
        SqlConfig::new(EngineMode::Sqlite, "sqlite::memory:").log_dir(dir.path()),
    )
    .unwrap();

    let err = sql
        .query("SELECT * FROM missing WHERE a = ?", vec![7])
        .err()
        .expect("query should fail");
    assert!(matches!(err, SqlError::Query { .. }));

    let logs: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(logs.len(), 1);
    let content = std::fs::read_to_string(logs[0].as_ref().unwrap().path()).unwrap();
    assert!(content.contains("missing"));
    assert!(content.contains("prepared: SELECT * FROM missing WHERE a = 7"));
}

#[test]
fn test_placeholder_mismatch_is_not_executed() {
    let mut sql = sqlite();
    let err = sql
        .query("SELECT * FROM t WHERE field1 = ? AND field2 = ?", vec!["a"])
        .err()
        .unwrap();
    assert!(matches!(err, SqlError::PlaceholderMismatch { .. }));
    assert!(sql.is_connected());
}
