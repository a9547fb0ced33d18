use sqlcell::prelude::*;

const PG: StandardDialect = StandardDialect::Postgres;

#[test]
fn negation_is_idempotent_under_rendering() {
    let mut cells: Vec<ValueCell<i64>> = Vec::new();

    cells.push(ValueCell::with_value(3));
    let mut set = ValueCell::new();
    set.permitted_values([1, 2]).unwrap();
    cells.push(set);
    let mut range = ValueCell::new();
    range.permitted_range(Some(1), Some(10)).unwrap();
    cells.push(range);
    let mut null = ValueCell::new();
    null.permit_only_null().unwrap();
    cells.push(null);

    for mut cell in cells {
        let before = cell.render_predicate("x", &PG).unwrap();
        cell.negate().unwrap();
        let negated = cell.render_predicate("x", &PG).unwrap();
        assert_ne!(before, negated);
        cell.negate().unwrap();
        assert_eq!(cell.render_predicate("x", &PG).unwrap(), before);
    }
}

#[test]
fn is_null_negates_to_is_not_null() {
    let mut cell: ValueCell<String> = ValueCell::new();
    cell.permit_only_null().unwrap();
    assert_eq!(cell.render_predicate("note", &PG).unwrap(), "\"note\" IS NULL");
    cell.negate().unwrap();
    assert_eq!(
        cell.render_predicate("note", &PG).unwrap(),
        "\"note\" IS NOT NULL"
    );
}

#[test]
fn excluded_range_renders_a_single_group() {
    let mut age: Column<i32> = Column::new("age");
    age.cell_mut().excluded_range(Some(18), Some(65)).unwrap();
    assert_eq!(
        where_clause(&[&age], &PG).unwrap(),
        "(NOT (\"age\" >= 18 AND \"age\" < 65))"
    );
    assert!(age.cell().accepts(Some(&70)).unwrap());
    assert!(!age.cell().accepts(Some(&30)).unwrap());
}

#[test]
fn rendered_range_agrees_with_in_memory_evaluation() {
    let mut cell: ValueCell<i64> = ValueCell::new();
    cell.permitted_range_inclusive(None, Some(5)).unwrap();
    assert_eq!(cell.render_predicate("n", &PG).unwrap(), "\"n\" <= 5");
    let accepted: Vec<i64> = (0..=8).filter(|v| cell.accepts(Some(v)).unwrap()).collect();
    assert_eq!(accepted, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn dialects_differ_in_literals_and_quoting() {
    let mut flag = ValueCell::with_value(true);
    assert_eq!(flag.render_predicate("on", &PG).unwrap(), "\"on\" = TRUE");
    assert_eq!(
        flag.render_predicate("on", &StandardDialect::Sqlite).unwrap(),
        "\"on\" = 1"
    );
    flag.set(false).unwrap();
    assert_eq!(
        flag.render_predicate("on", &StandardDialect::Mysql).unwrap(),
        "`on` = FALSE"
    );

    let path = ValueCell::with_value("C:\\tmp".to_string());
    assert_eq!(
        path.render_predicate("p", &StandardDialect::Mysql).unwrap(),
        "`p` = 'C:\\\\tmp'"
    );
    assert_eq!(path.render_predicate("p", &PG).unwrap(), "\"p\" = 'C:\\tmp'");
}

#[test]
fn pattern_on_numeric_column_is_rejected() {
    let mut cell: ValueCell<i32> = ValueCell::new();
    let err = cell.permitted_pattern(1).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedPredicate {
            operator: "pattern",
            sql_type: SqlType::Integer,
            ..
        }
    ));
}

#[test]
fn where_clause_combines_heterogeneous_columns() {
    let mut name: Column<String> = Column::new("name");
    name.cell_mut()
        .excluded_pattern("%test%".to_string())
        .unwrap();
    let mut age: Column<i32> = Column::new("age");
    age.cell_mut().permitted_range(Some(18), Some(65)).unwrap();
    let mut ts: Column<Timestamp> = Column::new("created_at");
    ts.set(Timestamp::from_unix_seconds(0)).unwrap();

    let sql = where_clause(&[&name, &age, &ts], &PG).unwrap();
    assert_eq!(
        sql,
        "(NOT (\"name\" LIKE '%test%')) AND ((\"age\" >= 18 AND \"age\" < 65)) \
         AND (\"created_at\" = '1970-01-01 00:00:00')"
    );
}

#[test]
fn operators_serialize_with_cell_ids() {
    let mut cell: ValueCell<i64> = ValueCell::new();
    cell.permitted_values([4]).unwrap();
    let json = serde_json::to_value(cell.operator().unwrap()).unwrap();
    assert_eq!(json["PermittedSet"]["negated"], false);
    assert_eq!(json["PermittedSet"]["members"].as_array().unwrap().len(), 1);

    let back: Operator = serde_json::from_value(json).unwrap();
    assert_eq!(&back, cell.operator().unwrap());
}
