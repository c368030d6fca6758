//! Filter behavior over a small reference table
//!
//! Filters are built from column type names exactly as a view would, then
//! evaluated against in-memory rows.

use acton_admin::filters::{
    Column, FilterConverter, FilterKind, FilterSet, FilterValue, Record, SelectQuery,
    DEFAULT_CONVERTER,
};
use acton_admin::i18n::NULL_TRANSLATOR;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(day: NaiveDate, h: u32, m: u32, s: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, s).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn columns() -> Vec<Arc<Column>> {
    vec![
        Arc::new(Column::new("title", "Unicode")),
        Arc::new(Column::new("views", "Integer")),
        Arc::new(Column::new("published", "Date")),
        Arc::new(Column::new("featured", "Boolean")),
        Arc::new(Column::new("status", "Enum").with_enum_values(["draft", "live"])),
        Arc::new(Column::new("updated_at", "DateTime")),
        Arc::new(Column::new("opens", "Time")),
        Arc::new(Column::new("cover", "LargeBinary")),
    ]
}

fn rows() -> Vec<Record> {
    [
        ("Hello world", 10_i64, date(2019, 12, 31), true, "live", (23, 59, 59), time(8, 0)),
        ("hello again", 250, date(2020, 1, 1), false, "draft", (0, 0, 0), time(9, 0)),
        ("50% off", 3, date(2020, 1, 15), true, "live", (12, 30, 0), time(12, 0)),
        ("Goodbye", 99, date(2020, 1, 31), false, "live", (23, 59, 59), time(17, 30)),
        ("Release notes", 4_000, date(2020, 2, 1), false, "draft", (0, 0, 0), time(22, 15)),
    ]
    .into_iter()
    .enumerate()
    .map(|(id, (title, views, published, featured, status, (h, m, s), opens))| {
        Record::new()
            .with("id", i64::try_from(id).unwrap())
            .with("title", title)
            .with("views", views)
            .with("published", published)
            .with("featured", featured)
            .with("status", status)
            .with("updated_at", at(published, h, m, s))
            .with("opens", opens)
    })
    .collect()
}

fn filter_set() -> FilterSet {
    FilterSet::build(&columns(), &DEFAULT_CONVERTER)
}

/// Index of the filter named `name` with operator `kind`
fn index_of(set: &FilterSet, name: &str, kind: FilterKind) -> usize {
    set.iter()
        .position(|filter| filter.name() == name && filter.kind() == kind)
        .unwrap()
}

/// Ids of the rows matching one filter argument
fn matching_ids(set: &FilterSet, index: usize, raw: &str) -> BTreeSet<i64> {
    let arg = format!("flt0_{index}");
    let parsed = set.parse_args([(arg.as_str(), raw)]);
    assert!(parsed.is_valid(), "{raw:?} rejected: {:?}", parsed.errors);

    let query = set.apply(SelectQuery::new("posts"), &parsed.active).unwrap();
    let rows = rows();
    query
        .filter_records(&rows)
        .into_iter()
        .map(|row| match row.get("id") {
            Some(FilterValue::Integer(id)) => *id,
            other => panic!("row without id: {other:?}"),
        })
        .collect()
}

fn assert_complementary(name: &str, positive: FilterKind, negative: FilterKind, raw: &str) {
    let set = filter_set();
    let all: BTreeSet<i64> = (0..5).collect();

    let matched = matching_ids(&set, index_of(&set, name, positive), raw);
    let excluded = matching_ids(&set, index_of(&set, name, negative), raw);

    assert!(
        matched.is_disjoint(&excluded),
        "{name} {raw:?}: {matched:?} overlaps {excluded:?}"
    );
    assert_eq!(
        matched.union(&excluded).copied().collect::<BTreeSet<_>>(),
        all,
        "{name} {raw:?} does not cover every row"
    );
}

#[test]
fn test_unknown_column_type_is_skipped() {
    let set = filter_set();
    // 4 string + 4 numeric + 4 date + 2 boolean + 2 enum + 4 datetime + 4 time;
    // the binary column offers nothing
    assert_eq!(set.len(), 24);
    assert!(set.iter().all(|filter| filter.column().name() != "cover"));
}

#[test]
fn test_equal_and_not_equal_partition_rows() {
    assert_complementary("Title", FilterKind::Equal, FilterKind::NotEqual, "Goodbye");
    assert_complementary("Views", FilterKind::Equal, FilterKind::NotEqual, "250");
    assert_complementary("Published", FilterKind::Equal, FilterKind::NotEqual, "2020-01-15");
    assert_complementary("Featured", FilterKind::Equal, FilterKind::NotEqual, "1");
    assert_complementary("Status", FilterKind::Equal, FilterKind::NotEqual, "draft");
    assert_complementary(
        "Updated At",
        FilterKind::Equal,
        FilterKind::NotEqual,
        "2020-01-15 12:30:00",
    );
    assert_complementary("Opens", FilterKind::Equal, FilterKind::NotEqual, "17:30:00");
}

#[test]
fn test_range_and_not_in_range_partition_rows() {
    assert_complementary(
        "Published",
        FilterKind::InRange,
        FilterKind::NotInRange,
        "2020-01-01 to 2020-01-31",
    );
    assert_complementary(
        "Published",
        FilterKind::InRange,
        FilterKind::NotInRange,
        "2021-01-01 to 2021-12-31",
    );
    assert_complementary(
        "Updated At",
        FilterKind::InRange,
        FilterKind::NotInRange,
        "2020-01-01 00:00:00 to 2020-01-31 23:59:59",
    );
    assert_complementary(
        "Opens",
        FilterKind::InRange,
        FilterKind::NotInRange,
        "09:00:00 to 17:30:00",
    );
}

#[test]
fn test_like_and_not_like_partition_rows() {
    assert_complementary("Title", FilterKind::Like, FilterKind::NotLike, "hello");
    assert_complementary("Title", FilterKind::Like, FilterKind::NotLike, "^hello");
}

#[test]
fn test_date_range_bounds_are_inclusive() {
    let set = filter_set();
    let ids = matching_ids(
        &set,
        index_of(&set, "Published", FilterKind::InRange),
        "2020-01-01 to 2020-01-31",
    );
    assert_eq!(ids, BTreeSet::from([1, 2, 3]));

    let ids = matching_ids(
        &set,
        index_of(&set, "Updated At", FilterKind::InRange),
        "2020-01-01 00:00:00 to 2020-01-31 23:59:59",
    );
    assert_eq!(ids, BTreeSet::from([1, 2, 3]));

    let ids = matching_ids(
        &set,
        index_of(&set, "Opens", FilterKind::NotInRange),
        "09:00:00 to 17:30:00",
    );
    assert_eq!(ids, BTreeSet::from([0, 4]));
}

#[test]
fn test_like_is_case_insensitive_substring() {
    let set = filter_set();
    let like = index_of(&set, "Title", FilterKind::Like);

    assert_eq!(matching_ids(&set, like, "HELLO"), BTreeSet::from([0, 1]));
    assert_eq!(matching_ids(&set, like, "E"), BTreeSet::from([0, 1, 3, 4]));
    // Wildcards typed by the user are literal
    assert_eq!(matching_ids(&set, like, "50%"), BTreeSet::from([2]));
    assert_eq!(matching_ids(&set, like, "=goodbye"), BTreeSet::from([3]));
}

#[test]
fn test_numeric_comparisons_are_strict() {
    let set = filter_set();
    let greater = index_of(&set, "Views", FilterKind::Greater);
    let smaller = index_of(&set, "Views", FilterKind::Smaller);

    assert_eq!(matching_ids(&set, greater, "99"), BTreeSet::from([1, 4]));
    assert_eq!(matching_ids(&set, smaller, "10"), BTreeSet::from([2]));
    assert_eq!(matching_ids(&set, greater, "9.5"), BTreeSet::from([0, 1, 3, 4]));
}

#[test]
fn test_filters_combine_with_and() {
    let set = filter_set();
    let featured = format!("flt1_{}", index_of(&set, "Featured", FilterKind::Equal));
    let status = format!("flt0_{}", index_of(&set, "Status", FilterKind::Equal));

    let parsed = set.parse_args([
        (featured.as_str(), "1"),
        ("page", "2"),
        (status.as_str(), "live"),
    ]);
    assert!(parsed.is_valid());
    assert_eq!(parsed.active.len(), 2);
    assert_eq!(parsed.active[0].position, 0);

    let query = set.apply(SelectQuery::new("posts"), &parsed.active).unwrap();
    assert_eq!(query.filter_records(&rows()).len(), 2);
    assert_eq!(
        query.to_sql().sql(),
        "SELECT * FROM \"posts\" WHERE (\"status\"::text = $1) AND (\"featured\" = $2)"
    );
}

#[test]
fn test_bad_input_is_reported_per_argument() {
    let set = filter_set();
    let views = format!("flt0_{}", index_of(&set, "Views", FilterKind::Equal));
    let range = format!("flt1_{}", index_of(&set, "Published", FilterKind::NotInRange));
    let status = format!("flt2_{}", index_of(&set, "Status", FilterKind::Equal));

    let parsed = set.parse_args([
        (views.as_str(), "lots"),
        (range.as_str(), "2020-01-01"),
        (status.as_str(), "archived"),
        ("flt3_99", "x"),
        ("flt_bad", "x"),
    ]);

    assert!(parsed.active.is_empty());
    let rejected: Vec<&str> = parsed.errors.iter().map(|error| error.arg.as_str()).collect();
    assert_eq!(
        rejected,
        vec![views.as_str(), range.as_str(), status.as_str(), "flt3_99", "flt_bad"]
    );
}

#[test]
fn test_rows_with_missing_values_match_neither_side() {
    let set = filter_set();
    let equal = set.get(index_of(&set, "Views", FilterKind::Equal)).unwrap();
    let not_equal = set.get(index_of(&set, "Views", FilterKind::NotEqual)).unwrap();
    let orphan = Record::new().with("title", "no views column");

    for filter in [equal, not_equal] {
        let query = filter
            .clean_and_apply(SelectQuery::new("posts"), "10")
            .unwrap();
        assert!(!query.matches(&orphan));
    }
}

#[test]
fn test_widget_groups_follow_column_order() {
    let set = FilterSet::build(&columns(), &FilterConverter::new());
    let groups = set.groups(&NULL_TRANSLATOR);

    let names: Vec<&str> = groups.iter().map(|group| group.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Title", "Views", "Published", "Featured", "Status", "Updated At", "Opens"]
    );

    let published = &groups[2];
    assert_eq!(published.operations.len(), 4);
    assert_eq!(published.operations[2].operation, "in range");
    assert_eq!(
        published.operations[2].data_type.as_deref(),
        Some("daterangepicker")
    );
    assert_eq!(
        groups[5].operations[3].data_type.as_deref(),
        Some("datetimerangepicker")
    );
    assert_eq!(groups[6].operations[0].data_type.as_deref(), Some("timepicker"));
}
