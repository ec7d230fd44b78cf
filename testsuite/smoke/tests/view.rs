// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dbtable::{Aggregate, Error, Frame, Row, Type, Value, col, lit};
use dbtable_smoke::{counted_people_db, people_db};
use dbtable_testing::fixture::frame;
use rand::{SeedableRng, rngs::StdRng};

fn rows(frame: &Frame) -> Vec<Vec<Value>> {
	frame.iter().map(|row| row.to_vec()).collect()
}

fn row(values: &[Value]) -> Vec<Value> {
	values.to_vec()
}

#[test]
fn test_filter_sort_derive_scenario() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().filter(col("age").ge(25)).unwrap().sort("age", false).unwrap();
	let view = view.derive("decade", view.column("age").unwrap() / 10).unwrap();

	assert_eq!(
		rows(&view.frame().unwrap()),
		vec![
			row(&[Value::utf8("Ana"), Value::int8(30), Value::int8(3)]),
			row(&[Value::utf8("Cy"), Value::int8(30), Value::int8(3)]),
		]
	);
}

#[test]
fn test_group_count_scenario() {
	let db = people_db().unwrap();
	let grouped = db.table("people").unwrap().group(col("age")).unwrap();
	let counts = grouped.aggregate(&[Aggregate::count()]).unwrap();

	assert_eq!(counts.schema().names().collect::<Vec<_>>(), vec!["age", "count(*)"]);
	assert_eq!(
		rows(&counts),
		vec![row(&[Value::int8(20), Value::int8(1)]), row(&[Value::int8(30), Value::int8(2)])]
	);
}

#[test]
fn test_group_aggregates() {
	let db = people_db().unwrap();
	let by_age = db.table("people").unwrap().group(col("age")).unwrap();
	let result = by_age
		.aggregate(&[Aggregate::min("name"), Aggregate::max("name"), Aggregate::count_of("name")])
		.unwrap();

	assert_eq!(
		rows(&result),
		vec![
			row(&[Value::int8(20), Value::utf8("Bo"), Value::utf8("Bo"), Value::int8(1)]),
			row(&[Value::int8(30), Value::utf8("Ana"), Value::utf8("Cy"), Value::int8(2)]),
		]
	);
}

#[test]
fn test_ungrouped_aggregates() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap();
	let result = view.aggregate(&[Aggregate::sum("age"), Aggregate::avg("age"), Aggregate::count()]).unwrap();

	assert_eq!(result.schema()[1].ty, Type::Float8);
	let avg = result[0][1].as_f64().unwrap();
	assert!((avg - 80.0 / 3.0).abs() < 1e-9);
	assert_eq!(result[0][0], Value::int8(80));
	assert_eq!(result[0][2], Value::int8(3));
}

#[test]
fn test_having_after_group() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().group(col("age")).unwrap().filter(col("age").gt(25)).unwrap();
	assert_eq!(view.column_values("age").unwrap(), vec![Value::int8(30)]);
}

#[test]
fn test_materializes_once() {
	let (db, executed) = counted_people_db().unwrap();
	let view = db.table("people").unwrap().filter(col("age").gt(0)).unwrap();

	assert_eq!(view.len().unwrap(), 3);
	assert_eq!(view.rows().unwrap().count(), 3);
	assert_eq!(view.column_values("name").unwrap().len(), 3);
	assert_eq!(executed.get(), 1);

	let extended = view.take(1).unwrap();
	assert_eq!(extended.len().unwrap(), 1);
	assert_eq!(executed.get(), 2);
	assert_eq!(view.len().unwrap(), 3);
	assert_eq!(executed.get(), 2);
}

#[test]
fn test_append_leaves_original() {
	let db = people_db().unwrap();
	let base = db.table("people").unwrap().filter(col("age").ge(25)).unwrap();
	let before = base.frame().unwrap();

	let _narrowed = base.select(["name"]).unwrap().sort("name", true).unwrap();

	let fresh = db.table("people").unwrap().filter(col("age").ge(25)).unwrap();
	assert_eq!(*fresh.frame().unwrap(), *before);
	assert_eq!(base.chain().len(), 1);
}

#[test]
fn test_select_where_commute() {
	let db = people_db().unwrap();
	let people = db.table("people").unwrap();
	let predicate = col("age").ge(25) & col("name").ne("Cy");

	let a = people.select(["name", "age"]).unwrap().filter(predicate.clone()).unwrap();
	let b = people.filter(predicate).unwrap().select(["name", "age"]).unwrap();
	assert_eq!(a.frame().unwrap(), b.frame().unwrap());
}

#[test]
fn test_sorts_refine_not_replace() {
	let db = dbtable::memory().unwrap();
	let data = frame(
		&[("x", Type::Int8), ("y", Type::Int8)],
		vec![
			vec![Value::int8(2), Value::int8(1)],
			vec![Value::int8(1), Value::int8(2)],
			vec![Value::int8(1), Value::int8(1)],
			vec![Value::int8(2), Value::int8(0)],
		],
	)
	.unwrap();
	let view = db.create_table("points", &data).unwrap();

	let sorted = view.sort("x", false).unwrap().sort("y", false).unwrap();
	assert_eq!(
		rows(&sorted.frame().unwrap()),
		vec![
			row(&[Value::int8(1), Value::int8(1)]),
			row(&[Value::int8(1), Value::int8(2)]),
			row(&[Value::int8(2), Value::int8(0)]),
			row(&[Value::int8(2), Value::int8(1)]),
		]
	);
}

#[test]
fn test_sort_ties_keep_table_order() {
	let db = people_db().unwrap();
	let sorted = db.table("people").unwrap().sort("age", true).unwrap();
	assert_eq!(
		sorted.column_values("name").unwrap(),
		vec![Value::utf8("Ana"), Value::utf8("Cy"), Value::utf8("Bo")]
	);
}

#[test]
fn test_filter_after_take_reads_taken_rows() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().take(2).unwrap().filter(col("age").ge(25)).unwrap();
	assert_eq!(view.column_values("name").unwrap(), vec![Value::utf8("Ana")]);
}

#[test]
fn test_sort_after_take_reorders_taken_rows() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().take(2).unwrap().sort("name", true).unwrap();
	assert_eq!(view.column_values("name").unwrap(), vec![Value::utf8("Bo"), Value::utf8("Ana")]);
}

#[test]
fn test_group_after_take_counts_taken_rows() {
	let db = people_db().unwrap();
	let counts = db.table("people").unwrap().take(2).unwrap().group(col("age")).unwrap();
	let counts = counts.aggregate(&[Aggregate::count()]).unwrap();

	assert_eq!(
		rows(&counts),
		vec![row(&[Value::int8(20), Value::int8(1)]), row(&[Value::int8(30), Value::int8(1)])]
	);
}

#[test]
fn test_take_then_filter_then_take() {
	let db = people_db().unwrap();
	let view =
		db.table("people").unwrap().take(3).unwrap().filter(col("age").eq(30)).unwrap().take(1).unwrap();
	assert_eq!(view.column_values("name").unwrap(), vec![Value::utf8("Ana")]);
}

#[test]
fn test_sort_survives_rederive() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().sort("age", false).unwrap();
	let view = view.derive("age", view.column("age").unwrap() * -1).unwrap();

	assert_eq!(
		view.column_values("name").unwrap(),
		vec![Value::utf8("Bo"), Value::utf8("Ana"), Value::utf8("Cy")]
	);
	assert_eq!(view.column_values("age").unwrap(), vec![Value::int8(-20), Value::int8(-30), Value::int8(-30)]);
}

#[test]
fn test_derive_filter_select() {
	let db = people_db().unwrap();
	let view = db
		.table("people")
		.unwrap()
		.derive("double", col("age") * 2)
		.unwrap()
		.filter(col("double").gt(50))
		.unwrap()
		.select(["double"])
		.unwrap();

	assert_eq!(view.column_values("double").unwrap(), vec![Value::int8(60), Value::int8(60)]);
}

#[test]
fn test_filter_on_removed_column() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().select(["name"]).unwrap().filter(col("age").gt(1)).unwrap();
	assert!(matches!(view.len().unwrap_err(), Error::UnknownColumn { .. }));
}

#[test]
fn test_rebinding_scales_derived_column() {
	let db = people_db().unwrap();
	let original = db.table("people").unwrap().derive("half", col("age") / 2.0).unwrap();

	let mut view = original.clone();
	view = view.derive("half", view.column("half").unwrap() * 2).unwrap();

	assert_eq!(original.column_values("half").unwrap()[1], Value::float8(10.0));
	assert_eq!(view.column_values("half").unwrap()[1], Value::float8(20.0));
}

#[test]
fn test_type_mismatch_at_materialize() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().derive("bad", col("name") - 1).unwrap();
	assert!(matches!(view.frame().unwrap_err(), Error::TypeMismatch { .. }));
}

#[test]
fn test_text_concat() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().derive("greeting", lit("hello ") + col("name")).unwrap();
	assert_eq!(view.row(0).unwrap().unwrap()[2], Value::utf8("hello Ana"));
}

#[test]
fn test_drop_columns() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap().drop(["age"]).unwrap();
	assert_eq!(view.columns().unwrap().names().collect::<Vec<_>>(), vec!["name"]);
	assert_eq!(view.row(2).unwrap(), Some(Row::new(vec![Value::utf8("Cy")])));
}

#[test]
fn test_sample() {
	let db = people_db().unwrap();
	let view = db.table("people").unwrap();
	let mut rng = StdRng::seed_from_u64(42);

	let picked = view.sample_with(2, &mut rng).unwrap();
	assert_eq!(picked.len(), 2);
	assert_ne!(picked[0], picked[1]);
	assert_eq!(view.sample(5).unwrap().len(), 3);
}

#[test]
fn test_preview() {
	let db = people_db().unwrap();
	let preview = db.table("people").unwrap().preview(2).unwrap();
	let expected = "\
Table people: showing 2 of 3 rows
+------+-----+
| name | age |
+------+-----+
| Ana  | 30  |
|  Bo  | 20  |
+------+-----+
";
	assert_eq!(preview, expected);
}

#[test]
fn test_same_source() {
	let db = people_db().unwrap();
	let a = db.table("people").unwrap();
	let b = a.filter(col("age").gt(1)).unwrap();
	assert!(a.same_source(&b));
}

#[test]
fn test_unknown_table() {
	let db = people_db().unwrap();
	assert!(matches!(db.table("ghosts").unwrap_err(), Error::UnknownTable { .. }));
}
