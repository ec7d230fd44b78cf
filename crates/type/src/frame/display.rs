// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use unicode_width::UnicodeWidthStr;

use super::Frame;

/// Width of the longest line of `s`.
fn display_width(s: &str) -> usize {
	if s.contains('\n') {
		s.lines().map(|line| line.width()).max().unwrap_or(0)
	} else {
		s.width()
	}
}

fn escape_control_chars(s: &str) -> String {
	s.replace('\n', "\\n").replace('\t', "\\t")
}

fn centered(s: &str, width: usize) -> String {
	let pad = width - display_width(s);
	let l = pad / 2;
	let r = pad - l;
	format!(" {:left$}{}{:right$} ", "", s, "", left = l, right = r)
}

impl Display for Frame {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let cells: Vec<Vec<String>> = self
			.rows
			.iter()
			.map(|row| row.iter().map(|v| escape_control_chars(&v.to_string())).collect())
			.collect();

		let mut col_widths: Vec<usize> = self.schema.iter().map(|c| display_width(&c.name)).collect();
		for row in &cells {
			for (idx, cell) in row.iter().enumerate() {
				col_widths[idx] = col_widths[idx].max(display_width(cell));
			}
		}

		let sep = format!("+{}+", col_widths.iter().map(|w| "-".repeat(*w + 2)).collect::<Vec<_>>().join("+"));
		writeln!(f, "{}", sep)?;

		let header: Vec<String> =
			self.schema.iter().zip(&col_widths).map(|(col, w)| centered(&col.name, *w)).collect();
		writeln!(f, "|{}|", header.join("|"))?;
		writeln!(f, "{}", sep)?;

		for row in &cells {
			let line: Vec<String> = row.iter().zip(&col_widths).map(|(cell, w)| centered(cell, *w)).collect();
			writeln!(f, "|{}|", line.join("|"))?;
		}

		writeln!(f, "{}", sep)
	}
}

#[cfg(test)]
mod tests {
	use crate::{ColumnDef, Frame, Row, Schema, Type, Value};

	#[test]
	fn test_render() {
		let frame = Frame::new(
			Schema::new(vec![ColumnDef::new("name", Type::Utf8), ColumnDef::new("age", Type::Int8)]),
			vec![
				Row::new(vec![Value::utf8("Ana"), Value::int8(30)]),
				Row::new(vec![Value::utf8("Bo"), Value::Undefined]),
			],
		)
		.unwrap();

		let expected = "\
+------+-----------+
| name |    age    |
+------+-----------+
| Ana  |    30     |
|  Bo  | undefined |
+------+-----------+
";
		assert_eq!(frame.to_string(), expected);
	}

	#[test]
	fn test_render_escapes_newlines() {
		let frame = Frame::new(
			Schema::new(vec![ColumnDef::new("note", Type::Utf8)]),
			vec![Row::new(vec![Value::utf8("a\nb")])],
		)
		.unwrap();
		assert!(frame.to_string().contains("a\\nb"));
	}
}
