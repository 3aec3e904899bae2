//! Shortcut rules.
//!
//! Typing whitespace right after an object or a directive finishes the
//! statement, opens a new object or a new predicate. Deleting back into the
//! text such a shortcut produced undoes it.
use super::{
	accepting_object, completed_object, in_string, just_completed, new_object_form, outside_scopes,
	single, text_before, Flow,
};
use crate::changeset::Changeset;
use crate::node::{is_whitespace, Parser};
use regex::Regex;
use std::sync::LazyLock;

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\n *$").unwrap());
static END_OF_STATEMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s.]+$").unwrap());
static NEW_PREDICATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s;]+$").unwrap());
static NEW_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s,]+$").unwrap());

/// The newest character of an insertion, alone in the remainder.
fn typed(changeset: &Changeset) -> Option<char> {
	if changeset.is_inserting() {
		single(changeset)
	} else {
		None
	}
}

/// Whether a deletion left only text matching `pattern` to parse.
fn deleted_into(changeset: &Changeset, pattern: &Regex) -> bool {
	!changeset.is_inserting() && pattern.is_match(changeset.remainder())
}

/// Newline after an object finishes the statement.
pub fn finish_statement_with_newline(changeset: &mut Changeset) -> Flow {
	let Some(c) = typed(changeset) else {
		return Flow::Pass;
	};

	if in_string(changeset.parser()) {
		return Flow::Pass;
	}

	let dotted = changeset.last_char() == Some('.');
	if dotted && is_whitespace(c) && accepting_object(changeset.parser()).is_some() {
		// The dot was read as part of the object.
		let text = changeset.parser().text();
		let replacement = format!("{} .\n", &text[..text.len() - 1]);
		changeset.replace_from_start(&replacement, true);
		Flow::Handled
	} else if c == '\n' && completed_object(changeset.parser()).is_some() {
		changeset.replace_char(" .\n");
		Flow::Handled
	} else {
		Flow::Pass
	}
}

/// Space after an object opens a new object in the list.
pub fn space_once_for_new_object(changeset: &mut Changeset) -> Flow {
	match typed(changeset) {
		Some(c) if is_whitespace(c) || c == ',' => (),
		_ => return Flow::Pass,
	}

	if in_string(changeset.parser()) {
		return Flow::Pass;
	}

	let first = match completed_object(changeset.parser()) {
		Some(object) if object.path().ends_with("sequence.object") => None,
		Some(object) => Some(new_object_form(
			text_before(changeset.parser(), &object),
			object.text(),
		)),
		None => return Flow::Pass,
	};

	match first {
		Some(replacement) => changeset.replace_from_start(&replacement, true),
		None => changeset.replace_char(",\n    "),
	}

	Flow::Handled
}

/// Objects of the list being typed.
fn listed_objects(parser: &Parser) -> Vec<String> {
	let lists = parser.collect(|n, path| {
		n.name() == "objectList" && n.is_accepting() && outside_scopes(path)
	});

	match lists.last() {
		Some(list) => list
			.collect(|n, path| n.name() == "object" && !n.is_empty() && path.names().len() <= 4)
			.iter()
			.map(|o| o.text().to_owned())
			.collect(),
		None => Vec::new(),
	}
}

/// Whether an empty object was opened after the last listed one.
fn new_object_open(parser: &Parser) -> bool {
	!parser
		.collect(|n, path| {
			n.name() == "object"
				&& n.is_accepting()
				&& n.is_empty()
				&& path.ends_with("objectList.zeroOrMore.sequence.object")
				&& outside_scopes(path)
		})
		.is_empty()
}

/// Closes the empty new object, ending the list with `separator`.
fn close_object_list(changeset: &mut Changeset, separator: &str) -> Flow {
	let parser = changeset.parser();
	if !new_object_open(parser) || in_string(parser) {
		return Flow::Pass;
	}

	let text = parser.text();
	let replacement = match listed_objects(parser).as_slice() {
		[object] => {
			// Back to `verb object` on a single line.
			let listed = text.trim_end().trim_end_matches(',');
			match listed.strip_suffix(object.as_str()) {
				Some(before) => format!("{} {object}{separator}", before.trim_end()),
				None => return Flow::Pass,
			}
		}
		[] => return Flow::Pass,
		_ => TRAILING_COMMA.replace(text, separator).into_owned(),
	};

	changeset.replace_from_start(&replacement, true);
	Flow::Handled
}

/// Space on an empty new object turns it into a new predicate.
pub fn space_twice_for_new_predicate(changeset: &mut Changeset) -> Flow {
	match typed(changeset) {
		Some(c) if is_whitespace(c) || c == ';' => close_object_list(changeset, ";\n  "),
		_ => Flow::Pass,
	}
}

/// A dot on an empty new object finishes the statement.
pub fn dot_after_new_object(changeset: &mut Changeset) -> Flow {
	match typed(changeset) {
		Some('.') => close_object_list(changeset, " .\n"),
		_ => Flow::Pass,
	}
}

/// Whitespace after the IRI of a directive finishes it.
pub fn finish_directive_with_whitespace(changeset: &mut Changeset) -> Flow {
	match typed(changeset) {
		Some(c)
			if is_whitespace(c)
				&& just_completed(changeset.parser(), "IRIREF")
				&& changeset.parser().some_accepting("directive") =>
		{
			changeset.replace_char(" .\n");
			Flow::Handled
		}
		_ => Flow::Pass,
	}
}

/// Deleting the end of a statement leaves its last object open.
pub fn backspace_to_delete_end_of_statement(changeset: &mut Changeset) -> Flow {
	if deleted_into(changeset, &END_OF_STATEMENT) && accepting_object(changeset.parser()).is_some() {
		let text = changeset.parser().text().to_owned();
		changeset.replace_from_start(&text, true);
		Flow::Handled
	} else {
		Flow::Pass
	}
}

/// Deleting into a new predicate goes back to a new object.
pub fn backspace_to_move_back_from_new_predicate(changeset: &mut Changeset) -> Flow {
	if !deleted_into(changeset, &NEW_PREDICATE) {
		return Flow::Pass;
	}

	let replacement = match accepting_object(changeset.parser()) {
		Some(object) => new_object_form(text_before(changeset.parser(), &object), object.text()),
		None => return Flow::Pass,
	};

	changeset.replace_from_start(&replacement, true);
	Flow::Handled
}

/// Deleting into a new object goes back to the last object.
pub fn backspace_to_move_back_from_new_object(changeset: &mut Changeset) -> Flow {
	if deleted_into(changeset, &NEW_OBJECT) && accepting_object(changeset.parser()).is_some() {
		let text = changeset.parser().text().to_owned();
		changeset.replace_from_start(&text, true);
		Flow::Handled
	} else {
		Flow::Pass
	}
}

/// Deleting the end of a directive leaves it open.
pub fn backspace_to_delete_end_of_directive(changeset: &mut Changeset) -> Flow {
	if deleted_into(changeset, &END_OF_STATEMENT) && changeset.parser().some_accepting("directive") {
		let text = changeset.parser().text().to_owned();
		changeset.replace_from_start(&text, true);
		Flow::Handled
	} else {
		Flow::Pass
	}
}

#[cfg(test)]
mod tests {
	use super::super::tests::{parser, typed};
	use super::*;
	use pretty_assertions::assert_eq;

	fn deleted(before: &str, wanted: &str) -> Changeset {
		let mut changeset =
			Changeset::new(&parser(""), before.to_owned(), wanted.to_owned(), 0, false);
		assert!(changeset.parse_all_input(super::super::pipeline()));
		changeset
	}

	#[test]
	fn finish_statement_with_space() {
		let c = typed(":me\n  :do :good", "\n");
		assert_eq!(c.statements().len(), 1);
		assert_eq!(c.statements()[0].text(), ":me\n  :do :good .");
		assert_eq!(c.change(), "");
	}

	#[test]
	fn finish_statement_after_glued_dot() {
		let c = typed(":me\n  :do :good.", "\n");
		assert_eq!(c.statements()[0].text(), ":me\n  :do :good .");
	}

	#[test]
	fn newline_inside_a_collection() {
		let c = typed(":me\n  :do ( :a", "\n");
		assert!(c.statements().is_empty());
		assert_eq!(c.change(), ":me\n  :do ( :a\n");
	}

	#[test]
	fn space_once() {
		let c = typed(":me\n  :like :apples", " ");
		assert_eq!(c.change(), ":me\n  :like\n    :apples,\n    ");

		let c = typed(":me\n  :like\n    :apples,\n    :pears", " ");
		assert_eq!(c.change(), ":me\n  :like\n    :apples,\n    :pears,\n    ");

		let c = typed(":me\n  :like [ :a :b ]", " ");
		assert_eq!(c.change(), ":me\n  :like\n    [ :a :b ],\n    ");
	}

	#[test]
	fn space_twice() {
		let c = typed(":me\n  :like\n    :apples,\n    ", " ");
		assert_eq!(c.change(), ":me\n  :like :apples;\n  ");

		let c = typed(":me\n  :like\n    :apples,\n    :pears,\n    ", " ");
		assert_eq!(c.change(), ":me\n  :like\n    :apples,\n    :pears;\n  ");

		let c = typed(":me\n  :like\n    \"red apples\",\n    ", ";");
		assert_eq!(c.change(), ":me\n  :like \"red apples\";\n  ");
	}

	#[test]
	fn dot_on_a_new_object() {
		let c = typed(":me\n  :like\n    :apples,\n    ", ".");
		assert_eq!(c.statements()[0].text(), ":me\n  :like :apples .");
		assert_eq!(c.change(), "");

		let c = typed(":me\n  :like\n    :apples,\n    :pears,\n    ", ".");
		assert_eq!(
			c.statements()[0].text(),
			":me\n  :like\n    :apples,\n    :pears ."
		);
	}

	#[test]
	fn finish_directive() {
		let c = typed("@prefix : <http://a/>", " ");
		assert_eq!(c.statements()[0].text(), "@prefix : <http://a/> .");
		assert_eq!(c.parser().session().prefix(""), Some("http://a/"));
	}

	#[test]
	fn pasted_text_is_left_alone() {
		let c = typed("", ":me :like :apples  ");
		assert_eq!(c.change(), ":me\n  :like :apples ");
		assert!(c.statements().is_empty());
	}

	#[test]
	fn backspace_shortcuts() {
		let c = deleted(":s\n  :p :o .\n", ":s\n  :p :o .");
		assert_eq!(c.change(), ":s\n  :p :o");

		let c = deleted(":s\n  :p :o;\n  ", ":s\n  :p :o;\n ");
		assert_eq!(c.change(), ":s\n  :p\n    :o,\n    ");

		let c = deleted(":s\n  :p\n    :o,\n    ", ":s\n  :p\n    :o,\n   ");
		assert_eq!(c.change(), ":s\n  :p :o");

		let c = deleted("@prefix : <> .\n", "@prefix : <> .");
		assert_eq!(c.change(), "@prefix : <>");
		assert!(c.statements().is_empty());
	}
}
