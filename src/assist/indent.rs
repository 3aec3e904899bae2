//! Indentation rules.
use super::{
	completed_object, deleting_tail, in_string, just_completed, new_object_form, text_before, Flow,
};
use crate::changeset::Changeset;
use crate::node::is_whitespace;

fn after_whitespace(changeset: &Changeset) -> bool {
	changeset.last_char().is_some_and(is_whitespace)
}

/// Whitespace after the subject starts the predicate list on a new line.
pub fn indent_after_subject(changeset: &mut Changeset) -> Flow {
	match changeset.next_char() {
		Some(c)
			if is_whitespace(c)
				&& !after_whitespace(changeset)
				&& !deleting_tail(changeset, "")
				&& just_completed(changeset.parser(), "subject") =>
		{
			changeset.replace_char("\n  ");
			Flow::Handled
		}
		_ => Flow::Pass,
	}
}

/// Whitespace after a verb is a single space.
pub fn space_after_verb(changeset: &mut Changeset) -> Flow {
	match changeset.next_char() {
		Some(c)
			if is_whitespace(c)
				&& !after_whitespace(changeset)
				&& !deleting_tail(changeset, "")
				&& just_completed(changeset.parser(), "verb") =>
		{
			changeset.replace_char(" ");
			Flow::Handled
		}
		_ => Flow::Pass,
	}
}

/// A semicolon after an object is followed by the indentation of the next
/// predicate.
pub fn indent_after_semicolon(changeset: &mut Changeset) -> Flow {
	if changeset.next_char() != Some(';')
		|| deleting_tail(changeset, ".,;")
		|| in_string(changeset.parser())
		|| completed_object(changeset.parser()).is_none()
	{
		return Flow::Pass;
	}

	changeset.add("\n  ");
	Flow::Handled
}

/// A comma after an object is followed by the indentation of the next object.
///
/// The first comma of a list also moves the first object to its own line.
pub fn indent_after_comma(changeset: &mut Changeset) -> Flow {
	if changeset.next_char() != Some(',')
		|| deleting_tail(changeset, ".,;")
		|| in_string(changeset.parser())
	{
		return Flow::Pass;
	}

	let first = match completed_object(changeset.parser()) {
		Some(object) if object.path().ends_with("objectList.object") => Some(new_object_form(
			text_before(changeset.parser(), &object),
			object.text(),
		)),
		Some(_) => None,
		None => return Flow::Pass,
	};

	match first {
		Some(replacement) => changeset.replace_from_start(&replacement, false),
		None => changeset.add("\n    "),
	}

	Flow::Handled
}

/// A dot ending the statement is followed by a newline.
pub fn newline_after_dot(changeset: &mut Changeset) -> Flow {
	if changeset.next_char() != Some('.') {
		return Flow::Pass;
	}

	let mut lookahead = changeset.parser().clone();
	if !lookahead.push('.') || !lookahead.is_satisfied() {
		return Flow::Pass;
	}

	changeset.push_next();
	changeset.insert("\n");
	Flow::Handled
}

/// Whether whitespace separates a completed object from a `;` or `,` still
/// to come.
fn before_list_separator(changeset: &Changeset) -> bool {
	let next = changeset
		.remainder()
		.chars()
		.find(|c| !is_whitespace(*c));
	matches!(next, Some(';' | ','))
		&& !changeset.parser().in_comment()
		&& completed_object(changeset.parser()).is_some()
}

/// Drops whitespace that would start a statement, follow other whitespace or
/// come between an object and the separator following it.
pub fn drop_redundant_whitespace(changeset: &mut Changeset) -> Flow {
	match changeset.next_char() {
		Some(c)
			if is_whitespace(c)
				&& (changeset.parser().is_empty()
					|| after_whitespace(changeset)
					|| before_list_separator(changeset))
				&& !in_string(changeset.parser())
				&& !changeset.parser().in_comment() =>
		{
			changeset.skip_char();
			Flow::Handled
		}
		_ => Flow::Pass,
	}
}
