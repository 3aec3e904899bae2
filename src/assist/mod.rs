//! As-you-type editing assistance.
//!
//! Assist rules are consulted, in order, before each character of a
//! [`Changeset`] is parsed. A rule either rewrites the pending text itself and
//! returns [`Flow::Handled`], or returns [`Flow::Pass`] to let the next rule
//! have a look. When no rule handles a character it is parsed as typed.
//!
//! Indentation rules run on every character. Shortcut rules only fire on the
//! newest character of an insertion, or on the synthetic tail left by a
//! deletion, so pasted text is never rewritten by them.
use crate::changeset::Changeset;
use crate::node::{is_whitespace, Found, Parser, Path};

mod indent;
mod shortcut;

pub use indent::*;
pub use shortcut::*;

/// Outcome of an assist rule.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
	/// The next character was consumed by the rule.
	Handled,

	/// The next rule should be consulted.
	Pass,
}

pub type Rule = fn(&mut Changeset) -> Flow;

const PIPELINE: &[Rule] = &[
	indent_after_subject,
	space_after_verb,
	indent_after_semicolon,
	indent_after_comma,
	newline_after_dot,
	finish_statement_with_newline,
	space_once_for_new_object,
	space_twice_for_new_predicate,
	dot_after_new_object,
	finish_directive_with_whitespace,
	backspace_to_delete_end_of_statement,
	backspace_to_move_back_from_new_predicate,
	backspace_to_move_back_from_new_object,
	backspace_to_delete_end_of_directive,
	drop_redundant_whitespace,
];

/// Default rules, in order of priority.
pub fn pipeline() -> &'static [Rule] {
	PIPELINE
}

fn outside_scopes(path: Path) -> bool {
	!path.has_parent("blankNodePropertyList") && !path.has_parent("collection")
}

/// Non-empty, accepting objects of the top level triples.
fn objects(parser: &Parser) -> Vec<Found<'_>> {
	parser.collect(|n, path| {
		n.name() == "object" && n.is_accepting() && !n.is_empty() && outside_scopes(path)
	})
}

/// The object that was just typed, complete or not.
fn accepting_object(parser: &Parser) -> Option<Found<'_>> {
	objects(parser).into_iter().next()
}

/// The object that was just completed.
fn completed_object(parser: &Parser) -> Option<Found<'_>> {
	objects(parser).into_iter().find(|o| o.is_satisfied())
}

/// Whether a node named `name` was just completed.
fn just_completed(parser: &Parser, name: &str) -> bool {
	parser
		.root()
		.any(&|n| n.name() == name && n.is_accepting() && !n.is_empty() && n.is_satisfied())
}

fn in_string(parser: &Parser) -> bool {
	parser
		.root()
		.any(&|n| n.name() == "String" && n.is_accepting() && !n.is_empty() && !n.is_satisfied())
}

/// The next character, if it is the last one pending.
fn single(changeset: &Changeset) -> Option<char> {
	let mut chars = changeset.remainder().chars();
	match (chars.next(), chars.next()) {
		(Some(c), None) => Some(c),
		_ => None,
	}
}

/// Whether a deletion left nothing but whitespace and `punctuation` to parse.
fn deleting_tail(changeset: &Changeset, punctuation: &str) -> bool {
	!changeset.is_inserting()
		&& changeset
			.remainder()
			.chars()
			.all(|c| is_whitespace(c) || punctuation.contains(c))
}

/// Text parsed so far, up to `node` which ends it, without trailing whitespace.
fn text_before<'p>(parser: &'p Parser, node: &Found) -> &'p str {
	let text = parser.text();
	text[..text.len().saturating_sub(node.text().len())].trim_end()
}

/// `text` with `object` on a line of its own, ready for a new object.
fn new_object_form(before: &str, object: &str) -> String {
	format!("{before}\n    {object},\n    ")
}
