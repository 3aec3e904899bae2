//! Editing sessions.
//!
//! An [`Assistant`] listens to the edits of a [`TextHost`] and keeps the
//! document formatted as it is typed. Edits that cannot lead to a valid
//! document are undone.
use crate::assist;
use crate::changeset::{Changeset, EditDelta, Position, Range, Statement};
use crate::error::Error;
use crate::node::Parser;
use crate::session::Session;
use crate::term::Triple;
use crate::turtle;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Text editor driven by an [`Assistant`].
pub trait TextHost {
	fn current_value(&self) -> String;

	fn cursor_position(&self) -> Position;

	/// Replaces the text in `range` with `text`.
	fn apply_replacement(&mut self, range: Range, text: &str);

	/// Reverts the last edit reported to the assistant.
	fn undo_last_edit(&mut self);
}

/// Byte offset of `position` in `text`, if it is inside the text.
fn offset(text: &str, position: Position) -> Option<usize> {
	let mut start = 0;
	for _ in 0..position.row {
		start += text[start..].find('\n')? + 1;
	}

	let line = &text[start..];
	let line = &line[..line.find('\n').unwrap_or(line.len())];
	if position.column == line.chars().count() {
		Some(start + line.len())
	} else {
		line.char_indices().nth(position.column).map(|(i, _)| start + i)
	}
}

/// In-memory text host.
#[derive(Clone, Default, Debug)]
pub struct TextBuffer {
	text: String,
	cursor: Position,
	undo: Option<(String, Position)>,
}

impl TextBuffer {
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		Self {
			cursor: Position::default().after(&text),
			text,
			undo: None,
		}
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	/// Position right after the last character.
	pub fn end(&self) -> Position {
		Position::default().after(&self.text)
	}

	pub fn set_cursor(&mut self, position: Position) {
		self.cursor = position
	}

	fn checked_offset(&self, position: Position) -> Result<usize, Error> {
		offset(&self.text, position).ok_or(Error::Position {
			row: position.row,
			column: position.column,
		})
	}

	/// Inserts `text` at `at`, moving the cursor after it.
	pub fn insert(&mut self, at: Position, text: &str) -> Result<EditDelta, Error> {
		let i = self.checked_offset(at)?;
		self.undo = Some((self.text.clone(), self.cursor));
		self.text.insert_str(i, text);
		self.cursor = at.after(text);
		Ok(EditDelta::insert(at, text))
	}

	/// Inserts `text` at the cursor.
	pub fn type_str(&mut self, text: &str) -> Result<EditDelta, Error> {
		self.insert(self.cursor, text)
	}

	/// Removes the text in `range`, moving the cursor to its start.
	pub fn remove(&mut self, range: Range) -> Result<EditDelta, Error> {
		let start = self.checked_offset(range.start)?;
		let end = self.checked_offset(range.end)?.max(start);
		let removed = self.text[start..end].to_owned();
		self.undo = Some((self.text.clone(), self.cursor));
		self.text.replace_range(start..end, "");
		self.cursor = range.start;
		Ok(EditDelta::remove(range, &removed))
	}

	/// Removes the character before the cursor, if any.
	pub fn backspace(&mut self) -> Result<Option<EditDelta>, Error> {
		let end = self.cursor;
		let start = if end.column > 0 {
			Position::new(end.row, end.column - 1)
		} else if end.row > 0 {
			let previous = self.text.split('\n').nth(end.row - 1).unwrap_or("");
			Position::new(end.row - 1, previous.chars().count())
		} else {
			return Ok(None);
		};

		self.remove(Range::new(start, end)).map(Some)
	}
}

impl TextHost for TextBuffer {
	fn current_value(&self) -> String {
		self.text.clone()
	}

	fn cursor_position(&self) -> Position {
		self.cursor
	}

	fn apply_replacement(&mut self, range: Range, text: &str) {
		let start = offset(&self.text, range.start).unwrap_or(self.text.len());
		let end = offset(&self.text, range.end)
			.unwrap_or(self.text.len())
			.max(start);
		self.text.replace_range(start..end, text);
		self.cursor = range.start.after(text);
		self.undo = None
	}

	fn undo_last_edit(&mut self) {
		if let Some((text, cursor)) = self.undo.take() {
			self.text = text;
			self.cursor = cursor
		}
	}
}

#[derive(Clone, Default, Debug)]
pub struct AssistantConfig {
	/// Base IRI of the document, until a `@base` directive says otherwise.
	pub base: Option<String>,
}

/// Result of one edit.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
	/// The edit was kept, possibly rewritten.
	Accepted {
		/// Triples that appeared in the committed statements.
		added: BTreeSet<Triple>,

		/// Triples that disappeared from the committed statements.
		removed: BTreeSet<Triple>,

		/// Where the cursor should go.
		cursor: Option<Position>,
	},

	/// The edit was undone.
	Rejected,
}

impl Outcome {
	pub fn is_accepted(&self) -> bool {
		matches!(self, Self::Accepted { .. })
	}
}

/// Editing assistant.
///
/// The document is kept as a list of completed statements, one per line
/// range, followed by the text of the statement being typed.
pub struct Assistant {
	config: AssistantConfig,
	statements: Vec<Statement>,
	parser: Parser,
}

impl Assistant {
	pub fn new(config: AssistantConfig) -> Result<Self, Error> {
		let grammar = Rc::new(turtle::grammar()?);
		let parser = Parser::new(grammar, Session::new(config.base.clone()));
		Ok(Self {
			config,
			statements: Vec::new(),
			parser,
		})
	}

	pub fn statements(&self) -> &[Statement] {
		&self.statements
	}

	/// Parser of the statement being typed.
	pub fn parser(&self) -> &Parser {
		&self.parser
	}

	/// Triples of every completed statement.
	pub fn triples(&self) -> impl Iterator<Item = &Triple> {
		self.statements.iter().flat_map(Statement::triples)
	}

	/// Handles an edit already applied to `host`.
	pub fn on_change(
		&mut self,
		host: &mut impl TextHost,
		delta: &EditDelta,
	) -> Result<Outcome, Error> {
		let initial = Session::new(self.config.base.clone());
		let mut changeset = Changeset::from_delta(&self.statements, &self.parser, &initial, delta)?;
		if !changeset.parse_all_input(assist::pipeline()) {
			log::debug!("edit rejected");
			host.undo_last_edit();
			return Ok(Outcome::Rejected);
		}

		let replacement = changeset.replacement();
		let cursor = if replacement != changeset.wanted() {
			host.undo_last_edit();
			host.apply_replacement(changeset.range(), &replacement);
			changeset.cursor_position()
		} else {
			Some(host.cursor_position())
		};

		let before: BTreeSet<Triple> = self.triples().cloned().collect();
		let start_row = changeset.start_row();
		let (statements, parser) = changeset.into_parts();
		self.statements.retain(|s| s.end_row() < start_row);
		self.statements.extend(statements);
		self.parser = parser;
		let after: BTreeSet<Triple> = self.triples().cloned().collect();

		Ok(Outcome::Accepted {
			added: after.difference(&before).cloned().collect(),
			removed: before.difference(&after).cloned().collect(),
			cursor,
		})
	}

	/// Starts over from `text`, returning its formatted form.
	///
	/// Returns `None`, keeping the current state, if `text` is rejected.
	pub fn load(&mut self, text: &str) -> Result<Option<String>, Error> {
		let initial = Session::new(self.config.base.clone());
		let parser = Parser::new(self.parser.grammar().clone(), initial.clone());

		let delta = EditDelta::insert(Position::default(), text);
		let mut changeset = Changeset::from_delta(&[], &parser, &initial, &delta)?;
		if !changeset.parse_all_input(assist::pipeline()) {
			log::debug!("document rejected");
			return Ok(None);
		}

		let formatted = changeset.replacement();
		let (statements, parser) = changeset.into_parts();
		self.statements = statements;
		self.parser = parser;
		Ok(Some(formatted))
	}

	/// Re-derives everything from the content of `host`, formatting it.
	///
	/// Returns whether the content was accepted.
	pub fn resync(&mut self, host: &mut impl TextHost) -> Result<bool, Error> {
		let text = host.current_value();
		match self.load(&text)? {
			Some(formatted) => {
				if formatted != text {
					let whole = Range::new(Position::default(), Position::default().after(&text));
					host.apply_replacement(whole, &formatted)
				}
				Ok(true)
			}
			None => Ok(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::term::to_ntriples;
	use pretty_assertions::assert_eq;

	fn assistant() -> Assistant {
		Assistant::new(AssistantConfig::default()).unwrap()
	}

	/// Types `input` one character at a time.
	fn type_chars(assistant: &mut Assistant, buffer: &mut TextBuffer, input: &str) -> Vec<Outcome> {
		let mut outcomes = Vec::new();
		for c in input.chars() {
			let delta = buffer.type_str(&c.to_string()).unwrap();
			let outcome = assistant.on_change(buffer, &delta).unwrap();
			if let Outcome::Accepted {
				cursor: Some(cursor),
				..
			} = &outcome
			{
				buffer.set_cursor(*cursor)
			}
			outcomes.push(outcome);
		}

		outcomes
	}

	#[test]
	fn offsets() {
		let text = "ab\ncé\n";
		assert_eq!(offset(text, Position::new(0, 2)), Some(2));
		assert_eq!(offset(text, Position::new(1, 2)), Some(6));
		assert_eq!(offset(text, Position::new(2, 0)), Some(7));
		assert_eq!(offset(text, Position::new(1, 3)), None);
		assert_eq!(offset(text, Position::new(3, 0)), None);
	}

	#[test]
	fn buffer_edits() {
		let mut buffer = TextBuffer::new("ab\ncd");
		let delta = buffer.insert(Position::new(1, 1), "x\ny").unwrap();
		assert_eq!(buffer.text(), "ab\ncx\nyd");
		assert_eq!(delta.end, Position::new(2, 1));
		assert_eq!(buffer.cursor_position(), Position::new(2, 1));

		buffer.undo_last_edit();
		assert_eq!(buffer.text(), "ab\ncd");

		let delta = buffer
			.remove(Range::new(Position::new(0, 1), Position::new(1, 1)))
			.unwrap();
		assert_eq!(buffer.text(), "ad");
		assert_eq!(delta.text(), "b\nc");

		buffer.set_cursor(Position::new(0, 1));
		let delta = buffer.backspace().unwrap().unwrap();
		assert_eq!(delta.text(), "a");
		assert_eq!(buffer.text(), "d");
		assert!(buffer.backspace().unwrap().is_none());

		assert!(buffer.insert(Position::new(4, 0), "x").is_err());
	}

	#[test]
	fn typing_is_formatted() {
		let mut assistant = assistant();
		let mut buffer = TextBuffer::default();
		type_chars(&mut assistant, &mut buffer, ":s :p :o\n");
		assert_eq!(buffer.text(), ":s\n  :p :o .\n");
		assert_eq!(assistant.statements().len(), 1);
		assert_eq!(assistant.parser().text(), "");
		assert_eq!(buffer.cursor_position(), Position::new(2, 0));
	}

	#[test]
	fn rejected_edits_are_undone() {
		let mut assistant = assistant();
		let mut buffer = TextBuffer::default();
		let outcomes = type_chars(&mut assistant, &mut buffer, ":s }");
		assert_eq!(outcomes.last(), Some(&Outcome::Rejected));
		assert_eq!(buffer.text(), ":s\n  ");
		assert_eq!(assistant.parser().text(), ":s\n  ");
	}

	#[test]
	fn triples_are_reported() {
		let mut assistant = assistant();
		let mut buffer = TextBuffer::default();
		// The space after the IRI finishes the directive.
		let outcomes = type_chars(
			&mut assistant,
			&mut buffer,
			"@prefix : <http://a/> :s :p :o\n",
		);
		let added: Vec<_> = outcomes
			.iter()
			.filter_map(|o| match o {
				Outcome::Accepted { added, .. } => Some(added.iter().map(to_ntriples)),
				Outcome::Rejected => None,
			})
			.flatten()
			.collect();
		assert_eq!(added, ["<http://a/s> <http://a/p> <http://a/o> ."]);
		assert_eq!(assistant.triples().count(), 1);

		let end = buffer.end();
		let delta = buffer
			.remove(Range::new(Position::new(end.row - 1, 8), end))
			.unwrap();
		let outcome = assistant.on_change(&mut buffer, &delta).unwrap();
		match outcome {
			Outcome::Accepted { added, removed, .. } => {
				assert!(added.is_empty());
				assert_eq!(removed.len(), 1);
			}
			Outcome::Rejected => panic!("deletion rejected"),
		}
		assert_eq!(buffer.text(), "@prefix : <http://a/> .\n:s\n  :p :o");
		assert_eq!(assistant.statements().len(), 1);
	}

	#[test]
	fn load_and_resync() {
		let mut assistant = assistant();
		let formatted = assistant.load("@base <http://a/> .\n<s> <p> <o> .\n").unwrap();
		assert_eq!(formatted.as_deref(), Some("@base <http://a/> .\n<s>\n  <p> <o> .\n"));
		assert_eq!(assistant.statements().len(), 2);
		assert_eq!(
			assistant.triples().next().map(to_ntriples).as_deref(),
			Some("<http://a/s> <http://a/p> <http://a/o> .")
		);

		assert_eq!(assistant.load(":s :p }").unwrap(), None);
		assert_eq!(assistant.statements().len(), 2);

		let mut buffer = TextBuffer::new(":s :p :o .");
		assert!(assistant.resync(&mut buffer).unwrap());
		assert_eq!(buffer.text(), ":s\n  :p :o .\n");
		assert_eq!(assistant.statements().len(), 1);
	}
}
