//! Edit transactions.
//!
//! A [`Changeset`] wraps one edit of the document. It rebuilds the text of the
//! tail affected by the edit and replays it character by character through
//! the assist pipeline, splitting completed statements off as it goes. All the
//! rewrites performed along the way are applied to the host editor as one
//! single replacement.
use crate::assist::{Flow, Rule};
use crate::error::Error;
use crate::node::Parser;
use crate::session::Session;
use crate::term::Triple;

/// Zero based row and column, in characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Position {
	pub row: usize,
	pub column: usize,
}

impl Position {
	pub fn new(row: usize, column: usize) -> Self {
		Self { row, column }
	}

	/// Position right after `text`, when it starts at `self`.
	pub fn after(self, text: &str) -> Self {
		match text.rfind('\n') {
			Some(i) => Self::new(
				self.row + text.matches('\n').count(),
				text[i + 1..].chars().count(),
			),
			None => Self::new(self.row, self.column + text.chars().count()),
		}
	}
}

/// Range of text, end excluded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Range {
	pub start: Position,
	pub end: Position,
}

impl Range {
	pub fn new(start: Position, end: Position) -> Self {
		Self { start, end }
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
	Insert,
	Remove,
}

/// Change notification sent by the host editor.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EditDelta {
	pub action: Action,
	pub start: Position,
	pub end: Position,
	/// Inserted or removed text, split on newlines.
	pub lines: Vec<String>,
}

impl EditDelta {
	pub fn insert(start: Position, text: &str) -> Self {
		Self {
			action: Action::Insert,
			start,
			end: start.after(text),
			lines: text.split('\n').map(str::to_owned).collect(),
		}
	}

	pub fn remove(range: Range, removed: &str) -> Self {
		Self {
			action: Action::Remove,
			start: range.start,
			end: range.end,
			lines: removed.split('\n').map(str::to_owned).collect(),
		}
	}

	pub fn text(&self) -> String {
		self.lines.join("\n")
	}
}

/// Completed top level production.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Statement {
	start_row: usize,
	text: String,
	row_count: usize,
	triples: Vec<Triple>,
	scope: Session,
}

impl Statement {
	pub fn new(start_row: usize, text: impl Into<String>, triples: Vec<Triple>) -> Self {
		let text = text.into();
		Self {
			start_row,
			row_count: text.split('\n').count(),
			text,
			triples,
			scope: Session::default(),
		}
	}

	/// Sets the base and prefixes in effect after the statement.
	pub fn with_scope(mut self, mut scope: Session) -> Self {
		scope.restart();
		self.scope = scope;
		self
	}

	pub fn start_row(&self) -> usize {
		self.start_row
	}

	pub fn end_row(&self) -> usize {
		self.start_row + self.row_count - 1
	}

	pub fn row_count(&self) -> usize {
		self.row_count
	}

	/// Trimmed text of the statement.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn triples(&self) -> &[Triple] {
		&self.triples
	}

	/// Base and prefixes in effect after the statement.
	pub fn scope(&self) -> &Session {
		&self.scope
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Cursor {
	/// Byte offset in the pending change.
	Pending(usize),
	Committed(Position),
}

pub struct Changeset {
	statements: Vec<Statement>,
	original: String,
	wanted: String,
	start_row: usize,
	change: String,
	inserting: bool,
	parser: Parser,
	cursor: Option<Cursor>,
}

impl Changeset {
	/// Transaction turning `original`, starting at `start_row`, into `wanted`.
	///
	/// Parsing resumes from `parser` when `wanted` starts with its text, and
	/// starts over otherwise.
	pub fn new(
		parser: &Parser,
		original: String,
		wanted: String,
		start_row: usize,
		inserting: bool,
	) -> Self {
		let parser = if wanted.starts_with(parser.text()) {
			parser.clone()
		} else {
			parser.clone_with("")
		};

		Self {
			statements: Vec::new(),
			original,
			change: wanted.clone(),
			wanted,
			start_row,
			inserting,
			parser,
			cursor: None,
		}
	}

	/// Transaction appending `input` to the parser's text.
	pub fn typing(parser: &Parser, input: &str) -> Self {
		let original = parser.text().to_owned();
		let wanted = format!("{original}{input}");
		let mut changeset = Self::new(parser, original, wanted, 0, true);
		changeset.cursor = Some(Cursor::Pending(changeset.change.len()));
		changeset
	}

	pub fn statements(&self) -> &[Statement] {
		&self.statements
	}

	/// Text of the affected tail before the edit.
	pub fn original(&self) -> &str {
		&self.original
	}

	/// Text of the affected tail right after the raw edit.
	pub fn wanted(&self) -> &str {
		&self.wanted
	}

	/// Text still to parse, starting with the open statement.
	pub fn change(&self) -> &str {
		&self.change
	}

	pub fn start_row(&self) -> usize {
		self.start_row
	}

	pub fn is_inserting(&self) -> bool {
		self.inserting
	}

	pub fn parser(&self) -> &Parser {
		&self.parser
	}

	pub fn into_parts(self) -> (Vec<Statement>, Parser) {
		(self.statements, self.parser)
	}

	/// Byte offset of the next character in the change.
	fn offset(&self) -> usize {
		self.parser.text().len()
	}

	pub fn next_char(&self) -> Option<char> {
		self.change.get(self.offset()..)?.chars().next()
	}

	pub fn last_char(&self) -> Option<char> {
		self.parser.text().chars().last()
	}

	/// Pending text, from the next character on.
	pub fn remainder(&self) -> &str {
		self.change.get(self.offset()..).unwrap_or("")
	}

	/// Pushes the next character as is.
	pub fn push_next(&mut self) -> bool {
		match self.next_char() {
			Some(c) => self.parser.push(c),
			None => false,
		}
	}

	/// Drops the next character.
	pub fn skip_char(&mut self) {
		if let Some(c) = self.next_char() {
			let at = self.offset();
			log::debug!("drop {c:?}");
			self.change.replace_range(at..at + c.len_utf8(), "");
			self.shift_cursor(at, c.len_utf8(), 0);
		}
	}

	/// Replaces the next character and pushes the replacement.
	pub fn replace_char(&mut self, replacement: &str) {
		let at = self.offset();
		let len = self.next_char().map(char::len_utf8).unwrap_or(0);
		log::debug!("replace {:?} with {replacement:?}", &self.change[at..at + len]);
		self.change.replace_range(at..at + len, replacement);
		self.shift_cursor(at, len, replacement.len());
		self.parser.push_str(replacement);
	}

	/// Restarts the statement from `replacement`, which stands for everything
	/// parsed so far and the next character.
	pub fn replace_from_start(&mut self, replacement: &str, delete_remainder: bool) {
		let consumed = self.offset() + self.next_char().map(char::len_utf8).unwrap_or(0);
		log::debug!(
			"rewrite {:?} as {replacement:?}",
			&self.change[..consumed]
		);
		let removed = if delete_remainder {
			self.change.len()
		} else {
			consumed
		};
		self.change.replace_range(..removed, replacement);
		self.shift_cursor(0, removed, replacement.len());
		self.parser = self.parser.clone_with(replacement);
	}

	/// Inserts `text` at the current position and pushes it.
	pub fn insert(&mut self, text: &str) {
		let at = self.offset();
		log::debug!("insert {text:?}");
		self.change.insert_str(at, text);
		self.shift_cursor(at, 0, text.len());
		self.parser.push_str(text);
	}

	/// Pushes the next character followed by `text`.
	pub fn add(&mut self, text: &str) {
		if self.push_next() {
			self.insert(text)
		}
	}

	fn shift_cursor(&mut self, at: usize, removed: usize, inserted: usize) {
		if let Some(Cursor::Pending(offset)) = &mut self.cursor {
			if *offset >= at + removed {
				*offset = *offset - removed + inserted
			} else if *offset > at {
				*offset = at + inserted
			}
		}
	}

	fn current_row(&self) -> usize {
		self.start_row + self.statements.iter().map(Statement::row_count).sum::<usize>()
	}

	/// Splits the open statement off the pending change.
	pub fn complete_statement(&mut self) {
		let len = self.offset();
		let start_row = self.current_row();
		let triples = self.parser.take_triples();
		let text = self.parser.text();
		let trimmed = text.trim();
		let statement =
			Statement::new(start_row, trimmed, triples).with_scope(self.parser.session().clone());

		if let Some(Cursor::Pending(offset)) = self.cursor {
			if offset < len {
				let leading = text.len() - text.trim_start().len();
				let inside = offset.saturating_sub(leading).min(trimmed.len());
				let position = Position::new(start_row, 0).after(&trimmed[..inside]);
				self.cursor = Some(Cursor::Committed(position))
			} else {
				self.cursor = Some(Cursor::Pending(offset - len))
			}
		}

		log::debug!("statement {:?} at row {start_row}", statement.text());
		self.statements.push(statement);
		self.change.replace_range(..len, "");
		self.parser = self.parser.clone_with("");
	}

	/// Runs the assist rules on the next character.
	pub fn parse_next_input(&mut self, rules: &[Rule]) {
		let Some(c) = self.next_char() else {
			return;
		};

		log::trace!("input {c:?}");
		let handled = rules.iter().any(|rule| rule(self) == Flow::Handled);
		if !handled {
			self.push_next();
		}

		if !self.parser.is_empty() && self.parser.is_satisfied() {
			self.complete_statement()
		}
	}

	/// Parses everything, returning whether the parser still accepts.
	pub fn parse_all_input(&mut self, rules: &[Rule]) -> bool {
		while self.parser.is_accepting() && self.next_char().is_some() {
			self.parse_next_input(rules)
		}

		if !self.parser.is_accepting() {
			log::debug!("rejected at {:?}", self.parser.text());
		}

		self.parser.is_accepting()
	}

	/// New text of the affected tail.
	pub fn replacement(&self) -> String {
		self.statements
			.iter()
			.map(Statement::text)
			.chain(Some(self.change.as_str()))
			.collect::<Vec<_>>()
			.join("\n")
	}

	/// Range covered by the affected tail before the edit.
	pub fn range(&self) -> Range {
		Range::new(
			Position::new(self.start_row, 0),
			Position::new(self.start_row, 0).after(&self.original),
		)
	}

	/// Cursor position after the rewrites, if it was tracked.
	pub fn cursor_position(&self) -> Option<Position> {
		match self.cursor? {
			Cursor::Committed(position) => Some(position),
			Cursor::Pending(offset) => {
				let before = self.change.get(..offset)?;
				Some(Position::new(self.current_row(), 0).after(before))
			}
		}
	}

	/// Transaction for `delta`, re-parsing every statement it touches.
	///
	/// Touched statements are parsed again in the scope left by the
	/// statements before them, or `initial` when there are none.
	pub fn from_delta(
		statements: &[Statement],
		parser: &Parser,
		initial: &Session,
		delta: &EditDelta,
	) -> Result<Self, Error> {
		let first = statements
			.iter()
			.position(|s| s.end_row() >= delta.start.row)
			.unwrap_or(statements.len());
		let affected = &statements[first..];
		let start_row = match affected.first() {
			Some(s) => s.start_row(),
			None => statements.last().map(|s| s.end_row() + 1).unwrap_or(0),
		};

		let lines: Vec<&str> = affected
			.iter()
			.flat_map(|s| s.text().split('\n'))
			.chain(parser.text().split('\n'))
			.collect();
		let now = lines.join("\n");

		let start = offset_of(&lines, start_row, delta.start)?;
		let (wanted, cursor) = match delta.action {
			Action::Insert => {
				let inserted = delta.text();
				let wanted = format!("{}{inserted}{}", &now[..start], &now[start..]);
				(wanted, start + inserted.len())
			}
			Action::Remove => {
				let end = offset_of(&lines, start_row, delta.end)?.max(start);
				(format!("{}{}", &now[..start], &now[end..]), start)
			}
		};

		let resumed = if affected.is_empty() {
			parser.clone()
		} else {
			let scope = match statements[..first].last() {
				Some(retained) => retained.scope(),
				None => initial,
			};
			parser.restart_with(scope.clone())
		};

		let inserting = delta.action == Action::Insert;
		let mut changeset = Self::new(&resumed, now, wanted, start_row, inserting);
		changeset.cursor = Some(Cursor::Pending(cursor));
		Ok(changeset)
	}
}

/// Byte offset of `position` in `lines` joined by newlines, the first line
/// being at `first_row`.
fn offset_of(lines: &[&str], first_row: usize, position: Position) -> Result<usize, Error> {
	let out_of_range = || Error::Position {
		row: position.row,
		column: position.column,
	};

	let row = position.row.checked_sub(first_row).ok_or_else(out_of_range)?;
	let line = lines.get(row).ok_or_else(out_of_range)?;
	let column = if position.column == line.chars().count() {
		line.len()
	} else {
		line.char_indices()
			.nth(position.column)
			.map(|(i, _)| i)
			.ok_or_else(out_of_range)?
	};

	Ok(lines[..row].iter().map(|l| l.len() + 1).sum::<usize>() + column)
}
