//! Live, incremental parse trees.
//!
//! A [`ParseNode`] is an automaton bound to one grammar rule. It is fed one
//! character at a time through [`ParseNode::push`] and keeps track of whether
//! what it consumed so far can still become a match (`valid`), currently is a
//! complete match (`satisfied`) and whether it can take more input
//! (`accepting`).
use crate::grammar::{Grammar, Kind, RuleId};
use crate::session::Session;
use crate::term::{self, Triple, RDF_TYPE};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Rule specific state of a node.
#[derive(Clone, Debug)]
pub enum State {
	/// Literal strings and character classes.
	Terminal,

	Optional {
		rule: RuleId,
		child: Option<Box<ParseNode>>,
	},

	Sequence {
		children: Vec<ParseNode>,
		index: usize,
		tolerant: bool,
		/// Inside a `#` comment absorbed between children.
		comment: bool,
	},

	/// Alternatives still in the running, instantiated on the first character.
	Alternation(Vec<ParseNode>),

	Repetition {
		rule: RuleId,
		at_least_one: bool,
		children: Vec<ParseNode>,
	},
}

#[derive(Clone, Debug)]
pub struct ParseNode {
	rule: RuleId,
	name: &'static str,
	terminal: bool,
	text: String,
	len: usize,
	valid: bool,
	satisfied: bool,
	accepting: bool,
	/// Inside a blank node property list or collection.
	scoped: bool,
	state: State,
}

/// Insignificant whitespace between tokens.
pub fn is_whitespace(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn opens_scope(name: &str) -> bool {
	matches!(name, "blankNodePropertyList" | "collection")
}

impl ParseNode {
	pub fn new(grammar: &Grammar, id: RuleId, scoped: bool) -> Self {
		let rule = grammar.rule(id);
		let inner = scoped || opens_scope(rule.name());
		let mut valid = true;
		let (state, satisfied) = match rule.kind() {
			Kind::CharacterClass(_) => (State::Terminal, false),
			Kind::Literal(s) | Kind::LiteralCaseInsensitive(s) => (State::Terminal, s.is_empty()),
			Kind::Optional(r) => (
				State::Optional {
					rule: *r,
					child: None,
				},
				true,
			),
			Kind::Sequence { rules, tolerant } => {
				let children: Vec<_> = rules
					.iter()
					.map(|r| ParseNode::new(grammar, *r, inner))
					.collect();
				let satisfied = children.iter().all(|c| c.satisfied);
				(
					State::Sequence {
						children,
						index: 0,
						tolerant: *tolerant,
						comment: false,
					},
					satisfied,
				)
			}
			Kind::Alternation(_) => (State::Alternation(Vec::new()), false),
			Kind::OneOrMore(r) => (
				State::Repetition {
					rule: *r,
					at_least_one: true,
					children: Vec::new(),
				},
				false,
			),
			Kind::ZeroOrMore(r) => (
				State::Repetition {
					rule: *r,
					at_least_one: false,
					children: Vec::new(),
				},
				true,
			),
			Kind::Deferred => {
				valid = false;
				(State::Terminal, false)
			}
		};

		Self {
			rule: id,
			name: rule.name(),
			terminal: rule.is_terminal(),
			text: String::new(),
			len: 0,
			valid,
			satisfied,
			accepting: valid,
			scoped,
			state,
		}
	}

	pub fn rule(&self) -> RuleId {
		self.rule
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn is_terminal(&self) -> bool {
		self.terminal
	}

	/// Text accepted so far.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Number of characters accepted so far.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn is_valid(&self) -> bool {
		self.valid
	}

	pub fn is_satisfied(&self) -> bool {
		self.satisfied
	}

	pub fn is_accepting(&self) -> bool {
		self.accepting
	}

	pub fn state(&self) -> &State {
		&self.state
	}

	pub fn children(&self) -> &[ParseNode] {
		match &self.state {
			State::Terminal => &[],
			State::Optional { child, .. } => match child {
				Some(child) => std::slice::from_ref(child.as_ref()),
				None => &[],
			},
			State::Sequence { children, .. }
			| State::Alternation(children)
			| State::Repetition { children, .. } => children,
		}
	}

	/// Feeds one character, returning whether it was accepted.
	///
	/// Once a character is rejected the node stops accepting for good and
	/// every further push is a no-op.
	pub fn push(&mut self, grammar: &Grammar, session: &mut Session, c: char) -> bool {
		if !self.valid || !self.accepting {
			return false;
		}

		let accepted = self.derive(grammar, session, c);
		self.accepting = accepted && self.valid;
		if accepted {
			self.text.push(c);
			self.len += 1;
		}

		if self.satisfied && accepted && !is_whitespace(c) {
			match self.name {
				"base" | "sparqlBase" => self.emit_base(session),
				"prefixID" | "sparqlPrefix" => self.emit_prefix(session),
				_ => (),
			}
		}

		if self.satisfied && !self.accepting && !self.scoped {
			match self.name {
				"subject" => self.emit_subject(session),
				"verb" => self.emit_verb(session),
				"object" => self.emit_object(session),
				_ => (),
			}
		}

		accepted
	}

	fn derive(&mut self, grammar: &Grammar, session: &mut Session, c: char) -> bool {
		let scope = self.scoped || opens_scope(self.name);
		match &mut self.state {
			State::Terminal => match grammar.rule(self.rule).kind() {
				Kind::CharacterClass(f) => {
					if self.len > 0 {
						return false;
					}

					self.valid = f(c);
					self.satisfied = self.valid;
					self.valid
				}
				Kind::Literal(s) => derive_literal(
					s,
					false,
					self.len,
					&self.text,
					c,
					&mut self.valid,
					&mut self.satisfied,
				),
				Kind::LiteralCaseInsensitive(s) => derive_literal(
					s,
					true,
					self.len,
					&self.text,
					c,
					&mut self.valid,
					&mut self.satisfied,
				),
				_ => {
					self.valid = false;
					false
				}
			},
			State::Optional { rule, child } => {
				let node = child.get_or_insert_with(|| Box::new(ParseNode::new(grammar, *rule, scope)));
				if node.push(grammar, session, c) {
					self.valid = node.valid;
					self.satisfied = node.satisfied;
					true
				} else {
					if node.is_empty() {
						// Zero-width match.
						*child = None;
						self.valid = true;
						self.satisfied = true;
					} else {
						self.valid = node.valid;
						self.satisfied = node.satisfied;
					}
					false
				}
			}
			State::Sequence {
				children,
				index,
				tolerant,
				comment,
			} => {
				if *comment {
					if c == '\n' || c == '\r' {
						*comment = false
					}
					return true;
				}

				let ignorable = *tolerant && (is_whitespace(c) || c == '#');
				while let Some(child) = children.get_mut(*index) {
					if ignorable && child.is_empty() {
						break;
					}

					if child.push(grammar, session, c) {
						self.satisfied = children.iter().all(|c| c.satisfied);
						return true;
					}

					// Only a complete child can be left behind.
					if !child.valid || !child.satisfied {
						self.valid = false;
						self.satisfied = false;
						return false;
					}

					if *index + 1 < children.len() {
						*index += 1
					} else {
						break;
					}
				}

				self.satisfied = children.iter().all(|c| c.satisfied);
				if ignorable {
					*comment = c == '#';
					true
				} else {
					false
				}
			}
			State::Alternation(children) => {
				if children.is_empty() && self.len == 0 {
					if let Kind::Alternation(rules) = grammar.rule(self.rule).kind() {
						*children = rules
							.iter()
							.map(|r| ParseNode::new(grammar, *r, scope))
							.collect();
					}
				}

				let accepted: Vec<bool> = children
					.iter_mut()
					.map(|child| child.push(grammar, session, c))
					.collect();
				let any = accepted.iter().any(|a| *a);

				// Keep the alternatives tied for furthest match.
				let mut flags = accepted.into_iter();
				children.retain(|child| {
					let accepted = flags.next().unwrap_or(false);
					if any {
						accepted
					} else {
						child.valid
					}
				});

				self.valid = !children.is_empty();
				self.satisfied = children.iter().any(|c| c.satisfied);
				any
			}
			State::Repetition {
				rule,
				at_least_one,
				children,
			} => {
				let mut accepted = false;
				if let Some(last) = children.last_mut() {
					accepted = last.push(grammar, session, c);
					if !accepted && !last.valid {
						self.valid = false;
						self.satisfied = false;
						return false;
					}
				}

				if !accepted {
					let mut fresh = ParseNode::new(grammar, *rule, scope);
					if fresh.push(grammar, session, c) {
						children.push(fresh);
						accepted = true;
					} else if *at_least_one && children.is_empty() {
						self.valid = false;
						self.satisfied = false;
						return false;
					}
				}

				self.valid = children.iter().all(|c| c.valid);
				self.satisfied =
					(!*at_least_one || !children.is_empty()) && children.iter().all(|c| c.satisfied);
				accepted
			}
		}
	}

	/// First node named `name` in this subtree, in pre-order.
	pub fn find(&self, name: &str) -> Option<&ParseNode> {
		if self.name == name {
			return Some(self);
		}

		self.children().iter().find_map(|c| c.find(name))
	}

	/// Whether some node of this subtree satisfies `f`.
	pub fn any(&self, f: &impl Fn(&ParseNode) -> bool) -> bool {
		f(self) || self.children().iter().any(|c| c.any(f))
	}

	/// Every node of this subtree matching `f`, in pre-order.
	pub fn collect<F>(&self, f: F) -> Vec<Found<'_>>
	where
		F: Fn(&ParseNode, Path) -> bool,
	{
		let mut path = Vec::new();
		let mut result = Vec::new();
		self.collect_into(&mut path, &f, &mut result);
		result
	}

	fn collect_into<'a, F>(&'a self, path: &mut Vec<&'static str>, f: &F, result: &mut Vec<Found<'a>>)
	where
		F: Fn(&ParseNode, Path) -> bool,
	{
		path.push(self.name);
		if f(self, Path(path)) {
			result.push(Found {
				node: self,
				path: path.clone(),
			})
		}

		for child in self.children() {
			child.collect_into(path, f, result)
		}

		path.pop();
	}

	/// Whether some non-empty, still accepting node is named `name`.
	///
	/// This is the usual way of asking whether an `X` was just completed.
	pub fn some_accepting(&self, name: &str) -> bool {
		self.any(&|n| n.accepting && n.name == name && !n.is_empty())
	}

	/// Whether the text ends inside a comment.
	pub fn in_comment(&self) -> bool {
		self.any(&|n| matches!(n.state, State::Sequence { comment: true, .. }))
	}

	fn emit_base(&self, session: &mut Session) {
		match self.find("IRIREF").and_then(|n| n.value(session)) {
			Some(Value::Text(iri)) => session.set_base_iri(iri),
			_ => log::debug!("unresolved base `{}`", self.text),
		}
	}

	fn emit_prefix(&self, session: &mut Session) {
		let prefix = self
			.find("PNAME_NS")
			.map(|n| n.text.trim_end_matches(':').to_owned());
		let iri = self.find("IRIREF").and_then(|n| n.value(session));
		match (prefix, iri) {
			(Some(prefix), Some(Value::Text(iri))) => session.insert_prefix(prefix, iri),
			_ => log::debug!("unresolved prefix `{}`", self.text),
		}
	}

	fn emit_subject(&self, session: &mut Session) {
		let subject = self.value(session).and_then(Value::into_iri);
		session.set_subject(subject)
	}

	fn emit_verb(&self, session: &mut Session) {
		let predicate = if self.text == "a" {
			Some(RDF_TYPE.as_str().to_owned())
		} else {
			self.value(session).and_then(Value::into_iri)
		};
		session.set_predicate(predicate)
	}

	fn emit_object(&self, session: &mut Session) {
		let triple = match (session.subject(), session.predicate(), self.value(session)) {
			(Some(s), Some(p), Some(o)) => o.into_term().and_then(|o| term::triple(s, p, o)),
			_ => None,
		};

		match triple {
			Some(triple) => session.emit(triple),
			None => log::trace!("dropping triple with unresolved term near `{}`", self.text),
		}
	}

	fn fmt_tree(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
		let status = if !self.valid {
			'x'
		} else if self.satisfied {
			'√'
		} else {
			'⋯'
		};
		write!(f, "{:width$}{status} {} [", "", self.name, width = depth * 2)?;
		for c in self.text.chars() {
			match c {
				'\n' => write!(f, "\\n")?,
				c => write!(f, "{c}")?,
			}
		}
		writeln!(f, "]")?;

		if !self.terminal {
			for child in self.children() {
				child.fmt_tree(f, depth + 1)?
			}
		}

		Ok(())
	}
}

fn derive_literal(
	s: &str,
	case_insensitive: bool,
	len: usize,
	text: &str,
	c: char,
	valid: &mut bool,
	satisfied: &mut bool,
) -> bool {
	let expected = match s.chars().nth(len) {
		Some(e) => e,
		None => return false,
	};

	let matches = if case_insensitive {
		let candidate: String = text.chars().chain(Some(c)).collect();
		let prefix: String = s.chars().take(len + 1).collect();
		unicase::Ascii::new(candidate.as_str()) == unicase::Ascii::new(prefix.as_str())
	} else {
		expected == c
	};

	if !matches {
		*valid = false;
		*satisfied = false;
		return false;
	}

	*satisfied = len + 1 == s.chars().count();
	true
}

/// Rule names from the root of a tree down to some node.
#[derive(Clone, Copy)]
pub struct Path<'p>(&'p [&'static str]);

impl<'p> Path<'p> {
	pub fn names(&self) -> &'p [&'static str] {
		self.0
	}

	/// Dot-joined rule names, e.g. `turtleDoc.statement.triples`.
	pub fn full_name(&self) -> String {
		self.0.join(".")
	}

	/// Whether the path ends with the given dot separated names.
	pub fn ends_with(&self, dotted: &str) -> bool {
		let suffix: Vec<&str> = dotted.split('.').filter(|s| !s.is_empty()).collect();
		suffix.len() <= self.0.len()
			&& self.0[self.0.len() - suffix.len()..]
				.iter()
				.zip(&suffix)
				.all(|(a, b)| a == b)
	}

	/// Whether the node or any of its ancestors is named `name`.
	pub fn has_parent(&self, name: &str) -> bool {
		self.0.iter().any(|n| *n == name)
	}

	pub fn parent_name(&self) -> Option<&'static str> {
		self.0.len().checked_sub(2).map(|i| self.0[i])
	}
}

/// A node found by [`ParseNode::collect`], together with its path.
#[derive(Clone)]
pub struct Found<'a> {
	node: &'a ParseNode,
	path: Vec<&'static str>,
}

impl<'a> Found<'a> {
	pub fn node(&self) -> &'a ParseNode {
		self.node
	}

	pub fn path(&self) -> Path<'_> {
		Path(&self.path)
	}

	pub fn full_name(&self) -> String {
		self.path().full_name()
	}

	pub fn has_parent(&self, name: &str) -> bool {
		self.path().has_parent(name)
	}

	/// Semantic value, taking the enclosing rule into account.
	pub fn value(&self, session: &Session) -> Option<Value> {
		self.node.value_in(session, self.path().parent_name())
	}
}

impl<'a> std::ops::Deref for Found<'a> {
	type Target = ParseNode;

	fn deref(&self) -> &ParseNode {
		self.node
	}
}

/// Root of a parse tree, with the session it feeds.
#[derive(Clone)]
pub struct Parser {
	grammar: Rc<Grammar>,
	root: ParseNode,
	session: Session,
}

impl Parser {
	/// Empty parser on the grammar's start rule.
	pub fn new(grammar: Rc<Grammar>, session: Session) -> Self {
		let root = ParseNode::new(&grammar, grammar.start(), false);
		Self {
			grammar,
			root,
			session,
		}
	}

	/// Parser on the grammar's start rule, seeded with `text`.
	pub fn test(grammar: Rc<Grammar>, text: &str) -> Self {
		let mut parser = Self::new(grammar, Session::default());
		parser.push_str(text);
		parser
	}

	/// Parser on an arbitrary rule, seeded with `text`.
	pub fn for_rule(grammar: Rc<Grammar>, rule: RuleId, text: &str) -> Self {
		let root = ParseNode::new(&grammar, rule, false);
		let mut parser = Self {
			grammar,
			root,
			session: Session::default(),
		};
		parser.push_str(text);
		parser
	}

	pub fn grammar(&self) -> &Rc<Grammar> {
		&self.grammar
	}

	pub fn root(&self) -> &ParseNode {
		&self.root
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	pub fn session_mut(&mut self) -> &mut Session {
		&mut self.session
	}

	pub fn text(&self) -> &str {
		self.root.text()
	}

	pub fn len(&self) -> usize {
		self.root.len()
	}

	pub fn is_empty(&self) -> bool {
		self.root.is_empty()
	}

	pub fn is_valid(&self) -> bool {
		self.root.is_valid()
	}

	pub fn is_satisfied(&self) -> bool {
		self.root.is_satisfied()
	}

	pub fn is_accepting(&self) -> bool {
		self.root.is_accepting()
	}

	pub fn push(&mut self, c: char) -> bool {
		self.root.push(&self.grammar, &mut self.session, c)
	}

	/// Pushes every character of `s`, returning whether all were accepted.
	pub fn push_str(&mut self, s: &str) -> bool {
		s.chars().all(|c| self.push(c))
	}

	/// Throws the tree away and replays `text` into a fresh one.
	pub fn reset(&mut self, text: &str) -> &mut Self {
		self.root = ParseNode::new(&self.grammar, self.root.rule(), false);
		self.session.restart();
		self.push_str(text);
		self
	}

	/// Fresh parser on the same rule, forking the session, seeded with `text`.
	pub fn clone_with(&self, text: &str) -> Self {
		let mut parser = self.restart_with(self.session.clone());
		parser.push_str(text);
		parser
	}

	/// Fresh, empty parser on the same rule, in the scope of `session`.
	pub fn restart_with(&self, mut session: Session) -> Self {
		session.restart();
		Self {
			grammar: self.grammar.clone(),
			root: ParseNode::new(&self.grammar, self.root.rule(), false),
			session,
		}
	}

	pub fn value(&self) -> Option<Value> {
		self.root.value(&self.session)
	}

	pub fn collect<F>(&self, f: F) -> Vec<Found<'_>>
	where
		F: Fn(&ParseNode, Path) -> bool,
	{
		self.root.collect(f)
	}

	pub fn some_accepting(&self, name: &str) -> bool {
		self.root.some_accepting(name)
	}

	pub fn in_comment(&self) -> bool {
		self.root.in_comment()
	}

	pub fn take_triples(&mut self) -> Vec<Triple> {
		self.session.take_triples()
	}
}

impl fmt::Debug for Parser {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Parser")
			.field("text", &self.root.text())
			.field("valid", &self.root.is_valid())
			.field("satisfied", &self.root.is_satisfied())
			.field("accepting", &self.root.is_accepting())
			.finish()
	}
}

/// Indented status tree, one node per line.
impl fmt::Display for Parser {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.root.fmt_tree(f, 0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::grammar::{sequence, tolerant_sequence, GrammarBuilder};

	fn digit(c: char) -> bool {
		c.is_ascii_digit()
	}

	fn sign(c: char) -> bool {
		matches!(c, '+' | '-')
	}

	fn build(g: GrammarBuilder, start: RuleId) -> Rc<Grammar> {
		Rc::new(g.build(start).unwrap())
	}

	fn integer() -> Rc<Grammar> {
		let mut g = Grammar::builder();
		let s = g.character_class(sign);
		let s = g.optional(s);
		let d = g.character_class(digit);
		let digits = g.one_or_more(d);
		let integer = g.terminal("INTEGER", sequence(&[s, digits]));
		build(g, integer)
	}

	#[test]
	fn character_class() {
		let mut g = Grammar::builder();
		let d = g.character_class(digit);
		let grammar = build(g, d);

		let p = Parser::test(grammar.clone(), "1");
		assert!(p.is_valid() && p.is_satisfied() && p.is_accepting());

		let mut p = Parser::test(grammar.clone(), "12");
		assert_eq!(p.text(), "1");
		assert!(p.is_valid() && !p.is_accepting());
		assert!(!p.push('3'));

		let p = Parser::test(grammar, "a");
		assert!(!p.is_valid() && !p.is_accepting());
	}

	#[test]
	fn literal() {
		let mut g = Grammar::builder();
		let kilroy = g.literal("Kilroy");
		let grammar = build(g, kilroy);

		let p = Parser::test(grammar.clone(), "Kil");
		assert!(p.is_valid() && !p.is_satisfied());

		let mut p = Parser::test(grammar.clone(), "Kilroy");
		assert!(p.is_satisfied());
		assert!(!p.push('!'));
		assert!(p.is_valid());

		let p = Parser::test(grammar, "Kilr0y");
		assert!(!p.is_valid());
		assert_eq!(p.text(), "Kilr");
	}

	#[test]
	fn literal_case_insensitive() {
		let mut g = Grammar::builder();
		let prefix = g.literal_case_insensitive("PREFIX");
		let grammar = build(g, prefix);

		assert!(Parser::test(grammar.clone(), "prefix").is_satisfied());
		assert!(Parser::test(grammar.clone(), "PreFix").is_satisfied());
		assert!(!Parser::test(grammar, "prefox").is_valid());
	}

	#[test]
	fn optional() {
		let mut g = Grammar::builder();
		let was = g.literal(" was here");
		let was = g.optional(was);
		let grammar = build(g, was);

		assert!(Parser::test(grammar.clone(), "").is_satisfied());
		assert!(!Parser::test(grammar.clone(), " was").is_satisfied());
		assert!(Parser::test(grammar.clone(), " was here").is_satisfied());

		// A mismatch on the first character is a zero-width match.
		let mut p = Parser::test(grammar.clone(), "");
		assert!(!p.push('x'));
		assert!(p.is_valid() && p.is_satisfied() && p.is_empty());

		// A mismatch later on is not.
		let p = Parser::test(grammar, " wax");
		assert!(!p.is_valid());
	}

	#[test]
	fn sequence_of_optional_and_repetition() {
		let grammar = integer();
		for valid in ["1", "+12", "-0", "007"] {
			let p = Parser::test(grammar.clone(), valid);
			assert!(p.is_satisfied(), "{valid}");
			assert_eq!(p.text(), valid);
		}

		let p = Parser::test(grammar.clone(), "+");
		assert!(p.is_valid() && !p.is_satisfied());

		let mut p = Parser::test(grammar.clone(), "12");
		assert!(!p.push('a'));
		assert!(p.is_valid() && p.is_satisfied() && !p.is_accepting());

		let p = Parser::test(grammar, "+-1");
		assert!(!p.is_valid());
	}

	#[test]
	fn tolerant_sequence_absorbs_whitespace_and_comments() {
		let mut g = Grammar::builder();
		let kilroy = g.literal("Kilroy");
		let was = g.literal("was");
		let here = g.literal("here");
		let strict = g.rule("strict", sequence(&[kilroy, was, here]));
		let tolerant = g.rule("tolerant", tolerant_sequence(&[kilroy, was, here]));
		let grammar = build(g, tolerant);

		let p = Parser::test(grammar.clone(), " Kilroy  was\n here # really\n");
		assert!(p.is_valid() && p.is_satisfied() && p.is_accepting());

		let p = Parser::test(grammar.clone(), "Kilroy # was\n");
		assert!(!p.in_comment() && !p.is_satisfied());

		let p = Parser::test(grammar.clone(), "Kilroy #");
		assert!(p.in_comment());

		let p = Parser::for_rule(grammar.clone(), strict, "Kilroywashere");
		assert!(p.is_satisfied());

		let p = Parser::for_rule(grammar, strict, "Kilroy was here");
		assert!(!p.is_valid());
	}

	#[test]
	fn alternation_keeps_furthest_alternatives() {
		let mut g = Grammar::builder();
		let kilroy = g.literal("Kilroy");
		let kill = g.literal("Kill");
		let kil = g.literal("Kil");
		let alt = g.rule("who", crate::grammar::alternation(&[kilroy, kill, kil]));
		let grammar = build(g, alt);

		let p = Parser::test(grammar.clone(), "Kil");
		assert!(p.is_satisfied());
		assert_eq!(p.root().children().len(), 3);

		let p = Parser::test(grammar.clone(), "Kill");
		assert!(p.is_satisfied());
		assert_eq!(p.root().children().len(), 1);
		assert_eq!(p.root().children()[0].text(), "Kill");

		let p = Parser::test(grammar.clone(), "Kilr");
		assert!(!p.is_satisfied() && p.is_valid());
		assert_eq!(p.root().children().len(), 1);

		let p = Parser::test(grammar, "Kix");
		assert!(!p.is_valid());
	}

	#[test]
	fn zero_or_more_and_one_or_more() {
		let mut g = Grammar::builder();
		let a = g.literal("ab");
		let many = g.zero_or_more(a);
		let some = g.one_or_more(a);
		let grammar = build(g, many);

		assert!(Parser::for_rule(grammar.clone(), many, "").is_satisfied());
		assert!(!Parser::for_rule(grammar.clone(), some, "").is_satisfied());
		assert!(Parser::for_rule(grammar.clone(), some, "abab").is_satisfied());
		assert!(!Parser::for_rule(grammar.clone(), some, "aba").is_satisfied());

		let p = Parser::for_rule(grammar, many, "abax");
		assert!(!p.is_valid());
	}

	#[test]
	fn empty_one_or_more_is_not_skipped() {
		let mut g = Grammar::builder();
		let d = g.character_class(digit);
		let digits = g.one_or_more(d);
		let e = g.literal("e");
		let exponent = g.rule("exponent", sequence(&[digits, e]));
		let grammar = build(g, exponent);

		assert!(Parser::test(grammar.clone(), "12e").is_satisfied());
		assert!(!Parser::test(grammar.clone(), "e").is_valid());
		assert!(!Parser::test(grammar.clone(), "x").is_accepting());

		let p = Parser::for_rule(grammar, digits, "x");
		assert!(!p.is_valid() && !p.is_satisfied());
	}

	#[test]
	fn long_right_recursive_body() {
		let mut g = Grammar::builder();
		let quote = g.literal("\"");
		let c = g.character_class(|c| c != '"');
		let body = g.declare("body");
		let more = g.sequence(&[c, body]);
		g.define(body, crate::grammar::alternation(&[quote, more])).unwrap();
		let string = g.rule("string", sequence(&[quote, body]));
		let grammar = build(g, string);

		let text = format!("\"{}", "a, b; c.".repeat(40));
		let mut p = Parser::test(grammar, &text);
		assert!(p.is_valid() && !p.is_satisfied());
		assert!(p.push('"'));
		assert!(p.is_satisfied());
		assert!(!p.push('"'));
	}

	#[test]
	fn recursion_through_lazy_rules() {
		let mut g = Grammar::builder();
		let open = g.literal("(");
		let close = g.literal(")");
		let nested = g.declare("nested");
		let inner = g.zero_or_more(nested);
		g.define(nested, sequence(&[open, inner, close])).unwrap();
		let grammar = build(g, nested);

		assert!(Parser::test(grammar.clone(), "(()(()))").is_satisfied());
		assert!(!Parser::test(grammar.clone(), "(()(())").is_satisfied());
		assert!(!Parser::test(grammar, "())").is_accepting());
	}

	#[test]
	fn reset_and_clone_replay() {
		let grammar = integer();
		let mut p = Parser::test(grammar, "12");
		p.reset("-3");
		assert_eq!(p.text(), "-3");
		assert!(p.is_satisfied());

		let q = p.clone_with("+");
		assert_eq!(q.text(), "+");
		assert!(!q.is_satisfied());
		assert_eq!(p.text(), "-3");
	}

	#[test]
	fn collect_reports_paths() {
		let grammar = integer();
		let p = Parser::test(grammar, "+1");
		let found = p.collect(|n, _| n.name() == "characterClass");
		assert_eq!(found.len(), 2);
		assert_eq!(found[0].full_name(), "INTEGER.optional.characterClass");
		assert_eq!(found[1].full_name(), "INTEGER.oneOrMore.characterClass");
		assert!(found[1].has_parent("oneOrMore"));
		assert!(found[1].path().ends_with("oneOrMore.characterClass"));
		assert!(!found[1].path().ends_with("optional.characterClass"));
		assert!(p.some_accepting("INTEGER"));
	}
}
