//! Grammar rules and the combinators they are built from.
//!
//! A [`Grammar`] is a table of rules addressed by [`RuleId`]. Rules refer to
//! each other by index, which lets a grammar be recursive without any
//! interior mutability: a rule can be [declared](GrammarBuilder::declare)
//! before it is [defined](GrammarBuilder::define).
use std::fmt;

/// Index of a rule in its grammar.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RuleId(usize);

impl RuleId {
	pub fn index(&self) -> usize {
		self.0
	}
}

/// How a rule consumes characters.
#[derive(Clone)]
pub enum Kind {
	/// Exactly one character matching the predicate.
	CharacterClass(fn(char) -> bool),

	/// A fixed string.
	Literal(String),

	/// A fixed string, compared ASCII case-insensitively.
	LiteralCaseInsensitive(String),

	/// Zero or one occurrence.
	Optional(RuleId),

	/// Every rule in order.
	///
	/// A tolerant sequence silently absorbs whitespace and comments between
	/// its children.
	Sequence { rules: Vec<RuleId>, tolerant: bool },

	/// Any of the rules, matched in parallel.
	Alternation(Vec<RuleId>),

	OneOrMore(RuleId),

	ZeroOrMore(RuleId),

	/// Declared but not yet defined.
	Deferred,
}

impl Kind {
	/// Name given to anonymous rules of this kind.
	pub fn name(&self) -> &'static str {
		match self {
			Self::CharacterClass(_) => "characterClass",
			Self::Literal(_) | Self::LiteralCaseInsensitive(_) => "literal",
			Self::Optional(_) => "optional",
			Self::Sequence { .. } => "sequence",
			Self::Alternation(_) => "alternation",
			Self::OneOrMore(_) => "oneOrMore",
			Self::ZeroOrMore(_) => "zeroOrMore",
			Self::Deferred => "deferred",
		}
	}

	fn references(&self) -> &[RuleId] {
		match self {
			Self::Optional(r) | Self::OneOrMore(r) | Self::ZeroOrMore(r) => std::slice::from_ref(r),
			Self::Sequence { rules, .. } | Self::Alternation(rules) => rules,
			_ => &[],
		}
	}
}

impl fmt::Debug for Kind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::CharacterClass(_) => write!(f, "CharacterClass"),
			Self::Literal(s) => write!(f, "Literal({s:?})"),
			Self::LiteralCaseInsensitive(s) => write!(f, "LiteralCaseInsensitive({s:?})"),
			Self::Optional(r) => write!(f, "Optional({})", r.0),
			Self::Sequence { rules, tolerant } => {
				write!(f, "Sequence({:?}, tolerant: {tolerant})", rules)
			}
			Self::Alternation(rules) => write!(f, "Alternation({rules:?})"),
			Self::OneOrMore(r) => write!(f, "OneOrMore({})", r.0),
			Self::ZeroOrMore(r) => write!(f, "ZeroOrMore({})", r.0),
			Self::Deferred => write!(f, "Deferred"),
		}
	}
}

/// A grammar production.
#[derive(Clone, Debug)]
pub struct Rule {
	name: &'static str,
	anonymous: bool,
	terminal: bool,
	kind: Kind,
}

impl Rule {
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Whether this rule is a lexical (token level) production.
	pub fn is_terminal(&self) -> bool {
		self.terminal
	}

	/// Whether the rule is only named after its kind.
	pub fn is_anonymous(&self) -> bool {
		self.anonymous
	}

	pub fn kind(&self) -> &Kind {
		&self.kind
	}
}

/// Grammar construction error.
///
/// These are programming errors: a correctly assembled grammar never produces
/// them.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
	#[error("rule `{name}` was declared but never defined")]
	Unresolved { name: &'static str },

	#[error("rule `{name}` refers to unknown rule #{index}")]
	UnknownRule { name: &'static str, index: usize },

	#[error("rule `{0}` is already defined")]
	AlreadyDefined(&'static str),
}

/// Finished, fully resolved rule table.
#[derive(Debug)]
pub struct Grammar {
	rules: Vec<Rule>,
	start: RuleId,
}

impl Grammar {
	pub fn builder() -> GrammarBuilder {
		GrammarBuilder::default()
	}

	/// Rule a parser starts from by default.
	pub fn start(&self) -> RuleId {
		self.start
	}

	pub fn rule(&self, id: RuleId) -> &Rule {
		&self.rules[id.0]
	}

	/// Finds a named rule.
	pub fn find(&self, name: &str) -> Option<RuleId> {
		self.rules
			.iter()
			.position(|r| !r.anonymous && r.name == name)
			.map(RuleId)
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}

/// Incrementally assembles a [`Grammar`].
#[derive(Default)]
pub struct GrammarBuilder {
	rules: Vec<Rule>,
}

impl GrammarBuilder {
	fn push(&mut self, name: Option<&'static str>, terminal: bool, kind: Kind) -> RuleId {
		let id = RuleId(self.rules.len());
		self.rules.push(Rule {
			name: name.unwrap_or_else(|| kind.name()),
			anonymous: name.is_none(),
			terminal,
			kind,
		});
		id
	}

	/// Declares a named rule to be defined later.
	pub fn declare(&mut self, name: &'static str) -> RuleId {
		self.push(Some(name), false, Kind::Deferred)
	}

	/// Declares a named lexical rule to be defined later.
	pub fn declare_terminal(&mut self, name: &'static str) -> RuleId {
		self.push(Some(name), true, Kind::Deferred)
	}

	/// Gives a declared rule its definition.
	pub fn define(&mut self, id: RuleId, kind: Kind) -> Result<RuleId, GrammarError> {
		let rule = &mut self.rules[id.0];
		match rule.kind {
			Kind::Deferred => {
				rule.kind = kind;
				Ok(id)
			}
			_ => Err(GrammarError::AlreadyDefined(rule.name)),
		}
	}

	/// Adds a named, non-lexical rule.
	pub fn rule(&mut self, name: &'static str, kind: Kind) -> RuleId {
		self.push(Some(name), false, kind)
	}

	/// Adds a named lexical rule.
	pub fn terminal(&mut self, name: &'static str, kind: Kind) -> RuleId {
		self.push(Some(name), true, kind)
	}

	pub fn character_class(&mut self, f: fn(char) -> bool) -> RuleId {
		self.push(None, true, Kind::CharacterClass(f))
	}

	pub fn literal(&mut self, s: &str) -> RuleId {
		self.push(None, true, Kind::Literal(s.to_owned()))
	}

	pub fn literal_case_insensitive(&mut self, s: &str) -> RuleId {
		self.push(None, true, Kind::LiteralCaseInsensitive(s.to_owned()))
	}

	pub fn optional(&mut self, r: RuleId) -> RuleId {
		self.push(None, false, Kind::Optional(r))
	}

	pub fn sequence(&mut self, rules: &[RuleId]) -> RuleId {
		self.push(None, false, sequence(rules))
	}

	pub fn tolerant_sequence(&mut self, rules: &[RuleId]) -> RuleId {
		self.push(None, false, tolerant_sequence(rules))
	}

	pub fn alternation(&mut self, rules: &[RuleId]) -> RuleId {
		self.push(None, false, alternation(rules))
	}

	pub fn one_or_more(&mut self, r: RuleId) -> RuleId {
		self.push(None, false, Kind::OneOrMore(r))
	}

	pub fn zero_or_more(&mut self, r: RuleId) -> RuleId {
		self.push(None, false, Kind::ZeroOrMore(r))
	}

	/// Checks every rule is defined and every reference exists.
	pub fn build(self, start: RuleId) -> Result<Grammar, GrammarError> {
		let len = self.rules.len();
		for rule in &self.rules {
			if let Kind::Deferred = rule.kind {
				return Err(GrammarError::Unresolved { name: rule.name });
			}

			if let Some(r) = rule.kind.references().iter().find(|r| r.0 >= len) {
				return Err(GrammarError::UnknownRule {
					name: rule.name,
					index: r.0,
				});
			}
		}

		if start.0 >= len {
			return Err(GrammarError::UnknownRule {
				name: "<start>",
				index: start.0,
			});
		}

		Ok(Grammar {
			rules: self.rules,
			start,
		})
	}
}

pub fn sequence(rules: &[RuleId]) -> Kind {
	Kind::Sequence {
		rules: rules.to_vec(),
		tolerant: false,
	}
}

pub fn tolerant_sequence(rules: &[RuleId]) -> Kind {
	Kind::Sequence {
		rules: rules.to_vec(),
		tolerant: true,
	}
}

pub fn alternation(rules: &[RuleId]) -> Kind {
	Kind::Alternation(rules.to_vec())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unresolved_rule_is_a_construction_error() {
		let mut g = Grammar::builder();
		let a = g.literal("a");
		let object = g.declare("object");
		let list = g.rule("list", sequence(&[a, object]));
		match g.build(list) {
			Err(GrammarError::Unresolved { name }) => assert_eq!(name, "object"),
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn recursive_rules_resolve() {
		let mut g = Grammar::builder();
		let open = g.literal("(");
		let close = g.literal(")");
		let nested = g.declare("nested");
		let inner = g.zero_or_more(nested);
		g.define(nested, sequence(&[open, inner, close])).unwrap();
		let grammar = g.build(nested).unwrap();
		assert_eq!(grammar.rule(grammar.start()).name(), "nested");
		assert_eq!(grammar.rule(inner).name(), "zeroOrMore");
		assert_eq!(grammar.find("nested"), Some(nested));
	}

	#[test]
	fn define_twice_fails() {
		let mut g = Grammar::builder();
		let a = g.declare("a");
		g.define(a, Kind::Literal("a".into())).unwrap();
		assert!(matches!(
			g.define(a, Kind::Literal("b".into())),
			Err(GrammarError::AlreadyDefined("a"))
		));
	}
}
