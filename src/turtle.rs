//! The Turtle grammar.
//!
//! Rules follow <https://www.w3.org/TR/turtle/#sec-grammar-grammar>. A few
//! lexical productions are restated in an equivalent form a greedy,
//! non-backtracking automaton can follow:
//!
//! - `((X | '.')* X)?` becomes `('.'* X)*`, so a trailing dot is never
//!   swallowed by the repetition;
//! - long string bodies are right recursive, so the closing delimiter stays in
//!   the running next to quotes that belong to the content.
use crate::grammar::{
	alternation, sequence, tolerant_sequence, Grammar, GrammarBuilder, GrammarError, Kind, RuleId,
};

pub fn is_pn_chars_base(c: char) -> bool {
	matches!(c, 'A'..='Z'
		| 'a'..='z'
		| '\u{00c0}'..='\u{00d6}'
		| '\u{00d8}'..='\u{00f6}'
		| '\u{00f8}'..='\u{02ff}'
		| '\u{0370}'..='\u{037d}'
		| '\u{037f}'..='\u{1fff}'
		| '\u{200c}'..='\u{200d}'
		| '\u{2070}'..='\u{218f}'
		| '\u{2c00}'..='\u{2fef}'
		| '\u{3001}'..='\u{d7ff}'
		| '\u{f900}'..='\u{fdcf}'
		| '\u{fdf0}'..='\u{fffd}'
		| '\u{10000}'..='\u{effff}')
}

pub fn is_pn_chars_u(c: char) -> bool {
	is_pn_chars_base(c) || c == '_'
}

pub fn is_pn_chars(c: char) -> bool {
	is_pn_chars_u(c)
		|| matches!(c, '-' | '0'..='9' | '\u{00b7}' | '\u{0300}'..='\u{036f}' | '\u{203f}'..='\u{2040}')
}

fn is_pn_local_start(c: char) -> bool {
	is_pn_chars_u(c) || c == ':' || c.is_ascii_digit()
}

fn is_pn_local_char(c: char) -> bool {
	is_pn_chars(c) || c == ':'
}

fn is_blank_node_label_start(c: char) -> bool {
	is_pn_chars_u(c) || c.is_ascii_digit()
}

fn is_pn_local_esc(c: char) -> bool {
	matches!(
		c,
		'_' | '~' | '.' | '-' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';'
			| '=' | '/' | '?' | '#' | '@' | '%'
	)
}

fn is_iri_char(c: char) -> bool {
	!matches!(
		c,
		'\u{00}'..='\u{20}' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'
	)
}

fn is_hex(c: char) -> bool {
	c.is_ascii_hexdigit()
}

fn is_digit(c: char) -> bool {
	c.is_ascii_digit()
}

fn is_sign(c: char) -> bool {
	matches!(c, '+' | '-')
}

fn is_exponent_mark(c: char) -> bool {
	matches!(c, 'e' | 'E')
}

fn is_alpha(c: char) -> bool {
	c.is_ascii_alphabetic()
}

fn is_alphanumeric(c: char) -> bool {
	c.is_ascii_alphanumeric()
}

fn is_echar(c: char) -> bool {
	matches!(c, 't' | 'b' | 'n' | 'r' | 'f' | '"' | '\'' | '\\')
}

fn is_ws(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_quote_content(c: char) -> bool {
	!matches!(c, '"' | '\\' | '\n' | '\r')
}

fn is_single_quote_content(c: char) -> bool {
	!matches!(c, '\'' | '\\' | '\n' | '\r')
}

fn is_long_quote_content(c: char) -> bool {
	!matches!(c, '"' | '\\')
}

fn is_long_single_quote_content(c: char) -> bool {
	!matches!(c, '\'' | '\\')
}

/// Builds the Turtle grammar, starting at `turtleDoc`.
pub fn grammar() -> Result<Grammar, GrammarError> {
	let mut g = Grammar::builder();

	// Recursive productions.
	let object = g.declare("object");
	let predicate_object_list = g.declare("predicateObjectList");

	// Characters.
	let hex = g.terminal("HEX", Kind::CharacterClass(is_hex));
	let pn_chars_base = g.terminal("PN_CHARS_BASE", Kind::CharacterClass(is_pn_chars_base));
	let pn_chars = g.terminal("PN_CHARS", Kind::CharacterClass(is_pn_chars));
	let ws = g.terminal("WS", Kind::CharacterClass(is_ws));
	let digit = g.character_class(is_digit);
	let digits = g.one_or_more(digit);
	let any_digits = g.zero_or_more(digit);
	let sign = g.character_class(is_sign);
	let sign = g.optional(sign);
	let dot = g.literal(".");
	let dots = g.zero_or_more(dot);

	// Escapes.
	let u4 = g.literal("\\u");
	let u4 = g.sequence(&[u4, hex, hex, hex, hex]);
	let u8 = g.literal("\\U");
	let u8 = g.sequence(&[u8, hex, hex, hex, hex, hex, hex, hex, hex]);
	let uchar = g.terminal("UCHAR", alternation(&[u4, u8]));
	let backslash = g.literal("\\");
	let echar_class = g.character_class(is_echar);
	let echar = g.terminal("ECHAR", sequence(&[backslash, echar_class]));

	// IRIs.
	let open_iri = g.literal("<");
	let iri_char = g.character_class(is_iri_char);
	let iri_char = g.alternation(&[iri_char, uchar]);
	let iri_chars = g.zero_or_more(iri_char);
	let close_iri = g.literal(">");
	let iriref = g.terminal("IRIREF", sequence(&[open_iri, iri_chars, close_iri]));

	let pn_prefix_tail = g.sequence(&[dots, pn_chars]);
	let pn_prefix_tail = g.zero_or_more(pn_prefix_tail);
	let pn_prefix = g.terminal("PN_PREFIX", sequence(&[pn_chars_base, pn_prefix_tail]));

	let percent_sign = g.literal("%");
	let percent = g.terminal("PERCENT", sequence(&[percent_sign, hex, hex]));
	let local_esc_class = g.character_class(is_pn_local_esc);
	let pn_local_esc = g.terminal("PN_LOCAL_ESC", sequence(&[backslash, local_esc_class]));
	let plx = g.terminal("PLX", alternation(&[percent, pn_local_esc]));
	let local_start = g.character_class(is_pn_local_start);
	let local_start = g.alternation(&[local_start, plx]);
	let local_char = g.character_class(is_pn_local_char);
	let local_char = g.alternation(&[local_char, plx]);
	let local_tail = g.sequence(&[dots, local_char]);
	let local_tail = g.zero_or_more(local_tail);
	let pn_local = g.terminal("PN_LOCAL", sequence(&[local_start, local_tail]));

	let colon = g.literal(":");
	let prefix = g.optional(pn_prefix);
	let pname_ns = g.terminal("PNAME_NS", sequence(&[prefix, colon]));
	let pname_ln = g.terminal("PNAME_LN", sequence(&[pname_ns, pn_local]));
	let prefixed_name = g.rule("PrefixedName", alternation(&[pname_ln, pname_ns]));
	let iri = g.rule("iri", alternation(&[iriref, prefixed_name]));

	// Blank nodes.
	let blank_prefix = g.literal("_:");
	let label_start = g.character_class(is_blank_node_label_start);
	let label_tail = g.sequence(&[dots, pn_chars]);
	let label_tail = g.zero_or_more(label_tail);
	let blank_node_label = g.terminal(
		"BLANK_NODE_LABEL",
		sequence(&[blank_prefix, label_start, label_tail]),
	);
	let open_bracket = g.literal("[");
	let close_bracket = g.literal("]");
	let spaces = g.zero_or_more(ws);
	let anon = g.terminal("ANON", sequence(&[open_bracket, spaces, close_bracket]));
	let blank_node = g.rule("BlankNode", alternation(&[blank_node_label, anon]));

	// Literals.
	let at = g.literal("@");
	let letter = g.character_class(is_alpha);
	let letters = g.one_or_more(letter);
	let dash = g.literal("-");
	let alphanumeric = g.character_class(is_alphanumeric);
	let alphanumerics = g.one_or_more(alphanumeric);
	let subtag = g.sequence(&[dash, alphanumerics]);
	let subtags = g.zero_or_more(subtag);
	let langtag = g.terminal("LANGTAG", sequence(&[at, letters, subtags]));

	let integer = g.terminal("INTEGER", sequence(&[sign, digits]));
	let decimal = g.terminal("DECIMAL", sequence(&[sign, any_digits, dot, digits]));
	let exponent_mark = g.character_class(is_exponent_mark);
	let exponent_sign = g.character_class(is_sign);
	let exponent_sign = g.optional(exponent_sign);
	let exponent = g.terminal("EXPONENT", sequence(&[exponent_mark, exponent_sign, digits]));
	let mantissa_dot = g.sequence(&[digits, dot, any_digits, exponent]);
	let dot_mantissa = g.sequence(&[dot, digits, exponent]);
	let mantissa = g.sequence(&[digits, exponent]);
	let mantissa = g.alternation(&[mantissa_dot, dot_mantissa, mantissa]);
	let double = g.terminal("DOUBLE", sequence(&[sign, mantissa]));
	let numeric_literal = g.rule("NumericLiteral", alternation(&[integer, decimal, double]));

	let yes = g.literal("true");
	let no = g.literal("false");
	let boolean_literal = g.rule("BooleanLiteral", alternation(&[yes, no]));

	let string_literal_quote = short_string(
		&mut g,
		"STRING_LITERAL_QUOTE",
		"\"",
		is_quote_content,
		echar,
		uchar,
	);
	let string_literal_single_quote = short_string(
		&mut g,
		"STRING_LITERAL_SINGLE_QUOTE",
		"'",
		is_single_quote_content,
		echar,
		uchar,
	);
	let string_literal_long_single_quote = long_string(
		&mut g,
		"STRING_LITERAL_LONG_SINGLE_QUOTE",
		'\'',
		is_long_single_quote_content,
		echar,
		uchar,
	)?;
	let string_literal_long_quote = long_string(
		&mut g,
		"STRING_LITERAL_LONG_QUOTE",
		'"',
		is_long_quote_content,
		echar,
		uchar,
	)?;
	let string = g.rule(
		"String",
		alternation(&[
			string_literal_quote,
			string_literal_single_quote,
			string_literal_long_single_quote,
			string_literal_long_quote,
		]),
	);

	let carets = g.literal("^^");
	let datatype = g.sequence(&[carets, iri]);
	let annotation = g.alternation(&[langtag, datatype]);
	let annotation = g.optional(annotation);
	let rdf_literal = g.rule("RDFLiteral", sequence(&[string, annotation]));
	let literal = g.rule(
		"literal",
		alternation(&[rdf_literal, numeric_literal, boolean_literal]),
	);

	// Triples.
	let open_paren = g.literal("(");
	let close_paren = g.literal(")");
	let member = g.tolerant_sequence(&[object]);
	let members = g.zero_or_more(member);
	let collection = g.rule(
		"collection",
		tolerant_sequence(&[open_paren, members, close_paren]),
	);
	let blank_node_property_list = g.rule(
		"blankNodePropertyList",
		tolerant_sequence(&[open_bracket, predicate_object_list, close_bracket]),
	);

	let subject = g.rule("subject", alternation(&[iri, blank_node, collection]));
	let predicate = g.rule("predicate", alternation(&[iri]));
	let a = g.literal("a");
	let verb = g.rule("verb", alternation(&[predicate, a]));
	g.define(
		object,
		alternation(&[iri, blank_node, collection, blank_node_property_list, literal]),
	)?;

	let comma = g.literal(",");
	let next_object = g.tolerant_sequence(&[comma, object]);
	let next_objects = g.zero_or_more(next_object);
	let object_list = g.rule("objectList", tolerant_sequence(&[object, next_objects]));

	let semicolon = g.literal(";");
	let next_predicate = g.tolerant_sequence(&[verb, object_list]);
	let next_predicate = g.optional(next_predicate);
	let next_predicate = g.tolerant_sequence(&[semicolon, next_predicate]);
	let next_predicates = g.zero_or_more(next_predicate);
	g.define(
		predicate_object_list,
		tolerant_sequence(&[verb, object_list, next_predicates]),
	)?;

	let subject_triples = g.tolerant_sequence(&[subject, predicate_object_list]);
	let optional_predicate_object_list = g.optional(predicate_object_list);
	let blank_triples =
		g.tolerant_sequence(&[blank_node_property_list, optional_predicate_object_list]);
	let triples = g.rule("triples", alternation(&[subject_triples, blank_triples]));

	// Directives.
	let at_prefix = g.literal("@prefix");
	let prefix_id = g.rule("prefixID", tolerant_sequence(&[at_prefix, pname_ns, iriref, dot]));
	let at_base = g.literal("@base");
	let base = g.rule("base", tolerant_sequence(&[at_base, iriref, dot]));
	let sparql_prefix_keyword = g.literal_case_insensitive("PREFIX");
	let sparql_prefix = g.rule(
		"sparqlPrefix",
		tolerant_sequence(&[sparql_prefix_keyword, pname_ns, iriref]),
	);
	let sparql_base_keyword = g.literal_case_insensitive("BASE");
	let sparql_base = g.rule("sparqlBase", tolerant_sequence(&[sparql_base_keyword, iriref]));
	let directive = g.rule(
		"directive",
		alternation(&[prefix_id, base, sparql_prefix, sparql_base]),
	);

	let triples_statement = g.tolerant_sequence(&[triples, dot]);
	let statement = g.rule("statement", alternation(&[directive, triples_statement]));
	let turtle_doc = g.rule("turtleDoc", Kind::ZeroOrMore(statement));

	g.build(turtle_doc)
}

/// `q ([^q\\\n\r] | ECHAR | UCHAR)* q`
fn short_string(
	g: &mut GrammarBuilder,
	name: &'static str,
	quote: &str,
	content: fn(char) -> bool,
	echar: RuleId,
	uchar: RuleId,
) -> RuleId {
	let open = g.literal(quote);
	let close = g.literal(quote);
	let content = g.character_class(content);
	let content = g.alternation(&[content, echar, uchar]);
	let body = g.zero_or_more(content);
	g.terminal(name, sequence(&[open, body, close]))
}

/// `qqq ((q | qq)? ([^q\\] | ECHAR | UCHAR))* qqq`, as
///
/// ```text
/// body ::= qqq | C+ body | q C+ body | qq C+ body
/// ```
fn long_string(
	g: &mut GrammarBuilder,
	name: &'static str,
	quote: char,
	content: fn(char) -> bool,
	echar: RuleId,
	uchar: RuleId,
) -> Result<RuleId, GrammarError> {
	let one = quote.to_string();
	let two = one.repeat(2);
	let three = one.repeat(3);

	let content = g.character_class(content);
	let content = g.alternation(&[content, echar, uchar]);
	let contents = g.one_or_more(content);

	let body = g.declare("longStringBody");
	let close = g.literal(&three);
	let plain = g.sequence(&[contents, body]);
	let q = g.literal(&one);
	let single = g.sequence(&[q, contents, body]);
	let qq = g.literal(&two);
	let double = g.sequence(&[qq, contents, body]);
	g.define(body, alternation(&[close, plain, single, double]))?;

	let open = g.literal(&three);
	Ok(g.terminal(name, sequence(&[open, body])))
}
