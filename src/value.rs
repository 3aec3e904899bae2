//! Semantic values of parse nodes.
//!
//! See <https://www.w3.org/TR/turtle/#sec-parsing-terms>.
use crate::node::{ParseNode, State};
use crate::session::Session;
use crate::term::{
	language_tagged_literal, parse_iri, string_literal, typed_literal, Literal, Object,
	XSD_BOOLEAN, XSD_DECIMAL, XSD_DOUBLE, XSD_INTEGER,
};
use iref::Iri;

/// Value extracted from a satisfied node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Value {
	/// IRI, prefix label or lexical form.
	Text(String),
	Literal(Literal),
}

impl Value {
	pub fn into_iri(self) -> Option<String> {
		match self {
			Self::Text(iri) => Some(iri),
			Self::Literal(_) => None,
		}
	}

	/// Object term, if the text is a valid IRI.
	pub fn into_term(self) -> Option<Object> {
		match self {
			Self::Text(iri) => parse_iri(&iri).map(rdf_types::Object::Iri),
			Self::Literal(l) => Some(rdf_types::Object::Literal(l)),
		}
	}
}

impl ParseNode {
	/// Semantic value of this node, if it has one.
	pub fn value(&self, session: &Session) -> Option<Value> {
		self.value_in(session, None)
	}

	/// Semantic value of this node when found under a rule named `parent`.
	pub fn value_in(&self, session: &Session, parent: Option<&str>) -> Option<Value> {
		let text = self.text();
		match self.name() {
			"IRIREF" => {
				let iri = unescape_numeric(strip(text, 1)?);
				resolve(&iri, session.base_iri()).map(Value::Text)
			}
			"PNAME_NS" => {
				let prefix = text.strip_suffix(':')?;
				match parent {
					Some("PNAME_LN" | "PrefixedName") => {
						session.prefix(prefix).map(|iri| Value::Text(iri.to_owned()))
					}
					_ => Some(Value::Text(prefix.to_owned())),
				}
			}
			"PNAME_LN" => {
				let ns = self.children().first()?;
				let namespace = ns.value_in(session, Some("PNAME_LN"))?.into_iri()?;
				let local = text.get(ns.text().len()..)?;
				Some(Value::Text(namespace + &unescape_local(local)))
			}
			"STRING_LITERAL_QUOTE" | "STRING_LITERAL_SINGLE_QUOTE" => {
				Some(Value::Text(unescape_string(strip(text, 1)?)))
			}
			"STRING_LITERAL_LONG_QUOTE" | "STRING_LITERAL_LONG_SINGLE_QUOTE" => {
				Some(Value::Text(unescape_string(strip(text, 3)?)))
			}
			"LANGTAG" => text.strip_prefix('@').map(|tag| Value::Text(tag.to_owned())),
			"RDFLiteral" => {
				let lexical = self
					.find("String")?
					.value_in(session, Some("RDFLiteral"))?
					.into_iri()?;
				let literal = if let Some(tag) = self.find("LANGTAG") {
					language_tagged_literal(lexical, tag.text().strip_prefix('@')?)?
				} else if let Some(datatype) = self.find("iri") {
					let datatype = datatype.value_in(session, Some("RDFLiteral"))?.into_iri()?;
					typed_literal(lexical, parse_iri(&datatype)?)
				} else {
					string_literal(lexical)
				};
				Some(Value::Literal(literal))
			}
			"INTEGER" => Some(typed(text, XSD_INTEGER)),
			"DECIMAL" => Some(typed(text, XSD_DECIMAL)),
			"DOUBLE" => Some(typed(text, XSD_DOUBLE)),
			"BooleanLiteral" => Some(typed(text, XSD_BOOLEAN)),
			"BlankNode" | "blankNodePropertyList" | "collection" => None,
			name => {
				let mut values: Vec<Value> = match self.state() {
					State::Alternation(children) => children
						.iter()
						.find(|c| c.is_satisfied())
						.and_then(|c| c.value_in(session, Some(name)))
						.into_iter()
						.collect(),
					_ => self
						.children()
						.iter()
						.filter_map(|c| c.value_in(session, Some(name)))
						.collect(),
				};

				if values.len() > 1 && values.iter().all(|v| matches!(v, Value::Text(_))) {
					let joined = values
						.into_iter()
						.filter_map(Value::into_iri)
						.collect::<String>();
					Some(Value::Text(joined))
				} else if values.is_empty() {
					None
				} else {
					Some(values.swap_remove(0))
				}
			}
		}
	}
}

fn typed(lexical: &str, datatype: Iri<'static>) -> Value {
	Value::Literal(typed_literal(lexical.to_owned(), datatype.into()))
}

/// Removes `n` delimiter characters on each side.
fn strip(text: &str, n: usize) -> Option<&str> {
	if text.len() < 2 * n {
		return None;
	}

	text.get(n..text.len() - n)
}

/// Resolves an IRI reference against the base IRI, if any.
pub fn resolve(iri_ref: &str, base: Option<&str>) -> Option<String> {
	match base {
		Some(base) => match url::Url::parse(base).and_then(|base| base.join(iri_ref)) {
			Ok(iri) => Some(iri.to_string()),
			Err(e) => {
				log::trace!("cannot resolve <{iri_ref}> against <{base}>: {e}");
				None
			}
		},
		None => Some(iri_ref.to_owned()),
	}
}

/// Decodes `\uXXXX` and `\UXXXXXXXX` escapes.
pub fn unescape_numeric(s: &str) -> String {
	decode(s, false)
}

/// Decodes numeric escapes and `\t \b \n \r \f \" \' \\`.
pub fn unescape_string(s: &str) -> String {
	decode(s, true)
}

/// Decodes `PN_LOCAL_ESC` escapes such as `\-` or `\.`.
pub fn unescape_local(s: &str) -> String {
	let mut result = String::with_capacity(s.len());
	let mut chars = s.chars().peekable();
	while let Some(c) = chars.next() {
		match (c, chars.peek()) {
			('\\', Some(&e)) if is_local_escape(e) => {
				result.push(e);
				chars.next();
			}
			(c, _) => result.push(c),
		}
	}
	result
}

fn is_local_escape(c: char) -> bool {
	matches!(
		c,
		'_' | '~' | '.' | '-' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ','
			| ';' | '=' | '/' | '?' | '#' | '@' | '%'
	)
}

fn decode(s: &str, string_escapes: bool) -> String {
	let mut result = String::with_capacity(s.len());
	let mut rest = s;
	while let Some(i) = rest.find('\\') {
		result.push_str(&rest[..i]);
		let escape = &rest[i..];
		let (decoded, consumed) = match escape.chars().nth(1) {
			Some('u') => (hex_char(escape.get(2..6)), 6),
			Some('U') => (hex_char(escape.get(2..10)), 10),
			Some(c) if string_escapes => (
				match c {
					't' => Some('\t'),
					'b' => Some('\u{08}'),
					'n' => Some('\n'),
					'r' => Some('\r'),
					'f' => Some('\u{0c}'),
					'\'' => Some('\''),
					'"' => Some('"'),
					'\\' => Some('\\'),
					_ => None,
				},
				2,
			),
			_ => (None, 1),
		};

		match decoded {
			Some(c) => {
				result.push(c);
				rest = &escape[consumed..];
			}
			None => {
				result.push('\\');
				rest = &escape[1..];
			}
		}
	}
	result.push_str(rest);
	result
}

fn hex_char(digits: Option<&str>) -> Option<char> {
	let digits = digits?;
	if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
		return None;
	}

	char::from_u32(u32::from_str_radix(digits, 16).ok()?)
}
