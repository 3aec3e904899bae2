use crate::term::Triple;
use rdf_types::RdfDisplay;
use std::collections::HashMap;

/// Document scoped parsing state.
///
/// Shared by every node of a parse tree, it is handed down explicitly through
/// each `push` call.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Session {
	base_iri: Option<String>,
	prefixes: HashMap<String, String>,
	subject: Option<String>,
	predicate: Option<String>,
	triples: Vec<Triple>,
}

impl Session {
	pub fn new(base_iri: Option<String>) -> Self {
		Self {
			base_iri,
			..Self::default()
		}
	}

	pub fn base_iri(&self) -> Option<&str> {
		self.base_iri.as_deref()
	}

	pub fn set_base_iri(&mut self, iri: String) {
		log::debug!("base <{iri}>");
		self.base_iri = Some(iri)
	}

	pub fn prefix(&self, prefix: &str) -> Option<&str> {
		self.prefixes.get(prefix).map(String::as_str)
	}

	pub fn insert_prefix(&mut self, prefix: String, iri: String) {
		log::debug!("prefix {prefix}: <{iri}>");
		self.prefixes.insert(prefix, iri);
	}

	pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
		self.prefixes.iter().map(|(p, i)| (p.as_str(), i.as_str()))
	}

	pub fn subject(&self) -> Option<&str> {
		self.subject.as_deref()
	}

	pub fn set_subject(&mut self, subject: Option<String>) {
		self.subject = subject
	}

	pub fn predicate(&self) -> Option<&str> {
		self.predicate.as_deref()
	}

	pub fn set_predicate(&mut self, predicate: Option<String>) {
		self.predicate = predicate
	}

	pub fn emit(&mut self, triple: Triple) {
		log::trace!("triple {} .", triple.rdf_display());
		self.triples.push(triple)
	}

	pub fn triples(&self) -> &[Triple] {
		&self.triples
	}

	pub fn take_triples(&mut self) -> Vec<Triple> {
		std::mem::take(&mut self.triples)
	}

	/// Forgets statement scoped state, keeping base and prefixes.
	pub fn restart(&mut self) {
		self.subject = None;
		self.predicate = None;
		self.triples.clear()
	}
}
