//! RDF terms built from extracted lexical values.
//!
//! Terms are the `rdf-types` ones, over `iref` IRIs and `langtag` language
//! tags. They are written back in N-Triples syntax through [`RdfDisplay`].
use iref::{Iri, IriBuf};
use langtag::LanguageTagBuf;
use rdf_types::RdfDisplay;
use static_iref::iri;

pub const RDF_TYPE: Iri<'static> = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const XSD_BOOLEAN: Iri<'static> = iri!("http://www.w3.org/2001/XMLSchema#boolean");
pub const XSD_INTEGER: Iri<'static> = iri!("http://www.w3.org/2001/XMLSchema#integer");
pub const XSD_DECIMAL: Iri<'static> = iri!("http://www.w3.org/2001/XMLSchema#decimal");
pub const XSD_DOUBLE: Iri<'static> = iri!("http://www.w3.org/2001/XMLSchema#double");

pub type Literal = rdf_types::Literal;

pub type Object = rdf_types::Object;

/// Triple with an IRI predicate.
pub type Triple = rdf_types::Triple<rdf_types::Subject, IriBuf, Object>;

/// Parses an absolute IRI.
pub fn parse_iri(iri: &str) -> Option<IriBuf> {
	match IriBuf::new(iri) {
		Ok(iri) => Some(iri),
		Err(e) => {
			log::trace!("invalid IRI <{iri}>: {e:?}");
			None
		}
	}
}

/// Simple literal, implicitly typed `xsd:string`.
pub fn string_literal(lexical: String) -> Literal {
	rdf_types::Literal::String(lexical.into())
}

pub fn typed_literal(lexical: String, datatype: IriBuf) -> Literal {
	rdf_types::Literal::TypedString(lexical.into(), datatype)
}

/// Language tagged string, if `tag` is a well formed language tag.
pub fn language_tagged_literal(lexical: String, tag: &str) -> Option<Literal> {
	match LanguageTagBuf::new(tag.as_bytes().to_vec()) {
		Ok(tag) => Some(rdf_types::Literal::LangString(lexical.into(), tag)),
		Err(_) => {
			log::trace!("invalid language tag `{tag}`");
			None
		}
	}
}

/// Builds a triple, provided the subject and predicate are valid IRIs.
pub fn triple(subject: &str, predicate: &str, object: Object) -> Option<Triple> {
	Some(rdf_types::Triple(
		rdf_types::Subject::Iri(parse_iri(subject)?),
		parse_iri(predicate)?,
		object,
	))
}

/// N-Triples statement, terminating dot included.
pub fn to_ntriples(triple: &Triple) -> String {
	format!("{} .", triple.rdf_display())
}
