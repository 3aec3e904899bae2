//! Turtle is a textual syntax for RDF that allows an RDF graph to be completely
//! written in a compact and natural text form, with abbreviations for common
//! usage patterns and datatypes. This library provides an incremental Turtle
//! parser, fed one character at a time, and an editing assistant built on top
//! of it that formats Turtle documents as they are typed.
//!
//! ## Incremental parsing
//!
//! Grammars are rule tables built with a [`GrammarBuilder`]. A [`Parser`]
//! instantiates the start rule of a grammar and is fed characters with
//! [`Parser::push`]. At any point it can tell whether its text is a complete
//! match (`satisfied`) and whether it can still grow into one (`accepting`).
//! The Turtle grammar is provided by [`turtle::grammar`]. While parsing it
//! resolves IRIs against the base and prefixes declared so far and emits one
//! `rdf-types` [`Triple`] for each object it completes.
//!
//! ```rust
//! use std::rc::Rc;
//! use turtle_assist::{turtle, Parser, Session};
//!
//! let grammar = Rc::new(turtle::grammar()?);
//! let mut parser = Parser::new(grammar, Session::default());
//! parser.push_str("@prefix : <http://example.com/> .");
//! assert!(parser.is_satisfied());
//!
//! let mut parser = parser.clone_with(":s :p \"o\"@en .");
//! assert!(parser.is_satisfied());
//! assert_eq!(
//!   turtle_assist::to_ntriples(&parser.take_triples()[0]),
//!   "<http://example.com/s> <http://example.com/p> \"o\"@en ."
//! );
//! # Ok::<(), turtle_assist::GrammarError>(())
//! ```
//!
//! ## Editing assistance
//!
//! An [`Assistant`] is notified of every edit made to a [`TextHost`]. It
//! replays the part of the document touched by the edit through the assist
//! rules of the [`assist`] module, which indent statements, split object and
//! predicate lists and finish statements as they are typed. The rewritten
//! text is sent back to the host as one single replacement. Edits that cannot
//! lead to a valid document are undone.
//!
//! ```rust
//! use turtle_assist::{Assistant, AssistantConfig, Outcome, TextBuffer, TextHost};
//!
//! let mut assistant = Assistant::new(AssistantConfig::default())?;
//! let mut buffer = TextBuffer::default();
//!
//! for c in ":s :p :o\n".chars() {
//!   let delta = buffer.type_str(&c.to_string())?;
//!   let outcome = assistant.on_change(&mut buffer, &delta)?;
//!   if let Outcome::Accepted { cursor: Some(cursor), .. } = outcome {
//!     buffer.set_cursor(cursor)
//!   }
//! }
//!
//! assert_eq!(buffer.current_value(), ":s\n  :p :o .\n");
//! assert_eq!(assistant.statements().len(), 1);
//! # Ok::<(), turtle_assist::Error>(())
//! ```
pub mod assist;
pub mod changeset;
mod editor;
mod error;
pub mod grammar;
mod node;
mod session;
pub mod term;
pub mod turtle;
mod value;

pub use changeset::{Action, Changeset, EditDelta, Position, Range, Statement};
pub use editor::*;
pub use error::*;
pub use grammar::{Grammar, GrammarBuilder, GrammarError, Kind, RuleId};
pub use node::*;
pub use session::*;
pub use term::*;
pub use value::*;
