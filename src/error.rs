use crate::grammar::GrammarError;

/// Errors of the editing assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Grammar(#[from] GrammarError),

	#[error("position {row}:{column} is outside of the document")]
	Position { row: usize, column: usize },
}
