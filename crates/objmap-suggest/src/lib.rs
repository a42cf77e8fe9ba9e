#![deny(unsafe_code)]

//! Bootstraps mapping configuration from two type definitions.
//!
//! Field declarations are extracted structurally from both files, each
//! source field is paired with the best-named target field, and every pair
//! is confirmed through a [`Prompt`]. The result is a mapping entry in the
//! configuration format read by `objmap-map`.

pub mod error;
pub mod extract;
pub mod matcher;
pub mod session;

pub use error::{ExtractError, SuggestError};
pub use extract::{FieldDecl, SourceSyntax, TypeOutline, extract_file, extract_str};
pub use matcher::{Candidate, MAX_EDIT_DISTANCE, MatchKind, MatchResult, best_match, match_fields};
pub use session::{AcceptAll, LinePrompt, Prompt, Suggester, Suggestion};
