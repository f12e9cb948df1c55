//! End-to-end indexing and answering

mod answerer;
mod indexer;
mod session;

pub use answerer::{AskPhase, Answerer};
pub use indexer::{index_documents, IndexOutcome};
pub use session::{RagSession, SessionStatus};
