// Errors raised while turning an external document into the internal tree.
//
// Everything below the document level is tolerant: absent or malformed fields
// degrade to defaults and never produce an error. Only conditions that make a
// whole document unusable are reported, and the corpus layer skips such a
// document without aborting the run.

/// A document that cannot be analyzed at all.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("document {document_id}: root data is not a node")]
    RootNotANode { document_id: String },

    #[error("node nesting exceeds {limit} levels")]
    TooDeep { limit: usize },
}
