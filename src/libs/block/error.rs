use crate::libs::block::NodeId;
use thiserror::Error;

/// Failures surfaced by the block engine. A failed operation leaves the
/// block it was invoked on unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// An edit references a position outside the consensus, or an insertion
    /// does not fit its gap cluster.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// `concat` was given blocks whose member sets differ.
    #[error("member sets differ: {0}")]
    MemberSetMismatch(String),

    /// `append` was given a node that is already a member.
    #[error("node {0} is already a member")]
    DuplicateMember(NodeId),

    /// Merging edit maps would place two different values at the same key.
    #[error("conflicting edits: {0}")]
    EditCollision(String),

    /// An alignment interval exceeds a parent's consensus length.
    #[error("alignment out of range: {0}")]
    AlignmentOutOfRange(String),

    /// A CIGAR contains an unknown op or its spans do not match the
    /// alignment intervals.
    #[error("malformed cigar: {0}")]
    MalformedCigar(String),
}
