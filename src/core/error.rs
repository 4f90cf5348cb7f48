//! Search error taxonomy.
//!
//! Every variant is a programming or configuration error. The search aborts
//! on the first one instead of producing statistically meaningless results.

use thiserror::Error;

use crate::mcts::NodeId;

/// Errors raised by the search engine and problem domains.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("computation budget must be at least 1, got {0}")]
    InvalidBudget(u32),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("reward requested for a non-terminal state: {0}")]
    NotTerminal(String),

    #[error("cannot search from a terminal root")]
    TerminalRoot,

    #[error("{0} has no children to select from")]
    NoChildren(NodeId),

    #[error("{0} has never been visited")]
    UnvisitedParent(NodeId),

    #[error("child {child} of {parent} has never been visited")]
    UnvisitedChild { parent: NodeId, child: NodeId },

    #[error("no novel successor for {node} after {attempts} attempts")]
    ExpansionExhausted { node: NodeId, attempts: u32 },

    #[error("{0} is not a child of the root")]
    NotRootChild(NodeId),
}

/// Convenience Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
