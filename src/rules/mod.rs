//! Problem definition trait for search domains.
//!
//! Domains implement `ProblemState` to define:
//! - When a decision sequence has ended
//! - What a finished sequence is worth
//! - How to move one round forward at random
//!
//! The search engine calls into `ProblemState` but never interprets
//! domain-specific concepts directly.

pub mod problem;

pub use problem::ProblemState;
