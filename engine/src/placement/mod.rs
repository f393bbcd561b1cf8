//! Placement module
//!
//! The only code that writes item transforms. A [`PlacementTransaction`]
//! turns one drag, nudge or rotate into a validated, snapped and settled
//! batch (or an exact rollback); the [`Planner`] owns an arrangement and
//! drives transactions against it.
//!
//! # Drop pipeline
//!
//! ```text
//! validate -> snap (drop only) -> settle bottom-up -> one batch commit
//! ```

pub mod planner;
pub mod transaction;

pub use planner::Planner;
pub use transaction::{
    Candidate, MemberStart, MemberStatus, PlacementTransaction, TransactionOutcome,
    TransactionState, Validation,
};
