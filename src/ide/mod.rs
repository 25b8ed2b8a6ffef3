//! IDE features: diagnostics, go-to-definition, find-references.
//!
//! A position query is classified into exactly one context and routed to
//! the resolver that can answer it. The public surface lives on
//! [`AnalysisHost`] / [`Analysis`].

pub mod analysis;
pub mod classify;
mod goto;
mod references;

pub use analysis::{Analysis, AnalysisHost};
pub use classify::{PositionContext, classify};
