//! Methodology agents for the QualAgents pipeline
//!
//! An "agent" here is a named analysis strategy identifier (for example
//! `grounded-theory`): a label selecting a template set, not an autonomous
//! process. This crate provides:
//! - The agent identifier type and methodology labels
//! - The static catalog of known methodology agents
//! - A seedable `RandomSource` seam
//! - The mock insight generator, isolated behind `InsightGenerator` so a
//!   real inference call can replace it without touching the processor

#![warn(unreachable_pub)]

pub mod catalog;
pub mod generator;
pub mod random;
pub mod types;

pub use catalog::{AgentCatalog, AgentProfile};
pub use generator::{InsightGenerator, MockInsightGenerator};
pub use random::{RandomSource, SeededRandom};
pub use types::{AgentId, AgentResult, ResultId};
