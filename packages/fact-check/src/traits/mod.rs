//! Core trait abstractions for the fact-check library.
//!
//! These traits define the seams applications implement or swap out:
//! the generative-text vendor, the local agent service, and storage.

pub mod agent;
pub mod backend;
pub mod store;
