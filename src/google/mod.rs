//! Google Custom Search collaborator.

pub mod client;

pub use client::{GoogleClient, SearchApi};
