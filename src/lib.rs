//! Short-term financial stability engine.
//!
//! `core` turns monthly figures into ratios, a 0-100 score, a risk zone,
//! 3/6-month projections and rule-based advice. `advisor` layers an optional
//! text-generation collaborator on top, and `api` exposes both over HTTP.

pub mod advisor;
pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod narrator;
