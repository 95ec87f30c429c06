//! govsubmit - validation and submission core for governance proposals
//!
//! Drafts are edited through a reducer-driven [`state::Editor`], checked
//! against a declarative schema, gated on voting power and sent to the
//! governance API by [`app::App`].

pub mod api;
pub mod app;
pub mod config;
pub mod state;
