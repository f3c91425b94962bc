//! Container engine context and CPU capacity detection.
//!
//! `engine-info` asks the local container engine, through its command-line
//! front-end, which context it is serving and how many CPU cores it has. The
//! engine socket is never contacted directly. Every query is bounded by a short
//! probe deadline so that a hung engine surfaces as a clear timeout naming the
//! command that stalled.
//!
//! Docker and Podman are told apart by a liveness probe, `info --format
//! "{{ .Host }}"`, whose outcome selects the follow-up query.
//!
//! # Modules
//!
//! - [`api`]: Orchestration functions shared by the CLI and embedders
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: Bounded engine CLI queries
//! - [`error`]: Semantic error types for the application

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
