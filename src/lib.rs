//! Headless tree view
//!
//! A forest of nodes with selection, check, visibility and expansion state,
//! structural editing, a rendered visual tree and host events.
//!
//! Layers:
//! - [`domain`]: node data, the arena-backed forest, state sets, inline edit state
//! - [`application`]: the [`application::TreeView`] controller, rendering, events, scripts
//! - [`infrastructure`]: record files and service wiring
//! - [`cli`]: the `treeview` command line

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
