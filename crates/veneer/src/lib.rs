//! Veneer - the command line front end for the brand theme compiler.
//!
//! The heavy lifting lives in [`veneer_tokens`]; this crate adds the
//! parts a build tool needs around it:
//!
//! - the `build` / `diff` / `list` command surface,
//! - an optional `veneer.toml` configuration file,
//! - watch mode: a debounced rebuild loop over filesystem events.
//!
//! The modules are public so integration tests can drive the build
//! orchestration directly, without spawning the binary.

pub mod build;
pub mod cli;
pub mod config;
pub mod watch;
