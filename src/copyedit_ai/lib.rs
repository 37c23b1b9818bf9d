//! # copyedit_ai
//!
//! Copyedit text from the CLI using AI.
//!
//! The interesting parts of this crate are not the model call (that is
//! delegated wholesale to the external `llm` tool) but the two subsystems
//! around it:
//!
//! - **Isolated configuration** ([`user_dir`]): templates and model aliases
//!   live in a dedicated tree under the user's config directory,
//!   `<app config dir>/llm_config`, created with owner-only permissions.
//!   The external tool is pointed at it through the `LLM_USER_PATH`
//!   environment variable, so a system-wide `llm` installation is never
//!   read or written. An explicit `LLM_USER_PATH` set by the user always
//!   wins.
//!
//! - **Safe file replacement** ([`replace`]): `--replace` stages the
//!   generated text in a temp file, asks for an explicit yes/no
//!   confirmation (default no), and only then copies the original to a
//!   `.bak` backup before overwriting it. The staging file is left on disk
//!   either way so the generated text is never lost.
//!
//! ## Layering
//!
//! The binary (`main.rs` + `args.rs`) owns argument parsing, terminal
//! output, and exit codes. The [`commands`] modules hold the business logic
//! and return structured [`commands::CmdResult`] values. The model call
//! sits behind the [`service::ModelService`] trait so tests never need a
//! real model.

pub mod commands;
pub mod copyedit;
pub mod error;
pub mod replace;
pub mod service;
pub mod settings;
pub mod template;
pub mod user_dir;
