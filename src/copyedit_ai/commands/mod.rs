//! Command layer: business logic for each CLI command.
//!
//! Commands operate on Rust types and return a structured [`CmdResult`];
//! terminal formatting and exit codes belong to the binary. The one
//! exception is the interactive replace confirmation, which is injected
//! through the [`crate::replace::ConfirmPrompt`] seam.

use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod edit;
pub mod init;
pub mod install_alias;
pub mod install_template;
pub mod paths;
pub mod templates;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Structured result of one command run.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    /// Items copied by a legacy-config import.
    pub imported: Vec<String>,
    /// Template name -> one-line summary, for listings.
    pub templates: BTreeMap<String, String>,
    /// Labeled paths, for the `paths` command.
    pub paths: Vec<(String, PathBuf)>,
    /// Backup written by a confirmed replace.
    pub backup: Option<PathBuf>,
    /// Staging file left on disk by replace mode.
    pub staged: Option<PathBuf>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }
}
