use crate::commands::{CmdMessage, CmdResult};
use crate::copyedit::{default_template, DEFAULT_TEMPLATE};
use crate::error::Result;
use crate::template::PromptTemplate;
use crate::user_dir::RuntimeContext;
use std::path::Path;

/// Create the isolated configuration tree, import any pre-existing system
/// `llm` configuration from `legacy_source`, and install the default
/// copyedit template.
pub fn run(ctx: &RuntimeContext, force: bool, legacy_source: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    ctx.initialize(force)?;
    result.add_message(CmdMessage::success(format!(
        "Initialized configuration at {}",
        ctx.app_config_dir().display()
    )));

    let imported = ctx.import_system_config(legacy_source)?;
    for item in &imported {
        result.add_message(CmdMessage::info(format!("Imported {item}")));
    }
    result.imported = imported;

    let templates_dir = ctx.templates_dir();
    if !PromptTemplate::path_for(&templates_dir, DEFAULT_TEMPLATE).exists() {
        default_template().save(&templates_dir, DEFAULT_TEMPLATE)?;
        result.add_message(CmdMessage::info(format!(
            "Installed default '{DEFAULT_TEMPLATE}' template"
        )));
    }

    Ok(result)
}
