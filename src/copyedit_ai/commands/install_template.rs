use crate::commands::{CmdMessage, CmdResult};
use crate::copyedit::default_template;
use crate::error::{CopyeditError, Result};
use crate::template::PromptTemplate;
use crate::user_dir::RuntimeContext;

/// Install the copyedit prompt template under `name`. Refuses to overwrite
/// an existing template unless `force` is set.
pub fn run(ctx: &RuntimeContext, name: &str, force: bool) -> Result<CmdResult> {
    ctx.initialize(false)?;

    let templates_dir = ctx.templates_dir();
    if PromptTemplate::path_for(&templates_dir, name).exists() && !force {
        return Err(CopyeditError::AlreadyExists(name.to_string()));
    }
    let path = default_template().save(&templates_dir, name)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Installed template '{name}'")));
    result.add_message(CmdMessage::info(format!("Location: {}", path.display())));
    result.add_message(CmdMessage::info(format!(
        "Usage: llm -t {name} 'Your text here'"
    )));
    Ok(result)
}
