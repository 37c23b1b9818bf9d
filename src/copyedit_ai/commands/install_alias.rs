use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::user_dir::RuntimeContext;
use std::collections::BTreeMap;
use std::fs;

/// Upsert a model alias into `aliases.json`. The file is rewritten whole,
/// never appended to.
pub fn run(ctx: &RuntimeContext, alias: &str, model_id: &str) -> Result<CmdResult> {
    ctx.initialize(false)?;

    let path = ctx.aliases_path();
    let mut aliases: BTreeMap<String, String> = if path.is_file() {
        serde_json::from_str(&fs::read_to_string(&path)?)?
    } else {
        BTreeMap::new()
    };
    aliases.insert(alias.to_string(), model_id.to_string());
    fs::write(&path, serde_json::to_string_pretty(&aliases)?)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Installed alias '{alias}' -> '{model_id}'"
    )));
    result.add_message(CmdMessage::info(format!(
        "Usage: copyedit_ai -m {alias} 'Your text here'"
    )));
    Ok(result)
}
