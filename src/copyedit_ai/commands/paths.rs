use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::user_dir::{RuntimeContext, LLM_USER_PATH_VAR};
use std::env;
use std::path::PathBuf;

/// Report the resolved configuration paths and the effective llm config
/// root the external tool will see.
pub fn run(ctx: &RuntimeContext) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.paths.push((
        "app config dir".to_string(),
        ctx.app_config_dir().to_path_buf(),
    ));
    result.paths.push((
        "llm config dir".to_string(),
        ctx.llm_config_dir().to_path_buf(),
    ));
    match env::var_os(LLM_USER_PATH_VAR) {
        Some(value) => result.paths.push((
            format!("{LLM_USER_PATH_VAR} (user override)"),
            PathBuf::from(value),
        )),
        None => result
            .paths
            .push((LLM_USER_PATH_VAR.to_string(), ctx.llm_config_dir().to_path_buf())),
    }
    if !ctx.is_initialized() {
        result.add_message(CmdMessage::warning(
            "Configuration not initialized. Run: copyedit_ai self init",
        ));
    }
    Ok(result)
}
