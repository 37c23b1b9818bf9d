use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::service::ModelService;

/// List installed prompt templates with one-line summaries.
pub fn run<M: ModelService>(service: &M) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.templates = service.list_templates()?;
    if result.templates.is_empty() {
        result.add_message(CmdMessage::warning(
            "No templates installed. Run: copyedit_ai self init",
        ));
    }
    Ok(result)
}
