//! Core copyediting flow: the fixed system prompt and the call into the
//! model service, using the installed `copyedit` template.

use crate::error::{CopyeditError, Result};
use crate::service::{ModelOutput, ModelService};
use crate::template::PromptTemplate;
use crate::user_dir::RuntimeContext;
use tracing::debug;

/// Name of the template `edit` loads its system prompt from.
pub const DEFAULT_TEMPLATE: &str = "copyedit";

pub const SYSTEM_PROMPT: &str = "\
You are copyeditor that suggests and makes edits on text.

You review the text you receive for punctuation, grammatical,
spelling, and logical errors. Try hard to keep the style and tone but
make corrections as needed. Summarize any corrections you made at the
bottom of the text in bullet point format.

Don't make any commentary at the beginning of your output. Just output
the corrected code to start off. Use a string of '=' characters to
separate corrected text from your comments.

Always, always, always output the document to start. Even if you don't
make any changes. Do not ignore this instruction.

If the text looks like markdown, ignore fenced quotes or leading text with
> . Don't edit the quoted text.

Do not modify emojis.
";

/// The full prompt sent for a piece of input text.
pub fn prompt_for(text: &str) -> String {
    format!("Copy edit the text that follows:\n\n{text}")
}

/// The template `self init` and `self install-template` write.
pub fn default_template() -> PromptTemplate {
    PromptTemplate {
        system: Some(SYSTEM_PROMPT.trim().to_string()),
        prompt: Some("Copy edit the text that follows:\n\n$input".to_string()),
    }
}

/// Copyedit `text` through the model service.
///
/// Requires an initialized configuration tree with the `copyedit` template
/// installed; both are created by `self init`.
pub fn copyedit<M: ModelService>(
    service: &M,
    ctx: &RuntimeContext,
    text: &str,
    model_name: Option<&str>,
    stream: bool,
) -> Result<ModelOutput> {
    if !ctx.is_initialized() {
        return Err(CopyeditError::NotInitialized);
    }
    let template = PromptTemplate::load(&ctx.templates_dir(), DEFAULT_TEMPLATE)
        .map_err(|_| CopyeditError::NotInitialized)?;

    debug!(model = ?model_name, stream, "copyediting text");
    service.generate(&prompt_for(text), template.system.as_deref(), model_name, stream)
}
