use crate::commands::{CmdMessage, CmdResult};
use crate::copyedit;
use crate::error::{CopyeditError, Result};
use crate::replace::{self, ConfirmPrompt, ReplaceOutcome};
use crate::service::{ModelOutput, ModelService};
use crate::user_dir::RuntimeContext;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Where the input text came from. Replace mode needs a real file to write
/// back to, so the distinction is load-bearing.
#[derive(Debug, Clone)]
pub enum EditSource {
    File(PathBuf),
    Stdin(String),
}

/// Run the copyedit flow: read the input, generate the corrected text, and
/// either write it to `out` or drive the replace workflow.
#[allow(clippy::too_many_arguments)]
pub fn run<M: ModelService, C: ConfirmPrompt, W: Write>(
    service: &M,
    ctx: &RuntimeContext,
    source: &EditSource,
    model: Option<&str>,
    stream: bool,
    replace: bool,
    confirm: &mut C,
    out: &mut W,
) -> Result<CmdResult> {
    // Rejected before generation or any filesystem write happens.
    if replace && matches!(source, EditSource::Stdin(_)) {
        return Err(CopyeditError::Usage(
            "--replace requires a file argument, not stdin".to_string(),
        ));
    }

    let text = match source {
        EditSource::File(path) => {
            debug!(path = %path.display(), "reading input file");
            fs::read_to_string(path)?
        }
        EditSource::Stdin(text) => text.clone(),
    };
    if text.trim().is_empty() {
        return Err(CopyeditError::Usage("No input text provided".to_string()));
    }

    let output = copyedit::copyedit(service, ctx, &text, model, stream)?;

    // Collect the generated text; in plain mode stream it straight through.
    let generated = match output {
        ModelOutput::Complete(generated) => {
            if !replace {
                writeln!(out, "{generated}")?;
            }
            generated
        }
        ModelOutput::Stream(chunks) => {
            let mut collected = String::new();
            for chunk in chunks {
                let chunk = chunk?;
                if !replace {
                    write!(out, "{chunk}")?;
                    out.flush()?;
                }
                collected.push_str(&chunk);
            }
            if !replace {
                writeln!(out)?;
            }
            collected
        }
    };

    let mut result = CmdResult::default();
    if let EditSource::File(path) = source {
        if replace {
            match replace::run(path, &generated, confirm)? {
                ReplaceOutcome::Replaced { backup, staged } => {
                    result.add_message(CmdMessage::success(format!(
                        "File replaced successfully. Backup saved to: {}",
                        backup.display()
                    )));
                    result.backup = Some(backup);
                    result.staged = Some(staged);
                }
                ReplaceOutcome::Declined { staged } => {
                    result.add_message(CmdMessage::info(format!(
                        "Replacement cancelled. Copyedited version saved in: {}",
                        staged.display()
                    )));
                    result.staged = Some(staged);
                }
            }
        }
    }
    Ok(result)
}
