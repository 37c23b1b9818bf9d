//! Staged, confirmed file replacement.
//!
//! Replace mode never touches the original file until the user has
//! confirmed against a fully written staging copy, and a `.bak` backup is
//! taken strictly before the overwrite. The staging file is deliberately
//! left on disk in both the confirm and decline paths: its path is reported
//! to the user, who may want to keep it.

use crate::error::{CopyeditError, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Answers the replace confirmation question.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Reads a yes/no answer from stdin. The default is no; EOF or an
/// interrupted prompt also means no.
pub struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        eprint!("{message} [y/N]: ");
        io::stderr().flush()?;
        let mut answer = String::new();
        let read = io::stdin().lock().read_line(&mut answer)?;
        if read == 0 {
            return Ok(false);
        }
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

/// A staged replacement: generated content written to a temp file, original
/// untouched.
#[derive(Debug)]
pub struct StagedReplace {
    pub original: PathBuf,
    pub staged: PathBuf,
}

/// Outcome of one replace workflow run.
#[derive(Debug)]
pub enum ReplaceOutcome {
    Replaced { backup: PathBuf, staged: PathBuf },
    Declined { staged: PathBuf },
}

/// Write `content` to a uniquely named temp file in the system temp
/// directory, named `<stem>_copyedit_<token><suffix>`.
///
/// The handle is closed before returning, so the staged copy is fully
/// flushed and inspectable while the confirmation prompt is up.
pub fn stage(original: &Path, content: &str) -> Result<StagedReplace> {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let prefix = format!("{stem}_copyedit_");
    let suffix = original
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()));

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix);
    if let Some(suffix) = &suffix {
        builder.suffix(suffix.as_str());
    }
    let mut file = builder.tempfile()?;
    file.write_all(content.as_bytes())?;
    // keep() persists the file past the NamedTempFile guard.
    let (handle, staged) = file.keep().map_err(|e| CopyeditError::Io(e.error))?;
    drop(handle);

    info!(staged = %staged.display(), "wrote copyedited content to staging file");
    Ok(StagedReplace {
        original: original.to_path_buf(),
        staged,
    })
}

/// `<original>.bak`, e.g. `draft.md` becomes `draft.md.bak`.
pub fn backup_path(original: &Path) -> PathBuf {
    let mut name = original.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Back up the original, then overwrite it with the staged content.
///
/// The backup is written strictly before the overwrite, so a failure here
/// leaves the original intact. Returns the backup path.
pub fn commit(staged: &StagedReplace) -> Result<PathBuf> {
    let backup = backup_path(&staged.original);
    copy_preserving(&staged.original, &backup)?;
    info!(backup = %backup.display(), "created backup");
    copy_preserving(&staged.staged, &staged.original)?;
    info!(file = %staged.original.display(), "replaced with copyedited version");
    Ok(backup)
}

/// Copy like `cp -p`: `fs::copy` carries permissions, and the source's
/// modification time is restored on the destination afterwards.
fn copy_preserving(src: &Path, dst: &Path) -> Result<()> {
    let mtime = fs::metadata(src)?.modified().ok();
    fs::copy(src, dst)?;
    if let Some(mtime) = mtime {
        let file = fs::OpenOptions::new().write(true).open(dst)?;
        file.set_modified(mtime)?;
    }
    Ok(())
}

/// Run the full workflow for already-generated content: stage, confirm,
/// and on acceptance back up and overwrite.
pub fn run<C: ConfirmPrompt>(
    original: &Path,
    content: &str,
    prompt: &mut C,
) -> Result<ReplaceOutcome> {
    let staged = stage(original, content)?;
    let message = format!(
        "\nCopyedited content written to: {}\nOriginal file: {}\n\nReplace the original file with the copyedited version?",
        staged.staged.display(),
        original.display()
    );
    if prompt.confirm(&message)? {
        let backup = commit(&staged)?;
        Ok(ReplaceOutcome::Replaced {
            backup,
            staged: staged.staged,
        })
    } else {
        info!("user declined replacement");
        Ok(ReplaceOutcome::Declined {
            staged: staged.staged,
        })
    }
}
