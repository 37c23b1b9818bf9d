//! Model Service boundary.
//!
//! The LLM call itself belongs to the external `llm` tool; this module owns
//! only the subprocess plumbing and the template listing. [`ModelService`]
//! is the seam the command layer talks to, so tests can substitute a mock
//! without a real model anywhere near them.

use crate::error::{CopyeditError, Result};
use crate::template::PromptTemplate;
use crate::user_dir::{RuntimeContext, LLM_USER_PATH_VAR};
use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use tracing::debug;

/// Output of a generation request: the full text, or a chunk stream.
#[derive(Debug)]
pub enum ModelOutput {
    Complete(String),
    Stream(ChunkStream),
}

impl ModelOutput {
    /// Drain into the full generated text.
    pub fn into_text(self) -> Result<String> {
        match self {
            ModelOutput::Complete(text) => Ok(text),
            ModelOutput::Stream(stream) => {
                let mut text = String::new();
                for chunk in stream {
                    text.push_str(&chunk?);
                }
                Ok(text)
            }
        }
    }
}

/// External collaborator that turns a prompt into corrected text.
pub trait ModelService {
    /// Generate text for `prompt` with an optional system prompt and model
    /// selection, either complete or as a chunk stream.
    fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        model: Option<&str>,
        stream: bool,
    ) -> Result<ModelOutput>;

    /// Installed prompt templates as name -> one-line summary.
    fn list_templates(&self) -> Result<BTreeMap<String, String>>;
}

/// Drives the external `llm` executable against the isolated configuration.
pub struct LlmClient {
    ctx: RuntimeContext,
    executable: PathBuf,
}

impl LlmClient {
    pub fn new(ctx: RuntimeContext) -> Self {
        Self {
            ctx,
            executable: PathBuf::from("llm"),
        }
    }

    /// Override the executable path. Used by tests.
    pub fn with_executable<P: Into<PathBuf>>(mut self, executable: P) -> Self {
        self.executable = executable.into();
        self
    }
}

impl ModelService for LlmClient {
    fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        model: Option<&str>,
        stream: bool,
    ) -> Result<ModelOutput> {
        let mut cmd = Command::new(&self.executable);
        // llm reads its configuration root from LLM_USER_PATH by contract;
        // bind the child explicitly so the isolation holds even if the
        // process-wide variable was never published.
        cmd.env(LLM_USER_PATH_VAR, self.ctx.llm_config_dir());
        cmd.arg("prompt");
        if let Some(system) = system {
            cmd.arg("-s").arg(system);
        }
        if let Some(model) = model {
            cmd.arg("-m").arg(model);
        }
        cmd.stdin(Stdio::piped()).stdout(Stdio::piped());
        if stream {
            cmd.stderr(Stdio::inherit());
        } else {
            cmd.arg("--no-stream");
            cmd.stderr(Stdio::piped());
        }

        debug!(exe = %self.executable.display(), model = ?model, stream, "spawning model subprocess");
        let mut child = cmd.spawn().map_err(|e| {
            CopyeditError::Model(format!(
                "failed to launch '{}': {}",
                self.executable.display(),
                e
            ))
        })?;

        // The child may fill its stdout pipe before draining stdin, so the
        // prompt is fed from a separate thread while this side reads. A
        // closed pipe just means the child stopped reading early; the exit
        // status carries the real story.
        let stdin = child.stdin.take();
        let prompt_bytes = prompt.as_bytes().to_vec();
        let writer = std::thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(&prompt_bytes);
                // Dropping the handle closes the pipe.
            }
        });

        if stream {
            let stdout = child
                .stdout
                .take()
                .ok_or_else(|| CopyeditError::Model("model subprocess has no stdout".to_string()))?;
            Ok(ModelOutput::Stream(ChunkStream::new(child, stdout, writer)))
        } else {
            let output = child.wait_with_output()?;
            let _ = writer.join();
            if !output.status.success() {
                return Err(subprocess_failure(output.status, &output.stderr));
            }
            Ok(ModelOutput::Complete(
                String::from_utf8_lossy(&output.stdout).into_owned(),
            ))
        }
    }

    fn list_templates(&self) -> Result<BTreeMap<String, String>> {
        list_templates_in(&self.ctx.templates_dir())
    }
}

fn subprocess_failure(status: ExitStatus, stderr: &[u8]) -> CopyeditError {
    let detail = String::from_utf8_lossy(stderr);
    let detail = detail.trim();
    if detail.is_empty() {
        CopyeditError::Model(format!("model subprocess exited with {status}"))
    } else {
        CopyeditError::Model(format!("model subprocess exited with {status}: {detail}"))
    }
}

/// Read every `*.yaml` template under `templates_dir`, skipping files that
/// fail to parse. A missing directory yields an empty map.
pub fn list_templates_in(templates_dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut templates = BTreeMap::new();
    if !templates_dir.is_dir() {
        return Ok(templates);
    }
    for entry in fs::read_dir(templates_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "yaml") {
            continue;
        }
        let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        match PromptTemplate::load_path(&path) {
            Ok(template) => {
                templates.insert(name, template.summary());
            }
            // Invalid template, skip.
            Err(_) => continue,
        }
    }
    Ok(templates)
}

/// Incremental chunks from a running model subprocess.
///
/// Yields UTF-8 text as the child produces it; a multi-byte sequence split
/// across reads is held back until complete. The child's exit status is
/// checked when the stream ends and surfaced as the final item on failure.
#[derive(Debug)]
pub struct ChunkStream {
    child: Child,
    stdout: ChildStdout,
    writer: Option<std::thread::JoinHandle<()>>,
    pending: Vec<u8>,
    done: bool,
    reaped: bool,
}

impl ChunkStream {
    fn new(child: Child, stdout: ChildStdout, writer: std::thread::JoinHandle<()>) -> Self {
        Self {
            child,
            stdout,
            writer: Some(writer),
            pending: Vec::new(),
            done: false,
            reaped: false,
        }
    }

    fn finish(&mut self) -> Result<Option<String>> {
        self.done = true;
        self.reaped = true;
        let status = self.child.wait()?;
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
        if !status.success() {
            return Err(CopyeditError::Model(format!(
                "model subprocess exited with {status}"
            )));
        }
        if self.pending.is_empty() {
            Ok(None)
        } else {
            let tail = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            Ok(Some(tail))
        }
    }
}

/// An abandoned stream must not leave the child running or unreaped.
impl Drop for ChunkStream {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
    }
}

impl Iterator for ChunkStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = [0u8; 4096];
        loop {
            match self.stdout.read(&mut buf) {
                Ok(0) => return self.finish().transpose(),
                Ok(n) => {
                    self.pending.extend_from_slice(&buf[..n]);
                    match std::str::from_utf8(&self.pending) {
                        Ok(text) => {
                            let chunk = text.to_string();
                            self.pending.clear();
                            return Some(Ok(chunk));
                        }
                        Err(err) if err.valid_up_to() > 0 => {
                            let valid = err.valid_up_to();
                            let chunk =
                                String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                            self.pending.drain(..valid);
                            return Some(Ok(chunk));
                        }
                        // Partial sequence only; read more bytes.
                        Err(_) => {}
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
