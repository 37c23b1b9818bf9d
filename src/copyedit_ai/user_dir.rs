//! Isolated configuration directory management.
//!
//! copyedit_ai keeps its templates and model aliases in a dedicated tree
//! under the user's config directory so they never collide with a
//! system-wide `llm` installation. The external `llm` tool is pointed at
//! that tree through the `LLM_USER_PATH` environment variable.
//!
//! Path resolution is pure: the `xdg_config_home` / `app_config_dir` /
//! `llm_config_dir` functions recompute their answer from the environment on
//! every call and never touch the disk. The on-disk lifecycle (existence
//! check, creation, legacy import) lives on [`RuntimeContext`], which
//! captures the resolved paths once and is passed to everything that needs
//! them.

use crate::error::Result;
use directories::BaseDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reverse-domain application identifier.
pub const APP_IDENTIFIER: &str = "dev.pirateninja.copyedit_ai";

/// Environment variable the external `llm` tool reads for its config root.
pub const LLM_USER_PATH_VAR: &str = "LLM_USER_PATH";

const LLM_CONFIG_DIR_NAME: &str = "llm_config";
const TEMPLATES_DIR_NAME: &str = "templates";
const ALIASES_FILE_NAME: &str = "aliases.json";

fn home_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `$XDG_CONFIG_HOME` if set and non-empty, else `~/.config`.
pub fn xdg_config_home() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(val) if !val.is_empty() => PathBuf::from(val),
        _ => home_dir().join(".config"),
    }
}

/// The application config directory.
///
/// An explicit `XDG_CONFIG_HOME` override always wins. Without it the
/// platform user-data directory is used, which on some platforms differs
/// from `~/.config`.
pub fn app_config_dir() -> PathBuf {
    if env::var("XDG_CONFIG_HOME").is_ok_and(|v| !v.is_empty()) {
        return xdg_config_home().join(APP_IDENTIFIER);
    }
    BaseDirs::new()
        .map(|d| d.data_dir().join(APP_IDENTIFIER))
        .unwrap_or_else(|| home_dir().join(".local").join("share").join(APP_IDENTIFIER))
}

/// The isolated `llm` configuration root, `app_config_dir()/llm_config`.
pub fn llm_config_dir() -> PathBuf {
    app_config_dir().join(LLM_CONFIG_DIR_NAME)
}

/// Location of a pre-existing system-wide `llm` configuration.
pub fn legacy_llm_config_dir() -> PathBuf {
    home_dir().join(".config").join("io.datasette.llm")
}

/// Create a directory (and any missing parents) readable only by its owner.
/// The tree can end up holding API credentials.
fn create_dir_owner_only(path: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)
}

/// Copy `templates/*.yaml` and `aliases.json` from a pre-existing system
/// `llm` configuration into `target`.
///
/// A missing source directory is a no-op, not an error. Individual copy
/// failures propagate; there is no partial-import recovery. Returns a
/// description of each imported item.
pub fn import_system_config(source: &Path, target: &Path) -> Result<Vec<String>> {
    let mut imported = Vec::new();
    if !source.is_dir() {
        debug!(path = %source.display(), "no system llm configuration to import");
        return Ok(imported);
    }

    let source_templates = source.join(TEMPLATES_DIR_NAME);
    if source_templates.is_dir() {
        let target_templates = target.join(TEMPLATES_DIR_NAME);
        create_dir_owner_only(&target_templates)?;
        let mut entries = fs::read_dir(&source_templates)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "yaml") {
                continue;
            }
            let file_name = entry.file_name();
            fs::copy(&path, target_templates.join(&file_name))?;
            imported.push(format!("template {}", file_name.to_string_lossy()));
        }
    }

    let source_aliases = source.join(ALIASES_FILE_NAME);
    if source_aliases.is_file() {
        fs::copy(&source_aliases, target.join(ALIASES_FILE_NAME))?;
        imported.push(ALIASES_FILE_NAME.to_string());
    }

    Ok(imported)
}

/// Resolved configuration paths, captured once from the environment.
///
/// The environment variable itself is only touched at the `llm` interop
/// boundary ([`RuntimeContext::set_llm_user_path`] and the subprocess
/// environment in the service layer).
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    app_config_dir: PathBuf,
    llm_config_dir: PathBuf,
}

impl RuntimeContext {
    pub fn from_env() -> Self {
        let app = app_config_dir();
        let llm = app.join(LLM_CONFIG_DIR_NAME);
        Self {
            app_config_dir: app,
            llm_config_dir: llm,
        }
    }

    /// Build a context rooted at an arbitrary directory instead of the
    /// user's config root. Used by tests.
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let app = root.as_ref().join(APP_IDENTIFIER);
        let llm = app.join(LLM_CONFIG_DIR_NAME);
        Self {
            app_config_dir: app,
            llm_config_dir: llm,
        }
    }

    pub fn app_config_dir(&self) -> &Path {
        &self.app_config_dir
    }

    pub fn llm_config_dir(&self) -> &Path {
        &self.llm_config_dir
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.llm_config_dir.join(TEMPLATES_DIR_NAME)
    }

    pub fn aliases_path(&self) -> PathBuf {
        self.llm_config_dir.join(ALIASES_FILE_NAME)
    }

    /// The tree counts as initialized when the llm config dir exists and is
    /// a directory. Never errors on missing parents.
    pub fn is_initialized(&self) -> bool {
        self.llm_config_dir.is_dir()
    }

    /// Create the configuration tree with owner-only permissions.
    ///
    /// Already initialized and `force` false is an explicit no-op.
    /// `force` re-ensures the directories exist but never deletes anything
    /// inside them.
    pub fn initialize(&self, force: bool) -> Result<()> {
        if self.is_initialized() && !force {
            debug!(path = %self.app_config_dir.display(), "already initialized");
            return Ok(());
        }
        create_dir_owner_only(&self.app_config_dir)?;
        create_dir_owner_only(&self.llm_config_dir)?;
        create_dir_owner_only(&self.templates_dir())?;
        debug!(path = %self.app_config_dir.display(), "initialized configuration");
        Ok(())
    }

    /// Best-effort import from the legacy system `llm` configuration.
    pub fn import_system_config(&self, source: &Path) -> Result<Vec<String>> {
        import_system_config(source, &self.llm_config_dir)
    }

    /// Publish the isolated config path to the external `llm` tool.
    ///
    /// If `LLM_USER_PATH` is already present in the process environment the
    /// user override wins and nothing is written. Safe to call repeatedly.
    pub fn set_llm_user_path(&self) {
        if env::var_os(LLM_USER_PATH_VAR).is_some() {
            debug!("LLM_USER_PATH already set, keeping user override");
            return;
        }
        env::set_var(LLM_USER_PATH_VAR, &self.llm_config_dir);
        debug!(path = %self.llm_config_dir.display(), "set LLM_USER_PATH");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests that mutate the process environment serialize on this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_xdg_config_home_with_env_var() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("XDG_CONFIG_HOME", "/custom/config/path");
        assert_eq!(xdg_config_home(), PathBuf::from("/custom/config/path"));
        env::remove_var("XDG_CONFIG_HOME");
    }

    #[test]
    fn test_xdg_config_home_without_env_var() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(xdg_config_home(), home_dir().join(".config"));
    }

    #[test]
    fn test_app_config_dir_honors_xdg_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("XDG_CONFIG_HOME", "/tmp/x");
        assert_eq!(
            app_config_dir(),
            PathBuf::from("/tmp/x").join(APP_IDENTIFIER)
        );
        assert_eq!(
            llm_config_dir(),
            PathBuf::from("/tmp/x").join(APP_IDENTIFIER).join("llm_config")
        );
        env::remove_var("XDG_CONFIG_HOME");
    }

    #[test]
    fn test_app_config_dir_empty_xdg_falls_back() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("XDG_CONFIG_HOME", "");
        let dir = app_config_dir();
        assert_ne!(dir, PathBuf::from("").join(APP_IDENTIFIER));
        assert!(dir.ends_with(APP_IDENTIFIER));
        env::remove_var("XDG_CONFIG_HOME");
    }

    #[test]
    fn test_is_initialized_false_when_missing() {
        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());
        assert!(!ctx.is_initialized());
    }

    #[test]
    fn test_initialize_creates_tree() {
        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());

        ctx.initialize(false).unwrap();

        assert!(ctx.app_config_dir().is_dir());
        assert!(ctx.llm_config_dir().is_dir());
        assert!(ctx.templates_dir().is_dir());
        assert!(ctx.is_initialized());
    }

    #[cfg(unix)]
    #[test]
    fn test_initialize_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());
        ctx.initialize(false).unwrap();

        for dir in [
            ctx.app_config_dir().to_path_buf(),
            ctx.llm_config_dir().to_path_buf(),
            ctx.templates_dir(),
        ] {
            let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o700, "wrong mode on {}", dir.display());
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());

        ctx.initialize(false).unwrap();
        let marker = ctx.llm_config_dir().join("marker.txt");
        fs::write(&marker, "untouched").unwrap();

        ctx.initialize(false).unwrap();

        assert_eq!(fs::read_to_string(&marker).unwrap(), "untouched");
    }

    #[test]
    fn test_initialize_force_keeps_contents() {
        // Documented current behavior: force re-ensures the tree but does
        // not delete existing files.
        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());

        ctx.initialize(false).unwrap();
        let marker = ctx.llm_config_dir().join("keep.txt");
        fs::write(&marker, "keep me").unwrap();

        ctx.initialize(true).unwrap();

        assert!(marker.exists());
        assert_eq!(fs::read_to_string(&marker).unwrap(), "keep me");
    }

    #[test]
    fn test_initialize_fails_on_path_collision() {
        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());
        // A plain file where the app config dir should go.
        fs::write(ctx.app_config_dir(), "not a directory").unwrap();

        assert!(ctx.initialize(false).is_err());
    }

    #[test]
    fn test_import_missing_source_is_noop() {
        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());
        ctx.initialize(false).unwrap();

        let imported = ctx
            .import_system_config(&temp.path().join("does-not-exist"))
            .unwrap();

        assert!(imported.is_empty());
        assert_eq!(fs::read_dir(ctx.templates_dir()).unwrap().count(), 0);
        assert!(!ctx.aliases_path().exists());
    }

    #[test]
    fn test_import_copies_templates_and_aliases() {
        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());
        ctx.initialize(false).unwrap();

        let legacy = temp.path().join("io.datasette.llm");
        fs::create_dir_all(legacy.join("templates")).unwrap();
        fs::write(legacy.join("templates/copyedit.yaml"), "system: hi\n").unwrap();
        fs::write(legacy.join("templates/notes.txt"), "not yaml").unwrap();
        fs::write(legacy.join("aliases.json"), r#"{"fast": "gpt-4o-mini"}"#).unwrap();

        let imported = ctx.import_system_config(&legacy).unwrap();

        assert_eq!(
            imported,
            vec!["template copyedit.yaml".to_string(), "aliases.json".to_string()]
        );
        assert!(ctx.templates_dir().join("copyedit.yaml").exists());
        assert!(!ctx.templates_dir().join("notes.txt").exists());
        assert_eq!(
            fs::read_to_string(ctx.aliases_path()).unwrap(),
            r#"{"fast": "gpt-4o-mini"}"#
        );
    }

    #[test]
    fn test_set_llm_user_path_sets_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(LLM_USER_PATH_VAR);

        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());
        ctx.set_llm_user_path();

        assert_eq!(
            env::var_os(LLM_USER_PATH_VAR).unwrap(),
            ctx.llm_config_dir().as_os_str()
        );
        env::remove_var(LLM_USER_PATH_VAR);
    }

    #[test]
    fn test_set_llm_user_path_respects_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var(LLM_USER_PATH_VAR, "/custom/llm/path");

        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());
        ctx.set_llm_user_path();

        assert_eq!(env::var(LLM_USER_PATH_VAR).unwrap(), "/custom/llm/path");
        env::remove_var(LLM_USER_PATH_VAR);
    }

    #[test]
    fn test_set_llm_user_path_empty_string_counts_as_set() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var(LLM_USER_PATH_VAR, "");

        let temp = TempDir::new().unwrap();
        let ctx = RuntimeContext::rooted_at(temp.path());
        ctx.set_llm_user_path();

        assert_eq!(env::var(LLM_USER_PATH_VAR).unwrap(), "");
        env::remove_var(LLM_USER_PATH_VAR);
    }
}
