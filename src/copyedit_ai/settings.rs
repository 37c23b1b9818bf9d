//! Environment-driven settings, `COPYEDIT_AI_*` prefix.

use std::env;
use std::path::PathBuf;

const ENV_PREFIX: &str = "COPYEDIT_AI_";

/// Settings read from the process environment at startup.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Enable debug logging (`COPYEDIT_AI_DEBUG`).
    pub debug: bool,
    /// Model to use when none is given on the command line
    /// (`COPYEDIT_AI_DEFAULT_MODEL`). `None` defers to llm's default.
    pub default_model: Option<String>,
    /// Log file path (`COPYEDIT_AI_LOG_FILE`).
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("DEBUG"),
            default_model: env_string("DEFAULT_MODEL"),
            log_file: env_string("LOG_FILE").map(PathBuf::from),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{key}"))
        .ok()
        .filter(|v| !v.is_empty())
}

fn env_flag(key: &str) -> bool {
    env_string(key).is_some_and(|v| {
        matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("COPYEDIT_AI_DEBUG");
        env::remove_var("COPYEDIT_AI_DEFAULT_MODEL");
        env::remove_var("COPYEDIT_AI_LOG_FILE");

        let settings = Settings::from_env();
        assert!(!settings.debug);
        assert!(settings.default_model.is_none());
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("COPYEDIT_AI_DEBUG", "true");
        env::set_var("COPYEDIT_AI_DEFAULT_MODEL", "gpt-4o-mini");
        env::set_var("COPYEDIT_AI_LOG_FILE", "/tmp/copyedit.log");

        let settings = Settings::from_env();
        assert!(settings.debug);
        assert_eq!(settings.default_model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/copyedit.log")));

        env::remove_var("COPYEDIT_AI_DEBUG");
        env::remove_var("COPYEDIT_AI_DEFAULT_MODEL");
        env::remove_var("COPYEDIT_AI_LOG_FILE");
    }

    #[test]
    fn test_debug_flag_rejects_other_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("COPYEDIT_AI_DEBUG", "0");
        assert!(!Settings::from_env().debug);
        env::set_var("COPYEDIT_AI_DEBUG", "nope");
        assert!(!Settings::from_env().debug);
        env::remove_var("COPYEDIT_AI_DEBUG");
    }
}
