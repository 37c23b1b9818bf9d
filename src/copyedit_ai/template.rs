//! Prompt templates stored as YAML files in the isolated templates
//! directory, in the format the `llm` tool reads.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A named prompt template: a system prompt plus a prompt format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PromptTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl PromptTemplate {
    pub fn path_for(templates_dir: &Path, name: &str) -> PathBuf {
        templates_dir.join(format!("{name}.yaml"))
    }

    pub fn load(templates_dir: &Path, name: &str) -> Result<Self> {
        Self::load_path(&Self::path_for(templates_dir, name))
    }

    pub fn load_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write the template, returning the path it was written to.
    pub fn save(&self, templates_dir: &Path, name: &str) -> Result<PathBuf> {
        let path = Self::path_for(templates_dir, name);
        fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(path)
    }

    /// One-line summary used by template listings.
    pub fn summary(&self) -> String {
        let text = match (&self.system, &self.prompt) {
            (Some(system), Some(prompt)) => format!("system: {system} prompt: {prompt}"),
            (Some(system), None) => format!("system: {system}"),
            (None, prompt) => prompt.clone().unwrap_or_default(),
        };
        text.replace('\n', " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let template = PromptTemplate {
            system: Some("You are a copyeditor.".to_string()),
            prompt: Some("Copy edit the text that follows:\n\n$input".to_string()),
        };

        let path = template.save(temp.path(), "copyedit").unwrap();
        assert_eq!(path, temp.path().join("copyedit.yaml"));

        let loaded = PromptTemplate::load(temp.path(), "copyedit").unwrap();
        assert_eq!(loaded, template);
    }

    #[test]
    fn test_load_missing_template_errors() {
        let temp = TempDir::new().unwrap();
        assert!(PromptTemplate::load(temp.path(), "nope").is_err());
    }

    #[test]
    fn test_summary_flattens_newlines() {
        let template = PromptTemplate {
            system: Some("line one\nline two".to_string()),
            prompt: Some("$input".to_string()),
        };
        assert_eq!(template.summary(), "system: line one line two prompt: $input");
    }

    #[test]
    fn test_summary_prompt_only() {
        let template = PromptTemplate {
            system: None,
            prompt: Some("just a prompt".to_string()),
        };
        assert_eq!(template.summary(), "just a prompt");
    }
}
