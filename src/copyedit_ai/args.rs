use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "copyedit_ai")]
#[command(about = "Copyedit text from the CLI using AI", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debugging output
    #[arg(short = 'D', long, global = true)]
    pub debug: bool,

    /// Path to log file. If not specified, logging to file is disabled
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    // `copyedit_ai draft.txt` edits without naming the subcommand.
    #[command(flatten)]
    pub edit: EditArgs,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// File to copyedit. If not provided, reads from stdin
    #[arg(value_parser = existing_file)]
    pub file: Option<PathBuf>,

    /// LLM model to use for copyediting
    #[arg(short, long)]
    pub model: Option<String>,

    /// Do not stream the response as it is generated
    #[arg(long)]
    pub no_stream: bool,

    /// Replace the original file after confirmation. Creates a .bak backup
    #[arg(short, long)]
    pub replace: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copyedit text using AI
    Edit(EditArgs),

    /// Manage the copyedit_ai command
    #[command(name = "self", subcommand)]
    SelfCmd(SelfCommands),
}

#[derive(Subcommand, Debug)]
pub enum SelfCommands {
    /// Create the isolated configuration tree and default template
    Init {
        /// Re-run directory creation even if already initialized
        #[arg(short, long)]
        force: bool,
    },

    /// Print the package version
    Version,

    /// Install a copyedit prompt template for use with llm
    InstallTemplate {
        /// Name for the template
        #[arg(default_value = "copyedit")]
        name: String,

        /// Overwrite existing template if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Install a model alias for use with llm
    InstallAlias {
        /// Alias name to create
        alias: String,

        /// Model ID to alias
        model_id: String,
    },

    /// List installed prompt templates
    Templates,

    /// Print the resolved configuration paths
    Paths,
}

fn existing_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("file does not exist: {s}"))
    }
}
