use clap::Parser;
use colored::*;
use copyedit_ai::commands::{self, edit::EditSource, CmdMessage, MessageLevel};
use copyedit_ai::error::Result;
use copyedit_ai::replace::StdinConfirm;
use copyedit_ai::service::LlmClient;
use copyedit_ai::settings::Settings;
use copyedit_ai::user_dir::{legacy_llm_config_dir, RuntimeContext};
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod args;
use args::{Cli, Commands, EditArgs, SelfCommands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env();
    init_logging(&cli, &settings)?;

    let ctx = RuntimeContext::from_env();
    // The external llm tool reads LLM_USER_PATH by contract; publish the
    // isolated path before anything touches model configuration.
    ctx.set_llm_user_path();

    match cli.command {
        Some(Commands::Edit(edit_args)) => handle_edit(&ctx, &settings, edit_args),
        Some(Commands::SelfCmd(cmd)) => handle_self(&ctx, cmd),
        None => handle_edit(&ctx, &settings, cli.edit),
    }
}

fn init_logging(cli: &Cli, settings: &Settings) -> Result<()> {
    let debug = cli.debug || settings.debug;
    let log_path = cli.log_file.clone().or_else(|| settings.log_file.clone());
    if !debug && log_path.is_none() {
        return Ok(());
    }

    let terminal_filter = if debug {
        EnvFilter::new("copyedit_ai=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let terminal_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if let Some(path) = log_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let file_layer = fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Arc::new(file));
        tracing_subscriber::registry()
            .with(terminal_layer.with_filter(terminal_filter))
            .with(file_layer.with_filter(EnvFilter::new("copyedit_ai=debug")))
            .init();
        tracing::info!(path = %path.display(), "logging to file");
    } else {
        tracing_subscriber::registry()
            .with(terminal_layer.with_filter(terminal_filter))
            .init();
    }
    Ok(())
}

fn handle_edit(ctx: &RuntimeContext, settings: &Settings, args: EditArgs) -> Result<()> {
    let model = args.model.or_else(|| settings.default_model.clone());

    let source = match args.file {
        Some(path) => EditSource::File(path),
        // Replace mode cannot use stdin; skip the read and let the command
        // reject the combination.
        None if args.replace => EditSource::Stdin(String::new()),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            EditSource::Stdin(text)
        }
    };

    let source_name = match &source {
        EditSource::File(path) => path.display().to_string(),
        EditSource::Stdin(_) => "stdin".to_string(),
    };
    let model_display = model.as_deref().unwrap_or("default");
    eprintln!(
        "{} {} {}",
        "Copyediting:".blue().bold(),
        source_name,
        format!("(model: {model_display})").dimmed()
    );

    let service = LlmClient::new(ctx.clone());
    let mut confirm = StdinConfirm;
    let mut stdout = std::io::stdout();
    let result = commands::edit::run(
        &service,
        ctx,
        &source,
        model.as_deref(),
        !args.no_stream,
        args.replace,
        &mut confirm,
        &mut stdout,
    )?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_self(ctx: &RuntimeContext, cmd: SelfCommands) -> Result<()> {
    match cmd {
        SelfCommands::Init { force } => {
            let result = commands::init::run(ctx, force, &legacy_llm_config_dir())?;
            print_messages(&result.messages);
        }
        SelfCommands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION").green());
        }
        SelfCommands::InstallTemplate { name, force } => {
            let result = commands::install_template::run(ctx, &name, force)?;
            print_messages(&result.messages);
        }
        SelfCommands::InstallAlias { alias, model_id } => {
            let result = commands::install_alias::run(ctx, &alias, &model_id)?;
            print_messages(&result.messages);
        }
        SelfCommands::Templates => {
            let service = LlmClient::new(ctx.clone());
            let result = commands::templates::run(&service)?;
            for (name, summary) in &result.templates {
                println!("{}: {}", name.bold(), summary);
            }
            print_messages(&result.messages);
        }
        SelfCommands::Paths => {
            let result = commands::paths::run(ctx)?;
            for (label, path) in &result.paths {
                println!("{}: {}", label, path.display());
            }
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}
