use catalog_store::{
    cli::commands::{
        batch::BatchCommand,
        init::InitCommand,
        menu::MenuCommand,
        modify::{ModifyAction, ModifyCommand},
        render::RenderCommand,
        view::{ViewAction, ViewCommand},
        CommandHandler,
    },
    cli::{Cli, Commands, LogLevel},
    config::ConfigLoader,
    Result,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    run(cli).inspect_err(|e| tracing::debug!("Command failed: {:?}", e))?;
    Ok(())
}

/// Diagnostics go to stderr so stdout stays clean for listings and pages
fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let loader = ConfigLoader::from_current_dir()?;
    let resolved = loader.resolve(cli.config.as_deref(), cli.file.as_deref())?;
    tracing::debug!(
        "Running {} against {} (writes: {})",
        cli.command.name(),
        resolved.data_file.display(),
        cli.command.modifies_files()
    );

    let command: Box<dyn CommandHandler> = match cli.command {
        Commands::Init { force, empty } => Box::new(InitCommand::new(resolved, force, empty)),
        Commands::List { format } => Box::new(ViewCommand::new(resolved, ViewAction::List(format))),
        Commands::Show { id, format } => {
            Box::new(ViewCommand::new(resolved, ViewAction::Show(id, format)))
        }
        Commands::Search { query, regex } => Box::new(ViewCommand::new(
            resolved,
            ViewAction::Search { query, regex },
        )),
        Commands::Filter { field, value } => Box::new(ViewCommand::new(
            resolved,
            ViewAction::Filter { field, value },
        )),
        Commands::Column { field } => {
            Box::new(ViewCommand::new(resolved, ViewAction::Column(field)))
        }
        Commands::Add { id, values, fields } => Box::new(ModifyCommand::new(
            resolved,
            ModifyAction::Add { id, values, fields },
        )),
        Commands::Edit {
            id,
            name,
            description,
            fields,
        } => Box::new(ModifyCommand::new(
            resolved,
            ModifyAction::Edit {
                id,
                name,
                description,
                fields,
            },
        )),
        Commands::Delete { id } => {
            Box::new(ModifyCommand::new(resolved, ModifyAction::Delete(id)))
        }
        Commands::Render { output, title } => {
            Box::new(RenderCommand::new(resolved, output, title))
        }
        Commands::Menu => Box::new(MenuCommand::new(resolved)),
        Commands::Batch { script } => Box::new(BatchCommand::new(resolved, script)),
    };

    command.execute()
}
