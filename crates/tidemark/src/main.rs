use anyhow::{Context, Result};
use tidemark::cli::{Cli, Commands, parse_cli};
use tidemark::logging::init_logging;
use tidemark::metrics::run_list_metrics_command;
use tidemark::report::run_report_command;
use tidemark_config::{load_workspace_config, validate_config};

fn main() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.log_format);
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let workspace = cli.workspace.canonicalize().with_context(|| {
        format!(
            "failed to resolve workspace path {}",
            cli.workspace.display()
        )
    })?;

    let config = load_workspace_config(&workspace).with_context(|| {
        format!(
            "failed to load workspace config at {}",
            workspace.join(".tidemark/config.toml").display()
        )
    })?;
    for warning in validate_config(&config) {
        tracing::warn!(code = warning.code, "{}", warning.message);
    }

    let mut out = std::io::stdout();
    match cli.command {
        Commands::Report(args) => run_report_command(&workspace, &config, args, &mut out),
        Commands::ListMetrics => run_list_metrics_command(&config, &mut out),
    }
}
