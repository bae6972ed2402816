mod cli;
mod core;

use clap::{Args, Parser, Subcommand};

use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(name = "rlc", about = "Rate-limit check client CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a rate-limit check and display the verdict
    Check(CheckFlags),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Default)]
struct CheckFlags {
    /// Tenant ID (default from config)
    #[arg(long)]
    tenant: Option<String>,

    /// User ID (default from config)
    #[arg(short, long)]
    user: Option<String>,

    /// Model ID (default from config)
    #[arg(short, long)]
    model: Option<String>,

    /// Model tier (premium|standard|free)
    #[arg(short, long)]
    tier: Option<String>,

    /// Override the decision service endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Omit the tenantId field from the request payload
    #[arg(long)]
    no_tenant: bool,

    /// Submit the check N times in sequence
    #[arg(short, long, default_value_t = 1)]
    repeat: u32,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let color_mode = AppConfig::load()
        .map(|c| c.settings.color)
        .unwrap_or_else(|_| "auto".to_string());

    let output_opts = cli::output::OutputOptions {
        format: if cli.json {
            cli::output::OutputFormat::Json
        } else {
            match cli.format.as_deref() {
                Some("json") => cli::output::OutputFormat::Json,
                _ => cli::output::OutputFormat::Text,
            }
        },
        pretty: cli.pretty,
        use_color: cli::output::resolve_color(&color_mode, cli.no_color),
        verbose: cli.verbose,
    };

    match cli.command {
        None | Some(Commands::Check(..)) => {
            let flags = match cli.command {
                Some(Commands::Check(flags)) => flags,
                _ => CheckFlags::default(),
            };
            let args = cli::check_cmd::CheckArgs {
                tenant: flags.tenant,
                user: flags.user,
                model: flags.model,
                tier: flags.tier,
                endpoint: flags.endpoint,
                no_tenant: flags.no_tenant,
                repeat: flags.repeat,
            };
            cli::check_cmd::run(args, &output_opts).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
            ConfigAction::Path => cli::config_cmd::path(&output_opts)?,
        },
    }

    Ok(())
}
