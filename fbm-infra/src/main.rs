use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use fbm_infra::commands;
use fbm_infra::{DeploymentEnvironment, FbmError, FbmResult, OutputFormat};

#[derive(Parser)]
#[command(name = "fbm-infra")]
#[command(about = "Federated-learning deployment configuration tool", long_about = None)]
struct Cli {
    /// Directory holding <name>.cfg configuration files
    #[arg(long, global = true, env = "FBM_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Skip keys a section does not declare instead of rejecting them
    #[arg(long, global = true)]
    allow_unknown_keys: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a configuration and check it
    Validate {
        /// Configuration name (e.g. dev or prod)
        #[arg(long, env = "FBM_CONFIG")]
        config: Option<String>,
    },
    /// Print the deployment plan for a configuration
    Plan {
        /// Configuration name (e.g. dev or prod)
        #[arg(long, env = "FBM_CONFIG")]
        config: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,

        /// Target account
        #[arg(long, env = "CDK_DEFAULT_ACCOUNT")]
        account: Option<String>,

        /// Target region
        #[arg(long, env = "CDK_DEFAULT_REGION")]
        region: Option<String>,
    },
    /// List the configurations in the configuration directory
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> FbmResult<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "fbm_infra=info"
            .parse::<tracing_subscriber::filter::Directive>()
            .map_err(|e| FbmError::configuration("logging", format!("Invalid log directive: {}", e)))?,
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: Cli) -> FbmResult<()> {
    let loader = commands::loader(&cli.config_dir, cli.allow_unknown_keys);

    match cli.command {
        Commands::Validate { config } => {
            println!("{}", commands::validate(&loader, config.as_deref())?);
        }
        Commands::Plan {
            config,
            format,
            account,
            region,
        } => {
            let environment = DeploymentEnvironment::new(account, region);
            let rendered =
                commands::plan(&loader, config.as_deref(), &environment, format.into())?;
            println!("{}", rendered);
        }
        Commands::List => {
            for name in commands::list(&loader)? {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
