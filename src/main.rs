use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dremio_provider::config::{Config, ENV_API_KEY, ENV_PASSWORD, ENV_URL, ENV_USERNAME};
use dremio_provider::dremio::DremioClient;
use dremio_provider::plan::{apply_plan, Plan};
use dremio_provider::resource::{
    get_data_source_schema, get_registry, get_resource_schema, Operation, Provider, Response,
};
use dremio_provider::VERSION;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Manage Dremio spaces, sources, datasets and reflections declaratively
#[derive(Parser, Debug)]
#[command(name = "dremio-provider", version = VERSION, about, long_about = None)]
struct Args {
    /// Dremio server URL, e.g. http://localhost:9047
    #[arg(long, env = ENV_URL)]
    url: Option<String>,

    /// Personal access token
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    /// Username for session login
    #[arg(long, env = ENV_USERNAME)]
    username: Option<String>,

    /// Password for session login
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
    password: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Persist the URL and username for later runs
    #[arg(long)]
    save_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the schema of one type, or of every type
    Schema {
        type_name: Option<String>,
    },
    /// Run a YAML or JSON plan of lifecycle steps
    Apply {
        plan: PathBuf,
    },
    /// Run a single lifecycle operation
    Run {
        type_name: String,
        #[arg(value_enum)]
        op: OpArg,
        /// State or configuration as a JSON object
        #[arg(long, default_value = "{}")]
        state: String,
    },
    /// Read a data source
    ReadData {
        type_name: String,
        /// Configuration as a JSON object
        #[arg(long, default_value = "{}")]
        config: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OpArg {
    Create,
    Read,
    Update,
    Delete,
}

impl From<OpArg> for Operation {
    fn from(op: OpArg) -> Self {
        match op {
            OpArg::Create => Operation::Create,
            OpArg::Read => Operation::Read,
            OpArg::Update => Operation::Update,
            OpArg::Delete => Operation::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

const LOG_ENV: &str = "DREMIO_PROVIDER_LOG";

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let directive = match (std::env::var(LOG_ENV).ok(), level.to_tracing_level()) {
        (Some(filter), _) if !filter.is_empty() => filter,
        (_, Some(tracing_level)) => tracing_level.to_string().to_lowercase(),
        _ => return Ok(None),
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&directive))
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("dremio-provider {} started with filter: {}", VERSION, directive);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("dremio-provider").join("dremio-provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".dremio-provider").join("dremio-provider.log");
    }
    PathBuf::from("dremio-provider.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    match &args.command {
        Command::Schema { type_name } => print_schema(type_name.as_deref()),
        Command::Apply { plan } => {
            let plan = Plan::load(plan)?;
            let provider = connect(&args)?;
            let outcomes = apply_plan(&provider, &plan).await?;
            print_json(&outcomes)?;
            if let Some(failed) = outcomes.iter().find(|o| !o.response.is_ok()) {
                bail!("{} {} failed", failed.op, failed.type_name);
            }
            Ok(())
        }
        Command::Run {
            type_name,
            op,
            state,
        } => {
            let state = parse_object(state, "--state")?;
            let provider = connect(&args)?;
            let response = provider.apply(type_name, (*op).into(), state).await;
            finish(type_name, response)
        }
        Command::ReadData { type_name, config } => {
            let config = parse_object(config, "--config")?;
            let provider = connect(&args)?;
            let response = provider.read_data_source(type_name, config).await;
            finish(type_name, response)
        }
    }
}

/// Resolve configuration and build the provider
fn connect(args: &Args) -> Result<Provider<DremioClient>> {
    let cli = Config {
        dremio_url: args.url.clone(),
        username: args.username.clone(),
        api_key: args.api_key.clone(),
        password: args.password.clone(),
    };
    let config = Config::resolve(cli);

    if args.save_config {
        config.save()?;
    }

    let url = config.url()?;
    let credentials = config.credentials()?;
    tracing::info!("Using Dremio at {}", url);

    let client = DremioClient::new(url.as_str(), credentials)
        .context("Failed to create Dremio client")?;
    Ok(Provider::new(client))
}

fn print_schema(type_name: Option<&str>) -> Result<()> {
    match type_name {
        None => print_json(get_registry()),
        Some(name) => {
            let resource = get_resource_schema(name);
            let data_source = get_data_source_schema(name);
            if resource.is_none() && data_source.is_none() {
                bail!("unknown type '{name}'");
            }
            print_json(&serde_json::json!({
                "resource": resource,
                "data_source": data_source,
            }))
        }
    }
}

fn finish(type_name: &str, response: Response) -> Result<()> {
    print_json(&response)?;
    if !response.is_ok() {
        bail!("{type_name} failed");
    }
    Ok(())
}

fn parse_object(raw: &str, flag: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("{flag} is not valid JSON"))?;
    if !value.is_object() {
        bail!("{flag} must be a JSON object");
    }
    Ok(value)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
