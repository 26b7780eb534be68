use clap::{Parser, ValueEnum, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DB_NAMESPACE: &str = "opennutrition";
const DEFAULT_DB_NAME: &str = "foods";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:8000";
const REMOTE_SCHEMES: [&str; 4] = ["ws", "wss", "http", "https"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    StreamableHttp,
}

#[derive(Parser, Debug)]
#[command(name = "opennutrition-mcpd", version, about = "OpenNutrition MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "NUTRITION_DB_NAMESPACE", default_value = DEFAULT_DB_NAMESPACE)]
    db_namespace: String,

    #[arg(long, env = "NUTRITION_DB_NAME", default_value = DEFAULT_DB_NAME)]
    db_name: String,

    /// Forces the embedded in-memory store even when a URI is configured.
    #[arg(
        long,
        env = "NUTRITION_DB_IN_MEMORY",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    db_in_memory: bool,

    /// `mem://`, an embedded `surrealkv://<path>` or a remote `ws(s)://` server.
    #[arg(long, env = "NUTRITION_DB_URI")]
    db_uri: Option<String>,

    #[arg(long, env = "NUTRITION_DB_USERNAME")]
    db_username: Option<String>,

    #[arg(long, env = "NUTRITION_DB_PASSWORD")]
    db_password: Option<String>,

    /// TSV export to load into the store before serving.
    #[arg(long, env = "NUTRITION_IMPORT_PATH")]
    import_path: Option<PathBuf>,

    #[arg(
        long,
        env = "NUTRITION_TRANSPORT",
        value_enum,
        default_value_t = Transport::StreamableHttp
    )]
    transport: Transport,

    #[arg(long, env = "NUTRITION_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "NUTRITION_STATEFUL_MODE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    stateful_mode: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone, Debug)]
pub struct NutritionConfig {
    pub db_namespace: String,
    pub db_name: String,
    pub db_in_memory: bool,
    pub db_uri: Option<String>,
    pub db_username: Option<String>,
    pub db_password: Option<String>,
    pub import_path: Option<PathBuf>,
    pub transport: Transport,
    pub mcp_http_addr: SocketAddr,
    pub stateful_mode: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value:?}")
            }
        }
    }
}

impl Error for ConfigError {}

impl NutritionConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        Self::try_from(CliArgs::parse())
    }

    /// Connection endpoint handed to `surrealdb::engine::any::connect`.
    pub fn db_endpoint(&self) -> &str {
        match (&self.db_uri, self.db_in_memory) {
            (Some(uri), false) => uri,
            _ => "mem://",
        }
    }

    /// True when the endpoint is a database server that expects a root signin.
    pub fn is_remote(&self) -> bool {
        is_remote_uri(self.db_endpoint())
    }
}

fn is_remote_uri(uri: &str) -> bool {
    uri.split_once("://").is_some_and(|(scheme, _)| {
        REMOTE_SCHEMES
            .iter()
            .any(|remote| scheme.eq_ignore_ascii_case(remote))
    })
}

impl TryFrom<CliArgs> for NutritionConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let db_uri = args.db_uri.filter(|value| !value.trim().is_empty());
        let db_username = args.db_username.filter(|value| !value.trim().is_empty());
        let db_password = args.db_password.filter(|value| !value.trim().is_empty());

        let db_in_memory = args.db_in_memory || db_uri.is_none();
        let remote = !db_in_memory && db_uri.as_deref().is_some_and(is_remote_uri);

        if remote {
            if db_username.is_none() {
                return Err(ConfigError::MissingSetting("NUTRITION_DB_USERNAME"));
            }
            if db_password.is_none() {
                return Err(ConfigError::MissingSetting("NUTRITION_DB_PASSWORD"));
            }
        }

        if args.db_namespace.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "NUTRITION_DB_NAMESPACE",
                value: args.db_namespace,
            });
        }
        if args.db_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "NUTRITION_DB_NAME",
                value: args.db_name,
            });
        }

        Ok(Self {
            db_namespace: args.db_namespace,
            db_name: args.db_name,
            db_in_memory,
            db_uri,
            db_username,
            db_password,
            import_path: args.import_path,
            transport: args.transport,
            mcp_http_addr: args.mcp_http_addr,
            stateful_mode: args.stateful_mode,
        })
    }
}
