use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_SERVER: &str = "ws://127.0.0.1:8765";

/// Relay url used when neither `--server` nor `LADDER_SERVER` says otherwise.
pub fn default_server(from_env: Option<String>) -> String {
    from_env
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_owned())
}

#[derive(Parser)]
#[command(name = "ladder", version, about = "Two-player Snake & Ladder over WebRTC")]
pub struct Cli {
    /// Where the profile and stats files live.
    #[arg(long, global = true, default_value = ".", env = "LADDER_DATA_DIR")]
    pub data_dir: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the signaling relay.
    Serve(ServeArgs),

    /// Open a session and wait for a friend to join.
    Host(ConnectArgs),

    /// Join a friend's session by invite code.
    Join {
        code: String,

        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Play against the computer.
    Solo,

    /// Show win/loss statistics.
    Stats(StatsArgs),

    /// Check that the relay answers.
    Status(ServerArg),

    /// Top players on the relay's leaderboard.
    Leaderboard(ServerArg),

    /// Online account kept by the relay.
    Account {
        #[command(subcommand)]
        action: AccountAction,

        #[command(flatten)]
        args: AccountArgs,
    },

    /// Set the name and avatar shown to opponents.
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value_t = ladder_server::DEFAULT_PORT)]
    pub port: u16,

    /// STUN/TURN url announced to clients; repeatable.
    #[arg(long = "ice-server")]
    pub ice_servers: Vec<String>,

    /// Pause between a guest joining and the game starting.
    #[arg(long, default_value_t = 500)]
    pub ready_delay_ms: u64,

    /// Accounts file; defaults to users.json in the data dir.
    #[arg(long)]
    pub users_file: Option<PathBuf>,
}

#[derive(Args, Clone, Default)]
pub struct StatsArgs {
    /// Start a new session without archiving the current one.
    #[arg(long)]
    pub reset_session: bool,

    /// Erase the all-time stats.
    #[arg(long)]
    pub reset_global: bool,

    /// Skip the confirmation for --reset-global.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args, Clone)]
pub struct ServerArg {
    #[arg(long, default_value = DEFAULT_SERVER, env = "LADDER_SERVER")]
    pub server: String,
}

#[derive(Args, Clone)]
pub struct AccountArgs {
    #[command(flatten)]
    pub server: ServerArg,

    /// Account name; defaults to the profile name.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Prompted for when not given.
    #[arg(long, global = true, env = "LADDER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Clone)]
pub enum AccountAction {
    /// Create the account.
    Register,

    /// Merge the local all-time stats with the server's copy.
    Sync,

    /// Show a player's stats as the server has them.
    Show { name: Option<String> },
}

#[derive(Args, Clone)]
pub struct ConnectArgs {
    #[arg(long, default_value = DEFAULT_SERVER, env = "LADDER_SERVER")]
    pub server: String,

    /// Seconds to wait for the direct connection.
    #[arg(long, default_value_t = 10)]
    pub connect_timeout: u64,

    /// Fail instead of playing through the relay when no direct link forms.
    #[arg(long)]
    pub no_relay_fallback: bool,
}

impl Default for ConnectArgs {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_owned(),
            connect_timeout: 10,
            no_relay_fallback: false,
        }
    }
}
