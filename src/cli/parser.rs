use clap::{Parser, Subcommand};

/// Command-line interface definition for skatesync
/// Offline-first queue and sync engine for skate spots & events
#[derive(Parser)]
#[command(
    name = "skatesync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Queue skate spots and events offline and sync them when the network is back",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Treat the network as unavailable (no request is attempted)
    #[arg(global = true, long = "offline")]
    pub offline: bool,

    /// Verbose diagnostics on stderr
    #[arg(global = true, short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Queue a new record created offline
    Add {
        #[command(subcommand)]
        record: AddRecord,
    },

    /// List queued writes
    List {
        #[arg(long = "kind", short = 'k', help = "Filter by kind (spot, event)")]
        kind: Option<String>,

        #[arg(
            long = "status",
            short = 's',
            help = "Filter by status (pending, synced, failed)"
        )]
        status: Option<String>,
    },

    /// Browse the local mirror of server data
    Cache {
        #[arg(long = "kind", short = 'k', help = "Filter by kind (spot, event)")]
        kind: Option<String>,

        #[arg(
            long = "show",
            requires = "kind",
            help = "Show one mirrored record by its server id"
        )]
        show: Option<i64>,
    },

    /// Run a sync cycle now
    Sync {
        #[arg(long = "kind", short = 'k', help = "Only sync this kind")]
        kind: Option<String>,
    },

    /// Reset failed writes to pending
    Retry {
        #[arg(long = "now", help = "Run a full sync right after the reset")]
        now: bool,
    },

    /// Show sync status
    Status,

    /// Show row counts of the offline tables
    Stats,

    /// Delete all queued writes and the cache mirror (settings are kept)
    Clear {
        #[arg(long = "yes", help = "Confirm the deletion")]
        yes: bool,
    },

    /// Enable or disable scheduled sync
    AutoSync {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },

    /// Keep running, syncing on a timer and whenever the network comes back
    Watch,

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },
}

#[derive(Subcommand)]
pub enum AddRecord {
    /// A skate spot
    Spot {
        #[arg(long = "name")]
        name: String,

        #[arg(long = "lat", allow_hyphen_values = true)]
        latitude: f64,

        #[arg(long = "lon", allow_hyphen_values = true)]
        longitude: f64,

        #[arg(long = "description")]
        description: Option<String>,

        #[arg(long = "address")]
        address: Option<String>,

        #[arg(
            long = "type",
            help = "park, street, bowl, vert, mini_ramp, plaza, stairs"
        )]
        spot_type: Option<String>,

        #[arg(long = "difficulty", help = "1 (easy) to 5 (hard)")]
        difficulty: Option<u8>,

        #[arg(long = "feature", help = "Feature tag, repeatable")]
        features: Vec<String>,
    },

    /// A shop event
    Event {
        #[arg(long = "title")]
        title: String,

        #[arg(long = "type", help = "session, competition, demo, sale, meet")]
        event_type: String,

        #[arg(
            long = "start",
            help = "Start time (RFC 3339 or 'YYYY-MM-DD HH:MM' local)"
        )]
        start: String,

        #[arg(long = "end")]
        end: Option<String>,

        #[arg(long = "shop")]
        shop_id: i64,

        #[arg(long = "description")]
        description: Option<String>,

        #[arg(long = "location")]
        location: Option<String>,

        #[arg(long = "max-participants")]
        max_participants: Option<u32>,
    },
}
