use clap::Parser;
use sea_orm_cli::MigrateSubcommands;

/// Matchmaking database schema management.
#[derive(Parser)]
pub(crate) struct Cli {
    /// Migration command, applies all pending migrations if omitted.
    #[clap(subcommand)]
    pub command: Option<MigrateSubcommands>,
}
