//! portable-db - a portable SQLite data manager with a command shell.

use std::sync::Arc;

use portable_db::backup::FileBackup;
use portable_db::cli::Cli;
use portable_db::config::Config;
use portable_db::db::SqliteStore;
use portable_db::error::Result;
use portable_db::repl::{self, ReplSettings};
use portable_db::view::LoggingView;
use portable_db::{logging, Shell};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();

    if cli.is_batch() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?.with_database(cli.database.clone());

    let shell = if cli.in_memory {
        Shell::new(Arc::new(SqliteStore::open_in_memory().await?))
    } else {
        let store = SqliteStore::open(&config.database.path).await?;
        Shell::new(Arc::new(store)).with_backup(Arc::new(FileBackup::new(
            &config.database.path,
            config.backup_dir(),
        )))
    };
    let mut shell = shell.with_view(Arc::new(LoggingView));

    let result = if cli.is_batch() {
        let mut lines = cli.commands.clone();
        if let Some(script) = &cli.script {
            lines.extend(repl::read_script(script)?);
        }
        let mut stdout = std::io::stdout().lock();
        repl::run_batch(&mut shell, &lines, &config.shell.prompt, &mut stdout).await
    } else {
        let settings = ReplSettings::from_config(&config.shell, cli.no_history);
        repl::run_interactive(&mut shell, &settings).await
    };

    shell.storage().close().await?;
    result
}
