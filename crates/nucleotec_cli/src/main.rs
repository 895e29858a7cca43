//! NucleoTec CLI - command-line interface for the consultancy registry.

use clap::Parser;
use log::{error, info};
use nucleotec_cli::commands;
use nucleotec_cli::{Cli, Config, Formatter, Outcome, Session};
use nucleotec_core::db::open_db;
use nucleotec_core::init_logging;

fn main() {
    if let Err(e) = run() {
        error!("event=cli_exit module=cli status=error error={e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> nucleotec_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    let format = cli.format.map(Into::into).unwrap_or(config.format);

    let cwd = std::env::current_dir()?;
    init_logging(&config.log_level, config.absolute_log_dir(&cwd))?;
    info!(
        "event=cli_start module=cli status=ok db={} reconcile_mode={:?}",
        config.database_path.display(),
        config.reconcile_mode
    );

    let mut conn = open_db(&config.database_path)?;
    let formatter = Formatter::new(format);
    let mut session = Session {
        conn: &mut conn,
        formatter: &formatter,
        db_path: &config.database_path,
        reconcile_mode: config.reconcile_mode,
    };

    match commands::execute(cli.command, &mut session)? {
        Outcome::Done(output) => {
            println!("{output}");
            Ok(())
        }
        Outcome::Partial(output, err) => {
            println!("{output}");
            Err(err)
        }
    }
}
