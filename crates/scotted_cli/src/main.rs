//! Command-line access to persisted audio preferences.
//!
//! # Responsibility
//! - Inspect and change the preference database the web shell syncs from.
//! - Keep output deterministic (`key=value` or JSON) for scripting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scotted_core::db::open_db;
use scotted_core::{
    default_log_level, init_logging, AudioPreference, AudioPreferenceStore, KeyValueStorage,
    SqliteKeyValueStorage,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "scotted")]
#[command(about = "Inspect and change persisted Scotted audio preferences", long_about = None)]
struct Cli {
    /// SQLite file holding durable preferences
    #[arg(long, env = "SCOTTED_DB", default_value = "scotted.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "SCOTTED_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "SCOTTED_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the preference as the JSON change-event payload
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current preference
    Show,
    /// Set the volume (clamped to 0..=1); unmutes when above zero
    SetVolume {
        #[arg(allow_negative_numbers = true)]
        volume: f64,
    },
    /// Flip the mute flag
    ToggleMute,
    /// Forget stored values so defaults apply again
    Reset,
    /// Check core linkage
    Ping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    for line in run(&cli)? {
        println!("{line}");
    }
    Ok(())
}

/// Executes one command and returns the lines to print.
///
/// Every change broadcast by the store is printed once. A command that
/// broadcasts nothing (`show`, a rejected volume, a reset of default values)
/// prints the preference it left in place.
fn run(cli: &Cli) -> Result<Vec<String>> {
    if let Commands::Ping = cli.command {
        return Ok(vec![
            format!("scotted_core ping={}", scotted_core::ping()),
            format!("scotted_core version={}", scotted_core::core_version()),
        ]);
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open preference database `{}`", cli.db.display()))?;
    let storage = SqliteKeyValueStorage::new(&conn);
    let store = AudioPreferenceStore::new(&storage);

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    let _recorder = store.subscribe(move |preference: &AudioPreference| {
        sink.borrow_mut().push(*preference);
    });

    let outcome = match cli.command {
        Commands::Show | Commands::Ping => store.preference(),
        Commands::SetVolume { volume } => store.set_volume(volume),
        Commands::ToggleMute => store.toggle_mute(),
        Commands::Reset => {
            let config = store.config();
            storage.remove_item(&config.muted_key)?;
            storage.remove_item(&config.volume_key)?;
            store.reload()
        }
    };

    let mut printed = changes.take();
    log::debug!(
        "event=cli_command module=cli status=ok changes={}",
        printed.len()
    );
    if printed.is_empty() {
        printed.push(outcome);
    }
    printed
        .iter()
        .map(|preference| render_preference(preference, cli.json))
        .collect()
}

fn render_preference(preference: &AudioPreference, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string(preference)?)
    } else {
        Ok(format!("muted={} volume={}", preference.is_muted, preference.volume))
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Cli};
    use clap::Parser;
    use std::path::Path;

    fn run_with(db: &Path, args: &[&str]) -> Vec<String> {
        let mut argv = vec!["scotted", "--db", db.to_str().unwrap()];
        argv.extend_from_slice(args);
        run(&Cli::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn show_prints_defaults_for_a_new_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("prefs.sqlite3");

        assert_eq!(run_with(&db, &["show"]), vec!["muted=true volume=1"]);
        assert_eq!(
            run_with(&db, &["--json", "show"]),
            vec![r#"{"isMuted":true,"volume":1.0}"#]
        );
    }

    #[test]
    fn set_volume_prints_the_change_once_and_persists_it() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("prefs.sqlite3");

        assert_eq!(
            run_with(&db, &["set-volume", "0.4"]),
            vec!["muted=false volume=0.4"]
        );
        assert_eq!(run_with(&db, &["show"]), vec!["muted=false volume=0.4"]);
    }

    #[test]
    fn rejected_volume_still_prints_the_current_preference() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("prefs.sqlite3");
        run_with(&db, &["set-volume", "0.6"]);

        assert_eq!(
            run_with(&db, &["set-volume", "NaN"]),
            vec!["muted=false volume=0.6"]
        );
    }

    #[test]
    fn negative_zero_volume_prints_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("prefs.sqlite3");

        assert_eq!(
            run_with(&db, &["set-volume", "-0"]),
            vec!["muted=true volume=0"]
        );
    }

    #[test]
    fn reset_prints_defaults_whether_or_not_anything_changed() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("prefs.sqlite3");

        assert_eq!(run_with(&db, &["reset"]), vec!["muted=true volume=1"]);

        run_with(&db, &["toggle-mute"]);
        assert_eq!(run_with(&db, &["reset"]), vec!["muted=true volume=1"]);
    }
}
