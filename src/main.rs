//! MySQL Backup/Restore Tool
//!
//! Hosts the MySQL plugin against a local backup directory.

use anyhow::{Context, Result};
use mysqltool::config::{
    AppConfig, BackupConfig, RestoreConfig, RestoreSource, load_backup_config_from_json,
    load_restore_config_from_json,
};
use mysqltool::storage::archive::{pack_storage, timestamped_archive_path, unpack_into_storage};
use mysqltool::utils::{ConsoleOutput, SystemTempFiles};
use mysqltool::{
    BackupDatabase, DUMP_FILE_NAME, DirectoryStorage, MysqlPlugin, Plugin, WaitLimits,
    check_options,
};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run_app().await {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    let config_path = env::var("MYSQLTOOL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let mut app_config = AppConfig::load_from_json(&config_path).context(format!(
        "Failed to load application configuration from {}",
        config_path.display()
    ))?;
    app_config.apply_database_url(env::var("DATABASE_URL").ok());

    let args: Vec<String> = env::args().collect();
    let choice = if args.len() > 1 {
        args[1].trim().to_string()
    } else {
        prompt_choice()?
    };

    match choice.as_str() {
        "1" | "backup" => {
            println!("🚀 Starting Backup Process...");
            let backup_config = load_backup_config_from_json(&app_config.raw_json_config)
                .context("Failed to load backup configuration from JSON")?;
            run_backup_flow(&backup_config)
                .await
                .context("Backup process failed")?;
        }
        "2" | "restore" => {
            println!("🔄 Starting Restore Process...");
            let restore_config = load_restore_config_from_json(&app_config.raw_json_config)
                .context("Failed to load restore configuration from JSON")?;
            run_restore_flow(&restore_config)
                .await
                .context("Restore process failed")?;
        }
        _ => {
            println!("❌ Invalid choice. Please enter '1' (backup) or '2' (restore).");
            anyhow::bail!("Invalid operation choice");
        }
    }
    Ok(())
}

fn build_plugin(temp_dump_root: Option<&Path>, timeout: Option<std::time::Duration>) -> MysqlPlugin {
    let temp_files = match temp_dump_root {
        Some(root) => SystemTempFiles::in_dir(root),
        None => SystemTempFiles::new(),
    };
    let limits = WaitLimits {
        timeout,
        ..WaitLimits::default()
    };

    // First Ctrl+C cancels the running tool; the flow then fails normally.
    let cancel = limits.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nShutdown signal received, stopping the running MySQL tool...");
            cancel.cancel();
        }
    });

    MysqlPlugin::new(Arc::new(ConsoleOutput), Arc::new(temp_files)).with_limits(limits)
}

async fn run_backup_flow(config: &BackupConfig) -> Result<()> {
    let plugin = build_plugin(config.temp_dump_root.as_deref(), config.process_timeout);
    check_options(&plugin, &config.options).context("Invalid mysql options in config.json")?;

    let source = DirectoryStorage::open(env::current_dir()?)?;
    let mut database = BackupDatabase::default();

    if config.archive {
        let staging = match &config.temp_dump_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                tempfile::tempdir_in(root)?
            }
            None => tempfile::tempdir()?,
        };
        let mut destination = DirectoryStorage::open(staging.path())?;
        plugin
            .backup(&source, &mut destination, Some(&mut database), &config.options)
            .await?;
        let archive_path = timestamped_archive_path(&config.local_backup_path);
        pack_storage(&destination, &[DUMP_FILE_NAME], &archive_path)?;
        println!("✓ Backup archive created at {}", archive_path.display());
    } else {
        let mut destination = DirectoryStorage::open(&config.local_backup_path)?;
        plugin
            .backup(&source, &mut destination, Some(&mut database), &config.options)
            .await?;
        println!("✓ Backup stored in {}", destination.root().display());
    }
    Ok(())
}

async fn run_restore_flow(config: &RestoreConfig) -> Result<()> {
    let plugin = build_plugin(config.temp_dump_root.as_deref(), config.process_timeout);
    check_options(&plugin, &config.options).context("Invalid mysql options in config.json")?;

    let mut destination = DirectoryStorage::open(env::current_dir()?)?;
    let database = BackupDatabase::default();

    match &config.source {
        RestoreSource::Directory(dir) => {
            println!("Restoring from backup directory {}", dir.display());
            let source = DirectoryStorage::open(dir)?;
            plugin
                .restore(&source, &mut destination, Some(&database), &config.options)
                .await?;
        }
        RestoreSource::Archive(archive) => {
            println!("Restoring from archive {}", archive.display());
            let extract_dir = tempfile::tempdir()?;
            let mut source = DirectoryStorage::open(extract_dir.path())?;
            let names = unpack_into_storage(archive, &mut source)?;
            tracing::debug!("Unpacked {:?} into {}", names, source.root().display());
            plugin
                .restore(&source, &mut destination, Some(&database), &config.options)
                .await?;
        }
    }
    println!("✓ Restore finished");
    Ok(())
}

/// Prompts user to select backup or restore operation
fn prompt_choice() -> Result<String> {
    use std::io::{Write, stdin, stdout};

    println!("Select an operation:");
    println!("1. Take Backup (or type 'backup')");
    println!("2. Restore Backup (or type 'restore')");
    print!("Enter your choice: ");
    stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    stdin().read_line(&mut input).context("Failed to read user input")?;
    Ok(input.trim().to_string())
}
