//! Subcommands and their mapping onto engine operations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use tokio::io::AsyncReadExt;
use zone_sync_core::{StatusCode, ZoneCommand};

/// File extensions stripped from zone file names in `sync --dir`.
const ZONE_FILE_EXTENSIONS: [&str; 2] = ["zone", "db"];

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Make a remote zone match a local zone file
    Save {
        #[arg(long)]
        zone: String,
        /// Zone file path, or `-` for stdin
        #[arg(long)]
        file: PathBuf,
    },
    /// Ensure a zone exists remotely
    AddZone {
        #[arg(long)]
        zone: String,
    },
    /// Delete zones (comma-separated)
    Remove {
        #[arg(long)]
        zones: String,
    },
    /// Print zones (comma-separated) as zone files
    Get {
        #[arg(long)]
        zones: String,
    },
    /// Print every zone as a zone file
    GetAll,
    /// List zone domains
    List,
    /// Print 1 if the zone exists, otherwise 0
    Exists {
        #[arg(long)]
        zone: String,
    },
    /// List the nameservers of all zones
    Nameservers,
    /// Save every zone file in a directory, named after the file
    Sync {
        #[arg(long)]
        dir: PathBuf,
    },
}

impl Command {
    /// Read any input files and build the engine command.
    pub async fn into_zone_command(self) -> Result<ZoneCommand> {
        let command = match self {
            Self::Save { zone, file } => ZoneCommand::SaveZone {
                zone,
                zonedata: read_zone_text(&file).await?,
            },
            Self::AddZone { zone } => ZoneCommand::AddZoneConf { zone },
            Self::Remove { zones } => ZoneCommand::RemoveZones { zones },
            Self::Get { zones } => ZoneCommand::GetZones { zones },
            Self::GetAll => ZoneCommand::GetAllZones,
            Self::List => ZoneCommand::GetZoneList,
            Self::Exists { zone } => ZoneCommand::ZoneExists { zone },
            Self::Nameservers => ZoneCommand::GetNameservers,
            Self::Sync { dir } => ZoneCommand::SyncZones {
                zones: read_zone_dir(&dir).await?,
            },
        };
        Ok(command)
    }
}

async fn read_zone_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read zone data from stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read zone file {}", path.display()))
}

/// Zone name for a file: its name without a `.zone`/`.db` extension.
fn zone_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stripped = ZONE_FILE_EXTENSIONS
        .iter()
        .find_map(|ext| file_name.strip_suffix(&format!(".{ext}")))
        .unwrap_or(file_name);
    Some(stripped.to_string())
}

/// `(zone, zonedata)` for every regular file in `dir`, sorted by zone name.
async fn read_zone_dir(dir: &Path) -> Result<Vec<(String, String)>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut zones = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Some(zone) = zone_name(&path) else {
            tracing::warn!("Skipping non UTF-8 file name {}", path.display());
            continue;
        };
        if zone.starts_with('.') {
            continue;
        }
        zones.push((zone, read_zone_text(&path).await?));
    }
    zones.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(zones)
}

/// Process exit code for an operation status.
pub fn exit_code(status: StatusCode) -> u8 {
    match status {
        StatusCode::Success => 0,
        StatusCode::Failure => 1,
        StatusCode::FailureLogged => 2,
    }
}
