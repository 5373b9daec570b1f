//! Command-line front end.
//!
//! `serve` runs the HTTP API. Every other command drives a [`SyncClient`]
//! against a running server and prints the resulting state and toasts.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use crate::backend::{Backend, BackendCredentials, MemoryBackend};
use crate::clip::ClipId;
use crate::config::Config;
use crate::datetime::format_date;
use crate::file::{display_name, IncomingFile};
use crate::sync::{
    format_bytes, BridgeApi, HttpApi, QueueStatus, Severity, SyncClient,
    SyncSettings, SystemClipboard, WriterSink,
};
use crate::web::WebServer;
use crate::{BridgeError, Result};

/// Base URL handed to the in-memory backend for public URLs.
const MEMORY_BASE_URL: &str = "http://localhost:54321";

/// DataBridge - personal file and text transfer.
#[derive(Parser, Debug)]
#[command(name = "databridge", version)]
#[command(about = "Personal file and text transfer service")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, short, default_value = "config.toml", env = "DATABRIDGE_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Keep files and clips in memory instead of the configured backend
        #[arg(long)]
        memory: bool,
    },
    /// Upload one or more files in a single batch
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List stored files
    Files,
    /// Delete a stored file
    Rm {
        /// Stored name as shown by `files`
        stored_name: String,
    },
    /// List text clips
    Clips {
        /// Show long clips in full
        #[arg(long)]
        full: bool,
    },
    /// Save a text clip
    Clip {
        /// Optional label
        #[arg(long, short)]
        label: Option<String>,
        /// Clip content, or `-` to read standard input
        content: String,
    },
    /// Copy a clip's exact content to the clipboard
    Copy {
        /// Clip id as shown by `clips`
        id: String,
        /// Write the content to standard output instead
        #[arg(long)]
        stdout: bool,
    },
    /// Delete a text clip
    RmClip {
        /// Clip id as shown by `clips`
        id: String,
    },
}

impl Command {
    /// Whether this command runs the server.
    pub fn is_server(&self) -> bool {
        matches!(self, Command::Serve { .. })
    }
}

/// Run a command and map its outcome to an exit code.
pub async fn execute(command: Command, config: &Config) -> Result<ExitCode> {
    if let Command::Serve { memory } = command {
        serve(config, memory).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let timeout = Duration::from_secs(config.client.timeout_secs);
    let api = HttpApi::new(&config.client.api_url, timeout)?;
    let mut client = SyncClient::new(api, SyncSettings::from(&config.client));
    run_client(command, &mut client, &config.client.timezone).await?;

    print_toasts(&client);
    if client.toasts().has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn serve(config: &Config, memory: bool) -> Result<()> {
    let backend = if memory {
        tracing::info!("Using in-memory backend, data is lost on exit");
        let store = Arc::new(MemoryBackend::with_base_url(MEMORY_BASE_URL, &config.backend.bucket));
        Backend::in_memory(&BackendCredentials::new(MEMORY_BASE_URL, "memory"), store)
    } else {
        Backend::connect(&config.backend)?
    };

    WebServer::new(config, Arc::new(backend))?.run().await
}

/// Run a client command against `client`.
pub async fn run_client<A: BridgeApi>(
    command: Command,
    client: &mut SyncClient<A>,
    timezone: &str,
) -> Result<()> {
    match command {
        Command::Serve { .. } => {
            return Err(BridgeError::Cli("serve is not a client command".to_string()));
        }
        Command::Upload { paths } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                files.push(read_file(path).await?);
            }
            client.upload(files).await;
            for item in client.queue().items() {
                let status = match item.status {
                    QueueStatus::Uploading => "uploading",
                    QueueStatus::Done => "done",
                    QueueStatus::Error => "error",
                };
                println!("{status:<9} {}", item.name);
            }
        }
        Command::Files => {
            client.load_files().await;
            for file in client.files() {
                println!(
                    "{:<40} {:>9}  {:<14} {}",
                    file.name,
                    format_bytes(file.size),
                    format_date(file.created_at.as_ref(), timezone),
                    file.stored_name
                );
                println!("    {}", file.url);
            }
        }
        Command::Rm { stored_name } => {
            let name = display_name(&stored_name).to_string();
            client.delete_file(&stored_name, &name).await;
        }
        Command::Clips { full } => {
            client.load_clips().await;
            if full {
                let long: Vec<ClipId> = client
                    .clips()
                    .iter()
                    .filter(|c| client.is_long(c))
                    .map(|c| c.id.clone())
                    .collect();
                for id in &long {
                    client.toggle_expand(id);
                }
            }
            for clip in client.clips() {
                println!(
                    "[{}] {}  {}",
                    clip.id,
                    clip.display_label(),
                    format_date(Some(&clip.created_at), timezone)
                );
                for line in client.clip_preview(clip).lines() {
                    println!("    {line}");
                }
            }
        }
        Command::Clip { label, content } => {
            let content = if content == "-" {
                let mut buf = String::new();
                tokio::io::stdin().read_to_string(&mut buf).await?;
                buf
            } else {
                content
            };
            client.set_text(content);
            client.set_label(label.unwrap_or_default());
            if !client.can_save() {
                return Err(BridgeError::Cli("Nothing to save: content is empty".to_string()));
            }
            client.save_text().await;
        }
        Command::Copy { id, stdout } => {
            client.load_clips().await;
            let id = ClipId::parse(&id);
            if stdout {
                client.copy_clip(&id, &mut WriterSink::new(std::io::stdout().lock()));
            } else {
                client.copy_clip(&id, &mut SystemClipboard);
            }
        }
        Command::RmClip { id } => {
            client.delete_clip(&ClipId::parse(&id)).await;
        }
    }
    Ok(())
}

async fn read_file(path: &Path) -> Result<IncomingFile> {
    let content = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| BridgeError::Cli(format!("{} is not a file", path.display())))?;
    let mut file = IncomingFile::new(name, content);
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        file = file.with_content_type(mime);
    }
    Ok(file)
}

fn print_toasts<A: BridgeApi>(client: &SyncClient<A>) {
    for toast in client.toasts().toasts() {
        let tag = match toast.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
            Severity::Info => "info",
        };
        eprintln!("[{tag}] {}", toast.message);
    }
}
