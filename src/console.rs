//! Console Module
//!
//! Line-based interface for querying the proxy from a terminal. Reads one
//! command per line and answers on the writer. Keys are used raw, without
//! authentication or namespacing, but follow the same validation as HTTP keys
//! so namespaced records stay out of reach.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::proxy::{validate_key, ProxyCache};

pub const PROMPT: &str = "RESPY>";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get(String),
    /// GET without a key
    MissingKey,
    Unsupported,
}

impl Command {
    /// Parses a line. Returns None for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next()?;

        if !verb.eq_ignore_ascii_case("GET") {
            return Some(Command::Unsupported);
        }

        Some(match parts.next() {
            Some(key) => Command::Get(key.to_string()),
            None => Command::MissingKey,
        })
    }
}

/// Serves console commands from `reader` until it is exhausted.
pub async fn run_console<R, W>(proxy: &ProxyCache, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(format!("{}\n", PROMPT).as_bytes()).await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        debug!(?command, "console command");

        let reply = match command {
            Command::Get(key) => match validate_key(&key) {
                Err(e) => format!("(error) {}", e),
                Ok(()) => match proxy.handle_get(&key).await {
                    Ok(Some(value)) => value,
                    Ok(None) => "(nil)".to_string(),
                    Err(e) => format!("(error) {}", e),
                },
            },
            Command::MissingKey => "usage: GET <key>".to_string(),
            Command::Unsupported => "Only GET is supported".to_string(),
        };

        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}
