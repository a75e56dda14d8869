//! Gauge MCP Server
//!
//! Line-delimited JSON-RPC over stdio.
//!
//! Tools:
//! - convert: Convert a value between two units of a category
//! - list_categories: List measurement categories
//! - list_units: List the units of a category
//! - history: Recent conversions, newest first
//! - help: Get documentation for functions
//! - list_functions: List available functions

mod config;
mod protocol;
mod tools;

use serde_json::Value as JsonValue;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use protocol::{McpError, McpRequest, McpResponse};
use tools::{Server, PROTOCOL_VERSION};

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the protocol; logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let body = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", body)?;
    stdout.flush()
}

/// Handle one input line; `None` when no response is due
fn handle_line(server: &mut Server, line: &str) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unparseable request");
            return Some(McpResponse::failure(Some(JsonValue::Null), McpError::parse_error(e)));
        }
    };

    let response = server.handle_request(&request);

    if request.is_notification() {
        debug!(method = %request.method, "notification processed");
        return None;
    }

    debug!(method = %request.method, "responding");
    Some(response)
}

fn main() {
    let config = ServerConfig::from_env();
    init_logging(&config.log_filter);
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    let mut server = Server::new(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        protocol = PROTOCOL_VERSION,
        history_limit = config.history_limit,
        default_category = %config.default_category,
        "Gauge MCP server started"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!(bytes = line.len(), "received");

                let Some(response) = handle_line(&mut server, line) else {
                    continue;
                };

                if let Err(e) = write_response(&response) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
}
