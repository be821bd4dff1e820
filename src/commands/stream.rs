use std::io::{BufRead, Write};

use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};

use super::GlobalArgs;
use crate::message::Message;
use crate::picker::{IndexPicker, RngPicker};
use crate::reply::Responder;

#[derive(Debug, Args)]
pub struct StreamArgs {
    /// Seed the random generator for reproducible replies
    #[arg(long)]
    pub seed: Option<u64>,
}

/// One input line.
#[derive(Debug, Deserialize)]
pub struct StreamRequest {
    pub message: Message,
    #[serde(default)]
    pub prior_ids: Vec<String>,
    #[serde(default)]
    pub parent: Option<Message>,
}

/// One output line.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamResponse {
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub received: usize,
    pub replied: usize,
    pub failed: usize,
}

impl StreamArgs {
    /// Answer JSON lines from stdin on stdout until EOF.
    pub fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let responder = global.load()?.responder()?;

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let stats = match self.seed {
            Some(seed) => run(
                &responder,
                stdin.lock(),
                stdout.lock(),
                &mut RngPicker::seeded(seed),
            )?,
            None => run(&responder, stdin.lock(), stdout.lock(), &mut RngPicker::thread())?,
        };

        tracing::info!(
            received = stats.received,
            replied = stats.replied,
            failed = stats.failed,
            "stream finished"
        );
        Ok(())
    }
}

/// Process every line of `input`, writing one response line per request.
///
/// A line that is not UTF-8, or fails to parse or render, produces an error
/// response; the loop keeps going. Only I/O failures end it early.
pub fn run<R: BufRead, W: Write>(
    responder: &Responder,
    mut input: R,
    mut output: W,
    picker: &mut dyn IndexPicker,
) -> anyhow::Result<StreamStats> {
    let mut stats = StreamStats::default();
    let mut buf = Vec::new();
    let mut lineno = 0usize;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).context("reading input")? == 0 {
            break;
        }
        lineno += 1;

        let result = match std::str::from_utf8(trim_line_ending(&buf)) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(responder, line, picker),
            Err(e) => Err(anyhow::Error::new(e).context("invalid UTF-8 in request")),
        };
        stats.received += 1;

        let response = match result {
            Ok(reply) => {
                if reply.is_some() {
                    stats.replied += 1;
                }
                StreamResponse { reply, error: None }
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(line = lineno, error = %e, "could not answer message");
                StreamResponse {
                    reply: None,
                    error: Some(format!("{e:#}")),
                }
            }
        };

        serde_json::to_writer(&mut output, &response).context("writing response")?;
        writeln!(output).context("writing response")?;
        output.flush().context("flushing output")?;
    }

    Ok(stats)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn handle_line(
    responder: &Responder,
    line: &str,
    picker: &mut dyn IndexPicker,
) -> anyhow::Result<Option<String>> {
    let request: StreamRequest = serde_json::from_str(line).context("invalid request")?;
    tracing::debug!(author = %request.message.author.name, body = %request.message.body, "message");
    let reply = responder.reply(
        &request.message,
        &request.prior_ids,
        request.parent.as_ref(),
        picker,
    )?;
    Ok(reply)
}
