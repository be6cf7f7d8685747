//! Command line surface: run the HTTP API, answer one question, or hold an
//! interactive session on stdin until `quit`.

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::models::result::NO_RESULT_SENTINEL;
use crate::query::pipeline::{QueryPipeline, QUIT_SENTINEL};

const PROMPT: &str = "> ";

#[derive(Parser)]
#[command(
    name = "sqlrag",
    about = "Natural-language questions over the events database",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Answer a single question and exit.
    Ask {
        /// Natural language question, e.g. "oil companies at cybersecurity events"
        query: String,
    },
    /// Read questions from stdin, one per line, until "quit".
    Session,
}

/// Summary for `query`, or the no-result sentinel when the pipeline failed.
pub async fn answer(pipeline: &QueryPipeline, query: &str) -> String {
    pipeline
        .process(query)
        .await
        .unwrap_or_else(|| NO_RESULT_SENTINEL.to_string())
}

/// Answers each non-blank line of `input` on `output`. Stops at end of input
/// or at the quit sentinel and returns how many questions were answered.
pub async fn run_session<R, W>(
    pipeline: &QueryPipeline,
    input: R,
    mut output: W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0;

    output.write_all(PROMPT.as_bytes()).await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let query = line.trim();
        if query.eq_ignore_ascii_case(QUIT_SENTINEL) {
            break;
        }

        if !query.is_empty() {
            let reply = answer(pipeline, query).await;
            output.write_all(reply.as_bytes()).await?;
            output.write_all(b"\n").await?;
            answered += 1;
        }

        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;
    }

    Ok(answered)
}
