//! `yuki chat` — Interactive or single-message chat mode.
//!
//! Each turn: append the user message to history, select the bounded
//! context window, stream the response to the terminal while it
//! accumulates, then append the assistant message and persist. On a
//! rejected request or a transport failure the turn is *not* persisted:
//! the history file stays exactly as it was before the turn.

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use yuki_client::{ChatClient, GenerationOptions};
use yuki_config::AppConfig;
use yuki_core::message::{History, Message};
use yuki_core::sink::DeltaSink;
use yuki_core::{ClientError, select};
use yuki_store::ChatStore;

/// A sink that echoes each delta to stdout immediately, flushing so
/// partial text is visible before the stream completes.
struct StdoutSink;

impl DeltaSink for StdoutSink {
    fn on_delta(&mut self, delta: &str) {
        print!("{delta}");
        let _ = std::io::stdout().flush();
    }
}

pub async fn run(
    message: Option<String>,
    chat_override: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    config.validate()?;

    let client = ChatClient::new(&config.server_url, &config.model);
    let options = GenerationOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    let chat_path = chat_override.unwrap_or_else(|| config.chat_file_path());
    let store = ChatStore::new(&chat_path);
    let mut history = store.load()?;

    if let Some(msg) = message {
        // Single message mode
        run_turn(
            &client,
            options,
            config.context_window,
            &store,
            &mut history,
            &msg,
            ctrl_c(),
        )
        .await?;
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Yuki — chatting with {} at {}", config.model, config.server_url);
    if !history.is_empty() {
        println!(
            "  Resuming {} ({} messages, ~{} chars)",
            chat_path.display(),
            history.len(),
            history.content_chars()
        );
    }
    println!("  Type your message and press Enter. Type 'exit' or Ctrl+C to quit.");
    println!();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        // Ctrl+C at the prompt quits, as promised by the banner; during
        // a stream it only cancels the turn (see run_turn).
        let line = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => line.trim().to_string(),
                None => break, // EOF (Ctrl+D)
            },
            _ = tokio::signal::ctrl_c() => break,
        };
        if line.is_empty() {
            continue;
        }
        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit") {
            break;
        }

        if let Err(e) = run_turn(
            &client,
            options,
            config.context_window,
            &store,
            &mut history,
            &line,
            ctrl_c(),
        )
        .await
        {
            eprintln!("  [Error] {e}");
        }
        println!();
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

/// Resolves when the user presses Ctrl+C.
async fn ctrl_c() {
    let _ = tokio::signal::ctrl_c().await;
}

/// One chat turn: append user message, stream the reply, persist both.
/// The turn is raced against `interrupt`; if that future resolves first
/// the transport read is aborted and the turn fails as a transport
/// cancellation, distinguishable from a clean end of stream.
///
/// On failure the user message stays in memory (re-sent with the next
/// turn's context) but nothing is written to disk, so a crashed or
/// cancelled stream never leaves a half-finished turn in the file.
async fn run_turn<F>(
    client: &ChatClient,
    options: GenerationOptions,
    context_window: usize,
    store: &ChatStore,
    history: &mut History,
    user_input: &str,
    interrupt: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: std::future::Future<Output = ()>,
{
    history.push(Message::user(user_input));
    let window = select(&history.messages, context_window)?;

    print!("  Assistant > ");
    std::io::stdout().flush()?;

    let mut sink = StdoutSink;
    let result = tokio::select! {
        result = client.stream_chat(window, options, &mut sink) => result,
        _ = interrupt => {
            Err(ClientError::Transport("interrupted by user".into()))
        }
    };

    match result {
        Ok(reply) => {
            println!();
            history.push(Message::assistant(reply));
            store.save(history)?;
            Ok(())
        }
        Err(e) => {
            // Output stops mid-line; make that visually distinct from a
            // clean completion before the caller prints the error.
            println!();
            Err(e.into())
        }
    }
}
