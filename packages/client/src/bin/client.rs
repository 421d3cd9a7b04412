//! Interactive CLI client for the Kodama event server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kodama-client -- --namespace /admin --auth '{"token":"abc"}'
//! ```

use clap::Parser;
use kodama_client::{ClientError, Connection, build_ws_url, connection::parse_auth};
use kodama_server::domain::NamespacePath;
use kodama_shared::logger::setup_logger;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "kodama-client", version, about = "Interactive client for kodama-server")]
struct Args {
    /// Server base URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Namespace to join
    #[arg(short, long, default_value = "/")]
    namespace: String,

    /// Auth object sent with the join request (JSON)
    #[arg(long)]
    auth: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    if let Err(e) = run(args).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let url = build_ws_url(&args.url)?;
    let namespace = NamespacePath::new(args.namespace)?;
    let auth = args.auth.as_deref().map(parse_auth).transpose()?;

    let connection = Connection::connect(&url, namespace, auth).await?;
    println!(
        "connected to {} on {} (sid: {})",
        url,
        connection.namespace(),
        connection.sid
    );
    println!("type an event name with an optional JSON argument, /leave or /quit");

    let (tx, rx) = mpsc::unbounded_channel();
    // rustyline blocks, keep it off the runtime
    std::thread::spawn(move || read_lines(tx));

    connection.run(rx).await
}

fn read_lines(tx: mpsc::UnboundedSender<String>) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to start line editor: {e}");
            let _ = tx.send("/quit".to_string());
            return;
        }
    };

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                let _ = tx.send("/quit".to_string());
                break;
            }
            Err(e) => {
                eprintln!("Failed to read line: {e}");
                let _ = tx.send("/quit".to_string());
                break;
            }
        }
    }
}
