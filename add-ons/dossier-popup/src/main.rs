//! Startup Dossier popup (terminal).
//!
//! Stands in for the browser-extension popup: the tab URL is typed instead of queried.
//! Commands: `fetch <tab-url>`, `copy`, `show`, `help`, `quit`.

mod backend;
mod popup;

use backend::BackendClient;
use popup::Popup;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "commands: fetch <tab-url> | copy | show | help | quit";

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[dossier-popup] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let backend = match BackendClient::from_env() {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, "DOSSIER_BACKEND_URL is not usable");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(backend = %backend.base_url(), "popup started");
    let mut popup = Popup::new(backend);

    // A URL on the command line is fetched right away, like opening the popup on that tab.
    if let Some(url) = std::env::args().nth(1) {
        popup.fetch(Some(&url)).await;
        print_popup(&popup);
    } else {
        println!("{}", HELP);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("fetch") => {
                popup.fetch(parts.next()).await;
                print_popup(&popup);
            }
            Some("copy") => match popup.copy().await {
                Some(text) => {
                    if cfg!(not(feature = "clipboard")) {
                        println!("{}", text);
                    }
                    println!("[{}]", popup.copy_label());
                }
                None => println!("[{}] (disabled)", popup.copy_label()),
            },
            Some("show") => print_popup(&popup),
            Some("help") => println!("{}", HELP),
            Some("quit") | Some("exit") => break,
            Some(other) => println!("unknown command: {} ({})", other, HELP),
            None => {}
        }
    }
}

fn print_popup(popup: &Popup) {
    for status in popup.statuses() {
        println!("> {}", status);
    }
    println!("Domain  {}", popup.domain_text());
    print!("{}", popup.view());
    let copy_state = if popup.copy_enabled() { "" } else { " (disabled)" };
    println!("[{}]{}", popup.copy_label(), copy_state);
}
