//! # Storefront CLI Entry Point
//!
//! ```bash
//! storefront catalog list --filter featured
//! storefront cart add 1 --qty 2 --color Black
//! storefront auth login john@example.com secret
//! storefront checkout --payment paypal
//! storefront theme set dark
//! ```
//!
//! The actual setup is in lib.rs so it can be exercised from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::Parser;

use storefront_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
