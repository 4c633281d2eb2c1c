//! Bookshelf administration CLI

use std::process;

use clap::Parser;

mod cli;

#[tokio::main]
pub async fn main() {
    _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = cli.run().await {
        #[expect(clippy::print_stderr, reason = "CLI reports failures on stderr")]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}
