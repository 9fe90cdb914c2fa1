use clap::Parser;
use wicket_api::cli::Cli;

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = wicket_api::cli::run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
