use clap::{Parser, Subcommand};
use rand::Rng;
use uuid::Uuid;

use crate::config;
use crate::token::{Subject, TokenService};

#[derive(Parser)]
#[command(name = "wicket")]
#[command(about = "Wicket CLI - operator tooling for the Wicket API gateway")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate a signing secret for WICKET_TOKEN_SECRET")]
    Secret {
        #[arg(long, default_value_t = 30, help = "Secret length in characters")]
        length: usize,
    },

    #[command(about = "Bearer token management")]
    Token {
        #[command(subcommand)]
        cmd: TokenCommands,
    },
}

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a signed token for a subject")]
    Issue {
        #[arg(help = "Subject username")]
        username: String,

        #[arg(long, help = "Subject id (random when omitted)")]
        id: Option<Uuid>,

        #[arg(long = "role", help = "Subject role, repeatable")]
        roles: Vec<String>,

        #[arg(long, help = "Validity in seconds (configured ttl when omitted)")]
        ttl: Option<u64>,
    },

    #[command(about = "Verify a token and print its claims")]
    Verify {
        #[arg(help = "Compact token string")]
        token: String,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Secret { length } => {
            println!("{}", generate_secret(length));
            Ok(())
        }
        Commands::Token { cmd } => run_token(cmd),
    }
}

fn run_token(cmd: TokenCommands) -> anyhow::Result<()> {
    let config = config::config();
    if config.security.token_secret.is_empty() {
        anyhow::bail!("no signing secret configured; set WICKET_TOKEN_SECRET");
    }
    let service = TokenService::new(&config.security);

    match cmd {
        TokenCommands::Issue { username, id, roles, ttl } => {
            let subject = Subject {
                id: id.unwrap_or_else(Uuid::new_v4),
                username,
                roles,
            };
            let token = match ttl {
                Some(secs) => service.issue_with_ttl(&subject, secs)?,
                None => service.issue(&subject)?,
            };
            println!("{}", token);
            Ok(())
        }
        TokenCommands::Verify { token } => {
            let claims = service.verify(&token)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
            Ok(())
        }
    }
}

/// Random key over the same character set the original admin tooling used.
fn generate_secret(length: usize) -> String {
    const CHARS: &[u8] =
        b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789~!@$%^&*()_+-={}[]:;<>?,./|";

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}
