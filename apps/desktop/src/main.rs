use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{CredentialClient, Field, Outcome, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// POST the credentials to /crud/save_credentials.
    Save {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// POST the email to /crud/get_by_email.
    Lookup {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let client = CredentialClient::new(&cli.base_url)?;
    let outcome = match cli.command {
        Command::Save { email, password } => {
            client.update_field(Field::Email, email);
            client.update_field(Field::Password, password);
            client.submit_save().await
        }
        Command::Lookup { email } => {
            client.update_field(Field::Email, email);
            client.submit_lookup().await
        }
    };

    match &outcome {
        Outcome::Success(exchange) => {
            println!("Success: {} {}", exchange.status, exchange.status_text);
            println!("{}", serde_json::to_string_pretty(&exchange.data)?);
        }
        Outcome::Failure(exchange) => {
            println!("Error: {} {}", exchange.status, exchange.status_text);
            println!("{}", serde_json::to_string_pretty(&exchange.data)?);
        }
        Outcome::Network { message } => {
            println!("{message}");
        }
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
