use std::io::{self, Read};

use clap::{Args, Subcommand};

use crate::config;
use crate::credential::{self, CredentialStore, FileCredentialStore};

#[derive(Debug, Args, Clone)]
pub struct CredentialArgs {
    #[command(subcommand)]
    command: CredentialSubcommand,
}

#[derive(Debug, Subcommand, Clone)]
enum CredentialSubcommand {
    /// Store the OpenAI API key read from stdin, replacing any stored key.
    Set,
    /// Show whether a key is stored (masked).
    Status,
    /// Remove the stored key.
    Clear,
}

pub fn run(args: CredentialArgs) -> Result<(), String> {
    let store = FileCredentialStore::new(config::credentials_path()?);
    match args.command {
        CredentialSubcommand::Set => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|err| format!("Failed to read credential from stdin: {err}"))?;
            set(&store, &input)?;
            println!("credential stored: {}", store.path().display());
            Ok(())
        }
        CredentialSubcommand::Status => {
            println!("{}", status(&store)?);
            Ok(())
        }
        CredentialSubcommand::Clear => {
            store.clear().map_err(|err| err.to_string())?;
            println!("credential cleared");
            Ok(())
        }
    }
}

fn set(store: &dyn CredentialStore, input: &str) -> Result<(), String> {
    let value = input.trim();
    if value.is_empty() {
        return Err("No credential provided on stdin.".to_string());
    }
    store.set(value).map_err(|err| err.to_string())
}

fn status(store: &dyn CredentialStore) -> Result<String, String> {
    let stored = store.get().map_err(|err| err.to_string())?;
    Ok(match stored {
        Some(value) => format!("stored: {}", credential::mask(&value)),
        None => "stored: none".to_string(),
    })
}
