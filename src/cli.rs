use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::models::{Identity, Role};

#[derive(Parser, Debug)]
#[command(name = "ridehail")]
#[command(about = "Terminal client for rider and driver registration, profile updates and trip history")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run in CLI mode (print output and exit, no interactive TUI)
    #[arg(long, global = true)]
    pub cli: bool,

    /// Phone number to pre-fill on the login screen
    #[arg(long)]
    pub cellphone: Option<String>,

    /// Role to pre-fill on the login screen (Usuario or Conductor)
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the trips of a rider or driver
    Trips {
        /// Registered phone number
        #[arg(long)]
        cellphone: String,

        /// Role: Usuario or Conductor
        #[arg(long, default_value = "Usuario")]
        user: String,
    },

    /// Show the stored profile of a rider or driver
    Profile {
        /// Registered phone number
        #[arg(long)]
        cellphone: String,

        /// Role: Usuario or Conductor
        #[arg(long, default_value = "Usuario")]
        user: String,
    },
}

impl Commands {
    /// Identity the command runs as
    pub fn identity(&self) -> Result<Identity> {
        match self {
            Commands::Trips { cellphone, user } | Commands::Profile { cellphone, user } => {
                Ok(Identity::new(cellphone.as_str(), Self::parse_role(user)?))
            }
        }
    }

    pub fn parse_role(user: &str) -> Result<Role> {
        user.parse()
    }
}

impl Cli {
    /// Login pre-fill from `--cellphone`/`--user`; the role defaults to Usuario
    pub fn prefill(&self) -> Result<Option<Identity>> {
        match (&self.cellphone, &self.user) {
            (None, None) => Ok(None),
            (phone, user) => {
                let role = match user {
                    Some(user) => Commands::parse_role(user)?,
                    None => Role::Rider,
                };
                Ok(Some(Identity::new(phone.clone().unwrap_or_default(), role)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trips_command() {
        let cli = Cli::try_parse_from([
            "ridehail", "--cli", "trips", "--cellphone", "3001234567", "--user", "Conductor",
        ])
        .unwrap();
        assert!(cli.cli);

        let command = cli.command.unwrap();
        assert_eq!(
            command.identity().unwrap(),
            Identity::new("3001234567", Role::Driver)
        );
    }

    #[test]
    fn test_prefill_defaults_to_rider() {
        let cli = Cli::try_parse_from(["ridehail", "--cellphone", "1"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.prefill().unwrap(), Some(Identity::new("1", Role::Rider)));

        let cli = Cli::try_parse_from(["ridehail"]).unwrap();
        assert_eq!(cli.prefill().unwrap(), None);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let cli = Cli::try_parse_from(["ridehail", "profile", "--cellphone", "1", "--user", "Piloto"])
            .unwrap();
        assert!(cli.command.unwrap().identity().is_err());
    }
}
