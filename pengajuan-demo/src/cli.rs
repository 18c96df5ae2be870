//! Command-line arguments of the server binary.

use clap::{Parser, Subcommand, ValueEnum};
use pengajuan_core::models::{OfficeId, Role, UserId};
use std::path::PathBuf;

/// Command-line arguments for the submission portal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, env = "APP_CONFIG")]
    pub config: Option<PathBuf>,

    /// The HMAC secret for signing and verification of JWT claims.
    #[arg(short, long, env = "APP_SECRET")]
    pub secret: String,

    /// Write the OpenAPI document to this path and exit.
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// What to do instead of serving the API.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Auxiliary commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a signed bearer token for a session.
    Token {
        /// The user id, carried as the `sub` claim
        #[arg(long)]
        sub: UserId,

        /// The role the token grants
        #[arg(long, value_enum)]
        role: RoleArg,

        /// The office of an office operator
        #[arg(long)]
        office: Option<OfficeId>,

        /// Display name, printed in reports
        #[arg(long, default_value = "")]
        name: String,

        /// How long the token stays valid
        #[arg(long, default_value_t = 12)]
        hours: u64,
    },
}

/// The role names accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    /// An operator of an originating office
    User,
    /// A regional administrator
    #[value(name = "admin_wilayah")]
    AdminWilayah,
    /// The central administrator
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::User => Role::User,
            RoleArg::AdminWilayah => Role::AdminWilayah,
            RoleArg::Admin => Role::Admin,
        }
    }
}

impl Cli {
    /// Parse the process arguments, falling back to `APP_*` variables.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serving_needs_only_a_secret() {
        let cli = Cli::try_parse_from(["pengajuan-demo", "--secret", "s3cret"]).unwrap();
        assert_eq!(cli.secret, "s3cret");
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn tokens_take_a_role_and_an_office() {
        let user = uuid::Uuid::new_v4();
        let office = uuid::Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "pengajuan-demo",
            "--secret",
            "s3cret",
            "token",
            "--sub",
            &user.to_string(),
            "--role",
            "admin_wilayah",
            "--office",
            &office.to_string(),
        ])
        .unwrap();

        let Some(Commands::Token {
            sub,
            role,
            office: parsed,
            name,
            hours,
        }) = cli.command
        else {
            panic!("expected the token command");
        };
        assert_eq!(sub, UserId(user));
        assert_eq!(Role::from(role), Role::AdminWilayah);
        assert_eq!(parsed, Some(OfficeId(office)));
        assert_eq!(name, "");
        assert_eq!(hours, 12);
    }

    #[test]
    fn unknown_roles_are_refused() {
        let result = Cli::try_parse_from([
            "pengajuan-demo",
            "--secret",
            "s3cret",
            "token",
            "--sub",
            &uuid::Uuid::new_v4().to_string(),
            "--role",
            "superuser",
        ]);
        assert!(result.is_err());
    }
}
