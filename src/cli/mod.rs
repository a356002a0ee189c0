//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

pub mod account;
pub mod args;
pub mod athlete;
pub mod auth;
pub mod context;
pub mod request;
pub mod status;

pub use args::{OutputFormat, PaginationArgs};
pub use context::CommandContext;

/// SponsorsClub CLI - sponsors, athletes and their followers from the terminal
#[derive(Parser, Debug)]
#[command(name = "sponsorsclub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "SPONSORSCLUB_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "SPONSORSCLUB_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override session file location
    #[arg(long, global = true, env = "SPONSORSCLUB_SESSION", hide_env = true)]
    pub session: Option<String>,

    /// Override the backend base URL
    #[arg(long, global = true, env = "SPONSORSCLUB_API_BASE_URL", hide_env = true)]
    pub api_base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "SPONSORSCLUB_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email (prompted when omitted)
        #[arg(long, short = 'e', env = "SPONSORSCLUB_EMAIL", hide_env = true)]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(
            long,
            env = "SPONSORSCLUB_PASSWORD",
            hide_env = true,
            hide_env_values = true
        )]
        password: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Confirm an email address with the token from the verification link
    VerifyEmail {
        /// Verification token
        token: String,
    },

    /// Reset or change the account password
    #[command(subcommand)]
    Password(PasswordCommands),

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Show the signed-in user
    Me,

    /// Edit the signed-in user's profile
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Manage display preferences
    #[command(subcommand)]
    Preferences(PreferencesCommands),

    /// Browse the athlete directory
    #[command(subcommand, visible_alias = "athlete")]
    Athletes(AthleteCommands),

    /// Follow one or more athletes
    #[command(after_help = "EXAMPLES:\n  \
            sponsorsclub follow a-12\n  \
            sponsorsclub follow a-12,a-40 a-41")]
    Follow {
        /// Athlete IDs, comma-separated or repeated
        #[arg(required = true, value_delimiter = ',')]
        athletes: Vec<String>,
    },

    /// Stop following one or more athletes
    Unfollow {
        /// Athlete IDs, comma-separated or repeated
        #[arg(required = true, value_delimiter = ',')]
        athletes: Vec<String>,
    },

    /// Manage the account itself
    #[command(subcommand)]
    Account(AccountCommands),

    /// Send an authenticated request to any backend path (Ctrl-C cancels)
    #[command(after_help = "EXAMPLES:\n  \
            sponsorsclub api GET /api/auth/me/\n  \
            sponsorsclub api PATCH /api/users/42/ --data '{\"bio\": \"Trail runner\"}'\n  \
            sponsorsclub api GET /api/athletes/ --public")]
    Api {
        /// HTTP method
        method: String,

        /// Path relative to the API base URL
        path: String,

        /// JSON request body
        #[arg(long, short = 'd', value_parser = parse_json)]
        data: Option<Value>,

        /// Send without session handling
        #[arg(long)]
        public: bool,
    },

    /// Show configuration and session status
    Status,

    /// Display version information
    Version,
}

/// Fields for account creation
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// Dialling code, e.g. +33
    #[arg(long)]
    pub phone_country_code: Option<String>,

    #[arg(long)]
    pub phone_number: Option<String>,

    /// Account password (prompted with confirmation when omitted)
    #[arg(long, env = "SPONSORSCLUB_PASSWORD", hide_env = true, hide_env_values = true)]
    pub password: Option<String>,
}

/// Password subcommands
#[derive(Subcommand, Debug)]
pub enum PasswordCommands {
    /// Ask for a password reset email
    Reset {
        /// Account email
        email: String,
    },

    /// Set a new password with the token from the reset email
    Confirm {
        /// Reset token
        token: String,

        /// New password (prompted with confirmation when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Change the password of the signed-in account
    Change {
        /// Current password (prompted when omitted)
        #[arg(long)]
        old: Option<String>,

        /// New password (prompted with confirmation when omitted)
        #[arg(long)]
        new: Option<String>,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Update profile fields
    #[command(after_help = "EXAMPLES:\n  \
            sponsorsclub profile update --set first_name=Léa --set country=FR\n  \
            sponsorsclub profile update --set 'sports=[\"surf\",\"skate\"]' --replace")]
    Update {
        /// Field assignment as key=value; values that parse as JSON are sent as JSON
        #[arg(long = "set", required = true, value_parser = account::parse_assignment)]
        fields: Vec<(String, Value)>,

        /// Send the whole profile (PUT) instead of only the changed fields
        #[arg(long)]
        replace: bool,
    },
}

/// Preference subcommands
#[derive(Subcommand, Debug)]
pub enum PreferencesCommands {
    /// Store display preferences
    Set {
        /// Interface language, e.g. fr
        #[arg(long)]
        language: Option<String>,

        /// Display currency, e.g. EUR
        #[arg(long)]
        currency: Option<String>,

        /// IANA timezone, e.g. Europe/Paris
        #[arg(long)]
        timezone: Option<String>,
    },
}

/// Athlete directory subcommands
#[derive(Subcommand, Debug)]
pub enum AthleteCommands {
    /// List athletes in the public directory
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// Show one athlete profile
    #[command(after_help = "EXAMPLES:\n  \
            sponsorsclub athletes show 3f2b9c1e-8d4a-4e57-9a61-2c0d5e7f8a90\n  \
            sponsorsclub athletes show ana-costa")]
    Show {
        /// Athlete ID or profile slug
        athlete: String,
    },

    /// List athletes the signed-in user follows
    Followed,
}

/// Account subcommands
#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Erase the account and every personal datum attached to it
    Delete {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_follow_accepts_comma_separated_ids() {
        let cli = Cli::try_parse_from(["sponsorsclub", "follow", "a-1,a-2", "a-3"]).unwrap();
        match cli.command {
            Commands::Follow { athletes } => assert_eq!(athletes, vec!["a-1", "a-2", "a-3"]),
            other => panic!("Expected follow, got {:?}", other),
        }
    }

    #[test]
    fn test_athletes_show_takes_id_or_slug() {
        let cli = Cli::try_parse_from(["sponsorsclub", "athletes", "show", "ana-costa"]).unwrap();
        match cli.command {
            Commands::Athletes(AthleteCommands::Show { athlete }) => assert_eq!(athlete, "ana-costa"),
            other => panic!("Expected athletes show, got {:?}", other),
        }
        assert!(Cli::try_parse_from(["sponsorsclub", "athletes", "show"]).is_err());
    }

    #[test]
    fn test_profile_update_parses_assignments() {
        let cli = Cli::try_parse_from([
            "sponsorsclub",
            "profile",
            "update",
            "--set",
            "first_name=Léa",
            "--set",
            "newsletter=true",
        ])
        .unwrap();
        match cli.command {
            Commands::Profile(ProfileCommands::Update { fields, replace }) => {
                assert!(!replace);
                assert_eq!(fields[0], ("first_name".to_string(), Value::from("Léa")));
                assert_eq!(fields[1], ("newsletter".to_string(), Value::Bool(true)));
            }
            other => panic!("Expected profile update, got {:?}", other),
        }
    }

    #[test]
    fn test_api_rejects_invalid_json_body() {
        let result = Cli::try_parse_from([
            "sponsorsclub",
            "api",
            "POST",
            "/api/follows/",
            "--data",
            "{not json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sponsorsclub",
            "athletes",
            "list",
            "--format",
            "json",
            "--api-base-url",
            "http://localhost:8001",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.api_base_url.as_deref(), Some("http://localhost:8001"));
    }
}
