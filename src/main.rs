//! SponsorsClub CLI - authenticated client for the SponsorsClub platform

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod session;

use cli::args::GlobalOptions;
use cli::{
    AccountCommands, AthleteCommands, Cli, Commands, PasswordCommands, PreferencesCommands,
    ProfileCommands,
};
use client::models::Preferences;
use error::{ApiError, Result};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        if err.as_api().is_some_and(ApiError::requires_login) {
            eprintln!("  → Run 'sponsorsclub login' to sign in");
        }
        std::process::exit(1);
    }
}

/// `--debug` wins over `RUST_LOG`; otherwise only warnings are shown.
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Login { email, password } => cli::auth::login(&opts, email, password).await,
        Commands::Logout => cli::auth::logout(&opts),
        Commands::Register(args) => cli::auth::register(&opts, args).await,
        Commands::VerifyEmail { token } => cli::auth::verify_email(&opts, &token).await,
        Commands::Password(cmd) => match cmd {
            PasswordCommands::Reset { email } => {
                cli::auth::request_password_reset(&opts, &email).await
            }
            PasswordCommands::Confirm { token, password } => {
                cli::auth::confirm_password_reset(&opts, &token, password).await
            }
            PasswordCommands::Change { old, new } => {
                cli::auth::change_password(&opts, old, new).await
            }
        },
        Commands::Refresh => cli::auth::refresh(&opts).await,
        Commands::Me => cli::account::me(&opts).await,
        Commands::Profile(ProfileCommands::Update { fields, replace }) => {
            cli::account::update_profile(&opts, fields, replace).await
        }
        Commands::Preferences(PreferencesCommands::Set {
            language,
            currency,
            timezone,
        }) => {
            let preferences = Preferences {
                language,
                currency,
                timezone,
            };
            cli::account::set_preferences(&opts, preferences).await
        }
        Commands::Athletes(cmd) => match cmd {
            AthleteCommands::List { pagination } => cli::athlete::list(&opts, &pagination).await,
            AthleteCommands::Show { athlete } => cli::athlete::show(&opts, &athlete).await,
            AthleteCommands::Followed => cli::athlete::followed(&opts).await,
        },
        Commands::Follow { athletes } => cli::athlete::follow(&opts, &athletes).await,
        Commands::Unfollow { athletes } => cli::athlete::unfollow(&opts, &athletes).await,
        Commands::Account(AccountCommands::Delete { yes }) => {
            cli::account::delete_account(&opts, yes).await
        }
        Commands::Api {
            method,
            path,
            data,
            public,
        } => cli::request::run(&opts, &method, &path, data, public).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("sponsorsclub version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
