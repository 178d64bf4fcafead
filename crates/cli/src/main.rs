//! Laundry CLI - customer portal from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Log in and check who is logged in
//! laundry login -e angie@example.ph
//! laundry whoami
//!
//! # Render any page of the portal
//! laundry open /sudsy/prices
//! laundry open /dashboard
//!
//! # Dashboard actions
//! laundry profile edit --address "Cebu City"
//! laundry payment select gcash --proof receipt.png
//! laundry rate --stars 5 --comment "Fresh and on time"
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` / `register` - Session and account
//! - `open` - Render a page by path
//! - `profile`, `history`, `payment`, `rate` - Dashboard pages and actions
//! - `env-example` - Generate `.env.example` from `.env`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use laundry_customer::App;
use laundry_customer::config::{ClientConfig, LogFormat};
use laundry_customer::telemetry;

mod commands;

#[derive(Parser)]
#[command(name = "laundry")]
#[command(author, version, about = "Laundry customer portal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "LAUNDRY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in customer
    Whoami,
    /// Create a customer account
    Register(RegisterArgs),
    /// Render the page at a path, e.g. `/about` or `/dashboard/history`
    Open {
        /// Page path, optionally prefixed with a shop slug
        path: String,
    },
    /// Show or edit profile details
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List past laundry orders
    History,
    /// Payment methods and proof of payment
    Payment {
        #[command(subcommand)]
        action: PaymentAction,
    },
    /// Rate the latest laundry order
    Rate {
        /// Stars from 1 to 5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        stars: u8,

        /// Optional comment
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Generate an example env file with the values stripped
    EnvExample {
        /// Source env file
        #[arg(long, default_value = ".env")]
        env: PathBuf,

        /// Output file
        #[arg(short, long, default_value = ".env.example")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct RegisterArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long, default_value = "")]
    middle_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(short, long)]
    email: String,

    #[arg(long)]
    contact_number: String,

    #[arg(long)]
    address: String,

    #[arg(short, long, env = "LAUNDRY_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, env = "LAUNDRY_PASSWORD_CONFIRM", hide_env_values = true)]
    password_confirm: String,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show profile details
    Show,
    /// Change profile details and save them
    Edit {
        /// Full name as `first middle last`
        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Delivery address
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Subcommand)]
enum PaymentAction {
    /// Show the shop's payment methods
    Methods,
    /// Pick a payment option and optionally attach a proof image
    Select {
        /// `cash` or a payment method name such as `gcash`
        option: String,

        /// Proof of payment image
        #[arg(long)]
        proof: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::EnvExample { env, output } = &cli.command {
        telemetry::init_tracing(LogFormat::default());
        commands::env::generate(env, output)?;
        return Ok(());
    }

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_tracing(LogFormat::default());
            return Err(e.into());
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing(config.log_format);

    let mut app = App::new(config)?;
    if let Err(e) = dispatch(&mut app, cli.command).await {
        // `report` logs the error; flush Sentry before exiting
        e.report();
        drop(sentry_guard);
        std::process::exit(1);
    }
    Ok(())
}

async fn dispatch(app: &mut App, command: Commands) -> laundry_customer::Result<()> {
    match command {
        Commands::Login { email, password } => {
            commands::auth::login(app, email, SecretString::from(password)).await
        }
        Commands::Logout => commands::auth::logout(app),
        Commands::Whoami => commands::auth::whoami(app),
        Commands::Register(args) => {
            let form = laundry_customer::views::RegisterForm {
                first_name: args.first_name,
                middle_name: args.middle_name,
                last_name: args.last_name,
                email: args.email,
                contact_number: args.contact_number,
                address: args.address,
                password: Some(SecretString::from(args.password)),
                password_confirm: Some(SecretString::from(args.password_confirm)),
            };
            commands::auth::register(app, form).await
        }
        Commands::Open { path } => commands::pages::open(app, &path).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(app).await,
            ProfileAction::Edit {
                full_name,
                email,
                phone,
                address,
            } => {
                let changes = commands::profile::Changes {
                    full_name,
                    email,
                    phone,
                    address,
                };
                commands::profile::edit(app, changes).await
            }
        },
        Commands::History => commands::pages::history(app).await,
        Commands::Payment { action } => match action {
            PaymentAction::Methods => commands::payment::methods(app).await,
            PaymentAction::Select { option, proof } => {
                commands::payment::select(app, &option, proof.as_deref()).await
            }
        },
        Commands::Rate { stars, comment } => commands::rate::rate(app, stars, comment).await,
        Commands::EnvExample { .. } => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rate_rejects_out_of_range_stars() {
        assert!(Cli::try_parse_from(["laundry", "rate", "--stars", "6"]).is_err());
        assert!(Cli::try_parse_from(["laundry", "rate", "--stars", "5"]).is_ok());
    }

    #[test]
    fn test_open_takes_path() {
        let cli = Cli::try_parse_from(["laundry", "open", "/sudsy/prices"]).unwrap();
        assert!(matches!(cli.command, Commands::Open { path } if path == "/sudsy/prices"));
    }
}
