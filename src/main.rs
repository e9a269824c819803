use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use secrecy::SecretString;
use serde::Serialize;
use tracing::info;

use idcheck::app_error::AppError;
use idcheck::entities::document::DocumentFile;
use idcheck::entities::session_state::{AuthMode, SessionState};
use idcheck::infra::{
    config::AppConfig,
    setup::{AppContext, init_session, init_tracing},
};

#[derive(Parser)]
#[command(name = "idcheck", version, about = "Identity document risk checks from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token
    Login(CredentialArgs),
    /// Create an account and store the session token
    Signup(CredentialArgs),
    /// Forget the stored session
    Logout,
    /// Revalidate the stored session and print it
    Whoami,
    /// Submit a document and print the risk report
    Verify { path: PathBuf },
    /// Backend health
    Health,
    /// Recent verifications recorded by the backend
    History {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Aggregate verification stats
    Stats,
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(short, long)]
    username: String,
    #[arg(short, long, env = "IDCHECK_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => match err.downcast_ref::<AppError>() {
            Some(app_err) => {
                eprintln!("error[{}]: {}", app_err.code(), app_err);
                ExitCode::from(app_err.exit_status())
            }
            None => {
                eprintln!("error: {:#}", err);
                ExitCode::from(2)
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_file.as_deref())?;
    info!(backend = %config.backend_base_url, "idcheck starting");

    let ctx = init_session(config)?;

    let ok = match cli.command {
        Command::Login(args) => authenticate(&ctx, AuthMode::Login, args).await?,
        Command::Signup(args) => authenticate(&ctx, AuthMode::Signup, args).await?,
        Command::Logout => {
            print_json(&ctx.session.logout())?;
            true
        }
        Command::Whoami => {
            ctx.session.revalidate().await;
            let view = ctx.session.snapshot();
            print_json(&view)?;
            view.state.is_authenticated()
        }
        Command::Verify { path } => verify(&ctx, path).await?,
        Command::Health => {
            print_json(&ctx.insights.health().await?)?;
            true
        }
        Command::History { limit } => {
            print_json(&ctx.insights.recent_verifications(limit).await?)?;
            true
        }
        Command::Stats => {
            print_json(&ctx.insights.stats().await?)?;
            true
        }
    };

    Ok(ok)
}

async fn authenticate(ctx: &AppContext, mode: AuthMode, args: CredentialArgs) -> anyhow::Result<bool> {
    let session = &ctx.session;
    if session.state().is_authenticated() {
        info!("replacing the stored session");
        session.logout();
    }
    if mode == AuthMode::Signup {
        session.toggle_mode();
    }

    let state = session
        .submit_credentials(&args.username, SecretString::from(args.password))
        .await;

    match state {
        SessionState::Unauthenticated {
            pending_error: Some(message),
            ..
        } => {
            eprintln!("{}", message);
            Ok(false)
        }
        _ => {
            print_json(&session.snapshot())?;
            Ok(session.state().is_authenticated())
        }
    }
}

async fn verify(ctx: &AppContext, path: PathBuf) -> anyhow::Result<bool> {
    let file = DocumentFile::from_path(&path).await?;

    let session = &ctx.session;
    session.revalidate().await;
    if !session.snapshot().can_submit() {
        return Err(AppError::NotAuthenticated.into());
    }

    match session.submit_document(file).await? {
        SessionState::VerificationComplete { result } => {
            print_json(&result.report())?;
            Ok(true)
        }
        SessionState::VerificationError { message } => {
            eprintln!("{}", message);
            Ok(false)
        }
        SessionState::Unauthenticated { pending_error, .. } => {
            eprintln!(
                "{}",
                pending_error.unwrap_or_else(|| "Session ended. Please log in again.".to_string())
            );
            Ok(false)
        }
        other => {
            eprintln!("verification did not run (state: {})", other.name());
            Ok(false)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
