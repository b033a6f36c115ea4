use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use marketplace_client::config::{ClientConfig, ConfigError, SellerLabel};
use marketplace_client::messages::{self, Operation};
use marketplace_client::net::transport::{ApiTransport, HttpTransport};
use marketplace_client::session::store::StorageError;
use marketplace_client::validate::{self, ValidationError};
use marketplace_client::{ApiError, AuthClient, ProfileClient, SessionContext};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Invalid(#[from] ValidationError),
    #[error("{0}")]
    Request(String),
    #[error("http client setup failed: {0}")]
    Client(#[from] ApiError),
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("not logged in; run `marketplace login` first")]
    NotLoggedIn,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "marketplace", about = "Marketplace account CLI")]
struct Cli {
    #[arg(long, env = "MARKETPLACE_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "MARKETPLACE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[arg(long, env = "MARKETPLACE_SELLER_LABEL", help = "SELLER or FREELANCER")]
    seller_label: Option<SellerLabel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register(RegisterArgs),
    Login(LoginArgs),
    Logout,
    Whoami,
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    ValidateToken {
        #[arg(long)]
        token: String,
    },
    ResetPassword(ResetPasswordArgs),
    Profile(ProfileCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,

    #[arg(long, default_value = "CLIENT", help = "CLIENT or SELLER/FREELANCER")]
    role: String,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,

    #[arg(long, default_value_t = false, help = "Log in again even with a live session")]
    force: bool,
}

#[derive(Args, Debug)]
struct ResetPasswordArgs {
    #[arg(long)]
    token: String,

    #[arg(long)]
    new_password: String,

    #[arg(long)]
    confirm_password: String,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update(ProfileArgs),
    Complete(ProfileArgs),
    ChangePassword(ChangePasswordArgs),
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    country: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    address: String,

    #[arg(long)]
    phone: String,
}

#[derive(Args, Debug)]
struct ChangePasswordArgs {
    #[arg(long)]
    old_password: String,

    #[arg(long)]
    new_password: String,

    #[arg(long)]
    confirm_password: String,
}

struct CliContext {
    auth: AuthClient,
    profile: ProfileClient,
    session: SessionContext,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim().trim_end_matches('/').to_owned();
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }
    if let Some(seller_label) = cli.seller_label {
        config.seller_label = seller_label;
    }

    let ctx = build_context(&config)?;

    match cli.command {
        Command::Register(args) => run_register(&ctx, args).await,
        Command::Login(args) => run_login(&ctx, args).await,
        Command::Logout => {
            ctx.auth.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&ctx),
        Command::ForgotPassword { email } => run_forgot_password(&ctx, &email).await,
        Command::ValidateToken { token } => run_validate_token(&ctx, &token).await,
        Command::ResetPassword(args) => run_reset_password(&ctx, args).await,
        Command::Profile(profile) => run_profile(&ctx, profile).await,
    }
}

fn build_context(config: &ClientConfig) -> Result<CliContext, ApiError> {
    let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::from_config(config)?);
    let session = SessionContext::open_file(config.session_file.clone(), config.seller_label);
    tracing::debug!(api_url = %config.api_url, session_file = %config.session_file.display(), "client configured");
    Ok(CliContext {
        auth: AuthClient::new(Arc::clone(&transport), session.clone()),
        profile: ProfileClient::new(transport, session.clone()),
        session,
    })
}

async fn run_register(ctx: &CliContext, args: RegisterArgs) -> Result<(), CliError> {
    if let Some(path) = already_logged_in(ctx) {
        println!("already logged in; continue at {path}");
        return Ok(());
    }
    let request = validate::register(
        &args.name,
        &args.email,
        &args.password,
        &args.role,
        ctx.session.seller_label(),
    )?;
    ctx.auth
        .register(&request)
        .await
        .map_err(|e| request_failed(Operation::Register, &e))?;
    println!("{}", messages::REGISTER_SUCCESS);
    println!("next: {}", ctx.session.redirect_path());
    Ok(())
}

async fn run_login(ctx: &CliContext, args: LoginArgs) -> Result<(), CliError> {
    if !args.force {
        if let Some(path) = already_logged_in(ctx) {
            println!("already logged in; continue at {path}");
            return Ok(());
        }
    }
    let request = validate::login(&args.email, &args.password)?;
    let session = ctx
        .auth
        .login(&request)
        .await
        .map_err(|e| request_failed(Operation::Login, &e))?;
    println!("logged in as {} ({})", session.email, session.role);
    println!("next: {}", ctx.session.redirect_path());
    Ok(())
}

fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    let Some(session) = ctx.session.current() else {
        println!("not logged in");
        return Ok(());
    };
    print_json(&json!({
        "email": session.email,
        "name": session.name,
        "role": session.role,
        "isProfileCompleted": session.is_profile_completed,
        "redirect": ctx.session.redirect_path(),
    }))
}

async fn run_forgot_password(ctx: &CliContext, email: &str) -> Result<(), CliError> {
    let email = validate::forgot_password_email(email)?;
    ctx.auth
        .forgot_password(&email)
        .await
        .map_err(|e| request_failed(Operation::ForgotPassword, &e))?;
    println!("{}", messages::FORGOT_PASSWORD_SUCCESS);
    Ok(())
}

async fn run_validate_token(ctx: &CliContext, token: &str) -> Result<(), CliError> {
    let text = ctx
        .auth
        .validate_reset_token(token)
        .await
        .map_err(|e| request_failed(Operation::ValidateResetToken, &e))?;
    println!("{}", non_empty_or(&text, "reset token is valid"));
    Ok(())
}

async fn run_reset_password(ctx: &CliContext, args: ResetPasswordArgs) -> Result<(), CliError> {
    let request = validate::reset_password(&args.token, &args.new_password, &args.confirm_password)?;
    ctx.auth
        .reset_password(&request)
        .await
        .map_err(|e| request_failed(Operation::ResetPassword, &e))?;
    println!("{}", messages::RESET_PASSWORD_SUCCESS);
    Ok(())
}

async fn run_profile(ctx: &CliContext, profile: ProfileCommand) -> Result<(), CliError> {
    if !ctx.session.is_logged_in() {
        return Err(CliError::NotLoggedIn);
    }

    match profile.command {
        ProfileSubcommand::Show => {
            let record = ctx
                .profile
                .get_profile()
                .await
                .map_err(|e| request_failed(Operation::GetProfile, &e))?;
            print_json(&serde_json::to_value(record)?)
        }
        ProfileSubcommand::Update(args) => {
            let request = validate::complete_profile(&args.country, &args.city, &args.address, &args.phone)?;
            let record = ctx
                .profile
                .update_profile(&request)
                .await
                .map_err(|e| request_failed(Operation::UpdateProfile, &e))?;
            println!("{}", messages::PROFILE_UPDATED);
            print_json(&serde_json::to_value(record)?)
        }
        ProfileSubcommand::Complete(args) => {
            let request = validate::complete_profile(&args.country, &args.city, &args.address, &args.phone)?;
            ctx.profile
                .complete_profile(&request)
                .await
                .map_err(|e| request_failed(Operation::CompleteProfile, &e))?;
            ctx.session.mark_profile_completed()?;
            println!("{}", messages::PROFILE_COMPLETED);
            println!("next: {}", ctx.session.redirect_path());
            Ok(())
        }
        ProfileSubcommand::ChangePassword(args) => {
            let request = validate::change_password(&args.old_password, &args.new_password, &args.confirm_password)?;
            let response = ctx
                .profile
                .change_password(&request)
                .await
                .map_err(|e| request_failed(Operation::ChangePassword, &e))?;
            println!("{}", non_empty_or(&response.message, messages::PASSWORD_CHANGED));
            Ok(())
        }
    }
}

fn already_logged_in(ctx: &CliContext) -> Option<String> {
    ctx.session.is_logged_in().then(|| ctx.session.redirect_path())
}

fn request_failed(op: Operation, err: &ApiError) -> CliError {
    tracing::debug!(?op, status = ?err.status(), "request failed");
    CliError::Request(messages::error_message(op, err))
}

fn non_empty_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() { fallback } else { text }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
