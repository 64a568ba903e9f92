use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use school_inquiry::error::AppError;

use crate::commands::{run_health, run_mail_check, run_seed, run_submit};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "school-api",
    about = "Serve and operate the school inquiry API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Copy the fallback fees and notices into empty store collections
    Seed(SeedArgs),
    /// Validate and send an inquiry through the configured transport
    Submit {
        #[command(subcommand)]
        form: SubmitCommand,
    },
    /// Probe a running service's health endpoint
    Health(HealthArgs),
    /// Verify the SMTP relay and send a test email
    MailCheck,
}

#[derive(Subcommand, Debug)]
pub(crate) enum SubmitCommand {
    /// Submit the contact form
    Contact(ContactArgs),
    /// Submit the admission inquiry form
    Admission(AdmissionArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct SeedArgs {
    /// Fallback dataset to load (defaults to APP_FALLBACK_DATA)
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct TransportArgs {
    /// Override the API base URL used by the backend transport
    #[arg(long)]
    pub(crate) api_url: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ContactArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) phone: String,
    #[arg(long)]
    pub(crate) message: String,
    /// One of general, admission, academic, feedback
    #[arg(long, default_value = "general")]
    pub(crate) inquiry_type: String,
    #[command(flatten)]
    pub(crate) transport: TransportArgs,
}

#[derive(Args, Debug)]
pub(crate) struct AdmissionArgs {
    #[arg(long)]
    pub(crate) student_name: String,
    #[arg(long)]
    pub(crate) parent_name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) phone: String,
    /// Nursery, LKG, UKG, or I through X
    #[arg(long)]
    pub(crate) class: String,
    #[arg(long)]
    pub(crate) previous_school: Option<String>,
    #[arg(long)]
    pub(crate) address: Option<String>,
    #[command(flatten)]
    pub(crate) transport: TransportArgs,
}

#[derive(Args, Debug)]
pub(crate) struct HealthArgs {
    /// Base URL of the service (defaults to APP_API_URL)
    #[arg(long)]
    pub(crate) url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Seed(args) => run_seed(args),
        Command::Submit { form } => run_submit(form).await,
        Command::Health(args) => run_health(args).await,
        Command::MailCheck => run_mail_check().await,
    }
}
