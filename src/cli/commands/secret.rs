use clap::Subcommand;

use crate::auth::{secret_report, TokenService};
use crate::cli::utils::{output_success, resolve_secret};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum SecretCommands {
    #[command(about = "Report the shape of JWT_SECRET and round-trip a test token")]
    Check {
        #[arg(long, help = "Secret to check (defaults to JWT_SECRET)")]
        secret: Option<String>,
    },
}

pub fn handle(cmd: SecretCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SecretCommands::Check { secret } => {
            let secret = resolve_secret(secret)?;
            let report = secret_report(&secret);

            let tokens = TokenService::from_secret(&secret, 1)?;
            let round_trip = tokens.verify(&tokens.issue("test@test.com")?).is_ok();

            let mut data = serde_json::to_value(&report)?;
            data["testTokenVerified"] = round_trip.into();

            let message = if report.contains_whitespace {
                "Secret contains whitespace; the SQL service may see a different value"
            } else {
                "Secret looks clean"
            };
            output_success(&output_format, message, Some(data))
        }
    }
}
