use clap::Subcommand;
use serde_json::json;

use crate::auth::{inspect, TokenService};
use crate::cli::utils::{output_error, output_success, resolve_secret};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue an admin token signed with the shared secret")]
    Issue {
        #[arg(long, help = "Admin email placed in the `sub` claim")]
        email: String,
        #[arg(long, default_value_t = 24, help = "Lifetime in hours")]
        hours: u64,
        #[arg(long, help = "Secret to sign with (defaults to JWT_SECRET)")]
        secret: Option<String>,
    },

    #[command(about = "Decode a token's header and claims without verifying it")]
    Inspect {
        #[arg(help = "Token to decode")]
        token: String,
    },

    #[command(about = "Verify a token's signature and expiry")]
    Verify {
        #[arg(help = "Token to verify")]
        token: String,
        #[arg(long, help = "Secret to verify with (defaults to JWT_SECRET)")]
        secret: Option<String>,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { email, hours, secret } => {
            let tokens = TokenService::from_secret(&resolve_secret(secret)?, hours)?;
            let token = tokens.issue(&email)?;
            output_success(&output_format, "Token issued", Some(json!({ "token": token })))
        }
        TokenCommands::Inspect { token } => {
            let inspection = inspect(&token)?;
            output_success(&output_format, "Token decoded (not verified)", Some(serde_json::to_value(inspection)?))
        }
        TokenCommands::Verify { token, secret } => {
            let tokens = TokenService::from_secret(&resolve_secret(secret)?, 0)?;
            match tokens.verify(&token) {
                Ok(claims) => output_success(&output_format, "Token is valid", Some(json!({ "claims": claims }))),
                Err(e) => {
                    output_error(&output_format, &e.to_string(), Some("INVALID_TOKEN"))?;
                    anyhow::bail!("token verification failed")
                }
            }
        }
    }
}
