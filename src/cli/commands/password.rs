use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

/// Print the SHA-256 form of a password, as stored via `crypt()` and as sent
/// by the dashboard on login.
pub fn handle(password: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let hash = hash_password(&password);
    output_success(&output_format, "Password hashed", Some(json!({ "passwordHash": hash })))
}
