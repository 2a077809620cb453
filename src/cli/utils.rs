use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Print a result: the message in text mode, or `{success, message, ...data}`
/// in JSON mode. `data` fields are shown as `key: value` lines in text mode.
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".into(), json!(true));
            response.insert("message".into(), json!(message));
            if let Some(Value::Object(fields)) = data {
                response.extend(fields);
            }
            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(Value::Object(fields)) = data {
                for (key, value) in fields {
                    match value {
                        Value::String(s) => println!("{}: {}", key, s),
                        other => println!("{}: {}", key, serde_json::to_string_pretty(&other)?),
                    }
                }
            }
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Secret from `--secret`, falling back to `JWT_SECRET`.
pub fn resolve_secret(explicit: Option<String>) -> anyhow::Result<String> {
    explicit
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("JWT_SECRET is not set (pass --secret or export JWT_SECRET)"))
}
