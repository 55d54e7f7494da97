use thiserror::Error;

/// Environment variable name for providing the admin passcode without a prompt
pub const ENV_ADMIN_CODE_VAR: &str = "CONDUCT_BOARD_ADMIN_CODE";

/// Check for an admin passcode in the CONDUCT_BOARD_ADMIN_CODE environment variable.
/// Returns Some(code) if the env var is set and non-empty, None otherwise.
pub fn get_admin_code_from_env() -> Option<String> {
    non_empty(std::env::var(ENV_ADMIN_CODE_VAR).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to read passcode from terminal: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("passcode cannot be empty")]
    EmptyPasscode,
}

/// Prompts for the admin passcode without echoing it
pub fn prompt_for_admin_code() -> Result<String, AuthError> {
    let code = rpassword::prompt_password("Admin passcode: ")?;
    non_empty(Some(code)).ok_or(AuthError::EmptyPasscode)
}

/// Resolve the admin passcode: `--admin-code`, then the environment, then a prompt.
pub fn resolve_admin_code(from_cli: Option<String>) -> Result<String, AuthError> {
    if let Some(code) = non_empty(from_cli) {
        return Ok(code);
    }
    if let Some(code) = get_admin_code_from_env() {
        tracing::debug!("using admin passcode from {}", ENV_ADMIN_CODE_VAR);
        return Ok(code);
    }
    prompt_for_admin_code()
}
