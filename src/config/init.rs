use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};
use crate::records::PositiveBoundPolicy;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn parse_bound_policy(input: &str) -> Option<PositiveBoundPolicy> {
    match input.trim().to_lowercase().as_str() {
        "last-selected" | "last" => Some(PositiveBoundPolicy::LastSelected),
        "global" => Some(PositiveBoundPolicy::Global),
        _ => None,
    }
}

/// Serialize `config` as YAML and write it, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Write a default config without asking anything. Refuses to overwrite.
pub fn write_default_config(path: Option<PathBuf>) -> Result<PathBuf> {
    let config_path = path.unwrap_or_else(get_config_path);
    if config_path.exists() {
        anyhow::bail!("Config already exists at {}", config_path.display());
    }
    write_config(&config_path, &Config::default())?;
    Ok(config_path)
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Conduct Board Configuration");
    println!("===========================");
    println!();

    let defaults = Config::default();

    let school_name = prompt_with_default(
        "School name (signs parent notifications)",
        &defaults.school_name,
    )?;
    let default_observer =
        prompt_with_default("Default observer for violations", &defaults.default_observer)?;

    let admin_passcode = loop {
        let code = rpassword::prompt_password("Admin passcode (leave empty to keep the default): ")
            .context("Failed to read passcode from terminal")?;
        let code = code.trim().to_string();
        if code.is_empty() {
            println!("  Keeping the default passcode. Change it before sharing this machine.");
            break defaults.admin_passcode.clone();
        }
        if code.chars().count() >= 4 {
            break code;
        }
        println!("  Passcode must be at least 4 characters. Try again.");
    };

    println!();
    println!("Hand-entered commendation points are capped at 6 after a variable rule is picked,");
    println!("or at 20 otherwise ('last-selected'). 'global' always allows up to 20.");
    let positive_bound = loop {
        let input = prompt_with_default("Commendation points bound", "last-selected")?;
        match parse_bound_policy(&input) {
            Some(policy) => break policy,
            None => println!("  Invalid: expected 'last-selected' or 'global'. Try again."),
        }
    };

    let catalog_path = loop {
        let input = prompt("Catalog file (leave empty for the built-in catalog): ")?;
        if input.is_empty() {
            break None;
        }
        let path = PathBuf::from(&input);
        if path.exists() {
            break Some(path);
        }
        println!("  File not found: {}. Try again.", path.display());
    };

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        data_path: None,
        catalog_path,
        admin_passcode,
        school_name,
        default_observer,
        positive_bound,
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `conduct-board add-student` or `conduct-board import` to get started.");

    Ok(())
}
