use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{get_config_path, Config};
use crate::scoring::{validate_end_size, GoldsMode};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
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

/// Keep prompting until the answer parses.
fn prompt_parsed<T>(message: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    loop {
        let input = prompt_with_default(message, default)?;
        match input.parse::<T>() {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Serialize `config` as YAML and replace `path` atomically.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;
    Ok(())
}

/// Create a config file.
///
/// With `accept_defaults` the default configuration is written without
/// prompting and an existing file is left untouched.
pub fn run_init(path: Option<PathBuf>, accept_defaults: bool) -> Result<()> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if accept_defaults {
        if config_path.exists() {
            anyhow::bail!("Config already exists at {}", config_path.display());
        }
        write_config(&config_path, &Config::default())?;
        println!("Config written to {}", config_path.display());
        return Ok(());
    }

    println!();
    println!("quiver configuration");
    println!("====================");
    println!();
    println!("Handicaps can be calculated on the legacy (1985) or current (2023) tables.");
    let system = prompt_parsed("Rating system (legacy/current)", "current")?;

    println!();
    println!("Golds are counted per round type (9s outdoors imperial, 10s outdoors metric,");
    println!("Xs on small indoor faces, 10+ elsewhere indoors). Leave as 'auto' to keep that.");
    let golds = loop {
        let input = prompt_with_default("Golds (auto/9s/10s/xs/10+)", "auto")?;
        if input.eq_ignore_ascii_case("auto") {
            break None;
        }
        match input.parse::<GoldsMode>() {
            Ok(mode) => break Some(mode),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    println!();
    let end_size = loop {
        let size: usize = prompt_parsed("Arrows per end", "6")?;
        match validate_end_size(size) {
            Ok(size) => break size,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };
    let inner_ten = prompt_yes_no("Count only the inner ten as ten (compound)?", false)?;

    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        system,
        golds,
        end_size,
        inner_ten,
        ..Config::default()
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `quiver rounds` to see the rounds you can score.");
    Ok(())
}
