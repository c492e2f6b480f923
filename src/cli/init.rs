//! trackify init command implementation
//!
//! Writes a default trackify.toml in the working directory.

use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct InitReport {
    config: PathBuf,
    created: bool,
}

pub fn run(options: OutputOptions) -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE);

    let created = if path.exists() {
        if !path.is_file() {
            return Err(Error::OperationFailed(format!(
                "{CONFIG_FILE} exists but is not a file"
            )));
        }
        false
    } else {
        Config::default().save(&path)?;
        true
    };

    let report = InitReport {
        config: path.clone(),
        created,
    };

    let header = if created {
        "trackify init: wrote default config"
    } else {
        "trackify init: config already exists"
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("config", path.display().to_string());
    human.push_next_step("set [server].url to your card store");
    human.push_next_step("trackify add \"What are you working on?\"");

    emit_success(options, "init", &report, Some(&human))?;
    Ok(())
}
