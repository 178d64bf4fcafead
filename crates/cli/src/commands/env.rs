//! `.env.example` generation.

use std::path::Path;

use laundry_customer::config::{ConfigError, write_env_example};

use super::emit;

pub fn generate(env: &Path, output: &Path) -> Result<(), ConfigError> {
    write_env_example(env, output)?;
    emit(&format!("Wrote {}", output.display()));
    Ok(())
}
