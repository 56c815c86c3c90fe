use std::fs::File;
use std::{env, io};

use anyhow::{Context, Result};
use ledger::cli::{self, Interactive};
use ledger::config::CheckingPolicy;
use ledger::registry::Registry;

fn main() -> Result<()> {
    env_logger::init();

    let mut registry = Registry::new(CheckingPolicy::from_env()?);
    match env::args_os().nth(1) {
        Some(path) => {
            let script = File::open(&path)
                .with_context(|| format!("failed to open script {}", path.to_string_lossy()))?;
            cli::run_script(&mut registry, script, io::stdout().lock())
        }
        None => Interactive::new(&mut registry, io::stdin().lock(), io::stdout().lock()).run(),
    }
}
