use crate::prelude::*;
use std::fs;
use std::path::Path;

use forumfix_core::config::{parse_config, Config};

/// Read and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let source = fs::read_to_string(path)
        .with_context(|| f!("Could not read configuration file {}", path.display()))?;

    parse_config(&source).map_err(|e| eyre!("{}: {}", path.display(), e))
}
