//! Entry point for the `scanprint` binary.
//!
//! Usage: `scanprint [path/to/screen.toml]`

use std::path::PathBuf;

use scanprint_runtime::ScreenConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    scanprint_console::init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ScreenConfig::load_or_default(config_path);

    scanprint_console::run(config).await?;
    Ok(())
}
