//! Stickercut CLI tool
//!
//! Command-line interface for removing flat backgrounds from sticker
//! source images with the stickercut library.

#[cfg(feature = "cli")]
use stickercut::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
