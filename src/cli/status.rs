//! `impactwatch status` command implementation.

use crate::cli::analyzer;
use crate::config::Config;
use crate::error::Result;

/// Run the status command.
///
/// Queries the analysis service root and prints its status line.
///
/// # Errors
///
/// Returns an error if the endpoint is invalid or the service is unreachable.
pub async fn run(config: &Config) -> Result<()> {
    let client = analyzer(config)?;
    println!("Endpoint: {}", client.endpoint());

    let status = client.health().await?;
    println!("Status:   {status}");
    Ok(())
}
