//! Health command - Check that the agent API is up.

use anyhow::Result;

use remit_chat::{ChatConfig, HttpTransport};

pub async fn execute(config: ChatConfig) -> Result<()> {
    let transport = HttpTransport::new(config)?;
    let health = transport.health().await?;

    let service = health.service.as_deref().unwrap_or("agent API");
    if health.is_ok() {
        println!("✅ {} is up ({})", service, transport.config().api_base_url);
        Ok(())
    } else {
        anyhow::bail!("{} reported status '{}'", service, health.status)
    }
}
