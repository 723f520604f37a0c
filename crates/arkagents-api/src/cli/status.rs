//! System status command.

use std::path::Path;

use anyhow::Result;
use console::style;

use arkagents_core::repository::agent::AgentRepository;
use arkagents_core::repository::message::MessageRepository;

use crate::state::AppState;

/// Display agent and message counts, the configured model and whether chat is usable.
pub async fn status<A, M>(state: &AppState<A, M>, data_dir: &Path, json: bool) -> Result<()>
where
    A: AgentRepository,
    M: MessageRepository,
{
    let agents = state.agent_service.count_agents().await?;
    let messages = state.conversation_service.count_messages().await?;
    let settings = state.chat_service.settings();
    let provider = state.chat_service.provider_name();
    let context_window = state.chat_service.context_window();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": data_dir.display().to_string(),
            "agents": agents,
            "messages": messages,
            "provider": provider,
            "model": settings.model,
            "context_window": context_window,
            "provider_key_set": state.provider_key_set,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} ArkAgents v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Agents ──").dim());
    println!("  Agents:   {}", style(agents).bold());
    println!("  Messages: {}", style(messages).bold());
    println!();

    println!("  {}", style("── Provider ──").dim());
    println!("  Provider: {}", style(provider).cyan());
    println!("  Model:    {}", style(&settings.model).cyan());
    println!("  Window:   {context_window} prior messages");
    if state.provider_key_set {
        println!("  API key:  {}", style("set").green());
    } else {
        println!(
            "  API key:  {} (chat requests will fail)",
            style("missing").yellow()
        );
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(data_dir.display()).dim());
    println!();

    Ok(())
}
