//! Admin tooling for stage-2 (peer ranking) analytics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use council_core::analytics::{report, run_admin_checks, AdminClient, ClientError};
use council_core::logging;

#[derive(Parser)]
#[command(name = "council-admin", version, about = "Inspect stage-2 analytics of council conversations")]
struct Cli {
    /// Backend URL
    #[arg(long, env = "COUNCIL_URL", default_value = "http://localhost:8001")]
    server: String,

    /// Admin key sent as X-Admin-Key
    #[arg(long, env = "COUNCIL_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List conversations that have messages
    List,
    /// Show stage-2 analytics for a conversation
    Stage2 {
        /// Conversation ID
        conversation_id: String,
    },
    /// Smoke-test the admin stage-2 endpoint
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    logging::init_cli();
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    let cli = Cli::parse();
    let client = AdminClient::new(cli.server, cli.admin_key);

    let result = match cli.command {
        Commands::List => cmd_list(&client).await,
        Commands::Stage2 { conversation_id } => cmd_stage2(&client, &conversation_id).await,
        Commands::Check => cmd_check(&client).await,
    };

    if let Err(e) = &result {
        if let Some(ClientError::Connection { .. }) = e.downcast_ref::<ClientError>() {
            eprintln!("[ERROR] Could not connect to backend at {}", client.base_url());
            eprintln!("Make sure the backend is running.");
        }
    }

    result
}

async fn cmd_list(client: &AdminClient) -> Result<()> {
    let conversations = client
        .list_conversations()
        .await
        .context("Could not fetch conversations")?;

    print!("{}", report::render_conversation_list(&conversations));
    Ok(())
}

async fn cmd_stage2(client: &AdminClient, conversation_id: &str) -> Result<()> {
    if client.admin_key().is_none() {
        anyhow::bail!("An admin key is required: pass --admin-key or set COUNCIL_ADMIN_KEY");
    }

    let stage2 = client.fetch_stage2(conversation_id).await?;
    print!("{}", report::render_stage2(conversation_id, &stage2));
    Ok(())
}

async fn cmd_check(client: &AdminClient) -> Result<()> {
    let rule = "=".repeat(60);
    println!("{rule}");
    println!("Testing Admin Stage 2 Endpoint");
    println!("{rule}");

    let outcomes = run_admin_checks(client).await?;
    for (i, outcome) in outcomes.iter().enumerate() {
        let mark = if outcome.passed { "PASS" } else { "FAIL" };
        println!("\n{}. {}", i + 1, outcome.name);
        println!("[{mark}]");
        for detail in &outcome.details {
            println!("   - {detail}");
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed).count();
    println!("\n{rule}");
    println!("Testing complete! {} passed, {} failed", outcomes.len() - failed, failed);
    println!("{rule}");

    if failed > 0 {
        anyhow::bail!("{} admin endpoint check(s) failed", failed);
    }
    Ok(())
}
