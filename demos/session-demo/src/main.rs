//! Session demo binary
//!
//! Restores (or opens) an EventHub session, lists events and shows the merged
//! notification feed. Configuration comes from `EVENTHUB_*` variables;
//! credentials from `EVENTHUB_USERNAME` and `EVENTHUB_PASSWORD`.

use anyhow::{Context, bail};
use eventhub_client::{
    ClientConfig, FileCredentialStore, NotificationFeed, NotificationKind, ReqwestTransport,
    SessionManager,
};
use eventhub_core::{Navigator, SystemClock};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const NOTIFICATION_FILE: &str = "eventhub-notifications.json";

/// Prints where the user would be sent once the session is gone.
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect(&self, route: &str) {
        warn!(route, "session ended");
        println!("\n>>> Session ended, please sign in again ({route})");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventhub_demo=info,eventhub_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== EventHub Session Demo ===\n");

    let config = ClientConfig::from_env().context("loading client configuration")?;
    let feed_path = config.session_file.with_file_name(NOTIFICATION_FILE);
    info!(base_url = %config.base_url, session_file = %config.session_file.display(), "configured");

    let transport = ReqwestTransport::new(&config)?;
    let store = FileCredentialStore::new(&config.session_file);
    let session = SessionManager::new(transport, store, ConsoleNavigator, config);

    let user = match session.restore_session().await? {
        Some(restored) => {
            println!("Restored session for {}", restored.user.username);
            restored.user
        }
        None => {
            let (Ok(username), Ok(password)) = (
                std::env::var("EVENTHUB_USERNAME"),
                std::env::var("EVENTHUB_PASSWORD"),
            ) else {
                bail!("no stored session; set EVENTHUB_USERNAME and EVENTHUB_PASSWORD to sign in");
            };
            let established = session
                .login(&username, &password)
                .await
                .context("signing in")?;
            println!("Signed in as {}", established.user.username);
            established.user
        }
    };
    println!("Role: {:?}\n", user.role);

    let mut feed = NotificationFeed::load(SystemClock, &feed_path).await?;

    let eventos = session.events().list(1).await.context("listing events")?;
    println!(">>> {} events (showing page 1)", eventos.count);
    for evento in &eventos.results {
        let preco = if evento.is_free() { "gratuito" } else { evento.preco.as_str() };
        println!(
            "  #{} {} | {} | {} | {preco}",
            evento.id,
            evento.titulo,
            evento.data_inicio.format("%d/%m/%Y %H:%M"),
            evento.local,
        );
    }
    feed.push(
        NotificationKind::Info,
        format!("{} eventos carregados", eventos.results.len()),
    );

    let backend = session
        .notificacoes()
        .list(1)
        .await
        .context("listing notifications")?;
    let merged = feed.merged(&backend.results);
    println!(
        "\n>>> Notifications ({} unread)",
        feed.unread_count(&backend.results)
    );
    for entry in merged.iter().take(10) {
        let marker = if entry.is_read { ' ' } else { '*' };
        println!(
            "  {marker} [{:?}] {} ({})",
            entry.kind,
            entry.message,
            entry.created_at.format("%d/%m %H:%M")
        );
    }

    feed.save(&feed_path).await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}
