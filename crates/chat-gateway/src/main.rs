//! Chat gateway client entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-gateway
//! ```
//!
//! Configuration is loaded from environment variables. Incoming messages
//! are written to the log; Ctrl-C logs out.

use std::collections::HashMap;

use chat_common::{try_init_tracing_with_config, AppResult, ClientConfig, TracingConfig};
use chat_core::{BuddyHandle, ConversationHandle};
use chat_gateway::{GatewayClient, Host, Interest, WatchId};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, code = e.error_code(), "Gateway client failed");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = ClientConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        api = %config.account.api_base_url(),
        "Configuration loaded"
    );

    let (client, handle) = GatewayClient::new(config, LoggingHost::default())?;

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, logging out");
            let _ = handle.logout();
        }
    });

    client.run().await?;
    Ok(())
}

/// Host that writes everything to the log
#[derive(Debug, Default)]
struct LoggingHost {
    buddies: HashMap<String, BuddyHandle>,
    conversations: HashMap<ConversationHandle, String>,
    next_handle: u64,
    next_watch: u64,
}

impl LoggingHost {
    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl Host for LoggingHost {
    fn report_error(&mut self, message: &str) {
        warn!(%message, "Account error");
    }

    fn notify_connected(&mut self) {
        info!(
            buddies = self.buddies.len(),
            conversations = self.conversations.len(),
            "Connected"
        );
    }

    fn logout(&mut self) {
        info!("Logged out");
    }

    fn find_buddy(&self, name: &str) -> Option<BuddyHandle> {
        self.buddies.get(name).copied()
    }

    fn add_buddy(&mut self, name: &str) -> BuddyHandle {
        let handle = BuddyHandle::new(self.next());
        self.buddies.insert(name.to_string(), handle);
        handle
    }

    fn create_conversation(&mut self, title: &str, _name_hint: &str) -> ConversationHandle {
        let handle = ConversationHandle::new(self.next());
        self.conversations.insert(handle, title.to_string());
        info!(%title, "Joined conversation");
        handle
    }

    fn set_conversation_topic(&mut self, conversation: ConversationHandle, topic: &str) {
        if let Some(title) = self.conversations.get(&conversation) {
            info!(%title, %topic, "Topic");
        }
    }

    fn add_participant(&mut self, _conversation: ConversationHandle, _name: &str) {}

    fn free_conversation(&mut self, conversation: ConversationHandle) {
        self.conversations.remove(&conversation);
    }

    fn deliver_group_message(&mut self, conversation: ConversationHandle, author: &str, text: &str) {
        let title = self
            .conversations
            .get(&conversation)
            .map_or("?", String::as_str);
        info!(conversation = %title, %author, "{text}");
    }

    fn deliver_private_message(&mut self, peer: &str, text: &str) {
        info!(%peer, "{text}");
    }

    fn register_periodic_io(&mut self, fd: i32, interest: Interest) -> WatchId {
        self.next_watch += 1;
        tracing::debug!(fd, ?interest, watch = self.next_watch, "Watching socket");
        WatchId::new(self.next_watch)
    }

    fn unregister_periodic_io(&mut self, watch: WatchId) {
        tracing::debug!(watch = watch.raw(), "Stopped watching socket");
    }
}
