//! Turn Chat Example
//!
//! Opens a chat session, starts a new chat with a character and exchanges a couple of
//! messages. `with_session` closes the socket even if a command fails.
//!
//! Run with: CAI_TOKEN=... cargo run --example turn_chat -- CHARACTER_ID

use anyhow::Context;
use characterai::session::{NewChatOptions, SendMessage};
use characterai::Client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("characterai=debug")
        .init();

    let character_id = std::env::args()
        .nth(1)
        .context("usage: turn_chat CHARACTER_ID")?;

    let client = Client::builder().build()?;
    let me = client.account().me().await?;
    let creator_id = me
        .id()
        .map(|id| id.to_string())
        .context("guest or anonymous accounts cannot start chats")?;

    let transcript = client
        .with_session(move |session| {
            Box::pin(async move {
                let mut lines = Vec::new();
                let (chat, greeting) = session
                    .new_chat(&character_id, &creator_id, NewChatOptions::default())
                    .await?;
                if let Some(greeting) = greeting {
                    lines.push(format!("{}: {}", greeting.name(), greeting.text()));
                }

                for text in ["Hi! Who are you?", "What can you help me with?"] {
                    lines.push(format!("me: {text}"));
                    let reply = session
                        .send_message(SendMessage::new(
                            character_id.as_str(),
                            chat.chat_id.as_str(),
                            text,
                        ))
                        .await?;
                    lines.push(format!("{}: {}", reply.name(), reply.text()));
                }
                Ok::<_, characterai::Error>(lines)
            })
        })
        .await?;

    for line in transcript {
        println!("{line}");
    }
    Ok(())
}
