//! Legacy Chat Example
//!
//! Continues the latest history-based chat with a character and relays messages
//! typed on stdin.
//!
//! Run with: CAI_TOKEN=... cargo run --example legacy_chat -- CHARACTER_ID

use anyhow::Context;
use characterai::services::MessageOptions;
use characterai::Client;
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("characterai=info")
        .init();

    let character_id = std::env::args()
        .nth(1)
        .context("usage: legacy_chat CHARACTER_ID")?;

    let client = Client::builder().build()?;
    let chat = client.chat1().get_chat(&character_id, None).await?;
    let tgt = chat
        .tgt
        .clone()
        .context("chat has no character participant")?;
    println!("chatting in {} with {}", chat.id(), tgt);

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        match client
            .chat1()
            .send_message(chat.id(), &tgt, text, &MessageOptions::new())
            .await
        {
            Ok(reply) => println!("{}> {}", reply.author, reply.text),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}
