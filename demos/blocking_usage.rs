//! Blocking Usage Example
//!
//! Same API from synchronous code: no async runtime in `main`.
//!
//! Run with: CAI_TOKEN=... cargo run --example blocking_usage -- CHARACTER_ID CHAT_ID

use anyhow::Context;
use characterai::blocking;
use characterai::session::SendMessage;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("characterai=info")
        .init();

    let mut args = std::env::args().skip(1);
    let character_id = args.next().context("usage: blocking_usage CHARACTER_ID CHAT_ID")?;
    let chat_id = args.next().context("usage: blocking_usage CHARACTER_ID CHAT_ID")?;

    let client = blocking::Client::from_async(characterai::Client::builder().build()?)?;
    let character = client.character(&character_id)?;
    println!("talking to {}", character.name);

    let recent = client.call(|c| async move { c.recent().chats().await })?;
    println!("{} recent chats", recent.len());

    let mut session = client.connect()?;
    let reply = session.send_message(SendMessage::new(&character_id, &chat_id, "Hello!"));
    session.close()?;
    let reply = reply?;
    println!("{}: {}", reply.name(), reply.text());
    Ok(())
}
