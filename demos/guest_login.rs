//! Guest Login Example
//!
//! Creates a guest account, then uses its token to look up the account and search
//! for characters.
//!
//! Run with: cargo run --example guest_login -- "search words"

use characterai::auth::AuthFlow;
use characterai::Client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("characterai=info")
        .init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "helper".to_string());

    let token = AuthFlow::new()?.auth_guest().await?;
    println!("guest token acquired ({} chars)", token.len());

    let client = Client::new(token)?;
    let me = client.account().me().await?;
    println!("signed in as {}", me.username());

    for hit in client.characters().search(&query).await?.iter().take(5) {
        println!(
            "{:<40} {}",
            hit.name,
            hit.title.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
