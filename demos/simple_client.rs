//! Simple client example: calls, typed results, remote errors and notifications
//!
//! Point it at any JSON-RPC 2.0 HTTP endpoint:
//!
//! ```text
//! JROH_ENDPOINT=http://localhost:8080/rpc cargo run --example simple_client
//! ```

use jroh::core::ObservabilityConfig;
use jroh::{params, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct Person {
    name: String,
    age: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local JSON logs only, no collector needed
    jroh::core::init_observability(
        ObservabilityConfig::new("simple-client")
            .with_traces(false)
            .with_metrics(false),
    )?;

    let endpoint =
        std::env::var("JROH_ENDPOINT").unwrap_or_else(|_| "http://localhost:8080/rpc".to_string());

    let mut builder = ClientBuilder::new(&endpoint).timeout(Duration::from_secs(10));
    if let (Ok(user), Ok(pass)) = (std::env::var("JROH_USER"), std::env::var("JROH_PASS")) {
        builder = builder.basic_auth(&user, &pass);
    }
    let client = builder.build()?;
    println!("[CLIENT] Using {}", client.endpoint());

    // Plain call, result extracted on demand
    let response = client.call("sum", params![1, 2]).await?;
    match &response.error {
        Some(error) => println!("[CLIENT] sum failed: {}", error),
        None => println!("[CLIENT] sum = {}", response.get_int()?),
    }

    // Structured result
    match client.call_typed::<Person>("getPersonById", params![4711]).await {
        Ok(person) => println!("[CLIENT] {} is {} years old", person.name, person.age),
        Err(e) => println!("[CLIENT] getPersonById failed: {}", e),
    }

    // Fire and forget
    client.notify("log", params!["simple_client finished"]).await?;
    println!("[CLIENT] Notification sent");

    jroh::core::shutdown_observability();
    Ok(())
}
