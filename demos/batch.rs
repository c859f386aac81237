//! Batch example: several calls in one round trip, matched back by id
//!
//! ```text
//! JROH_ENDPOINT=http://localhost:8080/rpc cargo run --example batch
//! ```

use jroh::{params, BatchResponse, JrohClient};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let endpoint =
        std::env::var("JROH_ENDPOINT").unwrap_or_else(|_| "http://localhost:8080/rpc".to_string());
    let client = JrohClient::new(endpoint);

    let add = client.new_request("add", params![5, 3]);
    let multiply = client.new_request("multiply", params![4, 7]);
    let echo = client.new_request("echo", params!["hello", {"nested": true}]);
    let ids = [add.id, multiply.id, echo.id];

    let start = Instant::now();
    let responses = client
        .batch(vec![
            add.into(),
            client.new_notification("log", params!["batch started"]).into(),
            multiply.into(),
            echo.into(),
        ])
        .await?;
    println!(
        "[CLIENT] {} responses in {:?}",
        responses.len(),
        start.elapsed()
    );

    // Servers may answer in any order
    let responses = BatchResponse::new(responses);
    for id in ids {
        match responses.get_response(id) {
            Some(response) if response.is_error() => {
                println!("[CLIENT] #{} error: {:?}", id, response.error)
            }
            Some(response) => println!("[CLIENT] #{} result: {:?}", id, response.result),
            None => println!("[CLIENT] #{} no response", id),
        }
    }

    if !responses.all_success() {
        println!("[CLIENT] {} entries failed", responses.errors().len());
    }

    Ok(())
}
