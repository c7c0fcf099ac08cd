//! Emission, one-time replay and halting.
//!
//! 1. Registering continuous and once handlers.
//! 2. Wrapping an event with `before:`/`after:` handlers.
//! 3. Replaying a one-time `startup` event to a late subscriber.
//! 4. Halting a dispatch from a `before:` handler.
//!
//! Run with `RUST_LOG=debug cargo run --example login` to see the emitter's
//! own log lines.
use eventide::{Drain, Emitter, HandlerError, data, from_sync_fn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let emitter = Emitter::with_tracing("demo");

    emitter
        .on(
            "before:login",
            from_sync_fn(|data| {
                if data["user"].as_str() == Some("mallory") {
                    println!("[before:login] rejecting {}", data["user"].as_str().unwrap_or("?"));
                    return Err(HandlerError::halt());
                }
                Ok(())
            }),
        )
        .await;

    emitter
        .on(
            "login",
            from_sync_fn(|data| {
                println!("[login] welcome, {}", data["user"].as_str().unwrap_or("stranger"));
                Ok(())
            }),
        )
        .await;

    emitter
        .once(
            "after:login",
            from_sync_fn(|_| {
                println!("[after:login] first login of this session");
                Ok(())
            }),
        )
        .await;

    emitter.emit("login", data! { "user" => "alice" }).await;
    emitter.emit("login", data! { "user" => "bob" }).await;
    emitter.emit("login", data! { "user" => "mallory" }).await;

    emitter.emit_once("startup", data! { "version" => "0.1.0" }).await;

    // Registered after the fact, still sees the startup payload.
    emitter
        .on(
            "startup",
            from_sync_fn(|data| {
                println!("[startup] late subscriber saw version {}", data["version"].as_str().unwrap_or("?"));
                Ok(())
            }),
        )
        .await;

    emitter
        .on("crash", from_sync_fn(|_| Err(HandlerError::msg("something broke"))))
        .await;
    drop(emitter.emit("crash", None));

    emitter.drain().await;
    println!("All emissions finished.");
}
