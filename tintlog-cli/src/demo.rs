//! Playground scenarios.

use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use tintlog_core::{arg, field, lazy, start_timer, Field};
use tintlog_engine::Logger;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Plain messages at every level
    Basic,
    /// Structured fields, including nested values
    Fields,
    /// Named sub-loggers with default fields
    Named,
    /// Timer fields under and over budget
    Timers,
    /// Lazily built messages
    Lazy,
    /// A tight loop of identical messages
    Throttle,
    All,
}

#[derive(Serialize)]
struct Account<'a> {
    id: u32,
    name: &'a str,
    status: &'a str,
}

pub async fn run(logger: &Logger, scenario: Scenario) {
    match scenario {
        Scenario::Basic => basic(logger),
        Scenario::Fields => fields(logger),
        Scenario::Named => named(logger),
        Scenario::Timers => timers(logger).await,
        Scenario::Lazy => lazy_messages(logger),
        Scenario::Throttle => throttle(logger).await,
        Scenario::All => {
            basic(logger);
            fields(logger);
            named(logger);
            timers(logger).await;
            lazy_messages(logger);
            throttle(logger).await;
        }
    }
}

fn basic(logger: &Logger) {
    logger.info("Hello from the playground! This is a standard info message.");
    logger.warn("This is a warning message.");
    logger.error("This is an error message.");
    logger.debug("This is a debug message (hidden unless the level is debug or lower).");
    logger.trace("This is a trace message (hidden unless the level is trace).");
}

fn fields(logger: &Logger) {
    logger.info_with(
        "User logged in successfully",
        [field("userId", 12345), field("tenant", "acme-corp")],
    );
    logger.info_with(
        "Logging a single object:",
        [arg(Account {
            id: 1,
            name: "Kirk Lin",
            status: "active",
        })],
    );
    logger.info_with(
        "Logging an object as a field",
        [field(
            "account",
            Account {
                id: 2,
                name: "Ada Park",
                status: "invited",
            },
        )],
    );
    logger.info_with(
        "Logging a list",
        [field("permissions", ["read", "write"])],
    );

    let deprecated = true;
    logger.warn_with(
        "Request to endpoint",
        [
            Some(field("endpoint", "/api/v1/legacy")),
            deprecated.then(|| field("deprecated", true)),
            None,
        ],
    );

    let failure = std::io::Error::other("Something went wrong!");
    logger.error_with("An error occurred", [field("error", failure.to_string())]);
}

fn named(logger: &Logger) {
    let db = logger.named("database", [field("pool", "primary")]);
    let api = logger.named("api", None::<Field>);
    db.info("Connecting to the database...");
    api.info("Incoming request to /users");
}

async fn timers(logger: &Logger) {
    let db = logger.named("database", None::<Field>);
    let api = logger.named("api", None::<Field>);

    let connect = start_timer(200);
    let request = start_timer(100);

    tokio::time::sleep(Duration::from_millis(150)).await;
    db.info_with("Database connected successfully", [field("time", connect)]);

    tokio::time::sleep(Duration::from_millis(50)).await;
    api.error_with("Request timed out", [field("time", request)]);
}

fn lazy_messages(logger: &Logger) {
    logger.debug(lazy(|| {
        let total: u64 = (0..1_000_000u64).sum();
        (
            "This is a debug message with complex data".to_string(),
            vec![Some(field("data", total))],
        )
    }));
}

async fn throttle(logger: &Logger) {
    logger.info("--- Testing throttling (only a few messages should appear below) ---");
    for _ in 0..100 {
        logger.info("This is a spam message");
    }
    tokio::time::sleep(logger.throttle_config().window() + Duration::from_millis(50)).await;
}
