//! Extra command-line driver.
//!
//! The `extra` binary (`src/main.rs`) dispatches to the handlers in
//! [`commands`]. Every handler has a pure form that takes source text and
//! returns its output or the diagnostics to report, so the same code paths
//! are exercised by the integration tests.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber.
///
/// Nothing is installed unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=extra_types=debug` or `RUST_LOG=extra_parse=trace`. With
/// `EXTRA_LOG_TREE` set as well, spans are printed as an indented tree
/// instead of flat lines. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let tree = std::env::var("EXTRA_LOG_TREE").is_ok();
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry()
            .with(filter)
            .with(tree.then(|| {
                tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true)
                    .with_bracketed_fields(true)
            }))
            .with((!tree).then(|| {
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
            }))
            .init();
    });
}
