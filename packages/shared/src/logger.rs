//! Tracing subscriber setup shared by the Hiroba binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, the binary itself, the server
/// library and `tower_http` log at `default_level`.
///
/// # Arguments
///
/// * `bin_name` - Binary name (usually `env!("CARGO_BIN_NAME")`)
/// * `default_level` - Level used when `RUST_LOG` is not set (e.g. `"debug"`)
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    // A second initialization (e.g. several in-process servers in tests) is ignored.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}

const LIBRARY_TARGET: &str = "hiroba_server";

fn default_directives(bin_name: &str, default_level: &str) -> String {
    // Cargo bin names use hyphens, tracing targets use underscores
    let bin_target = bin_name.replace('-', "_");
    let mut targets = vec![bin_target.as_str()];
    if bin_target != LIBRARY_TARGET {
        targets.push(LIBRARY_TARGET);
    }
    targets.push("tower_http");

    targets
        .iter()
        .map(|target| format!("{target}={default_level}"))
        .collect::<Vec<_>>()
        .join(",")
}
