//! Tracing setup for linkfolio.
//!
//! Level contract used across the crate:
//!
//! | Level | Usage |
//! |-------|-------|
//! | WARN  | Persistence failures, partial cascades, corrupt reloads |
//! | INFO  | Committed mutations, session open |
//! | DEBUG | Rejected input, reloads, storage writes |
//! | TRACE | Individual cascade steps |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns `false` if a
/// subscriber was already installed (e.g. by another test), which is not an error.
pub fn init(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}
