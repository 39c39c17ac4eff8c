use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use tracing::trace;

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set. Otherwise the crate logs at `info`, or `debug`
/// when `verbose`. Calling this twice leaves the first subscriber in place.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "wheel_guesser=debug"
    } else {
        "wheel_guesser=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if installed.is_ok() {
        trace!("finished");
    }
}
