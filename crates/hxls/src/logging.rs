use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::args::GlobalArgs;

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level follows `-q`/`-v`, and the
/// `debug` setting raises it to at least `debug`.
pub fn init(args: &GlobalArgs, debug: bool) {
    let level = if args.quiet {
        "error"
    } else {
        match (args.verbose, debug) {
            (0, false) => "warn",
            (1, false) => "info",
            (0 | 1, true) | (2, _) => "debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second call in the same process keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(args.verbose > 1)
        .try_init();
}
