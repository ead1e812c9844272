use std::io;

use tabiya::Driver;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr: stdout is reserved for the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    tabiya::print_engine_info();
    tabiya::print_binary_info();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut driver = Driver::new(&mut input, &mut output);
    driver.run()
}
