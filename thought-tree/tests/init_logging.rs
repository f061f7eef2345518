//! Test-only: initializes tracing from `RUST_LOG` when the test binary starts.
//!
//! Include `mod init_logging;` in an integration test file so that search logs
//! (selection, expansion, callback failures) are printed when running tests.
//!
//! ```bash
//! RUST_LOG=thought_tree=debug cargo test -p thought-tree --test strategies -- --nocapture
//! ```

use ctor::ctor;
use tracing_subscriber::EnvFilter;

#[ctor]
fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
