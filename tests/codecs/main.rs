//! Integration tests for the `retropix-rs` codec core.
//!
//! The scenario module pins the end-to-end packet semantics of each codec
//! family; the fuzz module hammers every decoder with random and truncated
//! input and checks the buffer contract.

use std::sync::Once;

mod fuzz;
mod scenarios;

static INIT: Once = Once::new();

/// Initialize logging once for the whole test binary, with default level
/// info when `RUST_LOG` is not set.
pub fn init_logging() {
	INIT.call_once(|| {
		env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
	});
}
