//! Tracing setup shared by both binaries (§ "Logging" of SPEC_FULL.md):
//! always to stderr so it never interleaves with framed protocol output
//! on stdout, filtered by `RUST_LOG` with a quiet default.

pub fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "tsassert=info,warn".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
