//! # Voxel Boy Entry Point
//!
//! Native entry point. It calls into the library's `run()` function.
//!
//! For the web build, see `run_web()` in the library.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    if let Err(err) = voxel_boy::run() {
        eprintln!("voxel-boy: {err}");
        std::process::exit(1);
    }
}
