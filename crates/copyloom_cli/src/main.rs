//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `copyloom_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe only; stays independent from the Flutter/FFI runtime setup.
    println!("copyloom_core ping={}", copyloom_core::ping());
    println!("copyloom_core version={}", copyloom_core::core_version());
    println!(
        "copyloom_core extract={:?}",
        copyloom_core::inline_html_to_text("<p>Hello<br>World</p>")
    );
}
