//! tanuki's command-line entry point.

/// Main application entry point.
fn main() {
    tanuki::run_cli();
}
