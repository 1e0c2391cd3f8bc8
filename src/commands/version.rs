//! Command: print version information.

/// Print the dfm version to stdout.
pub fn run() {
    println!("dfm {}", crate::VERSION);
}
