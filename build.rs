use std::process::Command;

/// Version reported by `dfm version`: `DFM_VERSION` when packaging, otherwise
/// `git describe` of the checkout. Falls back to the package version in
/// `lib.rs` when neither is available.
fn describe() -> Option<String> {
    if let Ok(version) = std::env::var("DFM_VERSION") {
        return Some(version);
    }
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    if let Some(version) = describe() {
        println!("cargo:rustc-env=DFM_VERSION={version}");
    }

    // Tags and commits change the description.
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=DFM_VERSION");
}
