use std::path::PathBuf;

// Exposes the workspace `VERSION` file as `CLOUD_RISK_VERSION`.
fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let version_path = manifest_dir
        .ancestors()
        .nth(2)
        .expect("crate should live two levels below the workspace root")
        .join("VERSION");
    println!("cargo:rerun-if-changed={}", version_path.display());

    let version = std::fs::read_to_string(&version_path)
        .map(|raw| raw.trim().to_string())
        .expect("VERSION file should be readable");
    if version.is_empty() {
        panic!("{} is empty", version_path.display());
    }
    println!("cargo:rustc-env=CLOUD_RISK_VERSION={version}");
}
