#![allow(dead_code)]

use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Opaque red square: every rendered pixel is red
pub const RED_SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
  <rect x="0" y="0" width="64" height="64" fill="#ff0000"/>
</svg>"##;

/// Small centered dot on a transparent canvas
pub const DOT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="512" height="512" viewBox="0 0 512 512">
  <circle cx="256" cy="256" r="64" fill="#6366f1"/>
</svg>"##;

pub const EXPECTED_ICONS: [(u32, &str); 4] = [
    (32, "favicon-32.png"),
    (180, "apple-touch-icon.png"),
    (192, "icon-192.png"),
    (512, "icon-512.png"),
];

/// Creates `<root>/public/icon.svg` and returns the public directory
pub fn create_public_dir(root: &Path, svg: &str) -> PathBuf {
    let public_dir = root.join("public");
    std::fs::create_dir_all(&public_dir).expect("Failed to create public directory");
    std::fs::write(public_dir.join("icon.svg"), svg).expect("Failed to write icon.svg");
    public_dir
}

/// Runs the favicon-gen binary from `cwd` with the given arguments
pub fn run_favicon_gen(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_favicon-gen"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("Failed to run favicon-gen command")
}

pub fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("favicon-gen command failed");
    }
}

pub fn open_png(path: &Path) -> DynamicImage {
    assert!(path.exists(), "Icon should exist at: {}", path.display());
    image::open(path).unwrap_or_else(|e| panic!("Failed to decode {}: {e}", path.display()))
}
