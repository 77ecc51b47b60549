use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // Host builds (tests, mock shell) need no linker setup
    if env::var_os("CARGO_FEATURE_PICO2_W").is_none() {
        return;
    }

    // Put memory.x where the linker can find it
    let out = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out.join("memory.x"), include_bytes!("memory.x")).expect("write memory.x");
    println!("cargo:rustc-link-search={}", out.display());

    // Only the firmware binaries are linked for the target
    println!("cargo:rustc-link-arg-examples=--nmagic");
    println!("cargo:rustc-link-arg-examples=-Tlink.x");
    println!("cargo:rustc-link-arg-examples=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
