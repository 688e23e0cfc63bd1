use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn main() {
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=memory.x");

  // Only the Pico firmware links against cortex-m-rt; host builds need nothing.
  let target = env::var("TARGET").unwrap_or_default();
  if !target.starts_with("thumbv6m") {
    return;
  }

  let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
  File::create(out.join("memory.x"))
    .unwrap()
    .write_all(include_bytes!("memory.x"))
    .unwrap();
  println!("cargo:rustc-link-search={}", out.display());

  println!("cargo:rustc-link-arg-bins=--nmagic");
  println!("cargo:rustc-link-arg-bins=-Tlink.x");
  println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
