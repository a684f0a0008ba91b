//! Generate `include/mall_ffi.h` from the `extern "C"` surface.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };
    let out_dir = crate_dir.join("include");
    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        println!("cargo:warning=cannot create {}: {e}", out_dir.display());
        return;
    }

    let result = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("MALL_FFI_H")
        .with_documentation(true)
        .generate();

    // Generation failures only warn.
    match result {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("mall_ffi.h"));
        }
        Err(e) => println!("cargo:warning=cbindgen skipped: {e}"),
    }
}
