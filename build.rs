// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Generate a C header for the library and write it to the include
    // directory. This routine only need to be done if the ffi modules have
    // changed.
    println!("cargo:rerun-if-changed=src/ffi.rs");
    println!("cargo:rerun-if-changed=src/fee/ffi/mod.rs");
    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(d) => d,
        Err(_) => return,
    };
    // Only do this if we're not on docs.rs (doesn't like writing files outside
    // of OUT_DIR).
    if let Ok("1") = env::var("DOCS_RS").as_deref() {
        return;
    }

    let include_dir = std::path::Path::new(&crate_dir).join("include");
    if let Err(e) = std::fs::create_dir_all(&include_dir) {
        println!("cargo:warning=Couldn't create {}: {e}", include_dir.display());
        return;
    }

    let bindings = cbindgen::Builder::new()
        .with_config({
            let mut config = cbindgen::Config::default();
            config.cpp_compat = true;
            config.pragma_once = true;
            config
        })
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .generate();
    match bindings {
        Ok(b) => {
            b.write_to_file(include_dir.join("mwa_fee_beam.h"));
        }
        // A missing header shouldn't stop Rust users from building the crate.
        Err(e) => println!("cargo:warning=Unable to generate C bindings: {e}"),
    }
}
