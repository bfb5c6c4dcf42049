// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Example: extract an embedded message from a stego JPEG.
use std::fs;

use dctdm_core::{dctdm_extract, DctdmConfig, Transform};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: extract <stego.jpg> [passphrase]");
        std::process::exit(1);
    }

    let stego = fs::read(&args[1]).expect("Could not read stego image");
    let config = DctdmConfig::default();

    let transform = match args.get(2) {
        Some(pw) => Transform::Passphrase(pw),
        None => Transform::Identity,
    };

    match dctdm_extract(&stego, &config, &transform) {
        Ok(payload) => match String::from_utf8(payload.clone()) {
            Ok(text) => println!("Extracted message: {text}"),
            Err(_) => println!("Extracted {} raw bytes", payload.len()),
        },
        Err(e) => {
            eprintln!("Extract failed: {e}");
            std::process::exit(1);
        }
    }
}
