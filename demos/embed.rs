// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Example: embed a message in a baseline JPEG.
use std::fs;

use dctdm_core::{dctdm_capacity, dctdm_embed, DctdmConfig, Transform};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: embed <cover.jpg> <message> [passphrase]");
        std::process::exit(1);
    }

    let cover = fs::read(&args[1]).expect("Could not read cover image");
    let message = args[2].as_bytes();
    let config = DctdmConfig::default();

    let capacity = dctdm_capacity(&cover, &config).expect("Could not parse cover");
    println!("Cover capacity: {capacity} bytes");

    let transform = match args.get(3) {
        Some(pw) => Transform::Passphrase(pw),
        None => Transform::Identity,
    };

    let stego = dctdm_embed(&cover, message, &config, &transform).expect("Embed failed");

    let out_path = args[1]
        .replace(".jpeg", "_stego.jpeg")
        .replace(".jpg", "_stego.jpg");
    fs::write(&out_path, &stego).expect("Could not write output");
    println!("Stego image written to: {out_path}");
    println!("Cover: {} bytes, stego: {} bytes", cover.len(), stego.len());
}
