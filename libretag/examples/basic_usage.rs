//! Basic usage example for the retag library.
//!
//! Points a new tag at an existing manifest in a local registry.
//!
//! Run with: cargo run --example basic_usage -- <repository> <reference> <new-tag>

use libretag::Registry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [repository, reference, new_tag] = args.as_slice() else {
        eprintln!("usage: basic_usage <repository> <reference> <new-tag>");
        std::process::exit(2);
    };

    let registry = Registry::new("http://localhost:5000", "", "")?;
    println!("Connected to registry: {}", registry.registry_url());

    match registry.retag(repository, reference, new_tag) {
        Ok(()) => println!("✓ {}:{} now points at {}", repository, new_tag, reference),
        Err(e) => {
            eprintln!("✗ Retag failed: {}", e);
            eprintln!("  Make sure a registry is running at http://localhost:5000");
            eprintln!("  You can start one with: docker run -d -p 5000:5000 registry:2");
        }
    }

    Ok(())
}
