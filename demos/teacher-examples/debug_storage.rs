#![allow(unused_imports, dead_code)]

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Storage Analysis ===");
    println!("Storage debugging - run individual storage backends directly");
    println!("This example requires updating method signatures.");

    Ok(())
}
