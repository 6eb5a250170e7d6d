//! Example demonstrating commitment tracing instrumentation.
//!
//! Run with: cargo run -p zkphash-core --example commit_tracing

use num_bigint::BigUint;
use tracing_subscriber::{fmt, EnvFilter};
use zkphash_core::{compute_phash, CommitEngine, ImageGrid, MockHasher, PHash};

fn main() -> zkphash_core::Result<()> {
    // Trace every Merkle level and commitment stage
    fmt()
        .with_env_filter(EnvFilter::new("zkphash_core=trace,info"))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    println!("=== zkphash Commitment Tracing Demo ===\n");

    let image = ImageGrid::from_fn(|r, c| ((r * 7 + c * 13) % 256) as u64);
    let query = compute_phash(&image);
    println!("Query pHash: {}", query.to_hex());
    println!("{}\n", query.to_bit_matrix());

    // Five entries pad to a width-8 tree
    let mut db = vec![PHash::zero(); 4];
    db.insert(2, query);

    let engine = CommitEngine::new(MockHasher::default());
    let tree = engine.merkle_tree(&db)?;
    println!(
        "Merkle tree: {} leaves, width {}, depth {}, padding {}",
        tree.leaf_count(),
        tree.width(),
        tree.depth(),
        tree.padding()
    );

    let bundle = engine.commit(&db, image, BigUint::from(123_456_789u32), 10)?;
    println!("dbHash:        {}", bundle.db_hash);
    println!("imgCommitment: {}", bundle.img_commitment);

    println!("\n=== Demo Complete ===");
    Ok(())
}
