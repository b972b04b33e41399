//! Partition a pruning matrix into cache-sized batches
//!
//! Usage: `partition-batches <capacity> [path-to-matrix.json]`
//!
//! Without a matrix path, a random sparse graph is generated so the tool can
//! be exercised without any external input.

use anyhow::{Context, Result};
use batch_partitioner::{partition, DenseBitMatrix, PartitionConfig};
use rand::Rng;
use std::env;
use std::fs;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let capacity: usize = args
        .next()
        .context("usage: partition-batches <capacity> [path-to-matrix.json]")?
        .parse()
        .context("capacity must be a positive integer")?;

    let matrix = match args.next() {
        Some(path) => load_matrix(&path)?,
        None => {
            println!("no matrix path given, generating a random 16-node graph");
            random_matrix(16, 0.15)
        }
    };

    let config = PartitionConfig::new(capacity);
    let report = partition(&matrix, &config).context("failed to partition pruning matrix")?;

    println!("batches: {}", report.batches.len());
    for (i, batch) in report.batches.iter().enumerate() {
        println!("  batch {i}: {} series {:?}", batch.len(), batch);
    }
    println!("isolated: {:?}", report.isolated);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn load_matrix(path: &str) -> Result<DenseBitMatrix> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let rows: Vec<Vec<bool>> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {path} as a JSON boolean grid"))?;
    DenseBitMatrix::try_from_dense(&rows).map_err(Into::into)
}

fn random_matrix(n: usize, edge_probability: f64) -> DenseBitMatrix {
    let mut rng = rand::thread_rng();
    let mut m = DenseBitMatrix::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen_bool(edge_probability) {
                m.set_edge(i, j);
            }
        }
    }
    m
}
