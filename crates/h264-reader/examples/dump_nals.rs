//! Prints every NAL unit in an Annex B file.
//!
//! ```text
//! cargo run -p h264-reader --example dump_nals -- input.h264
//! RUST_LOG=h264_reader=trace cargo run -p h264-reader --example dump_nals -- input.h264
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use h264_reader::H264Reader;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: dump_nals <input.h264>");
        std::process::exit(2);
    };

    let reader = H264Reader::new(BufReader::new(File::open(&path)?));
    let mut counts = BTreeMap::new();
    let mut total_bytes = 0usize;

    for nal in reader {
        let nal = nal?;
        println!(
            "#{:<6} {:<48} ref_idc={} size={}",
            nal.sequence_index,
            format!("{:?}", nal.nal_unit_type()),
            nal.nal_ref_idc(),
            nal.len()
        );
        *counts.entry(nal.nal_unit_type().value()).or_insert(0u64) += 1;
        total_bytes += nal.len();
    }

    println!("\n{} bytes of NAL data in {}", total_bytes, path);
    for (nal_unit_type, count) in counts {
        println!("  type {:>2}: {}", nal_unit_type, count);
    }

    Ok(())
}
