pub mod combine;
pub mod concat;
pub mod consensus;
pub mod info;
pub mod reconsensus;
pub mod revcomp;
pub mod slice;

use std::io::Read;

/// Reads one block from a JSON file ("stdin" and gzipped files accepted).
pub fn read_block(infile: &str) -> anyhow::Result<panblock::Block> {
    let mut reader = panblock::reader(infile)?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    panblock::Block::from_json(&text)
}
