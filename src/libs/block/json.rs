//! The block's on-disk JSON form.
//!
//! Positions and node ids are emitted in numeric order and the encoding
//! carries no whitespace, so byte-equal outputs indicate semantic equality.
//! Insertion keys pair the consensus position with the offset inside the
//! gap cluster, written as `"[pos,off]"`.

use super::{Block, BlockId, Edits, NodeId};
use anyhow::{anyhow, bail, Context};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
struct BlockJson {
    id: String,
    seq: String,
    gaps: IndexMap<String, usize>,
    mutate: IndexMap<String, IndexMap<String, String>>,
    insert: IndexMap<String, IndexMap<String, String>>,
    delete: IndexMap<String, IndexMap<String, usize>>,
}

impl Block {
    /// Serializes the block to its canonical JSON form.
    pub fn to_json(&self) -> String {
        let mut gaps = IndexMap::new();
        for (&p, &g) in self.gaps() {
            gaps.insert(p.to_string(), g);
        }

        let mut mutate = IndexMap::new();
        let mut insert = IndexMap::new();
        let mut delete = IndexMap::new();
        for (node, edits) in self.members() {
            let mut snp = IndexMap::new();
            for (&pos, &alt) in &edits.snp {
                snp.insert(pos.to_string(), (alt as char).to_string());
            }
            let mut ins = IndexMap::new();
            for (&(p, off), s) in &edits.ins {
                ins.insert(
                    format!("[{},{}]", p, off),
                    String::from_utf8_lossy(s).into_owned(),
                );
            }
            let mut del = IndexMap::new();
            for (&pos, &len) in &edits.del {
                del.insert(pos.to_string(), len);
            }
            mutate.insert(node.to_string(), snp);
            insert.insert(node.to_string(), ins);
            delete.insert(node.to_string(), del);
        }

        let json = BlockJson {
            id: self.id().to_string(),
            seq: String::from_utf8_lossy(self.sequence()).into_owned(),
            gaps,
            mutate,
            insert,
            delete,
        };
        serde_json::to_string(&json).expect("block json is serializable")
    }

    /// Parses a block from its JSON form and validates the invariants.
    pub fn from_json(text: &str) -> anyhow::Result<Block> {
        let json: BlockJson = serde_json::from_str(text).context("invalid block json")?;

        let id: BlockId = json.id.parse().context("invalid block id")?;
        let consensus = json.seq.into_bytes();

        let mut gaps = BTreeMap::new();
        for (key, width) in json.gaps {
            let pos: usize = key
                .parse()
                .map_err(|_| anyhow!("invalid gap position: {}", key))?;
            gaps.insert(pos, width);
        }

        let mutate_keys: std::collections::BTreeSet<_> = json.mutate.keys().collect();
        let insert_keys: std::collections::BTreeSet<_> = json.insert.keys().collect();
        let delete_keys: std::collections::BTreeSet<_> = json.delete.keys().collect();
        if mutate_keys != insert_keys || mutate_keys != delete_keys {
            bail!("mutate/insert/delete name different member sets");
        }

        let mut members = BTreeMap::new();
        for (name, snp_json) in json.mutate {
            let node: NodeId = name
                .parse()
                .map_err(|_| anyhow!("invalid node id: {}", name))?;
            let mut edits = Edits::new();
            for (key, alt) in snp_json {
                let pos: usize = key
                    .parse()
                    .map_err(|_| anyhow!("invalid snp position: {}", key))?;
                let alt = match alt.as_bytes() {
                    [b] => *b,
                    _ => bail!("snp at {} is not a single nucleotide: {}", pos, alt),
                };
                edits.snp.insert(pos, alt);
            }
            for (key, s) in &json.insert[&name] {
                edits.ins.insert(parse_insert_key(key)?, s.clone().into_bytes());
            }
            for (key, &len) in &json.delete[&name] {
                let pos: usize = key
                    .parse()
                    .map_err(|_| anyhow!("invalid deletion position: {}", key))?;
                edits.del.insert(pos, len);
            }
            members.insert(node, edits);
        }

        let block = Block::from_parts(id, consensus, gaps, members);
        block.validate()?;
        Ok(block)
    }
}

fn parse_insert_key(key: &str) -> anyhow::Result<(usize, usize)> {
    let inner = key
        .strip_prefix('[')
        .and_then(|k| k.strip_suffix(']'))
        .ok_or_else(|| anyhow!("invalid insertion key: {}", key))?;
    let (pos, off) = inner
        .split_once(',')
        .ok_or_else(|| anyhow!("invalid insertion key: {}", key))?;
    Ok((
        pos.parse()
            .map_err(|_| anyhow!("invalid insertion key: {}", key))?,
        off.parse()
            .map_err(|_| anyhow!("invalid insertion key: {}", key))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        b.widen_gap(4, 2).unwrap();
        let mut e1 = Edits::new();
        e1.snp.insert(3, b'T');
        e1.ins.insert((4, 0), b"GG".to_vec());
        b.append(NodeId(1), e1).unwrap();
        let mut e2 = Edits::new();
        e2.del.insert(5, 2);
        b.append(NodeId(2), e2).unwrap();
        b
    }

    #[test]
    fn json_shape() {
        let text = sample_block().to_json();
        assert!(text.contains("\"seq\":\"ACGTACGT\""));
        assert!(text.contains("\"gaps\":{\"4\":2}"));
        assert!(text.contains("\"mutate\":{\"1\":{\"3\":\"T\"},\"2\":{}}"));
        assert!(text.contains("\"insert\":{\"1\":{\"[4,0]\":\"GG\"},\"2\":{}}"));
        assert!(text.contains("\"delete\":{\"1\":{},\"2\":{\"5\":2}}"));
    }

    #[test]
    fn round_trip_is_byte_exact() {
        let b = sample_block();
        let text = b.to_json();
        let parsed = Block::from_json(&text).unwrap();
        assert_eq!(parsed, b);
        assert_eq!(parsed.to_json(), text);
    }

    #[test]
    fn member_sets_must_agree() {
        let text = r#"{"id":"7","seq":"ACGT","gaps":{},
            "mutate":{"1":{}},"insert":{},"delete":{"1":{}}}"#;
        assert!(Block::from_json(text).is_err());
    }

    #[test]
    fn invariants_are_checked_on_load() {
        let text = r#"{"id":"7","seq":"ACGT","gaps":{},
            "mutate":{"1":{"9":"T"}},"insert":{"1":{}},"delete":{"1":{}}}"#;
        assert!(Block::from_json(text).is_err());
    }

    #[test]
    fn malformed_insert_keys_are_rejected() {
        let text = r#"{"id":"7","seq":"ACGT","gaps":{"2":1},
            "mutate":{"1":{}},"insert":{"1":{"4,0":"G"}},"delete":{"1":{}}}"#;
        assert!(Block::from_json(text).is_err());
    }
}
