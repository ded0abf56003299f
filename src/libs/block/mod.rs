//! The block container: a compressed multi-genome alignment.
//!
//! A block stores one gap-free consensus sequence, a *gap map* describing
//! where the multi-member alignment carries gap columns, and one set of
//! edits (SNPs, insertions, deletions) per member node. Applying a member's
//! edits to the consensus reconstructs that member's original sequence
//! exactly.
//!
//! Three coordinate systems coexist:
//!
//! * **C** — consensus coordinates, 1-based, `1..=L`, no gaps;
//! * **G** — gapped-consensus coordinates, `1..=L + Σ gaps`;
//! * **M** — a member's own coordinates after its edits are applied.
//!
//! `gaps[p] = g` means the alignment has `g` gap columns immediately after
//! consensus position `p`. The key `0` names the cluster before the first
//! consensus position; it arises from reverse complementing a block with a
//! trailing cluster and from reconsensus. SNP and deletion positions always
//! lie in `[1, L]`.

pub mod combine;
pub mod error;
pub mod ids;
pub mod json;
pub mod reconsensus;

pub use combine::{combine, Alignment, Child, Strand};
pub use error::BlockError;
pub use ids::{BlockId, NodeId};

use crate::libs::interval::Interval;
use crate::libs::nt::{self, GAP};
use std::collections::BTreeMap;

/// SNPs: consensus position → substituted nucleotide.
pub type SnpMap = BTreeMap<usize, u8>;
/// Insertions: (consensus position, offset inside the gap cluster) → bytes.
pub type InsMap = BTreeMap<(usize, usize), Vec<u8>>;
/// Deletions: consensus position → run length in consensus columns.
pub type DelMap = BTreeMap<usize, usize>;

/// One member's edits against the block consensus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edits {
    pub snp: SnpMap,
    pub ins: InsMap,
    pub del: DelMap,
}

impl Edits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.snp.is_empty() && self.ins.is_empty() && self.del.is_empty()
    }

    /// Total inserted bytes.
    pub fn inserted(&self) -> usize {
        self.ins.values().map(|s| s.len()).sum()
    }

    /// Total deleted consensus columns.
    pub fn deleted(&self) -> usize {
        self.del.values().sum()
    }

    /// Merges deletion runs that touch (`pos + len == next pos`).
    fn normalize_dels(&mut self) {
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(self.del.len());
        for (&pos, &len) in &self.del {
            if let Some(last) = merged.last_mut() {
                if last.0 + last.1 == pos {
                    last.1 += len;
                    continue;
                }
            }
            merged.push((pos, len));
        }
        self.del = merged.into_iter().collect();
    }
}

/// Extends the last deletion run by one column, or starts a new run at
/// `pos`. Positions must arrive in increasing order.
pub(crate) fn extend_del_run(del: &mut DelMap, pos: usize) {
    let extended = match del.iter_mut().next_back() {
        Some((start, len)) if *start + *len == pos => {
            *len += 1;
            true
        }
        _ => false,
    };
    if !extended {
        del.insert(pos, 1);
    }
}

/// A compressed multi-genome alignment unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    consensus: Vec<u8>,
    gaps: BTreeMap<usize, usize>,
    members: BTreeMap<NodeId, Edits>,
}

impl Block {
    //----------------------------
    // Construction
    //----------------------------

    /// A block with no members.
    ///
    /// ```
    /// use panblock::Block;
    /// let b = Block::new(b"ACGTACGT".to_vec());
    /// assert_eq!(b.depth(), 0);
    /// assert_eq!(b.len(), 8);
    /// assert_eq!(b.sequence(), b"ACGTACGT");
    /// ```
    pub fn new(consensus: Vec<u8>) -> Self {
        Self {
            id: BlockId::fresh(),
            consensus,
            gaps: BTreeMap::new(),
            members: BTreeMap::new(),
        }
    }

    /// Wraps a raw sequence as a depth-1 block: the consensus *is* the
    /// member's sequence.
    pub fn from_sequence(node: NodeId, sequence: Vec<u8>) -> Self {
        let mut block = Self::new(sequence);
        block.members.insert(node, Edits::new());
        block
    }

    pub(crate) fn from_parts(
        id: BlockId,
        consensus: Vec<u8>,
        gaps: BTreeMap<usize, usize>,
        members: BTreeMap<NodeId, Edits>,
    ) -> Self {
        Self {
            id,
            consensus,
            gaps,
            members,
        }
    }

    /// A new block covering consensus positions `[lo, hi)` of this one.
    ///
    /// Every edit keyed in `[lo, hi)` is retained and shifted; a deletion
    /// overlapping the slice boundary is clipped to it. The gap cluster after a
    /// position in `[lo, hi)` travels with it; the cluster before position 1
    /// is kept only when `lo == 1`. The member set is preserved.
    pub fn slice(&self, iv: Interval) -> Result<Block, BlockError> {
        let l = self.len();
        if iv.lo < 1 || iv.lo >= iv.hi || iv.hi > l + 1 {
            return Err(BlockError::InvariantViolation(format!(
                "slice interval {} outside consensus of length {}",
                iv, l
            )));
        }
        let off = iv.lo - 1;

        let consensus = self.consensus[iv.lo - 1..iv.hi - 1].to_vec();

        let mut gaps = BTreeMap::new();
        if iv.lo == 1 {
            if let Some(&g) = self.gaps.get(&0) {
                gaps.insert(0, g);
            }
        }
        for (&p, &g) in self.gaps.range(iv.lo..iv.hi) {
            gaps.insert(p - off, g);
        }

        let mut members = BTreeMap::new();
        for (node, edits) in &self.members {
            let mut kept = Edits::new();
            for (&pos, &alt) in edits.snp.range(iv.lo..iv.hi) {
                kept.snp.insert(pos - off, alt);
            }
            for (&pos, &len) in edits.del.range(..iv.hi) {
                let start = pos.max(iv.lo);
                let end = (pos + len).min(iv.hi);
                if start < end {
                    kept.del.insert(start - off, end - start);
                }
            }
            let ins_lo = if iv.lo == 1 { (0, 0) } else { (iv.lo, 0) };
            for (&(p, o), s) in edits.ins.range(ins_lo..(iv.hi, 0)) {
                let p = if p == 0 { 0 } else { p - off };
                kept.ins.insert((p, o), s.clone());
            }
            members.insert(*node, kept);
        }

        Ok(Block {
            id: BlockId::fresh(),
            consensus,
            gaps,
            members,
        })
    }

    /// Byte-concatenation of blocks sharing the exact same member set.
    ///
    /// Keys of every block after the first are shifted by the cumulative
    /// prefix length. A leading gap cluster merges into the previous block's
    /// trailing cluster, the previous bytes coming first.
    pub fn concat(blocks: &[&Block]) -> Result<Block, BlockError> {
        let first = blocks
            .first()
            .ok_or_else(|| BlockError::MemberSetMismatch("concat of zero blocks".into()))?;
        let member_set: Vec<NodeId> = first.members.keys().copied().collect();
        for block in &blocks[1..] {
            if block.members.keys().copied().collect::<Vec<_>>() != member_set {
                return Err(BlockError::MemberSetMismatch(format!(
                    "block {} does not share the member set of block {}",
                    block.id, first.id
                )));
            }
        }

        let mut consensus = Vec::new();
        let mut gaps: BTreeMap<usize, usize> = BTreeMap::new();
        let mut members: BTreeMap<NodeId, Edits> =
            member_set.iter().map(|&n| (n, Edits::new())).collect();

        let mut offset = 0;
        for block in blocks {
            // Width of the cluster already sitting at the seam.
            let seam = gaps.get(&offset).copied().unwrap_or(0);
            if let Some(&lead) = block.gaps.get(&0) {
                *gaps.entry(offset).or_insert(0) += lead;
            }
            for (&p, &g) in block.gaps.range(1..) {
                gaps.insert(p + offset, g);
            }

            for (node, edits) in &block.members {
                let merged = members.get_mut(node).expect("member set checked");
                for (&pos, &alt) in &edits.snp {
                    merged.snp.insert(pos + offset, alt);
                }
                for (&pos, &len) in &edits.del {
                    merged.del.insert(pos + offset, len);
                }
                for (&(p, o), s) in &edits.ins {
                    if p == 0 {
                        merged.ins.insert((offset, o + seam), s.clone());
                    } else {
                        merged.ins.insert((p + offset, o), s.clone());
                    }
                }
            }

            consensus.extend_from_slice(&block.consensus);
            offset += block.len();
        }

        for edits in members.values_mut() {
            edits.normalize_dels();
        }

        Ok(Block {
            id: BlockId::fresh(),
            consensus,
            gaps,
            members,
        })
    }

    //----------------------------
    // Accessors
    //----------------------------

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Number of member nodes.
    pub fn depth(&self) -> usize {
        self.members.len()
    }

    /// Consensus length, not alignment length.
    pub fn len(&self) -> usize {
        self.consensus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consensus.is_empty()
    }

    /// Alignment length: consensus plus all gap columns.
    pub fn gapped_len(&self) -> usize {
        self.len() + self.gaps.values().sum::<usize>()
    }

    pub fn gaps(&self) -> &BTreeMap<usize, usize> {
        &self.gaps
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.keys().copied()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.members.contains_key(&node)
    }

    pub fn edits(&self, node: NodeId) -> Option<&Edits> {
        self.members.get(&node)
    }

    pub(crate) fn members(&self) -> &BTreeMap<NodeId, Edits> {
        &self.members
    }

    /// The consensus bytes.
    pub fn sequence(&self) -> &[u8] {
        &self.consensus
    }

    /// The consensus threaded with `-` runs from the gap map.
    pub fn gapped_consensus(&self) -> Vec<u8> {
        self.render_row(&Edits::new())
    }

    /// Realized sequence length for `node`.
    pub fn member_len(&self, node: NodeId) -> Option<usize> {
        let edits = self.members.get(&node)?;
        Some(self.len() + edits.inserted() - edits.deleted())
    }

    /// The member's row of the implied alignment matrix; length is the
    /// alignment length. Columns outside the member's edits match the
    /// consensus.
    pub fn member_row(&self, node: NodeId) -> Option<Vec<u8>> {
        Some(self.render_row(self.members.get(&node)?))
    }

    /// The member's reconstructed sequence, gap characters stripped.
    pub fn member_sequence(&self, node: NodeId) -> Option<Vec<u8>> {
        let mut row = self.member_row(node)?;
        row.retain(|&b| b != GAP);
        Some(row)
    }

    //----------------------------
    // Coordinates
    //----------------------------

    /// C → G: the gapped column of consensus position `x`.
    ///
    /// ```
    /// use panblock::Block;
    /// let mut b = Block::new(b"ACGTACGT".to_vec());
    /// b.widen_gap(4, 2).unwrap();
    /// assert_eq!(b.gapped_coord(4), 4);
    /// assert_eq!(b.gapped_coord(5), 7);
    /// ```
    pub fn gapped_coord(&self, x: usize) -> usize {
        x + self.gaps.range(..x).map(|(_, g)| g).sum::<usize>()
    }

    /// G → C: the consensus position at gapped column `g`, or `None` for a
    /// gap column.
    pub fn consensus_coord(&self, g: usize) -> Option<usize> {
        if g == 0 || g > self.gapped_len() {
            return None;
        }
        let mut lo = 1;
        let mut hi = self.len();
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            match self.gapped_coord(mid).cmp(&g) {
                std::cmp::Ordering::Equal => return Some(mid),
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid - 1,
            }
        }
        None
    }

    //----------------------------
    // Mutation
    //----------------------------

    /// Widens the gap cluster after consensus position `pos` (0 for the
    /// cluster before position 1) to at least `width` columns.
    pub fn widen_gap(&mut self, pos: usize, width: usize) -> Result<(), BlockError> {
        if pos > self.len() {
            return Err(BlockError::InvariantViolation(format!(
                "gap cluster key {} outside consensus of length {}",
                pos,
                self.len()
            )));
        }
        if width == 0 {
            return Ok(());
        }
        let entry = self.gaps.entry(pos).or_insert(0);
        *entry = (*entry).max(width);
        Ok(())
    }

    /// Registers a new member with the given edits.
    pub fn append(&mut self, node: NodeId, edits: Edits) -> Result<(), BlockError> {
        if self.members.contains_key(&node) {
            return Err(BlockError::DuplicateMember(node));
        }
        self.validate_edits(&edits)?;
        self.members.insert(node, edits);
        Ok(())
    }

    /// Relabels one member node.
    pub fn swap(&mut self, old: NodeId, new: NodeId) -> Result<(), BlockError> {
        if old == new {
            return Ok(());
        }
        if self.members.contains_key(&new) {
            return Err(BlockError::DuplicateMember(new));
        }
        let edits = self.members.remove(&old).ok_or_else(|| {
            BlockError::MemberSetMismatch(format!("node {} is not a member", old))
        })?;
        self.members.insert(new, edits);
        Ok(())
    }

    /// Coalesces several member nodes into one, merging their edit maps.
    ///
    /// Fails with [`BlockError::EditCollision`] when two coalesced members
    /// carry an insertion at the same `(position, offset)` key, or
    /// conflicting values at the same SNP or deletion key.
    pub fn swap_many(&mut self, olds: &[NodeId], new: NodeId) -> Result<(), BlockError> {
        let mut olds = olds.to_vec();
        olds.sort();
        olds.dedup();
        for old in &olds {
            if !self.members.contains_key(old) {
                return Err(BlockError::MemberSetMismatch(format!(
                    "node {} is not a member",
                    old
                )));
            }
        }
        if self.members.contains_key(&new) && !olds.contains(&new) {
            return Err(BlockError::DuplicateMember(new));
        }

        let mut merged = Edits::new();
        for old in &olds {
            let edits = &self.members[old];
            for (&pos, &alt) in &edits.snp {
                match merged.snp.insert(pos, alt) {
                    Some(prev) if prev != alt => {
                        return Err(BlockError::EditCollision(format!(
                            "snp {} → {} vs {}",
                            pos, prev as char, alt as char
                        )));
                    }
                    _ => {}
                }
            }
            for (&pos, &len) in &edits.del {
                match merged.del.insert(pos, len) {
                    Some(prev) if prev != len => {
                        return Err(BlockError::EditCollision(format!(
                            "deletion at {} of length {} vs {}",
                            pos, prev, len
                        )));
                    }
                    _ => {}
                }
            }
            for (&key, s) in &edits.ins {
                if let Some(prev) = merged.ins.insert(key, s.clone()) {
                    return Err(BlockError::EditCollision(format!(
                        "insertion at ({}, {}) from two members ({} vs {})",
                        key.0,
                        key.1,
                        String::from_utf8_lossy(&prev),
                        String::from_utf8_lossy(s)
                    )));
                }
            }
        }
        merged.normalize_dels();
        self.validate_edits(&merged)
            .map_err(|e| BlockError::EditCollision(format!("merged edits are inconsistent: {}", e)))?;

        for old in &olds {
            self.members.remove(old);
        }
        self.members.insert(new, merged);
        Ok(())
    }

    /// The block viewed on the opposite strand.
    ///
    /// The consensus is reverse-complemented, the cluster after position `p`
    /// moves after position `L − p`, and an insert at offset `off` inside a
    /// cluster of width `g` lands at `g − off − len`.
    pub fn reverse_complement(&self) -> Block {
        let l = self.len();
        let consensus = nt::revcomp(&self.consensus);

        let mut gaps = BTreeMap::new();
        for (&p, &g) in &self.gaps {
            gaps.insert(l - p, g);
        }

        let mut members = BTreeMap::new();
        for (node, edits) in &self.members {
            let mut flipped = Edits::new();
            for (&pos, &alt) in &edits.snp {
                flipped.snp.insert(l - pos + 1, nt::complement(alt));
            }
            for (&pos, &len) in &edits.del {
                flipped.del.insert(l - pos - len + 2, len);
            }
            for (&(p, off), s) in &edits.ins {
                let g = self.gaps[&p];
                flipped.ins.insert((l - p, g - off - s.len()), nt::revcomp(s));
            }
            members.insert(*node, flipped);
        }

        Block {
            id: self.id,
            consensus,
            gaps,
            members,
        }
    }

    //----------------------------
    // Internals
    //----------------------------

    fn render_row(&self, edits: &Edits) -> Vec<u8> {
        let l = self.len();
        let mut deleted = vec![false; l + 1];
        for (&pos, &len) in &edits.del {
            for p in pos..pos + len {
                deleted[p] = true;
            }
        }

        let mut row = Vec::with_capacity(self.gapped_len());
        self.push_cluster(&mut row, 0, edits);
        for x in 1..=l {
            let byte = if deleted[x] {
                GAP
            } else if let Some(&alt) = edits.snp.get(&x) {
                alt
            } else {
                self.consensus[x - 1]
            };
            row.push(byte);
            self.push_cluster(&mut row, x, edits);
        }
        row
    }

    fn push_cluster(&self, row: &mut Vec<u8>, p: usize, edits: &Edits) {
        let Some(&g) = self.gaps.get(&p) else {
            return;
        };
        let start = row.len();
        row.resize(start + g, GAP);
        for (&(_, off), s) in edits.ins.range((p, 0)..(p + 1, 0)) {
            row[start + off..start + off + s.len()].copy_from_slice(s);
        }
    }

    /// Checks one member's edits against the consensus and gap map.
    pub(crate) fn validate_edits(&self, edits: &Edits) -> Result<(), BlockError> {
        let l = self.len();

        for (&pos, &alt) in &edits.snp {
            if pos < 1 || pos > l {
                return Err(BlockError::InvariantViolation(format!(
                    "snp position {} outside consensus of length {}",
                    pos, l
                )));
            }
            if alt == GAP {
                return Err(BlockError::InvariantViolation(format!(
                    "snp at {} substitutes a gap byte",
                    pos
                )));
            }
        }

        let mut prev_end = 0;
        for (&pos, &len) in &edits.del {
            if pos < 1 || len < 1 || pos + len - 1 > l {
                return Err(BlockError::InvariantViolation(format!(
                    "deletion at {} of length {} runs outside consensus of length {}",
                    pos, len, l
                )));
            }
            if pos < prev_end {
                return Err(BlockError::InvariantViolation(format!(
                    "deletion at {} overlaps the previous run",
                    pos
                )));
            }
            prev_end = pos + len;
        }
        for &pos in edits.snp.keys() {
            if let Some((&start, &len)) = edits.del.range(..=pos).next_back() {
                if pos < start + len {
                    return Err(BlockError::InvariantViolation(format!(
                        "snp at {} falls inside a deletion",
                        pos
                    )));
                }
            }
        }

        let mut prev: Option<(usize, usize)> = None;
        for (&(p, off), s) in &edits.ins {
            if s.is_empty() {
                return Err(BlockError::InvariantViolation(format!(
                    "empty insertion at ({}, {})",
                    p, off
                )));
            }
            let width = self.gaps.get(&p).copied().ok_or_else(|| {
                BlockError::InvariantViolation(format!(
                    "insertion at ({}, {}) without a gap cluster",
                    p, off
                ))
            })?;
            if off + s.len() > width {
                return Err(BlockError::InvariantViolation(format!(
                    "insertion at ({}, {}) of length {} exceeds cluster width {}",
                    p,
                    off,
                    s.len(),
                    width
                )));
            }
            if let Some((pp, pend)) = prev {
                if pp == p && off < pend {
                    return Err(BlockError::InvariantViolation(format!(
                        "insertion at ({}, {}) overlaps the previous one",
                        p, off
                    )));
                }
            }
            prev = Some((p, off + s.len()));
        }

        Ok(())
    }

    /// Full invariant check, used after deserialization.
    pub fn validate(&self) -> Result<(), BlockError> {
        let l = self.len();
        for (&p, &g) in &self.gaps {
            if p > l || g == 0 {
                return Err(BlockError::InvariantViolation(format!(
                    "gap cluster ({} → {}) invalid for consensus of length {}",
                    p, g, l
                )));
            }
        }
        for edits in self.members.values() {
            self.validate_edits(edits)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(n: u64) -> NodeId {
        NodeId(n)
    }

    #[test]
    fn fresh_block() {
        let b = Block::new(b"ACGTACGT".to_vec());
        assert_eq!(b.depth(), 0);
        assert_eq!(b.len(), 8);
        assert_eq!(b.sequence(), b"ACGTACGT");
        assert_eq!(b.gapped_consensus(), b"ACGTACGT");
    }

    #[test]
    fn snp_member() {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        let mut edits = Edits::new();
        edits.snp.insert(3, b'T');
        b.append(node(1), edits).unwrap();
        assert_eq!(b.depth(), 1);
        assert_eq!(b.member_sequence(node(1)).unwrap(), b"ACTTACGT");
        assert_eq!(b.member_len(node(1)), Some(8));
    }

    #[test]
    fn insertion_fills_cluster_suffix() {
        // Cluster of 4 after position 4; the insert fills the first 2 columns.
        let mut b = Block::new(b"ACGTACGT".to_vec());
        b.widen_gap(4, 4).unwrap();
        let mut edits = Edits::new();
        edits.ins.insert((4, 0), b"GG".to_vec());
        b.append(node(1), edits).unwrap();
        assert_eq!(b.member_row(node(1)).unwrap(), b"ACGTGG--ACGT");
        assert_eq!(b.member_sequence(node(1)).unwrap(), b"ACGTGGACGT");
        assert_eq!(b.member_len(node(1)), Some(10));
    }

    #[test]
    fn insertion_fills_whole_cluster() {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        b.widen_gap(4, 2).unwrap();
        let mut edits = Edits::new();
        edits.ins.insert((4, 0), b"GG".to_vec());
        b.append(node(1), edits).unwrap();
        assert_eq!(b.member_row(node(1)).unwrap(), b"ACGTGGACGT");
        assert_eq!(b.member_sequence(node(1)).unwrap(), b"ACGTGGACGT");
    }

    #[test]
    fn deletion_removes_consensus_columns() {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        let mut edits = Edits::new();
        edits.snp.insert(3, b'T');
        edits.del.insert(5, 2);
        b.append(node(1), edits).unwrap();
        assert_eq!(b.member_sequence(node(1)).unwrap(), b"ACTTGT");
        assert_eq!(b.member_len(node(1)), Some(6));
    }

    #[test]
    fn gapped_and_ungapped_views_agree() {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        b.widen_gap(4, 3).unwrap();
        let mut edits = Edits::new();
        edits.snp.insert(1, b'T');
        edits.ins.insert((4, 1), b"CC".to_vec());
        edits.del.insert(7, 2);
        b.append(node(9), edits).unwrap();

        let row = b.member_row(node(9)).unwrap();
        assert_eq!(row.len(), b.gapped_len());
        assert_eq!(row, b"TCGT-CCAC--");
        let stripped: Vec<u8> = row.into_iter().filter(|&c| c != GAP).collect();
        assert_eq!(stripped, b.member_sequence(node(9)).unwrap());
    }

    #[test]
    fn append_rejects_duplicates_and_bad_edits() {
        let mut b = Block::new(b"ACGT".to_vec());
        b.append(node(1), Edits::new()).unwrap();
        assert_eq!(
            b.append(node(1), Edits::new()),
            Err(BlockError::DuplicateMember(node(1)))
        );

        let mut edits = Edits::new();
        edits.snp.insert(5, b'A');
        assert!(matches!(
            b.append(node(2), edits),
            Err(BlockError::InvariantViolation(_))
        ));

        let mut edits = Edits::new();
        edits.del.insert(3, 3);
        assert!(matches!(
            b.append(node(2), edits),
            Err(BlockError::InvariantViolation(_))
        ));

        let mut edits = Edits::new();
        edits.ins.insert((2, 0), b"AA".to_vec());
        assert!(matches!(
            b.append(node(2), edits),
            Err(BlockError::InvariantViolation(_))
        ));
    }

    #[test]
    fn insertion_must_fit_its_cluster() {
        let mut b = Block::new(b"ACGT".to_vec());
        b.widen_gap(2, 2).unwrap();
        let mut edits = Edits::new();
        edits.ins.insert((2, 1), b"GG".to_vec());
        assert!(matches!(
            b.append(node(1), edits),
            Err(BlockError::InvariantViolation(_))
        ));
    }

    #[test]
    fn slice_shifts_and_truncates() {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        b.widen_gap(4, 2).unwrap();
        let mut edits = Edits::new();
        edits.snp.insert(2, b'T');
        edits.ins.insert((4, 0), b"GG".to_vec());
        edits.del.insert(5, 4);
        b.append(node(1), edits).unwrap();

        let s = b.slice(Interval::new(3, 7)).unwrap();
        assert_eq!(s.sequence(), b"GTAC");
        assert_eq!(s.gaps().get(&2), Some(&2));
        let edits = s.edits(node(1)).unwrap();
        assert!(edits.snp.is_empty());
        assert_eq!(edits.ins.get(&(2, 0)).unwrap(), b"GG");
        // Deletion 5..=8 clipped to the slice 3..7 → local 3..=4.
        assert_eq!(edits.del.get(&3), Some(&2));
        assert_eq!(s.member_sequence(node(1)).unwrap(), b"GTGG");
    }

    #[test]
    fn slice_concat_round_trip() {
        let mut b = Block::new(b"ACGTACGTAC".to_vec());
        b.widen_gap(3, 2).unwrap();
        b.widen_gap(10, 1).unwrap();
        let mut e1 = Edits::new();
        e1.snp.insert(6, b'C');
        e1.ins.insert((3, 0), b"TT".to_vec());
        e1.ins.insert((10, 0), b"A".to_vec());
        e1.del.insert(4, 2);
        b.append(node(1), e1).unwrap();
        let mut e2 = Edits::new();
        e2.del.insert(9, 2);
        b.append(node(2), e2).unwrap();

        for k in 2..=9 {
            let left = b.slice(Interval::new(1, k)).unwrap();
            let right = b.slice(Interval::new(k, 11)).unwrap();
            let joined = Block::concat(&[&left, &right]).unwrap();
            assert_eq!(joined.sequence(), b.sequence(), "cut at {}", k);
            for n in [node(1), node(2)] {
                assert_eq!(
                    joined.member_sequence(n),
                    b.member_sequence(n),
                    "cut at {}",
                    k
                );
            }
        }
    }

    #[test]
    fn concat_requires_identical_member_sets() {
        let a = Block::from_sequence(node(1), b"ACGT".to_vec());
        let c = Block::from_sequence(node(2), b"TTTT".to_vec());
        assert!(matches!(
            Block::concat(&[&a, &c]),
            Err(BlockError::MemberSetMismatch(_))
        ));
    }

    #[test]
    fn swap_relabels() {
        let mut b = Block::from_sequence(node(1), b"ACGT".to_vec());
        b.swap(node(1), node(7)).unwrap();
        assert!(b.contains_node(node(7)));
        assert!(!b.contains_node(node(1)));
        assert!(matches!(
            b.swap(node(1), node(9)),
            Err(BlockError::MemberSetMismatch(_))
        ));
    }

    #[test]
    fn swap_many_merges_disjoint_edits() {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        let mut e1 = Edits::new();
        e1.snp.insert(2, b'T');
        b.append(node(1), e1).unwrap();
        let mut e2 = Edits::new();
        e2.del.insert(5, 1);
        b.append(node(2), e2).unwrap();

        b.swap_many(&[node(1), node(2)], node(3)).unwrap();
        assert_eq!(b.depth(), 1);
        let merged = b.edits(node(3)).unwrap();
        assert_eq!(merged.snp.get(&2), Some(&b'T'));
        assert_eq!(merged.del.get(&5), Some(&1));
    }

    #[test]
    fn swap_many_rejects_overlapping_insertions() {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        b.widen_gap(4, 2).unwrap();
        let mut e1 = Edits::new();
        e1.ins.insert((4, 0), b"GG".to_vec());
        b.append(node(1), e1).unwrap();
        let mut e2 = Edits::new();
        e2.ins.insert((4, 0), b"GG".to_vec());
        b.append(node(2), e2).unwrap();

        assert!(matches!(
            b.swap_many(&[node(1), node(2)], node(3)),
            Err(BlockError::EditCollision(_))
        ));
        // The failed call left both members in place.
        assert_eq!(b.depth(), 2);
    }

    #[test]
    fn palindrome_revcomp() {
        let b = Block::from_sequence(node(1), b"ACGT".to_vec());
        assert_eq!(b.reverse_complement().sequence(), b"ACGT");
    }

    #[test]
    fn revcomp_involution_with_edits() {
        let mut b = Block::new(b"ACGTACGTAC".to_vec());
        b.widen_gap(0, 1).unwrap();
        b.widen_gap(4, 3).unwrap();
        b.widen_gap(10, 2).unwrap();
        let mut e1 = Edits::new();
        e1.snp.insert(2, b'A');
        e1.ins.insert((4, 1), b"GT".to_vec());
        e1.ins.insert((10, 0), b"C".to_vec());
        e1.del.insert(7, 2);
        b.append(node(1), e1).unwrap();
        let mut e2 = Edits::new();
        e2.ins.insert((0, 0), b"T".to_vec());
        b.append(node(2), e2).unwrap();

        let rc = b.reverse_complement();
        assert_eq!(rc.sequence(), nt::revcomp(b.sequence()).as_slice());
        for n in [node(1), node(2)] {
            assert_eq!(
                rc.member_sequence(n).unwrap(),
                nt::revcomp(&b.member_sequence(n).unwrap())
            );
        }

        let back = rc.reverse_complement();
        assert_eq!(back.sequence(), b.sequence());
        assert_eq!(back.gaps(), b.gaps());
        for n in [node(1), node(2)] {
            assert_eq!(back.member_sequence(n), b.member_sequence(n));
        }
    }

    #[test]
    fn coordinate_translation() {
        let mut b = Block::new(b"ACGTACGT".to_vec());
        b.widen_gap(0, 1).unwrap();
        b.widen_gap(4, 2).unwrap();
        assert_eq!(b.gapped_len(), 11);
        assert_eq!(b.gapped_coord(1), 2);
        assert_eq!(b.gapped_coord(4), 5);
        assert_eq!(b.gapped_coord(5), 8);
        assert_eq!(b.consensus_coord(2), Some(1));
        assert_eq!(b.consensus_coord(1), None);
        assert_eq!(b.consensus_coord(6), None);
        assert_eq!(b.consensus_coord(8), Some(5));
        assert_eq!(b.consensus_coord(12), None);
    }
}
