//! Half-open integer intervals `[lo, hi)` and sorted disjoint interval sets.
//!
//! Consensus coordinates are 1-based throughout the block engine, so a
//! full-length interval over a sequence of length `L` is `[1, L + 1)`.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub lo: usize,
    pub hi: usize,
}

impl Interval {
    /// ```
    /// use panblock::Interval;
    /// assert_eq!(Interval::new(1, 5).len(), 4);
    /// ```
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    pub fn len(&self) -> usize {
        self.hi.saturating_sub(self.lo)
    }

    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.lo <= pos && pos < self.hi
    }

    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    pub fn is_disjoint(&self, other: &Interval) -> bool {
        self.hi <= other.lo || other.hi <= self.lo
    }

    /// Intersection, or `None` when the intervals do not overlap.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        if lo < hi {
            Some(Interval::new(lo, hi))
        } else {
            None
        }
    }

    /// Union of two overlapping or adjacent intervals.
    /// `None` when there is a gap between them.
    pub fn union(&self, other: &Interval) -> Option<Interval> {
        if self.hi < other.lo || other.hi < self.lo {
            return None;
        }
        Some(Interval::new(self.lo.min(other.lo), self.hi.max(other.hi)))
    }

    /// Shifts both endpoints left by `offset`.
    pub fn shift_down(&self, offset: usize) -> Interval {
        Interval::new(self.lo - offset, self.hi - offset)
    }

    /// Shifts both endpoints right by `offset`.
    pub fn shift_up(&self, offset: usize) -> Interval {
        Interval::new(self.lo + offset, self.hi + offset)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lo, self.hi)
    }
}

impl FromStr for Interval {
    type Err = String;

    /// Parses `LO:HI`.
    ///
    /// ```
    /// use panblock::Interval;
    /// let iv: Interval = "1:5".parse().unwrap();
    /// assert_eq!(iv, Interval::new(1, 5));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid interval: {}", s))?;
        let lo = lo.parse().map_err(|_| format!("invalid interval: {}", s))?;
        let hi = hi.parse().map_err(|_| format!("invalid interval: {}", s))?;
        Ok(Interval::new(lo, hi))
    }
}

/// A sorted list of disjoint, non-empty intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    ivs: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.ivs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.ivs.is_empty()
    }

    /// Total number of covered positions.
    pub fn coverage(&self) -> usize {
        self.ivs.iter().map(|iv| iv.len()).sum()
    }

    /// Adds an interval, merging it with any stored interval it overlaps or
    /// touches.
    ///
    /// ```
    /// use panblock::{Interval, IntervalSet};
    /// let mut set = IntervalSet::new();
    /// set.add(Interval::new(1, 4));
    /// set.add(Interval::new(8, 10));
    /// set.add(Interval::new(3, 8));
    /// assert_eq!(set.iter().collect::<Vec<_>>(), vec![&Interval::new(1, 10)]);
    /// ```
    pub fn add(&mut self, iv: Interval) {
        if iv.is_empty() {
            return;
        }
        let mut merged = iv;
        let mut out = Vec::with_capacity(self.ivs.len() + 1);
        for stored in &self.ivs {
            match merged.union(stored) {
                Some(u) => merged = u,
                None => out.push(*stored),
            }
        }
        out.push(merged);
        out.sort();
        self.ivs = out;
    }

    /// Removes every position of `iv` from the set, splitting stored
    /// intervals where needed.
    pub fn subtract(&mut self, iv: &Interval) {
        let mut out = Vec::with_capacity(self.ivs.len() + 1);
        for stored in &self.ivs {
            if stored.is_disjoint(iv) {
                out.push(*stored);
                continue;
            }
            if stored.lo < iv.lo {
                out.push(Interval::new(stored.lo, iv.lo));
            }
            if iv.hi < stored.hi {
                out.push(Interval::new(iv.hi, stored.hi));
            }
        }
        self.ivs = out;
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.ivs.iter().any(|iv| iv.contains(pos))
    }

    /// The stored interval containing `iv` entirely, if any.
    pub fn find_containing(&self, iv: &Interval) -> Option<&Interval> {
        self.ivs.iter().find(|stored| stored.contains_interval(iv))
    }

    pub fn is_disjoint_from(&self, iv: &Interval) -> bool {
        self.ivs.iter().all(|stored| stored.is_disjoint(iv))
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        let mut set = IntervalSet::new();
        for iv in iter {
            set.add(iv);
        }
        set
    }
}
