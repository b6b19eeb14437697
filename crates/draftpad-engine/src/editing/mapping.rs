//! Address remapping through document mutations.
//!
//! Every mutation publishes an [`AddrMap`] describing how the old address
//! space was rewritten: an ordered list of replacement spans, each turning
//! `old_len` address units starting at `start` into `new_len` units.
//! Positions are remapped with an explicit [`Bias`] so that callers can
//! choose which side of an insertion a boundary sticks to.

/// Which side of an insertion a mapped position sticks to.
///
/// Range starts are mapped with `After` so text inserted exactly at the
/// start lands outside the range; range ends are mapped with `Before` so
/// insertions at the end don't expand the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Before,
    After,
}

/// Result of mapping a single address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapped {
    /// The address in the new document's address space.
    pub addr: usize,
    /// True when the address sat strictly inside a replaced span, i.e. the
    /// content it pointed at no longer exists.
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MapSpan {
    start: usize,
    old_len: usize,
    new_len: usize,
}

/// The position mapping produced by one document mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrMap {
    spans: Vec<MapSpan>,
}

impl AddrMap {
    /// A mapping that leaves every address unchanged.
    pub fn identity() -> Self {
        Self { spans: Vec::new() }
    }

    /// A mapping with a single replacement span.
    pub fn replacing(start: usize, old_len: usize, new_len: usize) -> Self {
        Self {
            spans: vec![MapSpan {
                start,
                old_len,
                new_len,
            }],
        }
    }

    pub fn is_identity(&self) -> bool {
        self.spans.iter().all(|s| s.old_len == 0 && s.new_len == 0)
    }

    /// Map an old address into the new address space.
    pub fn map(&self, addr: usize, bias: Bias) -> usize {
        self.map_result(addr, bias).addr
    }

    /// Map an old address, also reporting whether it was deleted.
    pub fn map_result(&self, addr: usize, bias: Bias) -> Mapped {
        let mut diff: isize = 0;
        for span in &self.spans {
            let span_end = span.start + span.old_len;
            if addr < span.start || (addr == span.start && bias == Bias::Before) {
                break;
            }
            if addr > span_end || (addr == span_end && span.old_len > 0) {
                // Entirely past this span; accumulate its size change.
                diff += span.new_len as isize - span.old_len as isize;
                continue;
            }
            // The address touches the replaced region.
            let base = (span.start as isize + diff) as usize;
            let mapped = match bias {
                Bias::Before => base,
                Bias::After => base + span.new_len,
            };
            let deleted = addr > span.start && addr < span_end;
            return Mapped {
                addr: mapped,
                deleted,
            };
        }
        Mapped {
            addr: (addr as isize + diff) as usize,
            deleted: false,
        }
    }

    /// Map a range the way decorations are remapped: start sticks after
    /// insertions at its position, end sticks before. Returns `None` when
    /// the range was deleted or collapsed to nothing.
    pub fn map_range(&self, range: &std::ops::Range<usize>) -> Option<std::ops::Range<usize>> {
        let start = self.map_result(range.start, Bias::After);
        let end = self.map_result(range.end, Bias::Before);
        if start.deleted || end.deleted {
            return None;
        }
        if start.addr >= end.addr {
            return None;
        }
        Some(start.addr..end.addr)
    }
}
