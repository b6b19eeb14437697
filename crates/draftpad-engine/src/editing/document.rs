use serde::{Deserialize, Serialize};

use crate::editing::{Cmd, Patch};

/// A contiguous piece of text inside a block.
///
/// Runs are the leaves of the document tree. Formatting splits a paragraph
/// into several runs; the mapping engine only cares that each run occupies a
/// contiguous address span equal to its byte length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A block-level node (paragraph) holding an ordered sequence of text runs.
///
/// In the address space a block consumes one opening unit, then its runs'
/// bytes, then one closing unit. An empty paragraph is a block with no runs
/// and a size of 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub runs: Vec<TextRun>,
}

impl Block {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Self::default()
        } else {
            Self {
                runs: vec![TextRun::new(text)],
            }
        }
    }

    /// Address units consumed by this block (open + text bytes + close).
    pub fn size(&self) -> usize {
        2 + self.text_len()
    }

    /// Total byte length of the block's text content.
    pub fn text_len(&self) -> usize {
        self.runs.iter().map(|r| r.text.len()).sum()
    }
}

/// Resolved position of an address within the tree's text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextPos {
    pub block: usize,
    pub run: usize,
    /// Byte offset within the run's text. Always a UTF-8 boundary.
    pub offset: usize,
}

/// A text run yielded during in-order traversal, with its position in both
/// coordinate spaces.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunRef<'a> {
    /// Address of the run's first byte.
    pub addr: usize,
    /// Flat-text offset of the run's first byte.
    pub flat: usize,
    pub text: &'a str,
}

pub(crate) struct RunWalk<'a> {
    doc: &'a Document,
    block: usize,
    run: usize,
    addr: usize,
    flat: usize,
}

impl<'a> Iterator for RunWalk<'a> {
    type Item = RunRef<'a>;

    fn next(&mut self) -> Option<RunRef<'a>> {
        loop {
            let block = self.doc.blocks.get(self.block)?;
            if let Some(run) = block.runs.get(self.run) {
                let item = RunRef {
                    addr: self.addr,
                    flat: self.flat,
                    text: &run.text,
                };
                self.addr += run.text.len();
                self.flat += run.text.len();
                self.run += 1;
                return Some(item);
            }
            // Past the last run: skip this block's closing unit and the next
            // block's opening unit.
            self.addr += 2;
            self.block += 1;
            self.run = 0;
        }
    }
}

/// The editable document: an ordered tree of blocks over a single global
/// address space, plus the state the edit pipeline threads through every
/// mutation.
///
/// The document always contains at least one block; an empty draft is a
/// single empty paragraph. All changes flow through [`Document::apply`],
/// which mutates the tree and returns a [`Patch`] carrying the mutation's
/// position mapping so decoration holders can remap their anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    /// Current caret/selection as an address range.
    pub(crate) selection: std::ops::Range<usize>,
    /// Version counter incremented on each edit (enables change detection).
    pub(crate) version: u64,
}

impl Document {
    /// Create a document from plain text. Each newline starts a new block.
    pub fn from_plain_text(text: &str) -> Self {
        let blocks = blocks_from_plain_text(text);
        let mut doc = Self {
            blocks,
            selection: 0..0,
            version: 0,
        };
        let end = doc.end_address();
        doc.selection = end..end;
        doc
    }

    /// Create a document from pre-built blocks (e.g. content restored by the
    /// persistence collaborator).
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = Self {
            blocks,
            selection: 0..0,
            version: 0,
        };
        doc.normalize();
        let end = doc.end_address();
        doc.selection = end..end;
        doc
    }

    /// Structured content for the persistence collaborator.
    pub fn content(&self) -> &[Block] {
        &self.blocks
    }

    /// Plain-text rendition with one newline between blocks. This is the
    /// save format, not the flat text view: the flat view has no separators.
    pub fn plain_text(&self) -> String {
        let mut out = String::with_capacity(self.flat_len() + self.blocks.len());
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for run in &block.runs {
                out.push_str(&run.text);
            }
        }
        out
    }

    /// The flat text view: every run's text in document order, with no
    /// structural separators.
    pub fn flat_text(&self) -> String {
        let mut out = String::with_capacity(self.flat_len());
        for run in self.runs() {
            out.push_str(run.text);
        }
        out
    }

    /// Total byte length of the flat text view.
    pub fn flat_len(&self) -> usize {
        self.blocks.iter().map(|b| b.text_len()).sum()
    }

    /// Total size of the address space.
    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(|b| b.size()).sum()
    }

    /// The document's terminal address. Out-of-range conversions clamp here.
    pub fn end_address(&self) -> usize {
        self.content_size()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> std::ops::Range<usize> {
        self.selection.clone()
    }

    pub fn set_selection(&mut self, selection: std::ops::Range<usize>) {
        let end = self.end_address();
        let start = selection.start.min(end);
        let stop = selection.end.min(end).max(start);
        self.selection = start..stop;
    }

    /// Word count over the flat text (tracked for the saving collaborator).
    pub fn word_count(&self) -> usize {
        self.flat_text().split_whitespace().count()
    }

    pub(crate) fn runs(&self) -> RunWalk<'_> {
        RunWalk {
            doc: self,
            block: 0,
            run: 0,
            // Content of the first block starts after its opening unit.
            addr: 1,
            flat: 0,
        }
    }

    /// Text content between two addresses, skipping structural units.
    ///
    /// Out-of-range or non-boundary inputs are clamped; this runs on every
    /// staleness check and must never fail.
    pub fn text_between(&self, range: std::ops::Range<usize>) -> String {
        let mut out = String::new();
        if range.start >= range.end {
            return out;
        }
        for run in self.runs() {
            let run_end = run.addr + run.text.len();
            if run_end <= range.start {
                continue;
            }
            if run.addr >= range.end {
                break;
            }
            let from = range.start.saturating_sub(run.addr);
            let to = (range.end - run.addr).min(run.text.len());
            let from = floor_char_boundary(run.text, from);
            let to = floor_char_boundary(run.text, to);
            if from < to {
                out.push_str(&run.text[from..to]);
            }
        }
        out
    }

    /// Apply a command to the document.
    ///
    /// The pipeline mirrors one editor transaction: resolve and execute the
    /// edit, derive its position mapping, transform the selection through
    /// it, and bump the version. The returned [`Patch`] is what decoration
    /// holders remap through; callers must feed it to their annotation
    /// store before reading decoration addresses again.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let (mapping, changed) = crate::editing::commands::apply_to(self, &cmd);

        let new_selection = {
            use crate::editing::mapping::Bias;
            let start = mapping.map(self.selection.start, Bias::After);
            let end = mapping.map(self.selection.end, Bias::After);
            start..end
        };
        self.set_selection(new_selection);
        self.version += 1;

        Patch {
            mapping,
            changed,
            new_selection: self.selection.clone(),
            version: self.version,
        }
    }

    // ---- internal tree surgery, used by the command layer ----

    /// Resolve an address to a position in the text content, clamping
    /// structural and out-of-range addresses to the nearest text position.
    pub(crate) fn locate(&self, addr: usize) -> TextPos {
        // Content of the first block starts at address 1.
        let mut a = 1;
        for (bi, block) in self.blocks.iter().enumerate() {
            // At or before this block's opening unit: snap to content start.
            if addr < a {
                return TextPos {
                    block: bi,
                    run: 0,
                    offset: 0,
                };
            }
            for (ri, run) in block.runs.iter().enumerate() {
                let run_end = a + run.text.len();
                if addr <= run_end {
                    return TextPos {
                        block: bi,
                        run: ri,
                        offset: floor_char_boundary(&run.text, addr - a),
                    };
                }
                a = run_end;
            }
            // At this block's closing unit: snap to content end.
            if addr <= a {
                return self.block_end_pos(bi);
            }
            // Skip the closing unit and the next block's opening unit.
            a += 2;
        }
        self.block_end_pos(self.blocks.len().saturating_sub(1))
    }

    fn block_end_pos(&self, block: usize) -> TextPos {
        let b = &self.blocks[block];
        match b.runs.len() {
            0 => TextPos {
                block,
                run: 0,
                offset: 0,
            },
            n => TextPos {
                block,
                run: n - 1,
                offset: b.runs[n - 1].text.len(),
            },
        }
    }

    /// Address of a resolved text position.
    pub(crate) fn addr_of(&self, pos: TextPos) -> usize {
        let mut a = 0;
        for (bi, block) in self.blocks.iter().enumerate() {
            a += 1; // opening unit
            if bi == pos.block {
                for (ri, run) in block.runs.iter().enumerate() {
                    if ri == pos.run {
                        return a + pos.offset.min(run.text.len());
                    }
                    a += run.text.len();
                }
                // Empty block, or run index at the end.
                return a;
            }
            a += block.text_len();
            a += 1; // closing unit
        }
        self.end_address()
    }

    /// Clamp an arbitrary address to a valid, char-boundary text position
    /// (or the document end) and return its canonical address.
    pub(crate) fn resolve_addr(&self, addr: usize) -> usize {
        if addr >= self.end_address() {
            return self.addr_of(self.block_end_pos(self.blocks.len() - 1));
        }
        self.addr_of(self.locate(addr))
    }

    /// Insert plain text at a resolved address. Newlines split blocks.
    pub(crate) fn insert_text_at(&mut self, at: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = self.locate(at);
        let block = &mut self.blocks[pos.block];
        if block.runs.is_empty() {
            block.runs.push(TextRun::new(""));
        }

        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or("");
        block.runs[pos.run].text.insert_str(pos.offset, first);

        let rest: Vec<&str> = segments.collect();
        if !rest.is_empty() {
            let split_at = pos.offset + first.len();
            let tail = split_off_runs(&mut self.blocks[pos.block], pos.run, split_at);

            let mut new_blocks = Vec::with_capacity(rest.len());
            for (i, seg) in rest.iter().enumerate() {
                let mut b = Block::from_text(*seg);
                if i == rest.len() - 1 {
                    b.runs.extend(tail.iter().cloned());
                }
                new_blocks.push(b);
            }
            let insert_at = pos.block + 1;
            self.blocks.splice(insert_at..insert_at, new_blocks);
        }
        self.normalize();
    }

    /// Delete a resolved address range. Ranges spanning block boundaries
    /// merge the first and last affected blocks.
    pub(crate) fn delete_range_at(&mut self, range: std::ops::Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let from = self.locate(range.start);
        let to = self.locate(range.end);

        if from.block == to.block {
            let block = &mut self.blocks[from.block];
            if block.runs.is_empty() {
                return;
            }
            if from.run == to.run {
                block.runs[from.run].text.replace_range(from.offset..to.offset, "");
            } else {
                block.runs[from.run].text.truncate(from.offset);
                block.runs[to.run].text.replace_range(..to.offset, "");
                block.runs.drain(from.run + 1..to.run);
            }
        } else {
            let mut tail = {
                let to_block = &mut self.blocks[to.block];
                let mut tail = to_block.runs.split_off(to.run.min(to_block.runs.len()));
                if let Some(first) = tail.first_mut() {
                    first.text.replace_range(..to.offset.min(first.text.len()), "");
                }
                tail
            };
            let from_block = &mut self.blocks[from.block];
            from_block.runs.truncate(from.run + 1);
            if let Some(last) = from_block.runs.last_mut() {
                last.text.truncate(from.offset);
            }
            from_block.runs.append(&mut tail);
            self.blocks.drain(from.block + 1..=to.block);
        }
        self.normalize();
    }

    /// Split the block containing the resolved address into two.
    pub(crate) fn split_block_at(&mut self, at: usize) {
        let pos = self.locate(at);
        let tail = if self.blocks[pos.block].runs.is_empty() {
            Vec::new()
        } else {
            split_off_runs(&mut self.blocks[pos.block], pos.run, pos.offset)
        };
        self.blocks.insert(pos.block + 1, Block { runs: tail });
        self.normalize();
    }

    /// Replace the whole document content.
    pub(crate) fn set_content(&mut self, text: &str) {
        self.blocks = blocks_from_plain_text(text);
    }

    /// Drop empty runs and guarantee at least one block.
    fn normalize(&mut self) {
        for block in &mut self.blocks {
            block.runs.retain(|r| !r.text.is_empty());
        }
        if self.blocks.is_empty() {
            self.blocks.push(Block::default());
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::from_plain_text("")
    }
}

fn blocks_from_plain_text(text: &str) -> Vec<Block> {
    if text.is_empty() {
        return vec![Block::default()];
    }
    text.split('\n').map(Block::from_text).collect()
}

/// Split a block's run list at (run, offset), removing and returning the
/// tail runs.
fn split_off_runs(block: &mut Block, run: usize, offset: usize) -> Vec<TextRun> {
    if block.runs.is_empty() {
        return Vec::new();
    }
    let run = run.min(block.runs.len() - 1);
    let mut tail: Vec<TextRun> = block.runs.split_off(run + 1);
    let r = &mut block.runs[run];
    let offset = floor_char_boundary(&r.text, offset.min(r.text.len()));
    let rest = r.text.split_off(offset);
    if !rest.is_empty() {
        tail.insert(0, TextRun::new(rest));
    }
    tail
}

/// Largest UTF-8 boundary at or below `idx`.
pub(crate) fn floor_char_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
