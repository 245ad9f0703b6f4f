use std::{cmp::Ordering, fmt, ops::Range, rc::Rc};

use linefold_ucd::LineBreakClass;

use crate::{
    config::Config,
    error::{Error, Result},
    segment,
};

bitflags::bitflags! {
    /// Explicit break decision before a cluster. Both set at once is invalid.
    #[derive(Default)]
    pub struct ClusterFlags: u8 {
        const PROHIBIT_BEFORE = 0b00000001;
        const BREAK_BEFORE    = 0b00000010;
    }
}

/// A grapheme cluster inside a [`GcString`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    /// Offset of the first code point
    pub start: usize,
    /// Length in code points
    pub len: usize,
    /// Display columns
    pub cols: usize,
    /// Effective line breaking class
    pub lbc: LineBreakClass,
    flags: ClusterFlags,
}

impl Cluster {
    pub(crate) fn new(start: usize, len: usize, cols: usize, lbc: LineBreakClass) -> Cluster {
        Cluster {
            start,
            len,
            cols,
            lbc,
            flags: ClusterFlags::empty(),
        }
    }

    pub fn flags(&self) -> ClusterFlags {
        self.flags
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub(crate) fn set_flags(&mut self, flags: ClusterFlags) {
        debug_assert!(flags != ClusterFlags::all(), "both break and prohibit set");
        self.flags = flags;
    }
}

/// Grapheme cluster string. Owns the code points and their segmentation,
/// and carries a cursor used when iterating clusters.
#[derive(Debug, Clone)]
pub struct GcString {
    text: Vec<char>,
    clusters: Vec<Cluster>,
    pos: usize,
    config: Rc<Config>,
}

impl GcString {
    pub fn new(text: Vec<char>, config: Rc<Config>) -> GcString {
        segment::segment(&config, text)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, config: Rc<Config>) -> GcString {
        GcString::new(text.chars().collect(), config)
    }

    pub fn empty(config: Rc<Config>) -> GcString {
        GcString {
            text: Vec::new(),
            clusters: Vec::new(),
            pos: 0,
            config,
        }
    }

    pub(crate) fn from_parts(text: Vec<char>, clusters: Vec<Cluster>, config: Rc<Config>) -> GcString {
        GcString {
            text,
            clusters,
            pos: 0,
            config,
        }
    }

    pub fn config(&self) -> &Rc<Config> {
        &self.config
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of code points
    pub fn char_len(&self) -> usize {
        self.text.len()
    }

    pub fn as_chars(&self) -> &[char] {
        &self.text
    }

    pub fn into_chars(self) -> Vec<char> {
        self.text
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub(crate) fn clusters_mut(&mut self) -> &mut [Cluster] {
        &mut self.clusters
    }

    pub fn cluster(&self, idx: usize) -> Option<&Cluster> {
        self.clusters.get(idx)
    }

    /// Code points of a cluster
    pub fn cluster_chars(&self, idx: usize) -> &[char] {
        match self.clusters.get(idx) {
            Some(cluster) => &self.text[cluster.start..cluster.end()],
            None => &[],
        }
    }

    /// Code points from cluster `idx` to the end
    pub fn chars_from(&self, idx: usize) -> &[char] {
        match self.clusters.get(idx) {
            Some(cluster) => &self.text[cluster.start..],
            None => &[],
        }
    }

    /// Number of code points in a cluster range, clamped to the string
    pub(crate) fn char_span(&self, range: Range<usize>) -> usize {
        let end = range.end.min(self.clusters.len());
        let start = range.start.min(end);
        self.clusters[start..end].iter().map(|c| c.len).sum()
    }

    pub fn lbclass(&self, idx: usize) -> Option<LineBreakClass> {
        self.clusters.get(idx).map(|c| c.lbc)
    }

    pub fn set_flags(&mut self, idx: usize, flags: ClusterFlags) -> Result<()> {
        if flags.contains(ClusterFlags::all()) {
            return Err(Error::ConflictingFlags { idx });
        }

        let len = self.clusters.len();
        let cluster = self.clusters.get_mut(idx).ok_or(Error::OutOfRange {
            offset: idx as isize,
            len,
        })?;
        cluster.set_flags(flags);
        Ok(())
    }

    /// Total display columns
    pub fn columns(&self) -> usize {
        self.clusters.iter().map(|c| c.cols).sum()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor, negative positions count from the end
    pub fn set_pos(&mut self, pos: isize) -> Result<()> {
        let len = self.clusters.len() as isize;
        let resolved = if pos < 0 { pos + len } else { pos };
        if resolved < 0 || resolved > len {
            return Err(Error::OutOfRange {
                offset: pos,
                len: self.clusters.len(),
            });
        }

        self.pos = resolved as usize;
        Ok(())
    }

    pub fn eos(&self) -> bool {
        self.pos >= self.clusters.len()
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Class of the cluster under the cursor
    pub fn peek_class(&self) -> Option<LineBreakClass> {
        self.lbclass(self.pos)
    }

    /// Return the cluster under the cursor and advance
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Cluster> {
        let cluster = self.clusters.get(self.pos)?;
        self.pos += 1;
        Some(cluster)
    }

    /// Copy of a cluster range, clamped to the string
    pub fn slice(&self, range: Range<usize>) -> GcString {
        let end = range.end.min(self.clusters.len());
        let start = range.start.min(end);
        if start == end {
            return GcString::empty(self.config.clone());
        }

        let offset = self.clusters[start].start;
        let text_end = self.clusters[end - 1].end();
        let clusters = self.clusters[start..end]
            .iter()
            .map(|c| Cluster {
                start: c.start - offset,
                ..*c
            })
            .collect();

        GcString::from_parts(
            self.text[offset..text_end].to_vec(),
            clusters,
            self.config.clone(),
        )
    }

    /// Substring of `length` clusters at `offset`. Negative offsets and
    /// lengths count from the end, `None` takes the rest of the string.
    pub fn substr(&self, offset: isize, length: Option<isize>) -> Result<GcString> {
        let range = self.resolve_range(offset, length)?;
        Ok(self.slice(range))
    }

    /// Replace a substring, returns the removed part
    pub fn replace(
        &mut self,
        offset: isize,
        length: Option<isize>,
        replacement: &GcString,
    ) -> Result<GcString> {
        let range = self.resolve_range(offset, length)?;
        self.splice(range, replacement)
    }

    /// Remove a cluster range and insert `replacement` in its place,
    /// returns the removed clusters
    pub fn splice(&mut self, range: Range<usize>, replacement: &GcString) -> Result<GcString> {
        let len = self.clusters.len();
        if range.end > len {
            return Err(Error::OutOfRange {
                offset: range.end as isize,
                len,
            });
        }
        if range.start > range.end {
            return Err(Error::InvalidLength {
                offset: range.start,
                length: range.end as isize - range.start as isize,
            });
        }

        let removed = self.slice(range.clone());
        let tail = self.slice(range.end..self.clusters.len());

        self.truncate(range.start);
        self.append(replacement)?;
        self.append(&tail)?;
        self.pos = self.pos.min(self.clusters.len());

        Ok(removed)
    }

    /// Keep the first `length` clusters, negative counts from the end
    pub fn shrink(&mut self, length: isize) {
        let len = self.clusters.len() as isize;
        let length = if length < 0 { length + len } else { length };
        self.truncate(length.max(0) as usize);
    }

    fn truncate(&mut self, length: usize) {
        if let Some(cluster) = self.clusters.get(length) {
            self.text.truncate(cluster.start);
            self.clusters.truncate(length);
            self.pos = self.pos.min(length);
        }
    }

    /// Append another string. The clusters at the junction are segmented
    /// again and may merge.
    pub fn append(&mut self, other: &GcString) -> Result<()> {
        if other.is_empty() {
            return Ok(());
        }

        self.text.try_reserve(other.text.len())?;
        self.clusters.try_reserve(other.clusters.len())?;

        let offset = self.text.len();
        let last = match self.clusters.last() {
            Some(last) => *last,
            None => {
                self.text.extend_from_slice(&other.text);
                self.clusters.extend_from_slice(&other.clusters);
                return Ok(());
            }
        };
        let first = other.clusters[0];
        self.text.extend_from_slice(&other.text);

        let junction = segment::clusters(&self.config, &self.text[last.start..offset + first.len]);
        let merged = !junction
            .iter()
            .any(|c| c.start + last.start == offset);

        if merged {
            self.clusters.pop();
            for mut cluster in junction {
                cluster.start += last.start;
                if cluster.start == last.start {
                    cluster.flags = last.flags;
                }
                self.clusters.push(cluster);
            }
        } else {
            self.clusters.push(Cluster {
                start: offset,
                ..first
            });
        }

        self.clusters.extend(other.clusters[1..].iter().map(|c| Cluster {
            start: c.start + offset,
            ..*c
        }));

        Ok(())
    }

    pub fn concat(&self, other: &GcString) -> Result<GcString> {
        let mut result = self.clone();
        result.append(other)?;
        result.pos = 0;
        Ok(result)
    }

    /// Merge every space directly followed by a combining mark into one
    /// ideographic unit
    pub fn collapse_legacy_cm(&mut self) {
        let mut i = 1;
        while i < self.clusters.len() {
            let prev = self.clusters[i - 1];
            let cur = self.clusters[i];
            if prev.lbc == LineBreakClass::SP && cur.lbc == LineBreakClass::CM {
                let unit = &mut self.clusters[i - 1];
                unit.len += cur.len;
                unit.cols += cur.cols;
                unit.lbc = LineBreakClass::ID;
                self.clusters.remove(i);
            } else {
                i += 1;
            }
        }
        self.pos = self.pos.min(self.clusters.len());
    }

    fn resolve_range(&self, offset: isize, length: Option<isize>) -> Result<Range<usize>> {
        let len = self.clusters.len() as isize;
        let start = if offset < 0 { offset + len } else { offset };
        if start < 0 || start > len {
            return Err(Error::OutOfRange {
                offset,
                len: self.clusters.len(),
            });
        }

        let count = match length {
            None => len - start,
            Some(length) if length < 0 => length + len - start,
            Some(length) => length,
        };
        if count < 0 {
            return Err(Error::InvalidLength {
                offset: start as usize,
                length: length.unwrap_or(0),
            });
        }

        let end = (start + count).min(len);
        Ok(start as usize..end as usize)
    }
}

impl PartialEq for GcString {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for GcString {}

impl PartialOrd for GcString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GcString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for GcString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.text {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}
