use rustc_hash::FxHashSet;

use linefold_ucd::{LineBreakClass, Script};

use crate::gcstring::{ClusterFlags, GcString};

/// Word segmentation for scripts that do not separate words
pub trait ComplexBreaker {
    fn supports(&self, script: Script) -> bool;

    /// Word boundaries in one run of complex context characters, as
    /// increasing code point offsets into `run`
    fn boundaries(&self, run: &[char]) -> Vec<usize>;
}

/// Flag complex context clusters as break or prohibit before according to
/// the configured [`ComplexBreaker`]. Does nothing without one. Runs are the
/// clusters resolved as `SA` under the string's configuration. The first
/// cluster of a run is left to the pair table.
pub fn annotate(gcstr: &mut GcString) {
    let breaker = match gcstr.config().complex.clone() {
        Some(breaker) => breaker,
        None => return,
    };

    let text = gcstr.as_chars();
    let clusters = gcstr.clusters();
    let mut updates = Vec::new();
    let mut i = 0;

    while i < clusters.len() {
        if clusters[i].lbc != LineBreakClass::SA {
            i += 1;
            continue;
        }

        let first = i;
        while i < clusters.len() && clusters[i].lbc == LineBreakClass::SA {
            i += 1;
        }

        let offset = clusters[first].start;
        let mut bounds = breaker.boundaries(&text[offset..clusters[i - 1].end()]);
        bounds.sort_unstable();

        for (idx, cluster) in clusters.iter().enumerate().take(i).skip(first + 1) {
            if !cluster.flags().is_empty() {
                continue;
            }
            let flags = if bounds.binary_search(&(cluster.start - offset)).is_ok() {
                ClusterFlags::BREAK_BEFORE
            } else {
                ClusterFlags::PROHIBIT_BEFORE
            };
            updates.push((idx, flags));
        }
    }

    let clusters = gcstr.clusters_mut();
    for (idx, flags) in updates {
        clusters[idx].set_flags(flags);
    }
}

/// Dictionary word breaker using longest match. A run is split into known
/// words, unknown stretches are kept together until the next known word.
#[derive(Debug, Clone)]
pub struct WordListBreaker {
    scripts: Vec<Script>,
    words: FxHashSet<Vec<char>>,
    longest: usize,
}

impl WordListBreaker {
    pub fn new<I, S>(words: I) -> WordListBreaker
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: FxHashSet<Vec<char>> = words
            .into_iter()
            .map(|word| word.as_ref().chars().collect::<Vec<char>>())
            .filter(|word| !word.is_empty())
            .collect();
        let longest = words.iter().map(|word| word.len()).max().unwrap_or(0);

        WordListBreaker {
            scripts: vec![Script::Thai],
            words,
            longest,
        }
    }

    pub fn with_scripts(mut self, scripts: &[Script]) -> WordListBreaker {
        self.scripts = scripts.to_vec();
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn longest_match(&self, text: &[char]) -> Option<usize> {
        let max = self.longest.min(text.len());
        (1..=max).rev().find(|len| self.words.contains(&text[..*len]))
    }
}

impl ComplexBreaker for WordListBreaker {
    fn supports(&self, script: Script) -> bool {
        self.scripts.contains(&script)
    }

    fn boundaries(&self, run: &[char]) -> Vec<usize> {
        let mut bounds = Vec::new();
        let mut i = 0;

        while i < run.len() {
            bounds.push(i);
            match self.longest_match(&run[i..]) {
                Some(len) => i += len,
                None => {
                    i += 1;
                    while i < run.len() && self.longest_match(&run[i..]).is_none() {
                        i += 1;
                    }
                }
            }
        }

        bounds
    }
}
