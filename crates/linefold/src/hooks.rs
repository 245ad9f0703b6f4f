//! Pluggable strategies used by the line breaking engine and their
//! defaults. A hook returning `None` defers to the default.

use serde::Deserialize;

use linefold_ucd::LineBreakClass;

use crate::{
    config::Config,
    gcstring::{ClusterFlags, GcString},
};

/// Where in the text a fragment passed to a [`Format`] hook is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatPhase {
    /// First fragment of the text
    StartOfText,
    /// First fragment after a mandatory break
    StartOfParagraph,
    /// First fragment after a line was broken by width
    StartOfLine,
    /// Contents of a finished line
    Line,
    /// Trailing spaces of a line broken by width
    EndOfLine,
    /// Trailing spaces and the mandatory break sequence
    EndOfParagraph,
    /// Trailing spaces at the end of the text
    EndOfText,
}

/// Rewrite the text before it is segmented. Must give the same result when
/// applied again to its own output, unread input is preprocessed again on
/// the next call.
pub trait Preprocess {
    fn preprocess(&self, text: &[char]) -> Option<Vec<char>>;
}

pub trait Format {
    fn format(&self, phase: FormatPhase, fragment: &GcString) -> Option<GcString>;
}

/// Measure a line. With `max == 0` returns the columns of `frag` appended to
/// a line of `cols` columns, `pre` and `spc`. With `max > 0` returns how many
/// leading clusters of `frag` fit within `max` columns. Negative results
/// defer to the default.
pub trait Sizing {
    fn size(&self, cols: f64, pre: &GcString, spc: &GcString, frag: &GcString, max: f64)
        -> Option<f64>;
}

/// Break a fragment that does not fit a line. The result carries
/// `BREAK_BEFORE` flags where it may be cut.
pub trait Urgent {
    fn urgent(&self, cols: f64, pre: &GcString, spc: &GcString, frag: &GcString)
        -> Option<GcString>;
}

impl<F> Preprocess for F
where
    F: Fn(&[char]) -> Option<Vec<char>>,
{
    fn preprocess(&self, text: &[char]) -> Option<Vec<char>> {
        self(text)
    }
}

impl<F> Format for F
where
    F: Fn(FormatPhase, &GcString) -> Option<GcString>,
{
    fn format(&self, phase: FormatPhase, fragment: &GcString) -> Option<GcString> {
        self(phase, fragment)
    }
}

impl<F> Sizing for F
where
    F: Fn(f64, &GcString, &GcString, &GcString, f64) -> Option<f64>,
{
    fn size(
        &self,
        cols: f64,
        pre: &GcString,
        spc: &GcString,
        frag: &GcString,
        max: f64,
    ) -> Option<f64> {
        self(cols, pre, spc, frag, max)
    }
}

impl<F> Urgent for F
where
    F: Fn(f64, &GcString, &GcString, &GcString) -> Option<GcString>,
{
    fn urgent(
        &self,
        cols: f64,
        pre: &GcString,
        spc: &GcString,
        frag: &GcString,
    ) -> Option<GcString> {
        self(cols, pre, spc, frag)
    }
}

/// Built in formatting strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinFormat {
    /// Replace trailing spaces of a broken line with the newline
    #[default]
    Default,
    /// Append the newline after trailing spaces of a broken line
    Simple,
    /// Drop trailing spaces everywhere, newline at broken lines
    Trim,
    /// Every line end becomes the newline, trailing spaces dropped
    Newline,
}

impl Format for BuiltinFormat {
    fn format(&self, phase: FormatPhase, fragment: &GcString) -> Option<GcString> {
        let config = fragment.config();
        let newline = || GcString::new(config.newline.clone(), config.clone());

        match (self, phase) {
            (BuiltinFormat::Default, FormatPhase::EndOfLine) => Some(newline()),
            (BuiltinFormat::Simple, FormatPhase::EndOfLine) => {
                let mut chars = fragment.as_chars().to_vec();
                chars.extend_from_slice(&config.newline);
                Some(GcString::new(chars, config.clone()))
            }
            (BuiltinFormat::Trim | BuiltinFormat::Newline, FormatPhase::EndOfLine) => {
                Some(newline())
            }
            (BuiltinFormat::Trim, FormatPhase::EndOfParagraph | FormatPhase::EndOfText) => {
                Some(without_spaces(fragment))
            }
            (BuiltinFormat::Newline, FormatPhase::EndOfParagraph) => Some(newline()),
            (BuiltinFormat::Newline, FormatPhase::EndOfText) => {
                let broken = fragment
                    .clusters()
                    .iter()
                    .any(|c| c.lbc.is_mandatory());
                if broken {
                    Some(newline())
                } else {
                    Some(GcString::empty(config.clone()))
                }
            }
            _ => None,
        }
    }
}

fn without_spaces(fragment: &GcString) -> GcString {
    let chars = fragment
        .clusters()
        .iter()
        .enumerate()
        .filter(|(_, cluster)| cluster.lbc != LineBreakClass::SP)
        .flat_map(|(i, _)| fragment.cluster_chars(i).iter().copied())
        .collect();
    GcString::new(chars, fragment.config().clone())
}

/// Default sizing: columns of spaces and fragment added to `cols`, or the
/// number of leading clusters of `frag` that fit when `max > 0`.
pub fn strsize(cols: f64, _pre: &GcString, spc: &GcString, frag: &GcString, max: f64) -> f64 {
    if max <= 0.0 {
        return cols + (spc.columns() + frag.columns()) as f64;
    }

    let mut cols = cols + spc.columns() as f64;
    for (i, cluster) in frag.clusters().iter().enumerate() {
        cols += cluster.cols as f64;
        if max < cols {
            return i as f64;
        }
    }
    frag.len() as f64
}

/// Urgent breaking that cuts a fragment wherever it would overflow `colmax`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForceUrgent;

impl Urgent for ForceUrgent {
    fn urgent(
        &self,
        cols: f64,
        pre: &GcString,
        spc: &GcString,
        frag: &GcString,
    ) -> Option<GcString> {
        let config = frag.config().clone();
        if config.colmax <= 0.0 {
            return None;
        }

        let empty = GcString::empty(config.clone());
        let mut broken = frag.clone();
        let mut cols = cols;
        let mut pre = pre.clone();
        let mut spc = spc.clone();
        let mut start = 0;

        while start < frag.len() {
            let rest = frag.slice(start..frag.len());
            let fit = sizing(&config, cols, &pre, &spc, &rest, config.colmax);
            let fit = (fit.max(0.0) as usize).min(rest.len());

            let line_empty = cols <= 0.0 && pre.is_empty() && spc.is_empty();
            if fit == 0 && !line_empty {
                // Continue on an empty line
                cols = 0.0;
                pre = empty.clone();
                spc = empty.clone();
                continue;
            }

            let end = start + fit.max(1);
            if end < frag.len() {
                broken.clusters_mut()[end].set_flags(ClusterFlags::BREAK_BEFORE);
            }

            start = end;
            cols = 0.0;
            pre = empty.clone();
            spc = empty.clone();
        }

        Some(broken)
    }
}

pub(crate) fn preprocess(config: &Config, text: Vec<char>) -> Vec<char> {
    config
        .preprocess
        .as_ref()
        .and_then(|hook| hook.preprocess(&text))
        .unwrap_or(text)
}

/// Format with the configured hook, falling back to [`BuiltinFormat::Default`]
pub(crate) fn format(config: &Config, phase: FormatPhase, fragment: &GcString) -> Option<GcString> {
    match &config.format {
        Some(hook) => hook
            .format(phase, fragment)
            .or_else(|| BuiltinFormat::Default.format(phase, fragment)),
        None => BuiltinFormat::Default.format(phase, fragment),
    }
}

pub(crate) fn sizing(
    config: &Config,
    cols: f64,
    pre: &GcString,
    spc: &GcString,
    frag: &GcString,
    max: f64,
) -> f64 {
    config
        .sizing
        .as_ref()
        .and_then(|hook| hook.size(cols, pre, spc, frag, max))
        .filter(|size| *size >= 0.0)
        .unwrap_or_else(|| strsize(cols, pre, spc, frag, max))
}

pub(crate) fn urgent(
    config: &Config,
    cols: f64,
    pre: &GcString,
    spc: &GcString,
    frag: &GcString,
) -> GcString {
    config
        .urgent
        .as_ref()
        .and_then(|hook| hook.urgent(cols, pre, spc, frag))
        .unwrap_or_else(|| frag.clone())
}
