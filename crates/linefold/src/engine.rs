//! Streaming line breaking. Input is fed in chunks, every call returns the
//! part of the output that is already decided and keeps the rest in a
//! [`StreamState`]. Breaking a text in one call or in any number of chunks
//! gives the same output.

use std::{mem, rc::Rc};

use serde::{Deserialize, Serialize};

use linefold_ucd::LineBreakClass::{self, *};

use crate::{
    complex,
    config::{BreakOptions, Config},
    error::Result,
    gcstring::{ClusterFlags, GcString},
    hooks::{self, FormatPhase},
    rules::{self, Action},
    segment,
};

#[cfg(test)]
mod test;

/// Position of a stream relative to formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing emitted yet
    #[default]
    None,
    StartOfTextFormatted,
    /// A mandatory break was emitted
    StartOfParagraph,
    StartOfParagraphFormatted,
    InParagraph,
}

impl Phase {
    /// Formatting to apply before the first fragment of this phase
    fn entry(&self) -> Option<FormatPhase> {
        match self {
            Phase::None => Some(FormatPhase::StartOfText),
            Phase::StartOfParagraph => Some(FormatPhase::StartOfParagraph),
            _ => None,
        }
    }

    fn formatted(self) -> Phase {
        match self {
            Phase::None => Phase::StartOfTextFormatted,
            Phase::StartOfParagraph => Phase::StartOfParagraphFormatted,
            phase => phase,
        }
    }
}

/// Stream cursor carried between calls of [`break_partial`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamState {
    pub phase: Phase,
    /// Buffered line that may still grow
    pub bufstr: Vec<char>,
    /// Trailing spaces of the buffered line
    pub bufspc: Vec<char>,
    /// Columns of the buffered line without its trailing spaces
    pub bufcols: f64,
    /// Input that is not decided yet
    pub unread: Vec<char>,
}

impl StreamState {
    pub fn is_empty(&self) -> bool {
        self == &StreamState::default()
    }
}

/// Break the next chunk of a stream. `None` marks the end of input, after
/// which the state is reset and can start a new stream.
pub fn break_partial(
    config: &Rc<Config>,
    state: &mut StreamState,
    input: Option<&[char]>,
) -> Result<Vec<char>> {
    let pass = Pass::new(config, state, input)?;
    log::trace!(
        "break_partial: {} clusters, eot: {}, phase: {:?}",
        pass.text.len(),
        pass.eot,
        pass.phase
    );
    pass.run(state)
}

/// Break a whole text
pub fn break_all(config: &Rc<Config>, text: &[char]) -> Result<Vec<char>> {
    let mut state = StreamState::default();
    let mut output = break_partial(config, &mut state, Some(text))?;
    let rest = break_partial(config, &mut state, None)?;
    output.try_reserve(rest.len())?;
    output.extend(rest);
    Ok(output)
}

/// Forget a stream in progress
pub fn reset(state: &mut StreamState) {
    *state = StreamState::default();
}

/// A configuration together with one stream
#[derive(Debug)]
pub struct LineBreaker {
    config: Rc<Config>,
    state: StreamState,
}

impl LineBreaker {
    pub fn new(config: Config) -> LineBreaker {
        LineBreaker::with_config(Rc::new(config))
    }

    pub fn with_config(config: Rc<Config>) -> LineBreaker {
        LineBreaker {
            config,
            state: StreamState::default(),
        }
    }

    pub fn config(&self) -> &Rc<Config> {
        &self.config
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn break_partial(&mut self, input: &str) -> Result<String> {
        let input: Vec<char> = input.chars().collect();
        let output = break_partial(&self.config, &mut self.state, Some(input.as_slice()))?;
        Ok(output.into_iter().collect())
    }

    /// End the stream and return the rest of the output
    pub fn finish(&mut self) -> Result<String> {
        let output = break_partial(&self.config, &mut self.state, None)?;
        Ok(output.into_iter().collect())
    }

    /// Break a whole text, discarding any stream in progress
    pub fn break_all(&mut self, input: &str) -> Result<String> {
        self.reset();
        let mut output = self.break_partial(input)?;
        output.push_str(&self.finish()?);
        Ok(output)
    }

    pub fn reset(&mut self) {
        reset(&mut self.state);
    }
}

impl Clone for LineBreaker {
    fn clone(&self) -> Self {
        LineBreaker::new(self.config.as_ref().clone())
    }
}

enum Step {
    /// A break opportunity between the run and the next cluster
    Pair,
    /// The run ends in a mandatory break
    Mandatory,
    /// Out of decided input
    Suspend,
    EndOfText,
}

enum Flow {
    Done,
    /// Text was replaced and is scanned again from the run start
    Restart,
}

/// One call of [`break_partial`]
struct Pass<'a> {
    config: &'a Rc<Config>,
    text: GcString,
    eot: bool,
    /// Clusters at or after this index are not final yet
    limit: usize,

    phase: Phase,
    line: GcString,
    spaces: GcString,
    cols: f64,
    output: Vec<char>,

    /// First cluster of the unbreakable run
    start: usize,
    /// Clusters in the run
    len: usize,
    /// Spaces and break characters after the run
    spc: usize,
    /// Base cluster of the last unit of the run
    base: usize,
    /// Cluster after the spaces
    after: usize,
    /// Clusters before this were already broken urgently
    urgent_end: usize,
    /// Stream before the first urgent rewrite of a run not yet emitted
    checkpoint: Option<Checkpoint>,
}

/// Stream as it was before an urgent hook rewrote the text. Suspending
/// before the rewritten run is emitted goes back here, so the hook runs
/// again on the original text together with the next chunk.
struct Checkpoint {
    unread: Vec<char>,
    phase: Phase,
    line: GcString,
    spaces: GcString,
    cols: f64,
    output: usize,
}

impl<'a> Pass<'a> {
    fn new(config: &'a Rc<Config>, state: &mut StreamState, input: Option<&[char]>) -> Result<Pass<'a>> {
        let eot = input.is_none();
        let input = input.unwrap_or_default();

        let mut chars = Vec::new();
        chars.try_reserve(state.unread.len() + input.len())?;
        chars.extend_from_slice(&state.unread);
        chars.extend_from_slice(input);
        state.unread.clear();

        let chars = hooks::preprocess(config, chars);
        let mut text = segment::segment(config, chars);
        if config.has(BreakOptions::LEGACY_CM) {
            text.collapse_legacy_cm();
        }
        complex::annotate(&mut text);
        let limit = final_clusters(config, &text, eot);

        Ok(Pass {
            config,
            text,
            eot,
            limit,
            phase: state.phase,
            line: restore(config, &state.bufstr),
            spaces: restore(config, &state.bufspc),
            cols: state.bufcols,
            output: Vec::new(),
            start: 0,
            len: 0,
            spc: 0,
            base: 0,
            after: 0,
            urgent_end: 0,
            checkpoint: None,
        })
    }

    fn run(mut self, state: &mut StreamState) -> Result<Vec<char>> {
        loop {
            match self.scan() {
                Step::Suspend => {
                    self.suspend(state);
                    break;
                }
                Step::EndOfText => {
                    if let Flow::Restart = self.emit(false)? {
                        continue;
                    }
                    self.finish()?;
                    reset(state);
                    break;
                }
                Step::Mandatory => {
                    self.emit(true)?;
                }
                Step::Pair => self.decide()?,
            }
        }

        Ok(self.output)
    }

    /// Consume clusters until a break opportunity after the run
    fn scan(&mut self) -> Step {
        while let Some(cluster) = self.text.cluster(self.text.pos()).copied() {
            let idx = self.text.pos();
            self.text.next();

            match cluster.lbc {
                SP => self.spc += 1,
                BK | CR | LF | NL => {
                    self.spc += 1;
                    // LF may follow in the next chunk
                    if cluster.lbc == CR && cluster.len == 1 && self.text.eos() && !self.eot {
                        return Step::Suspend;
                    }
                    return Step::Mandatory;
                }
                ZW => {
                    self.len += self.spc + 1;
                    self.spc = 0;
                    self.base = idx;
                }
                _ => {
                    self.skip_marks();
                    if !self.eot && self.text.pos() >= self.limit {
                        return Step::Suspend;
                    }

                    if self.len == 0 && self.spc == 0 {
                        self.len = self.text.pos() - self.start;
                        self.base = idx;
                        continue;
                    }

                    self.after = idx;
                    return Step::Pair;
                }
            }
        }

        if self.eot {
            Step::EndOfText
        } else {
            Step::Suspend
        }
    }

    fn skip_marks(&mut self) {
        while matches!(self.text.peek_class(), Some(CM | ZWJ)) {
            self.text.next();
        }
    }

    fn decide(&mut self) -> Result<()> {
        match self.action() {
            Action::Mandatory => {
                self.emit(true)?;
            }
            Action::Direct => {
                self.emit(false)?;
            }
            Action::Indirect if self.spc > 0 => {
                self.emit(false)?;
            }
            Action::Indirect | Action::Prohibited => self.absorb()?,
        }
        Ok(())
    }

    /// Action between the run and the cluster after the spaces
    fn action(&self) -> Action {
        if self.len == 0 {
            return Action::Prohibited;
        }

        let after = match self.text.cluster(self.after) {
            Some(cluster) => *cluster,
            None => return Action::Direct,
        };
        if after.flags().contains(ClusterFlags::BREAK_BEFORE) {
            return Action::Direct;
        }

        if self.spc == 0 {
            if after.flags().contains(ClusterFlags::PROHIBIT_BEFORE) {
                return Action::Prohibited;
            }
            // LB8a
            let last = self.text.cluster_chars(self.start + self.len - 1).last();
            if last == Some(&'\u{200D}') {
                return Action::Prohibited;
            }
        }

        let before = self.effective(self.text.lbclass(self.base).unwrap_or(AL));
        let after = self.effective(after.lbc);

        // LB11
        if after == WJ {
            return Action::Prohibited;
        }
        // LB11, LB12
        if self.spc == 0 && matches!(before, WJ | GL) {
            return Action::Prohibited;
        }

        rules::lookup(before, after)
    }

    fn effective(&self, lbc: LineBreakClass) -> LineBreakClass {
        match lbc {
            CM | ZWJ | SA => AL,
            lbc if lbc.is_hangul() && self.config.has(BreakOptions::HANGUL_AS_AL) => AL,
            lbc => lbc,
        }
    }

    /// Extend the run over the spaces and the next cluster
    fn absorb(&mut self) -> Result<()> {
        let pos = self.text.pos();
        let charmax = self.config.charmax;

        if charmax > 0 && pos > self.urgent_end && self.text.char_span(self.start..pos) > charmax {
            let frag = self.text.slice(self.start..pos);
            let empty = GcString::empty(self.config.clone());
            let broken = self.urgent_break(0.0, &empty, &empty, &frag);
            self.checkpoint();
            log::debug!(
                "run of {} code points exceeds {charmax}, breaking urgently",
                frag.char_len()
            );

            self.restart(pos - self.start, &broken)?;
            self.urgent_end = self.start + broken.len();
            return Ok(());
        }

        self.len = pos - self.start;
        self.spc = 0;
        self.base = self.after;
        Ok(())
    }

    /// Emit the run into the buffered line
    fn emit(&mut self, mandatory: bool) -> Result<Flow> {
        let end = self.start + self.len;
        let frag = self.text.slice(self.start..end);
        let spaces = self.text.slice(end..end + self.spc);

        if frag.is_empty() {
            self.spaces.append(&spaces)?;
        } else {
            if let Some(phase) = self.phase.entry() {
                if let Some(formatted) = self.reformat(phase, &frag) {
                    self.phase = self.phase.formatted();
                    self.restart(self.len, &formatted)?;
                    return Ok(Flow::Restart);
                }
            }
            self.phase = Phase::InParagraph;

            let mut cols = hooks::sizing(self.config, self.cols, &self.line, &self.spaces, &frag, 0.0);
            let chars = self.line.char_len() + self.spaces.char_len() + frag.char_len();

            if self.exceeds(cols, chars) {
                let empty = GcString::empty(self.config.clone());
                let alone = hooks::sizing(self.config, 0.0, &empty, &empty, &frag, 0.0);
                let urgent = self.urgent_end < end
                    && (self.exceeds(alone, frag.char_len()) || self.cols < self.config.colmin);

                if urgent {
                    let broken = self.urgent_break(self.cols, &self.line, &self.spaces, &frag);
                    log::debug!("fragment of {} columns does not fit, breaking urgently", alone);
                    self.checkpoint();
                    self.restart(self.len, &broken)?;
                    self.urgent_end = self.start + broken.len();
                    return Ok(Flow::Restart);
                }

                if !self.line.is_empty() {
                    self.flush(FormatPhase::EndOfLine)?;
                    if let Some(formatted) = self.reformat(FormatPhase::StartOfLine, &frag) {
                        self.restart(self.len, &formatted)?;
                        return Ok(Flow::Restart);
                    }
                    cols = alone;
                }
            }

            let trailing = mem::replace(&mut self.spaces, spaces);
            self.line.append(&trailing)?;
            self.line.append(&frag)?;
            self.cols = cols;
        }

        if mandatory {
            self.flush(FormatPhase::EndOfParagraph)?;
            if self.phase != Phase::None {
                self.phase = Phase::StartOfParagraph;
            }
        }

        self.start = end + self.spc;
        self.len = self.text.pos() - self.start;
        self.spc = 0;
        self.base = self.after;
        Ok(Flow::Done)
    }

    /// Formatted fragment if formatting changes it
    fn reformat(&self, phase: FormatPhase, frag: &GcString) -> Option<GcString> {
        let formatted = hooks::format(self.config, phase, frag)?;
        if &formatted == frag {
            return None;
        }

        log::debug!("{phase:?} formatting changed fragment, scanning again");
        Some(formatted)
    }

    fn exceeds(&self, cols: f64, chars: usize) -> bool {
        (self.config.colmax > 0.0 && cols > self.config.colmax)
            || (self.config.charmax > 0 && chars > self.config.charmax)
    }

    /// Urgent hook followed by cutting pieces longer than charmax
    fn urgent_break(&self, cols: f64, pre: &GcString, spc: &GcString, frag: &GcString) -> GcString {
        let mut broken = hooks::urgent(self.config, cols, pre, spc, frag);
        let charmax = self.config.charmax;
        if charmax == 0 {
            return broken;
        }

        let mut chars = 0;
        for cluster in broken.clusters_mut() {
            if cluster.flags().contains(ClusterFlags::BREAK_BEFORE) {
                chars = 0;
            } else if chars > 0 && chars + cluster.len > charmax {
                cluster.set_flags(ClusterFlags::BREAK_BEFORE);
                chars = 0;
            }
            chars += cluster.len;
        }

        broken
    }

    fn checkpoint(&mut self) {
        if self.checkpoint.is_some() && self.start < self.urgent_end {
            return;
        }

        self.checkpoint = Some(Checkpoint {
            unread: self.text.chars_from(self.start).to_vec(),
            phase: self.phase,
            line: self.line.clone(),
            spaces: self.spaces.clone(),
            cols: self.cols,
            output: self.output.len(),
        });
    }

    /// Replace `count` clusters at the run start and scan from there again
    fn restart(&mut self, count: usize, replacement: &GcString) -> Result<()> {
        let before = self.text.len();
        self.text.splice(self.start..self.start + count, replacement)?;
        self.limit = (self.limit + self.text.len()).saturating_sub(before);
        self.text.set_pos(self.start as isize)?;

        self.len = 0;
        self.spc = 0;
        Ok(())
    }

    /// Output the buffered line followed by its formatted end
    fn flush(&mut self, end: FormatPhase) -> Result<()> {
        let line = mem::replace(&mut self.line, GcString::empty(self.config.clone()));
        let spaces = mem::replace(&mut self.spaces, GcString::empty(self.config.clone()));
        self.cols = 0.0;

        let line = hooks::format(self.config, FormatPhase::Line, &line).unwrap_or(line);
        let spaces = hooks::format(self.config, end, &spaces).unwrap_or(spaces);

        self.output.try_reserve(line.char_len() + spaces.char_len())?;
        self.output.extend_from_slice(line.as_chars());
        self.output.extend_from_slice(spaces.as_chars());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.phase != Phase::None || !self.line.is_empty() || !self.spaces.is_empty() {
            self.flush(FormatPhase::EndOfText)?;
        }
        Ok(())
    }

    fn suspend(&mut self, state: &mut StreamState) {
        let rewound = match self.checkpoint.take() {
            Some(checkpoint) if self.start < self.urgent_end => {
                log::debug!("urgently broken run is not complete, rewinding");
                checkpoint
            }
            _ => Checkpoint {
                unread: self.text.chars_from(self.start).to_vec(),
                phase: self.phase,
                line: mem::replace(&mut self.line, GcString::empty(self.config.clone())),
                spaces: mem::replace(&mut self.spaces, GcString::empty(self.config.clone())),
                cols: self.cols,
                output: self.output.len(),
            },
        };

        if !rewound.unread.is_empty() {
            log::debug!("suspending with {} unread code points", rewound.unread.len());
        }

        self.output.truncate(rewound.output);
        state.phase = rewound.phase;
        state.bufstr = rewound.line.into_chars();
        state.bufspc = rewound.spaces.into_chars();
        state.bufcols = rewound.cols;
        state.unread = rewound.unread;
    }
}

/// Number of leading clusters that later input cannot change. A trailing
/// complex context run may still grow and change its word boundaries.
fn final_clusters(config: &Config, text: &GcString, eot: bool) -> usize {
    if eot || config.complex.is_none() {
        return text.len();
    }

    let run = text
        .clusters()
        .iter()
        .rev()
        .take_while(|cluster| cluster.lbc == SA)
        .count();
    text.len() - run
}

fn restore(config: &Rc<Config>, chars: &[char]) -> GcString {
    let mut gcstr = GcString::new(chars.to_vec(), config.clone());
    if config.has(BreakOptions::LEGACY_CM) {
        gcstr.collapse_legacy_cm();
    }
    gcstr
}
