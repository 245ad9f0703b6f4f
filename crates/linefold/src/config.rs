use std::{fmt, rc::Rc};

use linefold_ucd::Script;

use crate::{
    complex::ComplexBreaker,
    hooks::{Format, Preprocess, Sizing, Urgent},
    properties::OverrideTable,
};

bitflags::bitflags! {
    #[derive(Default)]
    pub struct BreakOptions: u8 {
        /// Resolve ambiguous classes and widths as east asian
        const EASTASIAN_CONTEXT = 0b00000001;
        /// Break Hangul syllables like alphabetic words
        const HANGUL_AS_AL      = 0b00000010;
        /// Treat space followed by combining marks as one ideographic unit
        const LEGACY_CM         = 0b00000100;
    }
}

/// Line breaking configuration shared by every string and stream it is
/// used with. Cloning duplicates the configuration, streaming state lives
/// in [`crate::StreamState`].
#[derive(Clone)]
pub struct Config {
    /// Maximum code points per line, 0 is unlimited
    pub charmax: usize,
    /// Maximum columns per line, 0 is unlimited
    pub colmax: f64,
    /// Minimum columns per line
    pub colmin: f64,
    pub newline: Vec<char>,
    pub options: BreakOptions,
    pub overrides: OverrideTable,

    pub preprocess: Option<Rc<dyn Preprocess>>,
    pub format: Option<Rc<dyn Format>>,
    pub sizing: Option<Rc<dyn Sizing>>,
    pub urgent: Option<Rc<dyn Urgent>>,
    pub complex: Option<Rc<dyn ComplexBreaker>>,
}

impl Config {
    pub fn has(&self, option: BreakOptions) -> bool {
        self.options.contains(option)
    }

    /// Whether a complex breaker is configured for script
    pub fn supports_complex(&self, script: Script) -> bool {
        self.complex
            .as_ref()
            .map(|complex| complex.supports(script))
            .unwrap_or(false)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            charmax: 0,
            colmax: 0.0,
            colmin: 0.0,
            newline: vec!['\n'],
            options: BreakOptions::default(),
            overrides: OverrideTable::default(),
            preprocess: None,
            format: None,
            sizing: None,
            urgent: None,
            complex: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("charmax", &self.charmax)
            .field("colmax", &self.colmax)
            .field("colmin", &self.colmin)
            .field("newline", &self.newline)
            .field("options", &self.options)
            .field("overrides", &self.overrides.len())
            .field("preprocess", &self.preprocess.is_some())
            .field("format", &self.format.is_some())
            .field("sizing", &self.sizing.is_some())
            .field("urgent", &self.urgent.is_some())
            .field("complex", &self.complex.is_some())
            .finish()
    }
}
