use std::{path::Path, rc::Rc, str::FromStr};

use serde::Deserialize;

use linefold_ucd::Script;

use crate::{
    complex::{ComplexBreaker, WordListBreaker},
    config::{BreakOptions, Config},
    error::{Error, Result},
    hooks::{BuiltinFormat, ForceUrgent, Format, Urgent},
    properties::{OverrideTable, PropertyOverride},
};

/// Line breaking options as written in an option file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Maximum code points per line, 0 is unlimited
    pub charmax: usize,
    /// Maximum columns per line, 0 is unlimited
    pub colmax: f64,
    pub colmin: f64,
    pub newline: String,

    pub east_asian_context: bool,
    pub hangul_as_alphabetic: bool,
    pub legacy_cm: bool,

    pub format: Option<BuiltinFormat>,
    pub urgent: Option<UrgentKind>,

    /// Word list used to break complex context scripts
    pub complex_words: Vec<String>,
    /// Scripts the word list applies to, Thai if empty
    pub complex_scripts: Vec<String>,

    pub overrides: Vec<OverrideOption>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            charmax: 0,
            colmax: 0.0,
            colmin: 0.0,
            newline: "\n".into(),
            east_asian_context: false,
            hangul_as_alphabetic: false,
            legacy_cm: false,
            format: None,
            urgent: None,
            complex_words: vec![],
            complex_scripts: vec![],
            overrides: vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgentKind {
    /// Cut words that do not fit, see [`ForceUrgent`]
    Force,
}

/// Property override for a code point range. Property values are given by
/// their short names, `lbc = "ID"`, `eaw = "W"`, `gbc = "Extend"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OverrideOption {
    pub start: u32,
    /// Last code point of the range, defaults to `start`
    pub end: Option<u32>,
    pub lbc: Option<String>,
    pub eaw: Option<String>,
    pub gbc: Option<String>,
    pub script: Option<String>,
}

impl OverrideOption {
    fn to_override(&self) -> Result<PropertyOverride> {
        let mut entry = PropertyOverride::new(self.start, self.end.unwrap_or(self.start));
        entry.lbc = self.lbc.as_deref().map(parse).transpose()?;
        entry.eaw = self.eaw.as_deref().map(parse).transpose()?;
        entry.gbc = self.gbc.as_deref().map(parse).transpose()?;
        entry.script = self.script.as_deref().map(parse).transpose()?;
        Ok(entry)
    }
}

impl Options {
    pub fn from_toml(text: &str) -> anyhow::Result<Options> {
        let options = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Options>()?;
        Ok(options)
    }

    /// Validate the options and build a configuration
    pub fn to_config(&self) -> Result<Config> {
        let mut options = BreakOptions::empty();
        options.set(BreakOptions::EASTASIAN_CONTEXT, self.east_asian_context);
        options.set(BreakOptions::HANGUL_AS_AL, self.hangul_as_alphabetic);
        options.set(BreakOptions::LEGACY_CM, self.legacy_cm);

        let overrides = self
            .overrides
            .iter()
            .map(OverrideOption::to_override)
            .collect::<Result<Vec<PropertyOverride>>>()?;

        let complex = if self.complex_words.is_empty() {
            None
        } else {
            let mut breaker = WordListBreaker::new(&self.complex_words);
            if !self.complex_scripts.is_empty() {
                let scripts = self
                    .complex_scripts
                    .iter()
                    .map(|name| parse::<Script>(name))
                    .collect::<Result<Vec<Script>>>()?;
                breaker = breaker.with_scripts(&scripts);
            }
            Some(Rc::new(breaker) as Rc<dyn ComplexBreaker>)
        };

        let urgent = self.urgent.map(|kind| match kind {
            UrgentKind::Force => Rc::new(ForceUrgent) as Rc<dyn Urgent>,
        });

        Ok(Config {
            charmax: self.charmax,
            colmax: self.colmax,
            colmin: self.colmin,
            newline: self.newline.chars().collect(),
            options,
            overrides: OverrideTable::new(overrides)?,
            preprocess: None,
            format: self.format.map(|format| Rc::new(format) as Rc<dyn Format>),
            sizing: None,
            urgent,
            complex,
        })
    }
}

/// Read options from a file, the format is chosen by its extension
pub fn read_options(path: &Path) -> anyhow::Result<Options> {
    let options = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?
        .try_deserialize::<Options>()?;
    Ok(options)
}

fn parse<T: FromStr>(name: &str) -> Result<T> {
    T::from_str(name).map_err(|_| Error::UnknownProperty(name.to_string()))
}
