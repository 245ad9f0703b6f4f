use std::cmp::Ordering;

use linefold_ucd::{
    char_properties, CharProperties, EastAsianWidth, GraphemeBreak, LineBreakClass, Script,
};
use linefold_utils::SortedVec;

use crate::{
    config::{BreakOptions, Config},
    error::{Error, Result},
};

/// Explicit property values for a closed code point range. Unset fields
/// fall back to the built in tables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct PropertyOverride {
    pub start: u32,
    pub end: u32,
    pub lbc: Option<LineBreakClass>,
    pub eaw: Option<EastAsianWidth>,
    pub gbc: Option<GraphemeBreak>,
    pub script: Option<Script>,
}

impl PropertyOverride {
    pub fn new(start: u32, end: u32) -> PropertyOverride {
        PropertyOverride {
            start,
            end,
            ..Default::default()
        }
    }

    pub fn lbc(mut self, lbc: LineBreakClass) -> Self {
        self.lbc = Some(lbc);
        self
    }

    pub fn eaw(mut self, eaw: EastAsianWidth) -> Self {
        self.eaw = Some(eaw);
        self
    }

    pub fn gbc(mut self, gbc: GraphemeBreak) -> Self {
        self.gbc = Some(gbc);
        self
    }

    pub fn script(mut self, script: Script) -> Self {
        self.script = Some(script);
        self
    }

    fn cmp_point(&self, cp: u32) -> Ordering {
        if cp < self.start {
            Ordering::Greater
        } else if self.end < cp {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

/// Non overlapping override ranges sorted by start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: SortedVec<PropertyOverride>,
}

impl OverrideTable {
    pub fn new(entries: Vec<PropertyOverride>) -> Result<OverrideTable> {
        let table = OverrideTable {
            entries: entries.into(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Add entries from another table
    pub fn extend(&mut self, other: OverrideTable) -> Result<()> {
        self.entries.merge(other.entries);
        self.validate()
    }

    pub fn find(&self, ch: char) -> Option<&PropertyOverride> {
        let cp = ch as u32;
        self.entries.find_by(|entry| entry.cmp_point(cp))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<PropertyOverride> {
        self.entries.iter()
    }

    fn validate(&self) -> Result<()> {
        let mut prev_end: Option<u32> = None;
        for entry in &self.entries {
            if entry.end < entry.start || entry.end > char::MAX as u32 {
                return Err(Error::InvalidRange {
                    start: entry.start,
                    end: entry.end,
                });
            }

            if let Some(end) = prev_end {
                if entry.start <= end {
                    return Err(Error::OverlappingRanges(entry.start));
                }
            }
            prev_end = Some(entry.end);
        }

        Ok(())
    }
}

/// Resolve all properties of a code point. Overrides win over the built in
/// tables, context dependent values are resolved using the configuration.
pub fn resolve(config: &Config, ch: char) -> CharProperties {
    let mut lbc = None;
    let mut eaw = None;
    let mut gbc = None;
    let mut script = None;

    if let Some(entry) = config.overrides.find(ch) {
        lbc = entry.lbc;
        eaw = entry.eaw;
        gbc = entry.gbc.or_else(|| entry.lbc.map(derive_grapheme_break));
        script = entry.script;
    }

    let mut props = match (lbc, eaw, gbc, script) {
        (Some(lbc), Some(eaw), Some(gbc), Some(script)) => CharProperties {
            lbc,
            eaw,
            gbc,
            script,
        },
        _ => {
            let builtin = char_properties(ch);
            CharProperties {
                lbc: lbc.unwrap_or(builtin.lbc),
                eaw: eaw.unwrap_or(builtin.eaw),
                gbc: gbc.unwrap_or(builtin.gbc),
                script: script.unwrap_or(builtin.script),
            }
        }
    };

    let east_asian = config.has(BreakOptions::EASTASIAN_CONTEXT);
    props.lbc = match props.lbc {
        LineBreakClass::AI if east_asian => LineBreakClass::ID,
        LineBreakClass::AI | LineBreakClass::SG | LineBreakClass::XX => LineBreakClass::AL,
        LineBreakClass::CJ => LineBreakClass::NS,
        lbc => lbc,
    };
    props.eaw = match props.eaw {
        EastAsianWidth::Ambiguous if east_asian => EastAsianWidth::Fullwidth,
        EastAsianWidth::Ambiguous => EastAsianWidth::Narrow,
        eaw => eaw,
    };

    props
}

/// Line breaking class of a single character, complex context resolved the
/// same way as for grapheme clusters
pub fn lbclass(config: &Config, ch: char) -> LineBreakClass {
    let props = resolve(config, ch);
    resolve_complex(config, props.lbc, props.gbc, props.script)
}

pub fn eawidth(config: &Config, ch: char) -> EastAsianWidth {
    resolve(config, ch).eaw
}

/// Display columns of an east asian width
pub fn columns_of(eaw: EastAsianWidth) -> usize {
    match eaw {
        EastAsianWidth::Fullwidth | EastAsianWidth::Wide => 2,
        EastAsianWidth::Zero => 0,
        _ => 1,
    }
}

/// Complex context characters stay `SA` only if a complex breaker handles
/// their script. Otherwise marks become `CM` and everything else `AL`.
pub(crate) fn resolve_complex(
    config: &Config,
    lbc: LineBreakClass,
    gbc: GraphemeBreak,
    script: Script,
) -> LineBreakClass {
    if lbc != LineBreakClass::SA || config.supports_complex(script) {
        return lbc;
    }

    match gbc {
        GraphemeBreak::Extend | GraphemeBreak::SpacingMark => LineBreakClass::CM,
        _ => LineBreakClass::AL,
    }
}

/// Grapheme break class for an override that only sets line break class
fn derive_grapheme_break(lbc: LineBreakClass) -> GraphemeBreak {
    use LineBreakClass::*;

    match lbc {
        CR => GraphemeBreak::CR,
        LF => GraphemeBreak::LF,
        BK | NL | WJ | ZW => GraphemeBreak::Control,
        CM => GraphemeBreak::Extend,
        H2 => GraphemeBreak::LV,
        H3 => GraphemeBreak::LVT,
        JL => GraphemeBreak::L,
        JV => GraphemeBreak::V,
        JT => GraphemeBreak::T,
        _ => GraphemeBreak::Other,
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::complex::WordListBreaker;

    fn with_overrides(entries: Vec<PropertyOverride>) -> Config {
        Config {
            overrides: OverrideTable::new(entries).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn builtin() {
        let config = Config::default();
        let props = resolve(&config, 'a');
        assert_eq!(LineBreakClass::AL, props.lbc);
        assert_eq!(EastAsianWidth::Narrow, props.eaw);
        assert_eq!(GraphemeBreak::Other, props.gbc);
        assert_eq!(Script::Other, props.script);
    }

    #[test]
    fn ambiguous() {
        let mut config = Config::default();
        let props = resolve(&config, '\u{00A7}');
        assert_eq!(LineBreakClass::AL, props.lbc);
        assert_eq!(EastAsianWidth::Narrow, eawidth(&config, 'α'));

        config.options |= BreakOptions::EASTASIAN_CONTEXT;
        let props = resolve(&config, '\u{00A7}');
        assert_eq!(LineBreakClass::ID, props.lbc);
        assert_eq!(EastAsianWidth::Fullwidth, eawidth(&config, 'α'));
    }

    #[test]
    fn unknown() {
        let config = Config::default();
        let props = resolve(&config, '\u{E0000}');
        assert_eq!(LineBreakClass::AL, props.lbc);
        assert_eq!(EastAsianWidth::Narrow, props.eaw);
        assert_eq!(Script::Unknown, props.script);
    }

    #[test]
    fn override_wins() {
        let config = with_overrides(vec![
            PropertyOverride::new('a' as u32, 'c' as u32)
                .lbc(LineBreakClass::ID)
                .eaw(EastAsianWidth::Wide),
            PropertyOverride::new('x' as u32, 'x' as u32).eaw(EastAsianWidth::Zero),
        ]);

        let props = resolve(&config, 'b');
        assert_eq!(LineBreakClass::ID, props.lbc);
        assert_eq!(EastAsianWidth::Wide, props.eaw);
        assert_eq!(GraphemeBreak::Other, props.gbc);

        let props = resolve(&config, 'x');
        assert_eq!(LineBreakClass::AL, props.lbc);
        assert_eq!(EastAsianWidth::Zero, props.eaw);

        let props = resolve(&config, 'd');
        assert_eq!(LineBreakClass::AL, props.lbc);
    }

    #[test]
    fn derived_grapheme_break() {
        let config = with_overrides(vec![
            PropertyOverride::new('#' as u32, '#' as u32).lbc(LineBreakClass::CM),
            PropertyOverride::new('%' as u32, '%' as u32).lbc(LineBreakClass::ZW),
            PropertyOverride::new('&' as u32, '&' as u32)
                .lbc(LineBreakClass::CM)
                .gbc(GraphemeBreak::Prepend),
        ]);

        assert_eq!(GraphemeBreak::Extend, resolve(&config, '#').gbc);
        assert_eq!(GraphemeBreak::Control, resolve(&config, '%').gbc);
        assert_eq!(GraphemeBreak::Prepend, resolve(&config, '&').gbc);
    }

    #[test]
    fn invalid_tables() {
        let overlap = OverrideTable::new(vec![
            PropertyOverride::new(10, 20),
            PropertyOverride::new(20, 30),
        ]);
        assert!(matches!(overlap, Err(Error::OverlappingRanges(20))));

        let reversed = OverrideTable::new(vec![PropertyOverride::new(5, 1)]);
        assert!(matches!(reversed, Err(Error::InvalidRange { .. })));

        let mut table = OverrideTable::new(vec![PropertyOverride::new(10, 20)]).unwrap();
        let other = OverrideTable::new(vec![PropertyOverride::new(0, 9)]).unwrap();
        table.extend(other).unwrap();
        assert_eq!(2, table.len());
        assert_eq!(0, table.iter().next().unwrap().start);
    }

    #[test]
    fn complex_context() {
        let mut config = Config::default();
        assert_eq!(LineBreakClass::AL, lbclass(&config, 'ก'));
        assert_eq!(LineBreakClass::CM, lbclass(&config, '\u{0E31}'));

        config.complex = Some(Rc::new(WordListBreaker::new(["กา"])));
        assert_eq!(LineBreakClass::SA, lbclass(&config, 'ก'));
        assert_eq!(LineBreakClass::SA, lbclass(&config, '\u{0E31}'));
    }

    #[test]
    fn columns() {
        assert_eq!(2, columns_of(EastAsianWidth::Wide));
        assert_eq!(2, columns_of(EastAsianWidth::Fullwidth));
        assert_eq!(1, columns_of(EastAsianWidth::Halfwidth));
        assert_eq!(1, columns_of(EastAsianWidth::Narrow));
        assert_eq!(0, columns_of(EastAsianWidth::Zero));
    }
}
