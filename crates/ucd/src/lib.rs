use std::cmp::Ordering;

use unicode_script::UnicodeScript;
use unicode_width::UnicodeWidthChar;

mod enums;
mod grapheme_break;

pub use enums::{EastAsianWidth, GraphemeBreak, LineBreakClass, Script};

/// All four breaking related properties of a code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharProperties {
    pub lbc: LineBreakClass,
    pub eaw: EastAsianWidth,
    pub gbc: GraphemeBreak,
    pub script: Script,
}

impl CharProperties {
    const fn new(lbc: LineBreakClass, eaw: EastAsianWidth, gbc: GraphemeBreak, script: Script) -> Self {
        CharProperties {
            lbc,
            eaw,
            gbc,
            script,
        }
    }
}

const HAN_EXTENSION: CharProperties = CharProperties::new(
    LineBreakClass::ID,
    EastAsianWidth::Wide,
    GraphemeBreak::Other,
    Script::Han,
);
const TAG: CharProperties = CharProperties::new(
    LineBreakClass::CM,
    EastAsianWidth::Zero,
    GraphemeBreak::Control,
    Script::Common,
);
const VARIATION_SELECTOR: CharProperties = CharProperties::new(
    LineBreakClass::CM,
    EastAsianWidth::Zero,
    GraphemeBreak::Extend,
    Script::Inherited,
);
const PRIVATE_USE: CharProperties = CharProperties::new(
    LineBreakClass::AL,
    EastAsianWidth::Ambiguous,
    GraphemeBreak::Other,
    Script::Unknown,
);
const UNASSIGNED: CharProperties = CharProperties::new(
    LineBreakClass::AL,
    EastAsianWidth::Narrow,
    GraphemeBreak::Other,
    Script::Unknown,
);

/// Blocks above the BMP and SMP that are not worth tabulating per code point
fn astral_block(ch: char) -> Option<CharProperties> {
    let cp = ch as u32;
    if cp < 0x20000 {
        return None;
    }

    let props = match cp {
        0x20000..=0x2FFFD | 0x30000..=0x3FFFD => HAN_EXTENSION,
        0xE0001 | 0xE0020..=0xE007F => TAG,
        0xE0100..=0xE01EF => VARIATION_SELECTOR,
        0xF0000..=0xFFFFD | 0x100000..=0x10FFFD => PRIVATE_USE,
        _ => UNASSIGNED,
    };
    Some(props)
}

/// Built in properties of a code point. Context dependent values such as
/// `AI` and `A` are returned unresolved.
pub fn char_properties(ch: char) -> CharProperties {
    if let Some(props) = astral_block(ch) {
        return props;
    }

    CharProperties {
        lbc: line_break_table(ch),
        eaw: east_asian_width_table(ch),
        gbc: grapheme_break_table(ch),
        script: script_table(ch),
    }
}

pub fn line_break(ch: char) -> LineBreakClass {
    astral_block(ch)
        .map(|props| props.lbc)
        .unwrap_or_else(|| line_break_table(ch))
}

pub fn east_asian_width(ch: char) -> EastAsianWidth {
    astral_block(ch)
        .map(|props| props.eaw)
        .unwrap_or_else(|| east_asian_width_table(ch))
}

pub fn grapheme_break(ch: char) -> GraphemeBreak {
    astral_block(ch)
        .map(|props| props.gbc)
        .unwrap_or_else(|| grapheme_break_table(ch))
}

pub fn script(ch: char) -> Script {
    astral_block(ch)
        .map(|props| props.script)
        .unwrap_or_else(|| script_table(ch))
}

fn grapheme_break_table(ch: char) -> GraphemeBreak {
    let cp = ch as u32;
    if (0xAC00..=0xD7A3).contains(&cp) {
        return if (cp - 0xAC00) % 28 == 0 {
            GraphemeBreak::LV
        } else {
            GraphemeBreak::LVT
        };
    }

    search_table(ch, grapheme_break::GRAPHEME_CLUSTER_BREAK).unwrap_or(GraphemeBreak::Other)
}

fn line_break_table(ch: char) -> LineBreakClass {
    use unicode_linebreak::BreakClass;
    use LineBreakClass::*;

    #[allow(unreachable_patterns)]
    match unicode_linebreak::break_property(ch as u32) {
        BreakClass::Mandatory => BK,
        BreakClass::CarriageReturn => CR,
        BreakClass::LineFeed => LF,
        BreakClass::CombiningMark => CM,
        BreakClass::NextLine => NL,
        BreakClass::Surrogate => SG,
        BreakClass::WordJoiner => WJ,
        BreakClass::ZeroWidthSpace => ZW,
        BreakClass::NonBreakingGlue => GL,
        BreakClass::Space => SP,
        BreakClass::ZeroWidthJoiner => ZWJ,
        BreakClass::BeforeAndAfter => B2,
        BreakClass::After => BA,
        BreakClass::Before => BB,
        BreakClass::Hyphen => HY,
        BreakClass::Contingent => CB,
        BreakClass::ClosePunctuation => CL,
        BreakClass::CloseParenthesis => CP,
        BreakClass::Exclamation => EX,
        BreakClass::Inseparable => IN,
        BreakClass::NonStarter => NS,
        BreakClass::OpenPunctuation => OP,
        BreakClass::Quotation => QU,
        BreakClass::InfixSeparator => IS,
        BreakClass::Numeric => NU,
        BreakClass::Postfix => PO,
        BreakClass::Prefix => PR,
        BreakClass::Symbol => SY,
        BreakClass::Ambiguous => AI,
        BreakClass::Alphabetic => AL,
        BreakClass::ConditionalJapaneseStarter => CJ,
        BreakClass::EmojiBase => EB,
        BreakClass::EmojiModifier => EM,
        BreakClass::HangulLvSyllable => H2,
        BreakClass::HangulLvtSyllable => H3,
        BreakClass::HebrewLetter => HL,
        BreakClass::Ideographic => ID,
        BreakClass::HangulLJamo => JL,
        BreakClass::HangulVJamo => JV,
        BreakClass::HangulTJamo => JT,
        BreakClass::RegionalIndicator => RI,
        BreakClass::ComplexContext => SA,
        BreakClass::Unknown => XX,
        _ => XX,
    }
}

fn east_asian_width_table(ch: char) -> EastAsianWidth {
    let cp = ch as u32;
    if matches!(cp, 0x3000 | 0xFF01..=0xFF60 | 0xFFE0..=0xFFE6) {
        return EastAsianWidth::Fullwidth;
    }
    if matches!(cp, 0x20A9 | 0xFF61..=0xFFDC | 0xFFE8..=0xFFEE) {
        return EastAsianWidth::Halfwidth;
    }

    match (ch.width(), ch.width_cjk()) {
        (Some(0), _) => EastAsianWidth::Zero,
        (Some(2), _) => EastAsianWidth::Wide,
        (Some(1), Some(2)) => EastAsianWidth::Ambiguous,
        _ => EastAsianWidth::Narrow,
    }
}

fn script_table(ch: char) -> Script {
    use unicode_script::Script as Ucd;

    match ch.script() {
        Ucd::Common => Script::Common,
        Ucd::Inherited => Script::Inherited,
        Ucd::Han => Script::Han,
        Ucd::Hangul => Script::Hangul,
        Ucd::Thai => Script::Thai,
        Ucd::Lao => Script::Lao,
        Ucd::Khmer => Script::Khmer,
        Ucd::Myanmar => Script::Myanmar,
        Ucd::Unknown => Script::Unknown,
        _ => Script::Other,
    }
}

fn search_table<T: Copy>(ch: char, table: &'static [(u32, u32, T)]) -> Option<T> {
    let ch = ch as u32;
    let pos = table
        .binary_search_by(|(start, end, _)| {
            if ch < *start {
                Ordering::Greater
            } else if *end < ch {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
        .ok()?;
    let (_, _, value) = &table[pos];
    Some(*value)
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn ascii() {
        let props = char_properties('a');
        assert_eq!(LineBreakClass::AL, props.lbc);
        assert_eq!(EastAsianWidth::Narrow, props.eaw);
        assert_eq!(GraphemeBreak::Other, props.gbc);

        assert_eq!(LineBreakClass::SP, line_break(' '));
        assert_eq!(GraphemeBreak::CR, grapheme_break('\r'));
        assert_eq!(GraphemeBreak::LF, grapheme_break('\n'));
        assert_eq!(GraphemeBreak::Control, grapheme_break('\t'));
    }

    #[test]
    fn combining() {
        assert_eq!(GraphemeBreak::Extend, grapheme_break('\u{0301}'));
        assert_eq!(LineBreakClass::CM, line_break('\u{0301}'));
        assert_eq!(EastAsianWidth::Zero, east_asian_width('\u{0301}'));
        assert_eq!(GraphemeBreak::ZWJ, grapheme_break('\u{200D}'));
    }

    #[test]
    fn hangul() {
        assert_eq!(GraphemeBreak::L, grapheme_break('\u{1100}'));
        assert_eq!(GraphemeBreak::V, grapheme_break('\u{1161}'));
        assert_eq!(GraphemeBreak::T, grapheme_break('\u{11A8}'));
        assert_eq!(GraphemeBreak::LV, grapheme_break('\u{AC00}'));
        assert_eq!(GraphemeBreak::LVT, grapheme_break('\u{AC01}'));
        assert_eq!(LineBreakClass::H2, line_break('\u{AC00}'));
        assert_eq!(Script::Hangul, script('\u{AC00}'));
    }

    #[test]
    fn widths() {
        assert_eq!(EastAsianWidth::Wide, east_asian_width('漢'));
        assert_eq!(EastAsianWidth::Fullwidth, east_asian_width('Ａ'));
        assert_eq!(EastAsianWidth::Halfwidth, east_asian_width('ｱ'));
        assert_eq!(EastAsianWidth::Ambiguous, east_asian_width('α'));
    }

    #[test]
    fn thai() {
        assert_eq!(LineBreakClass::SA, line_break('ก'));
        assert_eq!(Script::Thai, script('ก'));
        assert_eq!(GraphemeBreak::Extend, grapheme_break('\u{0E31}'));
        assert_eq!(GraphemeBreak::SpacingMark, grapheme_break('\u{0E33}'));
    }

    #[test]
    fn astral_blocks() {
        assert_eq!(HAN_EXTENSION, char_properties('\u{20000}'));
        assert_eq!(TAG, char_properties('\u{E0041}'));
        assert_eq!(VARIATION_SELECTOR, char_properties('\u{E0100}'));
        assert_eq!(PRIVATE_USE, char_properties('\u{F0000}'));
        assert_eq!(UNASSIGNED, char_properties('\u{E0000}'));
    }

    #[test]
    fn table_is_sorted() {
        let table = grapheme_break::GRAPHEME_CLUSTER_BREAK;
        for pair in table.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert!(pair[0].1 < pair[1].0);
        }
    }

    #[test]
    fn all_classes() {
        assert_eq!(LineBreakClass::COUNT, LineBreakClass::ALL.len());
        for (i, class) in LineBreakClass::ALL.iter().enumerate() {
            assert_eq!(i, *class as usize);
        }
        assert_eq!(Ok(LineBreakClass::ZWJ), "ZWJ".parse());
        assert_eq!(Ok(EastAsianWidth::Narrow), "N".parse());
    }
}
