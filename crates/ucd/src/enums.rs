use strum_macros::{AsRefStr, EnumCount, EnumIter, EnumString};

/// Line breaking classes, UAX #14
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, EnumCount, EnumIter, EnumString,
)]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum LineBreakClass {
    // Mandatory breaks and spaces
    BK = 0,
    CR,
    LF,
    NL,
    SP,

    // Closing, opening and quotation
    OP,
    CL,
    CP,
    QU,
    GL,
    NS,
    EX,
    SY,
    IS,
    PR,
    PO,
    NU,
    AL,
    HL,
    ID,
    IN,
    HY,
    BA,
    BB,
    B2,
    ZW,
    CM,
    WJ,

    // Hangul
    H2,
    H3,
    JL,
    JV,
    JT,

    RI,
    EB,
    EM,
    ZWJ,
    CB,

    // Resolved by context, never seen by the rule table
    AI,
    SA,
    CJ,
    SG,
    XX,
}

impl LineBreakClass {
    /// Every class in discriminant order
    pub const ALL: [LineBreakClass; 43] = {
        use LineBreakClass::*;
        [
            BK, CR, LF, NL, SP, OP, CL, CP, QU, GL, NS, EX, SY, IS, PR, PO, NU, AL, HL, ID, IN, HY,
            BA, BB, B2, ZW, CM, WJ, H2, H3, JL, JV, JT, RI, EB, EM, ZWJ, CB, AI, SA, CJ, SG, XX,
        ]
    };

    /// Classes that cause a mandatory break after them
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            LineBreakClass::BK | LineBreakClass::CR | LineBreakClass::LF | LineBreakClass::NL
        )
    }

    pub fn is_hangul(&self) -> bool {
        use LineBreakClass::*;
        matches!(self, H2 | H3 | JL | JV | JT)
    }
}

/// East asian width, UAX #11
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, EnumIter, EnumString,
)]
#[repr(u8)]
pub enum EastAsianWidth {
    #[strum(serialize = "F")]
    Fullwidth = 0,
    #[strum(serialize = "W")]
    Wide,
    #[strum(serialize = "H")]
    Halfwidth,
    #[strum(serialize = "Na", serialize = "N")]
    Narrow,
    #[strum(serialize = "A")]
    Ambiguous,
    /// Nonspacing, zero columns
    #[strum(serialize = "Z")]
    Zero,
}

/// Grapheme cluster break, UAX #29
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, EnumIter, EnumString,
)]
#[repr(u8)]
pub enum GraphemeBreak {
    CR = 0,
    LF,
    Control,
    Extend,
    ZWJ,
    #[strum(serialize = "RI", serialize = "RegionalIndicator")]
    RegionalIndicator,
    Prepend,
    SpacingMark,
    L,
    V,
    T,
    LV,
    LVT,
    #[strum(serialize = "Other", serialize = "XX")]
    Other,
}

/// Scripts that matter for line breaking
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, EnumIter, EnumString,
)]
#[repr(u8)]
pub enum Script {
    Common = 0,
    Inherited,
    Han,
    Hangul,
    Thai,
    Lao,
    Khmer,
    Myanmar,
    /// Any assigned script not listed above
    Other,
    Unknown,
}
