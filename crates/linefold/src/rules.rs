use linefold_ucd::LineBreakClass::{self, *};
use strum::EnumCount;

/// Break action between two clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Break always
    Mandatory,
    /// Break allowed
    Direct,
    /// Break allowed only if separated by spaces
    Indirect,
    /// No break, even if separated by spaces
    Prohibited,
}

const N: usize = LineBreakClass::COUNT;

static RULES: [[Action; N]; N] = build();

/// Action between two classes. Pairs outside the table are `Direct`.
pub fn lookup(before: LineBreakClass, after: LineBreakClass) -> Action {
    lookup_index(before as usize, after as usize)
}

pub fn lookup_index(before: usize, after: usize) -> Action {
    RULES
        .get(before)
        .and_then(|row| row.get(after))
        .copied()
        .unwrap_or(Action::Direct)
}

const fn build() -> [[Action; N]; N] {
    let mut table = [[Action::Direct; N]; N];
    let mut b = 0;
    while b < N {
        let mut a = 0;
        while a < N {
            table[b][a] = pair(LineBreakClass::ALL[b], LineBreakClass::ALL[a]);
            a += 1;
        }
        b += 1;
    }
    table
}

/// Classes that have a row and a column in the pair table
const fn in_table(class: LineBreakClass) -> bool {
    !matches!(class, BK | CR | LF | NL | SP | SG | XX | AI | SA | CJ)
}

const fn pair(b: LineBreakClass, a: LineBreakClass) -> Action {
    if !in_table(b) || !in_table(a) {
        return Action::Direct;
    }

    // LB7
    if matches!(a, ZW) {
        return Action::Prohibited;
    }
    // LB8
    if matches!(b, ZW) {
        return Action::Direct;
    }

    // LB10
    let b = if matches!(b, CM | ZWJ) { AL } else { b };

    // LB9 without spaces, LB10 with
    if matches!(a, CM | ZWJ) {
        return if spaced(b, AL) {
            Action::Prohibited
        } else {
            Action::Indirect
        };
    }

    if spaced(b, a) {
        Action::Prohibited
    } else if direct(b, a) {
        Action::Indirect
    } else {
        Action::Direct
    }
}

/// No break even with spaces between
const fn spaced(b: LineBreakClass, a: LineBreakClass) -> bool {
    // LB13
    matches!(a, CL | CP | EX | IS | SY)
        // LB14
        || matches!(b, OP)
        // LB15
        || (matches!(b, QU) && matches!(a, OP))
        // LB16
        || (matches!(b, CL | CP) && matches!(a, NS))
        // LB17
        || (matches!(b, B2) && matches!(a, B2))
}

/// No break when directly adjacent
const fn direct(b: LineBreakClass, a: LineBreakClass) -> bool {
    // LB12a
    if matches!(a, GL) {
        return !matches!(b, BA | HY);
    }
    // LB19
    if matches!(a, QU) || matches!(b, QU) {
        return true;
    }
    // LB20
    if matches!(a, CB) || matches!(b, CB) {
        return false;
    }
    // LB21
    if matches!(a, BA | HY | NS) || matches!(b, BB) {
        return true;
    }
    // LB21b
    if matches!(b, SY) && matches!(a, HL) {
        return true;
    }
    // LB22
    if matches!(a, IN) {
        return true;
    }
    // LB23
    if (matches!(b, AL | HL) && matches!(a, NU)) || (matches!(b, NU) && matches!(a, AL | HL)) {
        return true;
    }
    // LB23a
    if (matches!(b, PR) && matches!(a, ID | EB | EM))
        || (matches!(b, ID | EB | EM) && matches!(a, PO))
    {
        return true;
    }
    // LB24
    if (matches!(b, PR | PO) && matches!(a, AL | HL))
        || (matches!(b, AL | HL) && matches!(a, PR | PO))
    {
        return true;
    }
    // LB25
    if (matches!(b, CL | CP | NU) && matches!(a, PO | PR))
        || (matches!(b, PO | PR) && matches!(a, OP | NU))
        || (matches!(b, HY | IS | NU | SY) && matches!(a, NU))
    {
        return true;
    }
    // LB26
    if (matches!(b, JL) && matches!(a, JL | JV | H2 | H3))
        || (matches!(b, JV | H2) && matches!(a, JV | JT))
        || (matches!(b, JT | H3) && matches!(a, JT))
    {
        return true;
    }
    // LB27
    if (matches!(b, JL | JV | JT | H2 | H3) && matches!(a, PO))
        || (matches!(b, PR) && matches!(a, JL | JV | JT | H2 | H3))
    {
        return true;
    }
    // LB28
    if matches!(b, AL | HL) && matches!(a, AL | HL) {
        return true;
    }
    // LB29
    if matches!(b, IS) && matches!(a, AL | HL) {
        return true;
    }
    // LB30
    if (matches!(b, AL | HL | NU) && matches!(a, OP)) || (matches!(b, CP) && matches!(a, AL | HL | NU))
    {
        return true;
    }
    // LB30a
    if matches!(b, RI) && matches!(a, RI) {
        return true;
    }
    // LB30b
    matches!(b, EB) && matches!(a, EM)
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn alphabetic() {
        assert_eq!(Action::Indirect, lookup(AL, AL));
        assert_eq!(Action::Indirect, lookup(AL, NU));
        assert_eq!(Action::Direct, lookup(ID, ID));
        assert_eq!(Action::Direct, lookup(AL, ID));
    }

    #[test]
    fn punctuation() {
        assert_eq!(Action::Prohibited, lookup(AL, CL));
        assert_eq!(Action::Prohibited, lookup(ID, EX));
        assert_eq!(Action::Prohibited, lookup(OP, AL));
        assert_eq!(Action::Prohibited, lookup(QU, OP));
        assert_eq!(Action::Prohibited, lookup(CP, NS));
        assert_eq!(Action::Prohibited, lookup(B2, B2));
        assert_eq!(Action::Indirect, lookup(AL, QU));
        assert_eq!(Action::Indirect, lookup(AL, HY));
        assert_eq!(Action::Direct, lookup(HY, AL));
        assert_eq!(Action::Direct, lookup(CB, AL));
    }

    #[test]
    fn zero_width_space() {
        assert_eq!(Action::Prohibited, lookup(AL, ZW));
        assert_eq!(Action::Direct, lookup(ZW, AL));
        assert_eq!(Action::Direct, lookup(ZW, CL));
    }

    #[test]
    fn combining_marks() {
        assert_eq!(Action::Indirect, lookup(AL, CM));
        assert_eq!(Action::Prohibited, lookup(OP, CM));
        assert_eq!(Action::Indirect, lookup(CM, AL));
        assert_eq!(Action::Prohibited, lookup(CM, CL));
    }

    #[test]
    fn glue() {
        assert_eq!(Action::Indirect, lookup(AL, GL));
        assert_eq!(Action::Direct, lookup(BA, GL));
        assert_eq!(Action::Prohibited, lookup(OP, GL));
    }

    #[test]
    fn hangul() {
        assert_eq!(Action::Indirect, lookup(JL, JV));
        assert_eq!(Action::Indirect, lookup(H2, JT));
        assert_eq!(Action::Direct, lookup(H3, H2));
    }

    #[test]
    fn outside_table() {
        for class in LineBreakClass::iter() {
            for outside in [BK, CR, LF, NL, SP, SG, XX, AI, SA, CJ] {
                assert_eq!(Action::Direct, lookup(class, outside));
                assert_eq!(Action::Direct, lookup(outside, class));
            }
        }
        assert_eq!(Action::Direct, lookup_index(N, 0));
        assert_eq!(Action::Direct, lookup_index(0, 200));
    }

    #[test]
    fn never_mandatory() {
        for b in LineBreakClass::iter() {
            for a in LineBreakClass::iter() {
                assert_ne!(Action::Mandatory, lookup(b, a));
            }
        }
    }
}
