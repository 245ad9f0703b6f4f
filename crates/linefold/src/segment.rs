use std::rc::Rc;

use linefold_ucd::{GraphemeBreak, LineBreakClass};

use crate::{
    config::Config,
    gcstring::{Cluster, GcString},
    properties::{columns_of, resolve, resolve_complex},
};

/// Split code points into grapheme clusters
pub fn segment(config: &Rc<Config>, text: Vec<char>) -> GcString {
    let clusters = clusters(config, &text);
    GcString::from_parts(text, clusters, config.clone())
}

pub(crate) fn clusters(config: &Config, text: &[char]) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let cluster = next_cluster(config, text, pos);
        pos += cluster.len;
        clusters.push(cluster);
    }

    clusters
}

fn next_cluster(config: &Config, text: &[char], start: usize) -> Cluster {
    use GraphemeBreak::*;

    let props = resolve(config, text[start]);
    let mut lbc = props.lbc;
    let mut gbc = props.gbc;
    let mut script = props.script;
    let mut len = 1;

    let mut base_cols = columns_of(props.eaw);
    let mut prepend_cols = 0;
    let mut extend_cols = 0;

    let alone = matches!(gbc, LF | Control)
        || matches!(
            lbc,
            LineBreakClass::SP
                | LineBreakClass::ZW
                | LineBreakClass::WJ
                | LineBreakClass::BK
                | LineBreakClass::NL
        );

    if gbc == CR {
        // GB 3
        let crlf = text
            .get(start + 1)
            .map(|ch| resolve(config, *ch).gbc == LF)
            .unwrap_or(false);
        if crlf {
            len = 2;
        }
    } else if !alone {
        let mut regional_joined = false;

        while let Some(ch) = text.get(start + len) {
            let next = resolve(config, *ch);

            match (gbc, next.gbc) {
                // GB 5
                (_, Control | CR | LF) => break,
                // GB 6, 7, 8
                (L, L | V | LV | LVT) | (LV | V, V | T) | (LVT | T, T) => {
                    base_cols = 2;
                    gbc = next.gbc;
                }
                // GB 9, 9a. GB 11 is not applied, emoji after a ZWJ start
                // a new cluster.
                (_, Extend | SpacingMark | ZWJ) => {
                    extend_cols += columns_of(next.eaw);
                }
                // GB 9b
                (Prepend, _) => {
                    lbc = next.lbc;
                    gbc = next.gbc;
                    script = next.script;
                    prepend_cols += base_cols;
                    base_cols = columns_of(next.eaw);
                }
                // GB 12, 13
                (RegionalIndicator, RegionalIndicator) if !regional_joined => {
                    regional_joined = true;
                    extend_cols += columns_of(next.eaw);
                }
                _ => break,
            }

            len += 1;
        }
    }

    let cols = (base_cols + prepend_cols + extend_cols).min(2);
    Cluster::new(
        start,
        len,
        cols,
        resolve_complex(config, lbc, gbc, script),
    )
}
