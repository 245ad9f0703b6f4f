//! Unicode line breaking with grapheme cluster segmentation and streaming
//! input.

mod complex;
mod config;
mod engine;
mod error;
mod gcstring;
mod hooks;
mod options;
mod properties;
mod rules;
mod segment;

pub use linefold_ucd::{CharProperties, EastAsianWidth, GraphemeBreak, LineBreakClass, Script};

pub use complex::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use gcstring::*;
pub use hooks::*;
pub use options::*;
pub use properties::*;
pub use rules::*;
pub use segment::*;

pub use complex::annotate as annotate_complex;
pub use properties::resolve as resolve_properties;
pub use rules::lookup as lookup_action;
