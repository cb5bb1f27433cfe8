//! Textual path compilation for tree addressing.
//!
//! A path is a string of dot-separated segments where a segment may carry one
//! or more bracketed sub-addresses: `a[b][0].c` compiles to the flat segment
//! sequence `[a, b, 0, c]`. Bracket contents containing the `;` combination
//! separator expand into multiple segments, so `a[0;1]` compiles to
//! `[a, 0, 1]` (inline multi-index addressing).
//!
//! The textual grammar is the serialized interface external templates are
//! authored against, so it must stay stable. Compilation sits on the
//! per-field hot path of record assembly and is written as a single pass with
//! one allocation per emitted segment.

use std::fmt;

/// Separator between path segments in the textual form.
pub const NESTING_SEP: char = '.';
/// Separator between combined indexes inside one bracket token.
pub const COMBINE_SEP: char = ';';

/// Compiles a textual path into its flat segment sequence.
///
/// Segments without brackets pass through unchanged, including empty ones
/// (`"a."` compiles to `["a", ""]`; downstream shape checks reject the empty
/// trailing segment, not the compiler). Text between or after bracket tokens
/// forms its own segment, and an unterminated bracket contributes its
/// remaining content as-is.
///
/// # Examples
///
/// ```
/// # use navmap::path::compile;
/// assert_eq!(compile("a[b][0].c"), vec!["a", "b", "0", "c"]);
/// assert_eq!(compile("a[0;1]"), vec!["a", "0", "1"]);
/// ```
pub fn compile(path: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(path.len() / 4 + 1);
    for seg in path.split(NESTING_SEP) {
        let Some(open) = seg.find('[') else {
            out.push(seg.to_owned());
            continue;
        };
        if open > 0 {
            out.push(seg[..open].to_owned());
        }
        let mut rest = &seg[open..];
        loop {
            match rest.find(']') {
                Some(close) => {
                    for idx in rest[1..close].split(COMBINE_SEP) {
                        out.push(idx.to_owned());
                    }
                    rest = &rest[close + 1..];
                    match rest.find('[') {
                        Some(next) => {
                            if next > 0 {
                                out.push(rest[..next].to_owned());
                            }
                            rest = &rest[next..];
                        }
                        None => {
                            if !rest.is_empty() {
                                out.push(rest.to_owned());
                            }
                            break;
                        }
                    }
                }
                None => {
                    for idx in rest[1..].split(COMBINE_SEP) {
                        out.push(idx.to_owned());
                    }
                    break;
                }
            }
        }
    }
    out
}

/// Expands bracket sub-addressing inside pre-split segments.
///
/// Read-side entry points accept paths that were split on dots upstream but
/// still carry inline indexes (`["Field5[0]"]` expands to
/// `["Field5", "0"]`). Segments without brackets are copied through.
pub fn compile_slice<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        let seg = seg.as_ref();
        if seg.contains('[') {
            out.append(&mut compile(seg));
        } else {
            out.push(seg.to_owned());
        }
    }
    out
}

/// Drops one trailing integer segment from a compiled path.
///
/// The result is the grouping key for order bookkeeping of repeated fields:
/// every element written under `Field[0]`, `Field[1]`, ... groups under
/// `Field`. A path whose last segment is not an integer is returned whole.
pub fn stripped(slice: &[String]) -> &[String] {
    match slice.split_last() {
        Some((last, rest)) if last.parse::<i64>().is_ok() => rest,
        _ => slice,
    }
}

/// A textual path together with its compiled segment sequence.
///
/// Mutating entry points take a `FullPath` so the map can key its order
/// bookkeeping off the compiled form while keeping the original text around
/// for diagnostics. The fields are public; callers that already hold a
/// compiled slice can build one directly instead of going through
/// [`FullPath::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FullPath {
    /// The path as authored.
    pub path: String,
    /// The compiled flat segment sequence.
    pub slice: Vec<String>,
}

impl FullPath {
    /// Compiles `path` and pairs it with its segment sequence.
    pub fn parse(path: impl Into<String>) -> Self {
        let path = path.into();
        let slice = compile(&path);
        Self { path, slice }
    }

    /// Builds a `FullPath` from an already-compiled segment sequence.
    pub fn from_slice(path: impl Into<String>, slice: Vec<String>) -> Self {
        Self {
            path: path.into(),
            slice,
        }
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.slice.is_empty()
    }
}

impl From<&str> for FullPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for FullPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}
