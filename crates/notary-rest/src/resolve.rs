//! Versioned address resolution.
//!
//! Grammar, consumed left to right:
//! ```text
//! v{N} / blocks [ / {blockId} [ / entries [ / {entryIndex} ] ] ]
//! ```
//! Block IDs are public identifiers; they are translated into positions by
//! subtracting the ID of the first block in the snapshot.

use std::fmt::Display;
use std::str::FromStr;

use notary_types::{Block, BlockId, Entry};

use crate::error::{RestError, RestResult};

/// Version strings accepted after the `v` prefix.
pub const SUPPORTED_VERSIONS: &[&str] = &["1"];

/// The object an address resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved<'a> {
    Blocks(&'a [Block]),
    Block(&'a Block),
    Entries(&'a [Entry]),
    Entry(&'a Entry),
    /// A block was selected but the next segment was not `entries`. Not an
    /// error, but nothing is addressed either; callers answer it as not found.
    Unmatched,
}

impl Resolved<'_> {
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched)
    }
}

/// Resolve address segments against a block snapshot.
pub fn resolve<'a, S: AsRef<str>>(segments: &[S], blocks: &'a [Block]) -> RestResult<Resolved<'a>> {
    let mut path = segments.iter().map(AsRef::as_ref);

    let spec = path.next().ok_or(RestError::MissingVersionSpec)?;
    let Some(version) = spec.strip_prefix('v') else {
        return Err(RestError::MalformedVersionSpec { spec: spec.to_owned() });
    };

    if !SUPPORTED_VERSIONS.iter().any(|v| *v == version) {
        return Err(RestError::UnsupportedVersionSpec { spec: spec.to_owned() });
    }
    resolve_v1(format!("/{spec}"), path, blocks)
}

fn resolve_v1<'a, 's>(
    context: String,
    mut path: impl Iterator<Item = &'s str>,
    blocks: &'a [Block],
) -> RestResult<Resolved<'a>> {
    let Some(root) = path.next() else {
        return Err(RestError::EmptyRequest { context });
    };
    if !root.eq_ignore_ascii_case("blocks") {
        return Err(RestError::BadElementSpec {
            element: root.to_owned(),
            context,
        });
    }

    in_blocks(format!("{context}/{root}"), path, blocks)
}

fn in_blocks<'a, 's>(
    context: String,
    mut path: impl Iterator<Item = &'s str>,
    blocks: &'a [Block],
) -> RestResult<Resolved<'a>> {
    let Some(sid) = path.next() else {
        return Ok(Resolved::Blocks(blocks));
    };
    let id = BlockId::new(parse_id(sid, &context)?);

    let not_found = || RestError::BlockNotFound {
        id: sid.to_owned(),
        context: context.clone(),
    };
    let base = blocks.first().ok_or_else(not_found)?.block_id;
    let block = id
        .offset_from(base)
        .and_then(|offset| usize::try_from(offset).ok())
        .and_then(|index| blocks.get(index))
        .ok_or_else(not_found)?;

    in_block(format!("{context}/{sid}"), path, block)
}

fn in_block<'a, 's>(
    context: String,
    mut path: impl Iterator<Item = &'s str>,
    block: &'a Block,
) -> RestResult<Resolved<'a>> {
    let Some(root) = path.next() else {
        return Ok(Resolved::Block(block));
    };
    if !root.eq_ignore_ascii_case("entries") {
        return Ok(Resolved::Unmatched);
    }

    in_entries(format!("{context}/{root}"), path, block)
}

fn in_entries<'a, 's>(
    context: String,
    mut path: impl Iterator<Item = &'s str>,
    block: &'a Block,
) -> RestResult<Resolved<'a>> {
    let Some(sid) = path.next() else {
        return Ok(Resolved::Entries(&block.entries));
    };
    let index: usize = parse_id(sid, &context)?;

    // Segments past the entry index are ignored.
    block
        .entry(index)
        .map(Resolved::Entry)
        .ok_or_else(|| RestError::EntryNotFound {
            id: sid.to_owned(),
            context,
        })
}

fn parse_id<T>(sid: &str, context: &str) -> RestResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    sid.parse().map_err(|e: T::Err| RestError::BadIdentifier {
        id: sid.to_owned(),
        context: context.to_owned(),
        reason: e.to_string(),
    })
}
