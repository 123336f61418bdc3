//! N-way merge by left-to-right pairwise reduction.

use std::io::{Read, Write};

use tracing::warn;

use crate::error::{MergeError, MergeResult};
use crate::pair::{merge_pair_observed, MergeObserver, NullObserver};

/// One input to an N-way merge: a readable stream plus its length as
/// reported by the caller's size oracle.
pub struct MergeSource<R> {
    pub reader: R,
    pub len: u64,
}

impl<R> MergeSource<R> {
    pub fn new(reader: R, len: u64) -> Self {
        Self { reader, len }
    }
}

/// Merge two or more equal-length streams into `out`.
///
/// Folds strictly left to right: the running result is merged with each
/// following input in turn, so when several inputs conflict the reported
/// conflict is always the one found by the earliest pairwise step. Each
/// intermediate result is materialized in memory before the next step
/// reads it.
///
/// Declared lengths are validated before any byte is read; the first
/// failing pairwise merge aborts the whole chain with its own, local
/// offset. Returns the number of bytes written.
pub fn merge_chain<R, W>(sources: Vec<MergeSource<R>>, out: W) -> MergeResult<u64>
where
    R: Read,
    W: Write,
{
    merge_chain_observed(sources, out, &mut NullObserver)
}

/// Like [`merge_chain`], reporting per-step progress to `observer`.
pub fn merge_chain_observed<R, W>(
    sources: Vec<MergeSource<R>>,
    mut out: W,
    observer: &mut dyn MergeObserver,
) -> MergeResult<u64>
where
    R: Read,
    W: Write,
{
    if sources.len() < 2 {
        return Err(MergeError::NotEnoughInputs(sources.len()));
    }

    let expected = sources[0].len;
    for (index, source) in sources.iter().enumerate() {
        if source.len != expected {
            return Err(MergeError::SizeMismatch {
                index,
                expected,
                actual: source.len,
            });
        }
    }

    let mut inputs = sources.into_iter().enumerate();
    let mut acc = match inputs.next() {
        Some((_, first)) => {
            let mut buf = Vec::with_capacity(expected as usize);
            let mut reader = first.reader;
            reader
                .read_to_end(&mut buf)
                .map_err(|source| MergeError::Io { index: 0, source })?;
            buf
        }
        None => return Err(MergeError::NotEnoughInputs(0)),
    };

    for (index, source) in inputs {
        let mut next = Vec::with_capacity(acc.len());
        merge_pair_observed(acc.as_slice(), source.reader, &mut next, observer)
            .map_err(|err| attribute_to(err, index))?;
        acc = next;
    }

    if acc.len() as u64 != expected {
        warn!(
            expected,
            actual = acc.len(),
            "merged image size differs from the expected input size"
        );
    }

    out.write_all(&acc).map_err(MergeError::Output)?;
    Ok(acc.len() as u64)
}

/// Re-attribute a pairwise I/O failure to the chain-level stream index.
///
/// Within a pairwise step the right-hand input (index 1) is `streams[k]`;
/// the left-hand input is the in-memory accumulator, whose reads are
/// infallible.
fn attribute_to(err: MergeError, right_index: usize) -> MergeError {
    match err {
        MergeError::Io { index: 1, source } => MergeError::Io {
            index: right_index,
            source,
        },
        other => other,
    }
}
