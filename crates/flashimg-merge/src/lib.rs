//! Conflict-merge engine for flash images.
//!
//! Reconciles two or more same-size binary images (typically flash dumps)
//! into a single composite image. A 0xFF byte is treated as erased (empty)
//! and always loses to the other image's value; equal bytes copy through;
//! two differing non-empty bytes are an unresolvable conflict that aborts
//! the merge.
//!
//! # Key entry points
//!
//! - [`merge_pair`] — merge exactly two equal-length streams
//! - [`merge_chain`] — merge N ≥ 2 streams by left-to-right pairwise folding
//! - [`MergeObserver`] — progress seam, kept outside the merge logic

pub mod chain;
pub mod error;
pub mod pair;

pub use chain::{merge_chain, merge_chain_observed, MergeSource};
pub use error::{MergeError, MergeResult};
pub use pair::{merge_pair, merge_pair_observed, MergeObserver, NullObserver, EMPTY_BYTE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_dump_fragments_reconcile() {
        let bootloader: &[u8] = &[0x05, 0xFF, 0xFF, 0x20];
        let kernel: &[u8] = &[0xFF, 0x10, 0xFF, 0x20];

        let mut image = Vec::new();
        let written = merge_pair(bootloader, kernel, &mut image).unwrap();

        assert_eq!(written, 4);
        assert_eq!(image, [0x05, 0x10, 0xFF, 0x20]);
    }

    #[test]
    fn overlapping_fragments_refuse_to_merge() {
        let err = merge_pair(&[0xAA][..], &[0xBB][..], Vec::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("offset 1 (0x1)"), "unexpected message: {msg}");
    }

    #[test]
    fn three_fragments_chain_into_one_image() {
        let fragments: Vec<MergeSource<&[u8]>> = vec![
            MergeSource::new(&[0xFF, 0xFF, 0x01, 0xFF][..], 4),
            MergeSource::new(&[0x02, 0xFF, 0xFF, 0xFF][..], 4),
            MergeSource::new(&[0xFF, 0x03, 0xFF, 0x04][..], 4),
        ];

        let mut image = Vec::new();
        merge_chain(fragments, &mut image).unwrap();
        assert_eq!(image, [0x02, 0x03, 0x01, 0x04]);
    }
}
