/// A single slot in the table's bucket array.
///
/// `hop_info` describes which offsets in *this* bucket's neighborhood window
/// are occupied by entries whose home is this bucket — it says nothing about
/// what, if anything, is stored here. `slot` holds the pair actually living
/// in the bucket, which may belong to a lower-indexed home.
use crate::bitmap::NeighborhoodBitmap;

#[derive(Clone, Debug)]
pub struct Bucket<K, V> {
    pub hop_info: NeighborhoodBitmap,
    pub slot: Option<(K, V)>,
}

impl<K, V> Bucket<K, V> {
    pub const fn empty() -> Self {
        Bucket {
            hop_info: NeighborhoodBitmap::empty(),
            slot: None,
        }
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.slot.is_some()
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}
