//! Stable element identity.
//!
//! Ids are produced by a deterministic string hash so that the same
//! label yields the same id on every frame and on every platform. An
//! [`ElementId`] carries the final hash, the hash of the bare label
//! (`base_id`) and the numeric offset that was mixed in, which lets
//! list-rendered siblings share a `base_id` while remaining
//! individually addressable.

/// Identity triple for one element.
///
/// `id` is what the engine keys its tables on. `base_id` is shared by
/// every id derived from the same label regardless of index, and
/// `offset` is the index that was mixed into `id` (zero for plain
/// labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ElementId {
    pub id: u32,
    pub base_id: u32,
    pub offset: u32,
}

/// Hashes a label into an [`ElementId`] with offset zero.
pub fn element_id(label: &str) -> ElementId {
    let hash = finalize(accumulate(label.as_bytes(), 0));
    ElementId {
        id: hash.wrapping_add(1),
        base_id: hash.wrapping_add(1),
        offset: 0,
    }
}

/// Hashes a `(label, index)` pair into an [`ElementId`].
///
/// The `base_id` is identical to `element_id(label).base_id`; the final
/// `id` is distinct for each index and deterministic across calls.
pub fn element_id_with_index(label: &str, index: u32) -> ElementId {
    let base = accumulate(label.as_bytes(), 0);
    let mut hash = base.wrapping_add(index);
    hash = hash.wrapping_add(hash << 10);
    hash ^= hash >> 6;
    ElementId {
        id: finalize(hash).wrapping_add(1),
        base_id: finalize(base).wrapping_add(1),
        offset: index,
    }
}

/// Id for anonymous elements, derived from the parent id and the
/// child's position under it. Also used for per-line text command ids.
pub(crate) fn element_id_from_parent(offset: u32, parent_id: u32) -> ElementId {
    let mut hash = parent_id;
    hash = hash.wrapping_add(offset.wrapping_add(48));
    hash = hash.wrapping_add(hash << 10);
    hash ^= hash >> 6;
    ElementId {
        id: finalize(hash).wrapping_add(1),
        base_id: parent_id,
        offset,
    }
}

fn accumulate(data: &[u8], seed: u32) -> u32 {
    let mut hash = seed;
    for &byte in data {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash
}

fn finalize(mut hash: u32) -> u32 {
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}
