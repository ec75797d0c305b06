use crate::{
    merge::consistent_element,
    probe::{try_parse_length, try_parse_offset},
};
use alloc::{boxed::Box, vec::Vec};
use alloy_dyn_abi::{DynSolType, DynSolValue};

/// Deepest chain of sub-regions a branch may open before it is abandoned.
/// Well-formed calldata nests far shallower than this.
const MAX_DEPTH: usize = 32;

/// Attempts to decode `params` as an ABI parameter sequence against `data`.
///
/// This is the acceptance oracle for the whole search: a candidate type list
/// is only as good as the decoder's willingness to decode it.
pub(crate) fn try_decode(params: &[DynSolType], data: &[u8]) -> Option<Vec<DynSolValue>> {
    match DynSolType::Tuple(params.to_vec()).abi_decode_params(data) {
        Ok(DynSolValue::Tuple(values)) => Some(values),
        _ => None,
    }
}

/// Marker type for a zero-length dynamic region.
///
/// An empty byte string, an empty `string`, and an empty dynamic array all
/// encode as a bare zero length word, so no reading can be preferred.
pub(crate) fn ambiguous_empty() -> DynSolType {
    DynSolType::Array(Box::new(DynSolType::Tuple(Vec::new())))
}

/// Whether `ty` is the [`ambiguous_empty`] marker.
pub(crate) fn is_ambiguous_empty(ty: &DynSolType) -> bool {
    match ty {
        DynSolType::Array(inner) => {
            matches!(&**inner, DynSolType::Tuple(components) if components.is_empty())
        }
        _ => false,
    }
}

/// A head slot gathered during the head phase, awaiting tail resolution.
#[derive(Clone, Copy, Debug)]
enum Slot {
    /// A verbatim static word, reported as `bytes32`.
    Word,
    /// A pointer into the tail region. `length` is present when the word at
    /// `offset` also parses as a plausible length prefix.
    Dynamic { offset: usize, length: Option<usize> },
}

/// One region of calldata being decoded as a well-formed tuple.
///
/// The decoder walks the head words left to right, branching on every word
/// that probes as a dynamic pointer, and resolves the gathered tails once
/// the head is exhausted. The depth-first search lives entirely on the call
/// stack; `collected` is rebuilt on every branch so frames never share
/// state. Richer interpretations are tried first (length-prefixed pointer,
/// then bare pointer, then static word) and the oracle prunes the rest.
pub(crate) struct TupleDecoder<'a> {
    data: &'a [u8],
    depth: usize,
    /// Number of elements this region must yield, when it is the payload of
    /// a length-prefixed array.
    expected_length: Option<usize>,
    /// `Some(true)` when every element must carry its own length prefix,
    /// `Some(false)` when none may, `None` when both readings are open.
    dynamic_element: Option<bool>,
}

impl<'a> TupleDecoder<'a> {
    pub(crate) const fn new(data: &'a [u8]) -> Self {
        Self { data, depth: 0, expected_length: None, dynamic_element: None }
    }

    const fn subregion(
        &self,
        data: &'a [u8],
        expected_length: Option<usize>,
        dynamic_element: Option<bool>,
    ) -> Self {
        Self { data, depth: self.depth + 1, expected_length, dynamic_element }
    }

    /// Runs the search over the whole region.
    pub(crate) fn decode(&self) -> Option<Vec<DynSolType>> {
        if self.depth > MAX_DEPTH {
            return None;
        }
        self.step(0, Vec::new(), self.data.len())
    }

    /// Head phase: decide what the word at `param_idx` could be and recurse.
    ///
    /// `end_of_static` only ever shrinks: the moment an offset is accepted,
    /// every byte past it belongs to some tail and the head may not reach
    /// into it.
    fn step(
        &self,
        param_idx: usize,
        collected: Vec<Slot>,
        end_of_static: usize,
    ) -> Option<Vec<DynSolType>> {
        if self.expected_length.is_some_and(|n| collected.len() > n) {
            return None;
        }

        let pos = param_idx * 32;
        if pos >= end_of_static {
            return self.resolve_tails(&collected);
        }

        if let Some(offset) = try_parse_offset(self.data, pos) {
            let length = try_parse_length(self.data, offset);

            // A length prefix at the offset reads as `bytes`, `string`, or a
            // dynamic array; without one the tail can only be a tuple or a
            // statically sized sub-array.
            if length.is_some() && self.dynamic_element != Some(false) {
                let mut with = collected.clone();
                with.push(Slot::Dynamic { offset, length });
                let fragment = self.step(param_idx + 1, with, end_of_static.min(offset));
                if let Some(params) = self.verified(fragment) {
                    return Some(params);
                }
            }

            if self.dynamic_element != Some(true) {
                let mut without = collected.clone();
                without.push(Slot::Dynamic { offset, length: None });
                let fragment = self.step(param_idx + 1, without, end_of_static.min(offset));
                if let Some(params) = self.verified(fragment) {
                    return Some(params);
                }
            }
        }

        // Constrained array elements may not fall back to a static word.
        if self.dynamic_element.is_some() {
            return None;
        }

        let mut with = collected;
        with.push(Slot::Word);
        let fragment = self.step(param_idx + 1, with, end_of_static);
        self.verified(fragment)
    }

    /// Replays a candidate through the ABI decoder; only lists the decoder
    /// accepts may escape the frame.
    fn verified(&self, params: Option<Vec<DynSolType>>) -> Option<Vec<DynSolType>> {
        params.filter(|params| !params.is_empty() && try_decode(params, self.data).is_some())
    }

    /// Tail phase: expand every gathered dynamic slot into a concrete type.
    fn resolve_tails(&self, collected: &[Slot]) -> Option<Vec<DynSolType>> {
        if self.expected_length.is_some_and(|n| n != collected.len()) {
            return None;
        }

        let mut params = Vec::with_capacity(collected.len());
        for (idx, slot) in collected.iter().enumerate() {
            let &Slot::Dynamic { offset, length } = slot else {
                params.push(DynSolType::FixedBytes(32));
                continue;
            };

            // The slot's tail runs up to the next dynamic slot's offset, or
            // to the end of the region for the trailing one.
            let next_offset = collected[idx + 1..].iter().find_map(|slot| match slot {
                Slot::Dynamic { offset, .. } => Some(*offset),
                Slot::Word => None,
            });
            let start = offset + if length.is_some() { 32 } else { 0 };
            let end = next_offset.unwrap_or(self.data.len());
            let tail = &self.data[start.min(end)..end];

            params.push(self.resolve_slot(tail, length)?);
        }

        self.verified(Some(params))
    }

    /// Determines the type of a single dynamic region.
    fn resolve_slot(&self, tail: &'a [u8], length: Option<usize>) -> Option<DynSolType> {
        let Some(length) = length else {
            // No length prefix: not `bytes` and not a dynamic array, so the
            // region must be a tuple or a statically sized sub-array, which
            // encode identically.
            let mut inner = self.subregion(tail, None, None).decode()?;
            return Some(match inner.len() {
                1 => inner.remove(0),
                _ => DynSolType::Tuple(inner),
            });
        };

        if length == 0 {
            return Some(ambiguous_empty());
        }

        // A byte string either fills its region exactly or is zero-padded to
        // the next word boundary.
        let padding_ok = match tail.len().checked_sub(length) {
            Some(padding) => padding < 32 && tail[length..].iter().all(|byte| *byte == 0),
            None => true,
        };
        if length == tail.len() || (tail.len() % 32 == 0 && padding_ok) {
            return Some(DynSolType::Bytes);
        }

        self.resolve_array(tail, length)
    }

    /// A length-prefixed region that is not a byte string: try the three
    /// array readings and keep the simplest one whose elements agree.
    fn resolve_array(&self, tail: &'a [u8], length: usize) -> Option<DynSolType> {
        let mut candidates = Vec::new();

        // Elements that carry their own length prefix, e.g. `string[]`.
        if let Some(elements) = self.subregion(tail, Some(length), Some(true)).decode() {
            candidates.push(elements);
        }

        // Dynamically placed elements without a prefix, e.g. tuples with a
        // dynamic member.
        if let Some(elements) = self.subregion(tail, Some(length), Some(false)).decode() {
            candidates.push(elements);
        }

        // Statically sized elements: slice the region into `length` equal
        // windows and decode each window on its own. A window that fails to
        // decode fails the entire frame, not just this reading.
        if tail.len() % 32 == 0 {
            let stride = tail.len() / 32 / length * 32;
            let mut elements = Vec::with_capacity(length);
            for element in 0..length {
                let window = &tail[element * stride..(element + 1) * stride];
                let mut inner = self.subregion(window, None, None).decode()?;
                elements.push(match inner.len() {
                    1 => inner.remove(0),
                    _ => DynSolType::Tuple(inner),
                });
            }
            candidates.push(elements);
        }

        let mut survivors = candidates
            .into_iter()
            .filter_map(|candidate| {
                let element = consistent_element(&candidate)?;
                Some((candidate.len(), element))
            })
            .collect::<Vec<_>>();
        survivors.sort_by_key(|(len, _)| *len);

        let (_, element) = survivors.into_iter().next()?;
        Some(DynSolType::Array(Box::new(element)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    fn decode(data: &[u8]) -> Option<Vec<DynSolType>> {
        TupleDecoder::new(data).decode()
    }

    #[test]
    fn single_static_word() {
        let data =
            hex!("aabbccddeeffaabbccddeeffaabbccddeeffaabbccddeeffaabbccddeeffaabb");
        assert_eq!(decode(&data), Some(vec![DynSolType::FixedBytes(32)]));
    }

    #[test]
    fn offset_like_byte_string_is_not_an_array() {
        // `bytes` of `0x80`: the payload byte itself looks like an offset.
        let data = hex!(
            "0000000000000000000000000000000000000000000000000000000000000020"
            "0000000000000000000000000000000000000000000000000000000000000001"
            "8000000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(decode(&data), Some(vec![DynSolType::Bytes]));
    }

    #[test]
    fn zero_length_region_is_ambiguous() {
        let data = hex!(
            "0000000000000000000000000000000000000000000000000000000000000020"
            "0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(decode(&data), Some(vec![ambiguous_empty()]));
    }

    #[test]
    fn empty_region_fails() {
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn unaligned_head_fails() {
        let data = [0u8; 33];
        assert_eq!(decode(&data), None);
    }

    #[test]
    fn prefixed_element_array() {
        // `string[]` of ["hello", "world"], minus the selector.
        let data = hex!(
            "0000000000000000000000000000000000000000000000000000000000000020"
            "0000000000000000000000000000000000000000000000000000000000000002"
            "0000000000000000000000000000000000000000000000000000000000000040"
            "0000000000000000000000000000000000000000000000000000000000000080"
            "0000000000000000000000000000000000000000000000000000000000000005"
            "68656c6c6f000000000000000000000000000000000000000000000000000000"
            "0000000000000000000000000000000000000000000000000000000000000005"
            "776f726c64000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(
            decode(&data),
            Some(vec![DynSolType::Array(Box::new(DynSolType::Bytes))])
        );
    }

    #[test]
    fn ambiguous_empty_marker_shape() {
        assert!(is_ambiguous_empty(&ambiguous_empty()));
        assert!(!is_ambiguous_empty(&DynSolType::Bytes));
        assert!(!is_ambiguous_empty(&DynSolType::Array(Box::new(DynSolType::Bytes))));
        assert_eq!(ambiguous_empty().to_string(), "()[]");
    }
}
