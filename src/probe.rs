use alloy_primitives::U256;

/// Words at or above this value are never accepted as offsets or lengths.
const MAX_SAFE_WORD: u64 = (1 << 53) - 1;

/// Reads the 32-byte word at `pos` as a big-endian integer.
///
/// `None` if the buffer does not hold a full word at `pos`, or if the value
/// is too large to be a meaningful position within calldata.
fn word_at(data: &[u8], pos: usize) -> Option<usize> {
    let word = data.get(pos..pos + 32)?;
    let value = u64::try_from(U256::from_be_slice(word)).ok()?;
    if value >= MAX_SAFE_WORD {
        return None;
    }
    usize::try_from(value).ok()
}

/// Probes the head word at `pos` for a plausible tail offset.
///
/// The offset must lie strictly past its own slot, within the buffer, and on
/// a 32-byte boundary.
pub(crate) fn try_parse_offset(data: &[u8], pos: usize) -> Option<usize> {
    let offset = word_at(data, pos)?;
    (offset > pos && offset < data.len() && offset % 32 == 0).then_some(offset)
}

/// Probes the word at `offset` for a plausible length prefix: the declared
/// payload must fit between the prefix and the end of the buffer.
pub(crate) fn try_parse_length(data: &[u8], offset: usize) -> Option<usize> {
    let length = word_at(data, offset)?;
    (offset.checked_add(32)?.checked_add(length)? <= data.len()).then_some(length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    fn words(values: &[u64]) -> alloc::vec::Vec<u8> {
        values.iter().flat_map(|v| U256::from(*v).to_be_bytes::<32>()).collect()
    }

    #[test]
    fn offset_must_be_aligned_and_in_bounds() {
        let data = words(&[64, 0, 0]);
        assert_eq!(try_parse_offset(&data, 0), Some(64));

        // points at itself
        let data = words(&[0, 32, 0]);
        assert_eq!(try_parse_offset(&data, 32), None);

        // past the end
        let data = words(&[96, 0, 0]);
        assert_eq!(try_parse_offset(&data, 0), None);

        // unaligned
        let data = words(&[33, 0, 0]);
        assert_eq!(try_parse_offset(&data, 0), None);
    }

    #[test]
    fn offset_rejects_huge_words() {
        let mut data = words(&[0, 0, 0]);
        data[0] = 0xff;
        assert_eq!(try_parse_offset(&data, 0), None);

        let data = words(&[(1 << 53) - 1, 0, 0]);
        assert_eq!(try_parse_offset(&data, 0), None);
    }

    #[test]
    fn offset_requires_a_full_word() {
        let data = words(&[64, 0, 0]);
        assert_eq!(try_parse_offset(&data[..80], 64), None);
        assert_eq!(try_parse_offset(&[], 0), None);
    }

    #[test]
    fn length_must_fit_the_buffer() {
        let data = words(&[0, 32, 0, 0]);
        assert_eq!(try_parse_length(&data, 32), Some(32));

        let data = words(&[0, 65, 0, 0]);
        assert_eq!(try_parse_length(&data, 32), None);

        let data = words(&[0, 0, 0, 0]);
        assert_eq!(try_parse_length(&data, 32), Some(0));
        assert_eq!(try_parse_length(&data, 128), None);
    }
}
