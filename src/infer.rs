use crate::merge::merge_types;
use alloc::{boxed::Box, vec::Vec};
use alloy_dyn_abi::{DynSolType, DynSolValue};

fn leading_zeros(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| **byte == 0).count()
}

fn trailing_zeros(bytes: &[u8]) -> usize {
    bytes.iter().rev().take_while(|byte| **byte == 0).count()
}

/// Narrows a 32-byte word to the most specific type its bit pattern
/// supports.
///
/// Order matters: the address band wins over the small-integer rule where
/// they overlap, and only words that are not left-padded are considered for
/// the short-byte-string reading.
fn narrow_word(word: &[u8]) -> DynSolType {
    let leading = leading_zeros(word);
    // 20 significant bytes, with slack for mined vanity addresses.
    if (12..=17).contains(&leading) {
        return DynSolType::Address;
    }
    if leading > 16 {
        return DynSolType::Uint(256);
    }
    let trailing = trailing_zeros(word);
    if trailing > 0 {
        return DynSolType::FixedBytes(32 - trailing);
    }
    DynSolType::FixedBytes(32)
}

/// Rewrites the coarse decoder vocabulary into concrete types, judging each
/// slot by the value that actually decoded there.
pub(crate) fn infer_types(params: &[DynSolType], values: &[DynSolValue]) -> Vec<DynSolType> {
    params.iter().zip(values).map(|(param, value)| infer_type(param, value)).collect()
}

fn infer_type(param: &DynSolType, value: &DynSolValue) -> DynSolType {
    match (param, value) {
        (DynSolType::Tuple(components), DynSolValue::Tuple(values)) => {
            DynSolType::Tuple(infer_types(components, values))
        }
        (DynSolType::Array(element), DynSolValue::Array(values)) => {
            let elements = vec![(**element).clone(); values.len()];
            let inferred = infer_types(&elements, values);
            DynSolType::Array(Box::new(merge_types(&inferred)))
        }
        (DynSolType::FixedBytes(32), DynSolValue::FixedBytes(word, _)) => {
            narrow_word(word.as_slice())
        }
        (DynSolType::Bytes, DynSolValue::Bytes(bytes)) => {
            if core::str::from_utf8(bytes).is_ok() {
                DynSolType::String
            } else {
                DynSolType::Bytes
            }
        }
        _ => param.clone(),
    }
}
