use crate::{
    decode::{try_decode, TupleDecoder},
    infer::infer_types,
};
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use alloy_dyn_abi::DynSolType;

/// Guesses the parameter types of a bare ABI-encoded parameter blob.
///
/// The blob is assumed to be well-formed: static head words first,
/// contiguous non-overlapping tails, zero padding up to the next 32-byte
/// word. Returns `None` when no type list decodes the data.
///
/// # Examples
///
/// ```
/// use abi_guesser::{guess_abi_encoded_data, DynSolType};
///
/// let data = abi_guesser::hex::decode(
///     "000000000000000000000000000000000000000000000000000000000000007b",
/// )
/// .unwrap();
/// assert_eq!(guess_abi_encoded_data(&data), Some(vec![DynSolType::Uint(256)]));
/// ```
pub fn guess_abi_encoded_data(data: &[u8]) -> Option<Vec<DynSolType>> {
    let params = TupleDecoder::new(data).decode()?;
    let values = try_decode(&params, data)?;
    Some(infer_types(&params, &values))
}

/// Guesses a full function fragment from selector-prefixed calldata.
///
/// Returns `guessed_<selector>(<types>)`, or `None` when the calldata is
/// shorter than a selector or its body cannot be decoded.
///
/// # Examples
///
/// ```
/// use abi_guesser::guess_fragment;
///
/// let calldata = abi_guesser::hex::decode(
///     "aabbccdd000000000000000000000000000000000000000000000000000000000000007b",
/// )
/// .unwrap();
/// assert_eq!(guess_fragment(&calldata).unwrap(), "guessed_aabbccdd(uint256)");
/// ```
pub fn guess_fragment(calldata: &[u8]) -> Option<String> {
    if calldata.len() < 4 {
        return None;
    }
    let params = guess_abi_encoded_data(&calldata[4..])?;
    let params = params.iter().map(|ty| ty.to_string()).collect::<Vec<_>>().join(",");
    Some(format!("guessed_{}({params})", hex::encode(&calldata[..4])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_selector() {
        assert_eq!(guess_fragment(&[]), None);
        assert_eq!(guess_fragment(&[0xaa, 0xbb, 0xcc]), None);
    }

    #[test]
    fn rejects_empty_body() {
        assert_eq!(guess_fragment(&[0xaa, 0xbb, 0xcc, 0xdd]), None);
    }
}
