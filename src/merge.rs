use crate::decode::is_ambiguous_empty;
use alloc::{boxed::Box, vec::Vec};
use alloy_dyn_abi::DynSolType;

/// Collapses sibling array-element candidates into the one type they all
/// agree on, or `None` when they disagree.
///
/// Dispatch follows the first element: tuples require tuples of the same
/// arity everywhere and merge component-wise, arrays strip one layer and
/// recurse, and leaves must match exactly, except that a zero-length region
/// marker counts as `bytes`.
pub(crate) fn consistent_element(params: &[DynSolType]) -> Option<DynSolType> {
    let first = params.first()?;
    match first {
        DynSolType::Tuple(components) => {
            let arity = components.len();
            let tuples = params
                .iter()
                .map(|param| match param {
                    DynSolType::Tuple(components) if components.len() == arity => {
                        Some(components.as_slice())
                    }
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;

            let mut merged = Vec::with_capacity(arity);
            for index in 0..arity {
                let column =
                    tuples.iter().map(|components| components[index].clone()).collect::<Vec<_>>();
                merged.push(consistent_element(&column)?);
            }
            Some(DynSolType::Tuple(merged))
        }
        DynSolType::Array(_) => {
            let elements = params
                .iter()
                .map(|param| match param {
                    DynSolType::Array(element) => Some((**element).clone()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?;
            Some(DynSolType::Array(Box::new(consistent_element(&elements)?)))
        }
        _ => params
            .iter()
            .map(|param| if is_ambiguous_empty(param) { &DynSolType::Bytes } else { param })
            .all(|param| param == first)
            .then(|| first.clone()),
    }
}

/// Greatest common denominator of a list of already-inferred types.
///
/// Used when the elements of one dynamic array refine to different concrete
/// types: the array is reported with the narrowest type that still covers
/// every element.
pub(crate) fn merge_types(types: &[DynSolType]) -> DynSolType {
    let Some(first) = types.first() else {
        return DynSolType::Tuple(Vec::new());
    };
    if types.len() == 1 {
        return first.clone();
    }

    let tuples = types
        .iter()
        .map(|ty| match ty {
            DynSolType::Tuple(components) => Some(components.as_slice()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>();
    if let Some(tuples) = tuples {
        let arity = tuples[0].len();
        if tuples.iter().all(|components| components.len() == arity) {
            let merged = (0..arity)
                .map(|index| {
                    let column = tuples
                        .iter()
                        .map(|components| components[index].clone())
                        .collect::<Vec<_>>();
                    merge_types(&column)
                })
                .collect();
            return DynSolType::Tuple(merged);
        }
    }

    let elements = types
        .iter()
        .map(|ty| match ty {
            DynSolType::Array(element) => Some((**element).clone()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>();
    if let Some(elements) = elements {
        return DynSolType::Array(Box::new(merge_types(&elements)));
    }

    if types.iter().all(|ty| ty == first) {
        return first.clone();
    }
    if types.contains(&DynSolType::Bytes) {
        return DynSolType::Bytes;
    }
    if types.contains(&DynSolType::Uint(256)) {
        return DynSolType::Uint(256);
    }
    DynSolType::FixedBytes(32)
}
