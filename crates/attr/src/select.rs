use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::SelectionError;

/// A selection of entities along an array's outer axis.
///
/// Mirrors the usual array indexing forms: a single (possibly negative)
/// index, a strided slice, a boolean mask, or an explicit index list.
/// A single index still selects a one-entity collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Index(isize),
    Slice {
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    },
    Mask(Vec<bool>),
    Indices(Vec<isize>),
}

impl Selection {
    pub fn slice(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self::Slice { start, stop, step }
    }

    /// Every entity, last to first.
    pub fn reversed() -> Self {
        Self::slice(None, None, -1)
    }

    /// Resolve into concrete row indices for an axis of length `len`.
    pub fn resolve(&self, len: usize) -> Result<Vec<usize>, SelectionError> {
        match self {
            Self::Index(i) => Ok(vec![normalize(*i, len)?]),
            Self::Indices(list) => list.iter().map(|&i| normalize(i, len)).collect(),
            Self::Mask(mask) => {
                if mask.len() != len {
                    return Err(SelectionError::MaskLength {
                        mask: mask.len(),
                        len,
                    });
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect())
            }
            Self::Slice { start, stop, step } => slice_indices(*start, *stop, *step, len),
        }
    }
}

fn normalize(index: isize, len: usize) -> Result<usize, SelectionError> {
    let n = len as isize;
    let resolved = if index < 0 { index + n } else { index };
    if resolved < 0 || resolved >= n {
        return Err(SelectionError::IndexOutOfBounds { index, len });
    }
    Ok(resolved as usize)
}

/// Clamp a slice bound the way sequence slicing does: negative values
/// count from the end, and out-of-range values saturate.
fn clamp_bound(bound: isize, len: isize, lower: isize, upper: isize) -> isize {
    let b = if bound < 0 { bound + len } else { bound };
    b.clamp(lower, upper)
}

fn slice_indices(
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
    len: usize,
) -> Result<Vec<usize>, SelectionError> {
    if step == 0 {
        return Err(SelectionError::ZeroStep);
    }
    let n = len as isize;
    let mut out = Vec::new();
    if step > 0 {
        let start = start.map_or(0, |s| clamp_bound(s, n, 0, n));
        let stop = stop.map_or(n, |s| clamp_bound(s, n, 0, n));
        let mut i = start;
        while i < stop {
            out.push(i as usize);
            i += step;
        }
    } else {
        let start = start.map_or(n - 1, |s| clamp_bound(s, n, -1, n - 1));
        let stop = stop.map_or(-1, |s| clamp_bound(s, n, -1, n - 1));
        let mut i = start;
        while i > stop {
            out.push(i as usize);
            i += step;
        }
    }
    Ok(out)
}

impl From<usize> for Selection {
    fn from(i: usize) -> Self {
        Self::Index(i as isize)
    }
}

impl From<isize> for Selection {
    fn from(i: isize) -> Self {
        Self::Index(i)
    }
}

impl From<Range<usize>> for Selection {
    fn from(r: Range<usize>) -> Self {
        Self::slice(Some(r.start as isize), Some(r.end as isize), 1)
    }
}

impl From<RangeFrom<usize>> for Selection {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::slice(Some(r.start as isize), None, 1)
    }
}

impl From<RangeTo<usize>> for Selection {
    fn from(r: RangeTo<usize>) -> Self {
        Self::slice(None, Some(r.end as isize), 1)
    }
}

impl From<RangeFull> for Selection {
    fn from(_: RangeFull) -> Self {
        Self::slice(None, None, 1)
    }
}

impl From<Vec<bool>> for Selection {
    fn from(mask: Vec<bool>) -> Self {
        Self::Mask(mask)
    }
}

impl<const N: usize> From<[bool; N]> for Selection {
    fn from(mask: [bool; N]) -> Self {
        Self::Mask(mask.to_vec())
    }
}

impl From<Vec<isize>> for Selection {
    fn from(indices: Vec<isize>) -> Self {
        Self::Indices(indices)
    }
}
