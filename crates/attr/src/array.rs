use serde::{Deserialize, Serialize};

use crate::AttributeError;

/// Scalar element type of an attribute's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    F32,
    U32,
}

impl ElementType {
    pub fn name(self) -> &'static str {
        match self {
            Self::F32 => "float32",
            Self::U32 => "uint32",
        }
    }

    /// Size in bytes of one element.
    pub fn size(self) -> usize {
        4
    }
}

/// Flat, row-major element storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrayData {
    F32(Vec<f32>),
    U32(Vec<u32>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Self::F32(_) => ElementType::F32,
            Self::U32(_) => ElementType::U32,
        }
    }

    fn cast(self, ty: ElementType) -> Self {
        match (self, ty) {
            (Self::F32(v), ElementType::U32) => Self::U32(v.into_iter().map(|x| x as u32).collect()),
            (Self::U32(v), ElementType::F32) => Self::F32(v.into_iter().map(|x| x as f32).collect()),
            (data, _) => data,
        }
    }

    /// Copy the rows (chunks of `row_len` elements) at `rows`, in order.
    fn gather(&self, rows: &[usize], row_len: usize) -> Self {
        fn pick<T: Copy>(v: &[T], rows: &[usize], row_len: usize) -> Vec<T> {
            let mut out = Vec::with_capacity(rows.len() * row_len);
            for &r in rows {
                out.extend_from_slice(&v[r * row_len..(r + 1) * row_len]);
            }
            out
        }
        match self {
            Self::F32(v) => Self::F32(pick(v, rows, row_len)),
            Self::U32(v) => Self::U32(pick(v, rows, row_len)),
        }
    }
}

impl From<Vec<f32>> for ArrayData {
    fn from(v: Vec<f32>) -> Self {
        Self::F32(v)
    }
}

impl From<Vec<u32>> for ArrayData {
    fn from(v: Vec<u32>) -> Self {
        Self::U32(v)
    }
}

/// An n-dimensional array of attribute values.
///
/// The outer axis, when present, indexes entities for per-entity
/// attributes. A 0-dimensional array is a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl AttributeArray {
    /// Build an array from a shape and flat row-major data.
    pub fn from_shape_vec(
        shape: Vec<usize>,
        data: impl Into<ArrayData>,
    ) -> Result<Self, AttributeError> {
        let data = data.into();
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(AttributeError::DataLength {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn scalar(value: f32) -> Self {
        Self {
            shape: Vec::new(),
            data: ArrayData::F32(vec![value]),
        }
    }

    /// An `(n, k)` array holding `n` copies of `row`.
    pub fn repeat_row(row: &[f32], n: usize) -> Self {
        let mut data = Vec::with_capacity(row.len() * n);
        for _ in 0..n {
            data.extend_from_slice(row);
        }
        Self {
            shape: vec![n, row.len()],
            data: ArrayData::F32(data),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Size of the outer axis; 1 for scalars.
    pub fn outer_len(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Number of elements in one outer row.
    pub fn row_len(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            ArrayData::F32(v) => Some(v),
            ArrayData::U32(_) => None,
        }
    }

    pub fn as_u32(&self) -> Option<&[u32]> {
        match &self.data {
            ArrayData::U32(v) => Some(v),
            ArrayData::F32(_) => None,
        }
    }

    /// All elements converted to `f32`, row-major.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match &self.data {
            ArrayData::F32(v) => v.clone(),
            ArrayData::U32(v) => v.iter().map(|&x| x as f32).collect(),
        }
    }

    /// First element as `f32`, if the array is non-empty.
    pub fn first_f32(&self) -> Option<f32> {
        match &self.data {
            ArrayData::F32(v) => v.first().copied(),
            ArrayData::U32(v) => v.first().map(|&x| x as f32),
        }
    }

    /// Rows of a 2-dimensional array with `N` columns, as `f32`.
    pub fn rows<const N: usize>(&self) -> Option<Vec<[f32; N]>> {
        if self.ndim() != 2 || self.shape[1] != N {
            return None;
        }
        let flat = self.to_f32_vec();
        Some(
            flat.chunks_exact(N)
                .map(|c| {
                    let mut row = [0.0; N];
                    row.copy_from_slice(c);
                    row
                })
                .collect(),
        )
    }

    /// Raw element bytes, as a backend would upload them.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.data {
            ArrayData::F32(v) => bytemuck::cast_slice(v),
            ArrayData::U32(v) => bytemuck::cast_slice(v),
        }
    }

    /// Apply `f` to every element, producing an `f32` array of the same shape.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            shape: self.shape.clone(),
            data: ArrayData::F32(self.to_f32_vec().into_iter().map(f).collect()),
        }
    }

    /// Convert elements to `ty`. Float to integer conversion truncates.
    pub fn cast(self, ty: ElementType) -> Self {
        Self {
            shape: self.shape,
            data: self.data.cast(ty),
        }
    }

    /// Prepend size-1 axes until the array has at least `n` axes.
    pub fn at_least_nd(mut self, n: usize) -> Self {
        while self.shape.len() < n {
            self.shape.insert(0, 1);
        }
        self
    }

    /// New array made of the outer rows at `rows`. Indices must be in range.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut shape = self.shape.clone();
        if let Some(outer) = shape.first_mut() {
            *outer = rows.len();
        }
        Self {
            shape,
            data: self.data.gather(rows, self.row_len()),
        }
    }
}

impl From<f32> for AttributeArray {
    fn from(v: f32) -> Self {
        Self::scalar(v)
    }
}

impl From<u32> for AttributeArray {
    fn from(v: u32) -> Self {
        Self {
            shape: Vec::new(),
            data: ArrayData::U32(vec![v]),
        }
    }
}

impl From<Vec<f32>> for AttributeArray {
    fn from(v: Vec<f32>) -> Self {
        Self {
            shape: vec![v.len()],
            data: ArrayData::F32(v),
        }
    }
}

impl From<&[f32]> for AttributeArray {
    fn from(v: &[f32]) -> Self {
        Self::from(v.to_vec())
    }
}

impl From<Vec<u32>> for AttributeArray {
    fn from(v: Vec<u32>) -> Self {
        Self {
            shape: vec![v.len()],
            data: ArrayData::U32(v),
        }
    }
}

impl<const N: usize> From<[f32; N]> for AttributeArray {
    fn from(v: [f32; N]) -> Self {
        Self::from(v.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for AttributeArray {
    fn from(v: [u32; N]) -> Self {
        Self::from(v.to_vec())
    }
}

impl<const N: usize> From<Vec<[f32; N]>> for AttributeArray {
    fn from(v: Vec<[f32; N]>) -> Self {
        Self {
            shape: vec![v.len(), N],
            data: ArrayData::F32(v.into_iter().flatten().collect()),
        }
    }
}

impl<const N: usize> From<&[[f32; N]]> for AttributeArray {
    fn from(v: &[[f32; N]]) -> Self {
        Self::from(v.to_vec())
    }
}

impl<const N: usize, const M: usize> From<[[f32; N]; M]> for AttributeArray {
    fn from(v: [[f32; N]; M]) -> Self {
        Self::from(v.to_vec())
    }
}

impl<const N: usize> From<Vec<[u32; N]>> for AttributeArray {
    fn from(v: Vec<[u32; N]>) -> Self {
        Self {
            shape: vec![v.len(), N],
            data: ArrayData::U32(v.into_iter().flatten().collect()),
        }
    }
}

impl<const N: usize, const M: usize> From<[[u32; N]; M]> for AttributeArray {
    fn from(v: [[u32; N]; M]) -> Self {
        Self::from(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_from_literals() {
        assert_eq!(AttributeArray::from(0.5).shape(), &[] as &[usize]);
        assert_eq!(AttributeArray::from([1.0, 2.0, 3.0]).shape(), &[3]);
        assert_eq!(
            AttributeArray::from(vec![[0.0, 0.0], [1.0, 2.0], [2.0, 4.0]]).shape(),
            &[3, 2]
        );
        assert_eq!(AttributeArray::from([[0u32, 1, 2]]).shape(), &[1, 3]);
    }

    #[test]
    fn from_shape_vec_checks_length() {
        assert!(AttributeArray::from_shape_vec(vec![2, 3], vec![0.0f32; 6]).is_ok());
        let err = AttributeArray::from_shape_vec(vec![2, 3], vec![0.0f32; 5]).unwrap_err();
        assert!(matches!(err, AttributeError::DataLength { expected: 6, actual: 5, .. }));
    }

    #[test]
    fn at_least_nd_prepends_axes() {
        let a = AttributeArray::from([0.5, 0.5, 0.5, 1.0]).at_least_nd(2);
        assert_eq!(a.shape(), &[1, 4]);
        let s = AttributeArray::scalar(2.0).at_least_nd(1);
        assert_eq!(s.shape(), &[1]);
        // already high enough: untouched
        let m = AttributeArray::from(vec![[1.0, 2.0]; 3]).at_least_nd(1);
        assert_eq!(m.shape(), &[3, 2]);
    }

    #[test]
    fn cast_truncates_floats() {
        let a = AttributeArray::from([1.7, 2.2]).cast(ElementType::U32);
        assert_eq!(a.as_u32(), Some(&[1u32, 2][..]));
        let b = a.cast(ElementType::F32);
        assert_eq!(b.as_f32(), Some(&[1.0f32, 2.0][..]));
    }

    #[test]
    fn select_rows_gathers_in_order() {
        let a = AttributeArray::from(vec![[0.0, 0.0], [1.0, 2.0], [2.0, 4.0]]);
        let picked = a.select_rows(&[2, 0]);
        assert_eq!(picked.shape(), &[2, 2]);
        assert_eq!(picked.rows::<2>(), Some(vec![[2.0, 4.0], [0.0, 0.0]]));
    }

    #[test]
    fn rows_requires_matching_width() {
        let a = AttributeArray::from(vec![[1.0, 2.0, 3.0]]);
        assert!(a.rows::<2>().is_none());
        assert_eq!(a.rows::<3>(), Some(vec![[1.0, 2.0, 3.0]]));
    }

    #[test]
    fn bytes_view_matches_element_count() {
        let a = AttributeArray::from(vec![[0.0, 1.0, 2.0, 3.0]; 2]);
        assert_eq!(a.as_bytes().len(), 8 * ElementType::F32.size());
    }

    #[test]
    fn map_keeps_shape() {
        let a = AttributeArray::from(vec![1.0, 2.0]).map(|r| 2.0 * r);
        assert_eq!(a.shape(), &[2]);
        assert_eq!(a.as_f32(), Some(&[2.0f32, 4.0][..]));
    }

    #[test]
    fn repeat_row_builds_matrix() {
        let a = AttributeArray::repeat_row(&[0.0, 0.0, 0.0, 1.0], 12);
        assert_eq!(a.shape(), &[12, 4]);
        assert_eq!(a.outer_len(), 12);
    }
}
