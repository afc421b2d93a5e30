use std::collections::BTreeMap;

use crate::{AttributeArray, AttributeError, ElementType};

/// Heading of the generated attribute section of a primitive's docs.
pub const ATTRIBUTE_DOC_HEADER: &str = "This primitive has the following attributes:";

/// Default value of an attribute: a scalar or a fixed-width vector.
///
/// Its shape is the attribute's element shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Scalar(f32),
    Vector(&'static [f32]),
}

impl DefaultValue {
    pub fn element_shape(&self) -> Vec<usize> {
        match self {
            Self::Scalar(_) => Vec::new(),
            Self::Vector(v) => vec![v.len()],
        }
    }

    fn to_array(self) -> AttributeArray {
        match self {
            Self::Scalar(v) => AttributeArray::scalar(v),
            Self::Vector(v) => AttributeArray::from(v),
        }
    }
}

/// Static descriptor of one named attribute of a primitive kind.
///
/// `rank` is the number of axes a stored value has: 0 for a bare scalar,
/// 1 for a sequence of scalars or a single vector, 2 for a sequence of
/// vectors, 3 for a sequence of vector lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub element_type: ElementType,
    pub default: DefaultValue,
    pub rank: usize,
    pub per_entity: bool,
    pub description: &'static str,
}

impl AttributeSpec {
    pub fn element_shape(&self) -> Vec<usize> {
        self.default.element_shape()
    }

    /// The default value, promoted to this attribute's rank.
    pub fn default_array(&self) -> AttributeArray {
        self.default
            .to_array()
            .cast(self.element_type)
            .at_least_nd(self.rank)
    }

    /// Convert `raw` to this attribute's element type and rank.
    ///
    /// Rank 0 demands a true scalar. Higher ranks prepend size-1 axes to
    /// short inputs, then require exactly `rank` axes ending in the element
    /// shape.
    pub fn validate(&self, raw: AttributeArray) -> Result<AttributeArray, AttributeError> {
        let value = raw.cast(self.element_type);
        if self.rank == 0 {
            if value.ndim() != 0 {
                return Err(AttributeError::NonScalar {
                    name: self.name.to_string(),
                    shape: value.shape().to_vec(),
                });
            }
            return Ok(value);
        }

        let value = value.at_least_nd(self.rank);
        let expected = self.element_shape();
        let trailing = &value.shape()[value.ndim().saturating_sub(expected.len())..];
        if value.ndim() != self.rank || trailing != expected.as_slice() {
            return Err(AttributeError::ShapeMismatch {
                name: self.name.to_string(),
                shape: value.shape().to_vec(),
                expected,
                rank: self.rank,
            });
        }
        Ok(value)
    }
}

/// The ordered attribute table of one primitive kind, with name lookups.
#[derive(Debug, Clone)]
pub struct Schema {
    kind: &'static str,
    specs: Vec<AttributeSpec>,
    by_name: BTreeMap<&'static str, usize>,
    element_shapes: BTreeMap<&'static str, Vec<usize>>,
}

impl Schema {
    /// Build a schema. Attribute names must be unique.
    pub fn new(
        kind: &'static str,
        specs: impl IntoIterator<Item = AttributeSpec>,
    ) -> Result<Self, AttributeError> {
        let mut schema = Self {
            kind,
            specs: Vec::new(),
            by_name: BTreeMap::new(),
            element_shapes: BTreeMap::new(),
        };
        schema.push_all(specs)?;
        Ok(schema)
    }

    /// A schema for `kind` holding this schema's attributes followed by `specs`.
    pub fn extend(
        &self,
        kind: &'static str,
        specs: impl IntoIterator<Item = AttributeSpec>,
    ) -> Result<Self, AttributeError> {
        let mut schema = Self::new(kind, self.specs.iter().copied())?;
        schema.push_all(specs)?;
        Ok(schema)
    }

    /// Build a statically declared schema: `base`'s attributes followed by
    /// `own`.
    ///
    /// Declared tables are fixed at compile time and covered by tests; a
    /// repeated name is a programming error that panics in debug builds and
    /// is skipped in release builds.
    pub fn declare(kind: &'static str, base: Option<&Schema>, own: &[AttributeSpec]) -> Self {
        let mut schema = Self {
            kind,
            specs: Vec::new(),
            by_name: BTreeMap::new(),
            element_shapes: BTreeMap::new(),
        };
        let inherited = base.map(Schema::specs).unwrap_or_default();
        for spec in inherited.iter().chain(own) {
            let duplicate = schema.push_all([*spec]).is_err();
            debug_assert!(!duplicate, "attribute `{}` declared twice in `{kind}`", spec.name);
        }
        schema
    }

    fn push_all(
        &mut self,
        specs: impl IntoIterator<Item = AttributeSpec>,
    ) -> Result<(), AttributeError> {
        for spec in specs {
            if self.by_name.contains_key(spec.name) {
                return Err(AttributeError::DuplicateAttribute {
                    kind: self.kind.to_string(),
                    name: spec.name.to_string(),
                });
            }
            self.by_name.insert(spec.name, self.specs.len());
            self.element_shapes.insert(spec.name, spec.element_shape());
            self.specs.push(spec);
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn specs(&self) -> &[AttributeSpec] {
        &self.specs
    }

    pub fn spec(&self, name: &str) -> Option<&AttributeSpec> {
        self.by_name.get(name).map(|&i| &self.specs[i])
    }

    /// Look up `name`, failing with [`AttributeError::UnknownAttribute`].
    pub fn require(&self, name: &str) -> Result<&AttributeSpec, AttributeError> {
        self.spec(name).ok_or_else(|| AttributeError::UnknownAttribute {
            kind: self.kind.to_string(),
            name: name.to_string(),
        })
    }

    pub fn element_shape(&self, name: &str) -> Option<&[usize]> {
        self.element_shapes.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|s| s.name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The generated attribute section: a header and one line per attribute.
    pub fn attribute_docs(&self) -> String {
        let mut out = String::from(ATTRIBUTE_DOC_HEADER);
        for spec in &self.specs {
            out.push_str(&format!("\n* `{}`: {}", spec.name, spec.description));
        }
        out
    }

    /// Append the attribute section to `doc`, replacing any section a
    /// previous call appended.
    pub fn document(&self, doc: &str) -> String {
        let body = match doc.find(ATTRIBUTE_DOC_HEADER) {
            Some(at) => &doc[..at],
            None => doc,
        };
        let body = body.trim();
        if body.is_empty() {
            self.attribute_docs()
        } else {
            format!("{body}\n\n{}", self.attribute_docs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: AttributeSpec = AttributeSpec {
        name: "colors",
        element_type: ElementType::F32,
        default: DefaultValue::Vector(&[0.5, 0.5, 0.5, 1.0]),
        rank: 2,
        per_entity: true,
        description: "Color, RGBA, [0, 1] for each particle",
    };

    const RADII: AttributeSpec = AttributeSpec {
        name: "radii",
        element_type: ElementType::F32,
        default: DefaultValue::Scalar(0.5),
        rank: 1,
        per_entity: true,
        description: "Radius of each particle",
    };

    const OUTLINE: AttributeSpec = AttributeSpec {
        name: "outline",
        element_type: ElementType::F32,
        default: DefaultValue::Scalar(0.0),
        rank: 0,
        per_entity: false,
        description: "Outline width for all particles",
    };

    #[test]
    fn default_arrays_are_promoted() {
        assert_eq!(COLORS.default_array().shape(), &[1, 4]);
        assert_eq!(RADII.default_array().shape(), &[1]);
        assert_eq!(OUTLINE.default_array().shape(), &[] as &[usize]);
    }

    #[test]
    fn single_color_broadcasts() {
        let v = COLORS.validate([1.0, 0.0, 0.0, 1.0].into()).unwrap();
        assert_eq!(v.shape(), &[1, 4]);
    }

    #[test]
    fn per_entity_colors_keep_outer_axis() {
        let v = COLORS.validate(vec![[1.0, 0.0, 0.0, 1.0]; 5].into()).unwrap();
        assert_eq!(v.shape(), &[5, 4]);
    }

    #[test]
    fn wrong_vector_width_rejected() {
        let err = COLORS.validate(vec![[1.0, 0.0, 0.0]; 2].into()).unwrap_err();
        match err {
            AttributeError::ShapeMismatch { name, shape, expected, .. } => {
                assert_eq!(name, "colors");
                assert_eq!(shape, vec![2, 3]);
                assert_eq!(expected, vec![4]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn too_many_axes_rejected() {
        let raw = AttributeArray::from_shape_vec(vec![2, 3], vec![1.0f32; 6]).unwrap();
        assert!(matches!(
            RADII.validate(raw),
            Err(AttributeError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn scalar_attribute_requires_scalar() {
        assert!(OUTLINE.validate(0.25.into()).is_ok());
        let err = OUTLINE.validate([0.25, 0.5].into()).unwrap_err();
        assert!(matches!(err, AttributeError::NonScalar { .. }));
    }

    #[test]
    fn element_type_is_converted() {
        let indices = AttributeSpec {
            name: "indices",
            element_type: ElementType::U32,
            default: DefaultValue::Vector(&[0.0, 0.0, 0.0]),
            rank: 2,
            per_entity: false,
            description: "Triangle indices",
        };
        let v = indices.validate(vec![[0.0, 1.0, 2.0]].into()).unwrap();
        assert_eq!(v.as_u32(), Some(&[0u32, 1, 2][..]));
    }

    #[test]
    fn schema_lookup_tables() {
        let schema = Schema::new("Disks", [COLORS, RADII, OUTLINE]).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.spec("radii").map(|s| s.rank), Some(1));
        assert_eq!(schema.element_shape("colors"), Some(&[4][..]));
        assert!(schema.require("bogus").is_err());
        assert_eq!(schema.names().collect::<Vec<_>>(), ["colors", "radii", "outline"]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = Schema::new("Bad", [RADII, RADII]).unwrap_err();
        assert!(matches!(err, AttributeError::DuplicateAttribute { .. }));

        let base = Schema::new("Base", [RADII]).unwrap();
        assert!(base.extend("Derived", [RADII]).is_err());
        let derived = base.extend("Derived", [OUTLINE]).unwrap();
        assert_eq!(derived.names().collect::<Vec<_>>(), ["radii", "outline"]);
    }

    #[test]
    fn declared_schema_inherits_base() {
        let base = Schema::declare("Spheres", None, &[COLORS, RADII]);
        let derived = Schema::declare("Patchy", Some(&base), &[OUTLINE]);
        assert_eq!(derived.kind(), "Patchy");
        assert_eq!(derived.names().collect::<Vec<_>>(), ["colors", "radii", "outline"]);
        assert_eq!(derived.element_shape("colors"), Some(&[4][..]));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn documentation_is_regenerated_not_duplicated() {
        let schema = Schema::new("Disks", [COLORS, RADII]).unwrap();
        let once = schema.document("A collection of disks.");
        let twice = schema.document(&once);
        assert_eq!(once, twice);
        assert_eq!(once.matches(ATTRIBUTE_DOC_HEADER).count(), 1);
        assert!(once.contains("* `radii`: Radius of each particle"));

        let extended = schema.extend("Rings", [OUTLINE]).unwrap();
        let redone = extended.document(&once);
        assert_eq!(redone.matches(ATTRIBUTE_DOC_HEADER).count(), 1);
        assert!(redone.contains("`outline`"));
    }
}
