use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::{AttributeArray, AttributeError, AttributeSpec, Schema};

/// Names of attributes changed since a consumer last cleared the set.
///
/// Cloning the handle shares the underlying set; use [`DirtySet::all`] for
/// an independent one.
#[derive(Debug, Clone, Default)]
pub struct DirtySet(Rc<RefCell<BTreeSet<&'static str>>>);

impl DirtySet {
    /// A fresh set with every attribute of `schema` marked dirty.
    pub fn all(schema: &Schema) -> Self {
        Self(Rc::new(RefCell::new(schema.names().collect())))
    }

    pub fn mark(&self, name: &'static str) {
        self.0.borrow_mut().insert(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the current dirty names.
    pub fn names(&self) -> BTreeSet<&'static str> {
        self.0.borrow().clone()
    }

    /// Return the dirty names and clear the set.
    pub fn take(&self) -> BTreeSet<&'static str> {
        let names = std::mem::take(&mut *self.0.borrow_mut());
        tracing::trace!(count = names.len(), "dirty attributes consumed");
        names
    }

    /// True if both handles refer to the same set.
    pub fn is_shared_with(&self, other: &DirtySet) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Validated attribute values of one shape, keyed by attribute name.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    values: BTreeMap<&'static str, AttributeArray>,
}

impl AttributeStore {
    /// A store holding every attribute's promoted default value.
    pub fn with_defaults(schema: &Schema) -> Self {
        Self {
            values: schema
                .specs()
                .iter()
                .map(|spec| (spec.name, spec.default_array()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeArray> {
        self.values.get(name)
    }

    /// Validate `raw` against `spec` and store it, marking it dirty.
    ///
    /// On failure nothing changes.
    pub fn assign(
        &mut self,
        spec: &AttributeSpec,
        raw: AttributeArray,
        dirty: &DirtySet,
    ) -> Result<(), AttributeError> {
        let value = spec.validate(raw)?;
        self.values.insert(spec.name, value);
        dirty.mark(spec.name);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AttributeArray)> {
        self.values.iter().map(|(&name, value)| (name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DefaultValue, ElementType};

    fn schema() -> Schema {
        Schema::new(
            "Spheres",
            [
                AttributeSpec {
                    name: "positions",
                    element_type: ElementType::F32,
                    default: DefaultValue::Vector(&[0.0, 0.0, 0.0]),
                    rank: 2,
                    per_entity: true,
                    description: "Position of each particle",
                },
                AttributeSpec {
                    name: "radii",
                    element_type: ElementType::F32,
                    default: DefaultValue::Scalar(0.5),
                    rank: 1,
                    per_entity: true,
                    description: "Radius of each particle",
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn defaults_fill_every_attribute() {
        let schema = schema();
        let store = AttributeStore::with_defaults(&schema);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("positions").unwrap().shape(), &[1, 3]);
        assert_eq!(store.get("radii").unwrap().as_f32(), Some(&[0.5f32][..]));
    }

    #[test]
    fn new_dirty_set_marks_everything() {
        let dirty = DirtySet::all(&schema());
        assert!(dirty.contains("positions"));
        assert!(dirty.contains("radii"));
        assert_eq!(dirty.take().len(), 2);
        assert!(dirty.is_empty());
    }

    #[test]
    fn assign_marks_dirty() {
        let schema = schema();
        let mut store = AttributeStore::with_defaults(&schema);
        let dirty = DirtySet::all(&schema);
        dirty.take();

        let spec = schema.spec("radii").unwrap();
        store.assign(spec, vec![1.0, 2.0].into(), &dirty).unwrap();
        assert_eq!(store.get("radii").unwrap().shape(), &[2]);
        assert_eq!(dirty.names().into_iter().collect::<Vec<_>>(), ["radii"]);
    }

    #[test]
    fn failed_assign_keeps_previous_value() {
        let schema = schema();
        let mut store = AttributeStore::with_defaults(&schema);
        let dirty = DirtySet::all(&schema);
        dirty.take();

        let spec = schema.spec("positions").unwrap();
        store.assign(spec, vec![[1.0, 2.0, 3.0]].into(), &dirty).unwrap();
        dirty.take();

        let err = store.assign(spec, vec![[1.0, 2.0]].into(), &dirty);
        assert!(err.is_err());
        assert_eq!(
            store.get("positions").unwrap().rows::<3>(),
            Some(vec![[1.0, 2.0, 3.0]])
        );
        assert!(dirty.is_empty());
    }

    #[test]
    fn cloned_handles_share_the_set() {
        let dirty = DirtySet::all(&schema());
        let alias = dirty.clone();
        alias.take();
        assert!(dirty.is_empty());
        assert!(alias.is_shared_with(&dirty));
        assert!(!DirtySet::all(&schema()).is_shared_with(&dirty));
    }
}
