use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use glam::{Quat, Vec3};
use tableau_attr::{AttributeArray, AttributeError, AttributeStore, DirtySet, Schema, Selection};
use tableau_common::{SceneTransform, ShapeId};

use crate::PrimitiveKind;

/// A collection of entities of one primitive kind.
///
/// The attribute store sits behind a shared handle so that [`Shape::link`]
/// can hand the same data to several shapes, for instance one per backend
/// scene. Mutations through any linked shape are visible through all of
/// them; there is no locking and the last writer wins.
#[derive(Debug)]
pub struct Shape {
    id: ShapeId,
    kind: PrimitiveKind,
    store: Rc<RefCell<AttributeStore>>,
    dirty: DirtySet,
    transform: SceneTransform,
}

impl Shape {
    /// A shape holding every attribute's default, all marked dirty.
    pub fn new(kind: PrimitiveKind) -> Self {
        let schema = kind.schema();
        let mut shape = Self {
            id: ShapeId::new(),
            kind,
            store: Rc::new(RefCell::new(AttributeStore::with_defaults(schema))),
            dirty: DirtySet::all(schema),
            transform: SceneTransform::default(),
        };
        if let Err(err) = kind.initialize(&mut shape) {
            tracing::error!(%kind, %err, "primitive initializer rejected its own values");
        }
        shape
    }

    /// Build a shape and assign `attributes` in order.
    pub fn with_attributes<'a, I, V>(kind: PrimitiveKind, attributes: I) -> Result<Self, AttributeError>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<AttributeArray>,
    {
        let mut shape = Self::new(kind);
        for (name, value) in attributes {
            shape.set(name, value)?;
        }
        Ok(shape)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    /// A copy of the stored value of `name`.
    ///
    /// The store may be shared with linked shapes, so no borrow of it
    /// outlives this call.
    pub fn get(&self, name: &str) -> Option<AttributeArray> {
        self.store.borrow().get(name).cloned()
    }

    /// Stored value of an attribute the kind's schema declares.
    pub(crate) fn declared(&self, name: &str) -> AttributeArray {
        self.get(name)
            .unwrap_or_else(|| AttributeArray::from(Vec::<f32>::new()))
    }

    /// Validate `value` and store it under `name`, marking it dirty.
    ///
    /// On a validation failure the previous value stays in place.
    pub fn set(&mut self, name: &str, value: impl Into<AttributeArray>) -> Result<(), AttributeError> {
        let name = self.store_value(name, value.into())?;
        let kind = self.kind;
        kind.after_set(self, name)
    }

    /// Validate and store without running the kind's setter hooks.
    fn store_value(&mut self, name: &str, value: AttributeArray) -> Result<&'static str, AttributeError> {
        let spec = self.schema().require(name)?;
        self.store.borrow_mut().assign(spec, value, &self.dirty)?;
        Ok(spec.name)
    }

    /// A fresh shape holding exactly `values`. Hooks run only in the
    /// initializer, so derived attributes keep the values given here.
    fn from_values(
        kind: PrimitiveKind,
        values: Vec<(&'static str, AttributeArray)>,
        transform: SceneTransform,
    ) -> Result<Self, AttributeError> {
        let mut shape = Self::new(kind);
        for (name, value) in values {
            shape.store_value(name, value)?;
        }
        shape.transform = transform;
        Ok(shape)
    }

    /// Every attribute in schema order.
    pub fn attributes(&self) -> Vec<(&'static str, AttributeArray)> {
        let store = self.store.borrow();
        self.schema()
            .specs()
            .iter()
            .filter_map(|spec| store.get(spec.name).map(|v| (spec.name, v.clone())))
            .collect()
    }

    /// Number of entities in the collection. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        let store = self.store.borrow();
        self.schema()
            .specs()
            .iter()
            .filter(|spec| spec.per_entity)
            .filter_map(|spec| store.get(spec.name))
            .map(AttributeArray::outer_len)
            .filter(|&n| n > 1)
            .min()
            .unwrap_or(1)
    }

    /// A new shape of the same kind holding the selected entities.
    ///
    /// Per-entity arrays with an outer dimension of 1 are broadcast values
    /// and pass through unchanged, as do shared attributes.
    pub fn select(&self, selection: impl Into<Selection>) -> Result<Shape, AttributeError> {
        let selection = selection.into();
        let mut subset = Vec::with_capacity(self.schema().len());
        for (name, value) in self.attributes() {
            let spec = self.schema().require(name)?;
            let value = if spec.per_entity && spec.rank > 0 && value.outer_len() != 1 {
                let rows = selection.resolve(value.outer_len())?;
                value.select_rows(&rows)
            } else {
                value
            };
            subset.push((name, value));
        }
        Self::from_values(self.kind, subset, self.transform)
    }

    /// An independent shape with the same kind, values, and transform.
    pub fn copy(other: &Shape) -> Result<Shape, AttributeError> {
        Self::from_values(other.kind, other.attributes(), other.transform)
    }

    /// A new shape reading and writing `other`'s attribute store.
    ///
    /// With `share_redraw_state` the dirty set is shared too; otherwise the
    /// new shape starts with every attribute dirty.
    pub fn link(other: &Shape, share_redraw_state: bool) -> Shape {
        let dirty = if share_redraw_state {
            other.dirty.clone()
        } else {
            DirtySet::all(other.schema())
        };
        tracing::trace!(source = %other.id, share_redraw_state, "linking shape");
        Shape {
            id: ShapeId::new(),
            kind: other.kind,
            store: Rc::clone(&other.store),
            dirty,
            transform: other.transform,
        }
    }

    /// Assign every attribute of `other` that this kind also declares.
    ///
    /// Values are stored as given, without setter hooks. The scene-controlled translation and rotation are copied unless
    /// `ignore_scene_attrs` is set.
    pub fn copy_from(&mut self, other: &Shape, ignore_scene_attrs: bool) -> Result<(), AttributeError> {
        for (name, value) in other.attributes() {
            if self.schema().contains(name) {
                self.store_value(name, value)?;
            } else {
                tracing::debug!(attribute = name, from = %other.kind, to = %self.kind, "attribute not declared, skipped");
            }
        }
        if !ignore_scene_attrs {
            self.transform = other.transform;
        }
        Ok(())
    }

    pub fn is_linked_with(&self, other: &Shape) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }

    pub fn shares_redraw_state_with(&self, other: &Shape) -> bool {
        self.dirty.is_shared_with(&other.dirty)
    }

    pub fn dirty_attributes(&self) -> BTreeSet<&'static str> {
        self.dirty.names()
    }

    /// Return the dirty attribute names and clear them.
    pub fn take_dirty(&self) -> BTreeSet<&'static str> {
        self.dirty.take()
    }

    pub fn transform(&self) -> SceneTransform {
        self.transform
    }

    pub fn translation(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.transform.translation = translation;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disks() -> Shape {
        Shape::with_attributes(
            PrimitiveKind::Disks,
            [
                ("positions", AttributeArray::from(vec![[0.0f32, 0.0], [1.0, 0.0], [2.0, 0.0]])),
                ("radii", AttributeArray::from(vec![0.5f32, 1.0, 1.5])),
                ("outline", AttributeArray::from(0.1f32)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn defaults_are_broadcast() {
        let shape = Shape::new(PrimitiveKind::Spheres);
        assert_eq!(shape.len(), 1);
        assert_eq!(shape.get("positions").unwrap().shape(), &[1, 3]);
        assert_eq!(shape.dirty_attributes().len(), 3);
    }

    #[test]
    fn length_ignores_broadcast_attributes() {
        let shape = disks();
        assert_eq!(shape.len(), 3);
        assert_eq!(shape.get("colors").unwrap().outer_len(), 1);
    }

    #[test]
    fn length_is_shortest_varying_attribute() {
        let mut shape = disks();
        shape
            .set("colors", vec![[1.0f32, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]])
            .unwrap();
        assert_eq!(shape.len(), 2);
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let mut shape = disks();
        let err = shape.set("vertices", vec![[0.0f32, 0.0]]).unwrap_err();
        assert!(matches!(err, AttributeError::UnknownAttribute { .. }));
    }

    #[test]
    fn invalid_assignment_keeps_value() {
        let mut shape = disks();
        shape.take_dirty();
        assert!(shape.set("positions", vec![[0.0f32, 0.0, 0.0]]).is_err());
        assert_eq!(shape.get("positions").unwrap().outer_len(), 3);
        assert!(shape.dirty_attributes().is_empty());
    }

    #[test]
    fn select_single_index() {
        let sub = disks().select(1usize).unwrap();
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.get("positions").unwrap().rows::<2>(), Some(vec![[1.0, 0.0]]));
        assert_eq!(sub.get("radii").unwrap().as_f32(), Some(&[1.0f32][..]));
        assert_eq!(sub.get("outline").unwrap().first_f32(), Some(0.1));
    }

    #[test]
    fn select_reversed() {
        let sub = disks().select(Selection::reversed()).unwrap();
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.get("radii").unwrap().as_f32(), Some(&[1.5f32, 1.0, 0.5][..]));
    }

    #[test]
    fn select_mask_passes_broadcast_values_through() {
        let shape = disks();
        let sub = shape.select([true, false, true]).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(
            sub.get("positions").unwrap().rows::<2>(),
            Some(vec![[0.0, 0.0], [2.0, 0.0]])
        );
        assert_eq!(sub.get("colors"), shape.get("colors"));
        assert_eq!(sub.kind(), PrimitiveKind::Disks);
        assert_ne!(sub.id(), shape.id());
    }

    #[test]
    fn select_out_of_range_fails() {
        assert!(disks().select(7usize).is_err());
        assert!(disks().select([true, false]).is_err());
    }

    #[test]
    fn copy_does_not_alias() {
        let original = disks();
        let mut copy = Shape::copy(&original).unwrap();
        assert!(!copy.is_linked_with(&original));
        assert_eq!(copy.attributes(), original.attributes());

        copy.set("radii", vec![9.0f32, 9.0, 9.0]).unwrap();
        assert_eq!(
            original.get("radii").unwrap().as_f32(),
            Some(&[0.5f32, 1.0, 1.5][..])
        );
    }

    #[test]
    fn link_shares_store_and_redraw_state() {
        let mut original = disks();
        let linked = Shape::link(&original, true);
        assert!(linked.is_linked_with(&original));
        assert!(linked.shares_redraw_state_with(&original));

        linked.take_dirty();
        original.set("outline", 0.5f32).unwrap();
        assert_eq!(linked.get("outline").unwrap().first_f32(), Some(0.5));
        assert_eq!(
            linked.dirty_attributes().into_iter().collect::<Vec<_>>(),
            ["outline"]
        );
    }

    #[test]
    fn read_value_survives_write_through_link() {
        let original = disks();
        let mut linked = Shape::link(&original, true);
        let held = original.get("radii").unwrap();
        linked.set("radii", 2.0f32).unwrap();
        assert_eq!(held.as_f32(), Some(&[0.5f32, 1.0, 1.5][..]));
        assert_eq!(original.get("radii").unwrap().as_f32(), Some(&[2.0f32][..]));
    }

    #[test]
    fn link_without_redraw_state_starts_dirty() {
        let original = disks();
        original.take_dirty();
        let linked = Shape::link(&original, false);
        assert!(linked.is_linked_with(&original));
        assert!(!linked.shares_redraw_state_with(&original));
        assert_eq!(linked.dirty_attributes().len(), 4);
        assert!(original.dirty_attributes().is_empty());
    }

    #[test]
    fn copy_from_skips_undeclared_attributes() {
        let mut spheres = Shape::new(PrimitiveKind::Spheres);
        spheres.set_translation(Vec3::new(0.0, 0.0, -5.0));
        let mut disks = disks();
        disks.set_translation(Vec3::new(1.0, 2.0, 3.0));

        // disk positions are 2D; spheres need 3D, so copy the radii only
        let radii_only = Shape::with_attributes(
            PrimitiveKind::Spheres,
            [("radii", disks.get("radii").unwrap())],
        )
        .unwrap();
        spheres.copy_from(&radii_only, true).unwrap();
        assert_eq!(spheres.len(), 3);
        assert_eq!(spheres.translation(), Vec3::new(0.0, 0.0, -5.0));

        let mut other = Shape::new(PrimitiveKind::Disks);
        other.copy_from(&disks, false).unwrap();
        assert_eq!(other.translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(other.attributes(), disks.attributes());
    }

    #[test]
    fn copy_from_reports_shape_conflicts() {
        let mut spheres = Shape::new(PrimitiveKind::Spheres);
        let err = spheres.copy_from(&disks(), true).unwrap_err();
        assert!(matches!(err, AttributeError::ShapeMismatch { .. }));
    }
}
