/// Declares a typed wrapper over [`Shape`](crate::Shape) for one primitive
/// kind.
///
/// Each attribute line reads `getter / setter = "label" { type, default,
/// rank N, per_entity | shared, "description" }`. An optional
/// `extends [getter / setter = "label", ...]` list names the accessors for
/// attributes inherited from the parent kind's schema. A getter written as
/// `_` is left out so the kind can define its own.
///
/// The wrapper gets the kind's own attribute table as `OWN_ATTRIBUTES`,
/// generated attribute docs, validated accessors, and conversions to and
/// from `Shape`.
macro_rules! primitive {
    (@ty f32) => { ::tableau_attr::ElementType::F32 };
    (@ty u32) => { ::tableau_attr::ElementType::U32 };
    (@per per_entity) => { true };
    (@per shared) => { false };
    (@default [$($v:literal),* $(,)?]) => {
        ::tableau_attr::DefaultValue::Vector(&[$($v),*])
    };
    (@default $v:literal) => { ::tableau_attr::DefaultValue::Scalar($v) };
    (@getter _, $label:literal, $desc:literal) => {};
    (@getter $get:ident, $label:literal, $desc:literal) => {
        #[doc = $desc]
        pub fn $get(&self) -> ::tableau_attr::AttributeArray {
            self.0.declared($label)
        }
    };

    (
        $(#[$meta:meta])*
        pub struct $name:ident($kind:ident)
        $(extends [$($iget:ident / $iset:ident = $ilabel:literal),* $(,)?])?
        {
            $(
                $get:tt / $set:ident = $label:literal {
                    $ty:ident, $default:tt, rank $rank:literal, $per:ident, $desc:literal $(,)?
                }
            )*
        }
    ) => {
        $(#[$meta])*
        #[doc = ""]
        #[doc = "This primitive has the following attributes:"]
        #[doc = ""]
        $($(#[doc = concat!("* `", $ilabel, "` (inherited)")])*)?
        $(#[doc = concat!("* `", $label, "`: ", $desc)])*
        #[derive(Debug)]
        pub struct $name($crate::Shape);

        impl $name {
            pub const KIND: $crate::PrimitiveKind = $crate::PrimitiveKind::$kind;

            /// Attributes declared by this kind itself, after any inherited ones.
            pub const OWN_ATTRIBUTES: &'static [::tableau_attr::AttributeSpec] = &[
                $(
                    ::tableau_attr::AttributeSpec {
                        name: $label,
                        element_type: primitive!(@ty $ty),
                        default: primitive!(@default $default),
                        rank: $rank,
                        per_entity: primitive!(@per $per),
                        description: $desc,
                    },
                )*
            ];

            pub fn new() -> Self {
                Self($crate::Shape::new(Self::KIND))
            }

            /// Build from `(name, value)` pairs; unnamed attributes keep
            /// their defaults.
            pub fn from_attributes<'a, I, V>(
                attributes: I,
            ) -> Result<Self, ::tableau_attr::AttributeError>
            where
                I: IntoIterator<Item = (&'a str, V)>,
                V: Into<::tableau_attr::AttributeArray>,
            {
                $crate::Shape::with_attributes(Self::KIND, attributes).map(Self)
            }

            pub fn copy(other: &Self) -> Result<Self, ::tableau_attr::AttributeError> {
                $crate::Shape::copy(&other.0).map(Self)
            }

            pub fn link(other: &Self, share_redraw_state: bool) -> Self {
                Self($crate::Shape::link(&other.0, share_redraw_state))
            }

            pub fn select(
                &self,
                selection: impl Into<::tableau_attr::Selection>,
            ) -> Result<Self, ::tableau_attr::AttributeError> {
                self.0.select(selection).map(Self)
            }

            pub fn as_shape(&self) -> &$crate::Shape {
                &self.0
            }

            pub fn into_shape(self) -> $crate::Shape {
                self.0
            }

            $($(
                pub fn $iget(&self) -> ::tableau_attr::AttributeArray {
                    self.0.declared($ilabel)
                }

                pub fn $iset(
                    &mut self,
                    value: impl Into<::tableau_attr::AttributeArray>,
                ) -> Result<(), ::tableau_attr::AttributeError> {
                    self.0.set($ilabel, value)
                }
            )*)?

            $(
                primitive!(@getter $get, $label, $desc);

                #[doc = concat!("Validate and store `", $label, "`.")]
                pub fn $set(
                    &mut self,
                    value: impl Into<::tableau_attr::AttributeArray>,
                ) -> Result<(), ::tableau_attr::AttributeError> {
                    self.0.set($label, value)
                }
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::Shape;

            fn deref(&self) -> &$crate::Shape {
                &self.0
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut $crate::Shape {
                &mut self.0
            }
        }

        impl From<$name> for $crate::Shape {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<$crate::Shape> for $name {
            type Error = $crate::ShapeError;

            fn try_from(shape: $crate::Shape) -> Result<Self, Self::Error> {
                if shape.kind() != Self::KIND {
                    return Err($crate::ShapeError::KindMismatch {
                        expected: Self::KIND,
                        actual: shape.kind(),
                    });
                }
                Ok(Self(shape))
            }
        }
    };
}
