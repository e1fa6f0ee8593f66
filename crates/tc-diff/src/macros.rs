//! Declarations that wire a type into the capability traits.

/// Implement [`Diffable`](crate::Diffable) and [`Patchable`](crate::Patchable)
/// for scalar-like types that are compared and restored as a whole.
///
/// The types must implement `Serialize`, `DeserializeOwned` and be
/// comparable through their serialized form.
///
/// ```ignore
/// #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// struct Address { street: String, house_number: u32 }
///
/// diffable_leaf!(Address);
/// ```
#[macro_export]
macro_rules! diffable_leaf {
    (@patchable $ty:ty) => {
        impl $crate::Patchable for $ty {
            fn child_mut(
                &mut self,
                key: &str,
            ) -> $crate::PatchResult<Option<&mut dyn $crate::Patchable>> {
                Err($crate::PatchError::NotPatchable(key.to_string()))
            }

            fn set_value(
                &mut self,
                key: &str,
                _value: Option<$crate::Value>,
            ) -> $crate::PatchResult<()> {
                Err($crate::PatchError::NotPatchable(key.to_string()))
            }

            fn restore(&mut self, value: Option<$crate::Value>) -> $crate::PatchResult<()> {
                match value {
                    Some(value) => {
                        *self = $crate::decode(value)?;
                        Ok(())
                    }
                    None => Err($crate::PatchError::InvalidAction {
                        action: "set absent",
                        target: ::std::any::type_name::<Self>(),
                    }),
                }
            }
        }
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Diffable for $ty {
                fn shape(&self) -> $crate::Shape<'_> {
                    $crate::Shape::Leaf
                }
            }

            $crate::diffable_leaf!(@patchable $ty);
        )+
    };
}

/// Implement [`Diffable`](crate::Diffable),
/// [`DiffableObject`](crate::DiffableObject) and
/// [`Patchable`](crate::Patchable) for a struct with named fields.
///
/// Fields are diffed in the listed order and every listed field must itself
/// be `Patchable`. An optional `identity = field` clause makes the struct
/// match by that field when it appears inside a collection.
///
/// ```ignore
/// diffable_record!(User { name, age, friends }, identity = name);
/// ```
#[macro_export]
macro_rules! diffable_record {
    ($ty:ty { $($field:ident),+ $(,)? } $(, identity = $id:ident)?) => {
        impl $crate::Diffable for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Object(self)
            }

            $(
                fn identity(&self) -> Option<$crate::Value> {
                    $crate::Snapshot::snapshot(&self.$id).ok()
                }
            )?
        }

        impl $crate::DiffableObject for $ty {
            fn diffable_keys(&self) -> &'static [&'static str] {
                &[$(stringify!($field)),+]
            }

            fn value_for_key(&self, key: &str) -> $crate::DiffResult<&dyn $crate::Diffable> {
                match key {
                    $(stringify!($field) => Ok(&self.$field),)+
                    _ => Err($crate::DiffError::UnknownKey {
                        type_name: ::std::any::type_name::<Self>(),
                        key: key.to_string(),
                    }),
                }
            }
        }

        impl $crate::Patchable for $ty {
            fn child_mut(
                &mut self,
                key: &str,
            ) -> $crate::PatchResult<Option<&mut dyn $crate::Patchable>> {
                match key {
                    $(stringify!($field) => Ok(Some(&mut self.$field)),)+
                    _ => Err($crate::PatchError::MissingField(key.to_string())),
                }
            }

            fn set_value(
                &mut self,
                key: &str,
                value: Option<$crate::Value>,
            ) -> $crate::PatchResult<()> {
                match key {
                    $(stringify!($field) => $crate::Patchable::restore(&mut self.$field, value),)+
                    _ => Err($crate::PatchError::MissingField(key.to_string())),
                }
            }

            fn restore(&mut self, value: Option<$crate::Value>) -> $crate::PatchResult<()> {
                match value {
                    Some(value) => {
                        *self = $crate::decode(value)?;
                        Ok(())
                    }
                    None => Err($crate::PatchError::InvalidAction {
                        action: "set absent",
                        target: ::std::any::type_name::<Self>(),
                    }),
                }
            }
        }
    };
}
