//! The [`Entity`] trait shared by users and deals.
//!
//! Construction goes through [`construct`]: decode the input object, run the
//! declarative field constraints, then claim the identifier in the
//! [`UniquenessRegistry`]. Later mutation through [`Entity::update`] skips
//! all of that and only type-checks each new value.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use validator::Validate;

use crate::{Error, Result, registry::UniquenessRegistry};

/// A plain field name → value mapping, keyed by snake_case field names.
pub type Record = serde_json::Map<String, Value>;

/// A partial update: only the fields present are overwritten.
pub type Patch = serde_json::Map<String, Value>;

/// Writes one decoded value into one field of `E`.
pub type SetterFn<E> = fn(&mut E, Value) -> serde_json::Result<()>;

/// One row of an entity's field table.
pub struct FieldSetter<E> {
  /// snake_case field name.
  pub name:  &'static str,
  /// camelCase alias, accepted wherever `name` is.
  pub alias: &'static str,
  pub set:   SetterFn<E>,
}

impl<E> FieldSetter<E> {
  fn matches(&self, key: &str) -> bool { key == self.name || key == self.alias }
}

/// A validated record with an optional integer identity.
pub trait Entity: Clone + Serialize + Validate + 'static {
  /// Human-readable kind used in log output.
  const KIND: &'static str;

  fn id(&self) -> Option<i64>;

  /// The field table driving [`Entity::update`].
  fn fields() -> &'static [FieldSetter<Self>];

  /// Overwrite the fields named in `patch`, in order.
  ///
  /// No constraint is re-checked and the registry is not consulted. Keys
  /// applied before a failing key stay applied.
  fn update(&mut self, patch: &Patch) -> Result<()> {
    for (key, value) in patch {
      let setter = Self::fields()
        .iter()
        .find(|f| f.matches(key))
        .ok_or_else(|| Error::UnknownField(key.clone()))?;
      (setter.set)(self, value.clone()).map_err(|source| Error::FieldType {
        field: setter.name.to_string(),
        source,
      })?;
    }
    Ok(())
  }

  /// Serialise every declared field, unset optionals as `null`.
  fn to_record(&self) -> Result<Record> {
    match serde_json::to_value(self).map_err(Error::Serialization)? {
      Value::Object(map) => Ok(map),
      other => Err(Error::Serialization(serde::ser::Error::custom(
        format!("{} serialised to a non-object: {other}", Self::KIND),
      ))),
    }
  }
}

/// Decode `fields` as the input type `I`, then validate and register the
/// resulting entity.
///
/// Field constraints run before the registry is touched, so a rejected
/// record never consumes its identifier. An explicit `"id": null` is checked
/// against the registry like any other id; an omitted id is not.
pub fn construct<I, E>(fields: Value, registry: &UniquenessRegistry) -> Result<E>
where
  I: DeserializeOwned + Into<E>,
  E: Entity,
{
  let id_given = fields.get("id").is_some();
  let input: I = serde_json::from_value(fields).map_err(Error::Malformed)?;
  admit(input.into(), id_given, registry)
}

/// Validate an already-typed entity and record its identifier.
///
/// A present id is always checked. A `None` id is checked only when the
/// caller supplied it explicitly (`id_given`).
pub(crate) fn admit<E: Entity>(
  entity: E,
  id_given: bool,
  registry: &UniquenessRegistry,
) -> Result<E> {
  entity.validate()?;
  match entity.id() {
    None if !id_given => registry.register(None),
    id => registry.claim(id)?,
  }
  Ok(entity)
}

/// Build a `&'static [FieldSetter<$ty>]` where every setter decodes the
/// incoming value straight into the named field.
macro_rules! field_table {
  ($ty:ty { $($field:ident / $alias:literal),* $(,)? }) => {
    &[
      $(
        $crate::entity::FieldSetter::<$ty> {
          name:  stringify!($field),
          alias: $alias,
          set:   |entity, value| {
            entity.$field = serde_json::from_value(value)?;
            Ok(())
          },
        },
      )*
    ]
  };
}

pub(crate) use field_table;
