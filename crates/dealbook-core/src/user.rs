//! User — a person able to take part in deals.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::{
  Result,
  entity::{self, Entity, FieldSetter, field_table},
  registry::UniquenessRegistry,
};

/// `+D (DDD) DDD-DD-DD`, e.g. `+7 (123) 456-78-90`.
static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\+\d \(\d{3}\) \d{3}-\d{2}-\d{2}$").expect("valid phone regex")
});

/// A validated user. Only obtainable through [`User::new`] or
/// [`User::from_fields`], both of which claim `id` in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct User {
  /// Orders users; unique across every entity ever constructed.
  pub id:            i64,
  #[validate(length(min = 1, max = 50))]
  pub name:          String,
  /// Login handle used for OAuth.
  pub username:      String,
  #[validate(range(min = 1))]
  pub age:           i64,
  pub is_supervisor: bool,
  #[validate(email)]
  pub email:         String,
  #[validate(custom(function = "validate_phone_number"))]
  pub phone_number:  String,
}

/// Input for [`User::new`]. Deserialises from snake_case or camelCase keys.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub id:            i64,
  pub name:          String,
  /// Defaults to `id` followed by `name`.
  #[serde(default)]
  pub username:      Option<String>,
  pub age:           i64,
  #[serde(alias = "isSupervisor")]
  pub is_supervisor: bool,
  pub email:         String,
  #[serde(alias = "phoneNumber")]
  pub phone_number:  String,
}

impl From<NewUser> for User {
  fn from(input: NewUser) -> Self {
    let username = input
      .username
      .unwrap_or_else(|| format!("{}{}", input.id, input.name));
    Self {
      id: input.id,
      name: input.name,
      username,
      age: input.age,
      is_supervisor: input.is_supervisor,
      email: input.email,
      phone_number: input.phone_number,
    }
  }
}

impl User {
  pub fn new(input: NewUser, registry: &UniquenessRegistry) -> Result<Self> {
    entity::admit(input.into(), true, registry)
  }

  /// Build a user from a JSON object of field values.
  pub fn from_fields(fields: Value, registry: &UniquenessRegistry) -> Result<Self> {
    entity::construct::<NewUser, _>(fields, registry)
  }
}

impl Entity for User {
  const KIND: &'static str = "user";

  fn id(&self) -> Option<i64> { Some(self.id) }

  fn fields() -> &'static [FieldSetter<Self>] {
    const FIELDS: &[FieldSetter<User>] = field_table!(User {
      id / "id",
      name / "name",
      username / "username",
      age / "age",
      is_supervisor / "isSupervisor",
      email / "email",
      phone_number / "phoneNumber",
    });
    FIELDS
  }
}

fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
  if PHONE_NUMBER.is_match(value) {
    return Ok(());
  }
  Err(
    ValidationError::new("phone_number")
      .with_message("phone number must look like +7 (000) 000-00-00".into()),
  )
}
