//! Deal — a purchase or sale with the people responsible for it.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::{
  Result,
  entity::{self, Entity, FieldSetter, field_table},
  registry::UniquenessRegistry,
};

/// Direction of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealType {
  Purchase,
  Sell,
}

/// A validated deal.
///
/// Every field except `created_at` is optional. A deal without an id is
/// still recorded in the registry, as `None`. Leaving the id out never
/// collides; passing `"id": null` collides with any earlier `None`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Deal {
  pub id:                Option<i64>,
  pub title:             Option<String>,
  pub comment:           Option<String>,
  /// Date the deal was concluded; never earlier than the day it is created.
  #[validate(custom(function = "validate_created_at"))]
  pub created_at:        NaiveDate,
  pub persons_in_charge: Option<Vec<String>>,
  pub deal_type:         Option<DealType>,
}

impl PartialEq for Deal {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
      && self.title == other.title
      && self.comment == other.comment
      && self.created_at == other.created_at
      && self.deal_type == other.deal_type
      && same_people(&self.persons_in_charge, &other.persons_in_charge)
  }
}

fn same_people(a: &Option<Vec<String>>, b: &Option<Vec<String>>) -> bool {
  match (a, b) {
    (Some(a), Some(b)) => {
      let mut a: Vec<&str> = a.iter().map(String::as_str).collect();
      let mut b: Vec<&str> = b.iter().map(String::as_str).collect();
      a.sort_unstable();
      b.sort_unstable();
      a == b
    }
    (None, None) => true,
    _ => false,
  }
}

/// Input for [`Deal::new`]. Deserialises from snake_case or camelCase keys;
/// a missing `created_at` means today.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDeal {
  #[serde(default)]
  pub id:                Option<i64>,
  #[serde(default)]
  pub title:             Option<String>,
  #[serde(default)]
  pub comment:           Option<String>,
  #[serde(default = "today", alias = "createdAt")]
  pub created_at:        NaiveDate,
  #[serde(default, alias = "personsInCharge")]
  pub persons_in_charge: Option<Vec<String>>,
  #[serde(default, alias = "dealType")]
  pub deal_type:         Option<DealType>,
}

impl Default for NewDeal {
  fn default() -> Self {
    Self {
      id:                None,
      title:             None,
      comment:           None,
      created_at:        today(),
      persons_in_charge: None,
      deal_type:         None,
    }
  }
}

impl From<NewDeal> for Deal {
  fn from(input: NewDeal) -> Self {
    Self {
      id:                input.id,
      title:             input.title,
      comment:           input.comment,
      created_at:        input.created_at,
      persons_in_charge: input.persons_in_charge,
      deal_type:         input.deal_type,
    }
  }
}

impl Deal {
  pub fn new(input: NewDeal, registry: &UniquenessRegistry) -> Result<Self> {
    entity::admit(input.into(), false, registry)
  }

  /// Build a deal from a JSON object of field values.
  pub fn from_fields(fields: Value, registry: &UniquenessRegistry) -> Result<Self> {
    entity::construct::<NewDeal, _>(fields, registry)
  }
}

impl Entity for Deal {
  const KIND: &'static str = "deal";

  fn id(&self) -> Option<i64> { self.id }

  fn fields() -> &'static [FieldSetter<Self>] {
    const FIELDS: &[FieldSetter<Deal>] = field_table!(Deal {
      id / "id",
      title / "title",
      comment / "comment",
      created_at / "createdAt",
      persons_in_charge / "personsInCharge",
      deal_type / "dealType",
    });
    FIELDS
  }
}

/// The local calendar date.
pub fn today() -> NaiveDate { Local::now().date_naive() }

fn validate_created_at(value: &NaiveDate) -> Result<(), ValidationError> {
  if *value < today() {
    return Err(
      ValidationError::new("created_at")
        .with_message("creation date cannot be earlier than today".into()),
    );
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::Days;
  use serde_json::json;

  use super::*;
  use crate::Error;

  fn date(offset_days: i64) -> String {
    let today = today();
    let day = if offset_days >= 0 {
      today + Days::new(offset_days as u64)
    } else {
      today - Days::new(offset_days.unsigned_abs())
    };
    day.format("%Y-%m-%d").to_string()
  }

  #[test]
  fn created_at_today_is_valid() {
    let registry = UniquenessRegistry::new();
    let deal =
      Deal::from_fields(json!({ "id": 1, "created_at": date(0) }), &registry)
        .unwrap();
    assert_eq!(deal.created_at, today());
  }

  #[test]
  fn created_at_yesterday_is_rejected() {
    let registry = UniquenessRegistry::new();
    let err =
      Deal::from_fields(json!({ "id": 2, "created_at": date(-1) }), &registry)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(!registry.contains(Some(2)));
  }

  #[test]
  fn created_at_defaults_to_today() {
    let registry = UniquenessRegistry::new();
    let deal = Deal::from_fields(json!({ "id": 3 }), &registry).unwrap();
    assert_eq!(deal.created_at, today());
    assert_eq!(deal.title, None);
  }

  #[test]
  fn camel_and_snake_case_inputs_agree() {
    let registry = UniquenessRegistry::new();
    let snake = Deal::from_fields(
      json!({
        "id": 4,
        "title": "title",
        "created_at": date(1),
        "persons_in_charge": ["steve", "bob"],
        "deal_type": "PURCHASE",
      }),
      &registry,
    )
    .unwrap();
    let mut camel = Deal::from_fields(
      json!({
        "title": "title",
        "createdAt": date(1),
        "personsInCharge": ["bob", "steve"],
        "dealType": "PURCHASE",
      }),
      &registry,
    )
    .unwrap();
    camel.id = Some(4);
    assert_eq!(snake, camel);
  }

  #[test]
  fn unknown_deal_type_is_malformed() {
    let registry = UniquenessRegistry::new();
    let err = Deal::from_fields(json!({ "id": 5, "deal_type": "smth" }), &registry)
      .unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
  }

  #[test]
  fn wrongly_typed_comment_is_malformed() {
    let registry = UniquenessRegistry::new();
    let err = Deal::from_fields(json!({ "id": 6, "comment": 1234 }), &registry)
      .unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
  }

  #[test]
  fn id_less_deals_never_collide() {
    let registry = UniquenessRegistry::new();
    Deal::new(NewDeal::default(), &registry).unwrap();
    Deal::new(NewDeal::default(), &registry).unwrap();
    assert_eq!(registry.ids(), vec![None, None]);
  }

  #[test]
  fn explicit_null_id_collides_with_an_omitted_one() {
    let registry = UniquenessRegistry::new();
    Deal::from_fields(json!({ "title": "first" }), &registry).unwrap();
    Deal::from_fields(json!({ "title": "second" }), &registry).unwrap();

    let err = Deal::from_fields(json!({ "id": null }), &registry).unwrap_err();
    assert!(matches!(err, Error::DuplicateId(None)));
    assert_eq!(registry.len(), 2);
  }

  #[test]
  fn explicit_null_id_is_accepted_once() {
    let registry = UniquenessRegistry::new();
    let deal = Deal::from_fields(json!({ "id": null }), &registry).unwrap();
    assert_eq!(deal.id, None);
    assert!(matches!(
      Deal::from_fields(json!({ "id": null }), &registry),
      Err(Error::DuplicateId(None))
    ));
  }

  #[test]
  fn duplicate_id_is_rejected() {
    let registry = UniquenessRegistry::new();
    let input = NewDeal { id: Some(7), ..NewDeal::default() };
    Deal::new(input.clone(), &registry).unwrap();
    assert!(matches!(
      Deal::new(input, &registry),
      Err(Error::DuplicateId(Some(7)))
    ));
  }

  #[test]
  fn update_overwrites_without_revalidating() {
    let registry = UniquenessRegistry::new();
    let mut deal =
      Deal::new(NewDeal { id: Some(8), ..NewDeal::default() }, &registry)
        .unwrap();

    let patch = json!({ "comment": "x", "createdAt": "2000-01-01", "id": 9 });
    deal.update(patch.as_object().unwrap()).unwrap();

    assert_eq!(deal.comment.as_deref(), Some("x"));
    assert_eq!(deal.created_at, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    assert_eq!(deal.id, Some(9));
    assert!(!registry.contains(Some(9)));
    assert!(deal.validate().is_err());
  }

  #[test]
  fn update_rejects_unknown_fields() {
    let registry = UniquenessRegistry::new();
    let mut deal = Deal::new(NewDeal::default(), &registry).unwrap();
    let patch = json!({ "colour": "red" });
    let err = deal.update(patch.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, Error::UnknownField(ref k) if k == "colour"));
  }

  #[test]
  fn update_type_checks_values() {
    let registry = UniquenessRegistry::new();
    let mut deal = Deal::new(NewDeal::default(), &registry).unwrap();
    let patch = json!({ "persons_in_charge": "steve" });
    let err = deal.update(patch.as_object().unwrap()).unwrap_err();
    assert!(
      matches!(err, Error::FieldType { ref field, .. } if field == "persons_in_charge")
    );
  }

  #[test]
  fn record_contains_every_field() {
    let registry = UniquenessRegistry::new();
    let deal = Deal::new(
      NewDeal {
        id: Some(10),
        deal_type: Some(DealType::Sell),
        ..NewDeal::default()
      },
      &registry,
    )
    .unwrap();
    let record = deal.to_record().unwrap();
    assert_eq!(record.len(), 6);
    assert_eq!(record["deal_type"], json!("SELL"));
    assert_eq!(record["comment"], Value::Null);
    assert_eq!(record["created_at"], json!(date(0)));
  }
}
