//! The `demo` walkthrough: build a deal, list it, update it and store it.

use anyhow::{Context as _, Result};
use dealbook_core::{
  BatchReport, Deal, Entity, EntityStore, Error, MockConnection, Patch, Record,
  Repository, UniquenessRegistry, deal::today,
};
use serde_json::json;

use crate::settings::Settings;

/// The id of the deal the walkthrough builds and updates.
pub const DEAL_ID: i64 = 123;

/// Everything the walkthrough produced, in order.
#[derive(Debug)]
pub struct DemoOutcome {
  /// Why the deliberately invalid deal was refused.
  pub invalid: Option<Error>,
  /// The list before the update.
  pub records: Vec<Record>,
  /// The deal after its comment was changed, if it was found.
  pub updated: Option<Record>,
  pub report:  BatchReport,
}

pub fn run(settings: &Settings) -> Result<DemoOutcome> {
  let registry = UniquenessRegistry::new();
  let store = EntityStore::<Deal>::new();

  let deal = Deal::from_fields(
    json!({
      "id": DEAL_ID,
      "title": "title",
      "comment": "comment",
      "created_at": today().format("%Y-%m-%d").to_string(),
      "persons_in_charge": ["steve", "bob"],
      "deal_type": "PURCHASE",
    }),
    &registry,
  )
  .context("failed to build demo deal")?;

  // Same id, a non-string comment and an unknown deal type.
  let invalid = Deal::from_fields(
    json!({ "id": DEAL_ID, "comment": 1234, "deal_type": "smth" }),
    &registry,
  )
  .err();
  if let Some(error) = &invalid {
    tracing::warn!(%error, "invalid deal rejected");
  }

  let conn = MockConnection::new(settings.db_url());
  let mut deals = vec![deal];
  let mut repo = Repository::new(&mut deals, &conn);

  let records = repo.list_as_records()?;

  let mut update = Patch::new();
  update.insert("comment".into(), json!("my_new_comment"));
  let updated = repo
    .update_by_id(DEAL_ID, &update)?
    .map(Entity::to_record)
    .transpose()?;

  let report = repo.create_all(&store)?;

  Ok(DemoOutcome {
    invalid,
    records,
    updated,
    report,
  })
}
