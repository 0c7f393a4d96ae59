//! [`Repository`] — CRUD over a caller-owned list of entities.
//!
//! Every operation holds a connection from the provider for its whole
//! duration. Lookups are linear scans where the first match wins. Batch
//! operations log and skip failing items instead of aborting.

use crate::{
  Error, Result,
  connection::{ConnectionGuard, ConnectionProvider},
  entity::{Entity, Patch, Record},
  store::EntityStore,
};

// ─── Batch report ────────────────────────────────────────────────────────────

/// Outcome of [`Repository::create_all`].
#[derive(Debug, Default)]
pub struct BatchReport {
  pub accepted: usize,
  pub rejected: Vec<Rejection>,
}

/// One entity that the store refused.
#[derive(Debug)]
pub struct Rejection {
  pub id:    Option<i64>,
  pub error: Error,
}

impl BatchReport {
  pub fn is_complete(&self) -> bool { self.rejected.is_empty() }
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// Borrows a list of entities and a connection provider.
pub struct Repository<'a, E, P> {
  entities:   &'a mut Vec<E>,
  connection: &'a P,
}

impl<'a, E, P> Repository<'a, E, P>
where
  E: Entity,
  P: ConnectionProvider,
{
  pub fn new(entities: &'a mut Vec<E>, connection: &'a P) -> Self {
    Self {
      entities,
      connection,
    }
  }

  pub fn entities(&self) -> &[E] { self.entities.as_slice() }

  /// Offer every entity to `store`. Refusals are logged and reported.
  pub fn create_all(&self, store: &EntityStore<E>) -> Result<BatchReport> {
    let _conn = ConnectionGuard::acquire(self.connection)?;
    let mut report = BatchReport::default();

    for entity in self.entities.iter() {
      match store.accept(entity.clone()) {
        Ok(()) => report.accepted += 1,
        Err(error) => {
          tracing::warn!(
            kind = E::KIND,
            id = ?entity.id(),
            %error,
            "entity rejected by store"
          );
          report.rejected.push(Rejection {
            id: entity.id(),
            error,
          });
        }
      }
    }

    tracing::info!(
      kind = E::KIND,
      accepted = report.accepted,
      rejected = report.rejected.len(),
      "batch create finished"
    );
    Ok(report)
  }

  /// Serialise every entity. Entities that fail to serialise are logged and
  /// left out, so the result may be shorter than the collection.
  pub fn list_as_records(&self) -> Result<Vec<Record>> {
    let _conn = ConnectionGuard::acquire(self.connection)?;

    let records = self
      .entities
      .iter()
      .filter_map(|entity| match entity.to_record() {
        Ok(record) => Some(record),
        Err(error) => {
          tracing::warn!(
            kind = E::KIND,
            id = ?entity.id(),
            %error,
            "skipping entity that failed to serialise"
          );
          None
        }
      })
      .collect();
    Ok(records)
  }

  /// The first entity whose id equals `id`.
  pub fn find(&self, id: i64) -> Result<Option<&E>> {
    let _conn = ConnectionGuard::acquire(self.connection)?;
    Ok(self.entities.iter().find(|e| e.id() == Some(id)))
  }

  /// Remove the first entity whose id equals `id` from the backing list and
  /// return it. The id stays claimed in the registry.
  pub fn delete(&mut self, id: i64) -> Result<Option<E>> {
    let _conn = ConnectionGuard::acquire(self.connection)?;
    let removed = self
      .entities
      .iter()
      .position(|e| e.id() == Some(id))
      .map(|index| self.entities.remove(index));
    if removed.is_some() {
      tracing::debug!(kind = E::KIND, id, "entity deleted");
    }
    Ok(removed)
  }

  /// Apply `patch` to the first entity whose id equals `id` and return it.
  ///
  /// The patch is not validated; see [`Entity::update`].
  pub fn update_by_id(&mut self, id: i64, patch: &Patch) -> Result<Option<&E>> {
    let _conn = ConnectionGuard::acquire(self.connection)?;
    let Some(entity) = self.entities.iter_mut().find(|e| e.id() == Some(id))
    else {
      return Ok(None);
    };
    entity.update(patch)?;
    Ok(Some(entity))
  }
}
