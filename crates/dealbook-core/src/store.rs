//! [`EntityStore`] — the in-memory home of accepted entities.
//!
//! A process creates one store at start-up and hands out references to it;
//! there is no global instance.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Error, Result, entity::Entity};

/// Accepted entities, in acceptance order.
#[derive(Debug)]
pub struct EntityStore<E> {
  entities: Mutex<Vec<E>>,
}

impl<E> Default for EntityStore<E> {
  fn default() -> Self {
    Self {
      entities: Mutex::new(Vec::new()),
    }
  }
}

impl<E: Entity> EntityStore<E> {
  pub fn new() -> Self { Self::default() }

  /// Re-check `entity` against its field constraints and append it.
  ///
  /// Entities may have been changed by [`Entity::update`] since they were
  /// constructed, so acceptance validates again. The registry is not
  /// consulted.
  pub fn accept(&self, entity: E) -> Result<()> {
    entity.validate().map_err(Error::Validation)?;
    self.lock().push(entity);
    Ok(())
  }

  pub fn len(&self) -> usize { self.lock().len() }

  pub fn is_empty(&self) -> bool { self.lock().is_empty() }

  /// Snapshot of every accepted entity.
  pub fn entities(&self) -> Vec<E> { self.lock().clone() }

  fn lock(&self) -> MutexGuard<'_, Vec<E>> {
    self.entities.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
