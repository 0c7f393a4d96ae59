//! The uniqueness registry — every identifier ever handed to an entity.
//!
//! The registry only grows. Removing an entity from a repository does not
//! free its identifier, so an id can never be reused while the registry is
//! alive.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Error, Result};

/// Append-only record of identifiers claimed by constructed entities.
///
/// Users and deals share one registry. `None` is recorded for deals built
/// without an id; whether a later `None` collides with it depends on whether
/// the caller goes through [`claim`](Self::claim) or
/// [`register`](Self::register).
#[derive(Debug, Default)]
pub struct UniquenessRegistry {
  used: Mutex<Vec<Option<i64>>>,
}

impl UniquenessRegistry {
  pub fn new() -> Self { Self::default() }

  pub fn contains(&self, id: Option<i64>) -> bool {
    self.lock().contains(&id)
  }

  /// Append `id` without checking for an earlier occurrence.
  pub fn register(&self, id: Option<i64>) { self.lock().push(id); }

  /// Check `id` against every earlier entry and register it, under a single
  /// lock acquisition. `None` collides with an earlier `None`.
  pub fn claim(&self, id: Option<i64>) -> Result<()> {
    let mut used = self.lock();
    if used.contains(&id) {
      return Err(Error::DuplicateId(id));
    }
    used.push(id);
    Ok(())
  }

  pub fn len(&self) -> usize { self.lock().len() }

  pub fn is_empty(&self) -> bool { self.lock().is_empty() }

  /// Snapshot of the claimed identifiers in claim order.
  pub fn ids(&self) -> Vec<Option<i64>> { self.lock().clone() }

  // A panic while holding the lock cannot leave the list half-written.
  fn lock(&self) -> MutexGuard<'_, Vec<Option<i64>>> {
    self.used.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn claim_registers_new_ids() {
    let registry = UniquenessRegistry::new();
    registry.claim(Some(1)).unwrap();
    registry.claim(Some(2)).unwrap();
    assert!(registry.contains(Some(1)));
    assert!(registry.contains(Some(2)));
    assert_eq!(registry.ids(), vec![Some(1), Some(2)]);
  }

  #[test]
  fn claim_rejects_a_used_id() {
    let registry = UniquenessRegistry::new();
    registry.claim(Some(7)).unwrap();
    let err = registry.claim(Some(7)).unwrap_err();
    assert!(matches!(err, Error::DuplicateId(Some(7))));
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn registered_none_blocks_a_claimed_none() {
    let registry = UniquenessRegistry::new();
    registry.register(None);
    registry.register(None);
    assert_eq!(registry.len(), 2);
    assert!(matches!(registry.claim(None), Err(Error::DuplicateId(None))));
    assert_eq!(registry.len(), 2);
  }

  #[test]
  fn first_claimed_none_is_accepted() {
    let registry = UniquenessRegistry::new();
    registry.claim(None).unwrap();
    assert!(registry.contains(None));
  }

  #[test]
  fn register_does_not_deduplicate() {
    let registry = UniquenessRegistry::new();
    registry.register(Some(3));
    registry.register(Some(3));
    assert_eq!(registry.ids(), vec![Some(3), Some(3)]);
  }
}
