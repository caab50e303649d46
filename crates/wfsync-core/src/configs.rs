//! Per-identity config documents and their consistency rules.

use std::{
  collections::{BTreeMap, BTreeSet},
  ops::RangeInclusive,
  sync::Arc,
};

use uuid::Uuid;

use crate::{
  Error, Result, document::ConfigDocument, store::UserStore, user::UserRecord,
};

/// How many unique identities a bulk query may ask for.
pub const BULK_QUERY_LIMITS: RangeInclusive<usize> = 2..=20;

/// Config reads and writes on top of a [`UserStore`].
pub struct ConfigStore<S> {
  store: Arc<S>,
}

impl<S> Clone for ConfigStore<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: UserStore> ConfigStore<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// The live config for `uuid`; `None` if there is no record or the config
  /// has been deleted.
  pub async fn get(&self, uuid: Uuid) -> Result<Option<ConfigDocument>> {
    let record = self.store.get_user(uuid).await.map_err(Error::storage)?;
    Ok(record.and_then(|r| r.config))
  }

  /// Live configs for a set of identities. Identities without one are left
  /// out of the result.
  pub async fn get_many(
    &self,
    uuids: &BTreeSet<Uuid>,
  ) -> Result<BTreeMap<Uuid, ConfigDocument>> {
    if !BULK_QUERY_LIMITS.contains(&uuids.len()) {
      return Err(Error::Validation(format!(
        "this route requires between {}-{} unique UUIDs",
        BULK_QUERY_LIMITS.start(),
        BULK_QUERY_LIMITS.end(),
      )));
    }

    let uuids: Vec<Uuid> = uuids.iter().copied().collect();
    let records = self.store.get_users(&uuids).await.map_err(Error::storage)?;

    Ok(
      records
        .into_iter()
        .filter_map(|r| Some((r.uuid, r.config?)))
        .collect(),
    )
  }

  /// Return the record for `uuid`, creating one with a default config if
  /// none exists.
  pub async fn find_or_create(&self, uuid: Uuid) -> Result<UserRecord> {
    if let Some(existing) =
      self.store.get_user(uuid).await.map_err(Error::storage)?
    {
      return Ok(existing);
    }

    tracing::debug!(%uuid, "creating user record");
    self
      .store
      .create_user(&UserRecord::new(uuid))
      .await
      .map_err(Error::storage)
  }

  /// Replace the whole config for `uuid`. The nametag is left untouched.
  pub async fn replace(&self, uuid: Uuid, document: ConfigDocument) -> Result<()> {
    self.find_or_create(uuid).await?;

    let document = document.owned_by(uuid);
    let updated = self
      .store
      .set_config(uuid, Some(&document))
      .await
      .map_err(Error::storage)?;

    // The record can only vanish here if a concurrent delete won the race.
    if !updated {
      self
        .store
        .create_user(&UserRecord {
          uuid,
          config: Some(document),
          nametag: None,
        })
        .await
        .map_err(Error::storage)?;
    }
    Ok(())
  }

  /// Delete the config for `uuid`.
  ///
  /// A record that still carries a nametag is kept with its config cleared;
  /// otherwise the record is removed. Fails with [`Error::NotFound`] if
  /// there is no config to delete.
  pub async fn delete(&self, uuid: Uuid) -> Result<()> {
    let record = self
      .store
      .get_user(uuid)
      .await
      .map_err(Error::storage)?
      .filter(|r| r.config.is_some())
      .ok_or(Error::NotFound(uuid))?;

    let removed = if record.nametag.is_some() {
      tracing::debug!(%uuid, "tombstoning config of contributor");
      self.store.set_config(uuid, None).await
    } else {
      self.store.delete_user(uuid).await
    }
    .map_err(Error::storage)?;

    if removed { Ok(()) } else { Err(Error::NotFound(uuid)) }
  }

  /// Number of identities with a live config.
  pub async fn count_synced(&self) -> Result<u64> {
    self.store.count_synced().await.map_err(Error::storage)
  }
}
