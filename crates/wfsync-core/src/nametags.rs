//! Contributor nametags, managed with a static admin secret.

use std::{collections::BTreeMap, fmt, sync::Arc};

use subtle::ConstantTimeEq as _;
use uuid::Uuid;

use crate::{
  Error, Result, configs::ConfigStore, store::UserStore,
  user::ContributorNametag,
};

/// The shared secret that gates nametag mutations.
#[derive(Clone)]
pub struct AdminSecret(String);

impl AdminSecret {
  pub fn new(secret: impl Into<String>) -> Self { Self(secret.into()) }

  /// Compare `presented` against the secret in constant time. An empty
  /// configured secret matches nothing.
  pub fn verify(&self, presented: Option<&str>) -> Result<()> {
    let presented = presented.ok_or(Error::Unauthorized)?;
    if self.0.is_empty() {
      return Err(Error::Unauthorized);
    }

    if bool::from(self.0.as_bytes().ct_eq(presented.as_bytes())) {
      Ok(())
    } else {
      Err(Error::Unauthorized)
    }
  }
}

impl fmt::Debug for AdminSecret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("AdminSecret(..)")
  }
}

/// Nametag reads and admin-gated writes.
pub struct ContributorNametags<S> {
  store:   Arc<S>,
  configs: ConfigStore<S>,
  admin:   AdminSecret,
}

impl<S: UserStore> ContributorNametags<S> {
  pub fn new(store: Arc<S>, admin: AdminSecret) -> Self {
    Self {
      configs: ConfigStore::new(store.clone()),
      store,
      admin,
    }
  }

  /// Attach `nametag` to `uuid`, creating the record if needed.
  pub async fn set(
    &self,
    credential: Option<&str>,
    uuid: Uuid,
    nametag: ContributorNametag,
  ) -> Result<()> {
    self.admin.verify(credential)?;

    self.configs.find_or_create(uuid).await?;
    self
      .store
      .set_nametag(uuid, Some(&nametag))
      .await
      .map_err(Error::storage)?;

    tracing::info!(%uuid, text = %nametag.text, "set contributor nametag");
    Ok(())
  }

  /// Remove the nametag from `uuid`. The record itself is kept.
  pub async fn clear(&self, credential: Option<&str>, uuid: Uuid) -> Result<()> {
    self.admin.verify(credential)?;

    let existed = self
      .store
      .set_nametag(uuid, None)
      .await
      .map_err(Error::storage)?;
    if !existed {
      return Err(Error::NotFound(uuid));
    }

    tracing::info!(%uuid, "cleared contributor nametag");
    Ok(())
  }

  pub async fn list_all(&self) -> Result<BTreeMap<Uuid, ContributorNametag>> {
    let tags = self.store.list_nametags().await.map_err(Error::storage)?;
    Ok(tags.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn admin_secret_verification() {
    let secret = AdminSecret::new("hunter2");
    assert!(secret.verify(Some("hunter2")).is_ok());
    assert!(matches!(secret.verify(Some("hunter3")), Err(Error::Unauthorized)));
    assert!(matches!(secret.verify(Some("hunter")), Err(Error::Unauthorized)));
    assert!(matches!(secret.verify(None), Err(Error::Unauthorized)));
  }

  #[test]
  fn empty_admin_secret_rejects_everything() {
    let secret = AdminSecret::new("");
    assert!(matches!(secret.verify(Some("")), Err(Error::Unauthorized)));
  }

  #[test]
  fn admin_secret_debug_is_redacted() {
    let secret = AdminSecret::new("hunter2");
    assert!(!format!("{secret:?}").contains("hunter2"));
  }
}
