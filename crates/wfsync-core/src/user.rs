//! The durable per-identity aggregate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::ConfigDocument;

/// A display nametag granted to a contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorNametag {
  pub text:  String,
  /// Packed RGB colour, if any.
  #[serde(default)]
  pub color: Option<i64>,
}

/// Everything stored for one identity.
///
/// `config == None` is a tombstone: the player deleted their settings but the
/// record is kept because it still carries a nametag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
  pub uuid:    Uuid,
  pub config:  Option<ConfigDocument>,
  pub nametag: Option<ContributorNametag>,
}

impl UserRecord {
  /// A fresh record holding a default document and no nametag.
  pub fn new(uuid: Uuid) -> Self {
    Self {
      uuid,
      config: Some(ConfigDocument::for_owner(uuid)),
      nametag: None,
    }
  }
}
