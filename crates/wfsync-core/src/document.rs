//! The per-player configuration document.
//!
//! Mirrors the settings the mod keeps locally. Every field has a default, so
//! a document written by an older or newer mod version is always readable:
//! unknown keys are dropped and missing keys are filled in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordinal of the `Gender` enum in the mod.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gender {
  Female = 0,
  #[default]
  Male = 1,
  Other = 2,
}

impl From<Gender> for u8 {
  fn from(g: Gender) -> Self { g as u8 }
}

impl TryFrom<u8> for Gender {
  type Error = String;

  fn try_from(v: u8) -> Result<Self, Self::Error> {
    match v {
      0 => Ok(Self::Female),
      1 => Ok(Self::Male),
      2 => Ok(Self::Other),
      other => Err(format!("unknown gender ordinal: {other}")),
    }
  }
}

/// A player's synced settings.
///
/// Any field added here MUST have a default in the `Default` impl below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
  /// Echo of the owning identity; stamped by the store on every write.
  pub username:          Uuid,
  pub gender:            Gender,
  pub bust_size:         f64,
  pub hurt_sounds:       bool,
  #[serde(rename = "breasts_xOffset")]
  pub breasts_x_offset:  f64,
  #[serde(rename = "breasts_yOffset")]
  pub breasts_y_offset:  f64,
  #[serde(rename = "breasts_zOffset")]
  pub breasts_z_offset:  f64,
  pub breasts_uniboob:   bool,
  pub breasts_cleavage:  f64,
  pub breast_physics:    bool,
  pub show_in_armor:     bool,
  pub bounce_multiplier: f64,
  pub floppy_multiplier: f64,
}

impl Default for ConfigDocument {
  fn default() -> Self {
    Self {
      username:          Uuid::nil(),
      gender:            Gender::Male,
      bust_size:         0.6,
      hurt_sounds:       true,
      breasts_x_offset:  0.0,
      breasts_y_offset:  0.0,
      breasts_z_offset:  0.0,
      breasts_uniboob:   true,
      breasts_cleavage:  0.0,
      breast_physics:    true,
      show_in_armor:     true,
      bounce_multiplier: 0.333,
      floppy_multiplier: 0.75,
    }
  }
}

impl ConfigDocument {
  /// A default document belonging to `owner`.
  pub fn for_owner(owner: Uuid) -> Self {
    Self { username: owner, ..Self::default() }
  }

  /// Return `self` with the owner echo set to `owner`.
  pub fn owned_by(mut self, owner: Uuid) -> Self {
    self.username = owner;
    self
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn missing_keys_take_defaults() {
    let doc: ConfigDocument =
      serde_json::from_value(json!({ "bust_size": 0.9, "gender": 0 }))
        .unwrap();

    assert_eq!(doc.bust_size, 0.9);
    assert_eq!(doc.gender, Gender::Female);
    assert!(doc.hurt_sounds);
    assert_eq!(doc.bounce_multiplier, 0.333);
    assert_eq!(doc.floppy_multiplier, 0.75);
    assert_eq!(doc.username, Uuid::nil());
  }

  #[test]
  fn unknown_keys_are_dropped() {
    let doc: ConfigDocument = serde_json::from_value(json!({
      "armor_physics_override": true,
      "some_future_setting": [1, 2, 3],
    }))
    .unwrap();
    assert_eq!(doc, ConfigDocument::default());

    let back = serde_json::to_value(&doc).unwrap();
    assert!(back.get("armor_physics_override").is_none());
  }

  #[test]
  fn offsets_use_mod_key_names() {
    let doc = ConfigDocument {
      breasts_x_offset: 0.25,
      ..ConfigDocument::default()
    };
    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v["breasts_xOffset"], json!(0.25));
    assert!(v.get("breasts_x_offset").is_none());
  }

  #[test]
  fn gender_is_an_ordinal() {
    assert_eq!(serde_json::to_value(Gender::Other).unwrap(), json!(2));
    assert!(serde_json::from_value::<Gender>(json!(7)).is_err());
  }

  #[test]
  fn owner_echo() {
    let owner = Uuid::new_v4();
    assert_eq!(ConfigDocument::for_owner(owner).username, owner);
    assert_eq!(ConfigDocument::default().owned_by(owner).username, owner);
  }
}
