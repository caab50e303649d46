pub mod contributors;
pub mod legacy;
pub mod session;
pub mod stats;
pub mod users;

use serde::Serialize;

/// Body of every successful write.
#[derive(Debug, Serialize)]
pub struct Success {
  pub success: bool,
}

impl Success {
  pub(super) fn ok() -> Self { Self { success: true } }
}
