use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Token identity shared by every pallet in the workspace.
///
/// The ledger moves exactly one class of value (a stable settlement asset plus
/// per-strategy receipt tokens), all of which live either in `pallet-balances`
/// (`Native`) or `pallet-assets` (`Local`).
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum AssetKind {
  /// Native token managed by pallet-balances
  #[default]
  Native,
  /// Local asset managed by pallet-assets
  Local(u32),
}

impl From<u32> for AssetKind {
  fn from(asset_id: u32) -> Self {
    AssetKind::Local(asset_id)
  }
}

/// Helper trait to inspect AssetKind properties
pub trait AssetInspector {
  fn is_native(&self) -> bool;
  fn local_id(&self) -> Option<u32>;
}

impl AssetInspector for AssetKind {
  fn is_native(&self) -> bool {
    matches!(self, AssetKind::Native)
  }

  fn local_id(&self) -> Option<u32> {
    match self {
      AssetKind::Local(id) => Some(*id),
      _ => None,
    }
  }
}

/// Well-known asset constants serving as system defaults
pub mod well_known {
  /// Stable settlement asset routed across chains (USDC-class)
  pub const STABLE: u32 = 1;
}
