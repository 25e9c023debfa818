use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

use primitives::{AssetKind, Balance, RequestId};

/// A user deposit waiting for its randomness word. Kept forever as an audit
/// record; `fulfilled` flips false -> true exactly once.
#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
)]
pub struct VrfDepositRequest<AccountId> {
  pub user: AccountId,
  pub token: AssetKind,
  pub amount: Balance,
  pub fulfilled: bool,
}

/// Randomness oracle. Requesting returns an id; the words arrive later
/// through `fulfill_random_words` from the oracle origin.
pub trait RandomnessSource {
  fn request_random_words(count: u32) -> RequestId;
}
