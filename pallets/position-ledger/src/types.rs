use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use polkadot_sdk::frame_support::pallet_prelude::*;
use scale_info::TypeInfo;

use primitives::{AssetKind, Balance, ChainId};

/// One slot in a user's ordered position list.
///
/// A user may hold several concurrent slots in the same strategy: deposits
/// and rebalances always append, and only consolidation merges slots. A slot
/// drained to zero stays in place.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
)]
pub struct Position<BlockNumber> {
  pub strategy_id: u32,
  pub balance: Balance,
  pub last_updated: BlockNumber,
  pub last_rebalanced: BlockNumber,
}

/// External yield protocol sink, one per registered strategy pool.
///
/// Opaque beyond supply/withdraw; failures propagate as the ledger's own
/// dispatch error. `max_slippage_bps` is the ledger-wide cap forwarded to the
/// protocol adapter.
pub trait StrategyProtocol<AccountId> {
  fn supply(
    pool: &AccountId,
    token: AssetKind,
    amount: Balance,
    max_slippage_bps: u16,
  ) -> DispatchResult;

  /// Returns the amount actually released by the protocol.
  fn withdraw(
    pool: &AccountId,
    token: AssetKind,
    amount: Balance,
    max_slippage_bps: u16,
  ) -> Result<Balance, DispatchError>;
}

/// External price feed read. Staleness and deviation validation is layered
/// on top by the ledger, not by implementations of this trait.
pub trait PriceFeed<BlockNumber> {
  fn latest_price() -> Option<(Balance, BlockNumber)>;
}

/// Hook fired on every deposit/withdraw/rebalance, used by the reward draw
/// to maintain the weekly participant set.
pub trait OnInteraction<AccountId> {
  fn on_interaction(user: &AccountId, chain: ChainId);
}

impl<AccountId> OnInteraction<AccountId> for () {
  fn on_interaction(_: &AccountId, _: ChainId) {}
}

/// Ledger operations consumed by the cross-chain gateway and the reward draw.
pub trait LedgerInterface<AccountId> {
  /// Deposit `amount` of `token` held by `payer` into `strategy_id`,
  /// crediting the position to `user`.
  fn deposit_for(
    payer: &AccountId,
    user: &AccountId,
    token: AssetKind,
    strategy_id: u32,
    amount: Balance,
    origin_chain: ChainId,
  ) -> DispatchResult;

  /// Rebalance on behalf of `user`, invoked by trusted infrastructure.
  /// Per-user cooldown semantics are enforced exactly as for a direct call.
  fn rebalance_for(
    user: &AccountId,
    position_index: u32,
    new_strategy_id: u32,
    amount: Balance,
    origin_chain: ChainId,
  ) -> DispatchResult;

  /// Whether `who` is the configured privileged agent.
  fn is_agent(who: &AccountId) -> bool;

  /// Number of position slots currently held by `user`.
  fn position_count(user: &AccountId) -> u32;
}
