//! Ecosystem Constants for the Cross-Chain Yield Router
//!
//! This module centralizes system-level constants: dedicated pallet IDs for
//! deriving pallet-owned accounts, chain/message identifier aliases, and the
//! economic parameters shared between the position ledger, the reward draw,
//! and the cross-chain gateway.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Chain selector identifying a remote ledger instance on the messaging relay
pub type ChainId = u64;

/// Handle for an in-flight randomness-oracle request
pub type RequestId = u64;

/// Relay-assigned identifier of a dispatched cross-chain message
pub type MessageId = u64;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
pub mod pallet_ids {
  /// Position Ledger pallet ID (custody of strategy deposits)
  pub const POSITION_LEDGER_PALLET_ID: &[u8; 8] = b"yr/ledgr";

  /// Cross-Chain Gateway pallet ID (escrow for outbound token legs)
  pub const GATEWAY_PALLET_ID: &[u8; 8] = b"yr/gatwy";

  /// Reward Draw pallet ID (reward-token treasury)
  pub const REWARD_DRAW_PALLET_ID: &[u8; 8] = b"yr/rewrd";
}

/// Ecosystem parameters defining thresholds and intervals.
///
/// These parameters are global across all pallets and coordinate the
/// operational limits of the router. Intervals are expressed in blocks
/// (~6s per block).
pub mod params {
  use super::Balance;
  use sp_arithmetic::Permill;

  /// Precision scalar for all mathematical calculations (10^12).
  pub const PRECISION: Balance = 1_000_000_000_000;

  /// Maximum concurrent position slots a single user may hold.
  ///
  /// Deposits always append a new slot; consolidation is the only way a
  /// slot disappears, so the list must be bounded against unbounded growth.
  pub const MAX_POSITIONS_PER_USER: u32 = 50;

  /// Per-user rebalance cooldown (~1 day at 6s/block).
  pub const REBALANCE_COOLDOWN_BLOCKS: u32 = 14_400;

  /// Ledger-wide cooldown for agent-driven global rebalances (~1 day).
  ///
  /// Independent of any per-user cooldown: a second global pass inside the
  /// interval is rejected regardless of which users it targets.
  pub const GLOBAL_REBALANCE_COOLDOWN_BLOCKS: u32 = 14_400;

  /// Rolling rate-limit window for cross-chain transfers (~1 hour).
  pub const RATE_LIMIT_WINDOW_BLOCKS: u32 = 600;

  /// Maximum cumulative transfer volume per (user, destination) window.
  pub const RATE_LIMIT_AMOUNT: Balance = 10_000 * PRECISION;

  /// Minimum spacing between reward draws (~1 week at 6s/block).
  pub const REWARD_DRAW_INTERVAL_BLOCKS: u32 = 100_800;

  /// Number of distinct winners selected per reward draw.
  pub const WINNER_COUNT: u32 = 3;

  /// Random words requested per reward draw.
  ///
  /// One word per winner; collisions are resolved by linear probing over the
  /// participant set, so no extra words are needed.
  pub const DRAW_WORD_COUNT: u32 = WINNER_COUNT;

  /// Default base reward paid to every draw winner (100 tokens).
  pub const BASE_REWARD_AMOUNT: Balance = 100 * PRECISION;

  /// Default bonus for winners active on more than one chain (50 tokens).
  pub const MULTI_CHAIN_BONUS_AMOUNT: Balance = 50 * PRECISION;

  /// Upper bound on the configurable slippage setting (10%).
  pub const MAX_SLIPPAGE_BPS: u16 = 1_000;

  /// Maximum age of a price-feed reading before it is rejected (~5 minutes).
  pub const PRICE_STALENESS_BLOCKS: u32 = 50;

  /// Maximum allowed deviation from the last accepted price (20%).
  ///
  /// Circuit breaker: a reading further from the last validated price than
  /// this is treated as manipulation, not as a market move.
  pub const MAX_PRICE_DEVIATION: Permill = Permill::from_percent(20);

  /// Maximum participants tracked between two reward draws.
  pub const MAX_DRAW_PARTICIPANTS: u32 = 10_000;
}
