//! Position Ledger Pallet
//!
//! Owns per-user strategy positions and implements deposit, withdraw,
//! rebalance (plain, price-gated, and ledger-wide), and consolidation.
//! External yield protocols are opaque supply/withdraw sinks behind the
//! [`StrategyProtocol`] adapter; the strategy catalog lives in
//! `pallet-strategy-registry`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::{LedgerInterface, OnInteraction, Position, PriceFeed, StrategyProtocol};

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

/// Runtime-provided setup shims for benchmarking.
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  fn ensure_funded(
    who: &AccountId,
    token: primitives::AssetKind,
    amount: primitives::Balance,
  ) -> frame::prelude::DispatchResult;
  /// Registers an active strategy supporting `token` and returns its id.
  fn setup_strategy(token: primitives::AssetKind) -> u32;
  /// Makes the price feed return `value`, fresh as of the current block.
  fn prime_price(value: primitives::Balance);
}

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::vec::Vec;
  use frame::deps::frame_support::{
    PalletId,
    storage::with_storage_layer,
    traits::{
      EnsureOrigin,
      fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
      fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
      tokens::Preservation,
    },
  };
  use frame::prelude::*;
  use polkadot_sdk::sp_runtime::{
    Permill,
    traits::{AccountIdConversion, Saturating, Zero},
  };
  use pallet_strategy_registry::StrategyInspect;
  use primitives::{AssetKind, Balance, ChainId};

  pub type PositionOf<T> = Position<BlockNumberFor<T>>;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;

    /// The assets pallet for managing local fungible tokens (AssetKind::Local)
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = Balance>;

    /// The currency trait for managing native tokens (AssetKind::Native)
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Strategy catalog lookups
    type Registry: StrategyInspect<Self::AccountId>;

    /// External yield protocol adapter (supply/withdraw sink)
    type Strategies: StrategyProtocol<Self::AccountId>;

    /// Raw price feed; staleness and deviation checks are layered here
    type PriceFeed: PriceFeed<BlockNumberFor<Self>>;

    /// Participant tracking hook fired on every user interaction
    type InteractionHook: OnInteraction<Self::AccountId>;

    /// Origin that can pause, set the agent, and manage operational knobs
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Pallet ID for deriving the custody account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Token paid out by `withdraw` (the stable settlement asset)
    #[pallet::constant]
    type StableAsset: Get<AssetKind>;

    /// Hard cap on concurrent position slots per user
    #[pallet::constant]
    type MaxPositionsPerUser: Get<u32>;

    /// Minimum blocks between successive rebalances for one user
    #[pallet::constant]
    type RebalanceCooldown: Get<BlockNumberFor<Self>>;

    /// Minimum blocks between ledger-wide agent rebalances
    #[pallet::constant]
    type GlobalRebalanceCooldown: Get<BlockNumberFor<Self>>;

    /// Maximum age of a price reading before it is rejected as stale
    #[pallet::constant]
    type PriceStalenessLimit: Get<BlockNumberFor<Self>>;

    /// Maximum deviation from the last accepted price
    #[pallet::constant]
    type MaxPriceDeviation: Get<Permill>;

    /// Upper bound admins may set the slippage knob to (basis points)
    #[pallet::constant]
    type MaxSlippageCapBps: Get<u16>;

    /// Initial slippage setting forwarded to protocol adapters
    #[pallet::constant]
    type DefaultSlippageBps: Get<u16>;

    /// Chain selector of this ledger instance
    #[pallet::constant]
    type LocalChain: Get<ChainId>;

    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Ordered, growable position list per user, indexed by slot.
  #[pallet::storage]
  #[pallet::getter(fn positions)]
  pub type Positions<T: Config> = StorageMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    BoundedVec<PositionOf<T>, T::MaxPositionsPerUser>,
    ValueQuery,
  >;

  /// Block of the user's last successful rebalance. Absent means the user
  /// has never rebalanced, which bypasses the cooldown once.
  #[pallet::storage]
  #[pallet::getter(fn user_last_rebalance)]
  pub type UserLastRebalance<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, BlockNumberFor<T>, OptionQuery>;

  /// Block of the last ledger-wide rebalance pass.
  #[pallet::storage]
  #[pallet::getter(fn last_global_rebalance)]
  pub type LastGlobalRebalance<T: Config> = StorageValue<_, BlockNumberFor<T>, OptionQuery>;

  /// Operational pause switch; blocks deposit/withdraw/rebalance entry
  /// points but never admin calls.
  #[pallet::storage]
  #[pallet::getter(fn paused)]
  pub type Paused<T: Config> = StorageValue<_, bool, ValueQuery>;

  /// Guard flag held across the external token-moving legs.
  #[pallet::storage]
  pub type OperationLock<T: Config> = StorageValue<_, bool, ValueQuery>;

  /// The privileged automation agent, if configured.
  #[pallet::storage]
  #[pallet::getter(fn agent)]
  pub type Agent<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

  /// Slippage setting forwarded to the protocol adapter (basis points).
  #[pallet::storage]
  #[pallet::getter(fn max_slippage_bps)]
  pub type MaxSlippageBps<T: Config> = StorageValue<_, u16, ValueQuery, T::DefaultSlippageBps>;

  /// Last price that passed staleness and deviation validation.
  #[pallet::storage]
  #[pallet::getter(fn last_valid_price)]
  pub type LastValidPrice<T: Config> = StorageValue<_, Balance, OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A new position slot was appended.
    Deposited {
      user: T::AccountId,
      strategy_id: u32,
      token: AssetKind,
      amount: Balance,
      position_index: u32,
    },
    /// Funds left a position slot for the caller.
    Withdrawn {
      user: T::AccountId,
      position_index: u32,
      amount: Balance,
    },
    /// Balance moved from one slot into a freshly appended sibling.
    Rebalanced {
      user: T::AccountId,
      source_index: u32,
      new_strategy_id: u32,
      amount: Balance,
      new_index: u32,
    },
    /// Price-gated rebalance whose condition was unmet; deliberate no-op.
    RebalanceSkipped {
      user: T::AccountId,
      position_index: u32,
      price: Balance,
      threshold: Balance,
    },
    /// Ledger-wide rebalance pass finished.
    GlobalRebalanceExecuted { requested: u32, moved: u32 },
    /// Same-strategy slots merged for a user.
    PositionsConsolidated {
      user: T::AccountId,
      before: u32,
      after: u32,
    },
    /// Pause switch toggled.
    PauseStateChanged { paused: bool },
    /// Privileged agent account replaced.
    AgentUpdated { agent: T::AccountId },
    /// Slippage knob updated.
    MaxSlippageUpdated { old_bps: u16, new_bps: u16 },
    /// Admin pulled funds out of the custody account.
    EmergencyWithdrawal {
      token: AssetKind,
      to: T::AccountId,
      amount: Balance,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Amount must be positive.
    ZeroAmount,
    /// Strategy is unknown, inactive for deposits, or the position index
    /// does not resolve to a slot.
    InvalidStrategy,
    /// The token is not registered for deposits into this strategy.
    UnsupportedDepositToken,
    /// Requested amount exceeds the slot balance.
    InsufficientBalance,
    /// Caller is neither the position owner, the agent, nor the admin.
    UnauthorizedCaller,
    /// Rebalance cooldown has not elapsed.
    RebalanceNotNeeded,
    /// The user's position list is full.
    TooManyPositions,
    /// Slippage setting above the hard cap.
    InvalidSlippage,
    /// Price feed is absent, zero, or stale.
    InvalidPriceFeed,
    /// Price moved further from the last accepted reading than allowed.
    PriceManipulationDetected,
    /// Ledger entry points are paused.
    Paused,
    /// A token-moving operation is already in flight.
    OperationInProgress,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Deposit `amount` of `token` into `strategy_id`, appending a new
    /// position slot for `for_user` (defaults to the caller).
    ///
    /// Deposits never merge into an existing slot.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::deposit())]
    pub fn deposit(
      origin: OriginFor<T>,
      token: AssetKind,
      strategy_id: u32,
      amount: Balance,
      origin_chain: ChainId,
      for_user: Option<T::AccountId>,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let beneficiary = for_user.unwrap_or_else(|| who.clone());
      Self::do_deposit(&who, &beneficiary, token, strategy_id, amount, origin_chain)
    }

    /// Withdraw `amount` from the caller's position at `position_index`.
    ///
    /// Draining a slot to zero leaves it in place; only consolidation
    /// removes slots.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::withdraw())]
    pub fn withdraw(
      origin: OriginFor<T>,
      position_index: u32,
      amount: Balance,
      dest_chain: ChainId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(!Paused::<T>::get(), Error::<T>::Paused);
      let now = frame_system::Pallet::<T>::block_number();

      let (pool, paid) = Positions::<T>::try_mutate(&who, |positions| {
        let position = positions
          .get_mut(position_index as usize)
          .ok_or(Error::<T>::InvalidStrategy)?;
        ensure!(amount <= position.balance, Error::<T>::InsufficientBalance);
        let strategy =
          T::Registry::get(position.strategy_id).ok_or(Error::<T>::InvalidStrategy)?;
        position.balance = position.balance.saturating_sub(amount);
        position.last_updated = now;
        Ok::<_, DispatchError>((strategy.pool, amount))
      })?;

      let stable = T::StableAsset::get();
      Self::with_operation_lock(|| {
        let actual = T::Strategies::withdraw(&pool, stable, paid, MaxSlippageBps::<T>::get())?;
        Self::transfer_asset(stable, &Self::account_id(), &who, actual)
      })?;

      T::InteractionHook::on_interaction(&who, dest_chain);
      Self::deposit_event(Event::Withdrawn {
        user: who,
        position_index,
        amount,
      });
      Ok(())
    }

    /// Move `amount` from `user`'s slot at `position_index` into a newly
    /// appended slot under `new_strategy_id`.
    ///
    /// Callable by the user, the privileged agent, or the admin; gated by
    /// the per-user cooldown (first-ever rebalance is always allowed).
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::rebalance())]
    pub fn rebalance(
      origin: OriginFor<T>,
      user: T::AccountId,
      position_index: u32,
      new_strategy_id: u32,
      amount: Balance,
      dest_chain: ChainId,
    ) -> DispatchResult {
      Self::ensure_user_agent_or_admin(origin, &user)?;
      ensure!(!Paused::<T>::get(), Error::<T>::Paused);
      Self::ensure_user_cooldown(&user)?;
      Self::do_rebalance(&user, position_index, new_strategy_id, amount, dest_chain)?;
      UserLastRebalance::<T>::insert(&user, frame_system::Pallet::<T>::block_number());
      Ok(())
    }

    /// Rebalance the caller's own slot only if the oracle price satisfies
    /// the threshold condition. An unmet condition is a clean no-op, not
    /// an error.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::rebalance_if_price_threshold())]
    pub fn rebalance_if_price_threshold(
      origin: OriginFor<T>,
      position_index: u32,
      new_strategy_id: u32,
      amount: Balance,
      threshold: Balance,
      is_above: bool,
      dest_chain: ChainId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(!Paused::<T>::get(), Error::<T>::Paused);

      let price = Self::validated_price()?;
      let condition_met = if is_above {
        price >= threshold
      } else {
        price <= threshold
      };
      if !condition_met {
        Self::deposit_event(Event::RebalanceSkipped {
          user: who,
          position_index,
          price,
          threshold,
        });
        return Ok(());
      }

      Self::ensure_user_cooldown(&who)?;
      Self::do_rebalance(&who, position_index, new_strategy_id, amount, dest_chain)?;
      UserLastRebalance::<T>::insert(&who, frame_system::Pallet::<T>::block_number());
      Ok(())
    }

    /// Agent/admin batch pass: for each user, move the first slot holding
    /// balance outside `new_strategy_id` into it. Gated by a ledger-wide
    /// cooldown independent of any per-user cooldown; individual user
    /// failures are skipped, not fatal.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::global_rebalance(users.len() as u32))]
    pub fn global_rebalance(
      origin: OriginFor<T>,
      users: Vec<T::AccountId>,
      new_strategy_id: u32,
      dest_chain: ChainId,
    ) -> DispatchResult {
      Self::ensure_agent_or_admin(origin)?;
      ensure!(!Paused::<T>::get(), Error::<T>::Paused);

      let now = frame_system::Pallet::<T>::block_number();
      if let Some(last) = LastGlobalRebalance::<T>::get() {
        ensure!(
          now.saturating_sub(last) >= T::GlobalRebalanceCooldown::get(),
          Error::<T>::RebalanceNotNeeded
        );
      }
      LastGlobalRebalance::<T>::put(now);

      let requested = users.len() as u32;
      let mut moved = 0u32;
      for user in users {
        let Some((index, amount)) = Positions::<T>::get(&user)
          .iter()
          .enumerate()
          .find(|(_, p)| !p.balance.is_zero() && p.strategy_id != new_strategy_id)
          .map(|(i, p)| (i as u32, p.balance))
        else {
          continue;
        };
        let outcome: DispatchResult = with_storage_layer(|| {
          Self::do_rebalance(&user, index, new_strategy_id, amount, dest_chain)
        });
        match outcome {
          Ok(()) => moved = moved.saturating_add(1),
          Err(e) => {
            log::warn!(target: "position-ledger", "global rebalance skipped user: {:?}", e);
          }
        }
      }

      Self::deposit_event(Event::GlobalRebalanceExecuted { requested, moved });
      Ok(())
    }

    /// Merge all of the caller's slots sharing a strategy into one slot
    /// (summed balance, most-recent timestamps). Idempotent.
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::consolidate_my_positions())]
    pub fn consolidate_my_positions(origin: OriginFor<T>) -> DispatchResult {
      let who = ensure_signed(origin)?;

      let (before, after) = Positions::<T>::try_mutate(&who, |positions| {
        let before = positions.len() as u32;
        let mut merged: Vec<PositionOf<T>> = Vec::with_capacity(positions.len());
        for position in positions.iter() {
          if let Some(existing) = merged
            .iter_mut()
            .find(|m| m.strategy_id == position.strategy_id)
          {
            existing.balance = existing.balance.saturating_add(position.balance);
            existing.last_updated = existing.last_updated.max(position.last_updated);
            existing.last_rebalanced = existing.last_rebalanced.max(position.last_rebalanced);
          } else {
            merged.push(*position);
          }
        }
        let after = merged.len() as u32;
        *positions = merged
          .try_into()
          .map_err(|_| Error::<T>::TooManyPositions)?;
        Ok::<_, DispatchError>((before, after))
      })?;

      Self::deposit_event(Event::PositionsConsolidated { user: who, before, after });
      Ok(())
    }

    /// Pause deposit/withdraw/rebalance entry points.
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::set_pause())]
    pub fn pause(origin: OriginFor<T>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      Paused::<T>::put(true);
      Self::deposit_event(Event::PauseStateChanged { paused: true });
      Ok(())
    }

    /// Restore normal operation.
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::set_pause())]
    pub fn unpause(origin: OriginFor<T>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      Paused::<T>::put(false);
      Self::deposit_event(Event::PauseStateChanged { paused: false });
      Ok(())
    }

    /// Replace the privileged automation agent.
    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::set_agent())]
    pub fn set_agent(origin: OriginFor<T>, agent: T::AccountId) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      Agent::<T>::put(&agent);
      Self::deposit_event(Event::AgentUpdated { agent });
      Ok(())
    }

    /// Update the slippage setting forwarded to protocol adapters.
    #[pallet::call_index(9)]
    #[pallet::weight(T::WeightInfo::set_max_slippage())]
    pub fn set_max_slippage(origin: OriginFor<T>, bps: u16) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(bps <= T::MaxSlippageCapBps::get(), Error::<T>::InvalidSlippage);
      let old_bps = MaxSlippageBps::<T>::get();
      MaxSlippageBps::<T>::put(bps);
      Self::deposit_event(Event::MaxSlippageUpdated { old_bps, new_bps: bps });
      Ok(())
    }

    /// Pull an arbitrary token balance out of the custody account.
    /// Available while paused; this is the operational escape hatch.
    #[pallet::call_index(10)]
    #[pallet::weight(T::WeightInfo::emergency_withdraw())]
    pub fn emergency_withdraw(
      origin: OriginFor<T>,
      token: AssetKind,
      to: T::AccountId,
      amount: Balance,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
      Self::transfer_asset(token, &Self::account_id(), &to, amount)?;
      Self::deposit_event(Event::EmergencyWithdrawal { token, to, amount });
      Ok(())
    }

    /// Recover native currency accumulated on the custody account (fee
    /// refunds and the like).
    #[pallet::call_index(11)]
    #[pallet::weight(T::WeightInfo::emergency_withdraw())]
    pub fn withdraw_native(
      origin: OriginFor<T>,
      to: T::AccountId,
      amount: Balance,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
      Self::transfer_asset(AssetKind::Native, &Self::account_id(), &to, amount)?;
      Self::deposit_event(Event::EmergencyWithdrawal {
        token: AssetKind::Native,
        to,
        amount,
      });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Custody account holding strategy deposits in flight.
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    fn ensure_agent_or_admin(origin: OriginFor<T>) -> Result<(), DispatchError> {
      match T::AdminOrigin::try_origin(origin) {
        Ok(_) => Ok(()),
        Err(origin) => {
          let who = ensure_signed(origin)?;
          ensure!(Agent::<T>::get() == Some(who), Error::<T>::UnauthorizedCaller);
          Ok(())
        }
      }
    }

    fn ensure_user_agent_or_admin(
      origin: OriginFor<T>,
      user: &T::AccountId,
    ) -> Result<(), DispatchError> {
      match T::AdminOrigin::try_origin(origin) {
        Ok(_) => Ok(()),
        Err(origin) => {
          let who = ensure_signed(origin)?;
          ensure!(
            &who == user || Agent::<T>::get() == Some(who),
            Error::<T>::UnauthorizedCaller
          );
          Ok(())
        }
      }
    }

    fn ensure_user_cooldown(user: &T::AccountId) -> Result<(), DispatchError> {
      if let Some(last) = UserLastRebalance::<T>::get(user) {
        let now = frame_system::Pallet::<T>::block_number();
        ensure!(
          now.saturating_sub(last) >= T::RebalanceCooldown::get(),
          Error::<T>::RebalanceNotNeeded
        );
      }
      Ok(())
    }

    /// Guard held across external token-moving legs. The flag only
    /// survives within the current extrinsic: on error the transactional
    /// layer rolls it back together with everything else.
    fn with_operation_lock<R>(
      f: impl FnOnce() -> Result<R, DispatchError>,
    ) -> Result<R, DispatchError> {
      ensure!(!OperationLock::<T>::get(), Error::<T>::OperationInProgress);
      OperationLock::<T>::put(true);
      let result = f();
      OperationLock::<T>::kill();
      result
    }

    fn transfer_asset(
      token: AssetKind,
      from: &T::AccountId,
      to: &T::AccountId,
      amount: Balance,
    ) -> DispatchResult {
      match token {
        AssetKind::Native => {
          T::Currency::transfer(from, to, amount, Preservation::Expendable)?;
        }
        AssetKind::Local(id) => {
          T::Assets::transfer(id, from, to, amount, Preservation::Expendable)?;
        }
      }
      Ok(())
    }

    /// Staleness- and deviation-validated oracle read. A reading that
    /// passes becomes the new reference for the deviation check.
    pub fn validated_price() -> Result<Balance, DispatchError> {
      let (value, updated_at) =
        T::PriceFeed::latest_price().ok_or(Error::<T>::InvalidPriceFeed)?;
      ensure!(!value.is_zero(), Error::<T>::InvalidPriceFeed);

      let now = frame_system::Pallet::<T>::block_number();
      ensure!(
        now.saturating_sub(updated_at) <= T::PriceStalenessLimit::get(),
        Error::<T>::InvalidPriceFeed
      );

      if let Some(last) = LastValidPrice::<T>::get() {
        let max_move = T::MaxPriceDeviation::get().mul_floor(last);
        ensure!(
          value.abs_diff(last) <= max_move,
          Error::<T>::PriceManipulationDetected
        );
      }
      LastValidPrice::<T>::put(value);
      Ok(value)
    }

    fn do_deposit(
      payer: &T::AccountId,
      user: &T::AccountId,
      token: AssetKind,
      strategy_id: u32,
      amount: Balance,
      origin_chain: ChainId,
    ) -> DispatchResult {
      ensure!(!Paused::<T>::get(), Error::<T>::Paused);
      ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
      let strategy = T::Registry::get(strategy_id).ok_or(Error::<T>::InvalidStrategy)?;
      ensure!(strategy.active, Error::<T>::InvalidStrategy);
      ensure!(
        T::Registry::supports_token(strategy_id, token),
        Error::<T>::UnsupportedDepositToken
      );
      // Capacity is checked before any tokens move.
      ensure!(
        Positions::<T>::decode_len(user).unwrap_or(0) < T::MaxPositionsPerUser::get() as usize,
        Error::<T>::TooManyPositions
      );

      Self::with_operation_lock(|| {
        Self::transfer_asset(token, payer, &Self::account_id(), amount)?;
        T::Strategies::supply(&strategy.pool, token, amount, MaxSlippageBps::<T>::get())
      })?;

      let now = frame_system::Pallet::<T>::block_number();
      let position_index = Positions::<T>::try_mutate(user, |positions| {
        positions
          .try_push(Position {
            strategy_id,
            balance: amount,
            last_updated: now,
            last_rebalanced: Zero::zero(),
          })
          .map_err(|_| Error::<T>::TooManyPositions)?;
        Ok::<_, DispatchError>(positions.len() as u32 - 1)
      })?;

      T::InteractionHook::on_interaction(user, origin_chain);
      Self::deposit_event(Event::Deposited {
        user: user.clone(),
        strategy_id,
        token,
        amount,
        position_index,
      });
      Ok(())
    }

    /// Core rebalance: decrement the source slot and append a sibling under
    /// the target strategy. Cooldown handling stays with the callers.
    fn do_rebalance(
      user: &T::AccountId,
      position_index: u32,
      new_strategy_id: u32,
      amount: Balance,
      dest_chain: ChainId,
    ) -> DispatchResult {
      let target = T::Registry::get(new_strategy_id).ok_or(Error::<T>::InvalidStrategy)?;
      ensure!(target.active, Error::<T>::InvalidStrategy);

      let now = frame_system::Pallet::<T>::block_number();
      let (source_pool, new_index) = Positions::<T>::try_mutate(user, |positions| {
        let source = positions
          .get_mut(position_index as usize)
          .ok_or(Error::<T>::InvalidStrategy)?;
        ensure!(amount <= source.balance, Error::<T>::InsufficientBalance);
        let source_strategy =
          T::Registry::get(source.strategy_id).ok_or(Error::<T>::InvalidStrategy)?;
        source.balance = source.balance.saturating_sub(amount);
        source.last_updated = now;
        source.last_rebalanced = now;
        positions
          .try_push(Position {
            strategy_id: new_strategy_id,
            balance: amount,
            last_updated: now,
            last_rebalanced: now,
          })
          .map_err(|_| Error::<T>::TooManyPositions)?;
        Ok::<_, DispatchError>((source_strategy.pool, positions.len() as u32 - 1))
      })?;

      let stable = T::StableAsset::get();
      let bps = MaxSlippageBps::<T>::get();
      Self::with_operation_lock(|| {
        let released = T::Strategies::withdraw(&source_pool, stable, amount, bps)?;
        T::Strategies::supply(&target.pool, stable, released, bps)
      })?;

      T::InteractionHook::on_interaction(user, dest_chain);
      Self::deposit_event(Event::Rebalanced {
        user: user.clone(),
        source_index: position_index,
        new_strategy_id,
        amount,
        new_index,
      });
      Ok(())
    }
  }

  impl<T: Config> LedgerInterface<T::AccountId> for Pallet<T> {
    fn deposit_for(
      payer: &T::AccountId,
      user: &T::AccountId,
      token: AssetKind,
      strategy_id: u32,
      amount: Balance,
      origin_chain: ChainId,
    ) -> DispatchResult {
      Self::do_deposit(payer, user, token, strategy_id, amount, origin_chain)
    }

    fn rebalance_for(
      user: &T::AccountId,
      position_index: u32,
      new_strategy_id: u32,
      amount: Balance,
      origin_chain: ChainId,
    ) -> DispatchResult {
      ensure!(!Paused::<T>::get(), Error::<T>::Paused);
      Self::ensure_user_cooldown(user)?;
      Self::do_rebalance(user, position_index, new_strategy_id, amount, origin_chain)?;
      UserLastRebalance::<T>::insert(user, frame_system::Pallet::<T>::block_number());
      Ok(())
    }

    fn is_agent(who: &T::AccountId) -> bool {
      Agent::<T>::get().as_ref() == Some(who)
    }

    fn position_count(user: &T::AccountId) -> u32 {
      Positions::<T>::decode_len(user).unwrap_or(0) as u32
    }
  }
}
