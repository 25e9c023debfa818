//! Reward Draw Pallet
//!
//! Two randomness-driven flows share one oracle callback:
//! - random deposits: a user commits funds, the randomness word picks the
//!   strategy, and the deposit is routed into the position ledger;
//! - the periodic reward draw: everyone who touched the ledger since the
//!   last draw is a participant, and the words pick distinct winners who
//!   are paid from the pallet reward account.
//!
//! Participant tracking is fed by the ledger through the `OnInteraction`
//! hook implemented here.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::{RandomnessSource, VrfDepositRequest};

pub mod weights;
pub use weights::WeightInfo;


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
  /// Registers an active strategy supporting `token`.
  fn setup_strategy(token: primitives::AssetKind);
}

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::vec::Vec;
  use frame::deps::frame_support::{
    PalletId,
    traits::{
      EnsureOrigin,
      fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
      fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
      tokens::Preservation,
    },
  };
  use frame::prelude::*;
  use pallet_position_ledger::{LedgerInterface, OnInteraction};
  use pallet_strategy_registry::StrategyInspect;
  use polkadot_sdk::sp_runtime::traits::{AccountIdConversion, Saturating, Zero};
  use primitives::{AssetKind, Balance, ChainId, RequestId};

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

    /// Position ledger consumed by fulfilled random deposits
    type Ledger: LedgerInterface<Self::AccountId>;

    /// Strategy catalog; random deposits pick `word % strategy_count`
    type Registry: StrategyInspect<Self::AccountId>;

    /// Randomness oracle requests
    type Randomness: RandomnessSource;

    /// Origin allowed to deliver randomness words
    type OracleOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Pallet ID for deriving the reward payout account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Token rewards are paid in
    #[pallet::constant]
    type RewardToken: Get<AssetKind>;

    /// Winners per draw
    #[pallet::constant]
    type WinnerCount: Get<u32>;

    /// Randomness words requested per draw
    #[pallet::constant]
    type DrawWordCount: Get<u32>;

    /// Minimum blocks between draws
    #[pallet::constant]
    type RewardDrawInterval: Get<BlockNumberFor<Self>>;

    /// Hard cap on tracked participants per draw period
    #[pallet::constant]
    type MaxParticipants: Get<u32>;

    /// Initial per-winner base reward
    #[pallet::constant]
    type DefaultBaseReward: Get<Balance>;

    /// Initial bonus for winners active on more than one chain
    #[pallet::constant]
    type DefaultMultiChainBonus: Get<Balance>;

    /// Chain selector of this ledger instance
    #[pallet::constant]
    type LocalChain: Get<ChainId>;

    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Random-deposit audit log; entries are never deleted.
  #[pallet::storage]
  #[pallet::getter(fn vrf_deposit)]
  pub type VrfDeposits<T: Config> =
    StorageMap<_, Blake2_128Concat, RequestId, VrfDepositRequest<T::AccountId>, OptionQuery>;

  /// Outstanding draw request, if any. At most one draw is in flight.
  #[pallet::storage]
  #[pallet::getter(fn pending_draw)]
  pub type PendingDraw<T: Config> = StorageValue<_, RequestId, OptionQuery>;

  /// Block of the last completed draw.
  #[pallet::storage]
  #[pallet::getter(fn last_draw_at)]
  pub type LastDrawAt<T: Config> = StorageValue<_, BlockNumberFor<T>, ValueQuery>;

  /// Deduplicated participant set for the current draw period.
  #[pallet::storage]
  #[pallet::getter(fn participants)]
  pub type Participants<T: Config> =
    StorageValue<_, BoundedVec<T::AccountId, T::MaxParticipants>, ValueQuery>;

  /// Chains each participant touched this period.
  #[pallet::storage]
  pub type ChainsTouched<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Twox64Concat,
    ChainId,
    (),
    OptionQuery,
  >;

  /// Distinct-chain tally per participant, drives the multi-chain bonus.
  #[pallet::storage]
  #[pallet::getter(fn distinct_chain_count)]
  pub type DistinctChainCount<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, u32, ValueQuery>;

  /// Interactions per participant this period. Presence marks participation.
  #[pallet::storage]
  #[pallet::getter(fn interaction_count)]
  pub type InteractionCount<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, u32, OptionQuery>;

  /// Per-winner base reward, admin-settable.
  #[pallet::storage]
  #[pallet::getter(fn base_reward)]
  pub type BaseReward<T: Config> = StorageValue<_, Balance, ValueQuery, T::DefaultBaseReward>;

  /// Extra reward for winners active on more than one chain.
  #[pallet::storage]
  #[pallet::getter(fn multi_chain_bonus)]
  pub type MultiChainBonus<T: Config> =
    StorageValue<_, Balance, ValueQuery, T::DefaultMultiChainBonus>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A random deposit awaits its randomness word.
    RandomDepositRequested {
      request_id: RequestId,
      user: T::AccountId,
      token: AssetKind,
      amount: Balance,
    },
    /// The word arrived and the deposit was routed into the ledger.
    RandomDepositFulfilled {
      request_id: RequestId,
      user: T::AccountId,
      strategy_id: u32,
    },
    /// A draw was requested from the randomness oracle.
    RewardDrawRequested {
      request_id: RequestId,
      participants: u32,
    },
    /// Winners were paid and the participant set reset.
    RewardsDrawn {
      request_id: RequestId,
      winners: Vec<T::AccountId>,
      total_paid: Balance,
    },
    /// Reward amounts reconfigured.
    RewardAmountsSet { base: Balance, bonus: Balance },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Amount must be positive.
    ZeroAmount,
    /// Unknown, already fulfilled, or word-less randomness delivery.
    InvalidVrfRequest,
    /// The draw interval has not elapsed yet.
    RewardDrawNotReady,
    /// Fewer participants than winners to pick.
    InsufficientParticipants,
    /// The reward account cannot cover the whole payout.
    InsufficientRewardFunds,
    /// A draw request is already awaiting its words.
    DrawPending,
    /// No strategies registered to route a random deposit into.
    NoStrategies,
    /// The participant set is full for this draw period.
    TooManyParticipants,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Commit `amount` of `token` to a strategy picked by the randomness
    /// oracle. Funds stay with the caller until the word arrives.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::deposit_random())]
    pub fn deposit_random(origin: OriginFor<T>, token: AssetKind, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
      ensure!(T::Registry::strategy_count() > 0, Error::<T>::NoStrategies);
      // A user the tracker cannot admit could never win; reject up front.
      ensure!(
        InteractionCount::<T>::contains_key(&who)
          || (Participants::<T>::decode_len().unwrap_or(0) as u32) < T::MaxParticipants::get(),
        Error::<T>::TooManyParticipants
      );

      let request_id = T::Randomness::request_random_words(1);
      VrfDeposits::<T>::insert(
        request_id,
        VrfDepositRequest {
          user: who.clone(),
          token,
          amount,
          fulfilled: false,
        },
      );

      Self::deposit_event(Event::RandomDepositRequested {
        request_id,
        user: who,
        token,
        amount,
      });
      Ok(())
    }

    /// Randomness delivery. One callback serves both flows: the id is
    /// matched against the deposit log first, then the pending draw.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::fulfill_random_words())]
    pub fn fulfill_random_words(
      origin: OriginFor<T>,
      request_id: RequestId,
      words: Vec<u64>,
    ) -> DispatchResult {
      T::OracleOrigin::ensure_origin(origin)?;

      if VrfDeposits::<T>::contains_key(request_id) {
        return Self::fulfill_random_deposit(request_id, &words);
      }
      if PendingDraw::<T>::get() == Some(request_id) {
        return Self::execute_draw(request_id, &words);
      }
      Err(Error::<T>::InvalidVrfRequest.into())
    }

    /// Ask the oracle for draw words. One draw per interval, and only once
    /// enough participants accumulated.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::request_reward_draw())]
    pub fn request_reward_draw(origin: OriginFor<T>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(PendingDraw::<T>::get().is_none(), Error::<T>::DrawPending);

      let now = frame_system::Pallet::<T>::block_number();
      ensure!(
        now >= LastDrawAt::<T>::get().saturating_add(T::RewardDrawInterval::get()),
        Error::<T>::RewardDrawNotReady
      );
      let participants = Participants::<T>::decode_len().unwrap_or(0) as u32;
      ensure!(
        participants >= T::WinnerCount::get(),
        Error::<T>::InsufficientParticipants
      );

      let request_id = T::Randomness::request_random_words(T::DrawWordCount::get());
      PendingDraw::<T>::put(request_id);

      Self::deposit_event(Event::RewardDrawRequested {
        request_id,
        participants,
      });
      Ok(())
    }

    /// Reconfigure the payout amounts.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::set_reward_amounts())]
    pub fn set_reward_amounts(origin: OriginFor<T>, base: Balance, bonus: Balance) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      BaseReward::<T>::put(base);
      MultiChainBonus::<T>::put(bonus);
      Self::deposit_event(Event::RewardAmountsSet { base, bonus });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Reward payout account.
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    fn fulfill_random_deposit(request_id: RequestId, words: &[u64]) -> DispatchResult {
      let word = *words.first().ok_or(Error::<T>::InvalidVrfRequest)?;
      let count = T::Registry::strategy_count();
      ensure!(count > 0, Error::<T>::NoStrategies);

      VrfDeposits::<T>::try_mutate(request_id, |maybe| {
        let request = maybe.as_mut().ok_or(Error::<T>::InvalidVrfRequest)?;
        ensure!(!request.fulfilled, Error::<T>::InvalidVrfRequest);

        let strategy_id = (word % count as u64) as u32;
        T::Ledger::deposit_for(
          &request.user,
          &request.user,
          request.token,
          strategy_id,
          request.amount,
          T::LocalChain::get(),
        )?;
        request.fulfilled = true;

        Self::deposit_event(Event::RandomDepositFulfilled {
          request_id,
          user: request.user.clone(),
          strategy_id,
        });
        Ok(())
      })
    }

    fn execute_draw(request_id: RequestId, words: &[u64]) -> DispatchResult {
      let winner_count = T::WinnerCount::get() as usize;
      ensure!(words.len() >= winner_count, Error::<T>::InvalidVrfRequest);

      let participants = Participants::<T>::get();
      ensure!(
        participants.len() >= winner_count,
        Error::<T>::InsufficientParticipants
      );

      // Distinct winners: each word picks an index, collisions probe
      // forward. Termination is guaranteed by the length check above.
      let mut indices: Vec<usize> = Vec::with_capacity(winner_count);
      for word in words.iter().take(winner_count) {
        let mut idx = (*word % participants.len() as u64) as usize;
        while indices.contains(&idx) {
          idx = (idx + 1) % participants.len();
        }
        indices.push(idx);
      }

      let base = BaseReward::<T>::get();
      let bonus = MultiChainBonus::<T>::get();
      let rewards: Vec<(T::AccountId, Balance)> = indices
        .iter()
        .map(|&i| {
          let winner = participants[i].clone();
          let reward = if DistinctChainCount::<T>::get(&winner) > 1 {
            base.saturating_add(bonus)
          } else {
            base
          };
          (winner, reward)
        })
        .collect();

      // The whole payout must be covered before anyone is paid; a partial
      // draw would burn the participant set for nothing.
      let total: Balance = rewards.iter().fold(0, |acc, (_, r)| acc.saturating_add(*r));
      ensure!(
        Self::reward_balance() >= total,
        Error::<T>::InsufficientRewardFunds
      );

      let source = Self::account_id();
      let token = T::RewardToken::get();
      for (winner, reward) in &rewards {
        Self::transfer_asset(token, &source, winner, *reward)?;
      }

      for participant in participants.iter() {
        let _ = ChainsTouched::<T>::clear_prefix(participant, u32::MAX, None);
        DistinctChainCount::<T>::remove(participant);
        InteractionCount::<T>::remove(participant);
      }
      Participants::<T>::kill();
      PendingDraw::<T>::kill();
      LastDrawAt::<T>::put(frame_system::Pallet::<T>::block_number());

      Self::deposit_event(Event::RewardsDrawn {
        request_id,
        winners: rewards.into_iter().map(|(w, _)| w).collect(),
        total_paid: total,
      });
      Ok(())
    }

    fn reward_balance() -> Balance {
      match T::RewardToken::get() {
        AssetKind::Native => T::Currency::balance(&Self::account_id()),
        AssetKind::Local(id) => T::Assets::balance(id, &Self::account_id()),
      }
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
  }

  impl<T: Config> OnInteraction<T::AccountId> for Pallet<T> {
    fn on_interaction(user: &T::AccountId, chain: ChainId) {
      if !InteractionCount::<T>::contains_key(user) {
        let admitted = Participants::<T>::try_mutate(|participants| {
          participants.try_push(user.clone()).map_err(|_| ())
        })
        .is_ok();
        if !admitted {
          log::warn!(target: "reward-draw", "participant set full, interaction not tracked");
          return;
        }
      }
      if !ChainsTouched::<T>::contains_key(user, chain) {
        ChainsTouched::<T>::insert(user, chain, ());
        DistinctChainCount::<T>::mutate(user, |c| *c = c.saturating_add(1));
      }
      InteractionCount::<T>::mutate(user, |c| *c = Some(c.unwrap_or(0).saturating_add(1)));
    }
  }
}
