//! Strategy Registry Pallet
//!
//! Admin-managed catalog of external yield strategies. Every other pallet in
//! the workspace treats a strategy as an opaque deposit/withdraw destination
//! and consults this registry for existence, activity, and the set of tokens
//! accepted for new deposits.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod weights;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

use frame::prelude::*;
use primitives::AssetKind;

/// Maximum length of a strategy's external-protocol label.
pub type ProtocolLabelLimit = ConstU32<32>;

/// A registered external yield destination.
///
/// The id is the registry map key and is immutable once assigned. `active`
/// gates new deposits only: positions already held in an inactive strategy
/// can always be withdrawn.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
pub struct Strategy<AccountId> {
  /// Human-readable external protocol label ("aave-v3", "compound", ...)
  pub protocol: BoundedVec<u8, ProtocolLabelLimit>,
  /// Account of the external protocol's pool
  pub pool: AccountId,
  /// Receipt token minted by the external protocol against deposits
  pub receipt_token: u32,
  /// Whether the strategy accepts new deposits
  pub active: bool,
}

/// Read-side interface consumed by the position ledger and the reward draw.
pub trait StrategyInspect<AccountId> {
  fn get(strategy_id: u32) -> Option<Strategy<AccountId>>;
  fn is_active(strategy_id: u32) -> bool;
  fn supports_token(strategy_id: u32, token: AssetKind) -> bool;
  fn strategy_count() -> u32;
}

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::vec::Vec;
  use frame::deps::frame_support::traits::EnsureOrigin;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Origin that can register strategies and manage supported tokens
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Catalog of strategies keyed by their immutable id.
  #[pallet::storage]
  #[pallet::getter(fn strategy)]
  pub type Strategies<T: Config> =
    StorageMap<_, Blake2_128Concat, u32, Strategy<T::AccountId>, OptionQuery>;

  /// Next id to assign; ids are sequential and never reused.
  #[pallet::storage]
  #[pallet::getter(fn next_strategy_id)]
  pub type NextStrategyId<T: Config> = StorageValue<_, u32, ValueQuery>;

  /// Deposit tokens registered as accepted per strategy.
  #[pallet::storage]
  pub type SupportedTokens<T: Config> =
    StorageDoubleMap<_, Blake2_128Concat, u32, Blake2_128Concat, AssetKind, (), OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A new strategy entered the catalog.
    StrategyRegistered {
      strategy_id: u32,
      protocol: Vec<u8>,
      pool: T::AccountId,
    },
    /// Deposit gate toggled for an existing strategy.
    StrategyStatusChanged { strategy_id: u32, active: bool },
    /// A deposit token was enabled or disabled for a strategy.
    SupportedTokenUpdated {
      strategy_id: u32,
      token: AssetKind,
      supported: bool,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// No strategy is registered under the given id.
    UnknownStrategy,
    /// The sequential id space is exhausted.
    TooManyStrategies,
    /// Protocol label exceeds the bounded length.
    ProtocolLabelTooLong,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Register a new strategy and assign it the next sequential id.
    ///
    /// The new strategy starts active but accepts no deposit token until
    /// `set_supported_token` enables one.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::register_strategy())]
    pub fn register_strategy(
      origin: OriginFor<T>,
      protocol: Vec<u8>,
      pool: T::AccountId,
      receipt_token: u32,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let protocol: BoundedVec<u8, ProtocolLabelLimit> = protocol
        .try_into()
        .map_err(|_| Error::<T>::ProtocolLabelTooLong)?;
      let strategy_id = NextStrategyId::<T>::get();
      let next = strategy_id
        .checked_add(1)
        .ok_or(Error::<T>::TooManyStrategies)?;
      Strategies::<T>::insert(
        strategy_id,
        Strategy {
          protocol: protocol.clone(),
          pool: pool.clone(),
          receipt_token,
          active: true,
        },
      );
      NextStrategyId::<T>::put(next);
      Self::deposit_event(Event::StrategyRegistered {
        strategy_id,
        protocol: protocol.into_inner(),
        pool,
      });
      Ok(())
    }

    /// Toggle the deposit gate of an existing strategy.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::set_strategy_active())]
    pub fn set_strategy_active(origin: OriginFor<T>, strategy_id: u32, active: bool) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      Strategies::<T>::try_mutate(strategy_id, |maybe| -> DispatchResult {
        let strategy = maybe.as_mut().ok_or(Error::<T>::UnknownStrategy)?;
        strategy.active = active;
        Ok(())
      })?;
      Self::deposit_event(Event::StrategyStatusChanged {
        strategy_id,
        active,
      });
      Ok(())
    }

    /// Enable or disable a deposit token for a strategy.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::set_supported_token())]
    pub fn set_supported_token(
      origin: OriginFor<T>,
      strategy_id: u32,
      token: AssetKind,
      supported: bool,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        Strategies::<T>::contains_key(strategy_id),
        Error::<T>::UnknownStrategy
      );
      if supported {
        SupportedTokens::<T>::insert(strategy_id, token, ());
      } else {
        SupportedTokens::<T>::remove(strategy_id, token);
      }
      Self::deposit_event(Event::SupportedTokenUpdated {
        strategy_id,
        token,
        supported,
      });
      Ok(())
    }
  }

  impl<T: Config> StrategyInspect<T::AccountId> for Pallet<T> {
    fn get(strategy_id: u32) -> Option<Strategy<T::AccountId>> {
      Strategies::<T>::get(strategy_id)
    }

    fn is_active(strategy_id: u32) -> bool {
      Strategies::<T>::get(strategy_id)
        .map(|s| s.active)
        .unwrap_or(false)
    }

    fn supports_token(strategy_id: u32, token: AssetKind) -> bool {
      SupportedTokens::<T>::contains_key(strategy_id, token)
    }

    fn strategy_count() -> u32 {
      NextStrategyId::<T>::get()
    }
  }
}
