//! Cross-Chain Gateway Pallet
//!
//! Outbound transfers and rebalance commands are SCALE-encoded
//! [`GatewayMessage`]s handed to a [`MessageRelay`]; inbound envelopes arrive
//! from the relay origin, are deduplicated by message id, and routed into the
//! position ledger. Outbound value is throttled by a per-(user, chain)
//! windowed rate limit.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::{GatewayMessage, InboundEnvelope, MessageRelay, RateLimitState};

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
  /// Returns an account the ledger recognizes as its agent.
  fn setup_agent() -> AccountId;
}

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::vec::Vec;
  use codec::{Decode, Encode};
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
  use pallet_position_ledger::LedgerInterface;
  use polkadot_sdk::sp_runtime::traits::{AccountIdConversion, Saturating, Zero};
  use primitives::{AssetKind, Balance, ChainId, MessageId};

  pub type RateLimitOf<T> = RateLimitState<BlockNumberFor<T>>;
  pub type PeerAddress = BoundedVec<u8, ConstU32<64>>;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;

    /// The assets pallet for managing local fungible tokens (AssetKind::Local)
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = Balance>;

    /// The currency trait for the native relay-fee leg
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Position ledger inbound messages are routed into
    type Ledger: LedgerInterface<Self::AccountId>;

    /// Outbound message transport
    type Relay: MessageRelay;

    /// Origin the relay delivers inbound envelopes from
    type RelayOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Pallet ID for deriving the gateway custody account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Token carried by cross-chain transfers
    #[pallet::constant]
    type StableAsset: Get<AssetKind>;

    /// Rate-limit window length in blocks
    #[pallet::constant]
    type RateLimitWindow: Get<BlockNumberFor<Self>>;

    /// Maximum outbound value per (user, chain) within one window
    #[pallet::constant]
    type RateLimitAmount: Get<Balance>;

    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Destination chains transfers may be sent to.
  #[pallet::storage]
  #[pallet::getter(fn supported_chain)]
  pub type SupportedChains<T: Config> = StorageMap<_, Twox64Concat, ChainId, (), OptionQuery>;

  /// Counterpart gateway addresses, opaque to this pallet.
  #[pallet::storage]
  #[pallet::getter(fn peer_gateway)]
  pub type PeerGateways<T: Config> = StorageMap<_, Twox64Concat, ChainId, PeerAddress, OptionQuery>;

  /// Windowed outbound-value tracker.
  #[pallet::storage]
  #[pallet::getter(fn rate_limit)]
  pub type RateLimits<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Twox64Concat,
    ChainId,
    RateLimitOf<T>,
    ValueQuery,
  >;

  /// Strategy inbound transfers are deposited into.
  #[pallet::storage]
  #[pallet::getter(fn default_strategy_id)]
  pub type DefaultStrategyId<T: Config> = StorageValue<_, u32, ValueQuery>;

  /// Inbound dedup set. Entries are never removed.
  #[pallet::storage]
  pub type SeenMessages<T: Config> = StorageMap<_, Twox64Concat, MessageId, (), OptionQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// An outbound transfer left with its token leg.
    TransferInitiated {
      message_id: MessageId,
      user: T::AccountId,
      dest_chain: ChainId,
      receiver: T::AccountId,
      amount: Balance,
      fee: Balance,
    },
    /// An outbound rebalance command left (no token leg).
    RebalanceMessageSent {
      message_id: MessageId,
      user: T::AccountId,
      dest_chain: ChainId,
    },
    /// An inbound transfer was routed into the ledger.
    TransferReceived {
      message_id: MessageId,
      source_chain: ChainId,
      receiver: T::AccountId,
      amount: Balance,
    },
    /// An inbound rebalance command was executed.
    RebalanceExecuted {
      message_id: MessageId,
      user: T::AccountId,
    },
    /// Chain support toggled.
    ChainSupportSet { chain: ChainId, enabled: bool },
    /// Peer gateway address recorded.
    PeerGatewaySet { chain: ChainId },
    /// Inbound routing strategy changed.
    DefaultStrategySet { strategy_id: u32 },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Amount must be positive.
    ZeroAmount,
    /// Caller is neither the receiver nor the agent.
    UnauthorizedCaller,
    /// Destination or source chain is not supported.
    InvalidChainSelector,
    /// Outbound value cap for this window is exhausted.
    RateLimitExceeded,
    /// The fee budget does not cover the quoted relay fee.
    InsufficientFee,
    /// Decoded message type does not fit the delivery shape.
    UnknownMessageType,
    /// Payload does not decode as a gateway message.
    MalformedMessage,
    /// Message id was already processed.
    StaleMessage,
    /// Peer gateway address exceeds the bound.
    PeerTooLong,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Send `amount` of the stable asset to `receiver` on `dest_chain`.
    /// Callable by the receiver themselves or the ledger agent. The rate
    /// limit is committed before any tokens move.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::transfer_cross_chain())]
    pub fn transfer_cross_chain(
      origin: OriginFor<T>,
      amount: Balance,
      dest_chain: ChainId,
      receiver: T::AccountId,
      fee_budget: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(
        who == receiver || T::Ledger::is_agent(&who),
        Error::<T>::UnauthorizedCaller
      );
      ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
      ensure!(
        SupportedChains::<T>::contains_key(dest_chain),
        Error::<T>::InvalidChainSelector
      );
      Self::commit_rate_limit(&who, dest_chain, amount)?;

      let payload = GatewayMessage::Transfer {
        receiver: receiver.clone(),
        amount,
      }
      .encode();
      let fee = T::Relay::quote_fee(dest_chain, &payload);
      ensure!(fee_budget >= fee, Error::<T>::InsufficientFee);

      let custody = Self::account_id();
      T::Currency::transfer(&who, &custody, fee, Preservation::Expendable)?;
      Self::transfer_asset(T::StableAsset::get(), &who, &custody, amount)?;

      let message_id = T::Relay::send(dest_chain, payload, fee)?;
      Self::deposit_event(Event::TransferInitiated {
        message_id,
        user: who,
        dest_chain,
        receiver,
        amount,
        fee,
      });
      Ok(())
    }

    /// Instruct the gateway on `dest_chain` to rebalance `user`'s position
    /// there. Agent only; carries no tokens.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::trigger_crosschain_rebalance())]
    pub fn trigger_crosschain_rebalance(
      origin: OriginFor<T>,
      user: T::AccountId,
      position_index: u32,
      new_strategy_id: u32,
      amount: Balance,
      dest_chain: ChainId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(T::Ledger::is_agent(&who), Error::<T>::UnauthorizedCaller);
      ensure!(
        SupportedChains::<T>::contains_key(dest_chain),
        Error::<T>::InvalidChainSelector
      );

      let payload = GatewayMessage::Rebalance {
        user: user.clone(),
        position_index,
        new_strategy_id,
        amount,
      }
      .encode();
      let fee = T::Relay::quote_fee(dest_chain, &payload);
      T::Currency::transfer(&who, &Self::account_id(), fee, Preservation::Expendable)?;

      let message_id = T::Relay::send(dest_chain, payload, fee)?;
      Self::deposit_event(Event::RebalanceMessageSent {
        message_id,
        user,
        dest_chain,
      });
      Ok(())
    }

    /// Inbound delivery from the relay. Envelopes with a token leg must
    /// decode as `Transfer`; bare envelopes must decode as `Rebalance`.
    /// Each message id is processed at most once.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::receive_message())]
    pub fn receive_message(origin: OriginFor<T>, envelope: InboundEnvelope) -> DispatchResult {
      T::RelayOrigin::ensure_origin(origin)?;
      ensure!(
        SupportedChains::<T>::contains_key(envelope.source_chain),
        Error::<T>::InvalidChainSelector
      );
      ensure!(
        !SeenMessages::<T>::contains_key(envelope.message_id),
        Error::<T>::StaleMessage
      );

      let message = GatewayMessage::<T::AccountId>::decode(&mut &envelope.payload[..])
        .map_err(|_| Error::<T>::MalformedMessage)?;

      let event = match (message, envelope.token_amount) {
        (GatewayMessage::Transfer { receiver, .. }, Some(amount)) => {
          ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
          T::Ledger::deposit_for(
            &Self::account_id(),
            &receiver,
            T::StableAsset::get(),
            DefaultStrategyId::<T>::get(),
            amount,
            envelope.source_chain,
          )?;
          Event::TransferReceived {
            message_id: envelope.message_id,
            source_chain: envelope.source_chain,
            receiver,
            amount,
          }
        }
        (
          GatewayMessage::Rebalance {
            user,
            position_index,
            new_strategy_id,
            amount,
          },
          None,
        ) => {
          T::Ledger::rebalance_for(
            &user,
            position_index,
            new_strategy_id,
            amount,
            envelope.source_chain,
          )?;
          Event::RebalanceExecuted {
            message_id: envelope.message_id,
            user,
          }
        }
        // Shape and tag disagree: a transfer without tokens or a rebalance
        // arriving with a token leg.
        _ => return Err(Error::<T>::UnknownMessageType.into()),
      };

      // A message counts as seen only once it was processed; failed
      // deliveries may be retried by the relay.
      SeenMessages::<T>::insert(envelope.message_id, ());
      Self::deposit_event(event);
      Ok(())
    }

    /// Enable or disable a destination chain.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::set_supported_chain())]
    pub fn set_supported_chain(origin: OriginFor<T>, chain: ChainId, enabled: bool) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      if enabled {
        SupportedChains::<T>::insert(chain, ());
      } else {
        SupportedChains::<T>::remove(chain);
      }
      Self::deposit_event(Event::ChainSupportSet { chain, enabled });
      Ok(())
    }

    /// Record the counterpart gateway address for a chain.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::set_peer_gateway())]
    pub fn set_peer_gateway(origin: OriginFor<T>, chain: ChainId, peer: Vec<u8>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let peer: PeerAddress = peer.try_into().map_err(|_| Error::<T>::PeerTooLong)?;
      PeerGateways::<T>::insert(chain, peer);
      Self::deposit_event(Event::PeerGatewaySet { chain });
      Ok(())
    }

    /// Change the strategy inbound transfers are routed into.
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::set_default_strategy())]
    pub fn set_default_strategy(origin: OriginFor<T>, strategy_id: u32) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      DefaultStrategyId::<T>::put(strategy_id);
      Self::deposit_event(Event::DefaultStrategySet { strategy_id });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Gateway custody account: holds locked transfer value and relay fees.
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Windowed rate limiter. A transfer that opens a fresh window is
    /// admitted uncapped and seeds the window with its full amount; within
    /// a live window the cumulative amount must stay under the cap.
    fn commit_rate_limit(
      who: &T::AccountId,
      dest: ChainId,
      amount: Balance,
    ) -> DispatchResult {
      let now = frame_system::Pallet::<T>::block_number();
      RateLimits::<T>::try_mutate(who, dest, |state| {
        if state.window_started_at.is_zero()
          || now.saturating_sub(state.window_started_at) > T::RateLimitWindow::get()
        {
          *state = RateLimitState {
            amount_in_window: amount,
            window_started_at: now,
          };
        } else {
          let next = state.amount_in_window.saturating_add(amount);
          ensure!(next <= T::RateLimitAmount::get(), Error::<T>::RateLimitExceeded);
          state.amount_in_window = next;
        }
        Ok(())
      })
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
}
