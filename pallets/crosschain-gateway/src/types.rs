extern crate alloc;

use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use polkadot_sdk::sp_runtime::DispatchError;
use scale_info::TypeInfo;

use primitives::{Balance, ChainId, MessageId};

/// Wire payload exchanged between gateways. The leading SCALE discriminator
/// doubles as the message-type tag checked on receipt.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
pub enum GatewayMessage<AccountId> {
  #[codec(index = 0)]
  Transfer { receiver: AccountId, amount: Balance },
  #[codec(index = 1)]
  Rebalance {
    user: AccountId,
    position_index: u32,
    new_strategy_id: u32,
    amount: Balance,
  },
}

/// What the relay hands over for an inbound message. `token_amount` is set
/// when tokens physically arrived alongside the payload.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
pub struct InboundEnvelope {
  pub message_id: MessageId,
  pub source_chain: ChainId,
  pub sender: Vec<u8>,
  pub payload: Vec<u8>,
  pub token_amount: Option<Balance>,
}

/// Sliding-window spend tracker per (user, destination chain).
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
)]
pub struct RateLimitState<BlockNumber> {
  pub amount_in_window: Balance,
  pub window_started_at: BlockNumber,
}

/// Outbound transport. Fees are quoted against the encoded payload and paid
/// in native currency by the dispatching account.
pub trait MessageRelay {
  fn quote_fee(dest: ChainId, payload: &[u8]) -> Balance;
  fn send(dest: ChainId, payload: Vec<u8>, fee: Balance) -> Result<MessageId, DispatchError>;
}
