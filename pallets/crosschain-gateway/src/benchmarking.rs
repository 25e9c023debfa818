extern crate alloc;

use crate::*;
use alloc::vec;
use codec::Encode;
use frame::deps::frame_benchmarking::{account, v2::*, whitelisted_caller};
use frame::deps::frame_support::traits::{EnsureOrigin, Get};
use frame::prelude::*;
use primitives::{AssetKind, Balance};

const UNIT: Balance = 1_000_000_000_000;
const DEST: u64 = 5;

fn setup_chain<T: Config>() {
  let admin =
    T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
  Pallet::<T>::set_supported_chain(admin, DEST, true).expect("chain setup succeeds");
}

fn funded_caller<T: Config>() -> T::AccountId {
  let caller: T::AccountId = whitelisted_caller();
  T::BenchmarkHelper::ensure_funded(&caller, AssetKind::Native, 1_000 * UNIT)
    .expect("funding succeeds");
  T::BenchmarkHelper::ensure_funded(&caller, T::StableAsset::get(), 1_000 * UNIT)
    .expect("funding succeeds");
  caller
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn transfer_cross_chain() {
    setup_chain::<T>();
    let caller = funded_caller::<T>();

    #[extrinsic_call]
    transfer_cross_chain(
      RawOrigin::Signed(caller.clone()),
      100 * UNIT,
      DEST,
      caller.clone(),
      UNIT,
    );

    assert_eq!(RateLimits::<T>::get(&caller, DEST).amount_in_window, 100 * UNIT);
  }

  #[benchmark]
  fn trigger_crosschain_rebalance() {
    setup_chain::<T>();
    let agent = T::BenchmarkHelper::setup_agent();
    T::BenchmarkHelper::ensure_funded(&agent, AssetKind::Native, 1_000 * UNIT)
      .expect("funding succeeds");
    let user: T::AccountId = account("user", 0, 0);

    #[extrinsic_call]
    trigger_crosschain_rebalance(RawOrigin::Signed(agent), user, 0, 1, 100 * UNIT, DEST);
  }

  #[benchmark]
  fn receive_message() {
    setup_chain::<T>();
    let custody = Pallet::<T>::account_id();
    T::BenchmarkHelper::ensure_funded(&custody, T::StableAsset::get(), 1_000 * UNIT)
      .expect("funding succeeds");
    let receiver: T::AccountId = account("receiver", 0, 0);
    let payload = GatewayMessage::Transfer {
      receiver: receiver.clone(),
      amount: 100 * UNIT,
    }
    .encode();
    let envelope = InboundEnvelope {
      message_id: 7,
      source_chain: DEST,
      sender: vec![0u8; 20],
      payload,
      token_amount: Some(100 * UNIT),
    };
    let relay =
      T::RelayOrigin::try_successful_origin().expect("RelayOrigin must have a successful origin");

    #[extrinsic_call]
    receive_message(relay as T::RuntimeOrigin, envelope);

    assert!(SeenMessages::<T>::contains_key(7));
  }

  #[benchmark]
  fn set_supported_chain() {
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_supported_chain(admin as T::RuntimeOrigin, DEST, true);

    assert!(SupportedChains::<T>::contains_key(DEST));
  }

  #[benchmark]
  fn set_peer_gateway() {
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_peer_gateway(admin as T::RuntimeOrigin, DEST, vec![0u8; 20]);

    assert!(PeerGateways::<T>::contains_key(DEST));
  }

  #[benchmark]
  fn set_default_strategy() {
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_default_strategy(admin as T::RuntimeOrigin, 3);

    assert_eq!(DefaultStrategyId::<T>::get(), 3);
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
