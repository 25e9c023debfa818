extern crate alloc;

use crate::*;
use alloc::vec;
use frame::deps::frame_benchmarking::{account, v2::*, whitelisted_caller};
use frame::deps::frame_support::traits::{EnsureOrigin, Get};
use frame::prelude::*;
use pallet_position_ledger::OnInteraction;
use primitives::Balance;

const UNIT: Balance = 1_000_000_000_000;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn deposit_random() {
    T::BenchmarkHelper::setup_strategy(T::RewardToken::get());
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, T::RewardToken::get(), 1_000 * UNIT)
      .expect("funding succeeds");

    #[extrinsic_call]
    deposit_random(RawOrigin::Signed(caller), T::RewardToken::get(), 100 * UNIT);

    assert!(PendingDraw::<T>::get().is_none());
  }

  #[benchmark]
  fn fulfill_random_words() {
    T::BenchmarkHelper::setup_strategy(T::RewardToken::get());
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, T::RewardToken::get(), 1_000 * UNIT)
      .expect("funding succeeds");
    Pallet::<T>::deposit_random(
      RawOrigin::Signed(caller).into(),
      T::RewardToken::get(),
      100 * UNIT,
    )
    .expect("deposit succeeds");
    let request_id = 1;
    let oracle =
      T::OracleOrigin::try_successful_origin().expect("OracleOrigin must have a successful origin");

    #[extrinsic_call]
    fulfill_random_words(oracle as T::RuntimeOrigin, request_id, vec![7]);

    assert!(VrfDeposits::<T>::get(request_id).expect("request exists").fulfilled);
  }

  #[benchmark]
  fn request_reward_draw() {
    frame_system::Pallet::<T>::set_block_number(T::RewardDrawInterval::get());
    for i in 0..T::WinnerCount::get() {
      let user: T::AccountId = account("participant", i, 0);
      Pallet::<T>::on_interaction(&user, T::LocalChain::get());
    }
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    request_reward_draw(admin as T::RuntimeOrigin);

    assert!(PendingDraw::<T>::get().is_some());
  }

  #[benchmark]
  fn set_reward_amounts() {
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_reward_amounts(admin as T::RuntimeOrigin, 200 * UNIT, 75 * UNIT);

    assert_eq!(BaseReward::<T>::get(), 200 * UNIT);
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
