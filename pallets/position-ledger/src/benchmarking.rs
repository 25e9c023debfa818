extern crate alloc;

use crate::*;
use alloc::vec::Vec;
use frame::deps::frame_benchmarking::{account, v2::*, whitelisted_caller};
use frame::deps::frame_support::traits::{EnsureOrigin, Get};
use frame::prelude::*;
use primitives::Balance;

const UNIT: Balance = 1_000_000_000_000;

fn funded_depositor<T: Config>(seed: u32) -> T::AccountId {
  let who: T::AccountId = account("depositor", seed, 0);
  T::BenchmarkHelper::ensure_funded(&who, T::StableAsset::get(), 1_000 * UNIT)
    .expect("funding succeeds");
  who
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn deposit() {
    let strategy = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, T::StableAsset::get(), 1_000 * UNIT)
      .expect("funding succeeds");

    #[extrinsic_call]
    deposit(
      RawOrigin::Signed(caller.clone()),
      T::StableAsset::get(),
      strategy,
      100 * UNIT,
      T::LocalChain::get(),
      None,
    );

    assert_eq!(Positions::<T>::get(&caller).len(), 1);
  }

  #[benchmark]
  fn withdraw() {
    let strategy = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, T::StableAsset::get(), 1_000 * UNIT)
      .expect("funding succeeds");
    Pallet::<T>::deposit(
      RawOrigin::Signed(caller.clone()).into(),
      T::StableAsset::get(),
      strategy,
      100 * UNIT,
      T::LocalChain::get(),
      None,
    )
    .expect("deposit succeeds");

    #[extrinsic_call]
    withdraw(RawOrigin::Signed(caller.clone()), 0, 100 * UNIT, T::LocalChain::get());

    assert_eq!(Positions::<T>::get(&caller)[0].balance, 0);
  }

  #[benchmark]
  fn rebalance() {
    let source = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let target = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, T::StableAsset::get(), 1_000 * UNIT)
      .expect("funding succeeds");
    Pallet::<T>::deposit(
      RawOrigin::Signed(caller.clone()).into(),
      T::StableAsset::get(),
      source,
      100 * UNIT,
      T::LocalChain::get(),
      None,
    )
    .expect("deposit succeeds");

    #[extrinsic_call]
    rebalance(
      RawOrigin::Signed(caller.clone()),
      caller.clone(),
      0,
      target,
      100 * UNIT,
      T::LocalChain::get(),
    );

    assert_eq!(Positions::<T>::get(&caller).len(), 2);
  }

  #[benchmark]
  fn rebalance_if_price_threshold() {
    let source = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let target = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, T::StableAsset::get(), 1_000 * UNIT)
      .expect("funding succeeds");
    T::BenchmarkHelper::prime_price(2_000);
    Pallet::<T>::deposit(
      RawOrigin::Signed(caller.clone()).into(),
      T::StableAsset::get(),
      source,
      100 * UNIT,
      T::LocalChain::get(),
      None,
    )
    .expect("deposit succeeds");

    #[extrinsic_call]
    rebalance_if_price_threshold(
      RawOrigin::Signed(caller.clone()),
      0,
      target,
      100 * UNIT,
      1_000,
      true,
      T::LocalChain::get(),
    );

    assert_eq!(Positions::<T>::get(&caller).len(), 2);
  }

  #[benchmark]
  fn global_rebalance(n: Linear<1, 100>) {
    let source = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let target = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let mut users: Vec<T::AccountId> = Vec::new();
    for i in 0..n {
      let user = funded_depositor::<T>(i);
      Pallet::<T>::deposit(
        RawOrigin::Signed(user.clone()).into(),
        T::StableAsset::get(),
        source,
        100 * UNIT,
        T::LocalChain::get(),
        None,
      )
      .expect("deposit succeeds");
      users.push(user);
    }
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let first = users[0].clone();

    #[extrinsic_call]
    global_rebalance(admin as T::RuntimeOrigin, users, target, T::LocalChain::get());

    assert_eq!(Positions::<T>::get(&first).len(), 2);
  }

  #[benchmark]
  fn consolidate_my_positions() {
    let strategy = T::BenchmarkHelper::setup_strategy(T::StableAsset::get());
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::ensure_funded(&caller, T::StableAsset::get(), 1_000 * UNIT)
      .expect("funding succeeds");
    for _ in 0..2 {
      Pallet::<T>::deposit(
        RawOrigin::Signed(caller.clone()).into(),
        T::StableAsset::get(),
        strategy,
        100 * UNIT,
        T::LocalChain::get(),
        None,
      )
      .expect("deposit succeeds");
    }

    #[extrinsic_call]
    consolidate_my_positions(RawOrigin::Signed(caller.clone()));

    assert_eq!(Positions::<T>::get(&caller).len(), 1);
  }

  #[benchmark]
  fn set_pause() {
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    pause(admin as T::RuntimeOrigin);

    assert!(Paused::<T>::get());
  }

  #[benchmark]
  fn set_agent() {
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let agent: T::AccountId = account("agent", 0, 0);

    #[extrinsic_call]
    set_agent(admin as T::RuntimeOrigin, agent.clone());

    assert_eq!(Agent::<T>::get(), Some(agent));
  }

  #[benchmark]
  fn set_max_slippage() {
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");

    #[extrinsic_call]
    set_max_slippage(admin as T::RuntimeOrigin, 100);

    assert_eq!(MaxSlippageBps::<T>::get(), 100);
  }

  #[benchmark]
  fn emergency_withdraw() {
    let admin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let custody = Pallet::<T>::account_id();
    T::BenchmarkHelper::ensure_funded(&custody, T::StableAsset::get(), 100 * UNIT)
      .expect("funding succeeds");
    let to: T::AccountId = account("rescue", 0, 0);
    T::BenchmarkHelper::ensure_funded(&to, T::StableAsset::get(), UNIT)
      .expect("funding succeeds");

    #[extrinsic_call]
    emergency_withdraw(admin as T::RuntimeOrigin, T::StableAsset::get(), to, 100 * UNIT);
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
