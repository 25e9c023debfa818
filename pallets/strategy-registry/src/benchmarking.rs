extern crate alloc;

use crate::*;
use alloc::vec;
use frame::deps::frame_benchmarking::{account, v2::*};
use frame::deps::frame_support::traits::EnsureOrigin;
use primitives::AssetKind;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn register_strategy() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let pool: T::AccountId = account("pool", 0, 0);

    #[extrinsic_call]
    register_strategy(origin, vec![b'a'; 32], pool, 100);

    assert_eq!(NextStrategyId::<T>::get(), 1);
  }

  #[benchmark]
  fn set_strategy_active() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let pool: T::AccountId = account("pool", 0, 0);
    Pallet::<T>::register_strategy(origin.clone(), vec![b'a'; 8], pool, 100)
      .expect("registration succeeds");

    #[extrinsic_call]
    set_strategy_active(origin, 0, false);

    assert!(!Pallet::<T>::is_active(0));
  }

  #[benchmark]
  fn set_supported_token() {
    let origin =
      T::AdminOrigin::try_successful_origin().expect("AdminOrigin must have a successful origin");
    let pool: T::AccountId = account("pool", 0, 0);
    Pallet::<T>::register_strategy(origin.clone(), vec![b'a'; 8], pool, 100)
      .expect("registration succeeds");

    #[extrinsic_call]
    set_supported_token(origin, 0, AssetKind::Local(1), true);

    assert!(Pallet::<T>::supports_token(0, AssetKind::Local(1)));
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
