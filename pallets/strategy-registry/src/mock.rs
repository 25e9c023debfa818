use crate as pallet_strategy_registry;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl,
  traits::{ConstU32, ConstU64},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::frame_system::EnsureRoot;
use polkadot_sdk::sp_runtime::{
  BuildStorage,
  traits::{BlakeTwo256, IdentityLookup},
};

type Block = polkadot_sdk::frame_system::mocking::MockBlock<Test>;
type AccountId = u64;

construct_runtime!(
  pub enum Test {
    System: polkadot_sdk::frame_system,
    StrategyRegistry: pallet_strategy_registry,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl polkadot_sdk::frame_system::Config for Test {
  type Block = Block;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = polkadot_sdk::sp_core::H256;
  type Hashing = BlakeTwo256;
  type BlockHashCount = ConstU64<250>;
  type MaxConsumers = ConstU32<16>;
}

impl pallet_strategy_registry::Config for Test {
  type AdminOrigin = EnsureRoot<AccountId>;
  type WeightInfo = ();
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let t = polkadot_sdk::frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();
  t.into()
}
