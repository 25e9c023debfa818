extern crate alloc;

use crate as pallet_position_ledger;
use polkadot_sdk::frame_support::traits::fungibles::Mutate;
use polkadot_sdk::frame_support::traits::tokens::{Fortitude, Precision, Preservation};
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl,
  traits::{ConstU16, ConstU32, ConstU64, ConstU128, Get},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult, Permill,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{AssetKind, ChainId};
use std::cell::RefCell;

pub const STABLE: AssetKind = AssetKind::Local(1);

// State containers for stateful mocks
thread_local! {
    // Protocol adapter call log: (pool, token, amount, max_slippage_bps)
    pub static SUPPLIES: RefCell<Vec<(u64, AssetKind, u128, u16)>> = const { RefCell::new(Vec::new()) };
    pub static WITHDRAWS: RefCell<Vec<(u64, AssetKind, u128, u16)>> = const { RefCell::new(Vec::new()) };

    // When set, every protocol adapter call fails
    static PROTOCOL_DOWN: RefCell<bool> = const { RefCell::new(false) };

    // Oracle reading: (price, updated_at_block)
    static PRICE: RefCell<Option<(u128, u64)>> = const { RefCell::new(None) };

    // Interaction hook log: (user, chain)
    pub static INTERACTIONS: RefCell<Vec<(u64, ChainId)>> = const { RefCell::new(Vec::new()) };
}

pub fn set_price(price: u128, updated_at: u64) {
  PRICE.with(|p| *p.borrow_mut() = Some((price, updated_at)));
}

pub fn clear_price() {
  PRICE.with(|p| *p.borrow_mut() = None);
}

pub fn set_protocol_down(down: bool) {
  PROTOCOL_DOWN.with(|d| *d.borrow_mut() = down);
}

pub fn supplies() -> Vec<(u64, AssetKind, u128, u16)> {
  SUPPLIES.with(|s| s.borrow().clone())
}

pub fn interactions() -> Vec<(u64, ChainId)> {
  INTERACTIONS.with(|i| i.borrow().clone())
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    StrategyRegistry: pallet_strategy_registry,
    PositionLedger: pallet_position_ledger,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

impl pallet_strategy_registry::Config for Test {
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type WeightInfo = ();
}

/// Protocol sink: supplies burn from custody (funds leave the chain view),
/// withdrawals mint back into custody and report the full amount released.
pub struct MockProtocol;
impl crate::StrategyProtocol<u64> for MockProtocol {
  fn supply(pool: &u64, token: AssetKind, amount: u128, max_slippage_bps: u16) -> DispatchResult {
    if PROTOCOL_DOWN.with(|d| *d.borrow()) {
      return Err(DispatchError::Other("protocol down"));
    }
    SUPPLIES.with(|s| s.borrow_mut().push((*pool, token, amount, max_slippage_bps)));
    let custody = crate::Pallet::<Test>::account_id();
    match token {
      AssetKind::Native => {
        <Balances as polkadot_sdk::frame_support::traits::fungible::Mutate<u64>>::burn_from(
          &custody,
          amount,
          Preservation::Expendable,
          Precision::Exact,
          Fortitude::Force,
        )?;
      }
      AssetKind::Local(id) => {
        <Assets as Mutate<u64>>::burn_from(
          id,
          &custody,
          amount,
          Preservation::Expendable,
          Precision::Exact,
          Fortitude::Force,
        )?;
      }
    }
    Ok(())
  }

  fn withdraw(
    pool: &u64,
    token: AssetKind,
    amount: u128,
    max_slippage_bps: u16,
  ) -> Result<u128, DispatchError> {
    if PROTOCOL_DOWN.with(|d| *d.borrow()) {
      return Err(DispatchError::Other("protocol down"));
    }
    WITHDRAWS.with(|w| w.borrow_mut().push((*pool, token, amount, max_slippage_bps)));
    let custody = crate::Pallet::<Test>::account_id();
    match token {
      AssetKind::Native => {
        <Balances as polkadot_sdk::frame_support::traits::fungible::Mutate<u64>>::mint_into(
          &custody, amount,
        )?;
      }
      AssetKind::Local(id) => {
        <Assets as Mutate<u64>>::mint_into(id, &custody, amount)?;
      }
    }
    Ok(amount)
  }
}

pub struct MockPriceFeed;
impl crate::PriceFeed<u64> for MockPriceFeed {
  fn latest_price() -> Option<(u128, u64)> {
    PRICE.with(|p| *p.borrow())
  }
}

pub struct RecordingHook;
impl crate::OnInteraction<u64> for RecordingHook {
  fn on_interaction(user: &u64, chain: ChainId) {
    INTERACTIONS.with(|i| i.borrow_mut().push((*user, chain)));
  }
}

pub struct PalletIdStub;
impl Get<PalletId> for PalletIdStub {
  fn get() -> PalletId {
    PalletId(*primitives::ecosystem::pallet_ids::POSITION_LEDGER_PALLET_ID)
  }
}

pub struct StableAssetStub;
impl Get<AssetKind> for StableAssetStub {
  fn get() -> AssetKind {
    STABLE
  }
}

pub struct MaxDeviationStub;
impl Get<Permill> for MaxDeviationStub {
  fn get() -> Permill {
    Permill::from_percent(20)
  }
}

impl pallet_position_ledger::Config for Test {
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = LedgerBenchmarkHelper;
  type Assets = Assets;
  type Currency = Balances;
  type Registry = StrategyRegistry;
  type Strategies = MockProtocol;
  type PriceFeed = MockPriceFeed;
  type InteractionHook = RecordingHook;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type PalletId = PalletIdStub;
  type StableAsset = StableAssetStub;
  type MaxPositionsPerUser = ConstU32<5>;
  type RebalanceCooldown = ConstU64<100>;
  type GlobalRebalanceCooldown = ConstU64<100>;
  type PriceStalenessLimit = ConstU64<50>;
  type MaxPriceDeviation = MaxDeviationStub;
  type MaxSlippageCapBps = ConstU16<1_000>;
  type DefaultSlippageBps = ConstU16<50>;
  type LocalChain = ConstU64<1>;
  type WeightInfo = ();
}

#[cfg(feature = "runtime-benchmarks")]
pub struct LedgerBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<u64> for LedgerBenchmarkHelper {
  fn ensure_funded(who: &u64, token: AssetKind, amount: u128) -> DispatchResult {
    match token {
      AssetKind::Native => {
        <Balances as polkadot_sdk::frame_support::traits::fungible::Mutate<u64>>::mint_into(
          who, amount,
        )?;
      }
      AssetKind::Local(id) => {
        let _ = Assets::force_create(frame_system::RawOrigin::Root.into(), id, 1, true, 1);
        <Assets as Mutate<u64>>::mint_into(id, who, amount)?;
      }
    }
    Ok(())
  }

  fn setup_strategy(token: AssetKind) -> u32 {
    let id = StrategyRegistry::next_strategy_id();
    StrategyRegistry::register_strategy(
      frame_system::RawOrigin::Root.into(),
      b"bench".to_vec(),
      10,
      100 + id,
    )
    .expect("registration succeeds");
    StrategyRegistry::set_supported_token(frame_system::RawOrigin::Root.into(), id, token, true)
      .expect("token support succeeds");
    id
  }

  fn prime_price(value: u128) {
    set_price(value, System::block_number());
  }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  let custody = crate::Pallet::<Test>::account_id();
  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: alloc::vec![(1, 1_000_000), (2, 1_000_000), (3, 1_000_000), (custody, 1)],
    ..Default::default()
  }
  .assimilate_storage(&mut t)
  .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: alloc::vec![(1, 1, true, 1)], // the stable asset
    metadata: alloc::vec![],
    accounts: alloc::vec![(1, 1, 1_000_000), (1, 2, 1_000_000), (1, 3, 1_000_000)],
    reserves: alloc::vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Reset mock state
  SUPPLIES.with(|s| s.borrow_mut().clear());
  WITHDRAWS.with(|w| w.borrow_mut().clear());
  PROTOCOL_DOWN.with(|d| *d.borrow_mut() = false);
  PRICE.with(|p| *p.borrow_mut() = None);
  INTERACTIONS.with(|i| i.borrow_mut().clear());

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
