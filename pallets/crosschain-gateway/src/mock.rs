extern crate alloc;

use crate as pallet_crosschain_gateway;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, ord_parameter_types,
  traits::{ConstU32, ConstU64, ConstU128, Get},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{AssetKind, ChainId, MessageId};
use std::cell::RefCell;

pub const STABLE: AssetKind = AssetKind::Local(1);
pub const RELAY: u64 = 200;
pub const AGENT: u64 = 9;

// State containers for stateful mocks
thread_local! {
    // Outbound relay log: (dest, payload, fee), ids are sequential from 1
    pub static SENT: RefCell<Vec<(ChainId, Vec<u8>, u128)>> = const { RefCell::new(Vec::new()) };

    // Quoted fee per message
    static RELAY_FEE: RefCell<u128> = const { RefCell::new(10) };

    // Ledger call logs
    pub static LEDGER_DEPOSITS: RefCell<Vec<(u64, u64, AssetKind, u32, u128, ChainId)>> =
        const { RefCell::new(Vec::new()) };
    pub static LEDGER_REBALANCES: RefCell<Vec<(u64, u32, u32, u128, ChainId)>> =
        const { RefCell::new(Vec::new()) };

    // When set, ledger rebalances fail (cooldown, unknown slot, ...)
    static REBALANCE_FAILS: RefCell<bool> = const { RefCell::new(false) };
}

pub fn set_relay_fee(fee: u128) {
  RELAY_FEE.with(|f| *f.borrow_mut() = fee);
}

pub fn set_rebalance_fails(fails: bool) {
  REBALANCE_FAILS.with(|f| *f.borrow_mut() = fails);
}

pub fn sent_messages() -> Vec<(ChainId, Vec<u8>, u128)> {
  SENT.with(|s| s.borrow().clone())
}

pub fn ledger_deposits() -> Vec<(u64, u64, AssetKind, u32, u128, ChainId)> {
  LEDGER_DEPOSITS.with(|d| d.borrow().clone())
}

pub fn ledger_rebalances() -> Vec<(u64, u32, u32, u128, ChainId)> {
  LEDGER_REBALANCES.with(|r| r.borrow().clone())
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    Gateway: pallet_crosschain_gateway,
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

/// Ledger stub: records calls; `AGENT` is the only agent.
pub struct MockLedger;
impl pallet_position_ledger::LedgerInterface<u64> for MockLedger {
  fn deposit_for(
    payer: &u64,
    user: &u64,
    token: AssetKind,
    strategy_id: u32,
    amount: u128,
    origin_chain: ChainId,
  ) -> DispatchResult {
    LEDGER_DEPOSITS
      .with(|d| d.borrow_mut().push((*payer, *user, token, strategy_id, amount, origin_chain)));
    Ok(())
  }

  fn rebalance_for(
    user: &u64,
    position_index: u32,
    new_strategy_id: u32,
    amount: u128,
    origin_chain: ChainId,
  ) -> DispatchResult {
    if REBALANCE_FAILS.with(|f| *f.borrow()) {
      return Err(DispatchError::Other("rebalance rejected"));
    }
    LEDGER_REBALANCES.with(|r| {
      r.borrow_mut()
        .push((*user, position_index, new_strategy_id, amount, origin_chain))
    });
    Ok(())
  }

  fn is_agent(who: &u64) -> bool {
    *who == AGENT
  }

  fn position_count(_: &u64) -> u32 {
    0
  }
}

/// Relay stub with sequential message ids.
pub struct MockRelay;
impl crate::MessageRelay for MockRelay {
  fn quote_fee(_dest: ChainId, _payload: &[u8]) -> u128 {
    RELAY_FEE.with(|f| *f.borrow())
  }

  fn send(dest: ChainId, payload: Vec<u8>, fee: u128) -> Result<MessageId, DispatchError> {
    SENT.with(|s| {
      s.borrow_mut().push((dest, payload, fee));
      Ok(s.borrow().len() as MessageId)
    })
  }
}

ord_parameter_types! {
  pub const RelayAccount: u64 = RELAY;
}

pub struct PalletIdStub;
impl Get<PalletId> for PalletIdStub {
  fn get() -> PalletId {
    PalletId(*primitives::ecosystem::pallet_ids::GATEWAY_PALLET_ID)
  }
}

pub struct StableAssetStub;
impl Get<AssetKind> for StableAssetStub {
  fn get() -> AssetKind {
    STABLE
  }
}

impl pallet_crosschain_gateway::Config for Test {
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = GatewayBenchmarkHelper;
  type Assets = Assets;
  type Currency = Balances;
  type Ledger = MockLedger;
  type Relay = MockRelay;
  type RelayOrigin = frame_system::EnsureSignedBy<RelayAccount, u64>;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type PalletId = PalletIdStub;
  type StableAsset = StableAssetStub;
  type RateLimitWindow = ConstU64<10>;
  type RateLimitAmount = ConstU128<10_000>;
  type WeightInfo = ();
}

#[cfg(feature = "runtime-benchmarks")]
pub struct GatewayBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<u64> for GatewayBenchmarkHelper {
  fn ensure_funded(who: &u64, token: AssetKind, amount: u128) -> DispatchResult {
    use polkadot_sdk::frame_support::traits::fungibles::Mutate;
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

  fn setup_agent() -> u64 {
    AGENT
  }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  let custody = crate::Pallet::<Test>::account_id();
  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: alloc::vec![(1, 1_000_000), (2, 1_000_000), (AGENT, 1_000_000), (custody, 1)],
    ..Default::default()
  }
  .assimilate_storage(&mut t)
  .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: alloc::vec![(1, 1, true, 1)],
    metadata: alloc::vec![],
    accounts: alloc::vec![
      (1, 1, 1_000_000),
      (1, 2, 1_000_000),
      (1, AGENT, 1_000_000),
      (1, custody, 1_000_000),
    ],
    reserves: alloc::vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Reset mock state
  SENT.with(|s| s.borrow_mut().clear());
  RELAY_FEE.with(|f| *f.borrow_mut() = 10);
  LEDGER_DEPOSITS.with(|d| d.borrow_mut().clear());
  LEDGER_REBALANCES.with(|r| r.borrow_mut().clear());
  REBALANCE_FAILS.with(|f| *f.borrow_mut() = false);

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
