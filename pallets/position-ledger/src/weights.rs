#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::Weight};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn deposit() -> Weight;
	fn withdraw() -> Weight;
	fn rebalance() -> Weight;
	fn rebalance_if_price_threshold() -> Weight;
	fn global_rebalance(n: u32) -> Weight;
	fn consolidate_my_positions() -> Weight;
	fn set_pause() -> Weight;
	fn set_agent() -> Weight;
	fn set_max_slippage() -> Weight;
	fn emergency_withdraw() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn deposit() -> Weight {
		Weight::from_parts(80_000_000, 6000)
			.saturating_add(T::DbWeight::get().reads(6))
			.saturating_add(T::DbWeight::get().writes(4))
	}
	fn withdraw() -> Weight {
		Weight::from_parts(75_000_000, 6000)
			.saturating_add(T::DbWeight::get().reads(5))
			.saturating_add(T::DbWeight::get().writes(4))
	}
	fn rebalance() -> Weight {
		Weight::from_parts(90_000_000, 6000)
			.saturating_add(T::DbWeight::get().reads(7))
			.saturating_add(T::DbWeight::get().writes(4))
	}
	fn rebalance_if_price_threshold() -> Weight {
		Weight::from_parts(100_000_000, 6000)
			.saturating_add(T::DbWeight::get().reads(9))
			.saturating_add(T::DbWeight::get().writes(5))
	}
	fn global_rebalance(n: u32) -> Weight {
		Weight::from_parts(30_000_000, 4000)
			.saturating_add(Weight::from_parts(90_000_000, 2000).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().reads((7_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes(1))
			.saturating_add(T::DbWeight::get().writes((4_u64).saturating_mul(n.into())))
	}
	fn consolidate_my_positions() -> Weight {
		Weight::from_parts(40_000_000, 4000)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_pause() -> Weight {
		Weight::from_parts(10_000_000, 1000)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_agent() -> Weight {
		Weight::from_parts(10_000_000, 1000)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_max_slippage() -> Weight {
		Weight::from_parts(12_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn emergency_withdraw() -> Weight {
		Weight::from_parts(50_000_000, 4000)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(2))
	}
}

impl WeightInfo for () {
	fn deposit() -> Weight {
		Weight::from_parts(80_000_000, 6000)
	}
	fn withdraw() -> Weight {
		Weight::from_parts(75_000_000, 6000)
	}
	fn rebalance() -> Weight {
		Weight::from_parts(90_000_000, 6000)
	}
	fn rebalance_if_price_threshold() -> Weight {
		Weight::from_parts(100_000_000, 6000)
	}
	fn global_rebalance(n: u32) -> Weight {
		Weight::from_parts(30_000_000, 4000)
			.saturating_add(Weight::from_parts(90_000_000, 2000).saturating_mul(n.into()))
	}
	fn consolidate_my_positions() -> Weight {
		Weight::from_parts(40_000_000, 4000)
	}
	fn set_pause() -> Weight {
		Weight::from_parts(10_000_000, 1000)
	}
	fn set_agent() -> Weight {
		Weight::from_parts(10_000_000, 1000)
	}
	fn set_max_slippage() -> Weight {
		Weight::from_parts(12_000_000, 1500)
	}
	fn emergency_withdraw() -> Weight {
		Weight::from_parts(50_000_000, 4000)
	}
}
