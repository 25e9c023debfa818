#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::Weight};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn transfer_cross_chain() -> Weight;
	fn trigger_crosschain_rebalance() -> Weight;
	fn receive_message() -> Weight;
	fn set_supported_chain() -> Weight;
	fn set_peer_gateway() -> Weight;
	fn set_default_strategy() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn transfer_cross_chain() -> Weight {
		Weight::from_parts(95_000_000, 7000)
			.saturating_add(T::DbWeight::get().reads(6))
			.saturating_add(T::DbWeight::get().writes(4))
	}
	fn trigger_crosschain_rebalance() -> Weight {
		Weight::from_parts(55_000_000, 4000)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(2))
	}
	fn receive_message() -> Weight {
		Weight::from_parts(110_000_000, 8000)
			.saturating_add(T::DbWeight::get().reads(8))
			.saturating_add(T::DbWeight::get().writes(5))
	}
	fn set_supported_chain() -> Weight {
		Weight::from_parts(12_000_000, 1500)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_peer_gateway() -> Weight {
		Weight::from_parts(12_000_000, 1500)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_default_strategy() -> Weight {
		Weight::from_parts(10_000_000, 1000)
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn transfer_cross_chain() -> Weight {
		Weight::from_parts(95_000_000, 7000)
	}
	fn trigger_crosschain_rebalance() -> Weight {
		Weight::from_parts(55_000_000, 4000)
	}
	fn receive_message() -> Weight {
		Weight::from_parts(110_000_000, 8000)
	}
	fn set_supported_chain() -> Weight {
		Weight::from_parts(12_000_000, 1500)
	}
	fn set_peer_gateway() -> Weight {
		Weight::from_parts(12_000_000, 1500)
	}
	fn set_default_strategy() -> Weight {
		Weight::from_parts(10_000_000, 1000)
	}
}
