#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::Weight};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn register_strategy() -> Weight;
	fn set_strategy_active() -> Weight;
	fn set_supported_token() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn register_strategy() -> Weight {
		Weight::from_parts(30_000_000, 3000)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(2))
	}
	fn set_strategy_active() -> Weight {
		Weight::from_parts(15_000_000, 2000)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_supported_token() -> Weight {
		Weight::from_parts(15_000_000, 2000)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
}

impl WeightInfo for () {
	fn register_strategy() -> Weight {
		Weight::from_parts(30_000_000, 3000)
	}
	fn set_strategy_active() -> Weight {
		Weight::from_parts(15_000_000, 2000)
	}
	fn set_supported_token() -> Weight {
		Weight::from_parts(15_000_000, 2000)
	}
}
