#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::Weight};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn deposit_random() -> Weight;
	fn fulfill_random_words() -> Weight;
	fn request_reward_draw() -> Weight;
	fn set_reward_amounts() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn deposit_random() -> Weight {
		Weight::from_parts(35_000_000, 3500)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn fulfill_random_words() -> Weight {
		// Covers the heavier of the two paths (the payout draw).
		Weight::from_parts(250_000_000, 12000)
			.saturating_add(T::DbWeight::get().reads(10))
			.saturating_add(T::DbWeight::get().writes(12))
	}
	fn request_reward_draw() -> Weight {
		Weight::from_parts(30_000_000, 3000)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_reward_amounts() -> Weight {
		Weight::from_parts(12_000_000, 1000)
			.saturating_add(T::DbWeight::get().writes(2))
	}
}

impl WeightInfo for () {
	fn deposit_random() -> Weight {
		Weight::from_parts(35_000_000, 3500)
	}
	fn fulfill_random_words() -> Weight {
		Weight::from_parts(250_000_000, 12000)
	}
	fn request_reward_draw() -> Weight {
		Weight::from_parts(30_000_000, 3000)
	}
	fn set_reward_amounts() -> Weight {
		Weight::from_parts(12_000_000, 1000)
	}
}
