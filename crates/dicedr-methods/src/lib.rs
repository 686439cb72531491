//! Dicedr: the canonical randomization methods.
//!
//! Exactly one implementation per method id: wheel, random list, coin,
//! dice and slot machine. Each one is a unit struct implementing
//! [`PickerMethod`].

use std::sync::Arc;

use dicedr_core::method::PickerMethod;

pub mod coin;
pub mod dice;
pub mod list;
pub mod random_list;
pub mod slot;
pub mod wheel;

pub use coin::CoinMethod;
pub use dice::{DiceMethod, DicePreset};
pub use random_list::RandomListMethod;
pub use slot::SlotMethod;
pub use wheel::WheelMethod;

/// All canonical methods in listing order. The first one is the default.
#[must_use]
pub fn default_methods() -> Vec<Arc<dyn PickerMethod>> {
    vec![
        Arc::new(WheelMethod),
        Arc::new(RandomListMethod),
        Arc::new(CoinMethod),
        Arc::new(DiceMethod),
        Arc::new(SlotMethod),
    ]
}
