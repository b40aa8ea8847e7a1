//! HelloWorld data account layouts.

use account_utils::{AccountData, SizedData};
use borsh::{BorshDeserialize, BorshSerialize};

pub type GreetingAccount = AccountData<Greeting>;

/// Per-payer greeting state, stored in a PDA derived from the payer's key.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, PartialEq, Eq)]
pub struct Greeting {
    /// The bump seed of the greeting PDA.
    pub bump_seed: u8,
    /// The number of times the payer has been greeted.
    pub counter: u32,
}

impl SizedData for Greeting {
    fn size(&self) -> usize {
        // 1 byte bump_seed
        // 4 byte counter
        1 + 4
    }
}
