//! HelloWorld program specific errors.

use solana_program::program_error::ProgramError;

#[derive(Copy, Clone, Debug, Eq, thiserror::Error, PartialEq)]
#[repr(u32)]
pub enum Error {
    #[error("Greeting account does not match the payer's greeting PDA")]
    InvalidGreetingPda = 1,
    #[error("Greeting counter overflow")]
    CounterOverflow = 2,
}

impl From<Error> for ProgramError {
    fn from(err: Error) -> Self {
        ProgramError::Custom(err as u32)
    }
}
