//! HelloWorld instructions.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction as SolanaInstruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::greeting_pda_seeds;

/// Instructions for the HelloWorld program.
#[derive(BorshSerialize, BorshDeserialize, PartialEq, Debug, Clone)]
pub enum HelloWorldInstruction {
    /// Greets the payer, incrementing their greeting counter.
    Greet(Greet),
}

impl HelloWorldInstruction {
    pub fn from_instruction_data(data: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(data).map_err(|_| ProgramError::InvalidInstructionData)
    }

    pub fn into_instruction_data(self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|err| ProgramError::BorshIoError(err.to_string()))
    }
}

/// Greet data.
#[derive(BorshSerialize, BorshDeserialize, PartialEq, Debug, Clone, Default)]
pub struct Greet {
    /// Lamports forwarded to the tip recipient along with the greeting.
    /// Zero means no transfer is made.
    pub tip_lamports: u64,
}

/// Gets an instruction to greet on behalf of `payer`.
pub fn greet_instruction(
    program_id: Pubkey,
    payer: Pubkey,
    tip_recipient: Pubkey,
    tip_lamports: u64,
) -> Result<SolanaInstruction, ProgramError> {
    let (greeting_account, _greeting_bump) =
        Pubkey::try_find_program_address(greeting_pda_seeds!(payer), &program_id)
            .ok_or(ProgramError::InvalidSeeds)?;

    // Accounts:
    // 0. `[signer, writeable]` Payer.
    // 1. `[executable]` System program.
    // 2. `[writeable]` Greeting PDA.
    // 3. `[writeable]` Tip recipient.
    let accounts = vec![
        AccountMeta::new(payer, true),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new(greeting_account, false),
        AccountMeta::new(tip_recipient, false),
    ];

    let instruction = SolanaInstruction {
        program_id,
        data: HelloWorldInstruction::Greet(Greet { tip_lamports }).into_instruction_data()?,
        accounts,
    };

    Ok(instruction)
}
