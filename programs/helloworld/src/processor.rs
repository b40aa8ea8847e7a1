use account_utils::{create_pda_account, verify_account_uninitialized, SizedData};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint,
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    accounts::{Greeting, GreetingAccount},
    error::Error,
    greeting_pda_seeds,
    instruction::{Greet, HelloWorldInstruction},
};

#[cfg(not(feature = "no-entrypoint"))]
entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    match HelloWorldInstruction::from_instruction_data(instruction_data)? {
        HelloWorldInstruction::Greet(greet) => process_greet(program_id, accounts, greet),
    }
}

/// Greets the payer: creates their greeting PDA if it does not exist yet,
/// forwards the optional tip and increments the stored counter.
///
/// Accounts:
/// 0. `[signer, writeable]` The payer.
/// 1. `[executable]` The system program.
/// 2. `[writeable]` The payer's greeting PDA account.
/// 3. `[writeable]` The tip recipient.
fn process_greet(program_id: &Pubkey, accounts: &[AccountInfo], greet: Greet) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let system_program_id = solana_program::system_program::id();

    // Account 0: The payer.
    let payer_info = next_account_info(accounts_iter)?;
    if !payer_info.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    // Account 1: The system program.
    let system_program_info = next_account_info(accounts_iter)?;
    if system_program_info.key != &system_program_id {
        return Err(ProgramError::IncorrectProgramId);
    }

    // Account 2: The greeting PDA account.
    let greeting_info = next_account_info(accounts_iter)?;
    let greeting_initialized =
        greeting_info.owner == program_id && !greeting_info.data_is_empty();

    let mut greeting = if !greeting_initialized {
        verify_account_uninitialized(greeting_info)?;

        let (greeting_key, greeting_bump_seed) =
            Pubkey::find_program_address(greeting_pda_seeds!(payer_info.key), program_id);
        // Verify the ID of the account using `find_program_address`.
        if greeting_info.key != &greeting_key {
            return Err(Error::InvalidGreetingPda.into());
        }

        let greeting = Greeting {
            bump_seed: greeting_bump_seed,
            counter: 0,
        };
        let greeting_size = GreetingAccount::from(Greeting::default()).size();
        create_pda_account(
            payer_info,
            &Rent::get()?,
            greeting_size,
            program_id,
            system_program_info,
            greeting_info,
            greeting_pda_seeds!(payer_info.key, greeting_bump_seed),
        )?;

        greeting
    } else {
        let greeting =
            *GreetingAccount::fetch(&mut &greeting_info.data.borrow()[..])?.into_inner();

        // Verify the ID of the account using `create_program_address` and the stored bump seed.
        let expected_greeting_key = Pubkey::create_program_address(
            greeting_pda_seeds!(payer_info.key, greeting.bump_seed),
            program_id,
        )?;
        if greeting_info.key != &expected_greeting_key {
            return Err(Error::InvalidGreetingPda.into());
        }

        greeting
    };

    // Account 3: The tip recipient.
    let tip_recipient_info = next_account_info(accounts_iter)?;
    if greet.tip_lamports > 0 {
        invoke(
            &system_instruction::transfer(
                payer_info.key,
                tip_recipient_info.key,
                greet.tip_lamports,
            ),
            &[payer_info.clone(), tip_recipient_info.clone()],
        )?;
    }

    greeting.counter = greeting
        .counter
        .checked_add(1)
        .ok_or(Error::CounterOverflow)?;
    let counter = greeting.counter;
    GreetingAccount::from(greeting).store(greeting_info, false)?;

    msg!("Greeted {} time(s)!", counter);

    Ok(())
}
