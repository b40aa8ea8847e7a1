//! Shared plumbing for program-owned data accounts.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
};

pub trait SizedData {
    fn size(&self) -> usize;
}

pub trait Data: BorshDeserialize + BorshSerialize + Default {}
impl<T> Data for T where T: BorshDeserialize + BorshSerialize + Default {}

/// Account data structure wrapper type that handles initialization and (de)serialization.
///
/// (De)serialization is done with borsh and the "on-disk" format is as follows:
/// {
///     initialized: bool,
///     data: T,
/// }
#[derive(Debug, Default)]
pub struct AccountData<T> {
    data: Box<T>,
}

impl<T> From<T> for AccountData<T> {
    fn from(data: T) -> Self {
        Self {
            data: Box::new(data),
        }
    }
}

impl<T> From<Box<T>> for AccountData<T> {
    fn from(data: Box<T>) -> Self {
        Self { data }
    }
}

impl<T> SizedData for AccountData<T>
where
    T: SizedData,
{
    fn size(&self) -> usize {
        // Add an extra byte for the initialized flag.
        1 + self.data.size()
    }
}

impl<T> AccountData<T>
where
    T: Data,
{
    pub fn into_inner(self) -> Box<T> {
        self.data
    }

    /// Deserializes the account payload, or None if the account has never
    /// been stored to (account data is zero initialized).
    pub fn fetch_data(buf: &mut &[u8]) -> Result<Option<Box<T>>, ProgramError> {
        if buf.is_empty() {
            return Ok(None);
        }
        let initialized = bool::deserialize(buf)?;
        let data = if initialized {
            Some(T::deserialize(buf).map(Box::new)?)
        } else {
            None
        };
        Ok(data)
    }

    pub fn fetch(buf: &mut &[u8]) -> Result<Self, ProgramError> {
        Ok(Self::from(Self::fetch_data(buf)?.unwrap_or_default()))
    }

    // Optimistically write then realloc on failure.
    // If we serialize and calculate len before realloc we will waste heap space as there is no
    // free(). Tradeoff between heap usage and compute budget.
    pub fn store<'a>(
        &self,
        account: &AccountInfo<'a>,
        allow_realloc: bool,
    ) -> Result<(), ProgramError> {
        if !account.is_writable || account.executable {
            return Err(ProgramError::InvalidAccountData);
        }
        let realloc_increment = 1024;
        loop {
            let mut guard = account.try_borrow_mut_data()?;
            let data = &mut *guard;
            let data_len = data.len();

            // Create a new slice so that this new slice
            // is updated to point to the unwritten data during serialization.
            // Otherwise, the account data itself will be updated to point to
            // unwritten data!
            let mut writable_data: &mut [u8] = &mut data[..];

            match true
                .serialize(&mut writable_data)
                .and_then(|_| self.data.serialize(&mut writable_data))
            {
                Ok(_) => break,
                Err(err) => match err.kind() {
                    std::io::ErrorKind::WriteZero => {
                        if !allow_realloc {
                            return Err(ProgramError::BorshIoError(err.to_string()));
                        }
                    }
                    _ => return Err(ProgramError::BorshIoError(err.to_string())),
                },
            };
            drop(guard);
            if cfg!(target_os = "solana") {
                account.realloc(data_len + realloc_increment, false)?;
            } else {
                panic!("realloc() is only supported on the SVM");
            }
        }
        Ok(())
    }
}

/// Creates a program-owned account at a Program Derived Address.
/// Tolerates the address already holding a lamport balance.
///
/// Borrowed from https://github.com/solana-labs/solana-program-library/blob/cf77ed0c187d1becd0db56edff4491c28f18dfc8/associated-token-account/program/src/tools/account.rs#L18
pub fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    rent: &Rent,
    space: usize,
    owner: &Pubkey,
    system_program: &AccountInfo<'a>,
    new_pda_account: &AccountInfo<'a>,
    new_pda_signer_seeds: &[&[u8]],
) -> Result<(), ProgramError> {
    if new_pda_account.lamports() > 0 {
        let required_lamports = rent
            .minimum_balance(space)
            .max(1)
            .saturating_sub(new_pda_account.lamports());

        if required_lamports > 0 {
            invoke(
                &system_instruction::transfer(payer.key, new_pda_account.key, required_lamports),
                &[
                    payer.clone(),
                    new_pda_account.clone(),
                    system_program.clone(),
                ],
            )?;
        }

        invoke_signed(
            &system_instruction::allocate(new_pda_account.key, space as u64),
            &[new_pda_account.clone(), system_program.clone()],
            &[new_pda_signer_seeds],
        )?;

        invoke_signed(
            &system_instruction::assign(new_pda_account.key, owner),
            &[new_pda_account.clone(), system_program.clone()],
            &[new_pda_signer_seeds],
        )
    } else {
        invoke_signed(
            &system_instruction::create_account(
                payer.key,
                new_pda_account.key,
                rent.minimum_balance(space).max(1),
                space as u64,
                owner,
            ),
            &[
                payer.clone(),
                new_pda_account.clone(),
                system_program.clone(),
            ],
            &[new_pda_signer_seeds],
        )
    }
}

/// Returns Ok if the account data is empty and the owner is the system program.
/// Returns Err otherwise.
pub fn verify_account_uninitialized(account: &AccountInfo) -> Result<(), ProgramError> {
    if account.data_is_empty() && account.owner == &system_program::id() {
        return Ok(());
    }
    Err(ProgramError::AccountAlreadyInitialized)
}

#[cfg(test)]
mod test {
    use super::*;
    use solana_program::clock::Epoch;

    #[derive(BorshSerialize, BorshDeserialize, Debug, Default, PartialEq, Eq)]
    struct TestData {
        value: u64,
    }

    impl SizedData for TestData {
        fn size(&self) -> usize {
            // 8 byte value
            8
        }
    }

    #[test]
    fn test_fetch_empty_account_is_default() {
        let mut buf: &[u8] = &[];
        let account = AccountData::<TestData>::fetch(&mut buf).unwrap();
        assert_eq!(*account.into_inner(), TestData::default());
    }

    #[test]
    fn test_fetch_data_zero_initialized_is_none() {
        // A freshly created account is all zeroes, i.e. initialized == false.
        let buf = vec![0u8; 9];
        let data = AccountData::<TestData>::fetch_data(&mut &buf[..]).unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn test_size_includes_initialized_flag() {
        let account = AccountData::from(TestData { value: 1 });
        assert_eq!(account.size(), 9);
    }

    #[test]
    fn test_store_then_fetch() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut lamports = 0;
        let account = AccountData::from(TestData { value: 42 });
        let mut data = vec![0u8; account.size()];
        let account_info = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &owner,
            false,
            Epoch::default(),
        );

        account.store(&account_info, false).unwrap();

        let fetched = AccountData::<TestData>::fetch(&mut &account_info.data.borrow()[..])
            .unwrap()
            .into_inner();
        assert_eq!(*fetched, TestData { value: 42 });
    }

    #[test]
    fn test_store_too_small_without_realloc_errors() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data = vec![0u8; 4];
        let account_info = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &owner,
            false,
            Epoch::default(),
        );

        let account = AccountData::from(TestData { value: 42 });
        assert!(account.store(&account_info, false).is_err());
    }
}
