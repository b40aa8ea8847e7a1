//! Functional tests for the HelloWorld program.

use helloworld_program::{
    accounts::{Greeting, GreetingAccount},
    error::Error,
    greeting_pda_seeds,
    instruction::{greet_instruction, Greet, HelloWorldInstruction},
    processor::process_instruction,
};
use helloworld_test_utils::{
    assert_lamports, assert_transaction_error, new_funded_keypair,
    process_instruction as process_instruction_helper,
};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};
use solana_program_test::{processor, BanksClient, BanksClientError, ProgramTest};
use solana_sdk::{
    instruction::InstructionError,
    signature::Signer,
    signer::keypair::Keypair,
    transaction::TransactionError,
};

const ONE_SOL_IN_LAMPORTS: u64 = 1_000_000_000;

fn setup_program_test() -> ProgramTest {
    ProgramTest::new(
        "helloworld_program",
        helloworld_program::id(),
        processor!(process_instruction),
    )
}

async fn setup_client() -> (BanksClient, Keypair) {
    let program_test = setup_program_test();
    let (banks_client, payer, _recent_blockhash) = program_test.start().await;
    (banks_client, payer)
}

fn greeting_key(payer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(greeting_pda_seeds!(payer), &helloworld_program::id())
}

async fn greet(
    banks_client: &mut BanksClient,
    payer: &Keypair,
    tip_recipient: Pubkey,
    tip_lamports: u64,
) -> Result<(), BanksClientError> {
    let ixn = greet_instruction(
        helloworld_program::id(),
        payer.pubkey(),
        tip_recipient,
        tip_lamports,
    )
    .unwrap();
    process_instruction_helper(banks_client, ixn, payer, &[payer])
        .await
        .map(|_| ())
}

async fn fetch_greeting(banks_client: &mut BanksClient, payer: &Pubkey) -> Greeting {
    let (greeting_pda, _) = greeting_key(payer);
    let data = banks_client
        .get_account(greeting_pda)
        .await
        .unwrap()
        .unwrap()
        .data;
    *GreetingAccount::fetch(&mut &data[..]).unwrap().into_inner()
}

#[tokio::test]
async fn test_greet_creates_greeting_account() {
    let (mut banks_client, payer) = setup_client().await;

    greet(&mut banks_client, &payer, payer.pubkey(), 0)
        .await
        .unwrap();

    let (greeting_pda, expected_bump) = greeting_key(&payer.pubkey());
    let greeting_account = banks_client
        .get_account(greeting_pda)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(greeting_account.owner, helloworld_program::id());

    let greeting = fetch_greeting(&mut banks_client, &payer.pubkey()).await;
    assert_eq!(
        greeting,
        Greeting {
            bump_seed: expected_bump,
            counter: 1,
        }
    );
}

#[tokio::test]
async fn test_greet_increments_counter_each_time() {
    let (mut banks_client, payer) = setup_client().await;

    for expected_counter in 1..=3u32 {
        greet(&mut banks_client, &payer, payer.pubkey(), 0)
            .await
            .unwrap();
        let greeting = fetch_greeting(&mut banks_client, &payer.pubkey()).await;
        assert_eq!(greeting.counter, expected_counter);
    }
}

#[tokio::test]
async fn test_greet_counts_per_payer() {
    let (mut banks_client, payer) = setup_client().await;
    let other_payer =
        new_funded_keypair(&mut banks_client, &payer, 10 * ONE_SOL_IN_LAMPORTS).await;

    greet(&mut banks_client, &payer, payer.pubkey(), 0)
        .await
        .unwrap();
    greet(&mut banks_client, &other_payer, other_payer.pubkey(), 0)
        .await
        .unwrap();
    greet(&mut banks_client, &payer, payer.pubkey(), 0)
        .await
        .unwrap();

    let greeting = fetch_greeting(&mut banks_client, &payer.pubkey()).await;
    let other_greeting = fetch_greeting(&mut banks_client, &other_payer.pubkey()).await;
    assert_eq!(greeting.counter, 2);
    assert_eq!(other_greeting.counter, 1);
}

#[tokio::test]
async fn test_greet_with_tip_transfers_lamports() {
    let (mut banks_client, payer) = setup_client().await;
    let tip_recipient = Pubkey::new_unique();
    let tip_lamports = ONE_SOL_IN_LAMPORTS / 10;

    let payer_balance_before = banks_client.get_balance(payer.pubkey()).await.unwrap();

    greet(&mut banks_client, &payer, tip_recipient, tip_lamports)
        .await
        .unwrap();

    assert_lamports(&mut banks_client, &tip_recipient, tip_lamports).await;

    // The payer covered the tip on top of rent for the greeting account.
    let payer_balance_after = banks_client.get_balance(payer.pubkey()).await.unwrap();
    assert!(payer_balance_before - payer_balance_after >= tip_lamports);

    let greeting = fetch_greeting(&mut banks_client, &payer.pubkey()).await;
    assert_eq!(greeting.counter, 1);
}

#[tokio::test]
async fn test_greet_without_tip_sends_no_lamports() {
    let (mut banks_client, payer) = setup_client().await;
    let tip_recipient = Pubkey::new_unique();

    greet(&mut banks_client, &payer, tip_recipient, 0)
        .await
        .unwrap();

    // No transfer was made, so the recipient account was never created.
    let recipient_account = banks_client.get_account(tip_recipient).await.unwrap();
    assert!(recipient_account.is_none());

    let greeting = fetch_greeting(&mut banks_client, &payer.pubkey()).await;
    assert_eq!(greeting.counter, 1);
}

#[tokio::test]
async fn test_greet_errors_with_wrong_greeting_pda() {
    let (mut banks_client, payer) = setup_client().await;

    let mut ixn = greet_instruction(
        helloworld_program::id(),
        payer.pubkey(),
        payer.pubkey(),
        0,
    )
    .unwrap();
    // Swap in an account that is not the payer's greeting PDA.
    ixn.accounts[2] = AccountMeta::new(Pubkey::new_unique(), false);

    let result = process_instruction_helper(&mut banks_client, ixn, &payer, &[&payer]).await;
    assert_transaction_error(
        result,
        TransactionError::InstructionError(
            0,
            InstructionError::Custom(Error::InvalidGreetingPda as u32),
        ),
    );
}

#[tokio::test]
async fn test_greet_requires_payer_signature() {
    let (mut banks_client, payer) = setup_client().await;
    let other_payer = Keypair::new();

    let (greeting_pda, _) = greeting_key(&other_payer.pubkey());
    // Hand-rolled instruction whose payer account is not a signer.
    let ixn = Instruction {
        program_id: helloworld_program::id(),
        data: HelloWorldInstruction::Greet(Greet { tip_lamports: 0 })
            .into_instruction_data()
            .unwrap(),
        accounts: vec![
            AccountMeta::new(other_payer.pubkey(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new(greeting_pda, false),
            AccountMeta::new(payer.pubkey(), false),
        ],
    };

    let result = process_instruction_helper(&mut banks_client, ixn, &payer, &[&payer]).await;
    assert_transaction_error(
        result,
        TransactionError::InstructionError(0, InstructionError::MissingRequiredSignature),
    );
}

#[tokio::test]
async fn test_greet_rejects_wrong_system_program() {
    let (mut banks_client, payer) = setup_client().await;

    let mut ixn = greet_instruction(
        helloworld_program::id(),
        payer.pubkey(),
        payer.pubkey(),
        0,
    )
    .unwrap();
    ixn.accounts[1] = AccountMeta::new_readonly(Pubkey::new_unique(), false);

    let result = process_instruction_helper(&mut banks_client, ixn, &payer, &[&payer]).await;
    assert_transaction_error(
        result,
        TransactionError::InstructionError(0, InstructionError::IncorrectProgramId),
    );
}
