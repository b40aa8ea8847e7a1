//! Helpers for banks-client based functional tests.

use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_program_test::{BanksClient, BanksClientError};
use solana_sdk::{
    signature::{Signature, Signer},
    signer::keypair::Keypair,
    signers::Signers,
    transaction::{Transaction, TransactionError},
};

/// Signs and processes a single instruction.
pub async fn process_instruction<T: Signers>(
    banks_client: &mut BanksClient,
    instruction: Instruction,
    payer: &Keypair,
    signers: &T,
) -> Result<Signature, BanksClientError> {
    let recent_blockhash = banks_client.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&payer.pubkey()),
        signers,
        recent_blockhash,
    );
    let signature = transaction.signatures[0];
    banks_client.process_transaction(transaction).await?;

    Ok(signature)
}

pub async fn new_funded_keypair(
    banks_client: &mut BanksClient,
    payer: &Keypair,
    lamports: u64,
) -> Keypair {
    let keypair = Keypair::new();
    transfer_lamports(banks_client, payer, &keypair.pubkey(), lamports).await;
    keypair
}

pub async fn transfer_lamports(
    banks_client: &mut BanksClient,
    payer: &Keypair,
    to: &Pubkey,
    lamports: u64,
) {
    process_instruction(
        banks_client,
        solana_sdk::system_instruction::transfer(&payer.pubkey(), to, lamports),
        payer,
        &[payer],
    )
    .await
    .unwrap();
}

pub async fn assert_lamports(
    banks_client: &mut BanksClient,
    account: &Pubkey,
    expected_lamports: u64,
) {
    let account = banks_client.get_account(*account).await.unwrap().unwrap();
    assert_eq!(account.lamports, expected_lamports);
}

pub fn assert_transaction_error<T>(
    result: Result<T, BanksClientError>,
    expected_error: TransactionError,
) {
    // BanksClientError doesn't implement Eq, but TransactionError does
    if let BanksClientError::TransactionError(tx_err) = result.err().unwrap() {
        assert_eq!(tx_err, expected_error);
    } else {
        panic!("expected TransactionError");
    }
}
