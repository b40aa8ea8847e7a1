//! Demo client for the HelloWorld greeting counter program.
//!
//! With no subcommand the whole flow runs to completion: establish a
//! connection, make sure the payer is funded, verify the program is
//! deployed, say hello and read back how many times the payer has been
//! greeted, reporting the lamports spent along the way.

#![deny(unsafe_code)]

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use solana_clap_utils::input_validators::{is_keypair, is_url, normalize_to_url_if_moniker};
use solana_cli_config::{Config, CONFIG_FILE};
use solana_client::{rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signature, Signer as _},
    signer::signers::Signers,
    transaction::Transaction,
};

mod helloworld;

use crate::helloworld::{establish_connection, process_greet_cmd, process_query_cmd};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<HelloWorldCmd>,
    #[arg(long, short)]
    url: Option<String>,
    #[arg(long, short)]
    keypair: Option<String>,
}

#[derive(Subcommand)]
enum HelloWorldCmd {
    /// Run the greeting flow against the deployed program.
    Greet(GreetCmd),
    /// Read a payer's greeting counter without sending a transaction.
    Query(QueryCmd),
}

#[derive(Args)]
pub(crate) struct GreetCmd {
    #[arg(long, short, default_value_t = helloworld_program::id())]
    program_id: Pubkey,
    #[arg(long, default_value_t = 0)]
    tip_lamports: u64,
    /// Defaults to the payer itself, making the tip a no-op.
    #[arg(long)]
    tip_recipient: Option<Pubkey>,
}

#[derive(Args)]
pub(crate) struct QueryCmd {
    #[arg(long, short, default_value_t = helloworld_program::id())]
    program_id: Pubkey,
    /// Defaults to the configured payer.
    #[arg(long)]
    payer: Option<Pubkey>,
}

pub(crate) struct Context {
    client: RpcClient,
    payer: Keypair,
    commitment: CommitmentConfig,
}

impl Context {
    fn send_transaction<T: Signers>(
        &self,
        instructions: &[Instruction],
        signers: &T,
    ) -> Result<Signature> {
        let recent_blockhash = self.client.get_latest_blockhash()?;
        let txn = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            signers,
            recent_blockhash,
        );

        let signature = self
            .client
            .send_and_confirm_transaction_with_spinner_and_config(
                &txn,
                self.commitment,
                RpcSendTransactionConfig {
                    preflight_commitment: Some(self.commitment.commitment),
                    ..RpcSendTransactionConfig::default()
                },
            )
            .wrap_err("transaction failed")?;

        Ok(signature)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = match CONFIG_FILE.as_ref() {
        Some(config_file) => Config::load(config_file).unwrap_or_default(),
        None => Config::default(),
    };
    let url = normalize_to_url_if_moniker(cli.url.unwrap_or(config.json_rpc_url));
    is_url(&url).map_err(|err| eyre!("invalid cluster url {url}: {err}"))?;
    let keypair_path = cli.keypair.unwrap_or(config.keypair_path);
    is_keypair(&keypair_path).map_err(|err| eyre!("invalid payer keypair {keypair_path}: {err}"))?;

    let commitment = CommitmentConfig::confirmed();
    let client = establish_connection(&url, commitment)?;
    let payer = read_keypair_file(&keypair_path)
        .map_err(|err| eyre!("failed to read keypair {keypair_path}: {err}"))?;

    let ctx = Context {
        client,
        payer,
        commitment,
    };

    let cmd = cli.cmd.unwrap_or_else(|| {
        HelloWorldCmd::Greet(GreetCmd {
            program_id: helloworld_program::id(),
            tip_lamports: 0,
            tip_recipient: None,
        })
    });
    match cmd {
        HelloWorldCmd::Greet(greet) => process_greet_cmd(&ctx, greet),
        HelloWorldCmd::Query(query) => process_query_cmd(&ctx, query),
    }
}
