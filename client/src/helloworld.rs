//! The greeting flow, step by step.

use account_utils::SizedData;
use color_eyre::eyre::{bail, Result, WrapErr};
use helloworld_program::{
    accounts::{Greeting, GreetingAccount},
    greeting_pda_seeds,
    instruction::greet_instruction,
};
use log::info;
use solana_client::rpc_client::RpcClient;
use solana_program::pubkey::Pubkey;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    message::Message,
    native_token::lamports_to_sol,
    signature::Signer as _,
};

use crate::{Context, GreetCmd, QueryCmd};

/// Extra signatures' worth of fees to keep on hand beyond the rent-exempt
/// minimum for the greeting account and the tip.
const FEE_HEADROOM_SIGNATURES: u64 = 100;

pub(crate) fn process_greet_cmd(ctx: &Context, cmd: GreetCmd) -> Result<()> {
    let tip_recipient = cmd.tip_recipient.unwrap_or_else(|| ctx.payer.pubkey());

    establish_payer(ctx, &cmd, tip_recipient)?;
    let balance_before = get_balance(ctx)?;
    check_program(ctx, &cmd.program_id)?;
    say_hello(ctx, &cmd, tip_recipient)?;
    report_greetings(ctx, &cmd.program_id, &ctx.payer.pubkey())?;
    let balance_after = get_balance(ctx)?;

    println!(
        "Spent {} SOL saying hello ({} -> {} lamports)",
        lamports_to_sol(balance_before.saturating_sub(balance_after)),
        balance_before,
        balance_after,
    );

    Ok(())
}

pub(crate) fn process_query_cmd(ctx: &Context, cmd: QueryCmd) -> Result<()> {
    let payer = cmd.payer.unwrap_or_else(|| ctx.payer.pubkey());
    report_greetings(ctx, &cmd.program_id, &payer)?;
    Ok(())
}

/// Opens an RPC client against `url` and probes it for liveness.
pub(crate) fn establish_connection(url: &str, commitment: CommitmentConfig) -> Result<RpcClient> {
    let client = RpcClient::new_with_commitment(url.to_string(), commitment);
    let version = client
        .get_version()
        .wrap_err_with(|| format!("failed to connect to cluster at {url}"))?;
    info!(
        "Connection to cluster established: {} (solana-core {})",
        url, version.solana_core
    );
    Ok(client)
}

/// Makes sure the payer can afford the greeting: rent for the greeting
/// account, the tip, and a headroom of transaction fees. Requests an
/// airdrop for the difference if the balance falls short.
fn establish_payer(ctx: &Context, cmd: &GreetCmd, tip_recipient: Pubkey) -> Result<()> {
    let greeting_size = GreetingAccount::from(Greeting::default()).size();
    let rent_exemption = ctx
        .client
        .get_minimum_balance_for_rent_exemption(greeting_size)?;

    let ixn = greet_instruction(
        cmd.program_id,
        ctx.payer.pubkey(),
        tip_recipient,
        cmd.tip_lamports,
    )?;
    let message = Message::new_with_blockhash(
        &[ixn],
        Some(&ctx.payer.pubkey()),
        &ctx.client.get_latest_blockhash()?,
    );
    let fee = ctx.client.get_fee_for_message(&message)?;

    let required = rent_exemption + cmd.tip_lamports + fee * FEE_HEADROOM_SIGNATURES;
    let balance = get_balance(ctx)?;
    if balance < required {
        request_airdrop(ctx, required - balance)?;
    }

    info!(
        "Using payer {} with {} SOL",
        ctx.payer.pubkey(),
        lamports_to_sol(get_balance(ctx)?)
    );
    Ok(())
}

fn request_airdrop(ctx: &Context, lamports: u64) -> Result<()> {
    info!("Requesting an airdrop of {} SOL", lamports_to_sol(lamports));
    let signature = ctx
        .client
        .request_airdrop(&ctx.payer.pubkey(), lamports)
        .wrap_err("airdrop request failed")?;
    let recent_blockhash = ctx.client.get_latest_blockhash()?;
    ctx.client
        .confirm_transaction_with_spinner(&signature, &recent_blockhash, ctx.commitment)
        .wrap_err("airdrop was not confirmed")?;
    Ok(())
}

/// Verifies the greeting program is deployed at the expected address.
fn check_program(ctx: &Context, program_id: &Pubkey) -> Result<()> {
    let program = match ctx
        .client
        .get_account_with_commitment(program_id, ctx.commitment)?
        .value
    {
        Some(account) => account,
        None => bail!("program {program_id} is not deployed"),
    };
    if !program.executable {
        bail!("account {program_id} exists but is not executable");
    }
    info!("Program {} is deployed and executable", program_id);
    Ok(())
}

/// Submits one greet transaction signed by the payer.
fn say_hello(ctx: &Context, cmd: &GreetCmd, tip_recipient: Pubkey) -> Result<()> {
    let (greeting_key, _greeting_bump) = Pubkey::find_program_address(
        greeting_pda_seeds!(ctx.payer.pubkey()),
        &cmd.program_id,
    );
    info!("Saying hello to {}", greeting_key);

    let ixn = greet_instruction(
        cmd.program_id,
        ctx.payer.pubkey(),
        tip_recipient,
        cmd.tip_lamports,
    )?;
    let signature = ctx.send_transaction(&[ixn], &[&ctx.payer])?;
    info!("Greeting transaction {} confirmed", signature);
    Ok(())
}

/// Reads back and prints the payer's greeting counter.
fn report_greetings(ctx: &Context, program_id: &Pubkey, payer: &Pubkey) -> Result<u32> {
    let (greeting_key, _greeting_bump) =
        Pubkey::find_program_address(greeting_pda_seeds!(payer), program_id);

    let counter = match ctx
        .client
        .get_account_with_commitment(&greeting_key, ctx.commitment)?
        .value
    {
        Some(account) => {
            GreetingAccount::fetch(&mut &account.data[..])
                .wrap_err("greeting account holds malformed data")?
                .into_inner()
                .counter
        }
        None => 0,
    };

    println!("{} has been greeted {} time(s)", greeting_key, counter);
    Ok(counter)
}

/// The payer's balance in lamports.
fn get_balance(ctx: &Context) -> Result<u64> {
    Ok(ctx
        .client
        .get_balance_with_commitment(&ctx.payer.pubkey(), ctx.commitment)?
        .value)
}
