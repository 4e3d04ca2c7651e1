//! `hushmint`: operator CLI for the HUSH reward token.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use hush_core::config::{KEY_TOKEN_ADDRESS, OperatorConfig};
use hush_core::{EnvFile, init_logging};
use hush_ledger::{
    Address, BalanceProbe, BalanceReading, ContractCall, MintOrchestrator, MintStatus,
    MirrorClient, Network, RelayClient, TransactionService, ViewQueryService, abi,
};

#[derive(Parser, Debug)]
#[command(name = "hushmint", version, about = "Mint and inspect the HUSH reward token")]
struct Cli {
    #[command(flatten)]
    operator: OperatorArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct OperatorArgs {
    /// Operator account in shard.realm.num form.
    #[arg(long, global = true, env = "HUSH_OPERATOR_ID")]
    operator_id: Option<String>,

    /// Operator private key, DER hex or raw 0x hex.
    #[arg(long, global = true, env = "HUSH_OPERATOR_KEY_DER", hide_env_values = true)]
    operator_key_der: Option<String>,

    /// Target network.
    #[arg(long, global = true, env = "HUSH_NETWORK", default_value = "testnet")]
    network: Network,

    /// Token contract, 0x... or shard.realm.num.
    #[arg(long, global = true, env = "HUSH_CONTRACT_ADDRESS")]
    contract: Option<String>,

    /// JSON-RPC relay endpoint override.
    #[arg(long, global = true, env = "HUSH_RELAY_URL")]
    relay_url: Option<String>,

    /// Mirror-node REST endpoint override.
    #[arg(long, global = true, env = "HUSH_MIRROR_URL")]
    mirror_url: Option<String>,

    /// Whole-unit to smallest-unit scaling exponent.
    #[arg(long, global = true, default_value_t = 18)]
    token_decimals: u32,

    #[arg(long, global = true, default_value_t = 300_000)]
    gas_limit: u64,

    /// Transaction fee cap, in HBAR.
    #[arg(long, global = true, default_value_t = 10)]
    max_fee_hbar: u64,

    /// Budget for submission plus finality, in seconds.
    #[arg(long, global = true, default_value_t = 120)]
    receipt_timeout_secs: u64,

    /// Directory for daily-rotated log files (console-only when unset).
    #[arg(long, global = true, env = "HUSH_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl OperatorArgs {
    fn to_config(&self) -> OperatorConfig {
        OperatorConfig {
            operator_id: self.operator_id.clone(),
            operator_key_der: self.operator_key_der.clone(),
            network: self.network,
            contract: self.contract.clone(),
            token_decimals: self.token_decimals,
            gas_limit: self.gas_limit,
            max_fee_hbar: self.max_fee_hbar,
            receipt_timeout_secs: self.receipt_timeout_secs,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mint tokens to a recipient through the manager contract.
    Mint {
        /// Recipient, 0x... or shard.realm.num.
        #[arg(env = "HUSH_RECIPIENT")]
        recipient: String,
        /// Whole-unit amount.
        #[arg(env = "HUSH_MINT_AMOUNT", default_value = "100")]
        amount: String,
    },
    /// Query a holder's token balance.
    Balance {
        /// Holder, 0x... or shard.realm.num.
        address: String,
    },
    /// Decode the operator key and cross-check its identities.
    InspectKey,
    /// Translate an address between its native and EVM forms.
    Resolve { address: String },
    /// Link the manager contract to its token and record the address.
    LinkToken {
        /// Token contract, 0x... or shard.realm.num.
        token_address: String,
        /// Environment file to record the token address in.
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },
    /// Show the token's name, symbol, decimals and total supply.
    TokenInfo,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.operator.log_dir.as_deref())?;
    let config = cli.operator.to_config();

    match cli.command {
        Command::Mint { recipient, amount } => mint(&config, &cli.operator, &recipient, &amount).await,
        Command::Balance { address } => balance(&config, &cli.operator, &address).await,
        Command::InspectKey => inspect_key(&config, &cli.operator).await,
        Command::Resolve { address } => resolve(&config, &cli.operator, &address).await,
        Command::LinkToken {
            token_address,
            env_file,
        } => link_token(&config, &cli.operator, &token_address, &env_file).await,
        Command::TokenInfo => token_info(&config, &cli.operator).await,
    }
}

fn relay(config: &OperatorConfig, args: &OperatorArgs) -> Result<RelayClient> {
    let key = config.operator_key()?;
    match args.relay_url.as_deref() {
        Some(endpoint) => RelayClient::with_endpoint(config.network, &key, endpoint),
        None => RelayClient::new(config.network, &key),
    }
}

fn mirror(config: &OperatorConfig, args: &OperatorArgs) -> Result<MirrorClient> {
    match args.mirror_url.as_deref() {
        Some(endpoint) => MirrorClient::with_base_url(endpoint),
        None => MirrorClient::new(config.network),
    }
}

async fn mint(
    config: &OperatorConfig,
    args: &OperatorArgs,
    recipient: &str,
    amount: &str,
) -> Result<ExitCode> {
    let contract = config.contract_address()?;
    let relay = relay(config, args)?;
    let orchestrator = MintOrchestrator::new(&relay, &relay, contract, config.mint_options());

    let result = orchestrator
        .mint(recipient, amount)
        .await
        .context("mint inputs failed validation")?;

    println!("network:        {}", config.network);
    println!("recipient:      {recipient}");
    println!("amount:         {amount} (x10^{})", config.token_decimals);
    println!("balance before: {}", whole_units(&result.balance_before, config.token_decimals));
    println!("balance after:  {}", whole_units(&result.balance_after, config.token_decimals));
    if let Some(tx_ref) = &result.transaction_ref {
        println!("transaction:    {}", config.network.hashscan_tx_url(tx_ref));
    }
    match result.status {
        MintStatus::Succeeded => {
            println!("outcome:        minted");
            Ok(ExitCode::SUCCESS)
        }
        MintStatus::Reverted | MintStatus::SubmissionFailed => {
            let label = match result.status {
                MintStatus::Reverted => "reverted",
                _ => "submission failed",
            };
            println!("outcome:        {label}");
            if let Some(cause) = &result.raw_cause {
                println!("cause:          {cause}");
            }
            if let Some(guidance) = result.guidance {
                println!("hint:           {guidance}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn balance(config: &OperatorConfig, args: &OperatorArgs, address: &str) -> Result<ExitCode> {
    let contract = config.contract_address()?;
    let holder = Address::parse(address)?.to_evm();
    let relay = relay(config, args)?;
    let probe = BalanceProbe::new(&relay, contract);

    let reading = probe.query(&holder).await;
    println!("holder:  {holder}");
    match reading {
        BalanceReading::Known(amount) => {
            println!(
                "balance: {} whole units ({amount} smallest units)",
                amount.unscale(config.token_decimals)
            );
            Ok(ExitCode::SUCCESS)
        }
        BalanceReading::Unknown => {
            println!("balance: unknown (query failed, see log output)");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn inspect_key(config: &OperatorConfig, args: &OperatorArgs) -> Result<ExitCode> {
    let key = config.operator_key()?;

    println!("round trip:     ok (DER and raw encodings agree)");
    println!("raw secret:     {}", key.to_evm_hex());

    let relay = relay(config, args)?;
    let signer = relay.signer_address();
    println!("signer address: {signer} (ECDSA-derived, for EVM wallet import)");

    if config.operator_id.is_none() {
        println!("operator id:    not set, skipping ledger cross-check");
        return Ok(ExitCode::SUCCESS);
    }
    let operator = config.operator_account()?;
    println!("operator id:    {operator}");
    println!("long-zero:      {}", operator.to_evm_address());

    match mirror(config, args)?.registered_evm_address(&operator).await {
        Ok(Some(registered)) => {
            println!("ledger alias:   {registered}");
            if registered == signer {
                println!("identity:       alias matches this key's signer address");
            } else {
                println!(
                    "identity:       alias differs from the signer address; \
                     the account was created with a different key or key type"
                );
            }
        }
        Ok(None) => println!("ledger alias:   none registered (long-zero account)"),
        Err(e) => {
            warn!(error = %e, "mirror lookup failed");
            println!("ledger alias:   unavailable (mirror lookup failed)");
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn resolve(config: &OperatorConfig, args: &OperatorArgs, address: &str) -> Result<ExitCode> {
    match Address::parse(address)? {
        Address::Native(id) => {
            println!("native id: {id}");
            println!("long-zero: {}", id.to_evm_address());
            match mirror(config, args)?.registered_evm_address(&id).await {
                Ok(Some(registered)) if registered != id.to_evm_address() => {
                    println!("alias:     {registered} (registered on the ledger)");
                }
                Ok(Some(_)) => println!("alias:     none, the ledger uses the long-zero form"),
                Ok(None) => println!("alias:     none registered"),
                Err(e) => {
                    warn!(error = %e, "mirror lookup failed");
                    println!("alias:     unavailable (mirror lookup failed)");
                }
            }
        }
        Address::Evm(addr) => {
            println!("evm:       {addr}");
            println!("native id: not derivable from an EVM address; look it up on HashScan");
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn link_token(
    config: &OperatorConfig,
    args: &OperatorArgs,
    token_address: &str,
    env_file: &Path,
) -> Result<ExitCode> {
    let contract = config.contract_address()?;
    let token = Address::parse(token_address)?.to_evm();
    let relay = relay(config, args)?;

    let call = ContractCall {
        contract,
        function: "initialize",
        data: abi::initialize(&token),
        gas_limit: config.gas_limit,
        max_fee_hbar: config.max_fee_hbar,
    };
    let handle = relay.submit(&call).await.context("initialize submission failed")?;
    let receipt = tokio::time::timeout(config.receipt_timeout(), relay.await_receipt(&handle))
        .await
        .context("timed out waiting for the initialize receipt")?
        .context("initialize receipt failed")?;

    println!("transaction: {}", config.network.hashscan_tx_url(&receipt.tx_ref));
    if !receipt.is_success() {
        println!("outcome:     {} (token not linked)", receipt.status);
        return Ok(ExitCode::FAILURE);
    }

    let mut env = EnvFile::load(env_file)?;
    env.set(KEY_TOKEN_ADDRESS, &token.to_string());
    env.save()?;
    println!("outcome:     linked token {token}");
    println!("recorded:    {KEY_TOKEN_ADDRESS} in {}", env_file.display());
    Ok(ExitCode::SUCCESS)
}

async fn token_info(config: &OperatorConfig, args: &OperatorArgs) -> Result<ExitCode> {
    let contract = config.contract_address()?;
    let relay = relay(config, args)?;

    let name = string_view(&relay, &contract, "name()").await?;
    let symbol = string_view(&relay, &contract, "symbol()").await?;
    let decimals = uint_view(&relay, &contract, "decimals()").await?;
    let supply = uint_view(&relay, &contract, "totalSupply()").await?;

    println!("contract: {contract}");
    println!("name:     {name}");
    println!("symbol:   {symbol}");
    println!("decimals: {decimals}");
    println!("supply:   {supply} smallest units");
    Ok(ExitCode::SUCCESS)
}

async fn string_view(
    view: &impl ViewQueryService,
    contract: &hush_ledger::EvmAddress,
    signature: &str,
) -> Result<String> {
    let ret = view.call(contract, &abi::view_call(signature)).await?;
    abi::decode_string(&ret).with_context(|| format!("{signature} returned a malformed string"))
}

async fn uint_view(
    view: &impl ViewQueryService,
    contract: &hush_ledger::EvmAddress,
    signature: &str,
) -> Result<String> {
    let ret = view.call(contract, &abi::view_call(signature)).await?;
    let value = abi::decode_uint256(&ret)
        .with_context(|| format!("{signature} returned a short word"))?;
    Ok(value.to_string())
}

fn whole_units(reading: &BalanceReading, decimals: u32) -> String {
    match reading {
        BalanceReading::Known(amount) => {
            format!("{} whole units ({amount} smallest units)", amount.unscale(decimals))
        }
        BalanceReading::Unknown => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_a_mint_invocation() {
        let cli = Cli::try_parse_from([
            "hushmint",
            "mint",
            "0.0.6428773",
            "50",
            "--network",
            "mainnet",
            "--contract",
            "0.0.5555",
        ])
        .unwrap();
        assert_eq!(cli.operator.network, Network::Mainnet);
        assert_eq!(cli.operator.contract.as_deref(), Some("0.0.5555"));
        match cli.command {
            Command::Mint { recipient, amount } => {
                assert_eq!(recipient, "0.0.6428773");
                assert_eq!(amount, "50");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn mint_amount_defaults_to_one_hundred() {
        let cli = Cli::try_parse_from(["hushmint", "mint", "0.0.1"]).unwrap();
        match cli.command {
            Command::Mint { amount, .. } => assert_eq!(amount, "100"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_an_unknown_network() {
        assert!(Cli::try_parse_from(["hushmint", "--network", "previewnet", "token-info"]).is_err());
    }

    #[test]
    fn defaults_mirror_the_operator_config() {
        let cli = Cli::try_parse_from(["hushmint", "token-info"]).unwrap();
        let config = cli.operator.to_config();
        let reference = OperatorConfig::default();
        assert_eq!(config.token_decimals, reference.token_decimals);
        assert_eq!(config.gas_limit, reference.gas_limit);
        assert_eq!(config.max_fee_hbar, reference.max_fee_hbar);
        assert_eq!(config.receipt_timeout_secs, reference.receipt_timeout_secs);
    }
}
