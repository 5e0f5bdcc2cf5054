//! # CLI Interface
//!
//! Command-line structure for `chameleon-client`, built with `clap` derive.
//!
//! Every transaction subcommand stages an unsigned transaction and prints
//! its hash. Pass `--sign-with <KEY>` to sign it in-process and submit it
//! straight away; otherwise sign the hash elsewhere and come back with
//! `sign --hash .. --signature ..`.
//!
//! Keys and chameleon parameters are given either as a path ending in
//! `.txt` or inline as hex fields (space separated or glued together).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use chameleon_protocol::resolver::args::{
    AddAccountArgs, CheckAccountArgs, ConfigOption, CreateAccountArgs, DeleteArgs, FundsArgs,
    NetworkArgs, StakingArgs, UpdateArgs,
};

use crate::fee::coerce_fee;
use crate::logging::LogFormat;

/// Client for a ledger with redactable transactions.
#[derive(Parser, Debug)]
#[command(
    name = "chameleon-client",
    about = "Stage, sign, submit and redact chameleon-hashed transactions",
    version,
    propagate_version = true
)]
pub struct ChameleonCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand. Each overrides the matching key of
/// the config file.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Path to a TOML configuration file.
    #[arg(long, short = 'c', env = "CHAMELEON_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory of the staged transaction database.
    #[arg(long, env = "CHAMELEON_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// `host:port` of the bootstrap node.
    #[arg(long, env = "CHAMELEON_BOOTSTRAP", global = true)]
    pub bootstrap: Option<String>,

    /// Log filter, overridden by `RUST_LOG`.
    #[arg(
        long,
        env = "CHAMELEON_LOG_LEVEL",
        default_value = "chameleon_client=info,chameleon_protocol=info",
        global = true
    )]
    pub log_level: String,

    /// Log output format.
    #[arg(
        long,
        value_enum,
        env = "CHAMELEON_LOG_FORMAT",
        default_value_t = LogFormat::Pretty,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account creation and lookup.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Transfer funds between accounts.
    Funds(FundsCmd),
    /// Change network parameters (root accounts only).
    Network(NetworkCmd),
    /// Become or stop being a validator.
    #[command(subcommand)]
    Staking(StakingCommand),
    /// Replace the data of a staged transaction, keeping its hash.
    Update(UpdateCmd),
    /// Empty the data of a staged transaction, keeping its hash.
    Delete(DeleteCmd),
    /// Attach an externally produced signature and submit.
    Sign(SignCmd),
    /// Resubmit an already signed transaction.
    Submit(SubmitCmd),
    /// Serve the REST API.
    Rest(RestCmd),
}

/// In-process signing for the transaction subcommands.
#[derive(Args, Debug, Default)]
pub struct SignOpts {
    /// Sign the staged transaction with this private key and submit it.
    /// Without it, the hash is printed for external signing.
    #[arg(long, value_name = "KEY")]
    pub sign_with: Option<String>,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Create an account for the key pair in a wallet (generated if absent).
    Create(CreateAccountCmd),
    /// Register an existing address as an account.
    Add(AddAccountCmd),
    /// Look up an account on the network.
    Check(CheckAccountCmd),
}

#[derive(Args, Debug)]
pub struct CreateAccountCmd {
    #[arg(long, default_value_t = 0)]
    pub header: u8,
    #[arg(long, default_value_t = 1)]
    pub fee: u64,
    /// Root account vouching for the new one.
    #[arg(long)]
    pub root_wallet: String,
    #[arg(long)]
    pub wallet: String,
    #[arg(long)]
    pub chparams: String,
    #[arg(long, default_value = "")]
    pub data: String,
    #[command(flatten)]
    pub sign: SignOpts,
}

impl CreateAccountCmd {
    pub fn to_args(&self) -> CreateAccountArgs {
        CreateAccountArgs {
            header: self.header,
            fee: coerce_fee(self.fee),
            root_wallet: self.root_wallet.clone(),
            wallet: self.wallet.clone(),
            chparams: self.chparams.clone(),
            data: self.data.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct AddAccountCmd {
    #[arg(long, default_value_t = 0)]
    pub header: u8,
    #[arg(long, default_value_t = 1)]
    pub fee: u64,
    #[arg(long)]
    pub root_wallet: String,
    /// 128 hex characters.
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub chparams: String,
    #[arg(long, default_value = "")]
    pub data: String,
    #[command(flatten)]
    pub sign: SignOpts,
}

impl AddAccountCmd {
    pub fn to_args(&self) -> AddAccountArgs {
        AddAccountArgs {
            header: self.header,
            fee: coerce_fee(self.fee),
            root_wallet: self.root_wallet.clone(),
            address: self.address.clone(),
            chparams: self.chparams.clone(),
            data: self.data.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckAccountCmd {
    #[arg(long, default_value = "")]
    pub address: String,
    /// Look up the account of this wallet's public key instead.
    #[arg(long, default_value = "")]
    pub wallet: String,
}

impl CheckAccountCmd {
    pub fn to_args(&self) -> CheckAccountArgs {
        CheckAccountArgs {
            address: self.address.clone(),
            wallet: self.wallet.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Funds
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct FundsCmd {
    #[arg(long, default_value_t = 0)]
    pub header: u8,
    /// Sender key.
    #[arg(long)]
    pub from: String,
    /// Recipient key. Either this or `--to-address`.
    #[arg(long, default_value = "")]
    pub to: String,
    #[arg(long, default_value = "")]
    pub to_address: String,
    /// Co-signer private key, used with `--sign-with`.
    #[arg(long, default_value = "")]
    pub multisig: String,
    #[arg(long)]
    pub chparams: String,
    #[arg(long)]
    pub amount: u64,
    #[arg(long, default_value_t = 1)]
    pub fee: u64,
    /// Sender's transaction counter.
    #[arg(long, default_value_t = 0)]
    pub tx_count: u32,
    #[arg(long, default_value = "")]
    pub data: String,
    #[command(flatten)]
    pub sign: SignOpts,
}

impl FundsCmd {
    pub fn to_args(&self) -> FundsArgs {
        FundsArgs {
            header: self.header,
            from: self.from.clone(),
            to: self.to.clone(),
            to_address: self.to_address.clone(),
            multisig: self.multisig.clone(),
            chparams: self.chparams.clone(),
            amount: self.amount,
            fee: coerce_fee(self.fee),
            tx_count: self.tx_count,
            data: self.data.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Network configuration
// ---------------------------------------------------------------------------

/// One config transaction is staged per option given.
#[derive(Args, Debug)]
pub struct NetworkCmd {
    #[arg(long, default_value_t = 0)]
    pub header: u8,
    #[arg(long, default_value_t = 1)]
    pub fee: u64,
    #[arg(long, default_value_t = 0)]
    pub tx_count: u32,
    #[arg(long)]
    pub root_wallet: String,
    #[arg(long)]
    pub set_block_size: Option<u64>,
    #[arg(long)]
    pub set_difficulty_interval: Option<u64>,
    #[arg(long)]
    pub set_minimum_fee: Option<u64>,
    #[arg(long)]
    pub set_block_interval: Option<u64>,
    #[arg(long)]
    pub set_block_reward: Option<u64>,
    #[command(flatten)]
    pub sign: SignOpts,
}

impl NetworkCmd {
    /// Options that were set, in id order.
    pub fn options(&self) -> Vec<(ConfigOption, u64)> {
        [
            (ConfigOption::BlockSize, self.set_block_size),
            (ConfigOption::DifficultyInterval, self.set_difficulty_interval),
            (ConfigOption::MinimumFee, self.set_minimum_fee),
            (ConfigOption::BlockInterval, self.set_block_interval),
            (ConfigOption::BlockReward, self.set_block_reward),
        ]
        .into_iter()
        .filter_map(|(option, value)| value.map(|v| (option, v)))
        .collect()
    }

    pub fn to_args(&self) -> Vec<NetworkArgs> {
        self.options()
            .into_iter()
            .map(|(option, payload)| NetworkArgs {
                header: self.header,
                fee: coerce_fee(self.fee),
                tx_count: self.tx_count,
                root_wallet: self.root_wallet.clone(),
                option_id: option.id(),
                payload,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Staking
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum StakingCommand {
    /// Start validating. Requires `--commitment`.
    Enable(StakingCmd),
    /// Stop validating.
    Disable(StakingCmd),
}

#[derive(Args, Debug)]
pub struct StakingCmd {
    #[arg(long, default_value_t = 0)]
    pub header: u8,
    #[arg(long, default_value_t = 1)]
    pub fee: u64,
    #[arg(long)]
    pub wallet: String,
    /// Commitment key, embedded in the transaction by address.
    #[arg(long, default_value = "")]
    pub commitment: String,
    #[command(flatten)]
    pub sign: SignOpts,
}

impl StakingCommand {
    pub fn cmd(&self) -> &StakingCmd {
        match self {
            StakingCommand::Enable(cmd) | StakingCommand::Disable(cmd) => cmd,
        }
    }

    pub fn to_args(&self) -> StakingArgs {
        let cmd = self.cmd();
        StakingArgs {
            header: cmd.header,
            fee: coerce_fee(cmd.fee),
            wallet: cmd.wallet.clone(),
            commitment: cmd.commitment.clone(),
            staking: matches!(self, StakingCommand::Enable(_)),
        }
    }
}

// ---------------------------------------------------------------------------
// Redaction
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct UpdateCmd {
    #[arg(long, default_value_t = 0)]
    pub header: u8,
    #[arg(long, default_value_t = 1)]
    pub fee: u64,
    /// Hash of the transaction to redact.
    #[arg(long)]
    pub tx_hash: String,
    #[arg(long)]
    pub tx_issuer: String,
    /// Parameters holding the trapdoor for the target's hash.
    #[arg(long)]
    pub chparams: String,
    /// New data for the target transaction.
    #[arg(long)]
    pub update_data: String,
    /// Data carried by the update transaction itself.
    #[arg(long, default_value = "")]
    pub data: String,
    #[command(flatten)]
    pub sign: SignOpts,
}

impl UpdateCmd {
    pub fn to_args(&self) -> UpdateArgs {
        UpdateArgs {
            header: self.header,
            fee: coerce_fee(self.fee),
            tx_hash: self.tx_hash.clone(),
            tx_issuer: self.tx_issuer.clone(),
            chparams: self.chparams.clone(),
            update_data: self.update_data.clone(),
            data: self.data.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct DeleteCmd {
    #[arg(long, default_value_t = 0)]
    pub header: u8,
    #[arg(long, default_value_t = 1)]
    pub fee: u64,
    #[arg(long)]
    pub tx_hash: String,
    #[arg(long)]
    pub tx_issuer: String,
    #[arg(long)]
    pub chparams: String,
    #[arg(long, default_value = "")]
    pub data: String,
    #[command(flatten)]
    pub sign: SignOpts,
}

impl DeleteCmd {
    pub fn to_args(&self) -> DeleteArgs {
        DeleteArgs {
            header: self.header,
            fee: coerce_fee(self.fee),
            tx_hash: self.tx_hash.clone(),
            tx_issuer: self.tx_issuer.clone(),
            chparams: self.chparams.clone(),
            data: self.data.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Signing, submission, REST
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct SignCmd {
    /// Hash printed when the transaction was staged.
    #[arg(long)]
    pub hash: String,
    /// 128 hex characters.
    #[arg(long)]
    pub signature: String,
    /// Co-signer signature, funds transfers only.
    #[arg(long)]
    pub cosignature: Option<String>,
}

#[derive(Args, Debug)]
pub struct SubmitCmd {
    #[arg(long)]
    pub hash: String,
}

#[derive(Args, Debug)]
pub struct RestCmd {
    /// Port to listen on. Overrides the config file.
    #[arg(long, env = "CHAMELEON_REST_PORT")]
    pub port: Option<u16>,
}
