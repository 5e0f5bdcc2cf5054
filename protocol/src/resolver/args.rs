//! Request arguments for each preparable transaction kind.
//!
//! These are the shapes the CLI and the REST layer both fill in. Key and
//! parameter fields stay as raw strings here; the preparer resolves them.
//! `validate` only checks presence and simple ranges, so it never touches
//! the disk and always runs before any state changes.

use serde::{Deserialize, Serialize};

use crate::config::ADDRESS_HEX_LEN;
use crate::error::{ClientError, ClientResult};

fn require(value: &str, name: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::missing(name));
    }
    Ok(())
}

fn require_fee(fee: u64) -> ClientResult<()> {
    if fee == 0 {
        return Err(ClientError::invalid("Fee must be > 0"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Create a new account whose key pair lives in (or is generated into)
/// `wallet`, vouched for by `root_wallet`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateAccountArgs {
    pub header: u8,
    pub fee: u64,
    pub root_wallet: String,
    pub wallet: String,
    pub chparams: String,
    pub data: String,
}

impl CreateAccountArgs {
    pub fn validate(&self) -> ClientResult<()> {
        require_fee(self.fee)?;
        require(&self.root_wallet, "rootwallet")?;
        require(&self.wallet, "wallet")?;
        require(&self.chparams, "chparams")?;
        Ok(())
    }
}

/// Register an existing address (128 hex chars) as a new account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddAccountArgs {
    pub header: u8,
    pub fee: u64,
    pub root_wallet: String,
    pub address: String,
    pub chparams: String,
    pub data: String,
}

impl AddAccountArgs {
    pub fn validate(&self) -> ClientResult<()> {
        require_fee(self.fee)?;
        require(&self.root_wallet, "rootwallet")?;
        require(&self.address, "Address")?;
        if self.address.len() != ADDRESS_HEX_LEN {
            return Err(ClientError::Validation(
                "invalid argument length: Address".into(),
            ));
        }
        require(&self.chparams, "chparams")?;
        Ok(())
    }
}

/// Look an account up by address or by wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckAccountArgs {
    pub address: String,
    pub wallet: String,
}

impl CheckAccountArgs {
    pub fn validate(&self) -> ClientResult<()> {
        if self.address.is_empty() && self.wallet.is_empty() {
            return Err(ClientError::missing("Address or wallet"));
        }
        if self.wallet.is_empty() && self.address.len() != ADDRESS_HEX_LEN {
            return Err(ClientError::invalid("Address"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Funds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundsArgs {
    pub header: u8,
    pub from: String,
    /// Recipient key (file or direct). Either this or `to_address`.
    pub to: String,
    pub to_address: String,
    /// Co-signer key, used only by the local signing path.
    pub multisig: String,
    pub chparams: String,
    pub amount: u64,
    pub fee: u64,
    pub tx_count: u32,
    pub data: String,
}

impl FundsArgs {
    pub fn validate(&self) -> ClientResult<()> {
        require(&self.from, "from")?;
        if self.to.is_empty() && self.to_address.is_empty() {
            return Err(ClientError::missing("to or to_address"));
        }
        if self.to.is_empty() && self.to_address.len() != ADDRESS_HEX_LEN {
            return Err(ClientError::invalid("ToAddress"));
        }
        require_fee(self.fee)?;
        if self.amount == 0 {
            return Err(ClientError::invalid("Amount must be > 0"));
        }
        require(&self.chparams, "chparams")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Network configuration
// ---------------------------------------------------------------------------

/// Network parameters a root account may change with a config transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOption {
    BlockSize = 1,
    DifficultyInterval = 2,
    MinimumFee = 3,
    BlockInterval = 4,
    BlockReward = 5,
}

impl ConfigOption {
    pub const ALL: [ConfigOption; 5] = [
        ConfigOption::BlockSize,
        ConfigOption::DifficultyInterval,
        ConfigOption::MinimumFee,
        ConfigOption::BlockInterval,
        ConfigOption::BlockReward,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            ConfigOption::BlockSize => "setBlockSize",
            ConfigOption::DifficultyInterval => "setDifficultyInterval",
            ConfigOption::MinimumFee => "setMinimumFee",
            ConfigOption::BlockInterval => "setBlockInterval",
            ConfigOption::BlockReward => "setBlockReward",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkArgs {
    pub header: u8,
    pub fee: u64,
    pub tx_count: u32,
    pub root_wallet: String,
    pub option_id: u8,
    pub payload: u64,
}

impl NetworkArgs {
    pub fn validate(&self) -> ClientResult<()> {
        require_fee(self.fee)?;
        require(&self.root_wallet, "rootwallet")?;
        if ConfigOption::from_id(self.option_id).is_none() {
            return Err(ClientError::invalid(&format!(
                "unknown config option {}",
                self.option_id
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Staking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingArgs {
    pub header: u8,
    pub fee: u64,
    pub wallet: String,
    pub commitment: String,
    pub staking: bool,
}

impl StakingArgs {
    pub fn validate(&self) -> ClientResult<()> {
        require_fee(self.fee)?;
        require(&self.wallet, "wallet")?;
        if self.staking && self.commitment.trim().is_empty() {
            return Err(ClientError::missing("Commitment"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Update / Delete
// ---------------------------------------------------------------------------

/// Redact a staged transaction's data and stage the update transaction
/// that announces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateArgs {
    pub header: u8,
    pub fee: u64,
    /// Hex hash of the transaction to redact.
    pub tx_hash: String,
    pub tx_issuer: String,
    pub chparams: String,
    pub update_data: String,
    pub data: String,
}

impl UpdateArgs {
    pub fn validate(&self) -> ClientResult<()> {
        require(&self.tx_hash, "txHash")?;
        require(&self.tx_issuer, "txIssuer")?;
        require(&self.chparams, "ch_params")?;
        require_fee(self.fee)?;
        Ok(())
    }
}

/// An update whose new data is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteArgs {
    pub header: u8,
    pub fee: u64,
    pub tx_hash: String,
    pub tx_issuer: String,
    pub chparams: String,
    pub data: String,
}

impl DeleteArgs {
    pub fn validate(&self) -> ClientResult<()> {
        self.as_update().validate()
    }

    pub fn as_update(&self) -> UpdateArgs {
        UpdateArgs {
            header: self.header,
            fee: self.fee,
            tx_hash: self.tx_hash.clone(),
            tx_issuer: self.tx_issuer.clone(),
            chparams: self.chparams.clone(),
            update_data: String::new(),
            data: self.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(r: ClientResult<()>) -> String {
        r.unwrap_err().to_string()
    }

    #[test]
    fn create_account_checks_in_order() {
        let mut args = CreateAccountArgs::default();
        assert_eq!(msg(args.validate()), "invalid argument: Fee must be > 0");
        args.fee = 1;
        assert_eq!(msg(args.validate()), "argument missing: rootwallet");
        args.root_wallet = "root.txt".into();
        assert_eq!(msg(args.validate()), "argument missing: wallet");
        args.wallet = "wallet.txt".into();
        assert_eq!(msg(args.validate()), "argument missing: chparams");
        args.chparams = "chparams.txt".into();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn add_account_checks_address_length() {
        let mut args = AddAccountArgs {
            fee: 1,
            root_wallet: "root.txt".into(),
            address: "ab".into(),
            chparams: "chparams.txt".into(),
            ..Default::default()
        };
        assert_eq!(msg(args.validate()), "invalid argument length: Address");
        args.address = "ab".repeat(64);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn check_account_needs_address_or_wallet() {
        assert_eq!(
            msg(CheckAccountArgs::default().validate()),
            "argument missing: Address or wallet"
        );
        let bad = CheckAccountArgs {
            address: "00".into(),
            ..Default::default()
        };
        assert_eq!(msg(bad.validate()), "invalid argument: Address");
        let wallet = CheckAccountArgs {
            wallet: "wallet.txt".into(),
            ..Default::default()
        };
        assert!(wallet.validate().is_ok());
    }

    #[test]
    fn funds_rules() {
        let mut args = FundsArgs {
            from: "from.txt".into(),
            to_address: "00".repeat(64),
            chparams: "chparams.txt".into(),
            amount: 100,
            fee: 1,
            ..Default::default()
        };
        assert!(args.validate().is_ok());

        args.to_address = "00".into();
        assert_eq!(msg(args.validate()), "invalid argument: ToAddress");
        args.to = "to.txt".into();
        assert!(args.validate().is_ok());

        args.amount = 0;
        assert_eq!(msg(args.validate()), "invalid argument: Amount must be > 0");
        args.amount = 1;
        args.fee = 0;
        assert_eq!(msg(args.validate()), "invalid argument: Fee must be > 0");
    }

    #[test]
    fn network_rejects_unknown_option() {
        let mut args = NetworkArgs {
            fee: 1,
            root_wallet: "root.txt".into(),
            option_id: 9,
            ..Default::default()
        };
        assert!(msg(args.validate()).starts_with("invalid argument: unknown config option"));
        args.option_id = ConfigOption::BlockReward.id();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn config_option_ids_roundtrip() {
        for option in ConfigOption::ALL {
            assert_eq!(ConfigOption::from_id(option.id()), Some(option));
        }
        assert_eq!(ConfigOption::from_id(0), None);
        assert_eq!(ConfigOption::MinimumFee.name(), "setMinimumFee");
    }

    #[test]
    fn staking_enable_requires_commitment() {
        let mut args = StakingArgs {
            fee: 1,
            wallet: "wallet.txt".into(),
            staking: true,
            ..Default::default()
        };
        assert_eq!(msg(args.validate()), "argument missing: Commitment");
        args.staking = false;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn update_and_delete_share_rules() {
        let delete = DeleteArgs {
            fee: 1,
            tx_hash: "ab".repeat(32),
            ..Default::default()
        };
        assert_eq!(msg(delete.validate()), "argument missing: txIssuer");
        let update = delete.as_update();
        assert!(update.update_data.is_empty());
        assert_eq!(update.tx_hash, delete.tx_hash);
    }

    #[test]
    fn json_field_names() {
        let args: FundsArgs = serde_json::from_str(
            r#"{"from":"a.txt","to_address":"","amount":5,"fee":1,"tx_count":3}"#,
        )
        .unwrap();
        assert_eq!(args.amount, 5);
        assert_eq!(args.tx_count, 3);
        assert!(args.chparams.is_empty());
    }
}
