//! Wire message types.
//!
//! Every frame exchanged with the bootstrap node starts with one of these
//! codes. Broadcast codes are chosen from the transaction kind; there is no
//! way to ask for "the broadcast code of an unknown kind", so the sentinel
//! [`MessageType::NotFound`] only ever comes from decoding a wire byte we
//! do not recognise.

use std::fmt;

use crate::config::{
    MSG_ACCOUNT_REQUEST, MSG_ACCOUNT_RESPONSE, MSG_ACC_TX_BROADCAST, MSG_CONFIG_TX_BROADCAST,
    MSG_FUNDS_TX_BROADCAST, MSG_NOT_FOUND, MSG_ROOT_ACCOUNT_REQUEST, MSG_STAKE_TX_BROADCAST,
    MSG_UPDATE_TX_BROADCAST,
};
use crate::transaction::TxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    AccTxBroadcast,
    FundsTxBroadcast,
    ConfigTxBroadcast,
    StakeTxBroadcast,
    UpdateTxBroadcast,
    AccountRequest,
    RootAccountRequest,
    AccountResponse,
    NotFound,
}

impl MessageType {
    /// Broadcast type for a transaction kind.
    pub fn for_kind(kind: TxKind) -> Self {
        match kind {
            TxKind::AccountCreation => MessageType::AccTxBroadcast,
            TxKind::FundsTransfer => MessageType::FundsTxBroadcast,
            TxKind::Config => MessageType::ConfigTxBroadcast,
            TxKind::Stake => MessageType::StakeTxBroadcast,
            TxKind::Update => MessageType::UpdateTxBroadcast,
        }
    }

    /// Account query type. Root queries ask whether the account is a root.
    pub fn account_request(root: bool) -> Self {
        if root {
            MessageType::RootAccountRequest
        } else {
            MessageType::AccountRequest
        }
    }

    pub fn code(self) -> u8 {
        match self {
            MessageType::AccTxBroadcast => MSG_ACC_TX_BROADCAST,
            MessageType::FundsTxBroadcast => MSG_FUNDS_TX_BROADCAST,
            MessageType::ConfigTxBroadcast => MSG_CONFIG_TX_BROADCAST,
            MessageType::StakeTxBroadcast => MSG_STAKE_TX_BROADCAST,
            MessageType::UpdateTxBroadcast => MSG_UPDATE_TX_BROADCAST,
            MessageType::AccountRequest => MSG_ACCOUNT_REQUEST,
            MessageType::RootAccountRequest => MSG_ROOT_ACCOUNT_REQUEST,
            MessageType::AccountResponse => MSG_ACCOUNT_RESPONSE,
            MessageType::NotFound => MSG_NOT_FOUND,
        }
    }

    /// Unknown codes decode to [`MessageType::NotFound`].
    pub fn from_code(code: u8) -> Self {
        match code {
            MSG_ACC_TX_BROADCAST => MessageType::AccTxBroadcast,
            MSG_FUNDS_TX_BROADCAST => MessageType::FundsTxBroadcast,
            MSG_CONFIG_TX_BROADCAST => MessageType::ConfigTxBroadcast,
            MSG_STAKE_TX_BROADCAST => MessageType::StakeTxBroadcast,
            MSG_UPDATE_TX_BROADCAST => MessageType::UpdateTxBroadcast,
            MSG_ACCOUNT_REQUEST => MessageType::AccountRequest,
            MSG_ROOT_ACCOUNT_REQUEST => MessageType::RootAccountRequest,
            MSG_ACCOUNT_RESPONSE => MessageType::AccountResponse,
            _ => MessageType::NotFound,
        }
    }

    pub fn is_broadcast(self) -> bool {
        matches!(
            self,
            MessageType::AccTxBroadcast
                | MessageType::FundsTxBroadcast
                | MessageType::ConfigTxBroadcast
                | MessageType::StakeTxBroadcast
                | MessageType::UpdateTxBroadcast
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::AccTxBroadcast => "ACCTX_BRDCST",
            MessageType::FundsTxBroadcast => "FUNDSTX_BRDCST",
            MessageType::ConfigTxBroadcast => "CONFIGTX_BRDCST",
            MessageType::StakeTxBroadcast => "STAKETX_BRDCST",
            MessageType::UpdateTxBroadcast => "UPDATETX_BRDCST",
            MessageType::AccountRequest => "ACC_REQ",
            MessageType::RootAccountRequest => "ROOTACC_REQ",
            MessageType::AccountResponse => "ACC_RES",
            MessageType::NotFound => "NOT_FOUND",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_broadcast_type() {
        for kind in TxKind::ALL {
            let t = MessageType::for_kind(kind);
            assert!(t.is_broadcast());
            assert_eq!(MessageType::from_code(t.code()), t);
        }
    }

    #[test]
    fn unknown_codes_are_not_found() {
        assert_eq!(MessageType::from_code(0), MessageType::NotFound);
        assert_eq!(MessageType::from_code(255), MessageType::NotFound);
        assert_eq!(MessageType::from_code(MSG_NOT_FOUND), MessageType::NotFound);
    }

    #[test]
    fn account_request_flavours() {
        assert_eq!(MessageType::account_request(false).code(), MSG_ACCOUNT_REQUEST);
        assert_eq!(MessageType::account_request(true).code(), MSG_ROOT_ACCOUNT_REQUEST);
        assert!(!MessageType::AccountResponse.is_broadcast());
    }
}
