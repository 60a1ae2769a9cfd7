//! Credential oracle adapters

use crate::error::VotingResult;
use crate::ports::outbound::CredentialOracle;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Address, Principal};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A token account as seen by the oracle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialAccount {
    pub owner: Principal,
    pub mint: Address,
    pub amount: u64,
}

/// Oracle backed by token balances of a single governance mint.
///
/// A credential is valid when the account exists, belongs to the caller,
/// holds the governance mint and has a non-zero balance.
#[derive(Debug)]
pub struct TokenBalanceOracle {
    governance_mint: Address,
    accounts: RwLock<HashMap<Address, CredentialAccount>>,
}

impl TokenBalanceOracle {
    pub fn new(governance_mint: Address) -> Self {
        Self {
            governance_mint,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    pub fn governance_mint(&self) -> Address {
        self.governance_mint
    }

    /// Insert or replace an account
    pub fn set_account(&self, address: Address, account: CredentialAccount) {
        self.accounts.write().insert(address, account);
    }

    /// Open an account on the governance mint for `owner`.
    pub fn mint_to(&self, address: Address, owner: Principal, amount: u64) {
        self.set_account(
            address,
            CredentialAccount {
                owner,
                mint: self.governance_mint,
                amount,
            },
        );
    }

    /// Change the balance of an existing account. Returns false if absent.
    pub fn set_balance(&self, address: &Address, amount: u64) -> bool {
        match self.accounts.write().get_mut(address) {
            Some(account) => {
                account.amount = amount;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl CredentialOracle for TokenBalanceOracle {
    async fn holds_valid_credential(
        &self,
        owner: &Principal,
        credential: &Address,
    ) -> VotingResult<bool> {
        let accounts = self.accounts.read();
        let Some(account) = accounts.get(credential) else {
            debug!(credential = %credential, "Credential account not found");
            return Ok(false);
        };

        let valid = account.owner == *owner
            && account.mint == self.governance_mint
            && account.amount > 0;
        if !valid {
            debug!(
                credential = %credential,
                owner_matches = account.owner == *owner,
                mint_matches = account.mint == self.governance_mint,
                amount = account.amount,
                "Credential rejected"
            );
        }
        Ok(valid)
    }
}

/// Oracle with a fixed set of (owner, credential) pairs.
#[derive(Debug, Default)]
pub struct AllowListOracle {
    allowed: RwLock<HashSet<(Principal, Address)>>,
}

impl AllowListOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&self, owner: Principal, credential: Address) {
        self.allowed.write().insert((owner, credential));
    }

    /// Returns whether the pair was present.
    pub fn revoke(&self, owner: &Principal, credential: &Address) -> bool {
        self.allowed.write().remove(&(*owner, *credential))
    }
}

#[async_trait]
impl CredentialOracle for AllowListOracle {
    async fn holds_valid_credential(
        &self,
        owner: &Principal,
        credential: &Address,
    ) -> VotingResult<bool> {
        Ok(self.allowed.read().contains(&(*owner, *credential)))
    }
}
