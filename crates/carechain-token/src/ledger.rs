//! In-memory fungible token ledger.
//!
//! Balances live in a `HashMap` behind a `Mutex`. Supply only grows through
//! `mint`; there is no burn.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, info};

use carechain_contracts::error::{CareChainError, CareChainResult};
use carechain_core::traits::TokenLedger;

#[derive(Debug, Default)]
struct TokenState {
    balances: HashMap<String, u64>,
    total_supply: u64,
}

/// A loyalty token with mint, transfer and balance lookup.
pub struct FungibleLedger {
    name: String,
    symbol: String,
    state: Mutex<TokenState>,
}

impl FungibleLedger {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            state: Mutex::new(TokenState::default()),
        }
    }

    fn lock_state(&self) -> CareChainResult<MutexGuard<'_, TokenState>> {
        self.state.lock().map_err(|e| CareChainError::TokenError {
            reason: format!("token state lock poisoned: {}", e),
        })
    }

    fn read_state(&self) -> MutexGuard<'_, TokenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenLedger for FungibleLedger {
    fn mint(&self, address: &str, amount: u64) -> CareChainResult<()> {
        let mut state = self.lock_state()?;

        let balance = state.balances.get(address).copied().unwrap_or(0);
        let overflow = || CareChainError::TokenError {
            reason: format!("minting {} {} to '{}' overflows", amount, self.symbol, address),
        };
        let new_balance = balance.checked_add(amount).ok_or_else(overflow)?;
        let new_supply = state.total_supply.checked_add(amount).ok_or_else(overflow)?;

        state.balances.insert(address.to_string(), new_balance);
        state.total_supply = new_supply;

        info!(address = %address, amount, symbol = %self.symbol, total_supply = new_supply, "tokens minted");
        Ok(())
    }

    fn transfer(&self, from: &str, to: &str, amount: u64) -> CareChainResult<bool> {
        let mut state = self.lock_state()?;

        let from_balance = state.balances.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            debug!(from = %from, to = %to, amount, balance = from_balance, "insufficient balance");
            return Ok(false);
        }
        if from == to {
            return Ok(true);
        }

        let to_balance = state.balances.get(to).copied().unwrap_or(0);
        let new_to = to_balance.checked_add(amount).ok_or_else(|| CareChainError::TokenError {
            reason: format!("transfer of {} {} to '{}' overflows", amount, self.symbol, to),
        })?;

        state.balances.insert(from.to_string(), from_balance - amount);
        state.balances.insert(to.to_string(), new_to);

        debug!(from = %from, to = %to, amount, "tokens transferred");
        Ok(true)
    }

    fn balance_of(&self, address: &str) -> u64 {
        self.read_state().balances.get(address).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u64 {
        self.read_state().total_supply
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }
}
