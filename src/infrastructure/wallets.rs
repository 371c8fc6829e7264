use crate::domain::address::Address;
use crate::domain::ports::ValueTransfer;
use crate::domain::value::Wei;
use crate::error::{FaucetError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Message carried by [`FaucetError::TransferFailed`] when a recipient refuses value.
pub const TRANSFER_FAILED_MESSAGE: &str = "transferring ether failed";

#[derive(Default)]
struct Wallets {
    balances: HashMap<Address, Wei>,
    rejecting: HashSet<Address>,
}

/// In-memory recipient balances that receive disbursements.
///
/// Recipients registered with [`InMemoryWallets::reject_transfers`] behave like
/// accounts whose receive logic reverts: every transfer to them fails.
#[derive(Default, Clone)]
pub struct InMemoryWallets {
    inner: Arc<RwLock<Wallets>>,
}

impl InMemoryWallets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `address` as unable to receive value.
    pub async fn reject_transfers(&self, address: Address) {
        self.inner.write().await.rejecting.insert(address);
    }

    /// Lets `address` receive value again.
    pub async fn accept_transfers(&self, address: &Address) {
        self.inner.write().await.rejecting.remove(address);
    }

    /// Total value received by `address`.
    pub async fn balance_of(&self, address: &Address) -> Wei {
        self.inner
            .read()
            .await
            .balances
            .get(address)
            .copied()
            .unwrap_or(Wei::ZERO)
    }
}

#[async_trait]
impl ValueTransfer for InMemoryWallets {
    async fn transfer(&self, to: &Address, amount: Wei) -> Result<()> {
        let mut wallets = self.inner.write().await;
        if wallets.rejecting.contains(to) {
            return Err(FaucetError::TransferFailed(
                TRANSFER_FAILED_MESSAGE.to_string(),
            ));
        }

        let balance = wallets.balances.entry(*to).or_default();
        *balance = balance.checked_add(amount)?;
        Ok(())
    }
}
