use std::{
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use alloy_primitives::{keccak256, Address, TxHash};

use crate::{ChainBackend, DeployError, Result, TxReceipt, UnsignedTx};

/// A transaction accepted by [`MockChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTx {
    /// Assigned hash
    pub hash: TxHash,
    /// The transaction as submitted
    pub tx: UnsignedTx,
    /// Block it was included in
    pub block_number: u64,
    /// Receipt status
    pub success: bool,
    /// Created contract, for creations
    pub contract_address: Option<Address>,
}

#[derive(Debug, Default)]
struct Faults {
    nonce_query_fails: bool,
    nonce_reads_before_failure: Option<usize>,
    reject_approvals: bool,
    reject_creations: bool,
    revert_approvals: bool,
    revert_creations: bool,
    confirmation_timeout: bool,
    interleave_after_approval: bool,
    wrong_contract_address: Option<Address>,
}

#[derive(Debug)]
struct State {
    nonce: u64,
    block_number: u64,
    nonce_reads: usize,
    submitted: Vec<SubmittedTx>,
    waits: Vec<(TxHash, u64)>,
}

/// An in-memory chain with a single deployer account.
///
/// Every accepted transaction is included in its own block immediately; waiting for deeper
/// confirmations mines empty blocks on top.
#[derive(Debug)]
pub struct MockChain {
    deployer: Address,
    chain_id: u64,
    faults: Faults,
    state: Mutex<State>,
}

impl MockChain {
    /// A chain where [`super::TEST_DEPLOYER`] has sent `nonce` transactions.
    pub fn new(nonce: u64) -> Self {
        Self::with_deployer(super::TEST_DEPLOYER, nonce)
    }

    /// A chain where `deployer` has sent `nonce` transactions.
    pub fn with_deployer(deployer: Address, nonce: u64) -> Self {
        Self {
            deployer,
            chain_id: super::TEST_CHAIN_ID,
            faults: Faults::default(),
            state: Mutex::new(State {
                nonce,
                block_number: 100,
                nonce_reads: 0,
                submitted: Vec::new(),
                waits: Vec::new(),
            }),
        }
    }

    /// Reports `chain_id` instead of the default.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Every nonce query fails.
    pub fn failing_nonce_query(mut self) -> Self {
        self.faults.nonce_query_fails = true;
        self
    }

    /// Nonce queries fail after `reads` successful ones.
    pub fn failing_nonce_query_after(mut self, reads: usize) -> Self {
        self.faults.nonce_reads_before_failure = Some(reads);
        self
    }

    /// Approval submissions are refused by the node.
    pub fn rejecting_approvals(mut self) -> Self {
        self.faults.reject_approvals = true;
        self
    }

    /// Creation submissions are refused by the node.
    pub fn rejecting_creations(mut self) -> Self {
        self.faults.reject_creations = true;
        self
    }

    /// Approvals are included but revert.
    pub fn reverting_approvals(mut self) -> Self {
        self.faults.revert_approvals = true;
        self
    }

    /// Creations are included but revert.
    pub fn reverting_creations(mut self) -> Self {
        self.faults.revert_creations = true;
        self
    }

    /// Confirmation waits never complete.
    pub fn timing_out_confirmations(mut self) -> Self {
        self.faults.confirmation_timeout = true;
        self
    }

    /// Another transaction from the deployer lands right after the approval.
    pub fn interleaving_after_approval(mut self) -> Self {
        self.faults.interleave_after_approval = true;
        self
    }

    /// Creation receipts report `address` as the created contract.
    pub fn reporting_contract_address(mut self, address: Address) -> Self {
        self.faults.wrong_contract_address = Some(address);
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The deployer's current nonce.
    pub fn nonce(&self) -> u64 {
        self.state().nonce
    }

    /// The current head block.
    pub fn block_number(&self) -> u64 {
        self.state().block_number
    }

    /// All accepted transactions, in submission order.
    pub fn submitted(&self) -> Vec<SubmittedTx> {
        self.state().submitted.clone()
    }

    /// Accepted message calls.
    pub fn calls(&self) -> Vec<SubmittedTx> {
        self.submitted().into_iter().filter(|s| !s.tx.is_create()).collect()
    }

    /// Accepted contract creations.
    pub fn creations(&self) -> Vec<SubmittedTx> {
        self.submitted().into_iter().filter(|s| s.tx.is_create()).collect()
    }

    /// Confirmation waits requested so far, as `(tx_hash, depth)`.
    pub fn waits(&self) -> Vec<(TxHash, u64)> {
        self.state().waits.clone()
    }

    fn include(&self, state: &mut State, tx: UnsignedTx) -> TxHash {
        let hash = keccak256([self.deployer.as_slice(), &tx.nonce.to_be_bytes(), &tx.input[..]].concat());
        let contract_address = tx
            .is_create()
            .then(|| self.faults.wrong_contract_address.unwrap_or_else(|| self.deployer.create(tx.nonce)));
        let success = if tx.is_create() {
            !self.faults.revert_creations
        } else {
            !self.faults.revert_approvals
        };

        state.block_number += 1;
        state.nonce += 1;
        state.submitted.push(SubmittedTx {
            hash,
            tx,
            block_number: state.block_number,
            success,
            contract_address,
        });
        hash
    }
}

impl ChainBackend for MockChain {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn transaction_count(&self) -> Result<u64> {
        let mut state = self.state();
        let exhausted =
            self.faults.nonce_reads_before_failure.is_some_and(|limit| state.nonce_reads >= limit);
        if self.faults.nonce_query_fails || exhausted {
            return Err(DeployError::Provider("connection refused".to_string()));
        }
        state.nonce_reads += 1;
        Ok(state.nonce)
    }

    async fn send_transaction(&self, tx: UnsignedTx) -> Result<TxHash> {
        let mut state = self.state();
        if tx.nonce != state.nonce {
            return Err(DeployError::TransactionRejected(format!(
                "nonce {} does not match account nonce {}",
                tx.nonce, state.nonce
            )));
        }
        if tx.is_create() && self.faults.reject_creations {
            return Err(DeployError::TransactionRejected("insufficient funds for gas".to_string()));
        }
        if !tx.is_create() && self.faults.reject_approvals {
            return Err(DeployError::TransactionRejected("insufficient funds for gas".to_string()));
        }

        let is_call = !tx.is_create();
        let hash = self.include(&mut state, tx);
        if is_call && self.faults.interleave_after_approval {
            let nonce = state.nonce;
            self.include(&mut state, UnsignedTx::call(self.deployer, Default::default(), nonce));
        }
        Ok(hash)
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
        _timeout: Duration,
    ) -> Result<TxReceipt> {
        let mut state = self.state();
        state.waits.push((tx_hash, confirmations));
        if self.faults.confirmation_timeout {
            return Err(DeployError::ConfirmationTimeout { tx_hash, confirmations });
        }

        let submitted = state
            .submitted
            .iter()
            .find(|s| s.hash == tx_hash)
            .cloned()
            .ok_or_else(|| DeployError::Provider(format!("unknown transaction {tx_hash}")))?;
        // Mine until the inclusion block is `confirmations` deep.
        let target = submitted.block_number + confirmations.saturating_sub(1);
        state.block_number = state.block_number.max(target);

        Ok(TxReceipt {
            tx_hash,
            block_number: Some(submitted.block_number),
            success: submitted.success,
            contract_address: submitted.contract_address,
        })
    }
}
