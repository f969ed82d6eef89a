//! Bindings for the contracts the sequencer talks to.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::{predict, ChainBackend, ConstructorArgs, DeployError, Result, TxHash, UnsignedTx};

sol! {
    /// The subset of ERC20 the sequencer calls.
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// Builds the `approve(spender, amount)` transaction against `token`.
pub fn approve_tx(token: Address, spender: Address, amount: U256, nonce: u64) -> UnsignedTx {
    let input = IERC20::approveCall { spender, amount }.abi_encode();
    UnsignedTx::call(token, input.into(), nonce)
}

/// Creation-code holder for a wrapper contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractFactory {
    bytecode: Bytes,
}

impl ContractFactory {
    /// Creates a factory from compiled creation bytecode.
    pub fn new(bytecode: Bytes) -> Result<Self> {
        if bytecode.is_empty() {
            return Err(DeployError::config("contract bytecode is empty"));
        }
        Ok(Self { bytecode })
    }

    /// The creation bytecode without constructor arguments.
    pub const fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    /// Address a creation from `deployer` at `nonce` will produce.
    pub fn compute_address(&self, deployer: Address, nonce: u64) -> Address {
        predict(deployer, nonce)
    }

    /// Init code with the ABI-encoded constructor arguments appended.
    pub fn init_code(&self, args: &ConstructorArgs) -> Bytes {
        let encoded = args.abi_encode();
        let mut code = Vec::with_capacity(self.bytecode.len() + encoded.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&encoded);
        code.into()
    }

    /// Submits the creation transaction at `nonce` and returns the address it will occupy
    /// alongside the transaction hash.
    pub async fn deploy<B: ChainBackend>(
        &self,
        backend: &B,
        args: &ConstructorArgs,
        nonce: u64,
    ) -> Result<(Address, TxHash)> {
        let address = self.compute_address(backend.deployer(), nonce);
        let tx_hash = backend.send_transaction(UnsignedTx::create(self.init_code(args), nonce)).await?;
        Ok((address, tx_hash))
    }
}
