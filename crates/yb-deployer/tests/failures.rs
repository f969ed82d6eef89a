//! Failure handling: every error aborts the run at the step it occurred in, and nothing already
//! submitted is reverted.

use alloy_primitives::{address, Address};
use yb_deployer::{
    network::{BLAST, BLAST_POINTS_MAINNET, WETH},
    predict,
    test_utils::{test_factory, MockChain, TEST_DEPLOYER},
    ConstructorArgs, ContractVersion, DeployError, DeploymentConfig, DeploymentSequencer,
    SequenceError, Step,
};

fn deferred_config() -> DeploymentConfig {
    DeploymentConfig::new(ConstructorArgs::V1 { token: WETH, chain_native: BLAST }).with_approval(WETH)
}

async fn run(chain: MockChain, config: &DeploymentConfig) -> (SequenceError, MockChain) {
    let sequencer = DeploymentSequencer::new(chain, test_factory());
    let err = sequencer.deploy(config).await.unwrap_err();
    (err, sequencer.into_backend())
}

#[tokio::test]
async fn test_nonce_query_failure_submits_nothing() {
    let (err, chain) = run(MockChain::new(5).failing_nonce_query(), &deferred_config()).await;

    assert_eq!(err.step, Step::Start);
    assert!(matches!(err.kind(), DeployError::Provider(_)));
    assert!(chain.submitted().is_empty());
    assert!(chain.waits().is_empty());
}

#[tokio::test]
async fn test_wrong_arity_rejected_before_submission() {
    let err = ConstructorArgs::from_ordered(ContractVersion::V1, &[WETH, BLAST, BLAST_POINTS_MAINNET])
        .unwrap_err();
    assert!(matches!(err, DeployError::Configuration(_)));

    let err = ConstructorArgs::from_ordered(ContractVersion::V2, &[WETH, BLAST]).unwrap_err();
    assert!(matches!(err, DeployError::Configuration(_)));

    // A malformed configuration never reaches the chain either.
    let config = DeploymentConfig::new(ConstructorArgs::V2 {
        token: WETH,
        chain_native: BLAST,
        points: BLAST_POINTS_MAINNET,
        points_operator: Address::ZERO,
    })
    .with_approval(WETH);
    let (err, chain) = run(MockChain::new(5), &config).await;
    assert_eq!(err.step, Step::Start);
    assert!(matches!(err.kind(), DeployError::Configuration(_)));
    assert!(chain.submitted().is_empty());
}

#[tokio::test]
async fn test_chain_id_mismatch() {
    let (err, chain) =
        run(MockChain::new(0).with_chain_id(1), &deferred_config().with_expected_chain_id(81457))
            .await;

    assert_eq!(err.step, Step::Start);
    assert!(matches!(err.kind(), DeployError::Configuration(_)));
    assert!(chain.submitted().is_empty());
}

#[tokio::test]
async fn test_rejected_approval_stops_before_creation() {
    let (err, chain) = run(MockChain::new(5).rejecting_approvals(), &deferred_config()).await;

    assert_eq!(err.step, Step::Approve);
    assert!(matches!(err.kind(), DeployError::TransactionRejected(_)));
    assert!(chain.submitted().is_empty());
    assert_eq!(err.to_string(), "approve failed: transaction rejected: insufficient funds for gas");
}

#[tokio::test]
async fn test_reverted_approval_stops_before_creation() {
    let (err, chain) = run(MockChain::new(5).reverting_approvals(), &deferred_config()).await;

    assert_eq!(err.step, Step::Approve);
    assert!(matches!(err.kind(), DeployError::TransactionRejected(_)));
    assert_eq!(chain.calls().len(), 1);
    assert!(chain.creations().is_empty());
}

#[tokio::test]
async fn test_interleaved_transaction_is_a_nonce_mismatch() {
    let (err, chain) = run(MockChain::new(5).interleaving_after_approval(), &deferred_config()).await;

    assert_eq!(err.step, Step::Deploy);
    assert!(matches!(err.kind(), DeployError::NonceMismatch { expected: 6, actual: 7 }));
    // The approval stays on-chain; no creation is attempted at a nonce that would miss it.
    assert_eq!(chain.calls()[0].tx.to, Some(WETH));
    assert!(chain.creations().is_empty());
}

#[tokio::test]
async fn test_nonce_recheck_failure() {
    let (err, chain) =
        run(MockChain::new(5).failing_nonce_query_after(1), &deferred_config()).await;

    assert_eq!(err.step, Step::Deploy);
    assert!(matches!(err.kind(), DeployError::Provider(_)));
    assert_eq!(chain.calls().len(), 1);
    assert!(chain.creations().is_empty());
}

#[tokio::test]
async fn test_rejected_creation() {
    let (err, chain) = run(MockChain::new(5).rejecting_creations(), &deferred_config()).await;

    assert_eq!(err.step, Step::Deploy);
    assert!(matches!(err.kind(), DeployError::TransactionRejected(_)));
    assert_eq!(chain.calls().len(), 1);
    assert!(chain.creations().is_empty());
}

#[tokio::test]
async fn test_confirmation_timeout_keeps_transaction() {
    let config = DeploymentConfig::new(ConstructorArgs::V1 { token: WETH, chain_native: BLAST });
    let (err, chain) = run(MockChain::new(5).timing_out_confirmations(), &config).await;

    assert_eq!(err.step, Step::AwaitConfirmation);
    let creation = &chain.creations()[0];
    match err.kind() {
        DeployError::ConfirmationTimeout { tx_hash, confirmations } => {
            assert_eq!(*tx_hash, creation.hash);
            assert_eq!(*confirmations, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_reverted_creation() {
    let (err, chain) = run(MockChain::new(5).reverting_creations(), &deferred_config()).await;

    assert_eq!(err.step, Step::AwaitConfirmation);
    assert!(matches!(err.kind(), DeployError::TransactionRejected(_)));
    assert_eq!(chain.creations().len(), 1);
}

#[tokio::test]
async fn test_unexpected_contract_address() {
    let elsewhere = address!("00000000000000000000000000000000deadbeef");
    let (err, _) =
        run(MockChain::new(5).reporting_contract_address(elsewhere), &deferred_config()).await;

    assert_eq!(err.step, Step::AwaitConfirmation);
    match err.kind() {
        DeployError::AddressMismatch { predicted, actual } => {
            assert_eq!(*predicted, predict(TEST_DEPLOYER, 6));
            assert_eq!(*actual, elsewhere);
        }
        other => panic!("unexpected error: {other}"),
    }
}
