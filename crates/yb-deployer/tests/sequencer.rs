//! End-to-end runs of the deployment sequencer against an in-memory chain.

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolCall;
use rstest::rstest;
use yb_deployer::{
    network::{Network, BLAST, BLAST_POINTS_SEPOLIA, USDB, WETH},
    predict,
    test_utils::{test_factory, MockChain, TEST_CHAIN_ID, TEST_DEPLOYER, TEST_BYTECODE},
    ApprovalAmount, ConstructorArgs, ContractVersion, DeploymentConfig, DeploymentSequencer,
    PredictionMode, IERC20,
};

const OPERATOR: Address = address!("00000000000000000000000000000000000000aa");

fn v1_args(token: Address) -> ConstructorArgs {
    ConstructorArgs::V1 { token, chain_native: BLAST }
}

fn sequencer(chain: MockChain) -> DeploymentSequencer<MockChain> {
    DeploymentSequencer::new(chain, test_factory())
}

#[tokio::test]
async fn test_deferred_mode_approves_next_nonce() {
    let sequencer = sequencer(MockChain::new(5));
    let config = DeploymentConfig::new(v1_args(WETH)).with_approval(WETH);

    let instance = sequencer.deploy(&config).await.unwrap();

    let expected = predict(TEST_DEPLOYER, 6);
    assert_eq!(instance.address, expected);
    assert_eq!(instance.prediction.mode, PredictionMode::Deferred);
    assert_eq!(instance.prediction.current_nonce, 5);
    assert_eq!(instance.prediction.creation_nonce, 6);

    let chain = sequencer.backend();
    let calls = chain.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tx.to, Some(WETH));
    assert_eq!(calls[0].tx.nonce, 5);
    let approve = IERC20::approveCall::abi_decode(&calls[0].tx.input, true).unwrap();
    assert_eq!(approve.spender, expected);
    assert_eq!(approve.amount, U256::MAX);

    let creations = chain.creations();
    assert_eq!(creations.len(), 1);
    assert_eq!(creations[0].tx.nonce, 6);
    assert_eq!(creations[0].contract_address, Some(expected));

    let approval = instance.approval.unwrap();
    assert_eq!(approval.spender, expected);
    assert_eq!(approval.tx_hash, calls[0].hash);
    assert_eq!(chain.nonce(), 7);
}

#[tokio::test]
async fn test_immediate_mode_uses_current_nonce() {
    let sequencer = sequencer(MockChain::new(5));
    let config = DeploymentConfig::new(v1_args(USDB));

    let instance = sequencer.deploy(&config).await.unwrap();

    assert_eq!(instance.address, predict(TEST_DEPLOYER, 5));
    assert_eq!(instance.prediction.mode, PredictionMode::Immediate);
    assert!(instance.approval.is_none());

    let chain = sequencer.backend();
    assert!(chain.calls().is_empty());
    assert_eq!(chain.creations().len(), 1);
    assert_eq!(chain.creations()[0].tx.nonce, 5);
}

#[tokio::test]
async fn test_returns_after_single_confirmation() {
    let chain = MockChain::new(5);
    let head = chain.block_number();
    let sequencer = sequencer(chain);
    let config = DeploymentConfig::new(v1_args(WETH)).with_approval(WETH);

    let instance = sequencer.deploy(&config).await.unwrap();

    let chain = sequencer.backend();
    let creation = &chain.creations()[0];
    assert_eq!(instance.confirmations, 1);
    assert_eq!(instance.tx_hash, creation.hash);
    assert_eq!(instance.block_number, Some(head + 2));
    // Approval, then creation, each awaited to depth one.
    assert_eq!(chain.waits(), vec![(chain.calls()[0].hash, 1), (creation.hash, 1)]);
    assert_eq!(chain.block_number(), head + 2);
}

#[rstest]
#[case::shallow(1)]
#[case::default_finality(3)]
#[case::deep(12)]
#[tokio::test]
async fn test_waits_for_configured_depth(#[case] confirmations: u64) {
    let sequencer = sequencer(MockChain::new(0));
    let config = DeploymentConfig::new(v1_args(WETH)).with_confirmations(confirmations);

    let instance = sequencer.deploy(&config).await.unwrap();

    let chain = sequencer.backend();
    let included = instance.block_number.unwrap();
    assert_eq!(chain.waits(), vec![(instance.tx_hash, confirmations)]);
    assert_eq!(chain.block_number(), included + confirmations - 1);
    assert_eq!(instance.confirmations, confirmations);
}

#[tokio::test]
async fn test_repeated_runs_deploy_distinct_instances() {
    let sequencer = sequencer(MockChain::new(5));
    let config = DeploymentConfig::new(v1_args(WETH)).with_approval(WETH);

    let first = sequencer.deploy(&config).await.unwrap();
    let second = sequencer.deploy(&config).await.unwrap();

    assert_ne!(first.address, second.address);
    assert_eq!(first.address, predict(TEST_DEPLOYER, 6));
    assert_eq!(second.address, predict(TEST_DEPLOYER, 8));
    assert_eq!(sequencer.backend().creations().len(), 2);
}

#[rstest]
#[case::without_approval(None, 9)]
#[case::with_approval(Some(WETH), 10)]
#[tokio::test]
async fn test_predict_submits_nothing(#[case] token: Option<Address>, #[case] creation_nonce: u64) {
    let sequencer = sequencer(MockChain::new(9));
    let mut config = DeploymentConfig::new(v1_args(WETH));
    if let Some(token) = token {
        config = config.with_approval(token);
    }

    let prediction = sequencer.predict(&config).await.unwrap();
    assert_eq!(prediction.creation_nonce, creation_nonce);
    assert_eq!(prediction.address, predict(TEST_DEPLOYER, creation_nonce));

    // Predicting twice from unchanged chain state gives the same answer.
    assert_eq!(sequencer.predict(&config).await.unwrap(), prediction);
    assert!(sequencer.backend().submitted().is_empty());

    // A real run lands exactly where the dry run said it would.
    let instance = sequencer.deploy(&config).await.unwrap();
    assert_eq!(instance.address, prediction.address);
}

#[tokio::test]
async fn test_v2_constructor_arguments_in_init_code() {
    let args = ConstructorArgs::from_ordered(
        ContractVersion::V2,
        &[WETH, BLAST, BLAST_POINTS_SEPOLIA, OPERATOR],
    )
    .unwrap();
    let sequencer = sequencer(MockChain::new(0));
    let config = DeploymentConfig::new(args).with_approval(WETH);

    let instance = sequencer.deploy(&config).await.unwrap();
    assert_eq!(instance.version, ContractVersion::V2);

    let creation = &sequencer.backend().creations()[0];
    let (code, params) = creation.tx.input.split_at(TEST_BYTECODE.len());
    assert_eq!(code, &TEST_BYTECODE[..]);
    assert_eq!(params.len(), 4 * 32);
    for (idx, addr) in [WETH, BLAST, BLAST_POINTS_SEPOLIA, OPERATOR].iter().enumerate() {
        assert_eq!(&params[idx * 32 + 12..(idx + 1) * 32], addr.as_slice());
    }
}

#[tokio::test]
async fn test_limited_approval_amount() {
    let ceiling = U256::from(1_000_000_000_000_000_000u128);
    let sequencer = sequencer(MockChain::new(2));
    let config = DeploymentConfig::new(v1_args(USDB))
        .with_limited_approval(USDB, ApprovalAmount::Limited(ceiling));

    let instance = sequencer.deploy(&config).await.unwrap();

    let approve =
        IERC20::approveCall::abi_decode(&sequencer.backend().calls()[0].tx.input, true).unwrap();
    assert_eq!(approve.amount, ceiling);
    assert_eq!(instance.approval.unwrap().amount, ceiling);
}

#[tokio::test]
async fn test_pinned_chain_id_accepted() {
    let sequencer = sequencer(MockChain::new(0));
    let config = DeploymentConfig::new(v1_args(WETH))
        .with_expected_chain_id(Network::BlastSepolia.chain_id());
    assert_eq!(Network::BlastSepolia.chain_id(), TEST_CHAIN_ID);

    assert!(sequencer.deploy(&config).await.is_ok());
}
