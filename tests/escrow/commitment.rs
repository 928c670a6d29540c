use crate::*;
use alloy::{
    primitives::{Address, B256, U256, keccak256},
    sol_types::SolCall,
};
use email_escrow::{
    config::keys,
    constants::MAX_UINT40,
    drivers::CommitmentEscrowDriver,
    error::{ConfigError, EscrowError, ValidationError},
    identifiers::derive_transfer_id,
    types::{
        CommitmentStatus, CommitmentTransfer, ICommitmentEscrow, IERC20, Submission,
        TransferRequest, U40, U96,
    },
};

fn request(email: &str, amount: &str) -> TransferRequest {
    TransferRequest::new(email, amount, TOKEN_DECIMALS)
}

#[tokio::test]
async fn transfer_id_is_recomputable() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);
    let expiry = now() + 600;

    let receipt =
        driver.create_transfer(request(" Alice@Example.com", "50").with_expiry(expiry)).await.unwrap();

    assert_eq!(receipt.amount, U96::from(50_000_000u64));
    assert_eq!(receipt.expiry, U40::from(expiry));
    assert_eq!(receipt.from, TREASURY);
    assert_eq!(receipt.token, TOKEN);
    assert!(matches!(receipt.submission, Submission::Submitted { .. }));

    // the recipient can recompute the id from nothing but the email, amount and expiry
    let mut packed = keccak256(SALT_VERSION).to_vec();
    packed.extend_from_slice(b"alice@example.com");
    let recipient_hash = keccak256(packed);
    assert_eq!(receipt.recipient_hash, recipient_hash);
    assert_eq!(
        receipt.transfer_id,
        derive_transfer_id(recipient_hash, U96::from(50_000_000u64), U40::from(expiry))
    );
    assert_eq!(
        driver.transfer_id("alice@example.com", receipt.amount, receipt.expiry),
        receipt.transfer_id
    );

    let state = driver.load_onchain_state(receipt.transfer_id).await.unwrap().unwrap();
    assert_eq!(state.status, CommitmentStatus::Created);
    assert_eq!(state.sender, TREASURY);
    assert_eq!(state.amount, receipt.amount);
    assert_eq!(state.recipient_hash, recipient_hash);
    assert_eq!(state.expiry, expiry);
}

#[tokio::test]
async fn create_without_signer_returns_unsigned_call() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(false);

    let receipt = driver.create_transfer(request("bob@example.com", "1.5")).await.unwrap();
    let call = receipt.submission.as_unsigned().unwrap();
    assert_eq!(call.to, COMMITMENT_ESCROW);
    assert_eq!(call.value, U256::ZERO);

    let decoded = ICommitmentEscrow::createTransferCall::abi_decode(&call.input).unwrap();
    assert_eq!(decoded.token, TOKEN);
    assert_eq!(decoded.from, TREASURY);
    assert_eq!(decoded.amount, U96::from(1_500_000u64));
    assert_eq!(decoded.recipientHash, receipt.recipient_hash);
    assert_eq!(decoded.expiry, receipt.expiry);
    assert!(!decoded.permit.enabled);

    // default expiry is the configured window from now
    let expiry = receipt.expiry.to::<u64>();
    assert!(expiry > now() && expiry <= now() + 3_600);
    assert_eq!(chain.network_calls(), 0);
}

#[tokio::test]
async fn request_overrides_token_and_funding_wallet() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(false);
    let token = Address::repeat_byte(0x99);
    let wallet = Address::repeat_byte(0x98);

    let receipt = driver
        .create_transfer(request("bob@example.com", "1").with_token(token).with_funding_wallet(wallet))
        .await
        .unwrap();
    assert_eq!(receipt.token, token);
    assert_eq!(receipt.from, wallet);
}

#[tokio::test]
async fn invalid_requests_fail_before_any_network_call() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);

    let err = driver.create_transfer(request("a@b.c", "0")).await.unwrap_err();
    assert!(matches!(err, EscrowError::Validation(ValidationError::AmountOutOfRange(_))));

    let err = driver.create_transfer(request("a@b.c", "1.0000001")).await.unwrap_err();
    assert!(matches!(err, EscrowError::Validation(ValidationError::InvalidAmount { .. })));

    let err = driver.create_transfer(request("a@b.c", "1e6")).await.unwrap_err();
    assert!(matches!(err, EscrowError::Validation(ValidationError::InvalidAmount { .. })));

    let err = driver
        .create_transfer(request("a@b.c", "79228162514264337593543.950336"))
        .await
        .unwrap_err();
    assert!(matches!(err, EscrowError::Validation(ValidationError::AmountOutOfRange(_))));

    let err = driver.create_transfer(request("a@b.c", "1").with_expiry(now() - 1)).await.unwrap_err();
    assert!(matches!(err, EscrowError::Validation(ValidationError::ExpiryInPast { .. })));

    let err =
        driver.create_transfer(request("a@b.c", "1").with_expiry(MAX_UINT40 + 1)).await.unwrap_err();
    assert!(matches!(err, EscrowError::Validation(ValidationError::ExpiryOutOfRange(_))));
    assert!(err.is_local());

    assert_eq!(chain.network_calls(), 0);
}

#[tokio::test]
async fn missing_addresses_are_reported() {
    let chain = MockChain::new();

    let mut config = config();
    config.commitment_escrow = None;
    let driver = CommitmentEscrowDriver::new(&config, chain.clients(true));
    let err = driver.create_transfer(request("a@b.c", "1")).await.unwrap_err();
    assert!(matches!(
        err,
        EscrowError::Config(ConfigError::MissingConfiguration(keys::COMMITMENT_ESCROW))
    ));
    let err = driver.load_onchain_state(B256::ZERO).await.unwrap_err();
    assert!(matches!(err, EscrowError::Config(ConfigError::MissingConfiguration(_))));

    let mut config = crate::config();
    config.treasury = None;
    let driver = CommitmentEscrowDriver::new(&config, chain.clients(true));
    let err = driver.create_transfer(request("a@b.c", "1")).await.unwrap_err();
    assert!(matches!(err, EscrowError::Config(ConfigError::MissingConfiguration(keys::TREASURY))));

    assert_eq!(chain.network_calls(), 0);

    // an explicit funding wallet stands in for the treasury
    driver
        .create_transfer(request("a@b.c", "1").with_funding_wallet(Address::repeat_byte(5)))
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_creation_is_rejected() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);
    let req = request("carol@example.com", "10").with_expiry(now() + 600);

    let first = driver.create_transfer(req.clone()).await.unwrap();
    let err = driver.create_transfer(req).await.unwrap_err();

    let EscrowError::OnchainRejection(revert) = &err else { panic!("unexpected error: {err}") };
    assert!(revert.is_already_exists());
    assert!(revert.decoded_error().unwrap().contains("TransferAlreadyExists"));
    assert!(!err.is_ambiguous());

    let state = driver.load_onchain_state(first.transfer_id).await.unwrap().unwrap();
    assert_eq!(state.status, CommitmentStatus::Created);
}

#[tokio::test]
async fn unknown_transfer_is_not_found() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);
    let id = B256::repeat_byte(0xee);

    assert_eq!(driver.load_onchain_state(id).await.unwrap(), None);

    let err = driver.claim_transfer(id, RECIPIENT, "a@b.c").await.unwrap_err();
    assert!(matches!(err, EscrowError::TransferNotFound(missing) if missing == id));

    let err = driver.refund_transfer(id, TREASURY).await.unwrap_err();
    assert!(matches!(err, EscrowError::TransferNotFound(_)));

    let err = driver.verify_recipient(id, "a@b.c").await.unwrap_err();
    assert!(matches!(err, EscrowError::TransferNotFound(_)));

    assert!(chain.submissions().is_empty());
}

#[tokio::test]
async fn claim_and_refund_require_a_signer() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(false);
    let id = B256::repeat_byte(1);

    let err = driver.claim_transfer(id, RECIPIENT, "a@b.c").await.unwrap_err();
    assert!(matches!(err, EscrowError::SignerNotConfigured));

    let err = driver.refund_transfer(id, TREASURY).await.unwrap_err();
    assert!(matches!(err, EscrowError::SignerNotConfigured));

    assert_eq!(chain.network_calls(), 0);
}

#[tokio::test]
async fn claim_releases_to_recipient() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);
    let receipt = driver.create_transfer(request("dave@example.com", "25")).await.unwrap();
    let id = receipt.transfer_id;

    assert!(driver.verify_recipient(id, "DAVE@example.com ").await.unwrap());
    assert!(!driver.verify_recipient(id, "eve@example.com").await.unwrap());

    let err = driver.claim_transfer(id, RECIPIENT, "eve@example.com").await.unwrap_err();
    assert!(matches!(err, EscrowError::RecipientMismatch(_)));
    assert_eq!(chain.submissions().len(), 1);

    let claim = driver.claim_transfer(id, RECIPIENT, " Dave@Example.com").await.unwrap();
    assert_eq!(claim.transfer_id, id);
    assert_eq!(claim.recipient, RECIPIENT);

    let call = ICommitmentEscrow::claimCall::abi_decode(&chain.submissions()[1].input).unwrap();
    assert_eq!(call.transferId, id);
    assert_eq!(call.recipient, RECIPIENT);
    assert_eq!(call.recipientHash, receipt.recipient_hash);

    let state = driver.load_onchain_state(id).await.unwrap().unwrap();
    assert_eq!(state.status, CommitmentStatus::Claimed);

    let err = driver.claim_transfer(id, RECIPIENT, "dave@example.com").await.unwrap_err();
    assert!(matches!(err, EscrowError::TransferNotOpen { ref status, .. } if status == "claimed"));
    let err = driver.refund_transfer(id, TREASURY).await.unwrap_err();
    assert!(matches!(err, EscrowError::TransferNotOpen { .. }));
}

#[tokio::test]
async fn refund_returns_funds() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);
    let id = driver.create_transfer(request("frank@example.com", "3")).await.unwrap().transfer_id;

    let refund = driver.refund_transfer(id, TREASURY).await.unwrap();
    assert_eq!(refund.transfer_id, id);

    let call = ICommitmentEscrow::refundCall::abi_decode(&chain.submissions()[1].input).unwrap();
    assert_eq!(call.refundTo, TREASURY);

    let state = driver.load_onchain_state(id).await.unwrap().unwrap();
    assert_eq!(state.status, CommitmentStatus::Refunded);
}

#[tokio::test]
async fn expired_transfer_can_only_be_refunded() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);
    let recipient_hash = driver.recipient_hash("grace@example.com");
    let id = B256::repeat_byte(0x42);
    chain.insert_commitment(
        id,
        CommitmentTransfer {
            sender: TREASURY,
            token: TOKEN,
            amount: U96::from(1_000u64),
            recipientHash: recipient_hash,
            expiry: U40::from(now() - 60),
            status: CommitmentStatus::CREATED,
        },
    );

    let state = driver.load_onchain_state(id).await.unwrap().unwrap();
    assert_eq!(state.status, CommitmentStatus::Expired);

    let err = driver.claim_transfer(id, RECIPIENT, "grace@example.com").await.unwrap_err();
    assert!(matches!(err, EscrowError::TransferNotOpen { ref status, .. } if status == "expired"));

    driver.refund_transfer(id, TREASURY).await.unwrap();
    let state = driver.load_onchain_state(id).await.unwrap().unwrap();
    assert_eq!(state.status, CommitmentStatus::Refunded);
}

#[tokio::test]
async fn unknown_status_code_is_an_error() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);
    let id = B256::repeat_byte(0x43);
    chain.insert_commitment(
        id,
        CommitmentTransfer {
            sender: TREASURY,
            amount: U96::from(1u64),
            status: 7,
            ..Default::default()
        },
    );

    let err = driver.load_onchain_state(id).await.unwrap_err();
    assert!(matches!(err, EscrowError::UnrecognizedStatus(7)));
}

#[tokio::test]
async fn lost_receipt_is_ambiguous() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(true);
    let id = driver.create_transfer(request("heidi@example.com", "2")).await.unwrap().transfer_id;

    chain.drop_next_receipt();
    let err = driver.claim_transfer(id, RECIPIENT, "heidi@example.com").await.unwrap_err();
    assert!(err.is_ambiguous());
    assert!(matches!(err, EscrowError::TransportFailure { tx_hash: Some(_), .. }));

    // the claim landed regardless; a state read settles it before any retry
    let state = driver.load_onchain_state(id).await.unwrap().unwrap();
    assert_eq!(state.status, CommitmentStatus::Claimed);
}

#[tokio::test]
async fn approval_targets_the_escrow() {
    let chain = MockChain::new();
    let driver = chain.commitment_driver(false);

    let call = driver.approval_call(None, U96::from(5_000_000u64)).unwrap();
    assert_eq!(call.to, TOKEN);
    let approve = IERC20::approveCall::abi_decode(&call.input).unwrap();
    assert_eq!(approve.spender, COMMITMENT_ESCROW);
    assert_eq!(approve.amount, U256::from(5_000_000u64));

    assert_eq!(driver.reader().token_decimals(TOKEN).await.unwrap(), TOKEN_DECIMALS);
}
