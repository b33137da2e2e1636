//! End-to-end scenarios against the public API

use token_ledger::{spawn_token_actor, Address, Amount, Config, Error, Event, Metrics, Operation, Token};

const OWNER: Address = Address::from_low_u64(0xA1);
const FROM: Address = Address::from_low_u64(0xB2);
const TO: Address = Address::from_low_u64(0xC3);
const SPENDER: Address = Address::from_low_u64(0xD4);

fn amount(n: u64) -> Amount {
    Amount::from(n)
}

fn create_test_token() -> Token {
    Token::new(OWNER, &Config::default()).unwrap()
}

#[test]
fn scenario_mint_to_owner() {
    let mut token = create_test_token();

    let events = token.mint(&OWNER, OWNER, amount(100)).unwrap();

    assert_eq!(token.balance_of(&OWNER), amount(100));
    assert_eq!(token.total_supply(), amount(100));
    assert_eq!(
        events,
        vec![
            Event::Mint { to: OWNER, amount: amount(100) },
            Event::Transfer { from: Address::ZERO, to: OWNER, value: amount(100) },
        ]
    );
}

#[test]
fn scenario_transfer_whole_balance() {
    let mut token = create_test_token();
    token.mint(&OWNER, FROM, amount(100)).unwrap();

    let events = token.transfer(&FROM, TO, amount(100)).unwrap();

    assert_eq!(token.balance_of(&TO), amount(100));
    assert_eq!(token.balance_of(&FROM), Amount::zero());
    assert_eq!(
        events,
        vec![Event::Transfer { from: FROM, to: TO, value: amount(100) }]
    );
}

#[test]
fn scenario_delegated_transfer() {
    let mut token = create_test_token();
    token.mint(&OWNER, OWNER, amount(100)).unwrap();
    token.approve(&OWNER, SPENDER, amount(100)).unwrap();

    let events = token.transfer_from(&SPENDER, OWNER, TO, amount(100)).unwrap();

    assert_eq!(token.balance_of(&OWNER), Amount::zero());
    assert_eq!(token.balance_of(&TO), amount(100));
    assert_eq!(token.allowance(&OWNER, &SPENDER), Amount::zero());
    assert_eq!(
        events,
        vec![Event::Transfer { from: OWNER, to: TO, value: amount(100) }]
    );
}

#[test]
fn scenario_delegated_transfer_over_allowance() {
    let mut token = create_test_token();
    token.mint(&OWNER, OWNER, amount(100)).unwrap();
    token.approve(&OWNER, SPENDER, amount(50)).unwrap();
    let before = token.snapshot();

    let result = token.transfer_from(&SPENDER, OWNER, TO, amount(100));

    assert_eq!(result, Err(Error::InsufficientAllowance));
    assert_eq!(token.snapshot(), before);
    assert_eq!(token.allowance(&OWNER, &SPENDER), amount(50));
}

#[test]
fn scenario_pause_and_resume_minting() {
    let mut token = create_test_token();
    token.stop(&OWNER).unwrap();

    assert_eq!(token.mint(&OWNER, TO, amount(10)), Err(Error::Paused));
    assert_eq!(token.total_supply(), Amount::zero());

    token.start(&OWNER).unwrap();
    token.mint(&OWNER, TO, amount(10)).unwrap();
    assert_eq!(token.balance_of(&TO), amount(10));
}

#[test]
fn scenario_ownership_to_null_address() {
    let mut token = create_test_token();

    assert_eq!(
        token.transfer_ownership(&OWNER, Address::ZERO),
        Err(Error::InvalidAddress)
    );
    assert_eq!(token.owner(), OWNER);
}

#[test]
fn scenario_finish_minting_blocks_every_agent() {
    let mut token = create_test_token();
    token.set_mint_agent(&OWNER, FROM, true).unwrap();
    token.mint(&FROM, TO, amount(5)).unwrap();
    token.finish_minting(&OWNER).unwrap();

    assert_eq!(token.mint(&FROM, TO, amount(1)), Err(Error::MintingFinished));
    assert_eq!(token.mint(&OWNER, TO, amount(1)), Err(Error::MintingFinished));

    // Transfers and burns keep working
    token.transfer(&TO, FROM, amount(2)).unwrap();
    token.burn(&FROM, amount(2)).unwrap();
    assert_eq!(token.total_supply(), amount(3));
}

#[test]
fn scenario_capped_supply() {
    let mut config = Config::default();
    config.token.cap = Some("1000000000000000000000000000".to_string());
    let mut token = Token::new(OWNER, &config).unwrap();
    let cap = token.cap().unwrap();

    token.mint(&OWNER, TO, cap).unwrap();
    assert_eq!(token.mint(&OWNER, TO, amount(1)), Err(Error::CapExceeded));

    // Burned supply can be minted again
    token.burn(&TO, amount(1)).unwrap();
    token.mint(&OWNER, TO, amount(1)).unwrap();
    assert_eq!(token.total_supply(), cap);
}

#[test]
fn scenario_delegated_burn() {
    let mut token = create_test_token();
    token.mint(&OWNER, FROM, amount(100)).unwrap();
    token.increase_allowance(&FROM, SPENDER, amount(30)).unwrap();
    token.increase_allowance(&FROM, SPENDER, amount(30)).unwrap();
    token.decrease_allowance(&FROM, SPENDER, amount(20)).unwrap();

    let events = token.burn_from(&SPENDER, FROM, amount(40)).unwrap();

    assert_eq!(events, vec![Event::Burn { from: FROM, amount: amount(40) }]);
    assert_eq!(token.balance_of(&FROM), amount(60));
    assert_eq!(token.total_supply(), amount(60));
    assert_eq!(token.allowance(&FROM, &SPENDER), Amount::zero());
}

#[test]
fn scenario_snapshot_file_restore_and_continue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odx.snapshot");

    let mut token = create_test_token();
    token.mint(&OWNER, FROM, amount(500)).unwrap();
    token.approve(&FROM, SPENDER, amount(200)).unwrap();
    token.snapshot().write_to(&path).unwrap();

    let snapshot = token_ledger::Snapshot::read_from(&path).unwrap();
    let mut restored = Token::from_snapshot(snapshot, true).unwrap();

    restored.transfer_from(&SPENDER, FROM, TO, amount(200)).unwrap();
    assert_eq!(restored.balance_of(&TO), amount(200));
    assert_eq!(restored.allowance(&FROM, &SPENDER), Amount::zero());
    restored.check_invariants().unwrap();
}

#[tokio::test]
async fn scenario_actor_hosted_token() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let config = Config::default();
    let metrics = Metrics::new().unwrap();
    let token = Token::new(OWNER, &config).unwrap();
    let (handle, task) = spawn_token_actor(token, config.actor.mailbox_capacity, Some(metrics.clone()));

    handle
        .execute(OWNER, Operation::Mint { to: FROM, amount: amount(100) })
        .await
        .unwrap();
    handle
        .execute(FROM, Operation::Approve { spender: SPENDER, amount: amount(60) })
        .await
        .unwrap();

    let result = handle
        .execute(SPENDER, Operation::TransferFrom { from: FROM, to: TO, amount: amount(61) })
        .await;
    assert_eq!(result, Err(Error::InsufficientAllowance));

    handle
        .execute(SPENDER, Operation::TransferFrom { from: FROM, to: TO, amount: amount(60) })
        .await
        .unwrap();

    assert_eq!(handle.balance_of(TO).await.unwrap(), amount(60));
    assert_eq!(handle.allowance(FROM, SPENDER).await.unwrap(), Amount::zero());
    assert_eq!(metrics.records.get(), 4);
    assert_eq!(
        metrics
            .rejected
            .with_label_values(&["transfer_from", "insufficient_allowance"])
            .get(),
        1
    );

    handle.shutdown().await.unwrap();
    let token = task.await.unwrap();
    assert_eq!(token.journal().unwrap().len(), 3);
    token.journal().unwrap().verify().unwrap();
}
