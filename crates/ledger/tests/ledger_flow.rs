use std::sync::Arc;

use accum::RollupState;
use attest::TranscriptBackend;
use ledger::{Ledger, LedgerError, LedgerUpdate};
use pcd::{BatchError, BatchProcessor, ChainHead};
use primitives::{Message, MessageDetails};

type Head = ChainHead<attest::Attestation>;

fn setup() -> (BatchProcessor<TranscriptBackend>, Ledger<TranscriptBackend>) {
    let processor = BatchProcessor::new(TranscriptBackend::with_key([4u8; 32]));
    let ledger = Ledger::in_memory(processor.clone());
    ledger.init_state().unwrap();
    (processor, ledger)
}

fn valid(seq: u64) -> Message {
    Message::new(seq, MessageDetails::with_checksum(17, 420, 9000).unwrap())
}

fn with_details(seq: u64, id: u64, x: u64, y: u64) -> Message {
    Message::new(seq, MessageDetails::with_checksum(id, x, y).unwrap())
}

fn advance(p: &BatchProcessor<TranscriptBackend>, head: &Head, m: Message) -> Head {
    p.advance(head, &m).unwrap()
}

#[test]
fn starts_at_zero_and_initializes_once() {
    let (_, ledger) = setup();
    assert_eq!(ledger.max_message_number().unwrap(), 0);
    assert_eq!(ledger.init_state(), Err(LedgerError::AlreadyInitialized));
}

#[test]
fn uninitialized_ledger_refuses_updates() {
    let processor = BatchProcessor::new(TranscriptBackend::new());
    let ledger = Ledger::in_memory(processor.clone());
    assert_eq!(ledger.max_message_number(), Err(LedgerError::NotInitialized));
    let head = processor.genesis().unwrap();
    assert_eq!(ledger.update(&head.proof), Err(LedgerError::NotInitialized));
}

#[test]
fn genesis_proof_is_accepted_without_change() {
    let (p, ledger) = setup();
    let head = p.genesis().unwrap();
    let up = ledger.update(&head.proof).unwrap();
    assert_eq!(up, LedgerUpdate { previous: 0, current: 0 });
    assert!(!up.advanced());
}

#[test]
fn message_stream_updates_counter() {
    let (p, ledger) = setup();
    let mut head = p.genesis().unwrap();

    // valid message 1
    head = advance(&p, &head, valid(1));
    assert!(ledger.update(&head.proof).unwrap().advanced());
    assert_eq!(ledger.max_message_number().unwrap(), 1);

    // stale number, then out-of-range id/x/y and equal coordinates
    let rejected = [
        valid(0),
        with_details(2, 3001, 420, 9000),
        with_details(2, 17, 15_001, 16_000),
        with_details(2, 17, 420, 20_001),
        with_details(2, 17, 9000, 9000),
    ];
    for m in rejected {
        head = advance(&p, &head, m);
        let up = ledger.update(&head.proof).unwrap();
        assert_eq!(up, LedgerUpdate { previous: 1, current: 1 });
    }

    // valid message 2
    head = advance(&p, &head, valid(2));
    ledger.update(&head.proof).unwrap();
    assert_eq!(ledger.max_message_number().unwrap(), 2);

    // several messages chained before a single ledger update
    for seq in 3..8 {
        head = advance(&p, &head, valid(seq));
    }
    let up = ledger.update(&head.proof).unwrap();
    assert_eq!(up, LedgerUpdate { previous: 2, current: 7 });
    assert_eq!(head.state, RollupState::new(7));
}

#[test]
fn regressive_update_fails_and_keeps_counter() {
    let (p, ledger) = setup();
    let genesis = p.genesis().unwrap();
    let low = advance(&p, &genesis, valid(3));
    let high = advance(&p, &low, valid(9));

    ledger.update(&high.proof).unwrap();
    assert_eq!(ledger.update(&low.proof), Err(LedgerError::Regression { current: 9, claimed: 3 }));
    assert_eq!(ledger.update(&genesis.proof), Err(LedgerError::Regression { current: 9, claimed: 0 }));
    assert_eq!(ledger.max_message_number().unwrap(), 9);

    // replaying the same proof is stale but not regressive
    assert_eq!(ledger.update(&high.proof).unwrap(), LedgerUpdate { previous: 9, current: 9 });
}

#[test]
fn branches_submitted_out_of_order_never_regress() {
    let (p, ledger) = setup();
    let genesis = p.genesis().unwrap();
    let a = p.prove_batch(genesis.clone(), &[valid(4), valid(5)]).unwrap();
    let b = p.prove_batch(genesis, &[valid(2)]).unwrap();

    ledger.update(&a.proof).unwrap();
    assert!(ledger.update(&b.proof).is_err());
    assert_eq!(ledger.max_message_number().unwrap(), 5);
}

#[test]
fn invalid_proofs_are_rejected_without_change() {
    let (p, ledger) = setup();
    let head = advance(&p, &p.genesis().unwrap(), valid(2));
    ledger.update(&head.proof).unwrap();

    // forged by a different key
    let forger = BatchProcessor::new(TranscriptBackend::with_key([5u8; 32]));
    let forged = advance(&forger, &forger.genesis().unwrap(), valid(100));
    assert!(matches!(
        ledger.update(&forged.proof),
        Err(LedgerError::InvalidProof(BatchError::Verification(_)))
    ));

    // honest proof with a tampered public output
    let mut tampered = advance(&p, &head, valid(3)).proof;
    tampered.instance.inputs[1] = attest::FrVesta::from(1_000u64);
    assert!(matches!(ledger.update(&tampered), Err(LedgerError::InvalidProof(_))));

    assert_eq!(ledger.max_message_number().unwrap(), 2);
}

#[test]
fn concurrent_updates_keep_the_maximum() {
    let (p, ledger) = setup();
    let ledger = Arc::new(ledger);
    let genesis = p.genesis().unwrap();
    let proofs: Vec<_> = (1..=16u64)
        .map(|seq| p.advance(&genesis, &valid(seq)).unwrap().proof)
        .collect();

    let handles: Vec<_> = proofs
        .into_iter()
        .map(|proof| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || ledger.update(&proof).is_ok())
        })
        .collect();
    let accepted = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();

    assert!(accepted >= 1);
    assert_eq!(ledger.max_message_number().unwrap(), 16);
}

#[test]
fn update_record_serializes() {
    let json = serde_json::to_string(&LedgerUpdate { previous: 1, current: 2 }).unwrap();
    assert_eq!(json, r#"{"previous":1,"current":2}"#);
}
