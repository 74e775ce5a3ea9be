//! # Lifecycle Monotonicity
//!
//! Arbitrary sequences of transition requests (valid, skipping, backward,
//! replayed, wrongly signed) never move a batch backward, never skip a
//! state, and always leave a verifiable chain.

mod common;

use coldchain_core::BatchId;
use coldchain_ledger::{CoordinatorConfig, TransitionRequest};
use coldchain_state::BatchStatus;
use coldchain_vc::TransitionClaim;
use proptest::prelude::*;

use common::{evidence, Cast, MODERNA, PFIZER};

#[derive(Debug, Clone)]
struct Attempt {
    batch: usize,
    to: BatchStatus,
    from_hint: BatchStatus,
    issuer: usize,
}

fn attempt() -> impl Strategy<Value = Attempt> {
    let status = prop::sample::select(BatchStatus::all().to_vec());
    (0..2usize, status.clone(), status, 0..3usize).prop_map(|(batch, to, from_hint, issuer)| {
        Attempt {
            batch,
            to,
            from_hint,
            issuer,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn status_only_moves_one_step_forward(attempts in prop::collection::vec(attempt(), 1..30)) {
        let cast = Cast::new();
        let ledger = cast.ledger(CoordinatorConfig::default());
        let batches = [
            ledger.create_batch(&cast.registrar, PFIZER, cast.manufacturer_a.address()).unwrap(),
            ledger.create_batch(&cast.registrar, MODERNA, cast.manufacturer_b.address()).unwrap(),
        ];
        // inspector and immunizer are ISSUERs, traveler is not.
        let issuers = [&cast.inspector, &cast.immunizer, &cast.traveler];

        for a in attempts {
            let id: BatchId = batches[a.batch];
            let before = ledger.get_batch(id).unwrap();
            let claim = TransitionClaim {
                subject: before.manufacturer,
                batch_id: id,
                from_status: a.from_hint,
                to_status: a.to,
                payload_hash: evidence(id, a.to),
            };
            let request = TransitionRequest::signed(&claim, issuers[a.issuer]).unwrap();
            let result = ledger.request_transition(request);
            let after = ledger.get_batch(id).unwrap();

            match result {
                Ok(_) => {
                    prop_assert_eq!(Some(after.status), before.status.next());
                    prop_assert_eq!(after.status, a.to);
                    prop_assert_eq!(before.status, a.from_hint);
                }
                Err(_) => prop_assert_eq!(&after, &before),
            }
            prop_assert_eq!(after.certificate_ids.len(), after.status.ordinal() as usize);
            prop_assert!(ledger.verify_chain(id).is_ok());
        }
    }
}
