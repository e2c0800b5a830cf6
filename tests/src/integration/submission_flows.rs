//! # Submission Flows
//!
//! `submit()` from raw inputs to receipt, with call counts on every
//! collaborator.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use hs_01_ciphertext_encoder::{encode, CiphertextHex};
    use hs_02_vital_validation::{RawVitalSigns, VitalField};
    use hs_03_wallet_session::{SessionReader, WalletSessionApi};
    use hs_04_analysis_orchestrator::{
        AnalysisApi, MockHealthLedger, MockRiskScorer, ScoringError, SubmissionError,
    };
    use proptest::prelude::*;
    use shared_types::Wei;

    use crate::integration::fixtures::{NodeBuilder, TestKeyPair, USER};

    fn normal_vitals() -> RawVitalSigns {
        RawVitalSigns::from_numbers(72, 118, 98)
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let node = NodeBuilder::new()
            .balance("5.0")
            .scorer(MockRiskScorer::returning(1, "Low"))
            .connected()
            .await;

        let receipt = node.service.submit(normal_vitals()).await.unwrap();

        assert!(!receipt.tx_hash.to_hex().is_empty());
        assert_eq!(receipt.assessment.summary(), "Risk Category: Low (Level 1)");
        assert_eq!(node.scorer.calls(), 1);
        assert_eq!(node.ledger.submit_calls(), 1);

        let submissions = node.ledger.submissions();
        assert_eq!(submissions.len(), 1);
        let fields = submissions[0].fields();
        let distinct: HashSet<&str> = fields.iter().map(|c| c.as_str()).collect();
        assert_eq!(distinct.len(), 4);
        for c in fields {
            assert!(c.as_str().starts_with("0x"));
            assert!(c.digit_len() > 0);
        }
    }

    #[tokio::test]
    async fn test_stored_ciphertexts_decrypt_to_inputs() {
        let node = NodeBuilder::new()
            .scorer(MockRiskScorer::returning(2, "Moderate"))
            .connected()
            .await;

        node.service.submit(normal_vitals()).await.unwrap();

        let record = &node.ledger.submissions()[0];
        assert_eq!(node.keys.decrypt(record.heart_rate()), 72);
        assert_eq!(node.keys.decrypt(record.blood_pressure()), 118);
        assert_eq!(node.keys.decrypt(record.oxygen_level()), 98);
        assert_eq!(node.keys.decrypt(record.risk_level()), 2);
    }

    #[tokio::test]
    async fn test_record_readable_after_submit() {
        let node = NodeBuilder::new().connected().await;

        let receipt = node.service.submit(normal_vitals()).await.unwrap();
        let index = receipt.record_index.unwrap_or(0);
        let stored = node.service.read_record(USER, index).await.unwrap();

        assert_eq!(stored.user, USER);
        assert_eq!(node.keys.decrypt(&stored.oxygen_level), 98);
    }

    #[tokio::test]
    async fn test_out_of_range_input_makes_no_external_call() {
        let node = NodeBuilder::new().connected().await;

        let err = node
            .service
            .submit(RawVitalSigns::from_numbers(1500, 118, 98))
            .await
            .unwrap_err();

        match err {
            SubmissionError::InvalidInput(report) => {
                assert!(report.issue_for(VitalField::HeartRate).is_some());
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert_eq!(node.scorer.calls(), 0);
        assert_eq!(node.ledger.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_field_is_incomplete() {
        let node = NodeBuilder::new().connected().await;

        let err = node
            .service
            .submit(RawVitalSigns::new("72", "", "98"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(node.scorer.calls(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_balance_never_calls_scorer() {
        let node = NodeBuilder::new().balance("0.5").connected().await;

        let err = node.service.submit(normal_vitals()).await.unwrap_err();

        match &err {
            SubmissionError::InsufficientBalance {
                balance, required, ..
            } => {
                assert_eq!(*balance, Wei::from_ether_str("0.5").unwrap());
                assert_eq!(*required, Wei::from_tokens(1));
            }
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }
        assert!(err.user_message().contains("faucet"));
        assert_eq!(node.scorer.calls(), 0);
        assert_eq!(node.ledger.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_scorer_failures() {
        let node = NodeBuilder::new()
            .scorer(MockRiskScorer::failing(ScoringError::Unavailable(
                "HTTP error! status: 502".into(),
            )))
            .connected()
            .await;
        let err = node.service.submit(normal_vitals()).await.unwrap_err();
        assert_eq!(err.kind(), "scoring_unavailable");
        assert_eq!(
            err.user_message(),
            "Failed to analyze your health data. Please try again."
        );
        assert_eq!(node.ledger.submit_calls(), 0);

        let node = NodeBuilder::new()
            .scorer(MockRiskScorer::failing(ScoringError::Indeterminate(
                "no risk_level".into(),
            )))
            .connected()
            .await;
        let err = node.service.submit(normal_vitals()).await.unwrap_err();
        assert_eq!(err.user_message(), "Risk level could not be determined.");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_ledger_failures() {
        let node = NodeBuilder::new()
            .ledger(MockHealthLedger::rejecting())
            .connected()
            .await;
        let err = node.service.submit(normal_vitals()).await.unwrap_err();
        assert_eq!(err.kind(), "submission_rejected");
        assert!(!err.transaction_may_land());

        let node = NodeBuilder::new()
            .ledger(MockHealthLedger::reverting())
            .connected()
            .await;
        let err = node.service.submit(normal_vitals()).await.unwrap_err();
        assert_eq!(err.kind(), "confirmation_failed");
        assert!(err.tx_hash().is_some());
    }

    #[tokio::test]
    async fn test_confirmation_wait_is_bounded() {
        let node = NodeBuilder::new()
            .ledger(MockHealthLedger::never_confirming())
            .connected()
            .await;

        let err = tokio::time::timeout(
            Duration::from_secs(5),
            node.service.submit(normal_vitals()),
        )
        .await
        .expect("submit must give up on its own")
        .unwrap_err();

        assert!(err.transaction_may_land());
        assert!(err.tx_hash().is_some());
        assert_eq!(node.ledger.submit_calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_yield_one_write() {
        let node = NodeBuilder::new()
            .scorer(MockRiskScorer::returning(1, "Low").with_latency(Duration::from_millis(50)))
            .connected()
            .await;

        let (first, second) = tokio::join!(
            node.service.submit(normal_vitals()),
            node.service.submit(normal_vitals())
        );

        let results = [first, second];
        let accepted = results.iter().filter(|r| r.is_ok()).count();
        let refused = results
            .iter()
            .filter(|r| matches!(r, Err(SubmissionError::AlreadyInProgress)))
            .count();
        assert_eq!((accepted, refused), (1, 1));
        assert_eq!(node.ledger.submit_calls(), 1);

        // The guard is released once the attempt finishes.
        assert!(node.service.submit(normal_vitals()).await.is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_mid_attempt_uses_gate_snapshot() {
        let node = NodeBuilder::new()
            .scorer(MockRiskScorer::returning(1, "Low").with_latency(Duration::from_millis(50)))
            .connected()
            .await;
        let service = node.service.clone();

        let attempt = tokio::spawn(async move { service.submit(normal_vitals()).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        node.session.disconnect().await;

        let receipt = attempt.await.unwrap().unwrap();
        assert!(!receipt.tx_hash.to_hex().is_empty());
        assert_eq!(node.ledger.submissions().len(), 1);
        assert!(node.session.snapshot().address().is_none());
    }

    #[test]
    fn test_repeated_encodings_differ() {
        let keys = TestKeyPair::new();
        let a = encode(72, &keys.public).unwrap();
        let b = encode(72, &keys.public).unwrap();
        assert_ne!(a, b);
        assert_eq!(keys.decrypt(&a), keys.decrypt(&b));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_encode_round_trips(v in 1i64..=1000) {
            let keys = TestKeyPair::new();
            let c: CiphertextHex = encode(v, &keys.public).unwrap();
            prop_assert!(c.as_str().starts_with("0x"));
            prop_assert_eq!(c.digit_len() % 2, 0);
            prop_assert_eq!(keys.decrypt(&c), v as u64);
        }
    }
}
