//! # Session Flows
//!
//! Connect, network switching and provider events as seen by the
//! orchestrator.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hs_02_vital_validation::RawVitalSigns;
    use hs_03_wallet_session::{
        event_channel, MockWalletProvider, SessionError, SessionReader, SessionState,
        WalletEvent, WalletSessionApi,
    };
    use hs_04_analysis_orchestrator::{AnalysisApi, SubmissionError};
    use shared_types::{Address, ChainId, Wei};

    use crate::integration::fixtures::{Node, NodeBuilder, USER};

    const OTHER_CHAIN: ChainId = ChainId(1);

    async fn wait_for_state(node: &Node, expected: SessionState) {
        for _ in 0..200 {
            if node.session.snapshot().state == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "session never reached {}, stuck in {}",
            expected,
            node.session.snapshot().state
        );
    }

    #[tokio::test]
    async fn test_connect_on_target_network_is_ready() {
        let node = NodeBuilder::new().balance("5.0").connected().await;

        let snapshot = node.session.snapshot();
        assert_eq!(snapshot.state, SessionState::ConnectedReady);
        assert_eq!(snapshot.address(), Some(USER));
        assert_eq!(snapshot.balance(), Wei::from_tokens(5));
        assert_eq!(snapshot.balance().to_string(), "5.0000");
    }

    #[tokio::test]
    async fn test_wrong_network_then_switch_registers_unknown_chain() {
        let node = NodeBuilder::new().on_chain(OTHER_CHAIN).connected().await;
        assert_eq!(
            node.session.snapshot().state,
            SessionState::ConnectedWrongNetwork
        );

        let snapshot = node.session.ensure_network().await.unwrap();

        assert_eq!(snapshot.state, SessionState::ConnectedReady);
        assert_eq!(node.wallet.add_calls(), 1);
        assert_eq!(node.wallet.switch_calls(), 2);
        assert_eq!(node.wallet.current_chain(), ChainId::SHIELD_TESTNET);
    }

    #[tokio::test]
    async fn test_auto_switch_on_connect() {
        let node = NodeBuilder::new()
            .on_chain(OTHER_CHAIN)
            .auto_switch()
            .connected()
            .await;

        assert_eq!(node.session.snapshot().state, SessionState::ConnectedReady);
        assert_eq!(node.wallet.add_calls(), 1);
    }

    #[tokio::test]
    async fn test_rejected_registration_stays_on_wrong_network() {
        let mut wallet = MockWalletProvider::new(USER, OTHER_CHAIN);
        wallet.reject_add = true;
        let node = NodeBuilder::new().wallet(wallet).connected().await;

        let err = node.session.ensure_network().await.unwrap_err();

        assert!(matches!(err, SessionError::NetworkSwitchFailed(_)));
        assert_eq!(
            node.session.snapshot().state,
            SessionState::ConnectedWrongNetwork
        );
    }

    #[tokio::test]
    async fn test_user_rejects_connection() {
        let mut wallet = MockWalletProvider::new(USER, ChainId::SHIELD_TESTNET);
        wallet.reject_connect = true;
        let node = NodeBuilder::new().wallet(wallet).build();

        let err = node.session.connect().await.unwrap_err();

        assert_eq!(err, SessionError::UserRejected);
        assert_eq!(node.session.snapshot().state, SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_chain_change_event_blocks_submission() {
        let node = NodeBuilder::new().connected().await;
        let (events, mailbox) = event_channel();
        let handle = node.session.clone().spawn_event_loop(mailbox);

        node.wallet.set_chain(OTHER_CHAIN);
        events
            .send(WalletEvent::ChainChanged(OTHER_CHAIN))
            .await
            .unwrap();
        wait_for_state(&node, SessionState::ConnectedWrongNetwork).await;

        let err = node
            .service
            .submit(RawVitalSigns::from_numbers(72, 118, 98))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubmissionError::SessionNotReady {
                state: SessionState::ConnectedWrongNetwork
            }
        ));
        assert_eq!(node.scorer.calls(), 0);

        drop(events);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_locked_wallet_clears_session() {
        let node = NodeBuilder::new().connected().await;
        let (events, mailbox) = event_channel();
        let handle = node.session.clone().spawn_event_loop(mailbox);

        events
            .send(WalletEvent::AccountsChanged(vec![]))
            .await
            .unwrap();
        wait_for_state(&node, SessionState::Disconnected).await;

        assert_eq!(node.session.snapshot().address(), None);
        drop(events);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_account_switch_reconnects_with_new_balance() {
        let node = NodeBuilder::new().connected().await;
        let other = Address([0x77; 20]);
        node.balances.set_balance(other, Wei::from_tokens(9));
        node.wallet.set_accounts(vec![other]);

        node.session
            .handle_event(WalletEvent::AccountsChanged(vec![other]))
            .await;

        let snapshot = node.session.snapshot();
        assert_eq!(snapshot.address(), Some(other));
        assert_eq!(snapshot.balance(), Wei::from_tokens(9));
    }

    #[tokio::test]
    async fn test_disconnect_survives_unsupported_revoke() {
        let mut wallet = MockWalletProvider::new(USER, ChainId::SHIELD_TESTNET);
        wallet.revoke_unsupported = true;
        let node = NodeBuilder::new().wallet(wallet).connected().await;

        node.session.disconnect().await;

        assert_eq!(node.session.snapshot().state, SessionState::Disconnected);
        assert_eq!(node.wallet.revoke_calls(), 1);
    }

    #[tokio::test]
    async fn test_low_balance_hint_is_separate_from_gate() {
        // Above the hint, below the analysis gate.
        let node = NodeBuilder::new().balance("0.5").connected().await;

        assert!(!node.session.needs_funding());
        let err = node
            .service
            .submit(RawVitalSigns::from_numbers(72, 118, 98))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "insufficient_balance");

        let broke = NodeBuilder::new().balance("0.05").connected().await;
        assert!(broke.session.needs_funding());
    }
}
