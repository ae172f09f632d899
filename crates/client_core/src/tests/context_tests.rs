use super::*;
use std::time::Duration;

#[tokio::test]
async fn commit_without_dependents_is_applied_immediately() {
    let context = NetworkContext::new(NetworkId::Mainnet);
    let commit = context.commit(NetworkId::Testnet);

    assert_eq!(commit.generation, 1);
    assert_eq!(context.current(), NetworkId::Testnet);
    context.wait_applied(commit).await.expect("applied");
}

#[tokio::test]
async fn barrier_waits_for_dependent_acknowledgement() {
    let context = NetworkContext::new(NetworkId::Mainnet);
    let mut dependent = context.register();

    let commit = context.commit(NetworkId::Testnet);
    let pending = tokio::time::timeout(Duration::from_millis(20), context.wait_applied(commit)).await;
    assert!(pending.is_err(), "barrier must not resolve before acknowledgement");

    let observed = dependent.next_commit().await.expect("commit");
    assert_eq!(observed, commit);
    dependent.acknowledge(observed);

    context.wait_applied(commit).await.expect("applied");
}

#[tokio::test]
async fn rejected_commit_reports_reason() {
    let context = NetworkContext::new(NetworkId::Mainnet);
    let mut dependent = context.register();

    let commit = context.commit(NetworkId::Testnet);
    let observed = dependent.next_commit().await.expect("commit");
    dependent.reject(observed, "extension locked");

    let err = context.wait_applied(commit).await.expect_err("rejected");
    assert_eq!(err, "extension locked");
}

#[tokio::test]
async fn newer_commit_supersedes_pending_barrier() {
    let context = NetworkContext::new(NetworkId::Mainnet);
    let _dependent = context.register();

    let first = context.commit(NetworkId::Testnet);
    let _second = context.commit(NetworkId::Mainnet);

    let err = context.wait_applied(first).await.expect_err("superseded");
    assert!(err.contains("superseded"));
}

#[tokio::test]
async fn dropped_dependent_releases_barrier() {
    let context = NetworkContext::new(NetworkId::Mainnet);
    let dependent = context.register();

    let commit = context.commit(NetworkId::Testnet);
    drop(dependent);

    context.wait_applied(commit).await.expect("applied after drop");
}

#[tokio::test]
async fn binding_task_rebinds_adapter_before_barrier_resolves() {
    let context = NetworkContext::new(NetworkId::Mainnet);
    let wallet = Arc::new(wallet_adapter::SimulatedWallet::new("aleo1pk"));
    let task = spawn_network_binding(&context, wallet.clone());

    let commit = context.commit(NetworkId::Testnet);
    context.wait_applied(commit).await.expect("applied");
    assert_eq!(wallet.bound_network().await, Some(NetworkId::Testnet));

    task.abort();
}
