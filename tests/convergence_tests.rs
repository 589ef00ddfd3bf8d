use std::sync::Arc;
use std::time::Duration;

use object_store_manager::{
    BucketName, InMemoryVersionStore, PolicyError, PolicyService, PolicyServiceImpl, RetryPolicy,
};

const POLICY_DOC: &str = r#"{"Version":"2012-10-17","Statement":[]}"#;

fn bucket() -> BucketName {
    BucketName::new("policy-bucket".to_string()).unwrap()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        initial_interval: Duration::from_millis(10),
        multiplier: 2.0,
        max_interval: Duration::from_millis(50),
        max_elapsed_time: Duration::from_secs(2),
    }
}

#[tokio::test]
async fn test_put_policy_waits_out_stale_reads() {
    let store = Arc::new(InMemoryVersionStore::new());
    store.create_bucket(&bucket()).await;
    store.lag_policy_reads(2).await;

    let service = PolicyServiceImpl::new(store.clone(), fast_retry());
    service.put_policy(&bucket(), POLICY_DOC).await.unwrap();

    // Two stale probes and the converged one
    assert_eq!(store.stats().await.policy_gets, 3);
    assert_eq!(
        service.get_policy(&bucket()).await.unwrap(),
        Some(POLICY_DOC.to_string())
    );
}

#[tokio::test]
async fn test_delete_policy_converges_on_the_inverted_condition() {
    let store = Arc::new(InMemoryVersionStore::new());
    store.create_bucket(&bucket()).await;

    let service = PolicyServiceImpl::new(store.clone(), fast_retry());
    service.put_policy(&bucket(), POLICY_DOC).await.unwrap();

    store.lag_policy_reads(2).await;
    service.delete_policy(&bucket()).await.unwrap();

    assert_eq!(service.get_policy(&bucket()).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_put_policy_times_out_as_did_not_converge() {
    let store = Arc::new(InMemoryVersionStore::new());
    store.create_bucket(&bucket()).await;
    // More stale reads than the elapsed-time budget allows
    store.lag_policy_reads(10_000).await;

    let service = PolicyServiceImpl::new(
        store.clone(),
        RetryPolicy {
            initial_interval: Duration::from_millis(100),
            multiplier: 2.0,
            max_interval: Duration::from_millis(400),
            max_elapsed_time: Duration::from_secs(3),
        },
    );

    match service.put_policy(&bucket(), POLICY_DOC).await {
        Err(PolicyError::DidNotConverge { bucket: name, waited }) => {
            assert_eq!(name, bucket().as_str());
            assert!(waited >= Duration::from_secs(3));
        }
        other => panic!("expected DidNotConverge, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_malformed_policy_documents_are_rejected_before_writing() {
    let store = Arc::new(InMemoryVersionStore::new());
    store.create_bucket(&bucket()).await;

    let service = PolicyServiceImpl::new(store.clone(), fast_retry());
    let result = service.put_policy(&bucket(), "not json {").await;

    assert!(matches!(result, Err(PolicyError::Storage(_))));
    assert_eq!(store.get_bucket_policy(&bucket()).await.unwrap(), None);
}

#[tokio::test]
async fn test_policy_calls_against_a_missing_bucket_are_permanent_errors() {
    let store = Arc::new(InMemoryVersionStore::new());
    let service = PolicyServiceImpl::new(store, fast_retry());

    match service.put_policy(&bucket(), POLICY_DOC).await {
        Err(PolicyError::Storage(_)) => {}
        other => panic!("expected a storage error, got {:?}", other.map(|_| ())),
    }
}
