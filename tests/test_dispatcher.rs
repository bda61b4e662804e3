
use backend_mock::{Call, RecordingBackend, dispatcher};
use cluster_pool::domain::dispatcher::{CANCELLED_BY_OPERATOR, DispatchSettings, DispatchState, Outcome};
use cluster_pool::domain::node_role::NodeRole;
use cluster_pool::domain::operation::{Field, OperationRequest, TopologyRequest};
use cluster_pool::domain::validation::VersionPolicy;
use cluster_pool::error::Error;

fn create(master: i64, infra: i64, compute: i64, owner: &str) -> OperationRequest {
    OperationRequest::Create { topology: TopologyRequest::new(master, infra, compute, owner) }
}

fn deploy(version: &str) -> OperationRequest {
    OperationRequest::Deploy { topology: TopologyRequest::new(1, 1, 3, "bob"), version: version.to_string() }
}

fn delete(name: &str, force: bool) -> OperationRequest {
    OperationRequest::Delete { cluster_name: name.to_string(), owner: None, force }
}

fn policy(version_policy: VersionPolicy) -> DispatchSettings {
    DispatchSettings { version_policy, ..DispatchSettings::default() }
}

#[test]
fn test_create_end_to_end() {
    let backend = RecordingBackend::new(&["4.12"]).shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    let outcome = dispatcher.dispatch(create(1, 1, 3, "bob")).unwrap();

    let creates: Vec<Call> = backend.mutating_calls();
    assert_eq!(creates.len(), 1);
    match &creates[0] {
        Call::CreateStack { name, node_names, node_roles } => {
            assert!(name.starts_with("bob-bob-"));
            assert_eq!(name, "bob-bob-030524-140709");
            assert_eq!(node_names, &["master-1", "infra-1", "compute-1", "compute-2", "compute-3"]);
            assert_eq!(node_roles, &[NodeRole::Master, NodeRole::Infra, NodeRole::Compute, NodeRole::Compute, NodeRole::Compute]);
        }
        other => panic!("unexpected call {:?}", other),
    }

    match outcome {
        Outcome::Created { stack } => assert_eq!(stack.addresses().count(), 5),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(dispatcher.history(), &[DispatchState::Parsed, DispatchState::Validated, DispatchState::Creating, DispatchState::Succeeded]);
    assert_eq!(dispatcher.failure(), None);
}

#[test]
fn test_create_rejects_non_positive_counts_without_backend_calls() {
    let backend = RecordingBackend::new(&["4.12"]).shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    let error = dispatcher.dispatch(create(0, 1, -2, "bob")).unwrap_err();

    match &error {
        Error::Validation(fields) => assert_eq!(fields, &[Field::MasterCount, Field::ComputeCount]),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(error.exit_code(), 1);
    assert!(backend.calls().is_empty());
    assert_eq!(dispatcher.history(), &[DispatchState::Parsed, DispatchState::Failed]);
    assert!(dispatcher.failure().unwrap().contains("master_count, compute_count"));
}

#[test]
fn test_create_rejects_counts_above_role_limit() {
    let backend = RecordingBackend::new(&["4.12"]).shared();
    let settings = DispatchSettings { max_nodes_per_role: 10, ..DispatchSettings::default() };
    let mut dispatcher = dispatcher(&backend, "", settings);

    let error = dispatcher.dispatch(create(i64::MAX, 1, 11, "bob")).unwrap_err();

    assert!(matches!(error, Error::Validation(ref fields) if fields == &vec![Field::MasterCount, Field::ComputeCount]));
    assert_eq!(error.exit_code(), 1);
    assert!(backend.calls().is_empty());
    assert_eq!(dispatcher.history(), &[DispatchState::Parsed, DispatchState::Failed]);

    assert!(dispatcher.dispatch(create(10, 1, 10, "bob")).is_ok());
}

#[test]
fn test_deploy_runs_verification_commands_on_master() {
    let backend = RecordingBackend::new(&["4.12", "4.14"]).shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    let outcome = dispatcher.dispatch(deploy("4.12")).unwrap();

    let calls = backend.calls();
    assert_eq!(
        calls,
        vec![
            Call::SupportedVersions,
            Call::CreateCluster {
                name: "bob-bob-030524-140709".to_string(),
                node_roles: vec![NodeRole::Master, NodeRole::Infra, NodeRole::Compute, NodeRole::Compute, NodeRole::Compute],
                version: "4.12".to_string(),
            },
            Call::RunCommand { node: "master-1".to_string(), command: "oc version".to_string() },
            Call::RunCommand { node: "master-1".to_string(), command: "oc get nodes".to_string() },
        ]
    );

    match outcome {
        Outcome::Deployed { cluster, version_report, nodes_report } => {
            assert_eq!(cluster.version.as_deref(), Some("4.12"));
            assert_eq!(version_report, "oc version output");
            assert_eq!(nodes_report, "oc get nodes output");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(dispatcher.state(), Some(DispatchState::Succeeded));
    assert!(dispatcher.history().contains(&DispatchState::Deploying));
}

#[test]
fn test_deploy_latest_resolves_to_highest_supported() {
    let backend = RecordingBackend::new(&["3.11", "4.9", "4.14"]).shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    dispatcher.dispatch(deploy("latest")).unwrap();

    assert!(backend.mutating_calls().iter().any(|call| matches!(call, Call::CreateCluster { version, .. } if version == "4.14")));
}

#[test]
fn test_deploy_latest_without_supported_versions_fails_validation() {
    let backend = RecordingBackend::new(&[]).shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    assert!(matches!(dispatcher.dispatch(deploy("latest")), Err(Error::Validation(fields)) if fields == vec![Field::Version]));
    assert!(backend.mutating_calls().is_empty());
}

#[test]
fn test_deploy_rejects_malformed_version() {
    let backend = RecordingBackend::new(&["4.12"]).shared();

    for version in ["abc", "v4.12", "4"] {
        let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());
        assert!(matches!(dispatcher.dispatch(deploy(version)), Err(Error::Validation(fields)) if fields == vec![Field::Version]), "{}", version);
    }
    assert!(backend.mutating_calls().is_empty());
}

#[test]
fn test_deploy_reports_every_invalid_field_in_declared_order() {
    let backend = RecordingBackend::new(&["4.12"]).shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    let request = OperationRequest::Deploy { topology: TopologyRequest::new(0, -1, 0, "bob"), version: "nope".to_string() };
    match dispatcher.dispatch(request) {
        Err(Error::Validation(fields)) => {
            assert_eq!(fields, vec![Field::MasterCount, Field::InfraCount, Field::ComputeCount, Field::Version]);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

// Which polarity the supported-version check should have is a configuration decision;
// both are pinned down here so a change of default is a visible test change.
#[test]
fn test_version_support_with_require_supported_policy() {
    let backend = RecordingBackend::new(&["4.12"]).shared();

    let mut accepting = dispatcher(&backend, "", policy(VersionPolicy::RequireSupported));
    assert!(accepting.dispatch(deploy("4.12")).is_ok());

    let mut rejecting = dispatcher(&backend, "", policy(VersionPolicy::RequireSupported));
    assert!(matches!(rejecting.dispatch(deploy("4.99")), Err(Error::Validation(fields)) if fields == vec![Field::Version]));
}

#[test]
fn test_version_support_with_reject_supported_policy() {
    let backend = RecordingBackend::new(&["4.12"]).shared();

    let mut rejecting = dispatcher(&backend, "", policy(VersionPolicy::RejectSupported));
    assert!(matches!(rejecting.dispatch(deploy("4.12")), Err(Error::Validation(fields)) if fields == vec![Field::Version]));

    let mut accepting = dispatcher(&backend, "", policy(VersionPolicy::RejectSupported));
    assert!(accepting.dispatch(deploy("4.99")).is_ok());
    assert_eq!(accepting.history()[1], DispatchState::Validated);
}

#[test]
fn test_deploy_backend_failure_is_not_retried() {
    let backend = RecordingBackend::new(&["4.12"]).failing().shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    let error = dispatcher.dispatch(deploy("4.12")).unwrap_err();

    assert!(matches!(error, Error::Collaborator(_)));
    assert_eq!(backend.mutating_calls().len(), 1);
    assert!(!backend.calls().iter().any(|call| matches!(call, Call::RunCommand { .. })));
    assert_eq!(dispatcher.history(), &[DispatchState::Parsed, DispatchState::Validated, DispatchState::Deploying, DispatchState::Failed]);
}

#[test]
fn test_delete_declined_answers_cancel() {
    for answer in ["n\n", "N\n", "no\n", "\n", ""] {
        let backend = RecordingBackend::new(&[]).with_stack("bob-bob-030524-140709").shared();
        let mut dispatcher = dispatcher(&backend, answer, DispatchSettings::default());

        let outcome = dispatcher.dispatch(delete("bob-bob-030524-140709", false)).unwrap();

        assert_eq!(outcome, Outcome::Cancelled { name: "bob-bob-030524-140709".to_string() }, "{:?}", answer);
        assert!(backend.mutating_calls().is_empty(), "{:?}", answer);
        assert_eq!(dispatcher.state(), Some(DispatchState::Failed));
        assert_eq!(dispatcher.failure(), Some(CANCELLED_BY_OPERATOR));
    }
}

#[test]
fn test_delete_affirmative_answers_delete_once() {
    for answer in ["y\n", "Y\n"] {
        let backend = RecordingBackend::new(&[]).with_stack("c1").shared();
        let mut dispatcher = dispatcher(&backend, answer, DispatchSettings::default());

        let outcome = dispatcher.dispatch(delete("c1", false)).unwrap();

        assert_eq!(outcome, Outcome::Deleted { name: "c1".to_string() });
        assert_eq!(backend.mutating_calls(), vec![Call::DeleteCluster("c1".to_string())]);
        assert_eq!(dispatcher.history().last(), Some(&DispatchState::Succeeded));
    }
}

#[test]
fn test_delete_force_skips_prompt() {
    let backend = RecordingBackend::new(&[]).with_stack("c1").shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    let outcome = dispatcher.dispatch(delete("c1", true)).unwrap();

    assert_eq!(outcome, Outcome::Deleted { name: "c1".to_string() });
    assert_eq!(
        backend.calls(),
        vec![Call::StackExists("c1".to_string()), Call::GetCluster("c1".to_string()), Call::DeleteCluster("c1".to_string())]
    );
}

#[test]
fn test_delete_unknown_cluster_fails_validation() {
    let backend = RecordingBackend::new(&[]).shared();
    let mut dispatcher = dispatcher(&backend, "y\n", DispatchSettings::default());

    let error = dispatcher.dispatch(delete("ghost", true)).unwrap_err();

    assert!(matches!(error, Error::Validation(ref fields) if fields == &vec![Field::ClusterName]));
    assert_eq!(backend.calls(), vec![Call::StackExists("ghost".to_string())]);
}

#[test]
fn test_dispatcher_resets_between_requests() {
    let backend = RecordingBackend::new(&[]).shared();
    let mut dispatcher = dispatcher(&backend, "", DispatchSettings::default());

    assert!(dispatcher.dispatch(create(0, 1, 1, "bob")).is_err());
    assert!(dispatcher.dispatch(create(1, 1, 1, "bob")).is_ok());

    assert_eq!(dispatcher.failure(), None);
    assert_eq!(dispatcher.history().first(), Some(&DispatchState::Parsed));
    assert_eq!(dispatcher.state(), Some(DispatchState::Succeeded));
}
