//! Shared helpers for the wiremock-backed integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use kube::config::{
    AuthInfo, Cluster, Context as KubeContext, KubeConfigOptions, Kubeconfig, NamedAuthInfo,
    NamedCluster, NamedContext,
};
use serde_json::{Value, json};
use syndesis_operator::config::OperatorConfig;
use syndesis_operator::context::Context;
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const NS: &str = "test";
pub const LIST_PATH: &str = "/apis/syndesis.io/v1beta1/namespaces/test/syndesises";
pub const CURRENT_PATH: &str = "/apis/syndesis.io/v1beta1/namespaces/test/syndesises/app";
pub const CURRENT_STATUS_PATH: &str =
    "/apis/syndesis.io/v1beta1/namespaces/test/syndesises/app/status";
pub const LEGACY_LIST_PATH: &str = "/apis/syndesis.io/v1alpha1/namespaces/test/syndesises";
pub const LEGACY_PATH: &str = "/apis/syndesis.io/v1alpha1/namespaces/test/syndesises/app";
pub const LEGACY_STATUS_PATH: &str =
    "/apis/syndesis.io/v1alpha1/namespaces/test/syndesises/app/status";
pub const SECRET_PATH: &str = "/api/v1/namespaces/test/secrets/syndesis-global-config";

/// Build a `kube::Client` pointing at the wiremock server.
pub async fn mock_client(server_uri: &str) -> kube::Client {
    let kubeconfig = Kubeconfig {
        clusters: vec![NamedCluster {
            name: "test".into(),
            cluster: Some(Cluster {
                server: Some(server_uri.to_string()),
                insecure_skip_tls_verify: Some(true),
                ..Default::default()
            }),
        }],
        contexts: vec![NamedContext {
            name: "test".into(),
            context: Some(KubeContext {
                cluster: "test".into(),
                user: Some("test".into()),
                namespace: Some(NS.into()),
                ..Default::default()
            }),
        }],
        auth_infos: vec![NamedAuthInfo {
            name: "test".into(),
            auth_info: Some(AuthInfo::default()),
        }],
        current_context: Some("test".into()),
        ..Default::default()
    };

    let config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .unwrap();
    kube::Client::try_from(config).unwrap()
}

pub async fn test_context(server: &MockServer) -> Arc<Context> {
    let client = mock_client(&server.uri()).await;
    Arc::new(Context::new(client, NS.into(), &OperatorConfig::default()))
}

/// Resource version handed out by [`Echo`].
pub const WRITTEN_RESOURCE_VERSION: &str = "7";

/// Resource version handed out by [`StatusPatch`].
pub const STATUS_RESOURCE_VERSION: &str = "6";

/// Responds with the request body under a new resource version, as the API
/// server does for a successful create or replace.
pub struct Echo;

impl Respond for Echo {
    fn respond(&self, req: &Request) -> ResponseTemplate {
        let mut body: Value = serde_json::from_slice(&req.body).unwrap();
        body["metadata"]["resourceVersion"] = json!(WRITTEN_RESOURCE_VERSION);
        ResponseTemplate::new(200).set_body_json(body)
    }
}

/// Responds to a status merge patch with the stored object carrying the
/// patched status, as the status subresource does. The stored spec is left
/// as it was.
pub struct StatusPatch(pub Value);

impl Respond for StatusPatch {
    fn respond(&self, req: &Request) -> ResponseTemplate {
        let patch: Value = serde_json::from_slice(&req.body).unwrap();
        let mut stored = self.0.clone();
        stored["status"] = patch["status"].clone();
        stored["metadata"]["resourceVersion"] = json!(STATUS_RESOURCE_VERSION);
        ResponseTemplate::new(200).set_body_json(stored)
    }
}

pub fn status_response(code: u16, reason: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": reason.to_lowercase(),
        "reason": reason,
        "code": code
    }))
}

pub fn list_response(items: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "apiVersion": "syndesis.io/v1beta1",
        "kind": "SyndesisList",
        "metadata": { "resourceVersion": "100" },
        "items": items,
    }))
}

fn object(api_version: &str, name: &str, spec: Value, status: Value) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": "Syndesis",
        "metadata": {
            "name": name,
            "namespace": NS,
            "resourceVersion": "5",
            "uid": format!("uid-{name}"),
        },
        "spec": spec,
        "status": status,
    })
}

/// A stored object in the legacy shape, as returned by the API server under
/// the given `apiVersion`.
pub fn legacy_object(api_version: &str, name: &str, phase: &str) -> Value {
    object(
        api_version,
        name,
        json!({
            "routeHostname": "foo.example.com",
            "demoData": true,
            "sarNamespace": "myproject",
            "integration": { "limit": 5 },
            "addons": {
                "todo": { "enabled": "true" },
                "camelk": { "enabled": "false" },
                "komodo": { "enabled": "true" }
            },
            "components": {
                "db": {
                    "user": "syndesis",
                    "resources": {
                        "limits": { "memory": "512Mi" },
                        "volumeCapacity": "1Gi"
                    }
                }
            }
        }),
        json!({ "phase": phase, "version": "1.8.0" }),
    )
}

/// A stored object in the canonical shape.
pub fn current_object(name: &str) -> Value {
    object(
        "syndesis.io/v1beta1",
        name,
        json!({
            "routeHostname": "foo.example.com",
            "addons": { "todo": { "enabled": true } },
            "components": { "database": { "resources": { "memory": "512Mi" } } }
        }),
        json!({ "phase": "Installed", "version": "1.9.0" }),
    )
}

/// Methods and paths of the write requests received, in arrival order.
pub async fn write_sequence(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() != "GET")
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect()
}

/// Bodies of the requests received for `method` on `path`, parsed as JSON.
pub async fn request_bodies(server: &MockServer, method: &str, path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == method && r.url.path() == path)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}
