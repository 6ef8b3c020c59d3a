//! Shared fixtures and fake collaborators for integration tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use monitoring_config::config::BoxError;
use monitoring_config::{CycleContext, PodCapacityReader};

/// Administrator configuration exercising most sub-trees.
#[allow(dead_code)]
pub const CLUSTER_MONITORING_CONFIG: &str = r#"
prometheusOperator:
  logLevel: info
  nodeSelector:
    node-role.kubernetes.io/infra: ""
prometheusK8s:
  retention: 24h
  enforcedBodySizeLimit: automatic
  collectionProfile: minimal
  externalLabels:
    datacenter: eu-west
  volumeClaimTemplate:
    spec:
      storageClassName: gp3
      resources:
        requests:
          storage: 40Gi
alertmanagerMain:
  enableUserAlertmanagerConfig: true
  volumeClaimTemplate:
    metadata:
      name: alertmanager-data
    spec:
      resources:
        requests:
          storage: 10Gi
k8sPrometheusAdapter:
  audit:
    profile: Metadata
  dedicatedServiceMonitors:
    enabled: true
telemeterClient:
  clusterID: 2b8e0c6a
  token: secret-token
http:
  httpProxy: http://proxy.internal:3128
  httpsProxy: http://proxy.internal:3128
  noProxy: .cluster.local,.svc
enableUserWorkload: true
"#;

/// User-workload configuration with every top-level section present.
#[allow(dead_code)]
pub const USER_WORKLOAD_CONFIG: &str = r#"
prometheusOperator:
  logLevel: debug
prometheus:
  scrapeInterval: 1m
  enforcedSampleLimit: 50000
  retention: 7d
thanosRuler:
  retention: 24h
"#;

/// Capacity reader returning a fixed answer and counting calls.
#[allow(dead_code)]
pub struct FakePodCapacity {
    capacity: u64,
    error: Option<&'static str>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakePodCapacity {
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            error: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            error: Some(message),
            ..Self::new(1000)
        }
    }

    pub fn slow(capacity: u64, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(capacity)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PodCapacityReader for FakePodCapacity {
    async fn pod_capacity(&self, _ctx: &CycleContext) -> Result<u64, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.error {
            Some(message) => Err(message.into()),
            None => Ok(self.capacity),
        }
    }
}
