//! Request filter keyed on the reserved virtual scheme.
//!
//! Anything outside the scheme passes through to the host's default fetch
//! path untouched. Inside the scheme, the path is normalized and resolved
//! against the registry; hits become synthetic replies, manifest probes get
//! an empty success so module resolution keeps going, and everything else
//! falls back to the default loader.

use std::sync::Arc;

use tracing::{debug, info};

use crate::dispatch::EventQueue;
use crate::registry::ResourceRegistry;
use crate::reply::SyntheticReply;
use crate::{MANIFEST_NAME, VIRTUAL_SCHEME};

/// Request verb. Only the path decides how a virtual request is served;
/// no verb gets special treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Put,
    Post,
    Delete,
    Custom,
}

/// One resource request from the host engine's fetch layer.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    pub scheme: String,
    pub path: String,
    pub operation: Operation,
    /// Ignored whenever the registry serves the request.
    pub payload: Option<Vec<u8>>,
}

impl ResourceRequest {
    pub fn get(scheme: &str, path: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            path: path.to_string(),
            operation: Operation::Get,
            payload: None,
        }
    }
}

/// What the host should do with a request.
pub enum Intercept {
    /// Serve this fabricated reply; terminal success.
    Reply(SyntheticReply),
    /// Hand the request to the default fetch path unchanged.
    PassThrough,
}

pub struct ProtocolInterceptor {
    registry: Arc<ResourceRegistry>,
    queue: EventQueue,
}

impl ProtocolInterceptor {
    pub fn new(registry: Arc<ResourceRegistry>, queue: EventQueue) -> Self {
        Self { registry, queue }
    }

    /// Decide how `request` is served. The registry is never consulted for
    /// foreign schemes.
    pub fn intercept(&self, request: &ResourceRequest) -> Intercept {
        if request.scheme != VIRTUAL_SCHEME {
            return Intercept::PassThrough;
        }
        let path = request.path.trim_start_matches('/');
        let body = self.registry.resolve(path);
        if !body.is_empty() {
            debug!(path, len = body.len(), "serving decrypted resource");
            return Intercept::Reply(SyntheticReply::new(path, body, &self.queue));
        }
        if is_manifest_probe(path) {
            // Engines probe every module directory for its manifest; a hard
            // failure here aborts module resolution, an empty body does not.
            debug!(path, "empty manifest response for probe");
            return Intercept::Reply(SyntheticReply::new(path, Vec::new(), &self.queue));
        }
        info!(path, "no virtual resource, falling back to default loader");
        Intercept::PassThrough
    }
}

/// True when the final path component is the module manifest.
pub fn is_manifest_probe(path: &str) -> bool {
    path.rsplit('/').next() == Some(MANIFEST_NAME)
}
