//! veil — encrypted virtual resource provider.
//!
//! Application assets ship as XOR-obfuscated blobs. At startup the host
//! registers each blob under a virtual path (or points the registry at a
//! plain directory instead), then routes resource requests through the
//! interceptor, which answers the reserved scheme with fabricated in-memory
//! replies.
//!
//! # Module layout
//! - `crypto`    — passphrase → key derivation and the self-inverse transform
//! - `registry`  — virtual-path → encrypted-blob store with raw-mode bypass
//! - `intercept` — scheme filter routing requests to registry or default loader
//! - `reply`     — sequential byte stream with deferred notifications
//! - `dispatch`  — explicit event queue standing in for the host event loop
//! - `preload`   — startup scan registering every encrypted asset in a tree
//! - `encryptor` — bulk encryption engine behind the packaging tool
//! - `error`     — unified error type

pub mod crypto;
pub mod dispatch;
pub mod encryptor;
pub mod error;
pub mod intercept;
pub mod preload;
pub mod registry;
pub mod reply;

pub use dispatch::EventQueue;
pub use error::ProviderError;
pub use intercept::{Intercept, Operation, ProtocolInterceptor, ResourceRequest};
pub use registry::{LookupMode, Resolution, ResourceRegistry};
pub use reply::{ReplyEvent, SyntheticReply};

/// Reserved URI scheme answered by the interceptor.
pub const VIRTUAL_SCHEME: &str = "encrypted";

/// Suffix carried by encrypted files on disk; stripped at registration.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Module manifest filename probed by the host engine per directory.
pub const MANIFEST_NAME: &str = "qmldir";
