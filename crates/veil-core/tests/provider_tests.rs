use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use veil_core::{
    crypto, encryptor, preload, EventQueue, Intercept, ProtocolInterceptor, ReplyEvent,
    ResourceRegistry, ResourceRequest, VIRTUAL_SCHEME,
};

fn write_encrypted(root: &Path, relative: &str, plain: &[u8], secret: &str) {
    let target = root.join(format!("{relative}.enc"));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(target, crypto::encrypt(plain, secret)).unwrap();
}

fn request(path: &str) -> ResourceRequest {
    ResourceRequest::get(VIRTUAL_SCHEME, path)
}

#[test]
fn preloaded_assets_stream_back_decrypted() {
    let assets = tempdir().unwrap();
    let secret = "MySecretKey123!@#";
    write_encrypted(assets.path(), "main.qml", b"Window { visible: true }", secret);
    write_encrypted(assets.path(), "images/logo.png", b"\x89PNG\r\n", secret);

    let registry = Arc::new(ResourceRegistry::new(secret));
    assert_eq!(preload::preload_directory(&registry, assets.path()), 2);

    let queue = EventQueue::new();
    let interceptor = ProtocolInterceptor::new(Arc::clone(&registry), queue.clone());

    let mut reply = match interceptor.intercept(&request("/main.qml")) {
        Intercept::Reply(reply) => reply,
        Intercept::PassThrough => panic!("expected a synthetic reply"),
    };
    assert_eq!(reply.status(), 200);
    assert_eq!(reply.content_type(), "text/plain");
    assert_eq!(reply.len(), 24);

    assert_eq!(reply.try_next_event(), None);
    assert_eq!(queue.process_pending(), 1);
    assert_eq!(reply.try_next_event(), Some(ReplyEvent::DataReady));
    assert_eq!(reply.try_next_event(), Some(ReplyEvent::Finished));

    let mut body = Vec::new();
    let mut buf = [0u8; 8];
    loop {
        let n = reply.read(&mut buf);
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    assert_eq!(body, b"Window { visible: true }");
    assert_eq!(reply.bytes_available(), 0);

    let image = match interceptor.intercept(&request("/images/logo.png")) {
        Intercept::Reply(reply) => reply,
        Intercept::PassThrough => panic!("nested asset should be served"),
    };
    assert_eq!(image.content_type(), "image/png");
    assert_eq!(image.len(), 6);
}

#[test]
fn bulk_encrypted_tree_serves_through_the_provider() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    let packed = dir.path().join("packed");
    fs::create_dir_all(src.join("views")).unwrap();
    fs::write(src.join("App.qml"), b"ApplicationWindow {}").unwrap();
    fs::write(src.join("views/login.js"), b"function login() {}").unwrap();
    fs::write(src.join("shader.frag"), b"void main() {}").unwrap();

    let secret = "pipeline";
    let extensions = vec![".qml".to_string(), ".js".to_string()];
    assert_eq!(
        encryptor::encrypt_directory(&src, &packed, secret, &extensions),
        2
    );

    let registry = Arc::new(ResourceRegistry::new(secret));
    assert_eq!(preload::preload_directory(&registry, &packed), 2);
    assert_eq!(registry.resolve("App.qml"), b"ApplicationWindow {}");
    assert_eq!(registry.resolve("views/login.js"), b"function login() {}");
    assert!(registry.resolve("shader.frag").is_empty());
}

#[test]
fn raw_mode_streams_plain_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("debug.js"), b"console.log(1)").unwrap();

    let registry = Arc::new(ResourceRegistry::new("ignored"));
    registry.set_raw_mode(dir.path());
    let queue = EventQueue::new();
    let interceptor = ProtocolInterceptor::new(registry, queue.clone());

    let mut reply = match interceptor.intercept(&request("/debug.js")) {
        Intercept::Reply(reply) => reply,
        Intercept::PassThrough => panic!("raw file should be served"),
    };
    assert_eq!(reply.content_type(), "application/javascript");
    queue.process_pending();
    let mut buf = [0u8; 32];
    let n = reply.read(&mut buf);
    assert_eq!(&buf[..n], b"console.log(1)");
}

#[test]
fn module_probe_and_unknown_path_diverge() {
    let registry = Arc::new(ResourceRegistry::new("k"));
    let queue = EventQueue::new();
    let interceptor = ProtocolInterceptor::new(registry, queue.clone());

    let probe = match interceptor.intercept(&request("/views/qmldir")) {
        Intercept::Reply(reply) => reply,
        Intercept::PassThrough => panic!("probe must get an empty success"),
    };
    assert_eq!(probe.len(), 0);
    assert_eq!(probe.status(), 200);
    queue.process_pending();
    assert_eq!(probe.try_next_event(), Some(ReplyEvent::Finished));
    assert_eq!(probe.try_next_event(), None);

    assert!(matches!(
        interceptor.intercept(&request("/views/Missing.qml")),
        Intercept::PassThrough
    ));
    assert!(matches!(
        interceptor.intercept(&ResourceRequest::get("https", "/views/qmldir")),
        Intercept::PassThrough
    ));
}
