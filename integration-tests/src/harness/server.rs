use crate::harness::{CapturedEvent, init_test_tracing};
use logwell_core::conf::RuntimeConfig;
use logwell_core::registry::Registry;
use logwell_core::server::Server;
use logwell_core::sink::MemorySink;
use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(2);
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Defaults with an ephemeral loopback port.
pub fn test_config() -> RuntimeConfig {
    let mut cfg = RuntimeConfig::default();
    cfg.server.listen = "127.0.0.1:0".to_string();
    cfg.server.shutdown_grace = Duration::from_secs(1);
    cfg
}

/// Handle to a running log server on its own runtime thread.
///
/// Everything the server delivers lands in an in-memory sink the test can
/// inspect. Dropping the handle shuts the server down.
pub struct TestServer {
    addr: SocketAddr,
    sink: Arc<MemorySink>,
    registry: Arc<Registry>,
    shutdown: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn start() -> Self {
        Self::start_with(test_config())
    }

    pub fn start_with(cfg: RuntimeConfig) -> Self {
        init_test_tracing(events());

        let sink = Arc::new(MemorySink::new());
        let server_sink = sink.clone();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread = thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("failed to build test runtime");

            rt.block_on(async move {
                let server = Server::bind(cfg, server_sink)
                    .await
                    .expect("failed to bind test server");

                ready_tx
                    .send((
                        server.local_addr(),
                        server.registry(),
                        server.shutdown_token(),
                    ))
                    .expect("test harness went away");

                server.serve().await;
            });
        });

        let (addr, registry, shutdown) = ready_rx
            .recv_timeout(STARTUP_TIMEOUT)
            .expect("server failed to start");

        Self {
            addr,
            sink,
            registry,
            shutdown,
            thread: Some(thread),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn sink(&self) -> &MemorySink {
        &self.sink
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Open a client connection and wait until the server has registered it.
    pub fn connect(&self) -> TcpStream {
        let stream = TcpStream::connect(self.addr).expect("failed to connect to test server");
        stream
            .set_read_timeout(Some(WAIT_TIMEOUT))
            .expect("failed to set read timeout");

        let local = stream.local_addr().expect("client has no local address");
        self.wait_for("client registration", |s| s.registry.contains(&local));
        stream
    }

    /// Write `bytes` in a single send.
    pub fn send(stream: &mut TcpStream, bytes: &[u8]) {
        stream.write_all(bytes).expect("failed to write to test server");
        stream.flush().expect("failed to flush");
    }

    /// Poll until `condition` holds (or panic).
    pub fn wait_for(&self, what: &str, condition: impl Fn(&TestServer) -> bool) {
        let deadline = Instant::now() + WAIT_TIMEOUT;

        while !condition(self) {
            if Instant::now() > deadline {
                panic!("timed out waiting for {what}");
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Request shutdown and wait for the server thread to finish cleanup.
    ///
    /// The sink and registry stay readable afterwards.
    pub fn shutdown(&mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.cancel();
        if let Some(thread) = self.thread.take() {
            thread.join().expect("server thread panicked");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if !thread::panicking() {
            self.stop();
        } else {
            self.shutdown.cancel();
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Every event logged so far in this test binary.
///
/// Tests run in parallel and share the subscriber, so filter on something
/// unique to the test such as the client's address.
pub fn captured_events() -> Vec<CapturedEvent> {
    events().lock().unwrap().clone()
}
