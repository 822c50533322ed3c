//! Shared utilities for integration testing.

use std::fs;
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash};
use athena_deploy::deploy::{
    DeployError, DeployResult, Deployment, DeploymentProvider, DeploymentRequest,
    PendingDeployment,
};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Dependency address shipped in `deploy.toml`.
#[allow(dead_code)]
pub const USDT_ADDRESS: &str = "0xf2d20C24314C0147D9bDA97F0Cf0BbA7A7e3afda";

/// Anvil's first account.
#[allow(dead_code)]
pub const TEST_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[allow(dead_code)]
enum Outcome {
    /// Always the same address.
    Fixed(Address),
    /// A new address per deployment.
    Sequential,
    /// Fail confirmation with this message.
    Reject(String),
}

/// In-memory deployment provider.
#[allow(dead_code)]
pub struct StubProvider {
    outcome: Outcome,
    counter: AtomicU8,
    submissions: AtomicUsize,
    requests: Mutex<Vec<DeploymentRequest>>,
}

#[allow(dead_code)]
impl StubProvider {
    fn with(outcome: Outcome) -> Self {
        Self {
            outcome,
            counter: AtomicU8::new(0),
            submissions: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(address: Address) -> Self {
        Self::with(Outcome::Fixed(address))
    }

    pub fn sequential() -> Self {
        Self::with(Outcome::Sequential)
    }

    pub fn rejecting(message: &str) -> Self {
        Self::with(Outcome::Reject(message.to_string()))
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<DeploymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl DeploymentProvider for StubProvider {
    fn submit(
        &self,
        request: &DeploymentRequest,
    ) -> impl Future<Output = DeployResult<PendingDeployment>> + Send {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) as u8;
        self.requests.lock().unwrap().push(request.clone());
        std::future::ready(Ok::<_, DeployError>(PendingDeployment {
            contract: request.contract.clone(),
            tx_hash: TxHash::with_last_byte(n),
        }))
    }

    fn wait_for_deployment(
        &self,
        pending: PendingDeployment,
    ) -> impl Future<Output = DeployResult<Deployment>> + Send {
        let result = match &self.outcome {
            Outcome::Reject(message) => Err(DeployError::Provider(message.clone())),
            Outcome::Fixed(address) => Ok(*address),
            Outcome::Sequential => {
                let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Address::repeat_byte(n))
            }
        };
        std::future::ready(result.map(|address| Deployment {
            contract: pending.contract,
            address,
            tx_hash: pending.tx_hash,
            block_number: Some(1),
        }))
    }
}

/// Answers one JSON-RPC request object.
#[allow(dead_code)]
type RpcHandler = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Hash the mock node assigns to every submitted transaction.
#[allow(dead_code)]
pub const DEPLOY_TX_HASH: &str = "0xabababababababababababababababababababababababababababababababab";

/// Block the mock node includes the deployment in.
#[allow(dead_code)]
pub const RECEIPT_BLOCK: u64 = 0x10;

/// How the mock node treats the deployment transaction.
#[allow(dead_code)]
#[derive(Clone)]
pub struct NodeBehaviour {
    /// Receipt `status` field.
    pub succeeds: bool,
    /// Receipt `contractAddress` field.
    pub contract_address: Option<&'static str>,
    /// Receipt lookups answered with `null` before the receipt shows up.
    pub pending_receipts: usize,
}

impl Default for NodeBehaviour {
    fn default() -> Self {
        Self {
            succeeds: true,
            contract_address: Some("0x1111111111111111111111111111111111111111"),
            pending_receipts: 0,
        }
    }
}

/// A scripted JSON-RPC node that records the methods it was asked for.
#[allow(dead_code)]
pub struct MockNode {
    addr: SocketAddr,
    calls: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of times `method` was called.
    pub fn calls(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.as_str() == method)
            .count()
    }
}

/// Start a node that accepts one deployment and reports its receipt.
///
/// `eth_blockNumber` starts at [`RECEIPT_BLOCK`] and advances by one per call,
/// so each poll sees one more confirmation.
#[allow(dead_code)]
pub async fn start_mock_node(behaviour: NodeBehaviour) -> MockNode {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let receipt_lookups = Arc::new(AtomicUsize::new(0));
    let block = Arc::new(AtomicU64::new(RECEIPT_BLOCK));

    let recorded = calls.clone();
    let handler: RpcHandler = Arc::new(move |req: &Value| {
        let method = req
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        recorded.lock().unwrap().push(method.clone());

        let result = match method.as_str() {
            "eth_chainId" => json!("0x61"),
            "eth_getTransactionCount" => json!("0x0"),
            "eth_estimateGas" => json!("0x100000"),
            "eth_gasPrice" | "eth_maxPriorityFeePerGas" => json!("0x3b9aca00"),
            "eth_feeHistory" => json!({
                "oldestBlock": "0xf",
                "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
                "gasUsedRatio": [0.5],
                "reward": [["0x3b9aca00"]]
            }),
            "eth_sendRawTransaction" => json!(DEPLOY_TX_HASH),
            "eth_getTransactionReceipt" => {
                if receipt_lookups.fetch_add(1, Ordering::SeqCst) < behaviour.pending_receipts {
                    Value::Null
                } else {
                    receipt(&behaviour)
                }
            }
            "eth_blockNumber" => json!(format!("0x{:x}", block.fetch_add(1, Ordering::SeqCst))),
            other => return rpc_error(req, &format!("method {} not supported", other)),
        };

        json!({
            "jsonrpc": "2.0",
            "id": req.get("id").cloned().unwrap_or(Value::Null),
            "result": result
        })
    });

    let addr = start_rpc(handler).await;
    MockNode { addr, calls }
}

#[allow(dead_code)]
fn receipt(behaviour: &NodeBehaviour) -> Value {
    json!({
        "type": "0x2",
        "status": if behaviour.succeeds { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": DEPLOY_TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": format!("0x{}", "22".repeat(32)),
        "blockNumber": format!("0x{:x}", RECEIPT_BLOCK),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        "to": null,
        "contractAddress": behaviour.contract_address
    })
}

#[allow(dead_code)]
fn rpc_error(req: &Value, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": req.get("id").cloned().unwrap_or(Value::Null),
        "error": { "code": -32000, "message": message }
    })
}

/// Start a JSON-RPC node that answers every call with the given error.
#[allow(dead_code)]
pub async fn start_rejecting_rpc(message: &'static str) -> SocketAddr {
    start_rpc(Arc::new(move |req: &Value| rpc_error(req, message))).await
}

#[allow(dead_code)]
async fn start_rpc(handler: RpcHandler) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(serve_connection(socket, handler.clone()));
                }
                Err(_) => break,
            }
        }
    });

    addr
}

#[allow(dead_code)]
async fn serve_connection(socket: TcpStream, handler: RpcHandler) {
    let mut reader = BufReader::new(socket);

    loop {
        // Request line and headers
        let mut content_length = 0usize;
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => return,
                Ok(_) => {}
            }
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                break;
            }
            if let Some((name, value)) = trimmed.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0u8; content_length];
        if reader.read_exact(&mut body).await.is_err() {
            return;
        }

        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let response = match &request {
            Value::Array(batch) => Value::Array(batch.iter().map(|req| handler(req)).collect()),
            single => handler(single),
        };

        let body = response.to_string();
        let http = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        if reader.get_mut().write_all(http.as_bytes()).await.is_err() {
            return;
        }
    }
}

/// Write a Hardhat artifact for a contract whose constructor takes one address.
#[allow(dead_code)]
pub fn write_athena_artifact(root: &Path) -> PathBuf {
    let dir = root.join("artifacts/contracts/Athena.sol");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("Athena.json");
    fs::write(
        &path,
        r#"{
            "_format": "hh-sol-artifact-1",
            "contractName": "Athena",
            "sourceName": "contracts/Athena.sol",
            "abi": [
                {"type": "constructor", "stateMutability": "nonpayable",
                 "inputs": [{"name": "_usdt", "type": "address", "internalType": "contract IERC20"}]}
            ],
            "bytecode": "0x6080604052348015600e575f80fd5b50",
            "deployedBytecode": "0x",
            "linkReferences": {},
            "deployedLinkReferences": {}
        }"#,
    )
    .unwrap();
    path
}

/// A deployment config pointing at `bsctestnet` through env vars.
#[allow(dead_code)]
pub fn config_toml(rpc_timeout_secs: u64) -> String {
    format!(
        r#"
default_network = "bsctestnet"

[compiler]
version = "0.8.20"

[networks.bsctestnet]
url_env = "BSC_TEST_URL"
accounts_env = "PRIVATE_KEY"
rpc_timeout_secs = {}
poll_interval_ms = 50

[deployment]
contract = "Athena"
artifacts_dir = "artifacts"

[deployment.dependency]
address = "{}"
"#,
        rpc_timeout_secs, USDT_ADDRESS
    )
}
