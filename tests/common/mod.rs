//! Shared fakes and a mock HTTP backend for integration tests.
#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, TxHash, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use relayed_mint::blockchain::abi::IERC20;
use relayed_mint::blockchain::{
    BlockchainError, BlockchainResult, ChainId, ChainProvider, PlainTransaction, Receipt,
    SentTransaction, TransactionSender,
};
use relayed_mint::directory::{DirectoryError, DirectoryPublisher};
use relayed_mint::relayer::{
    FeeOption, FeeQuote, FeeToken, FeeTokenType, MetaTxnId, RelayerError, SignedBatch,
    SmartWallet, Submission, Transaction, WalletConfig, WalletDeployment,
};

pub const WALLET: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const TARGET: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
pub const PAYEE: Address = address!("fefefefefefefefefefefefefefefefefefefefe");
pub const FACTORY: Address = address!("faa5c0b14d1bed5c888ca655b9a8a5911f78ef4a");
pub const USDC: Address = address!("75faf114eafb1bdbe2f0316df893fd58ce46aa4d");

pub fn receipt(status: u64) -> Receipt {
    Receipt {
        tx_hash: TxHash::repeat_byte(0x11),
        status,
    }
}

pub fn native_option(symbol: &str, value: Option<u64>) -> FeeOption {
    FeeOption {
        token: FeeToken {
            symbol: symbol.to_string(),
            ..FeeToken::default()
        },
        to: Some(PAYEE),
        value: value.map(U256::from),
        gas_limit: None,
    }
}

pub fn erc20_option(symbol: &str, token: Address, value: u64) -> FeeOption {
    FeeOption {
        token: FeeToken {
            symbol: symbol.to_string(),
            kind: FeeTokenType::Erc20Token,
            contract_address: Some(token),
            decimals: Some(6),
            ..FeeToken::default()
        },
        to: Some(PAYEE),
        value: Some(U256::from(value)),
        gas_limit: None,
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// In-memory chain with fixed balances.
#[derive(Default)]
pub struct FakeChain {
    pub native_balance: U256,
    pub token_balances: HashMap<Address, U256>,
    pub fail_reads: bool,
    pub balance_reads: AtomicUsize,
}

impl FakeChain {
    pub fn with_native(balance: u64) -> Self {
        Self {
            native_balance: U256::from(balance),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: Address, balance: u64) -> Self {
        self.token_balances.insert(token, U256::from(balance));
        self
    }

    pub fn reads(&self) -> usize {
        self.balance_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainProvider for FakeChain {
    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        Ok(ChainId(421614))
    }

    async fn balance_at(&self, _address: Address) -> BlockchainResult<U256> {
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(BlockchainError::Rpc("connection refused".into()));
        }
        Ok(self.native_balance)
    }

    async fn call_contract(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes> {
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(BlockchainError::Rpc("connection refused".into()));
        }
        let call = IERC20::balanceOfCall::abi_decode(&data)
            .map_err(|e| BlockchainError::Decode(e.to_string()))?;
        assert_eq!(call.account, WALLET);
        match self.token_balances.get(&to) {
            Some(balance) => Ok(balance.abi_encode().into()),
            // Not a contract: empty return data.
            None => Ok(Bytes::new()),
        }
    }

    async fn code_at(&self, _address: Address) -> BlockchainResult<Bytes> {
        Ok(Bytes::new())
    }
}

// ---------------------------------------------------------------------------
// Smart wallet
// ---------------------------------------------------------------------------

/// How the fake relayer resolves a submission.
#[derive(Debug, Clone, Copy)]
pub enum ReceiptPlan {
    After(Duration, u64),
    Never,
}

pub struct FakeWallet {
    pub deployed: Arc<AtomicBool>,
    pub options: Vec<FeeOption>,
    pub quote: Option<FeeQuote>,
    pub plan: ReceiptPlan,
    pub submitted: Mutex<Vec<(Vec<Transaction>, Option<FeeQuote>)>>,
    pub receipt_completed: Arc<AtomicBool>,
}

impl FakeWallet {
    pub fn new(deployed: bool, options: Vec<FeeOption>) -> Self {
        Self {
            deployed: Arc::new(AtomicBool::new(deployed)),
            options,
            quote: Some(FeeQuote("quote-1".to_string())),
            plan: ReceiptPlan::After(Duration::from_millis(10), 1),
            submitted: Mutex::new(Vec::new()),
            receipt_completed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_plan(mut self, plan: ReceiptPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn submissions(&self) -> Vec<(Vec<Transaction>, Option<FeeQuote>)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmartWallet for FakeWallet {
    fn address(&self) -> Address {
        WALLET
    }

    fn config(&self) -> WalletConfig {
        WalletConfig::single_owner(Address::repeat_byte(0x01))
    }

    fn deployment(&self) -> Result<WalletDeployment, RelayerError> {
        Ok(WalletDeployment {
            factory: FACTORY,
            data: Bytes::from_static(&[0x32, 0xc0, 0x2a, 0x14]),
        })
    }

    async fn is_deployed(&self) -> Result<bool, RelayerError> {
        Ok(self.deployed.load(Ordering::SeqCst))
    }

    async fn fee_options(
        &self,
        _txs: &[Transaction],
    ) -> Result<(Vec<FeeOption>, Option<FeeQuote>), RelayerError> {
        Ok((self.options.clone(), self.quote.clone()))
    }

    async fn sign_transactions(&self, txs: Vec<Transaction>) -> Result<SignedBatch, RelayerError> {
        Ok(SignedBatch {
            wallet: WALLET,
            chain_id: 421614,
            nonce: U256::ZERO,
            transactions: txs,
            digest: Default::default(),
            signature: Bytes::from_static(&[0u8; 74]),
        })
    }

    async fn send_transactions(
        &self,
        signed: SignedBatch,
        quote: Option<FeeQuote>,
    ) -> Result<Submission, RelayerError> {
        self.submitted
            .lock()
            .unwrap()
            .push((signed.transactions, quote));

        let plan = self.plan;
        let completed = self.receipt_completed.clone();
        Ok(Submission {
            meta_txn_id: MetaTxnId("0xmeta".to_string()),
            wait: Box::pin(async move {
                match plan {
                    ReceiptPlan::After(delay, status) => {
                        tokio::time::sleep(delay).await;
                        completed.store(true, Ordering::SeqCst);
                        Ok::<_, RelayerError>(receipt(status))
                    }
                    ReceiptPlan::Never => std::future::pending::<Result<Receipt, RelayerError>>().await,
                }
            }),
        })
    }
}

// ---------------------------------------------------------------------------
// Deployer and directory
// ---------------------------------------------------------------------------

/// Owner key stand-in; a successful deployment flips the shared flag.
pub struct FakeDeployer {
    pub deployed: Arc<AtomicBool>,
    pub status: u64,
    pub takes_effect: bool,
    pub sent: Mutex<Vec<PlainTransaction>>,
}

impl FakeDeployer {
    pub fn for_wallet(wallet: &FakeWallet) -> Self {
        Self {
            deployed: wallet.deployed.clone(),
            status: 1,
            takes_effect: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<PlainTransaction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSender for FakeDeployer {
    fn address(&self) -> Address {
        Address::repeat_byte(0x01)
    }

    async fn send_transaction(&self, tx: PlainTransaction) -> BlockchainResult<SentTransaction> {
        self.sent.lock().unwrap().push(tx);
        if self.status == 1 && self.takes_effect {
            self.deployed.store(true, Ordering::SeqCst);
        }
        let status = self.status;
        Ok(SentTransaction {
            tx_hash: TxHash::repeat_byte(0xde),
            wait: Box::pin(async move { Ok::<_, BlockchainError>(receipt(status)) }),
        })
    }
}

#[derive(Default)]
pub struct FakeDirectory {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl DirectoryPublisher for FakeDirectory {
    async fn publish(&self, _wallet: Address, _config: &WalletConfig) -> Result<(), DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DirectoryError::Rejected {
                status: 409,
                message: "config already exists".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Mock HTTP backend
// ---------------------------------------------------------------------------

/// A request seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: serde_json::Value,
}

/// Start a mock JSON backend on an ephemeral port. `handler` maps each
/// request to a status code and body.
pub async fn start_json_backend<F, Fut>(handler: F) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let log = recorded.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let handler = handler.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                log.lock().unwrap().push(request.clone());

                let (status, body) = handler(request).await;
                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    401 => "401 Unauthorized",
                    409 => "409 Conflict",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, recorded)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let path = request_line.split_whitespace().nth(1)?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = serde_json::from_slice(&buf[header_end..]).unwrap_or(serde_json::Value::Null);
    Some(RecordedRequest {
        path,
        headers,
        body,
    })
}
