//! Actor-based host for a token
//!
//! This module implements the single-writer pattern using Tokio actors:
//! - One task owns the [`Token`] and applies calls strictly in mailbox order
//! - Each call runs to completion before the next is taken, so every
//!   operation is atomic with respect to all others
//! - Bounded mailbox gives callers backpressure
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               TokenHandle (Clone)                     │
//! │         Sends messages to actor mailbox               │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              TokenActor (Single Task)                 │
//! │        Token::execute / reads / snapshot              │
//! │                       │                               │
//! │                       ▼                               │
//! │           oneshot reply + metrics                     │
//! └───────────────────────────────────────────────────────┘
//! ```

use crate::metrics::Metrics;
use crate::snapshot::Snapshot;
use crate::types::{Address, Amount, Event, Operation};
use crate::{Error, Result, Token};
use tokio::sync::{mpsc, oneshot};

/// Message sent to the token actor
#[derive(Debug)]
pub enum TokenMessage {
    /// Run a call on behalf of `caller`
    Execute {
        /// Principal making the call
        caller: Address,
        /// The call
        operation: Operation,
        /// Reply with the emitted records or the rejection
        response: oneshot::Sender<Result<Vec<Event>>>,
    },

    /// Read a balance
    BalanceOf {
        /// Account to read
        account: Address,
        /// Reply channel
        response: oneshot::Sender<Amount>,
    },

    /// Read an allowance
    Allowance {
        /// Granting account
        owner: Address,
        /// Allowed spender
        spender: Address,
        /// Reply channel
        response: oneshot::Sender<Amount>,
    },

    /// Read total supply
    TotalSupply {
        /// Reply channel
        response: oneshot::Sender<Amount>,
    },

    /// Read the owner
    Owner {
        /// Reply channel
        response: oneshot::Sender<Address>,
    },

    /// Read mint agent status
    IsMintAgent {
        /// Account to check
        account: Address,
        /// Reply channel
        response: oneshot::Sender<bool>,
    },

    /// Capture a snapshot
    Snapshot {
        /// Reply channel
        response: oneshot::Sender<Snapshot>,
    },

    /// Merkle root of the journal (None when journaling is off)
    JournalRoot {
        /// Reply channel
        response: oneshot::Sender<Option<[u8; 32]>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that owns a token and processes its mailbox
#[derive(Debug)]
pub struct TokenActor {
    /// The token; nothing else holds a reference to it
    token: Token,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<TokenMessage>,

    /// Optional metrics sink
    metrics: Option<Metrics>,
}

impl TokenActor {
    /// Create new actor
    pub fn new(token: Token, mailbox: mpsc::Receiver<TokenMessage>, metrics: Option<Metrics>) -> Self {
        Self {
            token,
            mailbox,
            metrics,
        }
    }

    /// Run the actor event loop until shutdown or until every handle is dropped
    pub async fn run(mut self) -> Token {
        tracing::info!(symbol = %self.token.symbol(), "Token actor started");

        while let Some(msg) = self.mailbox.recv().await {
            if let TokenMessage::Shutdown = msg {
                break;
            }
            self.handle_message(msg);
        }

        tracing::info!(symbol = %self.token.symbol(), "Token actor stopped");
        self.token
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: TokenMessage) {
        match msg {
            TokenMessage::Execute {
                caller,
                operation,
                response,
            } => {
                let name = operation.name();
                let result = self.token.execute(&caller, operation);

                if let Some(metrics) = &self.metrics {
                    match &result {
                        Ok(events) => metrics.record_commit(name, events.len()),
                        Err(e) => metrics.record_rejection(name, e.kind()),
                    }
                }

                if response.send(result).is_err() {
                    tracing::error!(operation = name, "Caller went away before the reply");
                }
            }

            TokenMessage::BalanceOf { account, response } => {
                let _ = response.send(self.token.balance_of(&account));
            }

            TokenMessage::Allowance {
                owner,
                spender,
                response,
            } => {
                let _ = response.send(self.token.allowance(&owner, &spender));
            }

            TokenMessage::TotalSupply { response } => {
                let _ = response.send(self.token.total_supply());
            }

            TokenMessage::Owner { response } => {
                let _ = response.send(self.token.owner());
            }

            TokenMessage::IsMintAgent { account, response } => {
                let _ = response.send(self.token.is_mint_agent(&account));
            }

            TokenMessage::Snapshot { response } => {
                let _ = response.send(self.token.snapshot());
            }

            TokenMessage::JournalRoot { response } => {
                let _ = response.send(self.token.journal().map(|j| j.merkle_root()));
            }

            TokenMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone, Debug)]
pub struct TokenHandle {
    sender: mpsc::Sender<TokenMessage>,
}

impl TokenHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<TokenMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> TokenMessage) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Run a call on behalf of `caller`
    pub async fn execute(&self, caller: Address, operation: Operation) -> Result<Vec<Event>> {
        self.request(|response| TokenMessage::Execute {
            caller,
            operation,
            response,
        })
        .await?
    }

    /// Balance of `account`
    pub async fn balance_of(&self, account: Address) -> Result<Amount> {
        self.request(|response| TokenMessage::BalanceOf { account, response })
            .await
    }

    /// Allowance `owner` granted `spender`
    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<Amount> {
        self.request(|response| TokenMessage::Allowance {
            owner,
            spender,
            response,
        })
        .await
    }

    /// Total supply
    pub async fn total_supply(&self) -> Result<Amount> {
        self.request(|response| TokenMessage::TotalSupply { response })
            .await
    }

    /// Current owner
    pub async fn owner(&self) -> Result<Address> {
        self.request(|response| TokenMessage::Owner { response }).await
    }

    /// Whether `account` is a mint agent
    pub async fn is_mint_agent(&self, account: Address) -> Result<bool> {
        self.request(|response| TokenMessage::IsMintAgent { account, response })
            .await
    }

    /// Capture a snapshot
    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.request(|response| TokenMessage::Snapshot { response })
            .await
    }

    /// Merkle root of the audit journal
    pub async fn journal_root(&self) -> Result<Option<[u8; 32]>> {
        self.request(|response| TokenMessage::JournalRoot { response })
            .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(TokenMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the token actor on the current Tokio runtime
///
/// The returned join handle yields the token once the actor stops.
pub fn spawn_token_actor(
    token: Token,
    mailbox_capacity: usize,
    metrics: Option<Metrics>,
) -> (TokenHandle, tokio::task::JoinHandle<Token>) {
    let (tx, rx) = mpsc::channel(mailbox_capacity.max(1));
    let actor = TokenActor::new(token, rx, metrics);

    let task = tokio::spawn(actor.run());

    (TokenHandle::new(tx), task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    const OWNER: Address = Address::from_low_u64(1);
    const ALICE: Address = Address::from_low_u64(2);
    const BOB: Address = Address::from_low_u64(3);

    fn spawn(metrics: Option<Metrics>) -> (TokenHandle, tokio::task::JoinHandle<Token>) {
        let token = Token::new(OWNER, &Config::default()).unwrap();
        spawn_token_actor(token, 16, metrics)
    }

    #[tokio::test]
    async fn test_actor_spawn_and_shutdown() {
        let (handle, task) = spawn(None);
        handle.shutdown().await.unwrap();

        let token = task.await.unwrap();
        assert_eq!(token.owner(), OWNER);
    }

    #[tokio::test]
    async fn test_actor_execute_and_read() {
        let (handle, _task) = spawn(None);

        let events = handle
            .execute(OWNER, Operation::Mint { to: ALICE, amount: Amount::from(100u64) })
            .await
            .unwrap();
        assert_eq!(events.len(), 2);

        handle
            .execute(ALICE, Operation::Transfer { to: BOB, amount: Amount::from(30u64) })
            .await
            .unwrap();

        assert_eq!(handle.balance_of(ALICE).await.unwrap(), Amount::from(70u64));
        assert_eq!(handle.balance_of(BOB).await.unwrap(), Amount::from(30u64));
        assert_eq!(handle.total_supply().await.unwrap(), Amount::from(100u64));
        assert_eq!(handle.owner().await.unwrap(), OWNER);
        assert!(handle.is_mint_agent(OWNER).await.unwrap());
        assert!(handle.journal_root().await.unwrap().is_some());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_reports_rejections() {
        let metrics = Metrics::new().unwrap();
        let (handle, _task) = spawn(Some(metrics.clone()));

        let result = handle
            .execute(ALICE, Operation::Mint { to: ALICE, amount: Amount::from(1u64) })
            .await;
        assert_eq!(result, Err(Error::Unauthorized));

        handle
            .execute(OWNER, Operation::Approve { spender: BOB, amount: Amount::from(5u64) })
            .await
            .unwrap();

        assert_eq!(metrics.rejected.with_label_values(&["mint", "unauthorized"]).get(), 1);
        assert_eq!(metrics.committed.with_label_values(&["approve"]).get(), 1);
        assert_eq!(handle.allowance(OWNER, BOB).await.unwrap(), Amount::from(5u64));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_serialized() {
        let (handle, _task) = spawn(None);
        handle
            .execute(OWNER, Operation::Mint { to: ALICE, amount: Amount::from(1_000u64) })
            .await
            .unwrap();

        let mut joins = Vec::new();
        for i in 0..50u64 {
            let handle = handle.clone();
            joins.push(tokio::spawn(async move {
                handle
                    .execute(
                        ALICE,
                        Operation::Transfer {
                            to: Address::from_low_u64(100 + i),
                            amount: Amount::from(10u64),
                        },
                    )
                    .await
            }));
        }
        for join in joins {
            join.await.unwrap().unwrap();
        }

        assert_eq!(handle.balance_of(ALICE).await.unwrap(), Amount::from(500u64));
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.journal_next_sequence, 51);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_mailbox() {
        let (handle, task) = spawn(None);
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        let result = handle.total_supply().await;
        assert!(matches!(result, Err(Error::Concurrency(_))));
    }
}
