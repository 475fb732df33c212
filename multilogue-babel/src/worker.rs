//! Model-worker boundary
//!
//! The worker itself (prompt building, network call) lives outside this
//! crate. What lives here is the wire shape of a request and its outcome, the
//! bookkeeping that ties one outcome to one request, and a channel-based link
//! to a worker running on its own task.
//!
//! An [`Exchange`] allows one request in flight per conversation. Each request
//! carries a fresh [`RequestId`]; outcomes echoing another id are refused, and
//! [`Exchange::resolve_against`] refuses a reply when the canonical script was
//! changed by someone else while the worker was busy.

use crate::dialogue::Dialogue;
use crate::error::{MappingError, ParseError};
use crate::formats::messages::{
    append_reply, check_role, from_messages, json_error, Message, WorkerReply,
};
use crate::formats::script::{parse_script, serialize_script, ScriptRules};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Correlation token for one worker request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of the machine participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Display name given to every reply turn
    pub name: String,
    /// Where the worker should send the request, forwarded untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,
}

impl MachineConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            worker: None,
        }
    }
}

/// Generation knobs forwarded to the worker (model, temperature, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build settings from raw string pairs, coercing the numeric knobs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut settings = Self::new();
        for (key, value) in pairs {
            settings.insert_raw(key, value.as_ref());
        }
        settings
    }

    /// Insert a raw string value.
    ///
    /// `temperature` becomes a float and `max_tokens` an integer when the
    /// value parses as one; anything else is kept as a string.
    pub fn insert_raw(&mut self, key: impl Into<String>, raw: &str) {
        let key = key.into();
        let value = coerce(&key, raw);
        self.0.insert(key, value);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Add every entry of `other`, replacing existing keys
    pub fn merge(&mut self, other: Settings) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

fn coerce(key: &str, raw: &str) -> Value {
    let trimmed = raw.trim();
    match key {
        "temperature" => trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        "max_tokens" => trimmed.parse::<u64>().ok().map(Value::from),
        _ => None,
    }
    .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Outbound payload handed to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub id: RequestId,
    pub configuration: MachineConfig,
    pub settings: Settings,
    pub messages: Vec<Message>,
}

impl WorkerRequest {
    pub fn to_json(&self) -> Result<String, MappingError> {
        serde_json::to_string_pretty(self).map_err(json_error)
    }
}

/// What the worker reports back.
///
/// On the wire: `{"type":"success","data":{"role":..,"content":..}}` or
/// `{"type":"error","error":".."}`, with an optional `id` echo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerOutcome {
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<RequestId>,
        data: WorkerReply,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<RequestId>,
        error: String,
    },
}

impl WorkerOutcome {
    pub fn success(id: RequestId, data: WorkerReply) -> Self {
        WorkerOutcome::Success { id: Some(id), data }
    }

    pub fn failure(id: RequestId, error: impl Into<String>) -> Self {
        WorkerOutcome::Error {
            id: Some(id),
            error: error.into(),
        }
    }

    /// Echoed request id, if the worker sent one
    pub fn id(&self) -> Option<RequestId> {
        match self {
            WorkerOutcome::Success { id, .. } | WorkerOutcome::Error { id, .. } => *id,
        }
    }

    pub fn from_json(source: &str) -> Result<Self, MappingError> {
        let value: Value = serde_json::from_str(source).map_err(json_error)?;
        check_role(value.pointer("/data/role"))?;
        serde_json::from_value(value).map_err(json_error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("request {0} is still in flight")]
    Busy(RequestId),
    #[error("nothing to send: the dialogue is empty")]
    NothingToSend,
    #[error("no request in flight")]
    Idle,
    #[error("reply for request {received} does not match request {expected}")]
    Mismatch {
        expected: RequestId,
        received: RequestId,
    },
    #[error("reply for request {0} arrived after the script changed")]
    Stale(RequestId),
    #[error("worker failed: {0}")]
    Worker(String),
    #[error("worker is no longer running")]
    Disconnected,
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug)]
struct Pending {
    id: RequestId,
    messages: Vec<Message>,
    snapshot: Dialogue,
}

/// Request/outcome bookkeeping for one conversation.
#[derive(Debug)]
pub struct Exchange {
    machine: MachineConfig,
    settings: Settings,
    rules: ScriptRules,
    next_id: u64,
    pending: Option<Pending>,
}

impl Exchange {
    pub fn new(machine: MachineConfig, settings: Settings) -> Self {
        Self {
            machine,
            settings,
            rules: ScriptRules::default(),
            next_id: 1,
            pending: None,
        }
    }

    /// Rules used to read the current script in [`Exchange::resolve_against`]
    pub fn with_rules(mut self, rules: ScriptRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn machine(&self) -> &MachineConfig {
        &self.machine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Id of the request currently awaiting an outcome
    pub fn in_flight(&self) -> Option<RequestId> {
        self.pending.as_ref().map(|pending| pending.id)
    }

    /// Start a request for `messages`.
    pub fn begin(&mut self, messages: Vec<Message>) -> Result<WorkerRequest, ExchangeError> {
        if let Some(pending) = &self.pending {
            return Err(ExchangeError::Busy(pending.id));
        }
        if messages.is_empty() {
            return Err(ExchangeError::NothingToSend);
        }
        let snapshot = from_messages(&messages)?;
        if snapshot.is_empty() {
            return Err(ExchangeError::NothingToSend);
        }

        let id = RequestId(self.next_id);
        self.next_id += 1;
        info!(%id, messages = messages.len(), "dispatching worker request");

        let request = WorkerRequest {
            id,
            configuration: self.machine.clone(),
            settings: self.settings.clone(),
            messages: messages.clone(),
        };
        self.pending = Some(Pending {
            id,
            messages,
            snapshot,
        });
        Ok(request)
    }

    /// Apply an outcome to the in-flight request and return the new script.
    ///
    /// A mismatched id leaves the request pending; any other result ends it.
    pub fn resolve(&mut self, outcome: WorkerOutcome) -> Result<String, ExchangeError> {
        self.check(&outcome)?;
        let pending = self.pending.take().ok_or(ExchangeError::Idle)?;
        self.finish(pending, outcome)
    }

    /// Like [`Exchange::resolve`], but refuse the reply when `current_script`
    /// no longer holds the dialogue the request was built from.
    ///
    /// A script that fails to parse leaves the request pending.
    pub fn resolve_against(
        &mut self,
        outcome: WorkerOutcome,
        current_script: &str,
    ) -> Result<String, ExchangeError> {
        self.check(&outcome)?;
        let current = parse_script(current_script, &self.rules)?;
        let pending = self.pending.take().ok_or(ExchangeError::Idle)?;
        if current != pending.snapshot {
            info!(id = %pending.id, "discarding reply for a script that changed meanwhile");
            return Err(ExchangeError::Stale(pending.id));
        }
        self.finish(pending, outcome)
    }

    /// Forget the in-flight request. A late outcome will then be refused.
    pub fn abandon(&mut self) -> Option<RequestId> {
        let id = self.pending.take().map(|pending| pending.id);
        if let Some(id) = id {
            info!(%id, "abandoned worker request");
        }
        id
    }

    fn check(&self, outcome: &WorkerOutcome) -> Result<RequestId, ExchangeError> {
        let expected = self.in_flight().ok_or(ExchangeError::Idle)?;
        match outcome.id() {
            Some(received) if received != expected => {
                debug!(%expected, %received, "ignoring outcome for another request");
                Err(ExchangeError::Mismatch { expected, received })
            }
            _ => Ok(expected),
        }
    }

    fn finish(&self, pending: Pending, outcome: WorkerOutcome) -> Result<String, ExchangeError> {
        match outcome {
            WorkerOutcome::Success { data, .. } => {
                let messages = append_reply(pending.messages, data, &self.machine.name)?;
                let doc = from_messages(&messages)?;
                info!(id = %pending.id, turns = doc.len(), "worker reply appended");
                Ok(serialize_script(&doc))
            }
            WorkerOutcome::Error { error, .. } => {
                info!(id = %pending.id, %error, "worker reported an error");
                Err(ExchangeError::Worker(error))
            }
        }
    }
}

/// Something that answers worker requests, usually by calling a model API.
pub trait Worker: Send + 'static {
    fn handle(&mut self, request: WorkerRequest) -> impl Future<Output = WorkerOutcome> + Send;
}

type Job = (WorkerRequest, oneshot::Sender<WorkerOutcome>);

/// Handle to a worker running on its own task.
///
/// Requests are queued and handled one at a time. There is no timeout and no
/// cancellation: dropping a receiver only discards that outcome.
#[derive(Debug, Clone)]
pub struct WorkerLink {
    sender: mpsc::UnboundedSender<Job>,
}

impl WorkerLink {
    /// Spawn `worker` on the current tokio runtime
    pub fn spawn<W: Worker>(mut worker: W) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some((request, reply)) = receiver.recv().await {
                let id = request.id;
                let outcome = worker.handle(request).await;
                if reply.send(outcome).is_err() {
                    debug!(%id, "requester went away, dropping outcome");
                }
            }
            debug!("worker link closed");
        });
        Self { sender }
    }

    pub fn submit(
        &self,
        request: WorkerRequest,
    ) -> Result<oneshot::Receiver<WorkerOutcome>, ExchangeError> {
        let (reply, outcome) = oneshot::channel();
        self.sender
            .send((request, reply))
            .map_err(|_| ExchangeError::Disconnected)?;
        Ok(outcome)
    }
}
