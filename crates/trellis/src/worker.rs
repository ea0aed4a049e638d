//! Background layout worker
//!
//! Hosts that cannot block on a 500-step solve run the engine on a
//! dedicated thread. The protocol is request and response over channels:
//! each request carries a full graph snapshot, each response a full layout.
//! There is no cancellation; a superseded request still completes and the
//! host drops the stale response by its sequence number.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::core::LayoutConfig;
use crate::graph::GraphSpec;
use crate::solver::{LayoutResult, Solver};

/// A layout job: a full snapshot of the graph plus expansion overrides
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    /// Host-visible sequence number, echoed back on the response
    pub seq: u64,
    pub spec: GraphSpec,
    pub expansion: HashMap<String, bool>,
}

/// The outcome of one layout job
#[derive(Debug)]
pub struct LayoutResponse {
    pub seq: u64,
    pub result: Result<LayoutResult>,
}

/// Handle to the layout thread
///
/// Dropping the handle closes the request channel; the thread drains and
/// exits, and the drop joins it.
#[derive(Debug)]
pub struct LayoutWorker {
    sender: Option<Sender<LayoutRequest>>,
    receiver: Receiver<LayoutResponse>,
    handle: Option<JoinHandle<()>>,
    next_seq: AtomicU64,
}

impl LayoutWorker {
    /// Spawn the worker thread with the given configuration
    pub fn spawn(config: LayoutConfig) -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<LayoutRequest>();
        let (response_tx, response_rx) = mpsc::channel::<LayoutResponse>();
        let handle = thread::Builder::new()
            .name("trellis-layout".into())
            .spawn(move || run(config, request_rx, response_tx))
            .context("failed to spawn layout worker thread")?;
        Ok(Self {
            sender: Some(request_tx),
            receiver: response_rx,
            handle: Some(handle),
            next_seq: AtomicU64::new(0),
        })
    }

    /// Queue a layout job; returns its sequence number
    pub fn submit(&self, spec: GraphSpec, expansion: HashMap<String, bool>) -> Result<u64> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| anyhow!("layout worker is shut down"))?;
        sender
            .send(LayoutRequest { seq, spec, expansion })
            .map_err(|_| anyhow!("layout worker is gone"))?;
        Ok(seq)
    }

    /// Block until the next response arrives
    pub fn recv(&self) -> Result<LayoutResponse> {
        self.receiver
            .recv()
            .map_err(|_| anyhow!("layout worker is gone"))
    }

    /// Submit one job and block for its result
    ///
    /// Responses arrive in submission order, so the next response is the
    /// one for this request.
    pub fn layout(&self, spec: GraphSpec, expansion: HashMap<String, bool>) -> Result<LayoutResult> {
        let seq = self.submit(spec, expansion)?;
        let response = self.recv()?;
        if response.seq != seq {
            return Err(anyhow!(
                "layout response out of order: expected seq {seq}, got {}",
                response.seq
            ));
        }
        response.result
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("layout worker thread panicked");
            }
        }
    }
}

/// Worker loop: solve every request until the host hangs up
fn run(config: LayoutConfig, requests: Receiver<LayoutRequest>, responses: Sender<LayoutResponse>) {
    let solver = Solver::new(config);
    for request in requests {
        debug!(seq = request.seq, nodes = request.spec.nodes.len(), "layout request");
        let result = solver.solve_with_expansion(&request.spec, &request.expansion);
        if responses
            .send(LayoutResponse {
                seq: request.seq,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}
