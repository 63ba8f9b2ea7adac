use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

/// Producer half of the payload hand-off; clone it into network threads.
#[derive(Clone, Debug)]
pub struct PayloadSender {
    tx: Sender<Vec<u8>>,
}

/// Consumer half, drained on the thread that owns the terrain.
#[derive(Debug)]
pub struct PayloadReceiver {
    rx: Receiver<Vec<u8>>,
}

/// Unbounded FIFO of raw layer payloads.
pub fn payload_channel() -> (PayloadSender, PayloadReceiver) {
    let (tx, rx) = unbounded();
    (PayloadSender { tx }, PayloadReceiver { rx })
}

impl PayloadSender {
    /// Returns false once the receiver is gone.
    pub fn send(&self, payload: impl Into<Vec<u8>>) -> bool {
        self.tx.send(payload.into()).is_ok()
    }
}

impl PayloadReceiver {
    /// Next queued payload without blocking.
    pub fn try_next(&self) -> Option<Vec<u8>> {
        match self.rx.try_recv() {
            Ok(p) => Some(p),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
