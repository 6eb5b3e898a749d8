//! Bounded outbound queue drained with a minimum spacing between sends.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use wire::OutboundMessage;

use crate::collaborators::Transport;
use crate::error::{SessionError, SessionResult};
use crate::session::SimulatorRegistry;

#[derive(Debug)]
struct Outgoing {
    message: OutboundMessage,
    reliable: bool,
    delivered: Option<oneshot::Sender<SessionResult<()>>>,
}

/// Handle for queueing outbound messages.
///
/// Messages are refused with [`SessionError::NoSimulator`] while no
/// simulator is connected.
#[derive(Debug, Clone)]
pub struct Outbox {
    sender: mpsc::Sender<Outgoing>,
    simulators: SimulatorRegistry,
}

impl Outbox {
    /// Starts the drain task. It stops when `shutdown` turns `true` or every
    /// handle is dropped.
    pub fn spawn(
        transport: Arc<dyn Transport>,
        simulators: SimulatorRegistry,
        capacity: usize,
        spacing: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(drain(transport, receiver, spacing, shutdown));
        (Self { sender, simulators }, task)
    }

    fn check_open(&self) -> SessionResult<()> {
        if self.sender.is_closed() {
            return Err(SessionError::Disconnected);
        }
        if !self.simulators.has_connected() {
            return Err(SessionError::NoSimulator);
        }
        Ok(())
    }

    /// Queues a message without waiting. Transport failures after queueing
    /// are only logged.
    pub fn try_send(&self, message: OutboundMessage, reliable: bool) -> SessionResult<()> {
        self.check_open()?;
        self.sender
            .try_send(Outgoing {
                message,
                reliable,
                delivered: None,
            })
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => SessionError::QueueFull { queue: "outbound" },
                mpsc::error::TrySendError::Closed(_) => SessionError::Disconnected,
            })
    }

    /// Queues a message and waits until the transport has taken it,
    /// returning the transport's error if it refused.
    pub async fn send(&self, message: OutboundMessage, reliable: bool) -> SessionResult<()> {
        self.check_open()?;
        let (delivered, receipt) = oneshot::channel();
        self.sender
            .send(Outgoing {
                message,
                reliable,
                delivered: Some(delivered),
            })
            .await
            .map_err(|_| SessionError::Disconnected)?;
        receipt.await.unwrap_or(Err(SessionError::Disconnected))
    }
}

async fn drain(
    transport: Arc<dyn Transport>,
    mut receiver: mpsc::Receiver<Outgoing>,
    spacing: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let outgoing = tokio::select! {
            item = receiver.recv() => match item {
                Some(item) => item,
                None => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        };

        let name = outgoing.message.name();
        let result = transport.send(outgoing.message, outgoing.reliable);
        match &result {
            Ok(()) => debug!(message = name, "sent"),
            Err(err) => warn!(message = name, error = %err, "send failed"),
        }
        if let Some(delivered) = outgoing.delivered {
            let _ = delivered.send(result);
        }
        if !spacing.is_zero() {
            tokio::time::sleep(spacing).await;
        }
    }
    debug!("outbox stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::time::Instant;
    use uuid::Uuid;
    use wire::DecodeLimits;

    use super::*;
    use crate::collaborators::IdentityProvider;
    use crate::events::EventBus;
    use crate::simulator::Simulator;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(&'static str, Instant)>>,
        refuse: bool,
    }

    impl Transport for Recorder {
        fn send(&self, message: OutboundMessage, _reliable: bool) -> SessionResult<()> {
            if self.refuse {
                return Err(SessionError::Transport("socket closed".into()));
            }
            self.sent.lock().unwrap().push((message.name(), Instant::now()));
            Ok(())
        }
    }

    struct Nobody;

    impl IdentityProvider for Nobody {
        fn agent_id(&self) -> Uuid {
            Uuid::nil()
        }

        fn session_id(&self) -> Uuid {
            Uuid::nil()
        }

        fn local_id(&self) -> u32 {
            0
        }

        fn set_local_id(&self, _local_id: u32) {}
    }

    fn connected() -> SimulatorRegistry {
        let simulators = SimulatorRegistry::new();
        simulators.insert(Arc::new(Simulator::new(
            1,
            DecodeLimits::default(),
            EventBus::new(4),
            Arc::new(Nobody),
        )));
        simulators
    }

    fn request() -> OutboundMessage {
        OutboundMessage::AgentWearablesRequest {
            agent_id: Uuid::nil(),
            session_id: Uuid::nil(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sends_are_spaced() {
        let transport = Arc::new(Recorder::default());
        let (_tx, shutdown) = watch::channel(false);
        let (outbox, task) = Outbox::spawn(
            transport.clone(),
            connected(),
            4,
            Duration::from_millis(100),
            shutdown,
        );
        for _ in 0..3 {
            outbox.send(request(), true).await.unwrap();
        }
        drop(outbox);
        task.await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        for pair in sent.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= Duration::from_millis(100));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn full_queue_is_reported() {
        let transport = Arc::new(Recorder::default());
        let (stop, shutdown) = watch::channel(false);
        let (outbox, task) =
            Outbox::spawn(transport, connected(), 1, Duration::from_secs(10), shutdown);
        let mut saw_full = false;
        for _ in 0..4 {
            if matches!(
                outbox.try_send(request(), true),
                Err(SessionError::QueueFull { .. })
            ) {
                saw_full = true;
            }
        }
        assert!(saw_full);
        stop.send(true).unwrap();
        task.await.unwrap();
        assert!(matches!(
            outbox.try_send(request(), true),
            Err(SessionError::Disconnected)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn refused_without_a_simulator() {
        let transport = Arc::new(Recorder::default());
        let (_tx, shutdown) = watch::channel(false);
        let simulators = SimulatorRegistry::new();
        let (outbox, _task) =
            Outbox::spawn(transport.clone(), simulators.clone(), 4, Duration::ZERO, shutdown);
        assert!(matches!(outbox.try_send(request(), true), Err(SessionError::NoSimulator)));
        assert!(matches!(outbox.send(request(), true).await, Err(SessionError::NoSimulator)));

        let simulator = Arc::new(Simulator::new(
            7,
            DecodeLimits::default(),
            EventBus::new(4),
            Arc::new(Nobody),
        ));
        simulators.insert(simulator.clone());
        outbox.send(request(), true).await.unwrap();
        simulator.disconnect();
        assert!(matches!(outbox.try_send(request(), true), Err(SessionError::NoSimulator)));
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_reach_the_sender() {
        let transport = Arc::new(Recorder {
            refuse: true,
            ..Recorder::default()
        });
        let (_tx, shutdown) = watch::channel(false);
        let (outbox, _task) = Outbox::spawn(transport, connected(), 4, Duration::ZERO, shutdown);
        assert!(matches!(
            outbox.send(request(), true).await,
            Err(SessionError::Transport(reason)) if reason == "socket closed"
        ));
        outbox.try_send(request(), true).unwrap();
    }
}
