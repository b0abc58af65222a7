use serde_json::{Value, json};
use tokio::{
    sync::mpsc::{Receiver, Sender, channel},
    task::JoinHandle,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEvent {
    LoginSuccessful { email: String },
    LoginFailed { email: String },
    Logout,
    UserAdded { email: String, name: String },
    UserEdited { id: u64, email: String, name: String },
    UserDeleted { id: u64, email: String, name: String },
}

impl TrackEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackEvent::LoginSuccessful { .. } => "Login Successful",
            TrackEvent::LoginFailed { .. } => "Login Failed",
            TrackEvent::Logout => "Logout",
            TrackEvent::UserAdded { .. } => "User Added",
            TrackEvent::UserEdited { .. } => "User Edited",
            TrackEvent::UserDeleted { .. } => "User Deleted",
        }
    }

    pub fn properties(&self) -> Value {
        match self {
            TrackEvent::LoginSuccessful { email } => json!({ "email": email }),
            TrackEvent::LoginFailed { email } => {
                json!({ "email": email, "reason": "Invalid credentials" })
            }
            TrackEvent::Logout => json!({}),
            TrackEvent::UserAdded { email, name } => {
                json!({ "userEmail": email, "userName": name })
            }
            TrackEvent::UserEdited { id, email, name }
            | TrackEvent::UserDeleted { id, email, name } => {
                json!({ "userId": id, "userEmail": email, "userName": name })
            }
        }
    }
}

/// Fire-and-forget receiver of dashboard events. Implementations must never
/// block the caller and must swallow delivery failures.
pub trait EventSink {
    fn track(&self, event: TrackEvent);
}

#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<TrackEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<TrackEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn track(&self, event: TrackEvent) {
        // Full or closed channel: the event is dropped
        if let Err(e) = self.sender.try_send(event) {
            tracing::debug!("Tracking event dropped: {}", e);
        }
    }
}

/// Starts the background tracker. The task ends once every sink is dropped and
/// yields the number of events it handled.
pub fn spawn_tracker(capacity: usize) -> (ChannelSink, JoinHandle<usize>) {
    let (sender, receiver) = channel::<TrackEvent>(capacity.max(1));
    let handle = tokio::spawn(run_tracker(receiver));

    (ChannelSink::new(sender), handle)
}

async fn run_tracker(mut receiver: Receiver<TrackEvent>) -> usize {
    let mut delivered = 0;
    while let Some(event) = receiver.recv().await {
        let event_id = Uuid::now_v7();
        let properties = event.properties();
        tracing::info!(
            target: "tracking",
            %event_id,
            %properties,
            "{}",
            event.name()
        );
        delivered += 1;
    }

    tracing::debug!("Tracker stopped after {} events", delivered);
    delivered
}
