#![allow(dead_code)]

use callmux::connection::ServiceConnection;
use callmux::error::ServiceError;
use callmux::session::{ManualClock, ServiceHandler};
use callmux::wire::Envelope;
use std::sync::{Arc, Mutex};

/// Everything a `RecordingHandler` was handed, shared with the test body.
#[derive(Default)]
pub struct Recorded {
    pub messages: Vec<Envelope>,
    pub errors: Vec<ServiceError>,
}

pub type SharedRecord = Arc<Mutex<Recorded>>;

/// Handler that records deliveries and turns terminal after an error or a
/// terminal tag, mimicking a real producer.
pub struct RecordingHandler {
    record: SharedRecord,
    terminated: bool,
}

impl RecordingHandler {
    pub fn new() -> (Box<Self>, SharedRecord) {
        let record = SharedRecord::default();
        let handler = Box::new(Self {
            record: record.clone(),
            terminated: false,
        });
        (handler, record)
    }
}

impl ServiceHandler for RecordingHandler {
    fn handle_message(&mut self, envelope: &Envelope) {
        if self.terminated {
            return;
        }
        if envelope.tag.is_terminal() {
            self.terminated = true;
        }
        self.record.lock().unwrap().messages.push(envelope.clone());
    }

    fn error(&mut self, error: ServiceError) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        self.record.lock().unwrap().errors.push(error);
    }

    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// A connection whose outbound frames are collected into `sent`.
pub fn connection_with_clock() -> (Arc<ServiceConnection>, ManualClock, Arc<Mutex<Vec<Vec<u8>>>>) {
    let clock = ManualClock::new();
    let sent = Arc::new(Mutex::new(Vec::new()));

    let connection = ServiceConnection::new(
        {
            let sent = sent.clone();
            move |bytes: Vec<u8>| sent.lock().unwrap().push(bytes)
        },
        Arc::new(clock.clone()),
    );

    (connection, clock, sent)
}
