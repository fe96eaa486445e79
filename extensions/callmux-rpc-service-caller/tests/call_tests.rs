use callmux::connection::ServiceConnection;
use callmux::error::{ServiceError, ServiceErrorKind};
use callmux::session::{ManualClock, Session, TokioTimerFactory};
use callmux::wire::{Envelope, EnvelopeCodec, InvocationCodec};
use callmux_rpc_service::RpcEvent;
use callmux_rpc_service_caller::{CallOptions, EventHandler, RpcCall};
use example_callmux_rpc_service_definition::locator::{Locate, NodeInfo, Ping, Subscribe};
use futures::FutureExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Outbound = Arc<Mutex<Vec<Vec<u8>>>>;

fn connection_with_clock() -> (Arc<ServiceConnection>, ManualClock, Outbound) {
    let clock = ManualClock::new();
    let outbound: Outbound = Arc::default();

    let connection = ServiceConnection::new(
        {
            let outbound = outbound.clone();
            move |bytes: Vec<u8>| outbound.lock().unwrap().push(bytes)
        },
        Arc::new(clock.clone()),
    );

    (connection, clock, outbound)
}

fn deliver(connection: &ServiceConnection, envelope: Envelope) {
    connection.read_bytes(&EnvelopeCodec::encode(&envelope)).unwrap();
}

#[tokio::test]
async fn value_call_yields_exactly_one_result() {
    let (connection, _clock, _) = connection_with_clock();
    let (handler, mut consumer) = EventHandler::<Locate>::new();
    connection.register(Session::new(&connection, 7, Box::new(handler)));

    deliver(&connection, Envelope::encode_chunk(7, &(42i32, "ok".to_string())));

    assert_eq!(consumer.recv().await, Ok(Some((42, "ok".to_string()))));
    // No choke yet: the session stays open and the next read waits.
    assert!(consumer.recv().now_or_never().is_none());
    assert!(connection.contains(7));
}

#[test]
fn call_times_out_when_no_reply_arrives() {
    let (connection, clock, _) = connection_with_clock();
    let options = CallOptions::new().with_timeout(Duration::from_millis(10));

    let (id, mut consumer) = Locate::call(&connection, "storage".into(), options);
    assert!(connection.contains(id));

    assert_eq!(clock.advance(Duration::from_millis(10)), 1);

    let error = consumer.recv().now_or_never().unwrap().unwrap_err();
    assert_eq!(
        error,
        ServiceError::Timeout {
            after: Duration::from_millis(10)
        }
    );
    assert_eq!(connection.reap_stopped(), 1);
    assert!(!connection.contains(id));
}

#[test]
fn reply_before_deadline_survives_the_deadline() {
    let (connection, clock, _) = connection_with_clock();
    let options = CallOptions::new().with_timeout(Duration::from_millis(10));

    let (id, consumer) = Subscribe::call(&connection, "nodes".into(), options);

    deliver(&connection, Envelope::encode_chunk(id, "joined"));
    deliver(&connection, Envelope::choke(id));

    // The session was dropped on choke, which disarmed its deadline.
    assert_eq!(clock.pending_count(), 0);
    assert_eq!(clock.advance(Duration::from_secs(1)), 0);

    assert_eq!(
        consumer.collect_values().now_or_never().unwrap(),
        Ok(vec!["joined".to_string()])
    );
}

#[test]
fn remote_error_is_final() {
    let (connection, _clock, _) = connection_with_clock();

    let (id, mut consumer) = Locate::call(&connection, "missing".into(), CallOptions::new());

    deliver(&connection, Envelope::error(id, 42, "denied"));
    assert!(!connection.contains(id));

    // Arrives after the error; nobody is listening for it anymore.
    let late = Envelope::encode_chunk(id, &(1i32, "late".to_string()));
    assert_eq!(connection.read_bytes(&EnvelopeCodec::encode(&late)), Ok(0));

    let error = consumer.recv().now_or_never().unwrap().unwrap_err();
    assert_eq!(
        error,
        ServiceError::Remote {
            code: 42,
            message: "denied".into()
        }
    );
    assert_eq!(error.kind(), ServiceErrorKind::Remote);
}

#[test]
fn streaming_call_yields_every_chunk_then_ends() {
    let (connection, _clock, _) = connection_with_clock();

    let (id, consumer) = Subscribe::call(&connection, "events".into(), CallOptions::new());

    let mut bytes = Vec::new();
    for note in ["a", "b", "c"] {
        bytes.extend(EnvelopeCodec::encode(&Envelope::encode_chunk(id, note)));
    }
    bytes.extend(EnvelopeCodec::encode(&Envelope::choke(id)));

    // One read spanning all four frames.
    assert_eq!(connection.read_bytes(&bytes), Ok(4));
    assert_eq!(connection.session_count(), 0);

    assert_eq!(
        consumer.collect_values().now_or_never().unwrap(),
        Ok(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
}

#[test]
fn no_value_call_completes_on_choke() {
    let (connection, _clock, _) = connection_with_clock();

    let (id, mut consumer) = Ping::call(&connection, (), CallOptions::new());

    deliver(&connection, Envelope::chunk(id, b"ignored".to_vec()));
    assert!(connection.contains(id));
    assert!(consumer.recv().now_or_never().is_none());

    deliver(&connection, Envelope::choke(id));
    assert!(!connection.contains(id));
    assert_eq!(consumer.recv().now_or_never().unwrap(), Ok(None));
}

#[test]
fn undecodable_reply_fails_the_call() {
    let (connection, _clock, _) = connection_with_clock();

    let (id, mut consumer) = NodeInfo::call(&connection, (), CallOptions::new());

    deliver(&connection, Envelope::chunk(id, vec![1, 2, 3]));

    // The decode failure left the handler terminal, so the session is gone.
    assert!(!connection.contains(id));
    assert_eq!(
        consumer.recv().now_or_never().unwrap().unwrap_err().kind(),
        ServiceErrorKind::Decode
    );
}

#[test]
fn removed_call_fails_instead_of_completing() {
    let (connection, clock, _) = connection_with_clock();
    let options = CallOptions::new().with_timeout(Duration::from_millis(10));

    let (id, mut consumer) = Locate::call(&connection, "storage".into(), options);
    assert!(connection.remove(id).is_some());

    assert_eq!(clock.pending_count(), 0);
    assert_eq!(
        consumer.recv().now_or_never().unwrap().unwrap_err().kind(),
        ServiceErrorKind::Transport
    );
}

#[test]
fn cancelled_call_fails_instead_of_completing() {
    let (connection, _clock, _) = connection_with_clock();

    let (id, mut consumer) = Ping::call(&connection, (), CallOptions::new());
    connection.with_session(id, |session| session.stop());

    assert!(!connection.contains(id));
    assert_eq!(
        consumer.recv().now_or_never().unwrap().unwrap_err().kind(),
        ServiceErrorKind::Transport
    );
}

#[test]
fn displaced_call_fails_instead_of_completing() {
    let (connection, _clock, _) = connection_with_clock();

    let (id, mut first) = Subscribe::call(&connection, "a".into(), CallOptions::new());
    let (handler, _second) = EventHandler::<Subscribe>::new();
    assert!(connection.register(Session::new(&connection, id, Box::new(handler))).is_some());

    assert_eq!(
        first.recv().now_or_never().unwrap().unwrap_err().kind(),
        ServiceErrorKind::Transport
    );
}

#[test]
fn transport_failure_fails_every_open_call() {
    let (connection, clock, _) = connection_with_clock();
    let options = CallOptions::new().with_default_timeout();

    let (_, mut first) = Locate::call(&connection, "a".into(), options);
    let (_, mut second) = Subscribe::call(&connection, "b".into(), options);
    assert_eq!(clock.pending_count(), 2);

    assert_eq!(
        connection.fail_all(ServiceError::Transport("socket closed".into())),
        2
    );
    assert_eq!(clock.pending_count(), 0);

    for kind in [
        first.recv().now_or_never().unwrap().unwrap_err().kind(),
        second.recv().now_or_never().unwrap().unwrap_err().kind(),
    ] {
        assert_eq!(kind, ServiceErrorKind::Transport);
    }
}

#[test]
fn invocation_frame_carries_method_and_args() {
    let (connection, _clock, outbound) = connection_with_clock();

    let (id, _consumer) = Locate::call(&connection, "storage".into(), CallOptions::new());

    let sent = outbound.lock().unwrap();
    assert_eq!(sent.len(), 1);

    let invocation = InvocationCodec::decode(&sent[0]).unwrap();
    assert_eq!(invocation.session_id, id);
    assert_eq!(invocation.method_id, Locate::METHOD_ID);
    assert_eq!(bitcode::decode::<String>(&invocation.args).unwrap(), "storage");
}

#[tokio::test]
async fn tokio_timer_fails_call_after_deadline() {
    let timers = TokioTimerFactory::try_current().unwrap();
    let connection = ServiceConnection::new(|_bytes: Vec<u8>| {}, Arc::new(timers));
    let options = CallOptions::new().with_timeout(Duration::from_millis(20));

    let (id, mut consumer) = Locate::call(&connection, "slow".into(), options);

    let error = tokio::time::timeout(Duration::from_secs(5), consumer.recv())
        .await
        .expect("call should time out well before the guard")
        .unwrap_err();

    assert_eq!(error.kind(), ServiceErrorKind::Timeout);
    assert_eq!(connection.reap_stopped(), 1);
    assert!(!connection.contains(id));
}

#[tokio::test]
async fn concurrent_calls_resolve_independently() {
    let timers = TokioTimerFactory::try_current().unwrap();
    let connection = ServiceConnection::new(|_bytes: Vec<u8>| {}, Arc::new(timers));

    let (first_id, first) = Subscribe::call(&connection, "x".into(), CallOptions::new());
    let (second_id, second) = Subscribe::call(&connection, "y".into(), CallOptions::new());
    assert_ne!(first_id, second_id);

    let readers = (
        tokio::spawn(first.collect_values()),
        tokio::spawn(second.collect_values()),
    );

    let mut bytes = Vec::new();
    for (id, note) in [(second_id, "y1"), (first_id, "x1"), (second_id, "y2")] {
        bytes.extend(EnvelopeCodec::encode(&Envelope::encode_chunk(id, note)));
    }
    bytes.extend(EnvelopeCodec::encode(&Envelope::choke(first_id)));
    bytes.extend(EnvelopeCodec::encode(&Envelope::error(second_id, 9, "gone")));

    connection.read_bytes(&bytes).unwrap();

    assert_eq!(readers.0.await.unwrap(), Ok(vec!["x1".to_string()]));
    assert_eq!(
        readers.1.await.unwrap(),
        Err(ServiceError::Remote {
            code: 9,
            message: "gone".into()
        })
    );
}
