use crate::{CallOptions, EventHandler, ResultConsumer};
use callmux::connection::ServiceConnection;
use callmux::session::Session;
use callmux::wire::{Invocation, SessionId};
use callmux_rpc_service::{EventItem, RpcEvent};
use std::sync::Arc;

/// Issues a call to method `E` over `connection`.
///
/// Allocates a session, registers its handler (and deadline, if any) before
/// the invocation leaves, so that even an immediate reply finds it. Returns
/// the session ID together with the consumer for the call's results.
pub fn call_event<E: RpcEvent>(
    connection: &Arc<ServiceConnection>,
    args: E::Args,
    options: CallOptions,
) -> (SessionId, ResultConsumer<EventItem<E>>) {
    let (handler, consumer) = EventHandler::<E>::new();

    let session_id = connection.allocate_session_id();
    let mut session = Session::new(connection, session_id, Box::new(handler));

    if let Some(timeout) = options.timeout {
        session.set_timeout(timeout);
    }

    connection.register(session);

    tracing::trace!(session_id, method = E::METHOD_NAME, "invoking remote method");

    connection.send_invocation(&Invocation {
        session_id,
        method_id: E::METHOD_ID,
        args: E::encode_args(args),
    });

    (session_id, consumer)
}

/// Lets call sites write `Locate::call(&connection, args, options)`.
pub trait RpcCall: RpcEvent + Sized {
    fn call(
        connection: &Arc<ServiceConnection>,
        args: Self::Args,
        options: CallOptions,
    ) -> (SessionId, ResultConsumer<EventItem<Self>>);
}

impl<T> RpcCall for T
where
    T: RpcEvent,
{
    fn call(
        connection: &Arc<ServiceConnection>,
        args: Self::Args,
        options: CallOptions,
    ) -> (SessionId, ResultConsumer<EventItem<Self>>) {
        call_event::<T>(connection, args, options)
    }
}
