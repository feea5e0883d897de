//! Host-side GEM handler.
//!
//! `HostHandler` is the dispatch-side application logic for a GEM host: it
//! owns the subscription registry and the report resolver, routes inbound
//! messages by stream/function, and drives the subscription lifecycle through
//! the report-linkage collaborator. Connection management, the wire codec,
//! and outbound request building all live behind the collaborator traits.

use std::sync::Arc;

use tracing::info;

use crate::error::GemResult;
use crate::gem::events::{AlarmNotification, EventSink, GemEvent, TerminalNotification};
use crate::gem::resolver::EventReportResolver;
use crate::gem::router::MessageRouter;
use crate::gem::subscriptions::ReportSubscriptions;
use crate::ids::{CollectionEventId, DataValueId, ReportId, SessionId};
use crate::message::{Alarm, EventReport, Message, Terminal};

/// Server-side report/event linkage collaborator.
///
/// Implementations run the corresponding request/response transactions with
/// the equipment (S2F33 define report, S2F35 link event report, S2F37
/// enable/disable event). The registry itself has no protocol side effects.
pub trait ReportLink: Send + Sync {
    /// Defines `report_id` as the ordered group `data_values` (S2F33).
    fn define_report(&self, report_id: ReportId, data_values: &[DataValueId]) -> GemResult<()>;

    /// Links `report_id` to `collection_event` (S2F35).
    fn link_report(
        &self,
        collection_event: CollectionEventId,
        report_id: ReportId,
    ) -> GemResult<()>;

    /// Enables reporting of `collection_event` (S2F37, CEED true).
    fn enable_event(&self, collection_event: CollectionEventId) -> GemResult<()>;

    /// Disables reporting of all collection events (S2F37, CEED false).
    fn disable_all_events(&self) -> GemResult<()>;

    /// Deletes all report definitions (S2F33 with no reports).
    fn delete_all_reports(&self) -> GemResult<()>;
}

/// Outbound message collaborator for replies this handler produces.
pub trait MessageSender: Send + Sync {
    /// Transmits `message` to the peer named by `origin`.
    fn send(&self, origin: SessionId, message: Message) -> GemResult<()>;
}

/// Host-side message handling and collection-event subscription lifecycle.
pub struct HostHandler {
    subscriptions: Arc<ReportSubscriptions>,
    router: MessageRouter<SessionId>,
    link: Arc<dyn ReportLink>,
    sender: Arc<dyn MessageSender>,
}

impl std::fmt::Debug for HostHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostHandler")
            .field("subscriptions", &self.subscriptions)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

impl HostHandler {
    /// Creates a handler wired to its collaborators and installs the inbound
    /// routes (S6F11 event report, S5F1 alarm, S10F1 terminal).
    #[must_use]
    pub fn new(
        link: Arc<dyn ReportLink>,
        sender: Arc<dyn MessageSender>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let subscriptions = Arc::new(ReportSubscriptions::new());
        let resolver = EventReportResolver::new(Arc::clone(&subscriptions), Arc::clone(&sink));

        let mut router = MessageRouter::new();

        router.register(6, 11, move |origin: &SessionId, message: &Message| {
            let report = EventReport::decode(message)?;
            // Per-block failures are the resolver's to report; the message is
            // acknowledged either way.
            let _ = resolver.process(*origin, &report);
            Ok(Some(Message::event_report_ack()))
        });

        {
            let sink = Arc::clone(&sink);
            router.register(5, 1, move |origin: &SessionId, message: &Message| {
                let alarm = Alarm::decode(message)?;
                sink.fire(GemEvent::Alarm(AlarmNotification::new(
                    *origin,
                    alarm.alarm_id,
                    alarm.code,
                    alarm.text,
                )));
                Ok(Some(Message::alarm_ack()))
            });
        }

        {
            let sink = Arc::clone(&sink);
            router.register(10, 1, move |origin: &SessionId, message: &Message| {
                let terminal = Terminal::decode(message)?;
                sink.fire(GemEvent::Terminal(TerminalNotification::new(
                    *origin,
                    terminal.terminal_id,
                    terminal.text,
                )));
                Ok(Some(Message::terminal_ack()))
            });
        }

        Self {
            subscriptions,
            router,
            link,
            sender,
        }
    }

    /// The subscription registry.
    #[must_use]
    pub fn subscriptions(&self) -> &Arc<ReportSubscriptions> {
        &self.subscriptions
    }

    /// Handles one dispatched message: routes it and transmits any reply.
    ///
    /// This is the dispatch handler to bind into a
    /// [`ProtocolDispatcher`](crate::dispatcher::ProtocolDispatcher); see
    /// [`dispatch_handler`](Self::dispatch_handler).
    pub fn handle_message(&self, origin: SessionId, message: Message) -> GemResult<()> {
        if let Some(reply) = self.router.route(&origin, &message)? {
            self.sender.send(origin, reply)?;
        }
        Ok(())
    }

    /// A dispatch-handler closure bound to this handler.
    pub fn dispatch_handler(
        self: &Arc<Self>,
    ) -> impl Fn(SessionId, Message) -> GemResult<()> + Send + Sync + 'static {
        let handler = Arc::clone(self);
        move |origin, message| handler.handle_message(origin, message)
    }

    /// Subscribes to a collection event.
    ///
    /// Registers the report locally (auto-numbering the id when `report_id`
    /// is `None`), then drives the linkage collaborator: define the report,
    /// link it to `collection_event`, enable the event. Returns the effective
    /// report id.
    pub fn subscribe_collection_event(
        &self,
        collection_event: CollectionEventId,
        data_values: Vec<DataValueId>,
        report_id: Option<ReportId>,
    ) -> GemResult<ReportId> {
        info!(ceid = %collection_event, "subscribing to collection event");

        let report_id = self.subscriptions.subscribe(report_id, data_values.clone());

        self.link.define_report(report_id, &data_values)?;
        self.link.link_report(collection_event, report_id)?;
        self.link.enable_event(collection_event)?;

        Ok(report_id)
    }

    /// Clears all collection-event subscriptions.
    ///
    /// Empties the registry, then disables all events and deletes all report
    /// definitions on the equipment side.
    pub fn clear_collection_events(&self) -> GemResult<()> {
        info!("clearing collection events");

        self.subscriptions.clear();

        self.link.disable_all_events()?;
        self.link.delete_all_reports()?;

        Ok(())
    }
}
