use tokio::{task, task::JoinHandle};
use tracing::{Span, Subscriber, subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt::MakeWriter, layer::SubscriberExt};

pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let formatting_layer = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

// `init_subscriber` should only be called once, or it will panic!
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) {
    // Can Panic
    LogTracer::init().expect("Failed to set logger");
    // Can Panic
    subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

// Argon2 hashing is CPU-bound; run it off the async workers while keeping
// the current span attached to the blocking thread.
pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = Span::current();
    task::spawn_blocking(move || current_span.in_scope(f))
}
