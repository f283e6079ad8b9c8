use std::sync::Once;

/// Initialize a stdout tracing subscriber once (used by tests run with
/// `RUST_LOG` to see editor logs).
pub fn init_tracing_from_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stdout);
        let _ = subscriber.try_init();
    });
}
