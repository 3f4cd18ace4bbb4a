use timerassist_core::{
    driver, AlertManager, AlertService, Config, JsonRegimenStore, LogSubscriber, Session,
    SilentNotifier,
};

use crate::notifier::TerminalNotifier;

pub fn run(quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = JsonRegimenStore::open()?;
    tracing::debug!(path = %store.path().display(), "regimen store opened");

    let alerts: Box<dyn AlertService> = if quiet {
        Box::new(AlertManager::new(SilentNotifier, config.alerts.clone()))
    } else {
        Box::new(AlertManager::new(TerminalNotifier, config.alerts.clone()))
    };
    let mut session = Session::new(
        Box::new(store),
        alerts,
        Box::new(|line: &str| println!("{line}")),
    )
    .with_subscriber(Box::new(LogSubscriber::new()));

    println!("Timer Assistant ready. Type 'help' for examples, 'exit' to quit.");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let result = runtime.block_on(driver::drive(&mut session, input));
    // A blocking stdin read may still be parked; don't wait for it.
    runtime.shutdown_background();
    session.stop_all();
    result?;
    Ok(())
}
