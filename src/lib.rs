#[macro_use]
extern crate tracing;

pub mod logging;

use eyre::{
    Context as _,
    Result,
};
use std::{
    sync::Arc,
    time::Duration,
};
pub use visit_beacon_config::{
    Args,
    Config,
};
use visit_beacon_tracker::{
    Bootstrap,
    Callbacks,
    HttpTransport,
    Session,
};

pub use logging::{
    init_errors,
    init_logging,
};

/// Track one visit as described by `config` until interrupted or `run_seconds` elapse.
pub async fn run(config: Config) -> Result<()> {
    let Some(bootstrap) = Bootstrap::from_element(config.element.as_ref())? else {
        info!("No beacon configured, nothing to track");
        return Ok(());
    };

    let transport =
        HttpTransport::new()?.with_cookies(&bootstrap.server, config.cookies.iter().map(String::as_str))?;
    let tracker = bootstrap.tracker(Arc::new(transport), Arc::new(config.environment.clone()))?;

    let callbacks = Callbacks::new()
        .on_created(|id| info!(%id, "visit recorded"))
        .on_refreshed(|id| debug!(%id, "visit refreshed"));

    let mut session = match config.record_id.as_deref() {
        Some(id) => tracker.resume_session(id, callbacks),
        None => tracker
            .start_session(None, callbacks)
            .await
            .context("failed to record the visit")?,
    };

    if !session.is_active() {
        return Ok(());
    }

    hold(&mut session, config.run_seconds.map(Duration::from_secs)).await;
    session.stop();
    info!("Stopped tracking");
    Ok(())
}

/// Keep the heartbeat alive until Ctrl-C or `run_for` has passed.
async fn hold(session: &mut Session, run_for: Option<Duration>) {
    let deadline = async {
        match run_for {
            Some(run_for) => tokio::time::sleep(run_for).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut failed_refreshes = 0usize;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            _ = &mut deadline => break,
            // Failures are logged by the heartbeat already.
            Some(_) = session.next_failure() => {
                failed_refreshes += 1;
                debug!(failed_refreshes, "refresh failed, heartbeat continues");
            }
        }
    }
}
