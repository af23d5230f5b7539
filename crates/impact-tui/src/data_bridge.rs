//! Data bridge: feeds the site directory into the action loop.
//!
//! Loads the site list once, starts the periodic revalidation, then forwards
//! every directory change as [`Action::SitesUpdated`] until cancelled.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use impact_core::Backend;

use crate::action::{Action, Notification};

pub async fn spawn_data_bridge(
    backend: Backend,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    match backend.refresh_sites().await {
        Ok(sites) => {
            let _ = action_tx.send(Action::Connected);
            let _ = action_tx.send(Action::SitesUpdated(sites));
        }
        Err(e) => {
            // An unreachable backend shows an empty site list.
            warn!(error = %e, "failed to load supported sites");
            let _ = action_tx.send(Action::Disconnected(e.to_string()));
            let _ = action_tx.send(Action::Notify(Notification::error(format!(
                "Could not load sites: {e}"
            ))));
            let _ = action_tx.send(Action::SitesUpdated(Arc::new(Vec::new())));
        }
    }

    let mut sites = backend.directory().subscribe();
    let refresh = backend.spawn_site_refresh();

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = sites.changed() => match changed {
                Some(snapshot) => {
                    debug!(count = snapshot.len(), "dispatching SitesUpdated");
                    let _ = action_tx.send(Action::Connected);
                    let _ = action_tx.send(Action::SitesUpdated(snapshot));
                }
                None => break,
            },
        }
    }

    backend.shutdown();
    if let Some(handle) = refresh {
        let _ = handle.await;
    }
    debug!("data bridge stopped");
}
