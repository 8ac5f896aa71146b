//! `shrunked prefs` – inspect and reset remembered site preferences.

use anyhow::Result;
use shrunked_core::prefs::{JsonPreferenceStore, PrefKey, PrefValue, PreferenceStore, SitePreference};

use crate::cli::PrefsAction;

pub async fn run_prefs(action: PrefsAction) -> Result<()> {
    let store = JsonPreferenceStore::open_default().await?;
    match action {
        PrefsAction::List => {
            let hosts = store.hosts().await?;
            if hosts.is_empty() {
                println!("No site preferences stored.");
            } else {
                println!("{:<32} {:<9} {}", "HOST", "DISABLED", "SIZE");
                for host in hosts {
                    let pref = SitePreference::load(&store, &host).await?;
                    println!("{:<32} {:<9} {}", host, pref.disabled, size_column(&pref));
                }
            }
        }
        PrefsAction::Show { host } => {
            let pref = SitePreference::load(&store, &host).await?;
            println!("{}", host);
            for key in PrefKey::ALL {
                let value = store
                    .get(&host, key)
                    .await?
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("  {} = {}", key.as_str(), value);
            }
            println!("  effective size: {}", size_column(&pref));
        }
        PrefsAction::Forget { host } => {
            if store.forget(&host).await? {
                println!("Forgot preferences for {}.", host);
            } else {
                println!("No preferences stored for {}.", host);
            }
        }
        PrefsAction::Enable { host } => {
            store
                .set(&host, PrefKey::Disabled, PrefValue::Bool(false))
                .await?;
            tracing::info!(host = %host, "resizing re-enabled for site");
            println!("Resizing enabled for {}.", host);
        }
    }
    Ok(())
}

fn size_column(pref: &SitePreference) -> String {
    pref.dimensions()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string())
}
