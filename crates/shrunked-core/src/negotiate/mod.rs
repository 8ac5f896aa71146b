//! Size negotiation for requests that arrive without dimensions.
//!
//! Resolution order:
//! 1. http(s) origins consult the site preference: disabled aborts, a
//!    remembered size is used as is.
//! 2. Otherwise the notification bar asks Yes / Never / No. "Never" is
//!    offered, and persisted, only where site persistence is allowed.
//! 3. "Yes" opens the size dialog (unless disabled in config); its
//!    "remember" option is likewise honoured only where persistence is allowed.

mod site;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::ShrunkedConfig;
use crate::prefs::{self, PreferenceStore, SitePreference};
use crate::prompt::{DimensionsRequest, NotificationBar, PromptAnswer, Prompter, Question};
use crate::protocol::{BrowsingContext, Dimensions};

pub use site::SiteAccess;

/// Why a negotiation ended without a size. All of them are silent to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The site preference says never resize here.
    SiteDisabled,
    /// The user answered "No".
    Declined,
    /// The user answered "Never"; the preference has been stored.
    NeverForSite,
    /// The size dialog was cancelled.
    DialogCancelled,
    /// A newer request took over the notification bar.
    PromptDismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiation {
    Resolved(Dimensions),
    Aborted(AbortReason),
}

/// Knobs taken from `ShrunkedConfig`.
#[derive(Debug, Clone, Copy)]
pub struct NegotiationSettings {
    pub ask_dimensions: bool,
    pub default_dimensions: Dimensions,
}

impl From<&ShrunkedConfig> for NegotiationSettings {
    fn from(cfg: &ShrunkedConfig) -> Self {
        Self {
            ask_dimensions: cfg.ask_dimensions,
            default_dimensions: Dimensions::new(cfg.default_max_width, cfg.default_max_height),
        }
    }
}

pub struct SizeNegotiator {
    prefs: Arc<dyn PreferenceStore>,
    bar: NotificationBar,
    settings: NegotiationSettings,
}

impl SizeNegotiator {
    pub fn new(
        prefs: Arc<dyn PreferenceStore>,
        prompter: Arc<dyn Prompter>,
        config: &ShrunkedConfig,
    ) -> Self {
        Self {
            prefs,
            bar: NotificationBar::new(prompter, config.prompt_surface),
            settings: NegotiationSettings::from(config),
        }
    }

    /// Resolve target dimensions for `files` selected on `context`.
    pub async fn negotiate(&self, context: &BrowsingContext, files: &[PathBuf]) -> Result<Negotiation> {
        let site = SiteAccess::for_context(context);

        if let Some(host) = site.host() {
            let pref = SitePreference::load(self.prefs.as_ref(), host).await?;
            if pref.disabled {
                return Ok(Negotiation::Aborted(AbortReason::SiteDisabled));
            }
            if let Some(dimensions) = pref.dimensions() {
                tracing::debug!(host, %dimensions, "using remembered site size");
                return Ok(Negotiation::Resolved(dimensions));
            }
        }

        let question = Question::for_files(files.len(), site.can_persist());
        let Some(answer) = self.bar.ask(&question).await else {
            return Ok(Negotiation::Aborted(AbortReason::PromptDismissed));
        };
        match (answer, site.persist_host()) {
            (PromptAnswer::Yes, _) => {}
            (PromptAnswer::Never, Some(host)) => {
                prefs::disable_site(self.prefs.as_ref(), host).await?;
                tracing::info!(host, "resizing disabled for site");
                return Ok(Negotiation::Aborted(AbortReason::NeverForSite));
            }
            // "Never" without persistence is never offered; treat a stray one as "No".
            (PromptAnswer::Never, None) | (PromptAnswer::No, _) => {
                return Ok(Negotiation::Aborted(AbortReason::Declined));
            }
        }

        if !self.settings.ask_dimensions {
            return Ok(Negotiation::Resolved(self.settings.default_dimensions));
        }

        let request = DimensionsRequest {
            images: files.to_vec(),
            suggested: self.settings.default_dimensions,
            can_remember: site.can_persist(),
        };
        let Some(choice) = self.bar.prompter().choose_dimensions(&request).await else {
            return Ok(Negotiation::Aborted(AbortReason::DialogCancelled));
        };
        let Some(dimensions) =
            Dimensions::from_parts(Some(choice.dimensions.max_width), Some(choice.dimensions.max_height))
        else {
            tracing::warn!(dimensions = %choice.dimensions, "size dialog returned an empty size");
            return Ok(Negotiation::Aborted(AbortReason::DialogCancelled));
        };

        if choice.remember_site {
            if let Some(host) = site.persist_host() {
                prefs::remember_dimensions(self.prefs.as_ref(), host, dimensions).await?;
                tracing::info!(host, %dimensions, "remembered size for site");
            }
        }
        Ok(Negotiation::Resolved(dimensions))
    }
}
