//! Messaging-platform bridge
//!
//! Thin wrapper over the host app's LIFF-style SDK, loaded as a global `liff`
//! object by the embedding page. Every call is a boundary: failures are
//! logged and downgraded, never surfaced into the simulation.
//!
//! The "running inside the host client" flag is captured once at startup into
//! a [`PlatformContext`] and passed by reference to whoever needs it, rather
//! than re-queried through a global.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Read-only platform facts, captured once at startup.
///
/// `Default` gives the safe answer (`in_client = false`) for code paths that
/// run before detection has happened, and for native builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformContext {
    /// True when running inside the host app's embedded browser
    pub in_client: bool,
}

impl PlatformContext {
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        Self {
            in_client: liff_bridge_in_client(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::default()
    }
}

/// Result of a share attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share sheet completed
    Shared,
    /// The user dismissed the share sheet
    Cancelled,
    /// The SDK was unavailable or the call failed
    Failed,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(inline_js = "
    export async function liff_bridge_init(liffId) {
        if (typeof liff === 'undefined') {
            throw new Error('LIFF SDK not loaded');
        }
        await liff.init({ liffId });
        const profile = await liff.getProfile();
        return profile.displayName;
    }

    export function liff_bridge_in_client() {
        return typeof liff !== 'undefined' && liff.isInClient();
    }

    export async function liff_bridge_share(text) {
        if (typeof liff === 'undefined' || !liff.isApiAvailable('shareTargetPicker')) {
            throw new Error('share target picker unavailable');
        }
        // Resolves undefined when the user closes the picker without sharing
        return await liff.shareTargetPicker([{ type: 'text', text }]);
    }
")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn liff_bridge_init(liff_id: &str) -> Result<JsValue, JsValue>;

    fn liff_bridge_in_client() -> bool;

    #[wasm_bindgen(catch)]
    async fn liff_bridge_share(text: &str) -> Result<JsValue, JsValue>;
}

/// Initialize the platform session and fetch the user's display name.
///
/// Returns `None` on any failure; the caller simply omits the greeting.
#[cfg(target_arch = "wasm32")]
pub async fn init_session(liff_id: &str) -> Option<String> {
    match liff_bridge_init(liff_id).await {
        Ok(value) => value.as_string(),
        Err(err) => {
            log::warn!("Platform session init failed: {:?}", err);
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn init_session(_liff_id: &str) -> Option<String> {
    None
}

/// Open the share sheet with the current score
#[cfg(target_arch = "wasm32")]
pub async fn share_score(score: u64) -> ShareOutcome {
    let text = format!("I scored {} in Scroll Runner!", score);
    match liff_bridge_share(&text).await {
        // The picker resolves undefined/null when dismissed
        Ok(value) if value.is_undefined() || value.is_null() => ShareOutcome::Cancelled,
        Ok(_) => ShareOutcome::Shared,
        Err(err) => {
            log::warn!("Share failed: {:?}", err);
            ShareOutcome::Failed
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn share_score(_score: u64) -> ShareOutcome {
    ShareOutcome::Failed
}
