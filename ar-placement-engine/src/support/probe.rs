use async_trait::async_trait;
use bevy_log::warn;

use super::guidance::SupportStatus;
use crate::engine::xr::substrate::XrError;

/// The three independent capability questions.
#[async_trait(?Send)]
pub trait CapabilityProbe: Send + Sync {
    fn is_secure_context(&self) -> bool;

    fn has_xr(&self) -> bool;

    async fn is_immersive_ar_supported(&self) -> Result<bool, XrError>;
}

/// Ask the probe. Immersive support is only queried when an XR API exists,
/// and a failed query counts as unsupported.
pub async fn evaluate(probe: &dyn CapabilityProbe) -> SupportStatus {
    let secure_context = probe.is_secure_context();
    let has_xr = probe.has_xr();

    let immersive_ar_supported = if has_xr {
        match probe.is_immersive_ar_supported().await {
            Ok(supported) => supported,
            Err(e) => {
                warn!("Failed to query immersive-ar support: {}", e);
                false
            }
        }
    } else {
        false
    };

    SupportStatus {
        secure_context,
        has_xr,
        immersive_ar_supported,
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserCapabilityProbe;

#[cfg(target_arch = "wasm32")]
mod browser {
    use async_trait::async_trait;
    use wasm_bindgen::JsValue;

    use super::CapabilityProbe;
    use crate::engine::xr::browser::{call_async, js_message, navigator_xr};
    use crate::engine::xr::substrate::XrError;
    use constants::placement::IMMERSIVE_AR_MODE;

    /// Probe backed by `window.isSecureContext` and `navigator.xr`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserCapabilityProbe;

    #[async_trait(?Send)]
    impl CapabilityProbe for BrowserCapabilityProbe {
        fn is_secure_context(&self) -> bool {
            web_sys::window().is_some_and(|window| window.is_secure_context())
        }

        fn has_xr(&self) -> bool {
            navigator_xr().is_some()
        }

        async fn is_immersive_ar_supported(&self) -> Result<bool, XrError> {
            let xr = navigator_xr()
                .ok_or_else(|| XrError::ProbeFailed("navigator.xr missing".to_string()))?;

            let supported = call_async(
                &xr,
                "isSessionSupported",
                &[JsValue::from_str(IMMERSIVE_AR_MODE)],
            )
            .await
            .map_err(|e| XrError::ProbeFailed(js_message(&e)))?;

            Ok(supported.as_bool().unwrap_or(false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::StaticProbe;
    use futures::executor::block_on;

    #[test]
    fn immersive_query_skipped_without_xr() {
        let probe = StaticProbe::new(SupportStatus {
            secure_context: true,
            has_xr: false,
            immersive_ar_supported: true,
        });

        let status = block_on(evaluate(&probe));
        assert!(!status.immersive_ar_supported);
        assert_eq!(probe.immersive_queries(), 0);
    }

    #[test]
    fn failed_immersive_query_counts_as_unsupported() {
        let probe = StaticProbe::failing_query();

        let status = block_on(evaluate(&probe));
        assert!(status.secure_context);
        assert!(status.has_xr);
        assert!(!status.immersive_ar_supported);
        assert_eq!(probe.immersive_queries(), 1);
    }

    #[test]
    fn supported_probe() {
        let probe = StaticProbe::supported();
        let status = block_on(evaluate(&probe));
        assert!(status.immersive_ar_supported);
    }
}
