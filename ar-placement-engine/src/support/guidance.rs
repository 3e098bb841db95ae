use constants::guidance::{
    AR_DISABLED_LABEL, AR_DISABLED_MESSAGE, INSECURE_CONTEXT_LABEL, INSECURE_CONTEXT_MESSAGE,
    IOS_SUPPORT_HINT, MISSING_XR_LABEL, MISSING_XR_MESSAGE, SUPPORTED_MESSAGE,
};

/// Raw answers of the capability probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupportStatus {
    pub secure_context: bool,
    pub has_xr: bool,
    pub immersive_ar_supported: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportGuidance {
    pub status: SupportStatus,
    pub supported: bool,
    pub message: String,
    /// Label for the disabled start control; `None` when supported.
    pub button_label: Option<String>,
}

impl SupportGuidance {
    fn unsupported(status: SupportStatus, message: String, label: &str) -> Self {
        Self {
            status,
            supported: false,
            message,
            button_label: Some(label.to_string()),
        }
    }
}

/// First failing check wins.
pub fn guidance(status: SupportStatus) -> SupportGuidance {
    if !status.secure_context {
        return SupportGuidance::unsupported(
            status,
            INSECURE_CONTEXT_MESSAGE.to_string(),
            INSECURE_CONTEXT_LABEL,
        );
    }

    if !status.has_xr {
        return SupportGuidance::unsupported(
            status,
            format!("{} {}", MISSING_XR_MESSAGE, IOS_SUPPORT_HINT),
            MISSING_XR_LABEL,
        );
    }

    if !status.immersive_ar_supported {
        return SupportGuidance::unsupported(
            status,
            format!("{} {}", AR_DISABLED_MESSAGE, IOS_SUPPORT_HINT),
            AR_DISABLED_LABEL,
        );
    }

    SupportGuidance {
        status,
        supported: true,
        message: SUPPORTED_MESSAGE.to_string(),
        button_label: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(secure_context: bool, has_xr: bool, immersive_ar_supported: bool) -> SupportStatus {
        SupportStatus {
            secure_context,
            has_xr,
            immersive_ar_supported,
        }
    }

    #[test]
    fn insecure_context_wins_over_everything() {
        for has_xr in [false, true] {
            for immersive in [false, true] {
                let result = guidance(status(false, has_xr, immersive));
                assert!(!result.supported);
                assert_eq!(result.message, INSECURE_CONTEXT_MESSAGE);
                assert_eq!(result.button_label.as_deref(), Some(INSECURE_CONTEXT_LABEL));
            }
        }
    }

    #[test]
    fn missing_xr_is_reported_before_immersive_support() {
        for immersive in [false, true] {
            let result = guidance(status(true, false, immersive));
            assert!(!result.supported);
            assert!(result.message.starts_with(MISSING_XR_MESSAGE));
            assert!(result.message.ends_with(IOS_SUPPORT_HINT));
            assert_eq!(result.button_label.as_deref(), Some(MISSING_XR_LABEL));
        }
    }

    #[test]
    fn disabled_immersive_ar() {
        let result = guidance(status(true, true, false));
        assert!(!result.supported);
        assert!(result.message.starts_with(AR_DISABLED_MESSAGE));
        assert!(result.message.ends_with(IOS_SUPPORT_HINT));
        assert_eq!(result.button_label.as_deref(), Some(AR_DISABLED_LABEL));
    }

    #[test]
    fn fully_supported() {
        let input = status(true, true, true);
        let result = guidance(input);
        assert!(result.supported);
        assert_eq!(result.status, input);
        assert_eq!(result.message, SUPPORTED_MESSAGE);
        assert!(result.button_label.is_none());
    }
}
