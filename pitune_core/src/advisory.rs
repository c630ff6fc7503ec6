//! Banded, text-only classification of a tuning result.
//!
//! Nothing downstream consumes these; they are advice for the operator.

/// Average absolute error below this is "stable".
pub const STABLE_ERROR: f64 = 0.5;
/// Average absolute error below this (and not stable) is "moderate".
pub const MODERATE_ERROR: f64 = 2.0;
pub const KP_STRONG: f64 = 5.0;
pub const KP_WEAK: f64 = 0.5;
pub const KI_STRONG: f64 = 1.0;
pub const KI_WEAK: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    Stable,
    ModerateError,
    LargeError,
    KpStrong,
    KpWeak,
    KiStrong,
    KiWeak,
}

impl Advisory {
    pub fn severity(self) -> Severity {
        match self {
            Advisory::Stable | Advisory::ModerateError | Advisory::KpWeak | Advisory::KiWeak => {
                Severity::Info
            }
            Advisory::LargeError | Advisory::KpStrong | Advisory::KiStrong => Severity::Warning,
        }
    }

    /// Stable identifier for structured output.
    pub fn code(self) -> &'static str {
        match self {
            Advisory::Stable => "stable",
            Advisory::ModerateError => "moderate_error",
            Advisory::LargeError => "large_error",
            Advisory::KpStrong => "kp_strong",
            Advisory::KpWeak => "kp_weak",
            Advisory::KiStrong => "ki_strong",
            Advisory::KiWeak => "ki_weak",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Advisory::Stable => "System is stable; only small corrections are needed.",
            Advisory::ModerateError => {
                "Moderate error detected; PI tuning may improve stability."
            }
            Advisory::LargeError => "Large error detected; system may need higher Kp or Ki.",
            Advisory::KpStrong => "Kp is strong; monitor for overshoot.",
            Advisory::KpWeak => "Kp is small; system response may be slow.",
            Advisory::KiStrong => "Ki is strong; watch for oscillations.",
            Advisory::KiWeak => "Ki is small; integral effect may be slow.",
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// One error-level advisory, then at most one for Kp and one for Ki.
pub fn classify(avg_error: f64, kp: f64, ki: f64) -> Vec<Advisory> {
    let mut out = Vec::with_capacity(3);
    out.push(if avg_error < STABLE_ERROR {
        Advisory::Stable
    } else if avg_error < MODERATE_ERROR {
        Advisory::ModerateError
    } else {
        Advisory::LargeError
    });
    if kp > KP_STRONG {
        out.push(Advisory::KpStrong);
    } else if kp < KP_WEAK {
        out.push(Advisory::KpWeak);
    }
    if ki > KI_STRONG {
        out.push(Advisory::KiStrong);
    } else if ki < KI_WEAK {
        out.push(Advisory::KiWeak);
    }
    out
}
