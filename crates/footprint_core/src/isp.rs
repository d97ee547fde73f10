//! ISP classification for map styling

/// Well-known network providers, used to colour route lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IspProvider {
    Google,
    Cloudflare,
    Amazon,
    Fastly,
    Microsoft,
    Other,
    Unknown,
}

impl IspProvider {
    /// Classify an ISP/organisation name (case-insensitive substring match).
    pub fn classify(isp: Option<&str>) -> Self {
        let Some(isp) = isp.filter(|s| !s.is_empty()) else {
            return Self::Unknown;
        };
        let lower = isp.to_lowercase();
        if lower.contains("google") {
            Self::Google
        } else if lower.contains("cloudflare") {
            Self::Cloudflare
        } else if lower.contains("amazon") || lower.contains("aws") {
            Self::Amazon
        } else if lower.contains("fastly") {
            Self::Fastly
        } else if lower.contains("microsoft") || lower.contains("azure") {
            Self::Microsoft
        } else {
            Self::Other
        }
    }

    /// Hex display colour.
    pub fn color(self) -> &'static str {
        match self {
            Self::Google => "#3b82f6",
            Self::Cloudflare => "#f97316",
            Self::Amazon => "#f59e0b",
            Self::Fastly => "#ef4444",
            Self::Microsoft => "#0ea5e9",
            Self::Other | Self::Unknown => "#64748b",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Cloudflare => "Cloudflare",
            Self::Amazon => "Amazon",
            Self::Fastly => "Fastly",
            Self::Microsoft => "Microsoft",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }
}
