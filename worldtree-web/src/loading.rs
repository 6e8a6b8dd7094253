/// Asset loading progress reported by the JavaScript scene loader.
///
/// Load failures end up here and stay here; they never reach the camera.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadingState {
    Loading { loaded: u32, total: u32 },
    Ready,
    Failed(String),
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::Loading {
            loaded: 0,
            total: 0,
        }
    }
}

impl LoadingState {
    /// Record progress. Ignored once failed.
    pub fn progress(&mut self, loaded: u32, total: u32) {
        if matches!(self, Self::Failed(_)) {
            return;
        }
        *self = if total > 0 && loaded >= total {
            Self::Ready
        } else {
            Self::Loading { loaded, total }
        };
    }

    /// Record a failure. The first failure wins.
    pub fn fail(&mut self, message: impl Into<String>) {
        if !matches!(self, Self::Failed(_)) {
            *self = Self::Failed(message.into());
        }
    }

    /// Completed fraction in 0..=1.
    pub fn fraction(&self) -> f32 {
        match self {
            Self::Loading { loaded, total } if *total > 0 => {
                (*loaded as f32 / *total as f32).min(1.0)
            }
            Self::Loading { .. } | Self::Failed(_) => 0.0,
            Self::Ready => 1.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Loading { loaded, total } => format!("loading {loaded}/{total}"),
            Self::Ready => "ready".into(),
            Self::Failed(msg) => format!("failed: {msg}"),
        }
    }
}
