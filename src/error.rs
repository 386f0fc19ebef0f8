use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Fatal failures of the window/render backend. Never retried.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),
    #[error("failed to create renderer: {0}")]
    RendererCreation(String),
    #[error("failed to present frame: {0}")]
    Present(String),
}

impl BackendError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            BackendError::EventLoop(_) | BackendError::WindowCreation(_) => 1,
            BackendError::RendererCreation(_) | BackendError::Present(_) => 2,
        }
    }
}

/// Anything that stops the visualizer from starting or running.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Backend(e) => e.exit_code(),
            RunError::Geometry(_) => 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
