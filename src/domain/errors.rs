use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::display::DisplayId;

/// Root error type for the entire application
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Domain(DomainError),
    Infrastructure(InfrastructureError),
    Presentation(PresentationError),
}

/// Domain layer specific errors
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    Validation(ValidationError),
    Range(RangeError),
    Registry(RegistryError),
}

/// Rejected input values
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidSize { width: f64, height: f64 },
    InvalidPrice(String),
    UnknownHandle(String),
    InvalidSymbol(String),
}

/// Visual range could not be derived from the current state
#[derive(Debug, Clone, PartialEq)]
pub enum RangeError {
    InsufficientData(&'static str),
    InvalidRange { low: f64, high: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    DisplayNotFound(DisplayId),
    DuplicateDisplay(DisplayId),
}

/// Infrastructure layer errors
#[derive(Debug, Clone, PartialEq)]
pub enum InfrastructureError {
    Rendering(RenderingError),
    Browser(String),
}

/// Canvas and drawing failures
#[derive(Debug, Clone, PartialEq)]
pub enum RenderingError {
    CanvasNotFound(String),
    ContextUnavailable(String),
    /// A single 2d-context call rejected its arguments.
    CallFailed(String),
    DrawFailed { layer: &'static str, reason: String },
}

/// Presentation layer errors
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationError {
    Serialization(String),
    InvalidArgument(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AppError::Domain(e) => write!(f, "Domain Error: {}", e),
            AppError::Infrastructure(e) => write!(f, "Infrastructure Error: {}", e),
            AppError::Presentation(e) => write!(f, "Presentation Error: {}", e),
        }
    }
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(e) => write!(f, "Validation: {}", e),
            DomainError::Range(e) => write!(f, "Visual range: {}", e),
            DomainError::Registry(e) => write!(f, "Registry: {}", e),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidSize { width, height } => {
                write!(f, "Invalid size {}x{}", width, height)
            }
            ValidationError::InvalidPrice(msg) => write!(f, "Invalid price: {}", msg),
            ValidationError::UnknownHandle(name) => write!(f, "Unknown resize handle '{}'", name),
            ValidationError::InvalidSymbol(msg) => write!(f, "Invalid symbol: {}", msg),
        }
    }
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RangeError::InsufficientData(field) => write!(f, "missing or non-finite {}", field),
            RangeError::InvalidRange { low, high } => {
                write!(f, "low {} is not below high {}", low, high)
            }
        }
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RegistryError::DisplayNotFound(id) => write!(f, "display {} not found", id),
            RegistryError::DuplicateDisplay(id) => write!(f, "display {} already exists", id),
        }
    }
}

impl Display for InfrastructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            InfrastructureError::Rendering(e) => write!(f, "Rendering: {}", e),
            InfrastructureError::Browser(msg) => write!(f, "Browser API: {}", msg),
        }
    }
}

impl Display for RenderingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RenderingError::CanvasNotFound(id) => write!(f, "canvas '{}' not found", id),
            RenderingError::ContextUnavailable(msg) => write!(f, "2d context unavailable: {}", msg),
            RenderingError::CallFailed(msg) => write!(f, "canvas call failed: {}", msg),
            RenderingError::DrawFailed { layer, reason } => {
                write!(f, "layer '{}' failed: {}", layer, reason)
            }
        }
    }
}

impl Display for PresentationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PresentationError::Serialization(msg) => write!(f, "Serialization: {}", msg),
            PresentationError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for DomainError {}
impl std::error::Error for InfrastructureError {}

impl From<DomainError> for AppError {
    fn from(error: DomainError) -> Self {
        AppError::Domain(error)
    }
}

impl From<InfrastructureError> for AppError {
    fn from(error: InfrastructureError) -> Self {
        AppError::Infrastructure(error)
    }
}

impl From<PresentationError> for AppError {
    fn from(error: PresentationError) -> Self {
        AppError::Presentation(error)
    }
}

impl From<ValidationError> for DomainError {
    fn from(error: ValidationError) -> Self {
        DomainError::Validation(error)
    }
}

impl From<RangeError> for DomainError {
    fn from(error: RangeError) -> Self {
        DomainError::Range(error)
    }
}

impl From<RegistryError> for DomainError {
    fn from(error: RegistryError) -> Self {
        DomainError::Registry(error)
    }
}

impl From<RenderingError> for InfrastructureError {
    fn from(error: RenderingError) -> Self {
        InfrastructureError::Rendering(error)
    }
}

impl From<serde_json::Error> for PresentationError {
    fn from(error: serde_json::Error) -> Self {
        PresentationError::Serialization(error.to_string())
    }
}

impl From<AppError> for wasm_bindgen::JsValue {
    fn from(error: AppError) -> Self {
        wasm_bindgen::JsValue::from_str(&error.to_string())
    }
}
