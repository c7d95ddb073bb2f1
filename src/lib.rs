pub mod config;
pub mod models;
pub mod server;
pub mod services;
pub mod validator;

pub use models::{AppError, Result};
pub use validator::{ShapefileValidator, ValidationFailure, ValidationRun};
