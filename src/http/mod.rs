//! HTTP service exposing the inference pipeline

pub mod handler;
pub mod server;

pub use handler::{predict_handler, status_handler, ApiError, AppState, PredictRequest, PredictResponse};
pub use server::{router, HttpServer};
