//! Local embedding backends

#[cfg(feature = "onnx")]
mod onnx_embedder;

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;
