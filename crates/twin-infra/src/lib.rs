//! Infrastructure layer for the digital twin backend.
//!
//! Contains implementations of the ports defined in `twin-core`: session
//! stores on the local filesystem and in S3, the AWS Bedrock inference
//! provider, AWS client configuration, and system prompt loading.

pub mod aws;
pub mod llm;
pub mod prompt;
pub mod storage;
