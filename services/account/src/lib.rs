pub mod config;
pub mod domain;
pub mod error;
pub mod grpc_server;
pub mod hashing;
pub mod infra;
pub mod otp;
pub mod schemas;
pub mod session;
pub mod state;
pub mod usecase;
