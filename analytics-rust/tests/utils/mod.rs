#![allow(dead_code)]

pub mod helpers;
pub mod mock_log_provider;
pub mod mock_transport;
