pub use analytics_transport_trait::*;
pub use batching_mock_transport::BatchingMockTransport;
pub use output_logger_transport::OutputLoggerTransport;

pub mod analytics_transport_trait;
pub mod batching_mock_transport;
pub mod output_logger_transport;
