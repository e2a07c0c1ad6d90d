//! # error-pipe
//!
//! A bounded error reporting channel for concurrent producers, built on Tokio.
//!
//! ## Features
//!
//! - **Bounded buffer** with producer backpressure
//! - **Fail-silent reporting**: cancellation while waiting drops the record instead of erroring
//! - **Task and thread producers** sharing one buffer
//! - **Draining consumer** with pluggable sinks and a tracing sink
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use error_pipe::channel::{ErrorBuffer, ErrorChannel};
//! use error_pipe::drain::{ErrorDrain, TracingSink};
//! use tokio_util::sync::CancellationToken;
//!
//! let buffer = ErrorBuffer::with_capacity(128)?;
//! let channel = ErrorChannel::new(&buffer)?;
//! let drain = ErrorDrain::new(&buffer);
//! let cancel = CancellationToken::new();
//!
//! channel.report_error(&cancel, "Fetcher", "timeout").await?;
//! buffer.close();
//! drain.run(&cancel, TracingSink).await;
//! ```
//!
//! ## Modules
//!
//! - [`record`] - Error records and producer identity
//! - [`channel`] - The shared buffer and the producer facing channel
//! - [`drain`] - Consumer loop and record sinks

pub mod channel;
pub mod drain;
pub mod error;
pub mod record;
pub mod telemetry;

pub use channel::{ErrorBuffer, ErrorChannel};
pub use drain::{ErrorDrain, RecordSink, TracingSink};
pub use error::{PipeError, PipeResult};
pub use record::{ErrorRecord, ProducerKind};
