pub mod correlation;

pub use correlation::{correlation_middleware, TraceId, TRACE_ID_HEADER};
