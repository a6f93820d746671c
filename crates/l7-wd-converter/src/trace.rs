use tracing::{span, Level, Span};
use uuid::Uuid;

use crate::dialect::Dialect;

#[derive(Clone, Default)]
pub struct ConverterTracer;

impl ConverterTracer {
    /// One span per dispatched command; fan-out sub-calls share its `request_id`.
    pub fn span(&self, command: &str, dialect: Dialect) -> Span {
        span!(
            Level::INFO,
            "l7.wd_converter",
            command = command,
            dialect = %dialect,
            request_id = %Uuid::new_v4()
        )
    }
}
