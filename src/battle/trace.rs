//! Decision-trace sinks.
//!
//! Strategists report why they kept or replaced a candidate through a
//! `DecisionLog`. The default sink discards everything.

/// Receives one human-readable line per strategist verdict.
pub trait DecisionLog {
    fn log(&self, combatant: &str, message: &str);
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl DecisionLog for NoopLog {
    fn log(&self, _combatant: &str, _message: &str) {}
}

/// Forwards messages to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl DecisionLog for TracingLog {
    fn log(&self, combatant: &str, message: &str) {
        tracing::debug!(target: "pvp_action_logic::decision", combatant, "{}", message);
    }
}

impl<F> DecisionLog for F
where
    F: Fn(&str, &str),
{
    fn log(&self, combatant: &str, message: &str) {
        self(combatant, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_sink_captures_messages() {
        let lines = RefCell::new(Vec::new());
        let sink = |who: &str, msg: &str| lines.borrow_mut().push(format!("{}: {}", who, msg));

        sink.log("Registeel", "builds energy");
        NoopLog.log("Registeel", "dropped");
        TracingLog.log("Registeel", "also dropped without a subscriber");

        assert_eq!(lines.into_inner(), vec!["Registeel: builds energy".to_string()]);
    }
}
