use anyhow::anyhow;
use spin_gate::GateError;

/// Turn Gate errors into the messages commands print.
pub trait GateResultExt<T> {
    /// Non-2xx becomes `Encountered an error <action>, status code: <n>`.
    fn gate_context(self, action: &str) -> anyhow::Result<T>;

    /// As [`gate_context`](Self::gate_context), with 404 mapped to `not_found`.
    fn or_not_found(self, action: &str, not_found: impl FnOnce() -> String)
    -> anyhow::Result<T>;
}

impl<T> GateResultExt<T> for Result<T, GateError> {
    fn gate_context(self, action: &str) -> anyhow::Result<T> {
        self.map_err(|error| describe(error, action))
    }

    fn or_not_found(
        self,
        action: &str,
        not_found: impl FnOnce() -> String,
    ) -> anyhow::Result<T> {
        match self {
            Err(error) if error.is_not_found() => Err(anyhow!(not_found())),
            other => other.gate_context(action),
        }
    }
}

fn describe(error: GateError, action: &str) -> anyhow::Error {
    match error {
        GateError::Api { status, message } => {
            let message = message.trim();
            if message.is_empty() {
                anyhow!("Encountered an error {action}, status code: {status}")
            } else {
                anyhow!("Encountered an error {action}, status code: {status}\n{message}")
            }
        }
        other => anyhow::Error::new(other).context(format!("Encountered an error {action}")),
    }
}
