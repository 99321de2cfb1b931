use std::io::Write;
use std::time::Duration;

use serialport::SerialPort;
use tokio::sync::Mutex;

use crate::configs::settings::Relay;
use crate::errors::RelayError;

/// Commands written to the relay board. Single-byte on/off keeps the line
/// protocol compatible with dumb serial relay modules.
const LINE_ON: &[u8] = b"1";
const LINE_OFF: &[u8] = b"0";

/// The physical output line. Implementations must leave the relay released
/// when `write_state(false)` returns.
pub trait RelayLine: Send {
    fn write_state(&mut self, energized: bool) -> Result<(), RelayError>;
}

pub struct SerialRelayLine {
    port: Box<dyn SerialPort>,
}

impl SerialRelayLine {
    pub fn open(relay: &Relay) -> Result<Self, RelayError> {
        let port_path = match &relay.port_path {
            Some(path) => path.clone(),
            None => serialport::available_ports()?
                .first()
                .map(|port| port.port_name.clone())
                .ok_or(RelayError::NoPort)?,
        };

        tracing::debug!("Connect to relay line: {}", port_path);

        let port = serialport::new(&port_path, relay.baud_rate)
            .timeout(Duration::from_millis(10))
            .open()?;

        Ok(Self { port })
    }
}

impl RelayLine for SerialRelayLine {
    fn write_state(&mut self, energized: bool) -> Result<(), RelayError> {
        let command = if energized { LINE_ON } else { LINE_OFF };
        let bytes_written = self.port.write(command)?;

        if bytes_written != command.len() {
            return Err(RelayError::IncompleteWrite);
        }

        Ok(())
    }
}

/// Stands in when the serial line failed to open. The daemon keeps serving;
/// every activation reports a hardware fault instead.
pub struct DisconnectedRelayLine;

impl RelayLine for DisconnectedRelayLine {
    fn write_state(&mut self, _energized: bool) -> Result<(), RelayError> {
        Err(RelayError::NotConnected)
    }
}

/// Owns the single hardware output. The mutex is the relay exclusivity
/// lock: a second activation blocks until the one in progress completes.
pub struct RelayService {
    line: Mutex<Box<dyn RelayLine>>,
}

impl RelayService {
    pub fn new(line: Box<dyn RelayLine>) -> Self {
        Self {
            line: Mutex::new(line),
        }
    }

    pub fn connect(relay: &Relay) -> Self {
        match SerialRelayLine::open(relay) {
            Ok(line) => Self::new(Box::new(line)),
            Err(e) => {
                tracing::warn!("relay line unavailable, activations will fault: {e}");
                Self::new(Box::new(DisconnectedRelayLine))
            }
        }
    }

    /// Energizes the relay for `duration`, then releases it. Waits behind
    /// any activation already in progress.
    pub async fn pulse(&self, duration: Duration) -> Result<(), RelayError> {
        let mut line = self.line.lock().await;
        line.write_state(true)?;

        // release the line even if the waiter is dropped mid-pulse
        let mut guard = ReleaseOnDrop {
            line: &mut **line,
            armed: true,
        };
        tokio::time::sleep(duration).await;
        guard.armed = false;

        guard.line.write_state(false)
    }
}

struct ReleaseOnDrop<'a> {
    line: &'a mut (dyn RelayLine + 'a),
    armed: bool,
}

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.line.write_state(false);
        }
    }
}
