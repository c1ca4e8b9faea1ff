use socketcan::{CanFrame, CanSocket, EmbeddedFrame, Socket, StandardId};

use super::FrameSink;
use crate::error::{ClusterError, Result};
use crate::frame::GaugeFrame;

/// Raw SocketCAN writer. Every gauge uses a standard 11-bit identifier.
pub struct SocketCanSink {
    socket: CanSocket,
    interface: String,
}

impl SocketCanSink {
    pub fn open(interface: &str) -> Result<Self> {
        let socket = CanSocket::open(interface)
            .map_err(|e| ClusterError::Transport(format!("open {}: {}", interface, e)))?;
        log::info!("CAN interface: {}", interface);
        Ok(Self {
            socket,
            interface: interface.to_string(),
        })
    }
}

impl FrameSink for SocketCanSink {
    fn send(&mut self, frame: &GaugeFrame) -> Result<()> {
        let id = u16::try_from(frame.id)
            .ok()
            .and_then(StandardId::new)
            .ok_or_else(|| {
                ClusterError::Transport(format!("0x{:X} is not a standard identifier", frame.id))
            })?;
        let can_frame = CanFrame::new(id, &frame.data).ok_or_else(|| {
            ClusterError::Transport(format!("cannot build frame {}", frame))
        })?;

        self.socket
            .write_frame(&can_frame)
            .map_err(|e| ClusterError::Transport(format!("{}: {}", self.interface, e)))
    }
}
