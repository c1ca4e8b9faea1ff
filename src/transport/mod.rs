//! Where encoded frames go.

#[cfg(feature = "socketcan")]
mod can_socket;

#[cfg(feature = "socketcan")]
pub use self::can_socket::SocketCanSink;

use crate::error::Result;
use crate::frame::GaugeFrame;
use crate::output::FrameFormatter;
#[cfg(not(feature = "socketcan"))]
use crate::error::ClusterError;

/// Fire-and-forget frame delivery. There is no acknowledgement; an `Err`
/// only means the frame could not be handed to the bus.
pub trait FrameSink {
    fn send(&mut self, frame: &GaugeFrame) -> Result<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn send(&mut self, frame: &GaugeFrame) -> Result<()> {
        (**self).send(frame)
    }
}

/// Open the CAN interface for writing.
#[cfg(feature = "socketcan")]
pub fn open_bus(interface: &str) -> Result<Box<dyn FrameSink>> {
    Ok(Box::new(SocketCanSink::open(interface)?))
}

#[cfg(not(feature = "socketcan"))]
pub fn open_bus(interface: &str) -> Result<Box<dyn FrameSink>> {
    Err(ClusterError::Transport(format!(
        "cannot open {}: built without SocketCAN support",
        interface
    )))
}

/// Collects frames in memory.
impl FrameSink for Vec<GaugeFrame> {
    fn send(&mut self, frame: &GaugeFrame) -> Result<()> {
        self.push(*frame);
        Ok(())
    }
}

/// Prints each frame to stdout instead of touching the bus.
pub struct PrintSink {
    interface: String,
    formatter: Box<dyn FrameFormatter>,
}

impl PrintSink {
    pub fn new(interface: impl Into<String>, formatter: Box<dyn FrameFormatter>) -> Self {
        if let Some(header) = formatter.header() {
            println!("{}", header);
        }
        Self {
            interface: interface.into(),
            formatter,
        }
    }
}

impl FrameSink for PrintSink {
    fn send(&mut self, frame: &GaugeFrame) -> Result<()> {
        println!("{}", self.formatter.format(&self.interface, frame));
        Ok(())
    }
}
