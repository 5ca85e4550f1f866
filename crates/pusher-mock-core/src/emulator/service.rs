//! Broadcast loop shared by every consumer of the core.
//!
//! Sends use one SO_BROADCAST socket for all pushers. Receives use each
//! pusher's own non-blocking listener.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::{interval, MissedTickBehavior};

use crate::device::{DeviceSet, MacAddress, RECEIVE_BUFFER_SIZE};
use crate::error::TransientNetworkError;
use crate::protocol::DISCOVERY_PORT;

/// Time between broadcast rounds
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Where discovery packets are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorOptions {
    pub broadcast_addr: Ipv4Addr,
    pub discovery_port: u16,
}

impl Default for EmulatorOptions {
    fn default() -> Self {
        Self {
            broadcast_addr: Ipv4Addr::BROADCAST,
            discovery_port: DISCOVERY_PORT,
        }
    }
}

/// Create a non-blocking UDP socket allowed to send broadcasts.
pub fn create_broadcast_socket() -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_broadcast(true)?;

    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Traffic seen on a pusher's private port during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundTraffic {
    pub mac: MacAddress,
    pub len: usize,
    pub from: SocketAddr,
}

/// Outcome of one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Discovery packets sent successfully
    pub sent: usize,
    pub inbound: Vec<InboundTraffic>,
    pub errors: Vec<TransientNetworkError>,
}

/// Runs the discovery broadcast for a fixed set of pushers.
pub struct BroadcastEmulator {
    devices: DeviceSet,
    socket: UdpSocket,
    target: SocketAddr,
}

impl BroadcastEmulator {
    /// Create the emulator. Must be called inside a tokio runtime.
    pub async fn new(devices: DeviceSet, options: EmulatorOptions) -> Result<Self, std::io::Error> {
        let std_socket = create_broadcast_socket()?;
        let socket = UdpSocket::from_std(std_socket)?;
        let target = SocketAddr::V4(SocketAddrV4::new(
            options.broadcast_addr,
            options.discovery_port,
        ));

        tracing::info!(
            "Emulating {} pusher(s), broadcasting to {}",
            devices.len(),
            target
        );

        Ok(Self {
            devices,
            socket,
            target,
        })
    }

    pub fn devices(&self) -> &DeviceSet {
        &self.devices
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Run one broadcast round.
    ///
    /// All discovery packets go out first, in creation order, then each
    /// listener is polled once. Failures are collected, never returned.
    pub async fn tick(&self) -> TickReport {
        let mut report = TickReport::default();

        for device in &self.devices {
            match self.socket.send_to(device.packet().as_bytes(), self.target).await {
                Ok(_) => report.sent += 1,
                Err(source) => {
                    let err = TransientNetworkError::Send {
                        mac: device.mac(),
                        source,
                    };
                    tracing::warn!("{}", err);
                    report.errors.push(err);
                }
            }
        }

        let mut buf = [0u8; RECEIVE_BUFFER_SIZE];
        for device in &self.devices {
            match device.poll_inbound(&mut buf) {
                Ok(Some(inbound)) => {
                    tracing::info!(
                        mac = %device.mac(),
                        from = %inbound.from,
                        "Received {} byte(s) for pusher",
                        inbound.len
                    );
                    report.inbound.push(InboundTraffic {
                        mac: device.mac(),
                        len: inbound.len,
                        from: inbound.from,
                    });
                }
                Ok(None) => {}
                Err(source) => {
                    let err = TransientNetworkError::Receive {
                        mac: device.mac(),
                        source,
                    };
                    tracing::warn!("{}", err);
                    report.errors.push(err);
                }
            }
        }

        tracing::debug!(
            sent = report.sent,
            inbound = report.inbound.len(),
            errors = report.errors.len(),
            "Tick complete"
        );

        report
    }

    /// Tick forever, calling `on_tick` after every round.
    pub async fn run<F>(&self, mut on_tick: F)
    where
        F: FnMut(&TickReport),
    {
        let mut ticker = interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = self.tick().await;
            on_tick(&report);
        }
    }
}
