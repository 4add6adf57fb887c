// ABOUTME: UDP capture loop feeding BTP-B framed ITS PDUs to a shared Dissector
// ABOUTME: Each datagram is dissected on its own task, bounded by a permit pool, results go to a channel

use crate::btp::BtpHeader;
use crate::datatypes::WellKnownPort;
use crate::dissector::{Dissection, Dissector};
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};
use tracing::{debug, info};

/// Largest datagram read from the socket
const MAX_DATAGRAM: usize = 64 * 1024;

/// Datagrams dissected concurrently unless [`Listener::max_in_flight`] says otherwise
pub const DEFAULT_MAX_IN_FLIGHT: usize = 256;

/// One dissected datagram
#[derive(Debug, Clone)]
pub struct Captured {
    pub peer: SocketAddr,
    pub btp: BtpHeader,
    pub service: WellKnownPort,
    pub dissection: Dissection,
}

/// Dissect one BTP-B datagram.
///
/// Returns `None` for datagrams that are too short for a BTP header or whose
/// destination port is not one of the dissected ITS services.
pub fn dissect_datagram(
    dissector: &Dissector,
    peer: SocketAddr,
    datagram: &[u8],
) -> Option<Captured> {
    let mut cursor = Cursor::new(datagram);
    let btp = match BtpHeader::decode_b(&mut cursor) {
        Ok(btp) => btp,
        Err(err) => {
            debug!(%peer, %err, "datagram too short for BTP-B");
            return None;
        }
    };

    let Some(service) = btp.service().filter(WellKnownPort::is_dissected) else {
        debug!(%peer, port = btp.destination_port(), "datagram for an undissected port");
        return None;
    };

    let dissection = dissector.dispatch(&datagram[BtpHeader::SIZE..]);
    Some(Captured {
        peer,
        btp,
        service,
        dissection,
    })
}

/// Receives ITS traffic on a UDP socket
pub struct Listener {
    socket: UdpSocket,
    dissector: Arc<Dissector>,
    permits: Arc<Semaphore>,
}

impl Listener {
    pub async fn bind(addr: &str, dissector: Arc<Dissector>) -> crate::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        info!(addr = %socket.local_addr()?, "listening for ITS datagrams");
        Ok(Self {
            socket,
            dissector,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_IN_FLIGHT)),
        })
    }

    /// Cap the number of datagrams being dissected or waiting on `results`.
    ///
    /// Once the cap is reached no further datagram is read until a task finishes.
    pub fn max_in_flight(mut self, limit: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    pub fn local_addr(&self) -> crate::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive datagrams until `results` is closed, dissecting each on its own task
    pub async fn run(self, results: mpsc::Sender<Captured>) -> crate::Result<()> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let permit = tokio::select! {
                permit = Arc::clone(&self.permits).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => return Ok(()),
                },
                _ = results.closed() => return Ok(()),
            };
            let (len, peer) = tokio::select! {
                received = self.socket.recv_from(&mut buf) => received?,
                _ = results.closed() => return Ok(()),
            };

            let datagram = buf[..len].to_vec();
            let dissector = Arc::clone(&self.dissector);
            let results = results.clone();
            tokio::spawn(async move {
                let _permit: OwnedSemaphorePermit = permit;
                if let Some(captured) = dissect_datagram(&dissector, peer, &datagram) {
                    // receiver gone means shutdown
                    let _ = results.send(captured).await;
                }
            });
        }
    }
}
