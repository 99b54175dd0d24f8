//! Port availability checking.

pub struct PortManager;

impl PortManager {
    /// Check if a port is available for binding.
    ///
    /// Attempts to bind to host:port. If successful, nothing else
    /// listens there. The socket is released when the listener drops.
    pub fn is_available(host: &str, port: u16) -> bool {
        std::net::TcpListener::bind((host, port)).is_ok()
    }
}
