//! Listener startup with port fallback.

use std::io;

use thiserror::Error;
use tokio::net::TcpListener;

/// Raw OS codes for "address in use" on Linux, macOS and Windows.
const ADDR_IN_USE_CODES: [i32; 3] = [98, 48, 10048];

/// Errors raised while binding the listener.
#[derive(Debug, Error)]
pub enum BindError {
    /// Every port in the range was taken.
    #[error("No free port in {first}..={last} after {attempts} attempts")]
    Exhausted {
        /// First port tried.
        first: u16,
        /// Last port tried.
        last: u16,
        /// Number of bind attempts made.
        attempts: u16,
    },

    /// Binding failed for a reason other than the port being taken.
    #[error("Failed to bind {addr}: {source}")]
    Io {
        /// Address that failed.
        addr: String,
        /// Underlying error.
        source: io::Error,
    },
}

/// Whether `err` means the port is already taken.
#[must_use]
pub fn is_addr_in_use(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::AddrInUse
        || err
            .raw_os_error()
            .is_some_and(|code| ADDR_IN_USE_CODES.contains(&code))
}

/// Bind `host:port`, moving to the next port while the current one is busy.
///
/// At most `max_attempts` consecutive ports are tried (at least one). Any
/// error other than "address in use" is returned immediately.
///
/// # Errors
///
/// Returns [`BindError::Exhausted`] when every tried port is busy and
/// [`BindError::Io`] for any other bind failure.
pub async fn bind_with_retry(
    host: &str,
    port: u16,
    max_attempts: u16,
) -> Result<TcpListener, BindError> {
    let first = port;
    let mut port = port;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let addr = format!("{host}:{port}");

        match TcpListener::bind(&addr).await {
            Ok(listener) => {
                if attempts > 1 {
                    tracing::info!(port, requested = first, "Bound to fallback port");
                }
                return Ok(listener);
            }
            Err(e) if is_addr_in_use(&e) => {
                let next = port.checked_add(1).filter(|_| attempts < max_attempts);
                let Some(next) = next else {
                    return Err(BindError::Exhausted {
                        first,
                        last: port,
                        attempts,
                    });
                };
                tracing::warn!("Port {port} is busy, trying {next}");
                port = next;
            }
            Err(source) => return Err(BindError::Io { addr, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn occupied() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[tokio::test]
    async fn busy_port_falls_through_to_next() {
        let (_holder, port) = occupied().await;
        if port == u16::MAX {
            return;
        }

        let listener = bind_with_retry("127.0.0.1", port, 20).await.unwrap();
        let bound = listener.local_addr().unwrap().port();
        assert!(bound > port);
        assert!(bound <= port.saturating_add(19));
    }

    #[tokio::test]
    async fn free_port_binds_first_try() {
        let (holder, port) = occupied().await;
        drop(holder);

        let listener = bind_with_retry("127.0.0.1", port, 1).await.unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn single_attempt_on_busy_port_is_exhausted() {
        let (_holder, port) = occupied().await;

        let err = bind_with_retry("127.0.0.1", port, 1).await.unwrap_err();
        match err {
            BindError::Exhausted {
                first,
                last,
                attempts,
            } => {
                assert_eq!(first, port);
                assert_eq!(last, port);
                assert_eq!(attempts, 1);
            }
            BindError::Io { .. } => panic!("expected exhaustion, got {err}"),
        }
    }

    #[test]
    fn addr_in_use_detection() {
        assert!(is_addr_in_use(&io::Error::from(io::ErrorKind::AddrInUse)));
        assert!(is_addr_in_use(&io::Error::from_raw_os_error(98)));
        assert!(!is_addr_in_use(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }
}
